/*!
## Sound chip registers

Each voice is a small block of byte-sized registers. Packed fields are
newtypes over one integer with shift/mask accessors, so the in-memory
layout never depends on the compiler.

The synthesizer reads these blocks on its own schedule. There is no
cross-field transaction: a frame may observe a half-updated voice.
*/

use super::NUM_VOICES;

/// Location of a packed field inside a register value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    shift: u32,
    width: u32,
}

impl BitField {
    pub const fn new(shift: u32, width: u32) -> BitField {
        BitField { shift, width }
    }

    pub const fn max(self) -> u32 {
        (1 << self.width) - 1
    }

    pub const fn get(self, value: u32) -> u32 {
        (value >> self.shift) & self.max()
    }

    pub const fn insert(self, value: u32, field: u32) -> u32 {
        let mask = self.max() << self.shift;
        (value & !mask) | ((field << self.shift) & mask)
    }
}

macro_rules! bitfield {
    (
        $(#[$meta:meta])*
        $name:ident($ty:ty) {
            $($konst:ident = $get:ident, $set:ident: $shift:expr, $width:expr;)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name($ty);

        #[allow(dead_code)]
        impl $name {
            $(pub const $konst: BitField = BitField::new($shift, $width);)*

            pub const fn from_value(value: $ty) -> $name {
                $name(value)
            }

            pub const fn value(self) -> $ty {
                self.0
            }

            $(
                pub fn $get(self) -> $ty {
                    Self::$konst.get(self.0 as u32) as $ty
                }

                pub fn $set(&mut self, field: $ty) {
                    self.0 = Self::$konst.insert(self.0 as u32, field as u32) as $ty;
                }
            )*
        }
    };
}

/// Bitfields that statements may update field by field.
pub trait Attributes: Copy {
    /// Settable fields in the order an attribute list names them.
    const FIELDS: &'static [BitField];

    fn from_value(value: u8) -> Self;
    fn value(self) -> u8;
}

bitfield! {
    /// Waveform, stereo mix, timeout and gate.
    VoiceAttributes(u8) {
        WAVE = wave, set_wave: 0, 2;
        MIX = mix, set_mix: 2, 2;
        TIMEOUT = timeout, set_timeout: 4, 1;
        GATE = gate, set_gate: 7, 1;
    }
}

impl Attributes for VoiceAttributes {
    const FIELDS: &'static [BitField] = &[Self::WAVE, Self::MIX, Self::TIMEOUT];

    fn from_value(value: u8) -> Self {
        VoiceAttributes::from_value(value)
    }
    fn value(self) -> u8 {
        VoiceAttributes::value(self)
    }
}

bitfield! {
    LfoAttributes(u8) {
        WAVE = wave, set_wave: 0, 2;
        INVERT = invert, set_invert: 2, 1;
        ENV_MODE = env_mode, set_env_mode: 3, 1;
        TRIGGER = trigger, set_trigger: 4, 1;
    }
}

impl Attributes for LfoAttributes {
    const FIELDS: &'static [BitField] = &[Self::WAVE, Self::INVERT, Self::ENV_MODE, Self::TRIGGER];

    fn from_value(value: u8) -> Self {
        LfoAttributes::from_value(value)
    }
    fn value(self) -> u8 {
        LfoAttributes::value(self)
    }
}

bitfield! {
    /// ADSR, four bits per stage.
    Envelope(u16) {
        ATTACK = attack, set_attack: 0, 4;
        DECAY = decay, set_decay: 4, 4;
        SUSTAIN = sustain, set_sustain: 8, 4;
        RELEASE = release, set_release: 12, 4;
    }
}

bitfield! {
    Lfo(u16) {
        RATE = rate, set_rate: 0, 4;
        OSC_AMOUNT = osc_amount, set_osc_amount: 4, 4;
        VOL_AMOUNT = vol_amount, set_vol_amount: 8, 4;
        PW_AMOUNT = pw_amount, set_pw_amount: 12, 4;
    }
}

bitfield! {
    AudioAttributes(u8) {
        AUDIO_ENABLED = audio_enabled, set_audio_enabled: 0, 1;
    }
}

/// Register value for a semitone pitch. Pitch 58 is concert A.
pub fn pitch_to_frequency(pitch: f64) -> u16 {
    (16.0 * 440.0 * 2f64.powf((pitch - 58.0) / 12.0)).round() as u16
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Voice {
    pub frequency_low: u8,
    pub frequency_high: u8,
    pub volume: u8,
    pub pulse_width: u8,
    pub attr: VoiceAttributes,
    pub envelope: Envelope,
    pub lfo: Lfo,
    pub lfo_attr: LfoAttributes,
}

impl Voice {
    pub fn frequency(&self) -> u16 {
        u16::from(self.frequency_high) << 8 | u16::from(self.frequency_low)
    }

    pub fn set_frequency(&mut self, frequency: u16) {
        self.frequency_low = (frequency & 0xFF) as u8;
        self.frequency_high = (frequency >> 8) as u8;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioRegisters {
    voices: [Voice; NUM_VOICES],
    attr: AudioAttributes,
    retrigger: u8,
}

impl AudioRegisters {
    pub fn new() -> AudioRegisters {
        AudioRegisters::default()
    }

    pub fn voices(&self) -> &[Voice; NUM_VOICES] {
        &self.voices
    }

    pub fn voice(&self, n: usize) -> &Voice {
        &self.voices[n]
    }

    pub fn voice_mut(&mut self, n: usize) -> &mut Voice {
        &mut self.voices[n]
    }

    pub fn is_audio_enabled(&self) -> bool {
        self.attr.audio_enabled() != 0
    }

    /// Returns true only for the call that switched audio on.
    pub fn enable_audio(&mut self) -> bool {
        if self.is_audio_enabled() {
            return false;
        }
        self.attr.set_audio_enabled(1);
        true
    }

    /// Asks the synthesizer to restart the voice's envelope and LFO on
    /// its next frame. Plain register writes never do this.
    pub fn on_voice_attr_change(&mut self, n: usize) {
        debug_assert!(n < NUM_VOICES);
        self.retrigger |= 1 << n;
    }

    /// Voices flagged since the last call, one bit per voice.
    pub fn take_retriggers(&mut self) -> u8 {
        std::mem::take(&mut self.retrigger)
    }
}

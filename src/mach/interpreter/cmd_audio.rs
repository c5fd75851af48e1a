use super::{Interpreter, Pass, Result};
use crate::mach::{pitch_to_frequency, LfoAttributes, Val, VoiceAttributes};
use crate::mach::{NUM_VOICES, PLAY_VOLUME};

const LAST_VOICE: f64 = (NUM_VOICES - 1) as f64;

impl Interpreter {
    /// VOICE n,[f],[vol],[pw]
    pub(super) fn cmd_voice(&mut self, pass: Pass) -> Result<()> {
        self.pc += 1;
        let n = self.evaluate_voice_number(pass)?;
        self.expect_comma()?;
        let f_value = self.evaluate_optional_numeric_expression(pass, 0.0, 65535.0)?;
        self.expect_comma()?;
        let vol_value = self.evaluate_optional_numeric_expression(pass, 0.0, 255.0)?;
        self.expect_comma()?;
        let pw_value = self.evaluate_optional_numeric_expression(pass, 0.0, 255.0)?;
        self.end_of_statement()?;

        if pass == Pass::Execute {
            let voice = self.audio.voice_mut(n);
            if let Val::Number(f) = f_value {
                voice.set_frequency(f as u16);
            }
            if let Val::Number(vol) = vol_value {
                voice.volume = vol as u8;
            }
            if let Val::Number(pw) = pw_value {
                voice.pulse_width = pw as u8;
            }
            self.enable_audio();
        }
        Ok(())
    }

    /// VOICE.A n,attr
    pub(super) fn cmd_voice_a(&mut self, pass: Pass) -> Result<()> {
        self.pc += 1;
        let n = self.evaluate_voice_number(pass)?;
        self.expect_comma()?;
        let base = match pass {
            Pass::Validate => VoiceAttributes::default(),
            Pass::Execute => self.audio.voice(n).attr,
        };
        let attr = self.evaluate_attributes(pass, base)?;
        self.end_of_statement()?;

        if pass == Pass::Execute {
            self.audio.voice_mut(n).attr = attr;
            self.enable_audio();
        }
        Ok(())
    }

    /// VOICE.EG n,[a],[d],[s],[r]
    pub(super) fn cmd_voice_eg(&mut self, pass: Pass) -> Result<()> {
        self.pc += 1;
        let n = self.evaluate_voice_number(pass)?;
        let [a, d, s, r] = self.evaluate_nibbles(pass)?;
        self.end_of_statement()?;

        if pass == Pass::Execute {
            let envelope = &mut self.audio.voice_mut(n).envelope;
            if let Some(a) = a {
                envelope.set_attack(a);
            }
            if let Some(d) = d {
                envelope.set_decay(d);
            }
            if let Some(s) = s {
                envelope.set_sustain(s);
            }
            if let Some(r) = r {
                envelope.set_release(r);
            }
            self.enable_audio();
        }
        Ok(())
    }

    /// VOICE.LFO n,[rate],[osc],[vol],[pw]
    pub(super) fn cmd_voice_lfo(&mut self, pass: Pass) -> Result<()> {
        self.pc += 1;
        let n = self.evaluate_voice_number(pass)?;
        let [rate, osc, vol, pw] = self.evaluate_nibbles(pass)?;
        self.end_of_statement()?;

        if pass == Pass::Execute {
            let lfo = &mut self.audio.voice_mut(n).lfo;
            if let Some(rate) = rate {
                lfo.set_rate(rate);
            }
            if let Some(osc) = osc {
                lfo.set_osc_amount(osc);
            }
            if let Some(vol) = vol {
                lfo.set_vol_amount(vol);
            }
            if let Some(pw) = pw {
                lfo.set_pw_amount(pw);
            }
            self.enable_audio();
        }
        Ok(())
    }

    /// VOICE.LFO.A n,attr
    pub(super) fn cmd_voice_lfo_a(&mut self, pass: Pass) -> Result<()> {
        self.pc += 1;
        let n = self.evaluate_voice_number(pass)?;
        self.expect_comma()?;
        let base = match pass {
            Pass::Validate => LfoAttributes::default(),
            Pass::Execute => self.audio.voice(n).lfo_attr,
        };
        let attr = self.evaluate_attributes(pass, base)?;
        self.end_of_statement()?;

        if pass == Pass::Execute {
            self.audio.voice_mut(n).lfo_attr = attr;
            self.enable_audio();
        }
        Ok(())
    }

    /// PLAY n,pitch
    pub(super) fn cmd_play(&mut self, pass: Pass) -> Result<()> {
        self.pc += 1;
        let n = self.evaluate_voice_number(pass)?;
        self.expect_comma()?;
        let pitch = self.evaluate_numeric_expression(pass, 0.0, 95.0)?;
        self.end_of_statement()?;

        if pass == Pass::Execute {
            let voice = self.audio.voice_mut(n);
            if pitch > 0.0 {
                voice.set_frequency(pitch_to_frequency(pitch));
                voice.volume = PLAY_VOLUME;
                voice.attr.set_gate(1);
                self.audio.on_voice_attr_change(n);
            } else {
                // note off, frequency and volume stay for the release
                voice.attr.set_gate(0);
            }
            self.enable_audio();
        }
        Ok(())
    }

    fn evaluate_voice_number(&mut self, pass: Pass) -> Result<usize> {
        let n = self.evaluate_numeric_expression(pass, 0.0, LAST_VOICE)?;
        match pass {
            Pass::Validate => Ok(0),
            Pass::Execute => Ok(n as usize),
        }
    }

    /// Four comma-led optional fields of 0..15.
    fn evaluate_nibbles(&mut self, pass: Pass) -> Result<[Option<u16>; 4]> {
        let mut fields = [None; 4];
        for field in fields.iter_mut() {
            self.expect_comma()?;
            if let Val::Number(n) = self.evaluate_optional_numeric_expression(pass, 0.0, 15.0)? {
                *field = Some(n as u16);
            }
        }
        Ok(fields)
    }
}

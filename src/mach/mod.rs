/*!
## Rust Machine Module

This Rust module is the interpreter for BASIC and the sound chip
registers it drives.

*/

/// Sound channels on the chip.
pub const NUM_VOICES: usize = 4;
pub const MAX_ARRAY_DIMENSIONS: usize = 4;
pub const MAX_ARRAY_ELEMENTS: usize = 65536;
/// Loop and call frames.
pub const MAX_STACK: usize = 128;
pub const MAX_LINE_LEN: usize = 255;
/// PLAY always sounds at full volume.
pub const PLAY_VOLUME: u8 = 15;

mod audio;
mod function;
mod interpreter;
mod operation;
mod program;
mod runtime;
mod stack;
mod val;
mod var;

pub use audio::pitch_to_frequency;
pub use audio::Attributes;
pub use audio::AudioAttributes;
pub use audio::AudioRegisters;
pub use audio::BitField;
pub use audio::Envelope;
pub use audio::Lfo;
pub use audio::LfoAttributes;
pub use audio::Voice;
pub use audio::VoiceAttributes;
pub use interpreter::Flow;
pub use interpreter::Interpreter;
pub use interpreter::Pass;
pub use program::Program;
pub use runtime::Event;
pub use runtime::Runtime;
pub use stack::Stack;
pub use val::Val;
pub use val::ValueType;
pub use var::Level;
pub use var::Var;
pub use var::VarKey;

//! # NX BASIC
//!
//! A BASIC interpreter driving a four voice sound chip.
//!
//! Run the executable for an interactive prompt. Numbered lines are
//! stored, anything else runs immediately.
//! ```text
//! NX BASIC
//! READY.
//! 10 VOICE 0,880,15,128
//! 20 VOICE.EG 0,2,,10,5
//! 30 PLAY 0,58
//! RUN
//! ```
//!
//! The `mach::Runtime` type is the embedding API. Feed it lines with
//! `enter`, then call `execute` until it reports `Event::Stopped`. The
//! sound registers are available through `Runtime::audio`.

pub mod lang;
pub mod mach;
pub mod term;

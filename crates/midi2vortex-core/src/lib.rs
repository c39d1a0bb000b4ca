//! MIDI-to-VortexTracker-II arrangement pipeline: reads a standard MIDI file,
//! assigns its tracks to AY-3-8910 voices per a channel-mapping grammar, and
//! serialises the result as a VortexTracker II module.
//!
//! The entry point is [`convert::convert`]; everything else is a pipeline
//! stage it threads in order.

pub mod channel_map;
pub mod config;
pub mod constants;
pub mod convert;
pub mod diagnostics;
pub mod echo;
pub mod envelope;
pub mod error;
pub mod flatten;
pub mod key;
pub mod midi;
pub mod mixer;
pub mod ornament;
pub mod output;

pub use config::Config;
pub use convert::convert;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::ConvertError;
pub use output::ModuleOutput;

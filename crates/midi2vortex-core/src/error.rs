//! Error types for the conversion pipeline.

use thiserror::Error;

/// Error produced by any pipeline stage. Every variant is fatal: no stage
/// retries, and the caller writes no output file when `convert` returns `Err`.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Grammar violation in the channel-mapping string.
    #[error("bad channel map at {token:?}: {reason}")]
    BadChannelMap { token: String, reason: String },

    /// The MIDI file uses SMPTE (timecode) division instead of metric division.
    #[error("unsupported time format: track uses SMPTE division, only metric division is supported")]
    UnsupportedTimeFormat,

    /// The MIDI byte stream could not be parsed.
    #[error("failed to read MIDI data: {0}")]
    MidiReadFailure(String),

    /// Reading or writing a file failed.
    #[error("I/O failure: {0}")]
    IoFailure(#[from] std::io::Error),

    /// No notes survived quantisation (all virtual notes were zero-length or
    /// every MIDI track was unmapped by the channel map).
    #[error("empty input: no notes survived quantisation")]
    EmptyInput,
}

impl ConvertError {
    /// Stable short code, independent of the Display message, for tooling
    /// that wants to branch on error kind without string-matching.
    pub fn code(&self) -> &'static str {
        match self {
            ConvertError::BadChannelMap { .. } => "BAD_CHANNEL_MAP",
            ConvertError::UnsupportedTimeFormat => "UNSUPPORTED_TIME_FORMAT",
            ConvertError::MidiReadFailure(_) => "MIDI_READ_FAILURE",
            ConvertError::IoFailure(_) => "IO_FAILURE",
            ConvertError::EmptyInput => "EMPTY_INPUT",
        }
    }
}

//! CLI argument definitions for the MIDI to VortexTracker II converter.
//!
//! The ABI is flat positionals, not subcommands (spec's invocation is a
//! straight parameter list, not a command tree). Numeric fields use a custom
//! parser that falls back to the field's own default on a non-numeric token
//! instead of rejecting the whole invocation.

use clap::Parser;

/// midi2vortex - convert a MIDI file into a VortexTracker II module
#[derive(Parser)]
#[command(name = "midi2vortex")]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Path to the input MIDI file
    pub input: String,

    /// Channel-mapping grammar string binding MIDI tracks to AY voices
    #[arg(default_value = "1d-2me-3p,4m[uf]-5m[2]+,5m[6]-6me[2]+-3p[3]+-2mew+")]
    pub channel_map: String,

    /// Tracker rows per quarter note
    #[arg(default_value = "4", value_parser = parse_or_unsigned::<4>)]
    pub per_beat: u32,

    /// Row delay before the primary echo copy
    #[arg(default_value = "3", value_parser = parse_or_unsigned::<3>)]
    pub per_delay: u32,

    /// Row delay before the secondary (`w`-modifier) echo copy
    #[arg(default_value = "6", value_parser = parse_or_unsigned::<6>)]
    pub per_delay2: u32,

    /// Rows per pattern (0 = auto: `min(per_beat * 64, 127)`)
    #[arg(default_value = "0", value_parser = parse_or_unsigned::<0>)]
    pub pattern_size: u32,

    /// Leading rows to skip before the first note
    #[arg(default_value = "0", value_parser = parse_or_unsigned::<0>)]
    pub skip_lines: u32,

    /// Times each ornament offset is stamped
    #[arg(default_value = "1", value_parser = parse_or_unsigned::<1>)]
    pub orn_repeat: u32,

    /// Max semitone spread from the median kept when squeezing a chord
    #[arg(default_value = "12", value_parser = parse_or_signed::<12>)]
    pub max_offset: i32,

    /// Signed diatonic transposition in scale steps
    #[arg(default_value = "0", value_parser = parse_or_signed::<0>)]
    pub diatonic_transpose: i32,

    /// Forced key (0-11) or 13 to auto-detect
    #[arg(default_value = "13", value_parser = parse_or_signed::<13>)]
    pub real_key: i32,
}

/// Parse a positional numeric argument, falling back to `DEFAULT` silently on
/// a non-numeric token rather than rejecting the invocation.
fn parse_or_unsigned<const DEFAULT: u32>(raw: &str) -> Result<u32, std::convert::Infallible> {
    Ok(raw.parse::<u32>().unwrap_or(DEFAULT))
}

fn parse_or_signed<const DEFAULT: i32>(raw: &str) -> Result<i32, std::convert::Infallible> {
    Ok(raw.parse::<i32>().unwrap_or(DEFAULT))
}

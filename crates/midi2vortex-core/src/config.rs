//! Run configuration and the resolved per-voice channel settings.

/// Instrument discipline for one voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentKind {
    /// Highest-wins monophonic voice.
    Mono,
    /// Chord-collecting polyphonic voice.
    Poly,
    /// Drum/percussion voice (remapped sample + note via the drum tables).
    Drum,
    /// Envelope-generator voice.
    Envelope,
}

/// `+`/`-` mix option from the channel-map grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixOption {
    Plus,
    Minus,
}

/// Echo modifiers from the channel-map grammar (`u` mute-echo, `w` double-echo).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub mute_echo: bool,
    pub double_echo: bool,
}

/// One resolved segment of the channel-mapping grammar: a MIDI track bound to
/// an AY voice with an instrument kind and optional overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSettings {
    /// 0-based source MIDI track index.
    pub track: usize,
    pub kind: InstrumentKind,
    pub modifiers: Modifiers,
    pub sample: u32,
    pub ornament: u32,
    pub mix: MixOption,
}

/// Snapshot of the run's parameters, immutable through the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input_path: String,
    pub channel_map: String,
    pub per_beat: u32,
    pub per_delay: u32,
    pub per_delay2: u32,
    pub pattern_size: u32,
    pub skip_lines: u32,
    pub orn_repeat: u32,
    pub max_offset: i32,
    pub diatonic_transpose: i32,
    pub real_key: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: "./test/tottoro_example.mid".to_string(),
            channel_map: "1d-2me-3p,4m[uf]-5m[2]+,5m[6]-6me[2]+-3p[3]+-2mew+".to_string(),
            per_beat: 4,
            per_delay: 3,
            per_delay2: 6,
            pattern_size: 0,
            skip_lines: 0,
            orn_repeat: 1,
            max_offset: 12,
            diatonic_transpose: 0,
            real_key: 13,
        }
    }
}

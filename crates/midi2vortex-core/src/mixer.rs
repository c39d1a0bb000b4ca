//! Channel mixer: merges the variable-count virtual voices down to the three
//! AY channels with an empty-or-louder priority rule.
//!
//! Grounded on `original_source/autosiril-go/mixer.go::MixChannels` for the
//! priority merge and the `ayIdx >= 3` overflow cutoff, and
//! `applyInstrumentSettings`/`constants.go`'s `Note2DrumSample`/`Note2DrumNote`
//! for the drum remap.

use crate::config::{ChannelSettings, InstrumentKind};
use crate::constants::{NOTE_TO_DRUM_NOTE, NOTE_TO_DRUM_SAMPLE};
use crate::diagnostics::Diagnostics;
use crate::envelope;
use crate::flatten::{CellState, TimelineNote};

pub const AY_CHANNEL_COUNT: usize = 3;

/// One cell after channel mixing, carrying every chip parameter the
/// serialiser needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VortexNote {
    pub note: u8,
    pub volume: u8,
    pub state: CellState,
    pub pitch_class: usize,
    pub display_octave: u8,
    pub kind: InstrumentKind,
    pub sample: u32,
    pub envelope_form: i32,
    pub ornament_id: u16,
    pub envelope_pitch_class: usize,
    pub envelope_display_octave: u8,
}

impl VortexNote {
    fn empty() -> Self {
        Self {
            note: 0,
            volume: 0,
            state: CellState::Empty,
            pitch_class: 0,
            display_octave: 0,
            kind: InstrumentKind::Mono,
            sample: 2,
            envelope_form: 0,
            ornament_id: 0,
            envelope_pitch_class: 0,
            envelope_display_octave: 0,
        }
    }

    /// Whether this cell carries an audibly active chip envelope.
    pub fn envelope_active(&self) -> bool {
        self.kind == InstrumentKind::Envelope
            && matches!(self.state, CellState::Start | CellState::Continue)
            && envelope::is_active(self.envelope_form)
    }
}

/// Merge flattened voice timelines onto the three AY channels.
pub fn mix(
    timelines: &[Vec<TimelineNote>],
    channel_map: &[Vec<ChannelSettings>],
    diagnostics: &mut Diagnostics,
) -> [Vec<VortexNote>; AY_CHANNEL_COUNT] {
    let max_len = timelines.iter().map(|t| t.len()).max().unwrap_or(0);

    let mut ay_channels: [Vec<VortexNote>; AY_CHANNEL_COUNT] =
        std::array::from_fn(|_| vec![VortexNote::empty(); max_len]);

    if channel_map.len() > AY_CHANNEL_COUNT {
        diagnostics.warn(
            "mixer",
            format!(
                "channel map names {} AY channel groups; only the first {} are honoured",
                channel_map.len(),
                AY_CHANNEL_COUNT
            ),
        );
    }

    let mut voice_index = 0usize;
    for (ay_idx, ay_group) in channel_map.iter().enumerate() {
        if ay_idx >= AY_CHANNEL_COUNT {
            break;
        }
        for settings in ay_group {
            let Some(timeline) = timelines.get(voice_index) else {
                voice_index += 1;
                continue;
            };
            for (pos, cell) in timeline.iter().enumerate() {
                if pos >= ay_channels[ay_idx].len() || cell.state == CellState::Empty {
                    continue;
                }
                let candidate = to_vortex_note(cell, settings);
                let incumbent = &ay_channels[ay_idx][pos];
                if incumbent.state == CellState::Empty || cell.volume > incumbent.volume {
                    ay_channels[ay_idx][pos] = candidate;
                }
            }
            voice_index += 1;
        }
    }

    ay_channels
}

fn to_vortex_note(cell: &TimelineNote, settings: &ChannelSettings) -> VortexNote {
    let mut note = VortexNote {
        note: cell.note,
        volume: cell.volume,
        state: cell.state,
        pitch_class: cell.pitch_class,
        display_octave: cell.display_octave,
        kind: settings.kind,
        sample: settings.sample,
        envelope_form: 15,
        ornament_id: cell.ornament_id,
        envelope_pitch_class: 0,
        envelope_display_octave: 0,
    };

    match settings.kind {
        InstrumentKind::Drum => {
            let idx = cell.note as usize;
            note.sample = NOTE_TO_DRUM_SAMPLE[idx];
            note.note = NOTE_TO_DRUM_NOTE[idx];
            note.pitch_class = (note.note % 12) as usize;
            note.display_octave = ((note.note / 12) as u32).min(8) as u8;
            note.envelope_form = 15;
        }
        InstrumentKind::Mono | InstrumentKind::Poly => {
            note.sample = settings.sample;
            note.ornament_id = settings.ornament as u16;
            note.envelope_form = 15;
        }
        InstrumentKind::Envelope => {
            note.sample = settings.sample;
            note.ornament_id = settings.ornament as u16;
            let lookup = envelope::lookup(cell.note);
            note.envelope_form = lookup.form;
            note.envelope_pitch_class = lookup.pitch_class;
            note.envelope_display_octave = lookup.display_octave;
        }
    }

    note
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MixOption, Modifiers};
    use crate::constants::note_to_pitch_octave;
    use pretty_assertions::assert_eq;

    fn settings(track: usize, kind: InstrumentKind) -> ChannelSettings {
        ChannelSettings {
            track,
            kind,
            modifiers: Modifiers::default(),
            sample: 2,
            ornament: 0,
            mix: MixOption::Minus,
        }
    }

    fn start_cell(note: u8, volume: u8, kind: InstrumentKind) -> TimelineNote {
        let (pitch_class, display_octave) = note_to_pitch_octave(note);
        TimelineNote {
            note,
            volume,
            state: CellState::Start,
            pitch_class,
            display_octave,
            kind,
            chord_members: None,
            ornament_id: 0,
        }
    }

    fn empty_cell(kind: InstrumentKind) -> TimelineNote {
        let (pitch_class, display_octave) = note_to_pitch_octave(0);
        TimelineNote {
            note: 0,
            volume: 0,
            state: CellState::Empty,
            pitch_class,
            display_octave,
            kind,
            chord_members: None,
            ornament_id: 0,
        }
    }

    #[test]
    fn louder_voice_wins_the_same_ay_cell() {
        let quiet = vec![start_cell(60, 50, InstrumentKind::Mono), empty_cell(InstrumentKind::Mono)];
        let loud = vec![start_cell(67, 100, InstrumentKind::Mono), empty_cell(InstrumentKind::Mono)];
        let map = vec![vec![settings(0, InstrumentKind::Mono), settings(1, InstrumentKind::Mono)]];
        let mut diagnostics = Diagnostics::new();
        let ay = mix(&[quiet, loud], &map, &mut diagnostics);

        let (pitch_class, display_octave) = note_to_pitch_octave(67);
        let expected = VortexNote {
            note: 67,
            volume: 100,
            state: CellState::Start,
            pitch_class,
            display_octave,
            kind: InstrumentKind::Mono,
            sample: 2,
            envelope_form: 15,
            ornament_id: 0,
            envelope_pitch_class: 0,
            envelope_display_octave: 0,
        };
        assert_eq!(ay[0][0], expected);
    }

    #[test]
    fn drum_voices_remap_sample_and_note() {
        let timeline = vec![start_cell(38, 100, InstrumentKind::Drum)];
        let map = vec![vec![settings(0, InstrumentKind::Drum)]];
        let mut diagnostics = Diagnostics::new();
        let ay = mix(&[timeline], &map, &mut diagnostics);

        let note = NOTE_TO_DRUM_NOTE[38];
        let (pitch_class, display_octave) = note_to_pitch_octave(note);
        let expected = VortexNote {
            note,
            volume: 100,
            state: CellState::Start,
            pitch_class,
            display_octave,
            kind: InstrumentKind::Drum,
            sample: NOTE_TO_DRUM_SAMPLE[38],
            envelope_form: 15,
            ornament_id: 0,
            envelope_pitch_class: 0,
            envelope_display_octave: 0,
        };
        assert_eq!(ay[0][0], expected);
    }

    #[test]
    fn fourth_channel_group_is_dropped_with_a_diagnostic() {
        let map = vec![
            vec![settings(0, InstrumentKind::Mono)],
            vec![settings(1, InstrumentKind::Mono)],
            vec![settings(2, InstrumentKind::Mono)],
            vec![settings(3, InstrumentKind::Mono)],
        ];
        let timelines = vec![
            vec![empty_cell(InstrumentKind::Mono)],
            vec![empty_cell(InstrumentKind::Mono)],
            vec![empty_cell(InstrumentKind::Mono)],
            vec![start_cell(60, 100, InstrumentKind::Mono)],
        ];
        let mut diagnostics = Diagnostics::new();
        let ay = mix(&timelines, &map, &mut diagnostics);
        assert!(!diagnostics.is_empty());
        assert_eq!(ay.len(), AY_CHANNEL_COUNT);
    }

    #[test]
    fn envelope_voice_gets_a_per_note_form() {
        let timeline = vec![start_cell(60, 100, InstrumentKind::Envelope)];
        let map = vec![vec![settings(0, InstrumentKind::Envelope)]];
        let mut diagnostics = Diagnostics::new();
        let ay = mix(&[timeline], &map, &mut diagnostics);
        assert_eq!(ay[0][0].envelope_form, 12);
        assert!(ay[0][0].envelope_active());
    }
}

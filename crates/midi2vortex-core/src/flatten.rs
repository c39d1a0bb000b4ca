//! Voice flattener: expands virtual tracks into per-voice row grids under
//! monophonic or polyphonic discipline.
//!
//! Grounded on `original_source/autosiril-go/polyphonic.go::FlattenNotes` for
//! the start/release/continue painting shape; the polyphonic path there is a
//! stub (comment: "simplified version... would need to collect simultaneous
//! notes") so the chord-collecting rules here follow spec.md directly instead.

use std::collections::BTreeMap;

use crate::config::{ChannelSettings, InstrumentKind};
use crate::constants::note_to_pitch_octave;
use crate::midi::VirtualNote;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Empty,
    Start,
    Release,
    Continue,
}

/// One cell in a per-voice, per-row grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineNote {
    pub note: u8,
    pub volume: u8,
    pub state: CellState,
    pub pitch_class: usize,
    pub display_octave: u8,
    pub kind: InstrumentKind,
    pub chord_members: Option<Vec<u8>>,
    pub ornament_id: u16,
}

impl TimelineNote {
    fn empty(kind: InstrumentKind) -> Self {
        Self {
            note: 0,
            volume: 0,
            state: CellState::Empty,
            pitch_class: 0,
            display_octave: 0,
            kind,
            chord_members: None,
            ornament_id: 0,
        }
    }

    pub(crate) fn start(note: u8, volume: u8, kind: InstrumentKind, chord: bool) -> Self {
        let (pitch_class, display_octave) = note_to_pitch_octave(note);
        Self {
            note,
            volume,
            state: CellState::Start,
            pitch_class,
            display_octave,
            kind,
            chord_members: if chord { Some(vec![note]) } else { None },
            ornament_id: 0,
        }
    }

    fn release(note: u8, volume: u8, kind: InstrumentKind) -> Self {
        let (pitch_class, display_octave) = note_to_pitch_octave(note);
        Self {
            note,
            volume,
            state: CellState::Release,
            pitch_class,
            display_octave,
            kind,
            chord_members: None,
            ornament_id: 0,
        }
    }

    fn continue_cell(note: u8, volume: u8, kind: InstrumentKind) -> Self {
        let (pitch_class, display_octave) = note_to_pitch_octave(note);
        Self {
            note,
            volume,
            state: CellState::Continue,
            pitch_class,
            display_octave,
            kind,
            chord_members: None,
            ornament_id: 0,
        }
    }

    fn set_note(&mut self, note: u8) {
        self.note = note;
        let (pitch_class, display_octave) = note_to_pitch_octave(note);
        self.pitch_class = pitch_class;
        self.display_octave = display_octave;
    }
}

/// Expand every voice named by `channel_map` into its own timeline, in
/// left-to-right (ay group, voice) order.
pub fn flatten(
    notes: &[VirtualNote],
    max_row: u32,
    skip_lines: u32,
    channel_map: &[Vec<ChannelSettings>],
) -> Vec<Vec<TimelineNote>> {
    let mut by_track: BTreeMap<usize, Vec<&VirtualNote>> = BTreeMap::new();
    for note in notes {
        by_track.entry(note.track).or_default().push(note);
    }

    let len = (max_row + skip_lines + 1) as usize;
    let empty_slice: Vec<&VirtualNote> = Vec::new();

    channel_map
        .iter()
        .flat_map(|ay_group| ay_group.iter())
        .map(|settings| {
            let track_notes = by_track.get(&settings.track).unwrap_or(&empty_slice);
            let mut timeline = vec![TimelineNote::empty(settings.kind); len];
            match settings.kind {
                InstrumentKind::Poly => paint_poly(&mut timeline, track_notes, skip_lines),
                InstrumentKind::Mono | InstrumentKind::Drum | InstrumentKind::Envelope => {
                    paint_mono(&mut timeline, track_notes, settings.kind, skip_lines)
                }
            }
            timeline
        })
        .collect()
}

fn span(note: &VirtualNote, skip_lines: u32, len: usize) -> Option<(usize, usize)> {
    let start = (note.start + skip_lines) as usize;
    if start >= len {
        return None;
    }
    let end = (note.off + skip_lines) as usize;
    let last = end.saturating_sub(1).min(len - 1);
    Some((start, last))
}

fn paint_mono(
    timeline: &mut [TimelineNote],
    track_notes: &[&VirtualNote],
    kind: InstrumentKind,
    skip_lines: u32,
) {
    for note in track_notes {
        let Some((start, last)) = span(note, skip_lines, timeline.len()) else {
            continue;
        };

        if timeline[start].state == CellState::Empty || note.note > timeline[start].note {
            timeline[start] = TimelineNote::start(note.note, note.velocity, kind, false);
        }

        if last != start && timeline[last].state == CellState::Empty {
            timeline[last] = TimelineNote::release(note.note, note.velocity, kind);
        }
        // Interior cells stay empty: continues are not represented monophonically.
    }
}

fn paint_poly(timeline: &mut [TimelineNote], track_notes: &[&VirtualNote], skip_lines: u32) {
    for note in track_notes {
        let Some((start, last)) = span(note, skip_lines, timeline.len()) else {
            continue;
        };

        match timeline[start].state {
            CellState::Empty => {
                timeline[start] =
                    TimelineNote::start(note.note, note.velocity, InstrumentKind::Poly, true);
            }
            CellState::Start => {
                let cell = &mut timeline[start];
                let members = cell.chord_members.get_or_insert_with(Vec::new);
                members.push(note.note);
                let base = *members.iter().min().unwrap();
                cell.set_note(base);
                cell.volume = cell.volume.max(note.velocity);
            }
            _ => {}
        }

        if last != start && timeline[last].state == CellState::Empty {
            timeline[last] =
                TimelineNote::release(note.note, note.velocity, InstrumentKind::Poly);
        }

        for cell in timeline.iter_mut().take(last).skip(start + 1) {
            if cell.state == CellState::Empty {
                *cell = TimelineNote::continue_cell(note.note, note.velocity, InstrumentKind::Poly);
            }
        }
    }
}

//! MIDI loader: parses a standard MIDI file into [`VirtualNote`]s quantised to
//! tracker rows.
//!
//! Grounded on `midi-analysis::analyze::extract_notes`'s pending-stack
//! note-on/off pairing, adapted to per-track row quantisation instead of a
//! single tick-based timeline.

use midly::{MidiMessage, Smf, Timing, TrackEventKind};
use std::collections::HashMap;

use crate::error::ConvertError;

/// A note as extracted from MIDI, before any voice assignment: source track,
/// pitch, start velocity, and row span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualNote {
    pub note: u8,
    pub velocity: u8,
    pub start: u32,
    pub off: u32,
    pub track: usize,
}

impl VirtualNote {
    pub fn length(&self) -> u32 {
        self.off - self.start
    }
}

/// Result of loading a MIDI file: every surviving note plus the highest row
/// any note reaches (drives timeline allocation in the flattener).
pub struct LoadedMidi {
    pub notes: Vec<VirtualNote>,
    pub max_row: u32,
}

/// Parse `bytes` as a standard MIDI file and quantise every note-on/off pair
/// to tracker rows at `per_beat` rows per quarter note.
pub fn load(bytes: &[u8], per_beat: u32) -> Result<LoadedMidi, ConvertError> {
    let smf = Smf::parse(bytes).map_err(|e| ConvertError::MidiReadFailure(e.to_string()))?;

    let ticks_per_quarter = match smf.header.timing {
        Timing::Metrical(ticks) => ticks.as_int() as u32,
        Timing::Timecode(..) => return Err(ConvertError::UnsupportedTimeFormat),
    };
    let clocks_per_row = ticks_per_quarter / per_beat;

    let mut notes = Vec::new();
    let mut max_row = 0u32;

    for (track_index, track) in smf.tracks.iter().enumerate() {
        let mut cursor: u32 = 0;
        let mut pending: HashMap<u8, Vec<(u32, u8)>> = HashMap::new();

        let to_row = |tick: u32| -> u32 { ((tick as f64 / clocks_per_row as f64).round()) as u32 };

        for event in track {
            cursor += event.delta.as_int();

            if let TrackEventKind::Midi { message, .. } = event.kind {
                match message {
                    MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                        pending
                            .entry(key.as_int())
                            .or_default()
                            .push((cursor, vel.as_int()));
                    }
                    MidiMessage::NoteOff { key, .. } | MidiMessage::NoteOn { key, .. } => {
                        if let Some(stack) = pending.get_mut(&key.as_int()) {
                            if let Some((onset, velocity)) = stack.pop() {
                                push_note(
                                    &mut notes,
                                    &mut max_row,
                                    key.as_int(),
                                    velocity,
                                    to_row(onset),
                                    to_row(cursor),
                                    track_index,
                                );
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        let final_row = to_row(cursor);
        for (pitch, stack) in pending {
            for (onset, velocity) in stack {
                push_note(
                    &mut notes,
                    &mut max_row,
                    pitch,
                    velocity,
                    to_row(onset),
                    final_row,
                    track_index,
                );
            }
        }
    }

    Ok(LoadedMidi { notes, max_row })
}

fn push_note(
    notes: &mut Vec<VirtualNote>,
    max_row: &mut u32,
    note: u8,
    velocity: u8,
    start: u32,
    off: u32,
    track: usize,
) {
    if off <= start {
        return;
    }
    *max_row = (*max_row).max(off);
    notes.push(VirtualNote {
        note,
        velocity,
        start,
        off,
        track,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_smf(ppq: u16, events: Vec<u8>) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"MThd");
        buf.extend_from_slice(&6u32.to_be_bytes());
        buf.extend_from_slice(&0u16.to_be_bytes());
        buf.extend_from_slice(&1u16.to_be_bytes());
        buf.extend_from_slice(&ppq.to_be_bytes());

        buf.extend_from_slice(b"MTrk");
        buf.extend_from_slice(&(events.len() as u32).to_be_bytes());
        buf.extend_from_slice(&events);
        buf
    }

    #[test]
    fn pairs_a_single_note() {
        let mut events = Vec::new();
        events.extend_from_slice(&[0x00, 0x90, 60, 100]);
        events.extend_from_slice(&[0x83, 0x60, 0x80, 60, 0]); // +480 ticks
        events.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

        let midi = minimal_smf(480, events);
        let loaded = load(&midi, 4).unwrap();

        assert_eq!(loaded.notes.len(), 1);
        assert_eq!(loaded.notes[0].note, 60);
        assert_eq!(loaded.notes[0].start, 0);
        assert_eq!(loaded.notes[0].off, 4);
        assert_eq!(loaded.max_row, 4);
    }

    #[test]
    fn rejects_smpte_timing() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"MThd");
        buf.extend_from_slice(&6u32.to_be_bytes());
        buf.extend_from_slice(&0u16.to_be_bytes());
        buf.extend_from_slice(&1u16.to_be_bytes());
        buf.extend_from_slice(&[0xE8, 0x00]); // negative high byte -> SMPTE division
        buf.extend_from_slice(b"MTrk");
        buf.extend_from_slice(&4u32.to_be_bytes());
        buf.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

        let err = load(&buf, 4).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedTimeFormat));
    }

    #[test]
    fn discards_zero_length_notes() {
        let mut events = Vec::new();
        // note on and off at the same tick, well inside one row.
        events.extend_from_slice(&[0x00, 0x90, 60, 100]);
        events.extend_from_slice(&[0x00, 0x80, 60, 0]);
        events.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

        let midi = minimal_smf(480, events);
        let loaded = load(&midi, 4).unwrap();
        assert!(loaded.notes.is_empty());
    }

    #[test]
    fn closes_unclosed_notes_at_end_of_track() {
        let mut events = Vec::new();
        events.extend_from_slice(&[0x00, 0x90, 60, 100]);
        events.extend_from_slice(&[0x83, 0x60, 0xFF, 0x2F, 0x00]); // end of track, note never released
        let midi = minimal_smf(480, events);
        let loaded = load(&midi, 4).unwrap();
        assert_eq!(loaded.notes.len(), 1);
        assert_eq!(loaded.notes[0].off, 4);
    }

    #[test]
    fn retriggers_pair_lifo() {
        let mut events = Vec::new();
        events.extend_from_slice(&[0x00, 0x90, 60, 100]); // onset 0
        events.extend_from_slice(&[0x00, 0x90, 60, 80]); // onset 0, retrigger
        events.extend_from_slice(&[0x83, 0x60, 0x80, 60, 0]); // off at 480 -> pairs w/ second onset
        events.extend_from_slice(&[0x83, 0x60, 0x80, 60, 0]); // off at 960 -> pairs w/ first onset
        events.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

        let midi = minimal_smf(480, events);
        let loaded = load(&midi, 4).unwrap();
        assert_eq!(loaded.notes.len(), 2);
        assert_eq!(loaded.notes[0].velocity, 80);
        assert_eq!(loaded.notes[0].start, 0);
        assert_eq!(loaded.notes[0].off, 4);
        assert_eq!(loaded.notes[1].velocity, 100);
        assert_eq!(loaded.notes[1].start, 0);
        assert_eq!(loaded.notes[1].off, 8);
    }
}

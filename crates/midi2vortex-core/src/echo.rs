//! Echo layer: overlays attenuated, delayed copies of each start note onto
//! its own voice's timeline.
//!
//! `original_source/autosiril-go/echo.go::ApplyEcho` is a no-op stub (its own
//! comment: "For simplified implementation, just return the timelines
//! as-is"); the delay/attenuation/modifier rules here follow spec.md directly.

use crate::config::ChannelSettings;
use crate::flatten::{CellState, TimelineNote};

/// Stamp primary (and, for `w`-modified voices, secondary) echo copies into
/// every voice's own timeline. Runs after flattening, before mixing.
pub fn apply_echo(
    timelines: &mut [Vec<TimelineNote>],
    channel_map: &[Vec<ChannelSettings>],
    per_delay: u32,
    per_delay2: u32,
) {
    let voices = channel_map.iter().flat_map(|group| group.iter());

    for (timeline, settings) in timelines.iter_mut().zip(voices) {
        if settings.modifiers.mute_echo {
            continue;
        }

        let starts: Vec<(usize, u8, u8)> = timeline
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.state == CellState::Start)
            .map(|(row, cell)| (row, cell.note, cell.volume))
            .collect();

        for (row, note, volume) in starts {
            stamp(timeline, row + per_delay as usize, note, volume, 0.7, settings);
            if settings.modifiers.double_echo {
                stamp(timeline, row + per_delay2 as usize, note, volume, 0.49, settings);
            }
        }
    }
}

fn stamp(timeline: &mut [TimelineNote], row: usize, note: u8, volume: u8, factor: f64, settings: &ChannelSettings) {
    if row >= timeline.len() || timeline[row].state != CellState::Empty {
        return;
    }
    let echo_volume = ((volume as f64 * factor).floor() as i32).max(1) as u8;
    timeline[row] = TimelineNote::start(note, echo_volume, settings.kind, false);
}

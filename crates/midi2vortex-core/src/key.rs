//! Key detector and diatonic transposer.
//!
//! Grounded on `original_source/autosiril-go/key.go`'s histogram/penalty
//! scoring and transpose-pattern walk; enrichment (pitch-class histogram framing)
//! cross-checked against `music-understand::key::detect_key`'s rotate-then-score
//! shape, though that crate correlates against Krumhansl-Kessler profiles while
//! this detector uses the simpler non-diatonic-mass penalty spec.md specifies.

use crate::constants::{DIATONIC_TRANSPOSE_DOWN, DIATONIC_TRANSPOSE_UP, MAJOR_SCALE_PENALTY};
use crate::midi::VirtualNote;

/// Detect the major key (0-11) from a pitch-class histogram, or accept the
/// configured key verbatim when `real_key < 12`.
pub fn detect_key(notes: &[VirtualNote], real_key: i32) -> i32 {
    if real_key < 12 {
        return real_key;
    }

    let mut histogram = [0i32; 12];
    for note in notes {
        histogram[(note.note % 12) as usize] += 1;
    }

    let mut best_key = 0usize;
    let mut best_penalty = i32::MAX;
    for key in 0..12usize {
        let mut penalty = 0;
        for (pitch, &count) in histogram.iter().enumerate() {
            let scale_position = (pitch + 12 - key) % 12;
            penalty += count * MAJOR_SCALE_PENALTY[scale_position];
        }
        if penalty < best_penalty {
            best_penalty = penalty;
            best_key = key;
        }
    }

    best_key as i32
}

/// Apply signed diatonic transposition to every note, in place.
pub fn transpose(notes: &mut [VirtualNote], detected_key: i32, diatonic_transpose: i32) {
    if diatonic_transpose == 0 {
        return;
    }

    let steps = diatonic_transpose.unsigned_abs();
    let pattern = if diatonic_transpose > 0 {
        &DIATONIC_TRANSPOSE_UP
    } else {
        &DIATONIC_TRANSPOSE_DOWN
    };

    for note in notes.iter_mut() {
        let mut current = note.note as i32;
        for _ in 0..steps {
            let pitch = current.rem_euclid(12);
            let adjusted = (pitch - detected_key).rem_euclid(12) as usize;
            current += pattern[adjusted];
        }
        note.note = current.clamp(0, 127) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(pitch: u8) -> VirtualNote {
        VirtualNote {
            note: pitch,
            velocity: 100,
            start: 0,
            off: 4,
            track: 0,
        }
    }

    #[test]
    fn real_key_below_twelve_is_verbatim() {
        assert_eq!(detect_key(&[], 3), 3);
    }

    #[test]
    fn detects_c_major_from_its_scale() {
        let notes: Vec<_> = [60, 62, 64, 65, 67, 69, 71].into_iter().map(note).collect();
        assert_eq!(detect_key(&notes, 13), 0);
    }

    #[test]
    fn a_minor_input_ties_to_lowest_numeric_key() {
        // Pitch classes from the white keys: penalty mask admits both C and Am
        // equally, the numeric tie-break should select C (0).
        let notes: Vec<_> = [57, 59, 60, 62, 64, 65, 67].into_iter().map(note).collect();
        assert_eq!(detect_key(&notes, 13), 0);
    }

    #[test]
    fn zero_transpose_is_a_no_op() {
        let mut notes = vec![note(60)];
        transpose(&mut notes, 0, 0);
        assert_eq!(notes[0].note, 60);
    }

    #[test]
    fn transposes_up_two_diatonic_steps_in_c_major() {
        let mut notes: Vec<_> = [60, 62, 64, 65].into_iter().map(note).collect();
        transpose(&mut notes, 0, 2);
        let result: Vec<u8> = notes.iter().map(|n| n.note).collect();
        assert_eq!(result, vec![64, 65, 67, 69]);
    }
}

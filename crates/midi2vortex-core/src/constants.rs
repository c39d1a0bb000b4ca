//! Static lookup tables: pitch names, the tracker's parameter alphabet, the
//! envelope-generator tuning tables, the drum remap tables, and the diatonic
//! transposition step patterns.
//!
//! These are chip- and tool-specific calibration data, not derived values — see
//! `original_source/autosiril-go/constants.go`.

/// Note names for pitch classes 0-11, VortexTracker spelling (`C-`, not `C`).
pub const PITCHES: [&str; 12] = [
    "C-", "C#", "D-", "D#", "E-", "F-", "F#", "G-", "G#", "A-", "A#", "B-",
];

/// The 32-symbol parameter alphabet used for sample/ornament/envelope/volume
/// cells: `.` encodes 0, then `1`-`9`, then `A`-`V`.
pub const PARAMS: [char; 32] = [
    '.', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I',
    'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V',
];

/// Render `value` (clamped into `0..32`) as a single parameter-alphabet character.
pub fn param_char(value: u32) -> char {
    PARAMS[(value as usize).min(PARAMS.len() - 1)]
}

/// Parse a single parameter-alphabet character back to its numeric value.
/// Case-insensitive: letter slots (`A`-`V`) also accept their lowercase form.
pub fn parse_param_char(c: char) -> Option<u32> {
    let upper = c.to_ascii_uppercase();
    PARAMS.iter().position(|&p| p == upper).map(|i| i as u32)
}

/// Envelope-generator pitch offset (semitones) by MIDI note number, 0-127.
///
/// Envelopes are tonally audible roughly from octave 2 upward; below that the
/// chip's envelope period can't track a musical pitch, so low notes are pushed
/// up (or simply muted via the envelope form table below).
#[rustfmt::skip]
pub const ENV_OFFSETS: [i32; 128] = [
    // Octave -1
    24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24,
    // Octave 0
    24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24,
    // Octave 1
    24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24, 24,
    // Octave 2
    24, 24, 24, 24, 24, 24, 24, 24, 24, 12, 12, 24,
    // Octave 3
    0, 12, 12, 12, 12, 12, 12, 12, 12, 0, 0, 12,
    // Octave 4
    -12, 0, 0, 0, 0, 0, -12, 0, 0, -12, -12, 0,
    // Octave 5
    -24, -12, -12, -12, -12, -12, -24, -12, -12, -24, -24, -12,
    // Octave 6
    -36, -24, -24, -24, -24, -24, -36, -24, -24, -24, -48, -24,
    // Octave 7
    -48, -36, -36, -36, -36, -36, -48, -36, -36, -36, -52, -36,
    // Octave 8
    -52, -48, -48, -48, -48, -48, -52, -48, -48, -48, -60, -48,
    // Octave 9
    -60, -52, -52, -52, -52, -52, -60, -52, -52, -52, -72, -52,
    // Octave 10
    -72, -60, -60, -60, -60, -60, -72, -60, -60, -60, -84, -60,
];

/// Envelope form code by MIDI note number, 0-127. Forms `1..=14` are active
/// shapes; the table never produces anything outside `{10, 12}` but `0`/`15`
/// are reachable via the mixer's own defaulting, hence the `[1, 14]` range
/// check in [`crate::envelope::is_active`] rather than a narrower one here.
#[rustfmt::skip]
pub const ENV_FORMS: [i32; 128] = [
    10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, // -1
    10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, // 0
    10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, // 1
    10, 10, 10, 10, 10, 10, 10, 10, 10, 12, 12, 10, // 2
    12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, // 3
    12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, // 4
    12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, // 5
    12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, // 6
    12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, // 7
    12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, // 8
    12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, // 9
    12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, 12, // 10
];

/// Drum sample id by source MIDI note, 0-127 (`d`-kind voices only).
#[rustfmt::skip]
pub const NOTE_TO_DRUM_SAMPLE: [u32; 128] = [
    10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, // -1
    10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, // 0
    10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, 10, // 1
    10, 27, 12, 11, 31, 9, 10, 9, 21, 9, 27, 9,      // 2
    21, 21, 21, 21, 21, 21, 21, 21, 21, 19, 21, 21,  // 3
    21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21,  // 4
    21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21,  // 5
    21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21,  // 6
    21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21,  // 7
    21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21,  // 8
    21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21,  // 9
    21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21, 21,  // 10
];

/// Drum display note (remapped MIDI note) by source MIDI note, 0-127.
#[rustfmt::skip]
pub const NOTE_TO_DRUM_NOTE: [u8; 128] = [
    60, 60, 60, 60, 60, 60, 60, 60, 60, 60, 60, 60,  // -1
    60, 60, 60, 60, 60, 60, 60, 60, 60, 60, 60, 60,  // 0
    60, 60, 60, 60, 60, 60, 60, 60, 60, 60, 60, 60,  // 1
    60, 60, 60, 60, 78, 48, 48, 60, 60, 60, 48, 63,  // 2
    60, 60, 60, 60, 60, 60, 60, 60, 60, 119, 60, 60, // 3
    60, 60, 60, 60, 60, 60, 60, 60, 60, 60, 60, 60,  // 4
    60, 60, 60, 60, 60, 60, 60, 60, 60, 60, 60, 60,  // 5
    60, 60, 60, 60, 60, 60, 60, 60, 60, 60, 60, 60,  // 6
    60, 60, 60, 60, 60, 60, 60, 60, 60, 60, 60, 60,  // 7
    60, 60, 60, 60, 60, 60, 60, 60, 60, 60, 60, 60,  // 8
    60, 60, 60, 60, 60, 60, 60, 60, 60, 60, 60, 60,  // 9
    60, 60, 60, 60, 60, 60, 60, 60, 60, 60, 60, 60,  // 10
];

/// Major-scale penalty mask: `1` on every non-diatonic scale degree relative
/// to a candidate tonic, `0` on diatonic degrees.
pub const MAJOR_SCALE_PENALTY: [i32; 12] = [0, 1, 0, 1, 0, 0, 1, 0, 1, 0, 1, 0];

/// Diatonic step pattern for upward transposition, indexed by pitch-class
/// relative to the detected key.
pub const DIATONIC_TRANSPOSE_UP: [i32; 12] = [2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 1];

/// Diatonic step pattern for downward transposition, indexed the same way.
pub const DIATONIC_TRANSPOSE_DOWN: [i32; 12] = [-1, -2, -2, -2, -2, -1, -2, -2, -2, -2, -2, -2];

/// Convert a MIDI note number to a (pitch-class, display-octave) pair,
/// clamped to the tracker's displayable octave range `0..=8`.
pub fn note_to_pitch_octave(note: u8) -> (usize, u8) {
    let note = note as i32;
    let pitch = (note.rem_euclid(12)) as usize;
    let raw_octave = note / 12;
    let octave = raw_octave.clamp(0, 8) as u8;
    (pitch, octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_round_trips() {
        for (i, &c) in PARAMS.iter().enumerate() {
            assert_eq!(parse_param_char(c), Some(i as u32));
        }
    }

    #[test]
    fn note_to_pitch_octave_middle_c() {
        assert_eq!(note_to_pitch_octave(60), (0, 5));
    }

    #[test]
    fn note_to_pitch_octave_clamps_low() {
        assert_eq!(note_to_pitch_octave(0), (0, 0));
    }

    #[test]
    fn note_to_pitch_octave_clamps_high() {
        assert_eq!(note_to_pitch_octave(127), (7, 8));
    }
}

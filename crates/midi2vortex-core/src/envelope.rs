//! Envelope mapper: per-note lookup producing an envelope-generator pitch,
//! octave, and form code for envelope-kind voices.
//!
//! Grounded on `original_source/autosiril-go/types.go::NewVortexNote`'s
//! envelope-pitch/octave derivation and `constants.go`'s `EnvOffsets`/`EnvForms`.

use crate::constants::{note_to_pitch_octave, ENV_FORMS, ENV_OFFSETS};

/// Result of the per-note envelope lookup.
pub struct EnvelopeLookup {
    pub form: i32,
    pub pitch_class: usize,
    pub display_octave: u8,
}

/// Look up the envelope form and displayed envelope note for source `note`.
pub fn lookup(note: u8) -> EnvelopeLookup {
    let idx = note as usize;
    let offset = ENV_OFFSETS[idx];
    let form = ENV_FORMS[idx];
    let envelope_note = (note as i32 + offset).clamp(0, 127) as u8;
    let (pitch_class, display_octave) = note_to_pitch_octave(envelope_note);
    EnvelopeLookup {
        form,
        pitch_class,
        display_octave,
    }
}

/// Whether `form` alone describes an audibly active envelope shape
/// (`[1, 14]`). Combine with the caller's own instrument-kind and cell-state
/// check — this function does not see either.
pub fn is_active(form: i32) -> bool {
    (1..=14).contains(&form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_c_envelope_form_is_twelve() {
        let result = lookup(60);
        assert_eq!(result.form, 12);
        assert_eq!(result.pitch_class, 0);
        assert_eq!(result.display_octave, 4);
        assert!(is_active(result.form));
    }

    #[test]
    fn very_low_notes_are_pushed_up_an_octave() {
        let result = lookup(0);
        assert_eq!(result.form, 10);
    }

    #[test]
    fn form_outside_one_to_fourteen_is_not_active() {
        assert!(!is_active(0));
        assert!(!is_active(15));
    }
}

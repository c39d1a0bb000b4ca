//! Derives the output module filename from the input MIDI path.
//!
//! Grounded on `original_source/autosiril-go/main.go::generateOutputFilename`:
//! strip the input extension, insert `d<N>` when a diatonic transpose was
//! applied, append `e.txt`.

use std::path::Path;

/// Build the output path for `input_path` given the run's diatonic transpose.
pub fn derive_output_path(input_path: &str, diatonic_transpose: i32) -> String {
    let stem = Path::new(input_path)
        .with_extension("")
        .to_string_lossy()
        .into_owned();

    if diatonic_transpose != 0 {
        format!("{}d{}e.txt", stem, diatonic_transpose)
    } else {
        format!("{}e.txt", stem)
    }
}

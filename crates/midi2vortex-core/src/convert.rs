//! Pipeline orchestration: threads a MIDI byte stream and a [`Config`] through
//! every stage into a serialised VortexTracker II module.
//!
//! Grounded on `original_source/autosiril-go/main.go`'s top-level call order
//! (load, detect key, transpose, parse channel map, flatten, echo, intern
//! ornaments, mix, write).

use chrono::NaiveDate;

use crate::channel_map;
use crate::config::Config;
use crate::diagnostics::Diagnostics;
use crate::echo;
use crate::error::ConvertError;
use crate::flatten;
use crate::key;
use crate::midi;
use crate::mixer;
use crate::ornament;
use crate::output::{self, ModuleOutput};

/// Run the full MIDI-to-VortexTracker-II pipeline.
pub fn convert(bytes: &[u8], config: &Config, today: NaiveDate) -> Result<ModuleOutput, ConvertError> {
    let mut diagnostics = Diagnostics::new();

    let loaded = midi::load(bytes, config.per_beat)?;
    if loaded.notes.is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    let mut notes = loaded.notes;
    let detected_key = key::detect_key(&notes, config.real_key);
    key::transpose(&mut notes, detected_key, config.diatonic_transpose);

    let channel_map = channel_map::parse(&config.channel_map)?;

    let mut timelines = flatten::flatten(&notes, loaded.max_row, config.skip_lines, &channel_map);

    echo::apply_echo(&mut timelines, &channel_map, config.per_delay, config.per_delay2);

    let interner = ornament::intern_ornaments(
        &mut timelines,
        config.max_offset,
        config.orn_repeat,
        &mut diagnostics,
    );

    let ay_channels = mixer::mix(&timelines, &channel_map, &mut diagnostics);

    Ok(output::serialize(config, today, &ay_channels, &interner, diagnostics))
}

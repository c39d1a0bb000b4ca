//! Output serialiser: emits the module header, ornament blocks, the static
//! sample library, and the row-oriented pattern blocks as VortexTracker II
//! module text.
//!
//! Grounded on `original_source/autosiril-go/output.go`. The 31 `[SampleN]`
//! blocks are copied verbatim from `writeSamples` (spec.md §9 calls this a
//! "compile-time literal table... not a data file"). The ornament-block body
//! departs from `writeOrnaments`, which re-parses its own canonical string and
//! re-prepends a literal `"L0"` — double-counting the leading zero offset
//! already present in the canonical form; spec.md §4.9 just wants the
//! interned canonical string written back out, so that's what this does.

use chrono::NaiveDate;

use crate::config::Config;
use crate::constants::{param_char, PITCHES};
use crate::diagnostics::Diagnostics;
use crate::mixer::VortexNote;
use crate::ornament::OrnamentInterner;

use crate::flatten::CellState;

/// Fully serialised VortexTracker II module text, plus the non-fatal
/// diagnostics collected while producing it.
pub struct ModuleOutput {
    pub text: String,
    pub diagnostics: Diagnostics,
}

const SAMPLE_BLOCKS: [&str; 31] = [
    "[Sample1]\nTnE +000_ +00_ F_\nTnE +000_ +00_ F_\nTnE +000_ +00_ F_\nTnE +000_ +00_ D_\nTnE +000_ +00_ B_\nTnE +000_ +00_ B_ L\n",
    "[Sample2]\nTnE +000_ +00_ F_ L\n",
    "[Sample3]\nTnE +001_ +00_ F_\nTnE +002_ +00_ F_\nTnE +001_ +00_ E_\nTnE +002_ +00_ E_\nTnE +000_ +00_ E_ L\nTnE -001_ +00_ E_\nTnE -002_ +00_ E_\nTnE -001_ +00_ E_\nTnE +000_ +00_ E_\nTnE +001_ +00_ E_\nTnE +002_ +00_ E_\nTnE +001_ +00_ E_\n",
    "[Sample4]\nTnE +002_ +00_ D_\nTnE +002_ +00_ D_\nTnE +002_ +00_ C_\nTnE +002_ +00_ B_\nTnE +002_ +00_ A_ L\nTnE +002_ +00_ A_\nTnE +002_ +00_ A_\nTnE +002_ +00_ A_\nTnE +002_ +00_ A_\nTnE +002_ +00_ A_\nTnE +002_ +00_ A_\nTnE +002_ +00_ A_\n",
    "[Sample5]\nTnE +000_ +00_ F_\nTnE +000_ +00_ F_\ntne +000_ +00_ 0_ L\n",
    "[Sample6]\nTnE -001_ +00_ F_ L\n",
    "[Sample7]\nTnE +006_ +00_ F_ L\n",
    "[Sample8]\ntNe +000_ +00_ F_\ntNe +000_ +00_ B_\ntNe +000_ +00_ 7_\ntNe +000_ +00_ 6- L\n",
    "[Sample9]\nTnE +080_ +00_ F_\nTnE +100_ +00_ E_\nTnE +180_ +00_ E_\nTnE +200_ +00_ E_\nTnE +240_ +00_ D_\nTnE +280_ +00_ D_\nTnE +2C0_ +00_ D_\nTnE +300_ +00_ C_\nTnE +300_ +00_ C_\nTnE +340_ +00_ C_\nTnE +340_ +00_ C_\nTnE +380_ +00_ B_\nTnE +380_ +00_ B_\nTnE +400_ +00_ B_\nTnE +400_ +00_ B_\nTnE +480_ +00_ A_\nTnE +500_ +00_ 9_\nTnE +580_ +00_ 7_\nTnE +600_ +00_ 4_\nTnE +680_ +00_ 1_\nTnE +000_ +00_ 0_ L\n",
    "[Sample10]\nTne +1C0_ +00_ F_\nTne +280_ +00_ E_\nTne +380_ +00_ C_\nTne +440_ +00_ A_\nTne +480_ +00_ 8_\nTnE +000_ +00_ 0_ L\n",
    "[Sample11]\nTNe +200_ -0A_ F_\ntNe +000_ +0F_ A_\nTNe +200_ -07_ E_\ntNe +000_ +0E_ B- L\n",
    "[Sample12]\nTNE +0A0_ +05_ F_\nTNE +140_ +02_ D_\nTNE +140_ +02_ B_\nTNE +100_ +00_ A_ L\nTNE +140_ +00_ A_\nTNE +200_ +00_ A-\n",
    "[Sample13]\nTne +200_ +00_ F_\nTne +2C0_ +00_ F_\nTne +380_ +00_ E_\nTne +500_ +00_ C_\nTne +520_ +00_ 9_\ntne +000_ +00_ 0_ L\n",
    "[Sample14]\nTNE -100_ +00_ F_\nTNE -100_ +00_ D_\nTNE -100_ +00_ A_\nTNE -100_ +00_ 5_\ntne +000_ +00_ 0_ L\n",
    "[Sample15]\nTNE -100_ +00_ 5_\nTNE -100_ +00_ 8_\nTNE -100_ +00_ B_\nTNE -100_ +00_ F_\nTNe -100_ +00_ 9- L\n",
    "[Sample16]\nTnE +000_ +00_ C_\nTnE +000_ +00_ E_\nTnE +000_ +00_ F_\nTnE +000_ +00_ F_\nTnE +000_ +00_ E_\nTnE +000_ +00_ D_\nTnE +000_ +00_ C_\nTnE +000_ +00_ C_ L\nTnE +001_ +00_ C_\nTnE +002_ +00_ C_\nTnE +003_ +00_ C_\nTnE +001_ +00_ C_\nTnE +000_ +00_ C_\nTnE -001_ +00_ C_\nTnE -002_ +00_ C_\nTnE -003_ +00_ C_\nTnE -001_ +00_ C_\nTnE +000_ +00_ C_\nTnE +000_ +00_ C_\n",
    "[Sample17]\nTne +1C0_ +00_ F_\nTne +280_ +00_ D_\nTne +380_ +00_ 7_\nTNE +000_ +00_ 0_ L\n",
    "[Sample18]\nTnE -00C_ +00_ 0_ L\n",
    "[Sample19]\nTNe +000_ +00_ F_\nTNe +000_ +00_ C_\nTNe +000_ +00_ 6_\nTNe +000_ +01_ A- L\n",
    "[Sample20]\nTNE +140_ +00_ F_\ntNE +000_ +00_ B- L\n",
    "[Sample21]\ntNE +000_ +00_ D_\ntNE +000_ +00_ 8_\ntNE +000_ +00_ 1_\nTNE +000_ +00_ 0_ L\n",
    "[Sample22]\nTnE +000_ +00_ D_ L\nTnE +000_ +00_ D_\ntne +000_ +00_ 9_\ntne +000_ +00_ 9_\nTnE +000_ +00_ D_\nTnE +000_ +00_ D_\ntne +000_ +00_ 9_\ntne +000_ +00_ 9_\nTnE +000_ +00_ D_\nTnE +000_ +00_ D_\nTnE +000_ +00_ D_\nTnE +000_ +00_ D_\nTnE +000_ +00_ D_\nTnE +000_ +00_ D_\ntne +000_ +00_ 9_\ntne +000_ +00_ 9_\n",
    "[Sample23]\nTnE +000_ +00_ F_ L\nTnE +010_ +01_ F_\nTnE +010_ +01_ F_\nTnE +010_ +01_ F_\nTnE +010_ +01_ F_\nTnE +000_ +00_ F_\nTnE +000_ +00_ F_\nTnE -010_ -01_ F_\nTnE -010_ -01_ F_\nTnE -010_ -01_ F_\nTnE -010_ -01_ F_\nTnE +000_ +00_ F_\n",
    "[Sample24]\nTNe +000_ -01_ C_\nTNe +000_ -01_ D_\nTNe +000_ -01_ E_\nTNe +000_ -01_ F_\nTNe +000_ -01_ F_\nTNe +000_ -01_ F_\nTNe +000_ -01_ F_\nTNe +000_ -01_ F_\nTNe +000_ -01_ E_\nTNe +000_ -01_ E_\nTNe +000_ -01_ E_\nTNe +000_ -01_ F_\nTNe +000_ -01_ F_ L\n",
    "[Sample25]\nTNE +000_ +00_ F_\nTNE +000_ +00_ F_ L\nTNE +000_ +00_ F_\nTNE +000_ +00_ F_\nTNE +000_ +00_ F-\n",
    "[Sample26]\ntne +000_ +00_ 0_ L\n",
    "[Sample27]\nTnE +100_ +05_ F_\nTnE +200_ +02_ A_\nTnE +300_ +02_ 7_\nTNE +400_ +00_ 3- L\n",
    "[Sample28]\ntne +000_ +00_ 0_ L\n",
    "[Sample29]\ntnE +000_ +00_ 0_ L\n",
    "[Sample30]\nTNE +000_ +00_ C+ L\n",
    "[Sample31]\nTNe +1C0_ +00_ F_\nTne +280_ +00_ E_\nTne +380_ +00_ C_\nTne +440_ +00_ A_\nTne +480_ +00_ 8_\nTnE +000_ +00_ 0_ L\n",
];

/// Render the complete module text from the mixed AY channels and the
/// interned ornament table.
pub fn serialize(
    config: &Config,
    today: NaiveDate,
    ay_channels: &[Vec<VortexNote>; 3],
    interner: &OrnamentInterner,
    diagnostics: Diagnostics,
) -> ModuleOutput {
    let mut text = String::new();

    let pattern_size = pattern_size(config);
    let total_rows = ay_channels[0].len();
    let (patterns, play_order) = build_patterns(ay_channels, pattern_size, total_rows);

    write_header(&mut text, config, today, &play_order);
    write_ornaments(&mut text, interner);
    write_samples(&mut text);
    text.push_str(&patterns);

    ModuleOutput { text, diagnostics }
}

fn pattern_size(config: &Config) -> u32 {
    if config.pattern_size > 0 {
        config.pattern_size
    } else {
        (config.per_beat * 64).min(127)
    }
}

fn write_header(text: &mut String, config: &Config, today: NaiveDate, play_order: &str) {
    text.push_str("[Module]\n");
    text.push_str("VortexTrackerII=0\n");
    text.push_str("Version=3.5\n");
    text.push_str(&format!("Title={}\n", config.channel_map));
    text.push_str(&format!(
        "Author=oisee/siril^4d {}\n",
        today.format("%Y.%m.%d")
    ));
    text.push_str("NoteTable=4\n");
    text.push_str("ChipFreq=1750000\n");
    text.push_str("Speed=4\n");
    text.push_str(&format!("PlayOrder={}\n", play_order));
    text.push_str(&format!(
        "ArgList={} {} {} {} {} {} {} {} {}\n\n\n",
        config.input_path,
        config.channel_map,
        config.per_beat,
        config.per_delay,
        config.per_delay2,
        config.skip_lines,
        config.pattern_size,
        config.orn_repeat,
        config.max_offset,
    ));
}

fn write_ornaments(text: &mut String, interner: &OrnamentInterner) {
    for (id, body) in interner.bodies().iter().enumerate().skip(1) {
        text.push_str(&format!("[Ornament{}]\n{}\n\n", id, body));
    }
}

fn write_samples(text: &mut String) {
    for block in SAMPLE_BLOCKS {
        text.push_str(block);
        text.push('\n');
    }
}

fn build_patterns(
    ay_channels: &[Vec<VortexNote>; 3],
    pattern_size: u32,
    total_rows: usize,
) -> (String, String) {
    if total_rows == 0 {
        return (String::new(), "L0".to_string());
    }

    let pattern_size = pattern_size.max(1) as usize;
    let num_patterns = (total_rows + pattern_size - 1) / pattern_size;

    let mut patterns = String::new();
    let mut play_order = vec!["L0".to_string()];

    for pattern_num in 0..num_patterns {
        patterns.push_str(&format!("[Pattern{}]\n", pattern_num));
        let start = pattern_num * pattern_size;
        let end = (start + pattern_size).min(total_rows);

        for row in start..end {
            patterns.push_str(&format_row(ay_channels, row));
            patterns.push('\n');
        }
        patterns.push('\n');

        if pattern_num > 0 {
            play_order.push(pattern_num.to_string());
        }
    }

    (patterns, play_order.join(","))
}

fn format_row(ay_channels: &[Vec<VortexNote>; 3], row: usize) -> String {
    let mut envelope_note: Option<&VortexNote> = None;
    for channel in ay_channels {
        if let Some(cell) = channel.get(row) {
            if cell.envelope_active() {
                let replace = match envelope_note {
                    None => true,
                    Some(current) => cell.volume > current.volume,
                };
                if replace {
                    envelope_note = Some(cell);
                }
            }
        }
    }

    let envelope_display = match envelope_note {
        Some(note) => format!(" {}{}", PITCHES[note.envelope_pitch_class], note.envelope_display_octave),
        None => "....".to_string(),
    };

    let voices: Vec<String> = ay_channels
        .iter()
        .map(|channel| {
            channel
                .get(row)
                .map(format_voice_cell)
                .unwrap_or_else(|| "--- .... ....".to_string())
        })
        .collect();

    format!("{}|..|{}", envelope_display, voices.join("|"))
}

fn format_voice_cell(note: &VortexNote) -> String {
    match note.state {
        CellState::Empty => "--- .... ....".to_string(),
        CellState::Release => "R-- .... ....".to_string(),
        CellState::Start | CellState::Continue => {
            let nnn = if note.state == CellState::Start {
                format!("{}{}", PITCHES[note.pitch_class], note.display_octave)
            } else {
                "---".to_string()
            };
            let volume = note.volume.clamp(1, 15);
            let sample_char = param_char(note.sample.min(31));
            let envelope_char = param_char((note.envelope_form.rem_euclid(16)) as u32);
            let ornament_char = param_char((note.ornament_id as u32) % 16);
            let volume_char = param_char(volume as u32);
            format!(
                "{} {}{}{}{} ....",
                nnn, sample_char, envelope_char, ornament_char, volume_char
            )
        }
    }
}

//! midi2vortex - command-line front end for the MIDI to VortexTracker II
//! arrangement pipeline.

mod cli_args;
mod output_path;

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use colored::Colorize;

use cli_args::Cli;
use midi2vortex_core::{convert, Config};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let bytes = fs::read(&cli.input)
        .with_context(|| format!("failed to read MIDI file: {}", cli.input))?;

    let config = Config {
        input_path: cli.input.clone(),
        channel_map: cli.channel_map,
        per_beat: cli.per_beat,
        per_delay: cli.per_delay,
        per_delay2: cli.per_delay2,
        pattern_size: cli.pattern_size,
        skip_lines: cli.skip_lines,
        orn_repeat: cli.orn_repeat,
        max_offset: cli.max_offset,
        diatonic_transpose: cli.diatonic_transpose,
        real_key: cli.real_key,
    };

    let today = Local::now().date_naive();
    let module = convert(&bytes, &config, today)
        .map_err(|e| anyhow::anyhow!("[{}] {}", e.code(), e))?;

    let output_path = output_path::derive_output_path(&cli.input, config.diatonic_transpose);
    fs::write(&output_path, &module.text)
        .with_context(|| format!("failed to write module file: {}", output_path))?;

    println!("{} {}", "wrote:".green().bold(), output_path);
    for warning in &module.diagnostics.warnings {
        println!(
            "{} [{}] {}",
            "warning:".yellow().bold(),
            warning.stage,
            warning.message
        );
    }

    Ok(())
}

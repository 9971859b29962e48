//! Render a WAV file to pitch/gate CV.
//!
//! Usage: cvpitch-render <INPUT> <OUTPUT> [OPTIONS]

use clap::Parser;
use cvpitch_dsp::PitchTrackerSettings;
use cvpitch_export::{render_file, RenderOptions, DEFAULT_BLOCK_SIZE};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Convert a monophonic recording into pitch and signal CV.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input WAV file (multichannel input is averaged to mono).
    input: PathBuf,

    /// Output WAV file: channel 1 pitch CV, channel 2 signal CV.
    output: PathBuf,

    /// Frames per processing block.
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Input gain applied before analysis.
    #[arg(long)]
    sensitivity: Option<f32>,

    /// Minimum pitch confidence in percent.
    #[arg(long)]
    threshold: Option<f32>,

    /// Estimator tolerance in percent.
    #[arg(long)]
    tolerance: Option<f32>,

    /// Octave shift, -4 to 4.
    #[arg(long, allow_hyphen_values = true, value_parser = clap::value_parser!(i32).range(-4..=4))]
    octave: Option<i32>,

    /// Keep the last pitch when detection fails.
    #[arg(long, default_value_t = false)]
    hold: bool,

    /// Shift output back by the processing latency.
    #[arg(long, default_value_t = false)]
    compensate_latency: bool,
}

impl Cli {
    fn settings(&self) -> PitchTrackerSettings {
        let defaults = PitchTrackerSettings::default();
        PitchTrackerSettings {
            sensitivity: self.sensitivity.unwrap_or(defaults.sensitivity),
            confidence_threshold: self.threshold.unwrap_or(defaults.confidence_threshold),
            tolerance: self.tolerance.unwrap_or(defaults.tolerance),
            octave: self.octave.unwrap_or(defaults.octave),
            hold_output_pitch: self.hold,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let options = RenderOptions::default()
        .block_size(cli.block_size)
        .settings(cli.settings())
        .compensate_latency(cli.compensate_latency);

    match render_file(&cli.input, &cli.output, &options) {
        Ok(summary) => {
            tracing::info!(
                "{} frames, latency {} samples",
                summary.frames,
                summary.latency
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Render failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

//! Offline rendering through the processing unit.

use crate::error::{ExportError, Result};
use crate::wav::{read_mono, write_cv};
use cvpitch_core::TrackerConfig;
use cvpitch_dsp::{AudioToCvPitch, PitchTrackerSettings};
use std::path::Path;

pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Render options.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Frames per `run` call, as a host would deliver them.
    pub block_size: usize,
    pub settings: PitchTrackerSettings,
    pub config: TrackerConfig,
    /// Shift the output back by the unit's latency so CV lines up with the input.
    pub compensate_latency: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            settings: PitchTrackerSettings::default(),
            config: TrackerConfig::default(),
            compensate_latency: false,
        }
    }
}

impl RenderOptions {
    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn settings(mut self, settings: PitchTrackerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn compensate_latency(mut self, compensate: bool) -> Self {
        self.compensate_latency = compensate;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    /// Output frames written.
    pub frames: usize,
    /// Analysis windows evaluated.
    pub windows: u64,
    /// Windows whose pitch passed the confidence gate.
    pub voiced_windows: u64,
    /// Unit latency in samples.
    pub latency: usize,
}

/// Rendered CV channels.
#[derive(Debug, Clone, PartialEq)]
pub struct CvRender {
    pub pitch: Vec<f32>,
    pub gate: Vec<f32>,
    pub summary: RenderSummary,
}

/// Run `samples` through a fresh unit in `block_size` blocks.
pub fn render_samples(samples: &[f32], sample_rate: u32, options: &RenderOptions) -> Result<CvRender> {
    if options.block_size == 0 {
        return Err(ExportError::InvalidOptions("block size must be non-zero".into()));
    }

    let mut unit =
        AudioToCvPitch::with_factory(options.config.clone(), sample_rate as f64, &options.settings)?;
    unit.activate();

    let latency = unit.latency();
    let tail = if options.compensate_latency { latency } else { 0 };
    let total = samples.len() + tail;

    let mut pitch = vec![0.0f32; total];
    let mut gate = vec![0.0f32; total];
    let mut input = vec![0.0f32; options.block_size];

    let mut start = 0;
    while start < total {
        let end = (start + options.block_size).min(total);
        let len = end - start;

        // Past the end of the source the block is silence
        input[..len].fill(0.0);
        if start < samples.len() {
            let src_end = end.min(samples.len());
            input[..src_end - start].copy_from_slice(&samples[start..src_end]);
        }

        unit.run(&input[..len], &mut pitch[start..end], &mut gate[start..end]);
        start = end;
    }

    if tail > 0 {
        pitch.drain(..tail);
        gate.drain(..tail);
    }

    let stats = unit.tracker().stats();
    let summary = RenderSummary {
        frames: pitch.len(),
        windows: stats.windows,
        voiced_windows: stats.accepted,
        latency,
    };

    tracing::debug!(
        "Rendered {} frames: {} windows, {} voiced",
        summary.frames,
        summary.windows,
        summary.voiced_windows
    );

    Ok(CvRender {
        pitch,
        gate,
        summary,
    })
}

/// Render a WAV file to a 2-channel (pitch, signal) float WAV at the input rate.
pub fn render_file(input: &Path, output: &Path, options: &RenderOptions) -> Result<RenderSummary> {
    let audio = read_mono(input)?;
    tracing::info!(
        "Rendering {} ({} frames at {} Hz)",
        input.display(),
        audio.samples.len(),
        audio.sample_rate
    );

    let render = render_samples(&audio.samples, audio.sample_rate, options)?;
    write_cv(output, &render.pitch, &render.gate, audio.sample_rate)?;

    tracing::info!(
        "Wrote {} ({} of {} windows voiced)",
        output.display(),
        render.summary.voiced_windows,
        render.summary.windows
    );

    Ok(render.summary)
}

//! Builder for configuring and constructing an `AudioToCvPitch` unit.

use crate::{Error, Result};
use cvpitch_analysis::EstimatorFactory;
use cvpitch_core::{Algorithm, TrackerConfig};
use cvpitch_dsp::{AudioToCvPitch, PitchTrackerSettings};

/// Builds a processing unit with either a built-in estimator or a custom factory.
///
/// # Example
///
/// ```rust
/// use cvpitch::prelude::*;
///
/// let unit = PitchTrackerBuilder::new()
///     .sample_rate(44100.0)
///     .octave(0)
///     .hold_output_pitch(true)
///     .build()?;
///
/// assert_eq!(unit.latency(), BUFFER_SIZE);
/// # Ok::<(), cvpitch::Error>(())
/// ```
pub struct PitchTrackerBuilder {
    sample_rate: f64,
    config: TrackerConfig,
    settings: PitchTrackerSettings,
    factory: Option<Box<dyn EstimatorFactory>>,
}

impl Default for PitchTrackerBuilder {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            config: TrackerConfig::default(),
            settings: PitchTrackerSettings::default(),
            factory: None,
        }
    }
}

impl PitchTrackerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default: 48000
    pub fn sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Default: [`Algorithm::YinFast`]
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.config = self.config.with_algorithm(algorithm);
        self
    }

    /// Override the build-time window. `hop_size` must divide `buffer_size`.
    pub fn window(mut self, buffer_size: usize, hop_size: usize) -> Self {
        self.config = self.config.with_window(buffer_size, hop_size);
        self
    }

    /// Default: -30 dB
    pub fn silence_threshold_db(mut self, db: f32) -> Self {
        self.config = self.config.with_silence_threshold_db(db);
        self
    }

    pub fn settings(mut self, settings: PitchTrackerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn sensitivity(mut self, sensitivity: f32) -> Self {
        self.settings.sensitivity = sensitivity;
        self
    }

    /// Percent.
    pub fn confidence_threshold(mut self, percent: f32) -> Self {
        self.settings.confidence_threshold = percent;
        self
    }

    /// Percent.
    pub fn tolerance(mut self, percent: f32) -> Self {
        self.settings.tolerance = percent;
        self
    }

    pub fn octave(mut self, octave: i32) -> Self {
        self.settings.octave = octave;
        self
    }

    pub fn hold_output_pitch(mut self, hold: bool) -> Self {
        self.settings.hold_output_pitch = hold;
        self
    }

    /// Use a custom estimator. Replaces the algorithm and window settings.
    pub fn estimator_factory(mut self, factory: impl EstimatorFactory + 'static) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    pub fn build(self) -> Result<AudioToCvPitch> {
        let unit = match self.factory {
            Some(factory) => AudioToCvPitch::with_factory(factory, self.sample_rate, &self.settings),
            None => AudioToCvPitch::with_factory(self.config, self.sample_rate, &self.settings),
        };
        unit.map_err(Error::from)
    }
}

//! Host-facing processing unit.

use crate::metadata::{Parameter, ParameterInfo, PluginMetadata};
use crate::params::{PitchTrackerHandle, PitchTrackerSettings};
use crate::tracker::PitchTracker;
use crate::{Error, Result};
use cvpitch_analysis::EstimatorFactory;
use cvpitch_core::TrackerConfig;

/// Audio in, pitch CV and signal CV out.
///
/// Wraps a [`PitchTracker`] with the surface a plugin host drives: parameters
/// by index in host units, a fixed latency, `activate`, `run` and
/// `sample_rate_changed`.
///
/// # Example
///
/// ```rust
/// use cvpitch_dsp::{AudioToCvPitch, Parameter};
///
/// let mut unit = AudioToCvPitch::new(48000.0).unwrap();
/// unit.set_parameter_value(Parameter::Octave.index(), 0.0);
///
/// let input = vec![0.0f32; 512];
/// let mut pitch = vec![0.0f32; 512];
/// let mut gate = vec![0.0f32; 512];
/// unit.activate();
/// unit.run(&input, &mut pitch, &mut gate);
/// assert!(gate.iter().all(|&g| g == 0.0));
/// ```
#[derive(Debug)]
pub struct AudioToCvPitch {
    tracker: PitchTracker,
    metadata: PluginMetadata,
}

impl AudioToCvPitch {
    /// Unit with the default program and the default window configuration.
    pub fn new(sample_rate: f64) -> Result<Self> {
        Self::with_config(TrackerConfig::default(), sample_rate)
    }

    pub fn with_config(config: TrackerConfig, sample_rate: f64) -> Result<Self> {
        Self::with_factory(config, sample_rate, &PitchTrackerSettings::default())
    }

    pub fn with_factory(
        factory: impl EstimatorFactory + 'static,
        sample_rate: f64,
        settings: &PitchTrackerSettings,
    ) -> Result<Self> {
        let tracker = PitchTracker::with_factory(factory, sample_rate, settings)?;
        let metadata = PluginMetadata::audio_to_cv_pitch(tracker.latency());
        Ok(Self { tracker, metadata })
    }

    pub fn metadata(&self) -> &PluginMetadata {
        &self.metadata
    }

    /// Fixed processing latency in samples.
    pub fn latency(&self) -> usize {
        self.tracker.latency()
    }

    pub fn parameter_count(&self) -> usize {
        Parameter::COUNT
    }

    pub fn parameter_info(&self, index: u32) -> Option<ParameterInfo> {
        Parameter::from_index(index).map(Parameter::info)
    }

    /// Current value in host units. Unknown indices read as 0.0.
    pub fn parameter_value(&self, index: u32) -> f32 {
        Parameter::from_index(index)
            .map(|param| self.value(param))
            .unwrap_or(0.0)
    }

    /// Set a value in host units. Unknown indices and read-only parameters are ignored.
    pub fn set_parameter_value(&mut self, index: u32, value: f32) {
        if let Some(param) = Parameter::from_index(index) {
            let _ = self.set_value(param, value);
        }
    }

    pub fn try_parameter_value(&self, index: u32) -> Result<f32> {
        Parameter::from_index(index)
            .map(|param| self.value(param))
            .ok_or(Error::UnknownParameter(index))
    }

    pub fn try_set_parameter_value(&mut self, index: u32, value: f32) -> Result<()> {
        let param = Parameter::from_index(index).ok_or(Error::UnknownParameter(index))?;
        self.set_value(param, value)
    }

    pub fn value(&self, param: Parameter) -> f32 {
        let params = self.tracker.params();
        match param {
            Parameter::Sensitivity => params.sensitivity(),
            Parameter::ConfidenceThreshold => params.confidence_threshold() * 100.0,
            Parameter::Tolerance => self.tracker.estimator().tolerance() * 100.0,
            Parameter::Octave => params.octave() as f32,
            Parameter::HoldOutputPitch => {
                if params.hold_output_pitch() {
                    1.0
                } else {
                    0.0
                }
            }
            Parameter::DetectedPitch => self.tracker.state().pitch_hz,
            Parameter::PitchConfidence => self.tracker.state().confidence * 100.0,
        }
    }

    /// Host-unit write. Values are stored as given; range clamping is the host's job.
    pub fn set_value(&mut self, param: Parameter, value: f32) -> Result<()> {
        match param {
            Parameter::Sensitivity => self.tracker.set_sensitivity(value),
            Parameter::ConfidenceThreshold => {
                self.tracker.params().set_confidence_threshold(value * 0.01)
            }
            Parameter::Tolerance => self.tracker.set_tolerance(value * 0.01),
            Parameter::Octave => self.tracker.params().set_octave(value.round() as i32),
            Parameter::HoldOutputPitch => self.tracker.params().set_hold_output_pitch(value > 0.5),
            Parameter::DetectedPitch | Parameter::PitchConfidence => {
                return Err(Error::ReadOnlyParameter(param.name()));
            }
        }
        Ok(())
    }

    /// Reset every tunable to its default, including estimator tolerance.
    ///
    /// Held pitch and the write position are left alone.
    pub fn load_default_program(&mut self) {
        self.tracker.apply_settings(&PitchTrackerSettings::default());
        tracing::debug!("Loaded default program");
    }

    pub fn settings(&self) -> PitchTrackerSettings {
        self.tracker.settings()
    }

    pub fn apply_settings(&mut self, settings: &PitchTrackerSettings) {
        self.tracker.apply_settings(settings);
    }

    /// Called by the host before processing (re)starts.
    pub fn activate(&mut self) {
        self.tracker.activate();
    }

    /// Process one block: `input` in, pitch CV and signal CV out.
    pub fn run(&mut self, input: &[f32], pitch_out: &mut [f32], signal_out: &mut [f32]) {
        self.tracker.process_block(input, pitch_out, signal_out);
    }

    /// Rebuild the estimator at the new rate. The previous one stays on failure.
    pub fn sample_rate_changed(&mut self, sample_rate: f64) -> Result<()> {
        self.tracker.set_sample_rate(sample_rate)
    }

    pub fn sample_rate(&self) -> f64 {
        self.tracker.sample_rate()
    }

    pub fn handle(&self) -> PitchTrackerHandle {
        self.tracker.handle()
    }

    pub fn tracker(&self) -> &PitchTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut PitchTracker {
        &mut self.tracker
    }
}

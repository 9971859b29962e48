//! Tunables and readouts shared between control threads and the audio thread.

use crate::tracker::TrackerState;
use cvpitch_core::{AtomicFlag, AtomicFloat, AtomicInt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Input gain applied before buffering.
pub const DEFAULT_SENSITIVITY: f32 = 60.0;
/// Percent.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 12.5;
/// Percent.
pub const DEFAULT_TOLERANCE: f32 = 6.25;
pub const DEFAULT_OCTAVE: i32 = -3;
pub const DEFAULT_HOLD_OUTPUT_PITCH: bool = false;

pub const MIN_OCTAVE: i32 = -4;
pub const MAX_OCTAVE: i32 = 4;

/// Serializable tunables, in host units (percentages where the host shows %).
///
/// `Default` is the default program.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchTrackerSettings {
    pub sensitivity: f32,
    /// Percent (0-100).
    pub confidence_threshold: f32,
    /// Percent (0-100).
    pub tolerance: f32,
    pub octave: i32,
    pub hold_output_pitch: bool,
}

impl Default for PitchTrackerSettings {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            tolerance: DEFAULT_TOLERANCE,
            octave: DEFAULT_OCTAVE,
            hold_output_pitch: DEFAULT_HOLD_OUTPUT_PITCH,
        }
    }
}

/// Tunables in engine units, read once per analysis window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    pub sensitivity: f32,
    /// 0-1
    pub confidence_threshold: f32,
    /// 0-1
    pub tolerance: f32,
    pub octave: i32,
    pub hold_output_pitch: bool,
}

/// Lock-free parameter store.
///
/// Each field is an independent atomic. A window evaluation may see a mix of
/// old and new values when writes race with it; the next window sees all of
/// them.
#[derive(Debug)]
pub struct PitchTrackerParams {
    sensitivity: AtomicFloat,
    confidence_threshold: AtomicFloat,
    tolerance: AtomicFloat,
    octave: AtomicInt,
    hold_output_pitch: AtomicFlag,
}

impl PitchTrackerParams {
    pub fn new(settings: &PitchTrackerSettings) -> Self {
        Self {
            sensitivity: AtomicFloat::new(settings.sensitivity),
            confidence_threshold: AtomicFloat::new(settings.confidence_threshold * 0.01),
            tolerance: AtomicFloat::new(settings.tolerance * 0.01),
            octave: AtomicInt::new(settings.octave),
            hold_output_pitch: AtomicFlag::new(settings.hold_output_pitch),
        }
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity.get_relaxed()
    }

    pub fn set_sensitivity(&self, sensitivity: f32) {
        self.sensitivity.set(sensitivity);
    }

    /// Minimum accepted confidence, 0-1.
    pub fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold.get()
    }

    pub fn set_confidence_threshold(&self, threshold: f32) {
        self.confidence_threshold.set(threshold);
    }

    /// Estimator tolerance, 0-1.
    pub fn tolerance(&self) -> f32 {
        self.tolerance.get()
    }

    pub fn set_tolerance(&self, tolerance: f32) {
        self.tolerance.set(tolerance);
    }

    pub fn octave(&self) -> i32 {
        self.octave.get()
    }

    pub fn set_octave(&self, octave: i32) {
        self.octave.set(octave);
    }

    pub fn hold_output_pitch(&self) -> bool {
        self.hold_output_pitch.get()
    }

    pub fn set_hold_output_pitch(&self, hold: bool) {
        self.hold_output_pitch.set(hold);
    }

    #[inline]
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            sensitivity: self.sensitivity(),
            confidence_threshold: self.confidence_threshold(),
            tolerance: self.tolerance(),
            octave: self.octave(),
            hold_output_pitch: self.hold_output_pitch(),
        }
    }

    pub fn settings(&self) -> PitchTrackerSettings {
        let snapshot = self.snapshot();
        PitchTrackerSettings {
            sensitivity: snapshot.sensitivity,
            confidence_threshold: snapshot.confidence_threshold * 100.0,
            tolerance: snapshot.tolerance * 100.0,
            octave: snapshot.octave,
            hold_output_pitch: snapshot.hold_output_pitch,
        }
    }

    pub fn apply(&self, settings: &PitchTrackerSettings) {
        self.set_sensitivity(settings.sensitivity);
        self.set_confidence_threshold(settings.confidence_threshold * 0.01);
        self.set_tolerance(settings.tolerance * 0.01);
        self.set_octave(settings.octave);
        self.set_hold_output_pitch(settings.hold_output_pitch);
    }
}

impl Default for PitchTrackerParams {
    fn default() -> Self {
        Self::new(&PitchTrackerSettings::default())
    }
}

/// Latest tracker outputs, published by the audio thread at each window.
#[derive(Debug, Default)]
pub struct PitchReadout {
    detected_hz: AtomicFloat,
    confidence: AtomicFloat,
    pitch_cv: AtomicFloat,
    gate: AtomicFlag,
}

impl PitchReadout {
    #[inline]
    pub(crate) fn publish(&self, state: &TrackerState) {
        self.detected_hz.set(state.pitch_hz);
        self.confidence.set(state.confidence);
        self.pitch_cv.set(state.pitch_cv);
        self.gate.set(state.gate > 0.0);
    }

    pub fn detected_pitch(&self) -> f32 {
        self.detected_hz.get()
    }

    /// 0-1
    pub fn confidence(&self) -> f32 {
        self.confidence.get()
    }

    pub fn pitch_cv(&self) -> f32 {
        self.pitch_cv.get()
    }

    pub fn gate_open(&self) -> bool {
        self.gate.get()
    }
}

/// Cloneable control-thread view of a running tracker.
#[derive(Debug, Clone)]
pub struct PitchTrackerHandle {
    params: Arc<PitchTrackerParams>,
    readout: Arc<PitchReadout>,
}

impl PitchTrackerHandle {
    pub(crate) fn new(params: Arc<PitchTrackerParams>, readout: Arc<PitchReadout>) -> Self {
        Self { params, readout }
    }

    pub fn params(&self) -> &PitchTrackerParams {
        &self.params
    }

    pub fn readout(&self) -> &PitchReadout {
        &self.readout
    }

    pub fn set_sensitivity(&self, sensitivity: f32) -> &Self {
        self.params.set_sensitivity(sensitivity);
        self
    }

    /// Percent (0-100).
    pub fn set_confidence_threshold(&self, percent: f32) -> &Self {
        self.params.set_confidence_threshold(percent * 0.01);
        self
    }

    /// Percent (0-100). Reaches the estimator at the next window.
    pub fn set_tolerance(&self, percent: f32) -> &Self {
        self.params.set_tolerance(percent * 0.01);
        self
    }

    pub fn set_octave(&self, octave: i32) -> &Self {
        self.params.set_octave(octave);
        self
    }

    pub fn set_hold_output_pitch(&self, hold: bool) -> &Self {
        self.params.set_hold_output_pitch(hold);
        self
    }

    pub fn detected_pitch(&self) -> f32 {
        self.readout.detected_pitch()
    }

    /// Percent (0-100).
    pub fn confidence(&self) -> f32 {
        self.readout.confidence() * 100.0
    }

    pub fn settings(&self) -> PitchTrackerSettings {
        self.params.settings()
    }
}

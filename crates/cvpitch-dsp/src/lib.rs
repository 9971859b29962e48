//! RT-safe audio to CV pitch conversion.
//!
//! - [`FrameAccumulator`]: gain-scaled fixed window, reports "full" every N samples
//! - [`PitchTracker`]: runs the estimator per full window and turns its output
//!   into a held pitch CV and gate
//! - [`AudioToCvPitch`]: the processing unit a host drives (parameters by index,
//!   ports, latency, block callback)
//!
//! Parameters live in lock-free cells ([`PitchTrackerParams`]) so control
//! threads can write them while audio runs; the tracker samples them once per
//! analysis window.

mod error;
pub use error::{Error, Result};

mod accumulator;
pub use accumulator::FrameAccumulator;

mod params;
pub use params::{
    ParamSnapshot, PitchReadout, PitchTrackerHandle, PitchTrackerParams, PitchTrackerSettings,
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_HOLD_OUTPUT_PITCH, DEFAULT_OCTAVE, DEFAULT_SENSITIVITY,
    DEFAULT_TOLERANCE, MAX_OCTAVE, MIN_OCTAVE,
};

mod tracker;
pub use tracker::{hz_to_cv, PitchTracker, TrackerState, TrackerStats, GATE_OFF, GATE_ON};

mod metadata;
pub use metadata::{
    AudioIo, Parameter, ParameterFlags, ParameterInfo, PluginMetadata, PortHints, PortInfo,
};

mod unit;
pub use unit::AudioToCvPitch;

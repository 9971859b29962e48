//! # cvpitch - Audio to CV pitch
//!
//! Converts a monophonic audio signal into a pitch control voltage (one unit
//! per octave, 0 to 10) and a signal/gate CV, with a fixed latency of one
//! analysis window.
//!
//! ## Architecture
//!
//! cvpitch is an umbrella crate over:
//! - **cvpitch-core** - Lock-free parameter cells, parameter ranges, tracker configuration
//! - **cvpitch-analysis** - Pitch estimators (YIN, FFT YIN) behind the `PitchEstimator` trait
//! - **cvpitch-dsp** - Frame accumulator, pitch decision engine, host-facing unit
//! - **cvpitch-export** - Offline WAV rendering
//!
//! ## Quick Start
//!
//! ```rust
//! use cvpitch::prelude::*;
//!
//! let mut unit = PitchTrackerBuilder::new()
//!     .sample_rate(48000.0)
//!     .octave(0)
//!     .build()?;
//!
//! let input: Vec<f32> = (0..4096)
//!     .map(|i| 0.5 * (2.0 * std::f32::consts::PI * 2000.0 * i as f32 / 48000.0).sin())
//!     .collect();
//! let mut pitch = vec![0.0; input.len()];
//! let mut gate = vec![0.0; input.len()];
//!
//! unit.activate();
//! unit.run(&input, &mut pitch, &mut gate);
//! assert_eq!(gate[input.len() - 1], GATE_ON);
//! # Ok::<(), cvpitch::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `export` (default) - Offline rendering
//! - `fine-hop` - 1408-sample window with hop 1 instead of 176 with hop 8

/// Re-export of cvpitch-core for direct access
pub use cvpitch_core as core;

pub use cvpitch_analysis as analysis;

pub use cvpitch_dsp as dsp;

#[cfg(feature = "export")]
pub use cvpitch_export as export;

pub use cvpitch_core::{
    Algorithm, AtomicFlag, AtomicFloat, AtomicInt, ParameterRange, ParameterScale, TrackerConfig,
    BUFFER_SIZE, HOP_SIZE,
};

pub use cvpitch_analysis::{
    factory_fn, EstimatorFactory, PitchEstimate, PitchEstimator, Yin, YinFast,
};

pub use cvpitch_dsp::{
    hz_to_cv, AudioToCvPitch, FrameAccumulator, Parameter, ParameterInfo, PitchTracker,
    PitchTrackerHandle, PitchTrackerSettings, PluginMetadata, TrackerState, GATE_OFF, GATE_ON,
};

#[cfg(feature = "export")]
pub use cvpitch_export::{render_file, render_samples, RenderOptions, RenderSummary};

mod error;
pub use error::{Error, Result};

mod builder;
pub use builder::PitchTrackerBuilder;

/// Convenience prelude for common imports
pub mod prelude {
    pub use crate::PitchTrackerBuilder;

    pub use crate::core::{Algorithm, TrackerConfig, BUFFER_SIZE, HOP_SIZE};

    pub use crate::analysis::{PitchEstimate, PitchEstimator};

    pub use crate::dsp::{
        AudioToCvPitch, Parameter, PitchTracker, PitchTrackerHandle, PitchTrackerSettings,
        GATE_OFF, GATE_ON,
    };

    #[cfg(feature = "export")]
    pub use crate::export::{render_file, RenderOptions};
}

//! # cvpitch analysis
//!
//! Monophonic pitch estimation for the CV pitch tracker.
//!
//! - **[`PitchEstimator`]**: the capability the tracker depends on
//!   (`detect`, `set_tolerance`, `tolerance`)
//! - **[`YinFast`]**: YIN with the difference function computed via FFT
//! - **[`Yin`]**: YIN with a direct difference function
//! - **[`EstimatorFactory`]**: rebuilds an estimator when the sample rate changes
//!
//! All estimators operate on a fixed-length `&[f32]` window, allocate only at
//! construction, and report `frequency == 0.0` when no determinate pitch is
//! found.
//!
//! ## Example
//!
//! ```rust
//! use cvpitch_analysis::{PitchEstimator, YinFast};
//!
//! let sample_rate = 48000.0;
//! let window: Vec<f32> = (0..1408)
//!     .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 48000.0).sin())
//!     .collect();
//!
//! let mut estimator = YinFast::new(1408, 1, sample_rate).unwrap();
//! let estimate = estimator.detect(&window);
//! assert!((estimate.frequency - 1000.0).abs() < 5.0);
//! ```

mod error;
pub use error::{Error, Result};

pub mod estimate;
pub use estimate::{freq_to_midi, midi_to_freq, PitchEstimate};

pub mod estimator;
pub use estimator::{factory_fn, EstimatorFactory, FnFactory, PitchEstimator};

pub mod silence;
pub use silence::{db_spl, is_silent, level_lin};

mod yin;
pub use yin::Yin;

mod yin_fast;
pub use yin_fast::YinFast;

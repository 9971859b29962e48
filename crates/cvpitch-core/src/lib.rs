//! Core types shared by the cvpitch subsystems.
//!
//! # Primary API
//!
//! - [`TrackerConfig`]: validated construction-time configuration of the pitch tracker
//! - [`AtomicFloat`], [`AtomicFlag`], [`AtomicInt`]: lock-free parameter cells
//! - [`ParameterRange`]: parameter bounds, defaults and normalization
//!
//! The analysis window size is a build-time decision. [`HOP_SIZE`] is 8 by
//! default and 1 with the `fine-hop` feature; [`BUFFER_SIZE`] follows from it.

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::{
    validate_sample_rate, Algorithm, TrackerConfig, BUFFER_SIZE, DEFAULT_SILENCE_THRESHOLD_DB,
    HOP_SIZE, MAX_SAMPLE_RATE, MIN_SAMPLE_RATE, WINDOW_SPAN,
};

pub(crate) mod lockfree;
pub use lockfree::{AtomicFlag, AtomicFloat, AtomicInt};

pub mod parameter;
pub use parameter::{ParameterRange, ParameterScale};

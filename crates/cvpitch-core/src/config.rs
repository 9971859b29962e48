//! Tracker construction configuration.

use crate::{Error, Result};
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Estimator hop granularity. Fixed at build time.
#[cfg(not(feature = "fine-hop"))]
pub const HOP_SIZE: usize = 8;

/// Estimator hop granularity. Fixed at build time.
#[cfg(feature = "fine-hop")]
pub const HOP_SIZE: usize = 1;

/// Span the analysis window is derived from.
pub const WINDOW_SPAN: usize = 1024 + 256 + 128;

/// Analysis window length in samples, which is also the reported latency.
pub const BUFFER_SIZE: usize = WINDOW_SPAN / HOP_SIZE;

const _: () = assert!(
    BUFFER_SIZE % HOP_SIZE == 0,
    "BUFFER_SIZE must be a multiple of HOP_SIZE"
);

/// Windows quieter than this (dB, mean-square level) report no pitch.
pub const DEFAULT_SILENCE_THRESHOLD_DB: f32 = -30.0;

pub const MIN_SAMPLE_RATE: f64 = 8000.0;
pub const MAX_SAMPLE_RATE: f64 = 384000.0;

/// Monophonic pitch estimation algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// YIN with a direct O(W²) difference function.
    Yin,
    /// YIN with the difference function computed through an FFT.
    #[default]
    YinFast,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Yin => "yin",
            Algorithm::YinFast => "yinfast",
        }
    }

    /// Tolerance the estimator starts with before any host write.
    pub fn default_tolerance(&self) -> f32 {
        0.15
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "yin" => Ok(Algorithm::Yin),
            "yinfast" | "default" => Ok(Algorithm::YinFast),
            other => Err(Error::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Everything needed to construct an estimator, except the sample rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub algorithm: Algorithm,
    pub buffer_size: usize,
    pub hop_size: usize,
    pub silence_threshold_db: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            buffer_size: BUFFER_SIZE,
            hop_size: HOP_SIZE,
            silence_threshold_db: DEFAULT_SILENCE_THRESHOLD_DB,
        }
    }
}

impl TrackerConfig {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_window(mut self, buffer_size: usize, hop_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self.hop_size = hop_size;
        self
    }

    pub fn with_silence_threshold_db(mut self, db: f32) -> Self {
        self.silence_threshold_db = db;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.hop_size == 0 {
            return Err(Error::InvalidConfig("hop_size must be at least 1".into()));
        }
        if self.buffer_size < 4 {
            return Err(Error::InvalidConfig(format!(
                "buffer_size {} too small (minimum 4)",
                self.buffer_size
            )));
        }
        if self.buffer_size % self.hop_size != 0 {
            return Err(Error::InvalidConfig(format!(
                "buffer_size {} is not a multiple of hop_size {}",
                self.buffer_size, self.hop_size
            )));
        }
        if !self.silence_threshold_db.is_finite() || self.silence_threshold_db > 0.0 {
            return Err(Error::InvalidConfig(format!(
                "silence_threshold_db {} must be finite and <= 0",
                self.silence_threshold_db
            )));
        }
        Ok(())
    }
}

pub fn validate_sample_rate(sample_rate: f64) -> Result<()> {
    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
        return Err(Error::InvalidSampleRate(sample_rate));
    }
    Ok(())
}

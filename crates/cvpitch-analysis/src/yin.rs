//! YIN pitch estimation (de Cheveigné & Kawahara, 2002).
//!
//! Steps shared by both estimators live here:
//!
//! 1. **Difference function** - d(τ) = Σ(x[j] - x[j+τ])² over the first half of the window
//! 2. **Cumulative mean normalized difference** - d'(τ)
//! 3. **Absolute threshold** - first local minimum of d'(τ) below the tolerance,
//!    global minimum otherwise
//! 4. **Parabolic interpolation** - sub-sample period
//!
//! [`Yin`] computes step 1 directly in O(W²); [`crate::YinFast`] uses an FFT.

use crate::silence::is_silent;
use crate::{Error, PitchEstimate, PitchEstimator, Result};
use cvpitch_core::{validate_sample_rate, Algorithm, DEFAULT_SILENCE_THRESHOLD_DB};

/// Check window/hop geometry and sample rate before allocating.
pub(crate) fn validate_geometry(window_size: usize, hop_size: usize, sample_rate: f64) -> Result<()> {
    if hop_size == 0 || window_size < 4 || window_size % hop_size != 0 {
        return Err(Error::InvalidWindow(format!(
            "window {} with hop {}",
            window_size, hop_size
        )));
    }
    validate_sample_rate(sample_rate)?;
    Ok(())
}

/// Turn d(τ) into d'(τ) in place.
///
/// d'(0) = 1, d'(τ) = d(τ) · τ / Σ_{j=1..τ} d(j)
pub(crate) fn cumulative_mean_normalize(yin: &mut [f32]) {
    if yin.is_empty() {
        return;
    }
    yin[0] = 1.0;

    let mut running_sum = 0.0f32;
    for tau in 1..yin.len() {
        running_sum += yin[tau];
        if running_sum != 0.0 {
            yin[tau] *= tau as f32 / running_sum;
        } else {
            yin[tau] = 1.0;
        }
    }
}

/// Lag of the first local minimum below `tolerance`, or the global minimum.
pub(crate) fn pick_period(yin: &[f32], tolerance: f32) -> usize {
    let last = yin.len().saturating_sub(3);
    for tau in 2..last {
        if yin[tau] < tolerance && yin[tau] < yin[tau + 1] {
            return tau;
        }
    }

    let mut best_tau = 0;
    let mut best_val = f32::INFINITY;
    for (tau, &val) in yin.iter().enumerate() {
        if val < best_val {
            best_val = val;
            best_tau = tau;
        }
    }
    best_tau
}

/// Vertex of the parabola through (τ-1, τ, τ+1).
pub(crate) fn parabolic_interpolation(yin: &[f32], tau: usize) -> f32 {
    if tau == 0 || tau + 1 >= yin.len() {
        return tau as f32;
    }

    let s0 = yin[tau - 1];
    let s1 = yin[tau];
    let s2 = yin[tau + 1];

    let denominator = 2.0 * (2.0 * s1 - s2 - s0);
    if denominator.abs() > 1e-10 {
        tau as f32 + (s2 - s0) / denominator
    } else {
        tau as f32
    }
}

/// Steps 3-4 plus the silence gate, on an already normalized d'(τ).
pub(crate) fn resolve(
    yin: &[f32],
    window: &[f32],
    tolerance: f32,
    sample_rate: f64,
    silence_threshold_db: f32,
) -> PitchEstimate {
    let tau = pick_period(yin, tolerance);
    let confidence = (1.0 - yin[tau]).clamp(0.0, 1.0);

    let period = parabolic_interpolation(yin, tau);
    let mut frequency = if tau > 0 && period > 0.0 {
        (sample_rate / period as f64) as f32
    } else {
        0.0
    };

    if is_silent(window, silence_threshold_db) {
        frequency = 0.0;
    }

    PitchEstimate {
        frequency,
        confidence,
    }
}

/// YIN with a direct difference function.
pub struct Yin {
    sample_rate: f64,
    tolerance: f32,
    silence_threshold_db: f32,
    window_size: usize,

    // d(τ), then d'(τ) in place; length window_size / 2
    yin: Vec<f32>,
}

impl Yin {
    pub fn new(window_size: usize, hop_size: usize, sample_rate: f64) -> Result<Self> {
        validate_geometry(window_size, hop_size, sample_rate)?;

        Ok(Self {
            sample_rate,
            tolerance: Algorithm::Yin.default_tolerance(),
            silence_threshold_db: DEFAULT_SILENCE_THRESHOLD_DB,
            window_size,
            yin: vec![0.0; window_size / 2],
        })
    }

    pub fn with_silence_threshold_db(mut self, db: f32) -> Self {
        self.silence_threshold_db = db;
        self
    }

    pub fn silence_threshold_db(&self) -> f32 {
        self.silence_threshold_db
    }

    fn compute_difference(&mut self, window: &[f32]) {
        let half = self.yin.len();
        self.yin[0] = 0.0;
        for tau in 1..half {
            let mut sum = 0.0f32;
            for j in 0..half {
                let delta = window[j] - window[j + tau];
                sum += delta * delta;
            }
            self.yin[tau] = sum;
        }
    }
}

impl PitchEstimator for Yin {
    fn detect(&mut self, window: &[f32]) -> PitchEstimate {
        if window.len() < self.window_size {
            return PitchEstimate::UNVOICED;
        }
        let window = &window[..self.window_size];

        self.compute_difference(window);
        cumulative_mean_normalize(&mut self.yin);
        resolve(
            &self.yin,
            window,
            self.tolerance,
            self.sample_rate,
            self.silence_threshold_db,
        )
    }

    fn set_tolerance(&mut self, tolerance: f32) {
        self.tolerance = tolerance.clamp(0.0, 1.0);
    }

    fn tolerance(&self) -> f32 {
        self.tolerance
    }

    fn window_size(&self) -> usize {
        self.window_size
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

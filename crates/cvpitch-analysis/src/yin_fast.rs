//! YIN with an FFT-computed difference function.
//!
//! Uses the identity d(τ) = r(0) + r_τ(0) - 2·r(τ), where r(τ) is the
//! cross-correlation of the first half of the window with the whole window
//! and the energy terms are running sums. The cross-correlation comes from
//! `IFFT(FFT(x) · conj(FFT(x[..W])))` on a zero-padded transform twice the
//! window length, so no circular wrap reaches the lags we read.
//!
//! FFT plans and all buffers are created once in [`YinFast::new`].

use crate::yin::{cumulative_mean_normalize, resolve, validate_geometry};
use crate::{PitchEstimate, PitchEstimator, Result};
use cvpitch_core::{Algorithm, DEFAULT_SILENCE_THRESHOLD_DB};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

pub struct YinFast {
    sample_rate: f64,
    tolerance: f32,
    silence_threshold_db: f32,
    window_size: usize,

    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    signal_spectrum: Vec<Complex<f32>>,
    kernel_spectrum: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,

    // d(τ), then d'(τ) in place; length window_size / 2
    yin: Vec<f32>,
}

impl YinFast {
    pub fn new(window_size: usize, hop_size: usize, sample_rate: f64) -> Result<Self> {
        validate_geometry(window_size, hop_size, sample_rate)?;

        let fft_len = window_size * 2;
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(fft_len);
        let inverse = planner.plan_fft_inverse(fft_len);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        Ok(Self {
            sample_rate,
            tolerance: Algorithm::YinFast.default_tolerance(),
            silence_threshold_db: DEFAULT_SILENCE_THRESHOLD_DB,
            window_size,
            forward,
            inverse,
            signal_spectrum: vec![Complex::new(0.0, 0.0); fft_len],
            kernel_spectrum: vec![Complex::new(0.0, 0.0); fft_len],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
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

        for (i, slot) in self.signal_spectrum.iter_mut().enumerate() {
            let sample = if i < self.window_size { window[i] } else { 0.0 };
            *slot = Complex::new(sample, 0.0);
        }
        for (i, slot) in self.kernel_spectrum.iter_mut().enumerate() {
            let sample = if i < half { window[i] } else { 0.0 };
            *slot = Complex::new(sample, 0.0);
        }

        self.forward
            .process_with_scratch(&mut self.signal_spectrum, &mut self.scratch);
        self.forward
            .process_with_scratch(&mut self.kernel_spectrum, &mut self.scratch);

        for (signal, kernel) in self
            .signal_spectrum
            .iter_mut()
            .zip(self.kernel_spectrum.iter())
        {
            *signal *= kernel.conj();
        }

        self.inverse
            .process_with_scratch(&mut self.signal_spectrum, &mut self.scratch);

        // rustfft does not normalize the inverse transform
        let scale = 1.0 / self.signal_spectrum.len() as f64;

        let head_energy: f64 = window[..half]
            .iter()
            .map(|&s| (s as f64) * (s as f64))
            .sum();
        let mut lagged_energy = head_energy;

        self.yin[0] = 0.0;
        for tau in 1..half {
            let leaving = window[tau - 1] as f64;
            let entering = window[tau + half - 1] as f64;
            lagged_energy += entering * entering - leaving * leaving;

            let cross = self.signal_spectrum[tau].re as f64 * scale;
            self.yin[tau] = (head_energy + lagged_energy - 2.0 * cross).max(0.0) as f32;
        }
    }
}

impl PitchEstimator for YinFast {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Yin;

    fn generate_sine(sample_rate: f64, freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (2.0 * std::f32::consts::PI * freq * t).sin()
            })
            .collect()
    }

    /// Two-partial tone with a small noise floor, deterministic.
    fn generate_rich(sample_rate: f64, freq: f32, len: usize) -> Vec<f32> {
        let mut rng = 0x2545_F491_u64;
        (0..len)
            .map(|i| {
                rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1);
                let noise = ((rng >> 33) as f32 / u32::MAX as f32) * 0.02 - 0.01;
                let t = i as f32 / sample_rate as f32;
                let phase = 2.0 * std::f32::consts::PI * freq * t;
                0.7 * phase.sin() + 0.3 * (2.0 * phase).sin() + noise
            })
            .collect()
    }

    #[test]
    fn test_difference_matches_direct_yin() {
        let sample_rate = 48000.0;
        let window = generate_rich(sample_rate, 700.0, 352);

        let mut fast = YinFast::new(352, 8, sample_rate).expect("yinfast");
        let mut direct = Yin::new(352, 8, sample_rate).expect("yin");

        let a = fast.detect(&window);
        let b = direct.detect(&window);

        assert!(
            (a.frequency - b.frequency).abs() < 0.5,
            "fast {} Hz vs direct {} Hz",
            a.frequency,
            b.frequency
        );
        assert!((a.confidence - b.confidence).abs() < 1e-3);
    }

    #[test]
    fn test_detect_various_frequencies() {
        let sample_rate = 48000.0;
        let mut estimator = YinFast::new(1408, 1, sample_rate).expect("yinfast");

        for &freq in &[110.0, 220.0, 440.0, 880.0, 1000.0] {
            let window = generate_sine(sample_rate, freq, 1408);
            let result = estimator.detect(&window);

            assert!(result.is_voiced(), "Should detect {}Hz", freq);
            let error_percent = ((result.frequency - freq) / freq).abs() * 100.0;
            assert!(
                error_percent < 1.0,
                "Expected {}Hz, got {}Hz ({}% error)",
                freq,
                result.frequency,
                error_percent
            );
        }
    }

    #[test]
    fn test_short_window_high_pitch() {
        let sample_rate = 48000.0;
        let window = generate_sine(sample_rate, 2000.0, 176);

        let mut estimator = YinFast::new(176, 8, sample_rate).expect("yinfast");
        let result = estimator.detect(&window);

        assert!((result.frequency - 2000.0).abs() < 20.0, "got {}", result.frequency);
        assert!(result.confidence > 0.9);
    }

    #[test]
    fn test_silence_detection() {
        let mut estimator = YinFast::new(176, 8, 44100.0).expect("yinfast");
        let result = estimator.detect(&[0.0; 176]);
        assert_eq!(result.frequency, 0.0);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_silence_threshold_is_configurable() {
        let sample_rate = 48000.0;
        // mean square 0.5e-4 -> about -43 dB
        let window: Vec<f32> = generate_sine(sample_rate, 1000.0, 176)
            .into_iter()
            .map(|s| s * 0.01)
            .collect();

        let mut gated = YinFast::new(176, 8, sample_rate).expect("yinfast");
        assert_eq!(gated.detect(&window).frequency, 0.0);

        let mut open = YinFast::new(176, 8, sample_rate)
            .expect("yinfast")
            .with_silence_threshold_db(-60.0);
        assert!(open.detect(&window).is_voiced());
    }

    #[test]
    fn test_confidence_within_unit_range_for_noise() {
        let mut rng = 7u64;
        let window: Vec<f32> = (0..176)
            .map(|_| {
                rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1);
                ((rng >> 33) as f32 / u32::MAX as f32) * 2.0 - 1.0
            })
            .collect();

        let mut estimator = YinFast::new(176, 8, 48000.0).expect("yinfast");
        let result = estimator.detect(&window);
        assert!((0.0..=1.0).contains(&result.confidence));
        assert!(result.frequency >= 0.0);
    }
}

//! Test helpers and fixtures for cvpitch integration tests
//!
//! Signal generators plus scripted estimators, so decision logic can be
//! driven window by window without depending on estimator accuracy.

#![allow(dead_code)]

pub mod tolerances;

use cvpitch::analysis::Result as AnalysisResult;
use cvpitch::prelude::*;
use cvpitch::EstimatorFactory;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Default test sample rate (matches common hardware)
pub const TEST_SAMPLE_RATE: f64 = 48000.0;

/// Host block size for deterministic testing
pub const TEST_BLOCK_SIZE: usize = 64;

/// Window length for scripted estimators.
pub const SCRIPT_WINDOW: usize = 32;

/// Sine wave at `frequency` with peak `amplitude`.
pub fn generate_sine(frequency: f64, sample_rate: f64, amplitude: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate;
            amplitude * (2.0 * std::f64::consts::PI * frequency * t).sin() as f32
        })
        .collect()
}

/// Generate silence (zero samples).
pub fn generate_silence(num_samples: usize) -> Vec<f32> {
    vec![0.0; num_samples]
}

/// Generate white noise (random samples in -1..1).
pub fn generate_noise(num_samples: usize, seed: u64) -> Vec<f32> {
    // Simple LCG for reproducible "random" noise
    let mut rng = seed;
    (0..num_samples)
        .map(|_| {
            rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((rng >> 33) as f32 / (u32::MAX >> 1) as f32) * 2.0 - 1.0
        })
        .collect()
}

/// Run `input` through `unit` in `block_size` blocks, returning (pitch, gate).
pub fn run_blocks(unit: &mut AudioToCvPitch, input: &[f32], block_size: usize) -> (Vec<f32>, Vec<f32>) {
    let mut pitch = vec![0.0; input.len()];
    let mut gate = vec![0.0; input.len()];
    for ((inp, p), g) in input
        .chunks(block_size)
        .zip(pitch.chunks_mut(block_size))
        .zip(gate.chunks_mut(block_size))
    {
        unit.run(inp, p, g);
    }
    (pitch, gate)
}

/// Replays a list of estimates one per window, then repeats the last.
///
/// Also records every window it was handed.
pub struct ScriptedEstimator {
    script: Vec<PitchEstimate>,
    calls: usize,
    tolerance: f32,
    window: usize,
    sample_rate: f64,
    seen: Arc<Mutex<Vec<Vec<f32>>>>,
}

impl PitchEstimator for ScriptedEstimator {
    fn detect(&mut self, window: &[f32]) -> PitchEstimate {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(window.to_vec());
        }
        let estimate = self
            .script
            .get(self.calls)
            .or(self.script.last())
            .copied()
            .unwrap_or(PitchEstimate::UNVOICED);
        self.calls += 1;
        estimate
    }

    fn set_tolerance(&mut self, tolerance: f32) {
        self.tolerance = tolerance;
    }

    fn tolerance(&self) -> f32 {
        self.tolerance
    }

    fn window_size(&self) -> usize {
        self.window
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

/// Builds [`ScriptedEstimator`]s. Construction can be made to fail on demand.
#[derive(Clone)]
pub struct ScriptedFactory {
    pub script: Vec<PitchEstimate>,
    pub window: usize,
    pub fail: Arc<AtomicBool>,
    pub seen: Arc<Mutex<Vec<Vec<f32>>>>,
}

impl ScriptedFactory {
    pub fn new(script: Vec<PitchEstimate>) -> Self {
        Self {
            script,
            window: SCRIPT_WINDOW,
            fail: Arc::new(AtomicBool::new(false)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn windows_seen(&self) -> Vec<Vec<f32>> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl EstimatorFactory for ScriptedFactory {
    fn create(&self, sample_rate: f64) -> AnalysisResult<Box<dyn PitchEstimator>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(cvpitch::analysis::Error::InvalidWindow("scripted failure".into()));
        }
        Ok(Box::new(ScriptedEstimator {
            script: self.script.clone(),
            calls: 0,
            tolerance: 0.15,
            window: self.window,
            sample_rate,
            seen: Arc::clone(&self.seen),
        }))
    }
}

/// Unit driven by a scripted estimator with octave 0 and otherwise default settings.
pub fn scripted_unit(factory: ScriptedFactory, hold: bool) -> AudioToCvPitch {
    PitchTrackerBuilder::new()
        .sample_rate(TEST_SAMPLE_RATE)
        .octave(0)
        .hold_output_pitch(hold)
        .estimator_factory(factory)
        .build()
        .expect("Failed to create scripted unit")
}

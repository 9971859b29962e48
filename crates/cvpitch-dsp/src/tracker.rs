//! Pitch decision engine: estimator per full window, confidence gate, hold.

use crate::accumulator::FrameAccumulator;
use crate::params::{
    ParamSnapshot, PitchReadout, PitchTrackerHandle, PitchTrackerParams, PitchTrackerSettings,
};
use crate::{Error, Result};
use cvpitch_analysis::{EstimatorFactory, PitchEstimate, PitchEstimator};
use cvpitch_core::TrackerConfig;
use std::sync::Arc;

/// Gate level while a pitch is asserted.
pub const GATE_ON: f32 = 1.0;
pub const GATE_OFF: f32 = 0.0;

const A4_HZ: f32 = 440.0;
const A4_MIDI: f32 = 69.0;
const SEMITONES_PER_OCTAVE: f32 = 12.0;
const MAX_CV: f32 = 10.0;

/// Map a frequency to pitch CV, one unit per octave, clamped to `[0, 10]`.
///
/// The octave shift is added outside the log term:
/// `cv = (12·log2(hz/440) + 69 + 12·octave) / 12`.
///
/// ```rust
/// use cvpitch_dsp::hz_to_cv;
///
/// assert_eq!(hz_to_cv(440.0, 0), 5.75);
/// assert_eq!(hz_to_cv(440.0, 1), 6.75);
/// ```
#[inline]
pub fn hz_to_cv(hz: f32, octave: i32) -> f32 {
    let linear_pitch = SEMITONES_PER_OCTAVE * (hz / A4_HZ).log2()
        + A4_MIDI
        + SEMITONES_PER_OCTAVE * octave as f32;
    (linear_pitch / SEMITONES_PER_OCTAVE).clamp(0.0, MAX_CV)
}

/// Held outputs, replicated across samples between window evaluations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackerState {
    /// Last accepted frequency (0.0 if none, or after a reset).
    pub pitch_hz: f32,
    /// CV derived from `pitch_hz`, in `[0, 10]`.
    pub pitch_cv: f32,
    /// Confidence of the most recent detection, accepted or not.
    pub confidence: f32,
    /// [`GATE_ON`] or [`GATE_OFF`].
    pub gate: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerStats {
    /// Windows evaluated since construction.
    pub windows: u64,
    /// Windows whose detection passed the confidence gate.
    pub accepted: u64,
}

/// Streaming pitch tracker.
///
/// Feeds samples into a [`FrameAccumulator`]; every `buffer_size` samples it
/// runs the estimator, applies the acceptance rule and updates the held
/// [`TrackerState`]. Output latency is exactly `buffer_size` samples.
///
/// Tunables are read from shared [`PitchTrackerParams`] once per window, so
/// writes through a [`PitchTrackerHandle`] land at the next window boundary.
pub struct PitchTracker {
    accumulator: FrameAccumulator,
    estimator: Box<dyn PitchEstimator>,
    factory: Box<dyn EstimatorFactory>,
    params: Arc<PitchTrackerParams>,
    readout: Arc<PitchReadout>,
    state: TrackerState,
    applied_tolerance: f32,
    sample_rate: f64,
    stats: TrackerStats,
}

impl PitchTracker {
    /// Tracker with the default program and a built-in estimator.
    pub fn new(config: TrackerConfig, sample_rate: f64) -> Result<Self> {
        Self::with_factory(config, sample_rate, &PitchTrackerSettings::default())
    }

    /// Tracker driving estimators built by `factory`.
    ///
    /// The window length is taken from the first estimator; every rebuilt
    /// estimator must report the same length.
    pub fn with_factory(
        factory: impl EstimatorFactory + 'static,
        sample_rate: f64,
        settings: &PitchTrackerSettings,
    ) -> Result<Self> {
        let mut estimator = factory.create(sample_rate)?;
        let buffer_size = estimator.window_size();
        if buffer_size == 0 {
            return Err(Error::EstimatorConstruction(
                "estimator reports an empty window".to_string(),
            ));
        }

        let params = Arc::new(PitchTrackerParams::new(settings));
        let tolerance = params.tolerance();
        estimator.set_tolerance(tolerance);

        tracing::debug!(
            "Pitch tracker ready: window={} sample_rate={} tolerance={}",
            buffer_size,
            sample_rate,
            tolerance
        );

        Ok(Self {
            accumulator: FrameAccumulator::new(buffer_size).with_sensitivity(settings.sensitivity),
            estimator,
            factory: Box::new(factory),
            params,
            readout: Arc::new(PitchReadout::default()),
            state: TrackerState::default(),
            applied_tolerance: tolerance,
            sample_rate,
            stats: TrackerStats::default(),
        })
    }

    /// Process one sample, returning `(pitch_cv, gate)`.
    #[inline]
    pub fn process_sample(&mut self, sample: f32) -> (f32, f32) {
        if self.accumulator.push(sample) {
            self.evaluate();
        }
        (self.state.pitch_cv, self.state.gate)
    }

    /// Process a block. Frames beyond the shortest of the three slices are untouched.
    pub fn process_block(&mut self, input: &[f32], pitch_out: &mut [f32], gate_out: &mut [f32]) {
        debug_assert_eq!(input.len(), pitch_out.len());
        debug_assert_eq!(input.len(), gate_out.len());

        self.accumulator.set_sensitivity(self.params.sensitivity());

        for ((&sample, pitch), gate) in input.iter().zip(pitch_out.iter_mut()).zip(gate_out.iter_mut())
        {
            let (cv, g) = self.process_sample(sample);
            *pitch = cv;
            *gate = g;
        }
    }

    fn evaluate(&mut self) {
        let params = self.params.snapshot();
        self.accumulator.set_sensitivity(params.sensitivity);

        if params.tolerance != self.applied_tolerance {
            self.estimator.set_tolerance(params.tolerance);
            self.applied_tolerance = params.tolerance;
        }

        let estimate = self.estimator.detect(self.accumulator.window());
        self.decide(estimate, &params);
        self.readout.publish(&self.state);
    }

    fn decide(&mut self, estimate: PitchEstimate, params: &ParamSnapshot) {
        self.stats.windows += 1;

        if estimate.frequency > 0.0 && estimate.confidence >= params.confidence_threshold {
            self.state.pitch_cv = hz_to_cv(estimate.frequency, params.octave);
            self.state.pitch_hz = estimate.frequency;
            self.state.gate = GATE_ON;
            self.stats.accepted += 1;
        } else if params.hold_output_pitch {
            // CV and Hz readout both stay on the last accepted pitch
            self.state.gate = GATE_OFF;
        } else {
            self.state.pitch_cv = 0.0;
            self.state.pitch_hz = 0.0;
            self.state.gate = GATE_OFF;
        }

        self.state.confidence = estimate.confidence;
    }

    /// Set the estimator tolerance (0-1), effective from the next detection.
    pub fn set_tolerance(&mut self, tolerance: f32) {
        self.params.set_tolerance(tolerance);
        self.estimator.set_tolerance(tolerance);
        self.applied_tolerance = tolerance;
    }

    /// Configured tolerance (0-1).
    pub fn tolerance(&self) -> f32 {
        self.params.tolerance()
    }

    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.params.set_sensitivity(sensitivity);
        self.accumulator.set_sensitivity(sensitivity);
    }

    /// Replace all tunables. Held pitch state and write position are kept.
    pub fn apply_settings(&mut self, settings: &PitchTrackerSettings) {
        self.params.apply(settings);
        self.accumulator.set_sensitivity(settings.sensitivity);
        let tolerance = self.params.tolerance();
        self.set_tolerance(tolerance);
    }

    pub fn settings(&self) -> PitchTrackerSettings {
        self.params.settings()
    }

    /// Rebuild the estimator for a new sample rate.
    ///
    /// The configured tolerance carries over and held pitch state is cleared.
    /// On failure the previous estimator stays in place.
    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<()> {
        let mut estimator = match self.factory.create(sample_rate) {
            Ok(estimator) => estimator,
            Err(e) => {
                tracing::warn!(
                    "Estimator rebuild at {} Hz failed, keeping {} Hz: {}",
                    sample_rate,
                    self.sample_rate,
                    e
                );
                return Err(e.into());
            }
        };

        if estimator.window_size() != self.accumulator.capacity() {
            tracing::warn!(
                "Rebuilt estimator expects {} samples, tracker window is {}",
                estimator.window_size(),
                self.accumulator.capacity()
            );
            return Err(Error::EstimatorConstruction(format!(
                "window size changed from {} to {}",
                self.accumulator.capacity(),
                estimator.window_size()
            )));
        }

        let tolerance = self.params.tolerance();
        estimator.set_tolerance(tolerance);

        self.estimator = estimator;
        self.applied_tolerance = tolerance;
        self.sample_rate = sample_rate;
        self.reset();

        tracing::debug!(
            "Estimator rebuilt at {} Hz, tolerance={}",
            sample_rate,
            tolerance
        );
        Ok(())
    }

    /// Rewind the write position before processing resumes.
    pub fn activate(&mut self) {
        self.accumulator.reset();
    }

    /// Clear held pitch, confidence and gate, and rewind the write position.
    pub fn reset(&mut self) {
        self.accumulator.reset();
        self.state = TrackerState::default();
        self.readout.publish(&self.state);
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn stats(&self) -> TrackerStats {
        self.stats
    }

    pub fn estimator(&self) -> &dyn PitchEstimator {
        self.estimator.as_ref()
    }

    pub fn params(&self) -> &PitchTrackerParams {
        &self.params
    }

    pub fn readout(&self) -> &PitchReadout {
        &self.readout
    }

    pub fn handle(&self) -> PitchTrackerHandle {
        PitchTrackerHandle::new(Arc::clone(&self.params), Arc::clone(&self.readout))
    }

    pub fn buffer_size(&self) -> usize {
        self.accumulator.capacity()
    }

    /// Output latency in samples.
    pub fn latency(&self) -> usize {
        self.accumulator.capacity()
    }

    /// Next write index into the analysis window.
    pub fn position(&self) -> usize {
        self.accumulator.position()
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}

impl std::fmt::Debug for PitchTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PitchTracker")
            .field("buffer_size", &self.accumulator.capacity())
            .field("position", &self.accumulator.position())
            .field("sample_rate", &self.sample_rate)
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    const WINDOW: usize = 16;

    /// Replays a fixed list of estimates, repeating the last one.
    struct Scripted {
        script: Arc<Mutex<Vec<PitchEstimate>>>,
        calls: usize,
        tolerance: f32,
        window: usize,
        sample_rate: f64,
    }

    impl PitchEstimator for Scripted {
        fn detect(&mut self, window: &[f32]) -> PitchEstimate {
            assert_eq!(window.len(), self.window);
            let script = self.script.lock().unwrap();
            let estimate = script
                .get(self.calls)
                .or(script.last())
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

    struct ScriptedFactory {
        script: Arc<Mutex<Vec<PitchEstimate>>>,
        fail: Arc<AtomicBool>,
        window: usize,
    }

    impl EstimatorFactory for ScriptedFactory {
        fn create(&self, sample_rate: f64) -> cvpitch_analysis::Result<Box<dyn PitchEstimator>> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(cvpitch_analysis::Error::InvalidWindow("refused".into()));
            }
            Ok(Box::new(Scripted {
                script: Arc::clone(&self.script),
                calls: 0,
                tolerance: 0.15,
                window: self.window,
                sample_rate,
            }))
        }
    }

    fn tracker(script: Vec<PitchEstimate>, settings: PitchTrackerSettings) -> PitchTracker {
        let factory = ScriptedFactory {
            script: Arc::new(Mutex::new(script)),
            fail: Arc::new(AtomicBool::new(false)),
            window: WINDOW,
        };
        PitchTracker::with_factory(factory, 48000.0, &settings).expect("tracker")
    }

    fn settings(octave: i32, hold: bool) -> PitchTrackerSettings {
        PitchTrackerSettings {
            octave,
            hold_output_pitch: hold,
            ..Default::default()
        }
    }

    fn run_window(tracker: &mut PitchTracker) -> (f32, f32) {
        let mut last = (0.0, 0.0);
        for _ in 0..WINDOW {
            last = tracker.process_sample(0.1);
        }
        last
    }

    #[test]
    fn test_hz_to_cv_mapping() {
        assert_eq!(hz_to_cv(440.0, 0), 5.75);
        assert_eq!(hz_to_cv(440.0, 1), 6.75);
        assert_relative_eq!(hz_to_cv(880.0, 0), 6.75, epsilon = 1e-5);
        assert_relative_eq!(hz_to_cv(440.0, -3), 2.75, epsilon = 1e-5);
    }

    #[test]
    fn test_hz_to_cv_clamps() {
        assert_eq!(hz_to_cv(1.0, -4), 0.0);
        assert_eq!(hz_to_cv(100_000.0, 4), 10.0);
        assert_eq!(hz_to_cv(f32::INFINITY, 0), 10.0);
    }

    #[test]
    fn test_outputs_held_until_window_full() {
        let mut t = tracker(vec![PitchEstimate::new(440.0, 0.9)], settings(0, false));
        for _ in 0..WINDOW - 1 {
            assert_eq!(t.process_sample(0.5), (0.0, GATE_OFF));
        }
        assert_eq!(t.process_sample(0.5), (5.75, GATE_ON));
        assert_eq!(t.process_sample(0.5), (5.75, GATE_ON));
        assert_eq!(t.stats().windows, 1);
    }

    #[test]
    fn test_confidence_threshold_is_inclusive() {
        let threshold = PitchTrackerParams::default().confidence_threshold();
        let mut t = tracker(
            vec![
                PitchEstimate::new(440.0, threshold),
                PitchEstimate::new(440.0, threshold - 1e-4),
            ],
            settings(0, false),
        );
        assert_eq!(run_window(&mut t), (5.75, GATE_ON));
        assert_eq!(run_window(&mut t), (0.0, GATE_OFF));
    }

    #[test]
    fn test_hold_keeps_pitch_and_drops_gate() {
        let mut t = tracker(
            vec![
                PitchEstimate::new(440.0, 0.9),
                PitchEstimate::new(0.0, 0.05),
            ],
            settings(0, true),
        );
        assert_eq!(run_window(&mut t), (5.75, GATE_ON));
        assert_eq!(run_window(&mut t), (5.75, GATE_OFF));
        assert_eq!(t.state().pitch_hz, 440.0);
        assert_eq!(t.state().confidence, 0.05);
    }

    #[test]
    fn test_rejection_without_hold_resets() {
        let mut t = tracker(
            vec![
                PitchEstimate::new(440.0, 0.9),
                PitchEstimate::new(300.0, 0.01),
            ],
            settings(0, false),
        );
        run_window(&mut t);
        assert_eq!(run_window(&mut t), (0.0, GATE_OFF));
        assert_eq!(t.state().pitch_hz, 0.0);
        assert_eq!(t.readout().detected_pitch(), 0.0);
        assert_eq!(t.stats().accepted, 1);
    }

    #[test]
    fn test_gate_persists_across_blocks() {
        let mut t = tracker(vec![PitchEstimate::new(440.0, 0.9)], settings(0, false));
        let input = vec![0.1; WINDOW + 3];
        let mut pitch = vec![0.0; WINDOW + 3];
        let mut gate = vec![0.0; WINDOW + 3];
        t.process_block(&input, &mut pitch, &mut gate);

        let mut pitch2 = vec![0.0; 4];
        let mut gate2 = vec![0.0; 4];
        t.process_block(&input[..4], &mut pitch2, &mut gate2);
        assert!(gate2.iter().all(|&g| g == GATE_ON));
        assert!(pitch2.iter().all(|&p| p == 5.75));
    }

    #[test]
    fn test_octave_read_at_window_boundary() {
        let mut t = tracker(vec![PitchEstimate::new(440.0, 0.9)], settings(0, false));
        for _ in 0..WINDOW / 2 {
            t.process_sample(0.1);
        }
        t.handle().set_octave(1);
        for _ in 0..WINDOW / 2 - 1 {
            assert_eq!(t.process_sample(0.1).0, 0.0);
        }
        assert_eq!(t.process_sample(0.1).0, 6.75);
    }

    #[test]
    fn test_tolerance_forwarded_from_handle_at_next_window() {
        let mut t = tracker(vec![PitchEstimate::UNVOICED], PitchTrackerSettings::default());
        assert_relative_eq!(t.estimator().tolerance(), 0.0625);

        t.handle().set_tolerance(30.0);
        assert_relative_eq!(t.estimator().tolerance(), 0.0625);
        run_window(&mut t);
        assert_relative_eq!(t.estimator().tolerance(), 0.3);
    }

    #[test]
    fn test_set_tolerance_is_immediate() {
        let mut t = tracker(vec![PitchEstimate::UNVOICED], PitchTrackerSettings::default());
        t.set_tolerance(0.4);
        assert_eq!(t.estimator().tolerance(), 0.4);
        assert_eq!(t.tolerance(), 0.4);
    }

    #[test]
    fn test_sample_rate_change_keeps_tolerance() {
        let mut t = tracker(vec![PitchEstimate::new(440.0, 0.9)], settings(0, false));
        t.set_tolerance(0.2);
        run_window(&mut t);

        t.set_sample_rate(96000.0).expect("rebuild");
        assert_eq!(t.estimator().tolerance(), 0.2);
        assert_eq!(t.estimator().sample_rate(), 96000.0);
        assert_eq!(t.sample_rate(), 96000.0);
        assert_eq!(t.state(), TrackerState::default());
        assert_eq!(t.position(), 0);
    }

    #[test]
    fn test_failed_rebuild_keeps_previous_estimator() {
        let fail = Arc::new(AtomicBool::new(false));
        let factory = ScriptedFactory {
            script: Arc::new(Mutex::new(vec![PitchEstimate::new(440.0, 0.9)])),
            fail: Arc::clone(&fail),
            window: WINDOW,
        };
        let mut t =
            PitchTracker::with_factory(factory, 44100.0, &settings(0, false)).expect("tracker");
        t.set_tolerance(0.3);
        run_window(&mut t);

        fail.store(true, Ordering::SeqCst);
        assert!(t.set_sample_rate(48000.0).is_err());
        assert_eq!(t.sample_rate(), 44100.0);
        assert_eq!(t.estimator().sample_rate(), 44100.0);
        assert_eq!(t.estimator().tolerance(), 0.3);
        assert_eq!(t.state().pitch_cv, 5.75);
        assert_eq!(run_window(&mut t), (5.75, GATE_ON));
    }

    #[test]
    fn test_construction_failure_is_an_error() {
        let factory = ScriptedFactory {
            script: Arc::new(Mutex::new(Vec::new())),
            fail: Arc::new(AtomicBool::new(true)),
            window: WINDOW,
        };
        let result = PitchTracker::with_factory(factory, 48000.0, &PitchTrackerSettings::default());
        assert!(matches!(result, Err(Error::Analysis(_))));
    }

    #[test]
    fn test_activate_rewinds_without_clearing_state() {
        let mut t = tracker(vec![PitchEstimate::new(440.0, 0.9)], settings(0, false));
        run_window(&mut t);
        t.process_sample(0.1);
        assert_eq!(t.position(), 1);

        t.activate();
        assert_eq!(t.position(), 0);
        assert_eq!(t.state().pitch_cv, 5.75);
    }

    #[test]
    fn test_apply_settings_keeps_held_pitch() {
        let mut t = tracker(vec![PitchEstimate::new(440.0, 0.9)], settings(0, false));
        run_window(&mut t);
        t.process_sample(0.1);

        t.apply_settings(&PitchTrackerSettings::default());
        assert_eq!(t.position(), 1);
        assert_eq!(t.state().pitch_cv, 5.75);
        assert_relative_eq!(t.estimator().tolerance(), 0.0625);
        assert_eq!(t.params().octave(), -3);
    }

    #[test]
    fn test_real_estimator_tracks_sine() {
        let config = TrackerConfig::default().with_window(1408, 1);
        let mut t = PitchTracker::with_factory(
            config,
            48000.0,
            &PitchTrackerSettings {
                sensitivity: 1.0,
                octave: 0,
                ..Default::default()
            },
        )
        .expect("tracker");

        let mut last = (0.0, 0.0);
        for i in 0..1408 * 2 {
            let s = 0.5 * (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 48000.0).sin();
            last = t.process_sample(s);
        }
        let expected = hz_to_cv(1000.0, 0);
        assert_relative_eq!(last.0, expected, epsilon = 0.01);
        assert_eq!(last.1, GATE_ON);
    }
}

//! The estimator capability and its construction.

use crate::{PitchEstimate, Result, Yin, YinFast};
use cvpitch_core::{validate_sample_rate, Algorithm, TrackerConfig};

/// A monophonic pitch estimator invoked once per full analysis window.
///
/// Implementations must be real-time safe in [`detect`](Self::detect): bounded
/// work proportional to the window, no allocation, no I/O.
pub trait PitchEstimator: Send {
    /// Estimate the pitch of one full window.
    ///
    /// `frequency` is 0.0 when no determinate pitch is found. `confidence`
    /// is always in `[0, 1]`.
    fn detect(&mut self, window: &[f32]) -> PitchEstimate;

    /// Set the pitch/no-pitch decision tolerance, in `[0, 1]`.
    fn set_tolerance(&mut self, tolerance: f32);

    fn tolerance(&self) -> f32;

    /// Number of samples `detect` expects.
    fn window_size(&self) -> usize;

    fn sample_rate(&self) -> f64;
}

/// Builds estimators for a given sample rate.
///
/// The tracker keeps its factory so the estimator can be torn down and
/// recreated when the host changes the sample rate.
pub trait EstimatorFactory: Send {
    fn create(&self, sample_rate: f64) -> Result<Box<dyn PitchEstimator>>;
}

impl EstimatorFactory for TrackerConfig {
    fn create(&self, sample_rate: f64) -> Result<Box<dyn PitchEstimator>> {
        self.validate()?;
        validate_sample_rate(sample_rate)?;

        let estimator: Box<dyn PitchEstimator> = match self.algorithm {
            Algorithm::Yin => Box::new(
                Yin::new(self.buffer_size, self.hop_size, sample_rate)?
                    .with_silence_threshold_db(self.silence_threshold_db),
            ),
            Algorithm::YinFast => Box::new(
                YinFast::new(self.buffer_size, self.hop_size, sample_rate)?
                    .with_silence_threshold_db(self.silence_threshold_db),
            ),
        };

        tracing::debug!(
            "Created {} estimator: window={} hop={} sample_rate={}",
            self.algorithm,
            self.buffer_size,
            self.hop_size,
            sample_rate
        );

        Ok(estimator)
    }
}

impl EstimatorFactory for Box<dyn EstimatorFactory> {
    fn create(&self, sample_rate: f64) -> Result<Box<dyn PitchEstimator>> {
        (**self).create(sample_rate)
    }
}

/// Adapts a closure into an [`EstimatorFactory`]. See [`factory_fn`].
pub struct FnFactory<F>(F);

/// Build estimators with a closure, for estimators outside this crate.
///
/// ```rust
/// use cvpitch_analysis::{factory_fn, EstimatorFactory, PitchEstimator, Yin};
///
/// let factory = factory_fn(|sample_rate| {
///     Ok(Box::new(Yin::new(352, 2, sample_rate)?) as Box<dyn PitchEstimator>)
/// });
/// assert_eq!(factory.create(44100.0).unwrap().window_size(), 352);
/// ```
pub fn factory_fn<F>(f: F) -> FnFactory<F>
where
    F: Fn(f64) -> Result<Box<dyn PitchEstimator>> + Send,
{
    FnFactory(f)
}

impl<F> EstimatorFactory for FnFactory<F>
where
    F: Fn(f64) -> Result<Box<dyn PitchEstimator>> + Send,
{
    fn create(&self, sample_rate: f64) -> Result<Box<dyn PitchEstimator>> {
        (self.0)(sample_rate)
    }
}

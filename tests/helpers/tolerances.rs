//! Tolerance constants for pitch tracker tests.

/// Floating point rounding in the CV mapping.
pub const CV_EPSILON: f32 = 1e-5;

/// One cent expressed in CV units (1/1200 of an octave).
pub const CENT_CV: f32 = 1.0 / 1200.0;

/// Estimator frequency error on clean sines, relative.
pub const PITCH_RELATIVE: f32 = 0.01;

//! Parameter bounds for host-exposed controls.
//!
//! Hosts exchange either real values (what the user sees, e.g. `12.5` for a
//! percentage) or normalized values in 0.0-1.0 (automation lanes). A
//! [`ParameterRange`] converts between the two and clamps incoming writes.
//!
//! # Example
//!
//! ```
//! use cvpitch_core::{ParameterRange, ParameterScale};
//!
//! let octave = ParameterRange::integer(-4, 4, -3);
//! assert_eq!(octave.scale, ParameterScale::Integer);
//! assert_eq!(octave.denormalize(0.5), 0.0);
//! assert_eq!(octave.clamp(7.0), 4.0);
//! ```

use serde::{Deserialize, Serialize};

/// How a parameter value maps between normalized (0-1) and real values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParameterScale {
    /// `real = min + normalized * (max - min)`
    #[default]
    Linear,

    /// On/off. Normalized < 0.5 is `min`, otherwise `max`.
    Toggle,

    /// Whole steps between `min` and `max`.
    Integer,
}

/// Valid range, default and scaling of a single parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub scale: ParameterScale,
}

impl ParameterRange {
    /// Create a new range. `default` is clamped into `[min, max]`.
    pub fn new(min: f32, max: f32, default: f32, scale: ParameterScale) -> Self {
        debug_assert!(max > min, "max must be greater than min");

        Self {
            min,
            max,
            default: default.clamp(min, max),
            scale,
        }
    }

    pub fn linear(min: f32, max: f32, default: f32) -> Self {
        Self::new(min, max, default, ParameterScale::Linear)
    }

    pub fn toggle(default_on: bool) -> Self {
        Self::new(
            0.0,
            1.0,
            if default_on { 1.0 } else { 0.0 },
            ParameterScale::Toggle,
        )
    }

    pub fn integer(min: i32, max: i32, default: i32) -> Self {
        Self::new(
            min as f32,
            max as f32,
            default as f32,
            ParameterScale::Integer,
        )
    }

    pub fn is_integer(&self) -> bool {
        matches!(self.scale, ParameterScale::Integer | ParameterScale::Toggle)
    }

    /// Clamp a real value into range, snapping stepped scales.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        let value = value.clamp(self.min, self.max);
        match self.scale {
            ParameterScale::Linear => value,
            ParameterScale::Integer => value.round(),
            ParameterScale::Toggle => {
                if value >= (self.min + self.max) * 0.5 {
                    self.max
                } else {
                    self.min
                }
            }
        }
    }

    /// Convert a real value to normalized (0.0-1.0).
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range <= 0.0 {
            return 0.0;
        }
        (self.clamp(value) - self.min) / range
    }

    /// Convert a normalized value (0.0-1.0) to a real value.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let normalized = normalized.clamp(0.0, 1.0);
        self.clamp(self.min + normalized * (self.max - self.min))
    }

    /// Number of discrete steps, 0 for continuous parameters.
    pub fn step_count(&self) -> u32 {
        match self.scale {
            ParameterScale::Linear => 0,
            ParameterScale::Toggle => 1,
            ParameterScale::Integer => (self.max - self.min).round() as u32,
        }
    }
}

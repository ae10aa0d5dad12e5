//! Speech rate value object
//!
//! A user-adjustable playback speed multiplier. Values outside the supported
//! range are clamped rather than rejected, so a slider in a child's hands can
//! never produce an invalid rate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Speech rate multiplier, clamped to `[0.5, 2.0]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct SpeechRate(f32);

impl SpeechRate {
    /// Slowest supported rate
    pub const MIN: f32 = 0.5;
    /// Fastest supported rate
    pub const MAX: f32 = 2.0;

    /// Create a rate, clamping out-of-range values into `[MIN, MAX]`
    ///
    /// Non-finite input falls back to the normal rate of 1.0.
    pub fn new(value: f32) -> Self {
        if value.is_finite() {
            Self(value.clamp(Self::MIN, Self::MAX))
        } else {
            Self(1.0)
        }
    }

    /// Get the rate as a plain multiplier
    pub const fn value(self) -> f32 {
        self.0
    }
}

impl Default for SpeechRate {
    fn default() -> Self {
        Self(1.0)
    }
}

impl From<f32> for SpeechRate {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<SpeechRate> for f32 {
    fn from(rate: SpeechRate) -> Self {
        rate.0
    }
}

impl fmt::Display for SpeechRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}x", self.0)
    }
}

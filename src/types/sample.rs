//! One observation fed to the rep counter

use serde::{Deserialize, Serialize};

/// A single tick of the signal stream.
///
/// `signal` is `None` when the upstream estimator produced nothing usable
/// (absent landmarks, degenerate geometry). Non-finite values are folded into
/// `None` by [`Sample::value`], so NaN never reaches the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    pub signal: Option<f64>,
}

impl Sample {
    /// Sample carrying a measured value
    pub fn new(signal: f64) -> Self {
        Self { signal: Some(signal) }
    }

    /// "No information this tick"
    pub fn missing() -> Self {
        Self { signal: None }
    }

    /// The usable value, if any
    pub fn value(&self) -> Option<f64> {
        self.signal.filter(|v| v.is_finite())
    }

    pub fn is_missing(&self) -> bool {
        self.value().is_none()
    }
}

impl From<f64> for Sample {
    fn from(signal: f64) -> Self {
        Self::new(signal)
    }
}

impl From<Option<f64>> for Sample {
    fn from(signal: Option<f64>) -> Self {
        Self { signal }
    }
}

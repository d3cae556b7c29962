//! Hysteresis band for the rep counter

use serde::{Deserialize, Serialize};

use crate::error::ThresholdError;
use crate::MIN_DEAD_ZONE;

/// Which way the signal moves as the lifter goes deeper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Larger signal = deeper (hip/knee vertical separation)
    Increasing,
    /// Smaller signal = deeper (knee angle)
    Decreasing,
}

/// Two thresholds with a dead zone between them.
///
/// The deeper direction is implied by their order: `down_enter > up_enter`
/// means the signal grows with depth, `down_enter < up_enter` means it
/// shrinks. Construct through [`Thresholds::new`]; deserialized values should
/// go through [`Thresholds::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub down_enter: f64,
    pub up_enter: f64,
}

impl Thresholds {
    /// Build a validated band
    pub fn new(down_enter: f64, up_enter: f64) -> Result<Self, ThresholdError> {
        let thresholds = Self { down_enter, up_enter };
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Reject non-finite values and bands without a usable dead zone
    pub fn validate(&self) -> Result<(), ThresholdError> {
        if !self.down_enter.is_finite() || !self.up_enter.is_finite() {
            return Err(ThresholdError::NotFinite {
                down_enter: self.down_enter,
                up_enter: self.up_enter,
            });
        }
        let width = self.dead_zone();
        if width < MIN_DEAD_ZONE {
            return Err(ThresholdError::DeadZoneTooNarrow {
                width,
                min: MIN_DEAD_ZONE,
            });
        }
        Ok(())
    }

    /// Like [`Thresholds::validate`], and `down_enter` must lie deeper than
    /// `up_enter` for a signal moving in `expected`
    pub fn validate_for(&self, expected: Direction) -> Result<(), ThresholdError> {
        self.validate()?;
        if self.direction() != expected {
            return Err(ThresholdError::WrongDirection {
                down_enter: self.down_enter,
                up_enter: self.up_enter,
                expected,
            });
        }
        Ok(())
    }

    pub fn direction(&self) -> Direction {
        if self.down_enter > self.up_enter {
            Direction::Increasing
        } else {
            Direction::Decreasing
        }
    }

    /// Width of the band in which no transition can fire
    pub fn dead_zone(&self) -> f64 {
        (self.down_enter - self.up_enter).abs()
    }

    /// Signal strictly past `down_enter` in the deeper direction
    pub fn is_past_down(&self, signal: f64) -> bool {
        match self.direction() {
            Direction::Increasing => signal > self.down_enter,
            Direction::Decreasing => signal < self.down_enter,
        }
    }

    /// Signal strictly past `up_enter` in the shallower direction
    pub fn is_past_up(&self, signal: f64) -> bool {
        match self.direction() {
            Direction::Increasing => signal < self.up_enter,
            Direction::Decreasing => signal > self.up_enter,
        }
    }
}

//! Rep Counter: two-phase hysteresis over a scalar depth signal
//!
//! Transitions:
//! - UP → DOWN: signal crosses past down_enter (deeper direction), emits DepthReached
//! - DOWN → UP: signal crosses back past up_enter, count += 1, emits RepCompleted
//! - anything else, including missing samples: no transition, no event

use tracing::debug;

use crate::error::ThresholdError;
use crate::types::{Phase, ReasonCode, RepEvent, Sample, ObserveOutput, Thresholds};
use crate::{DEPTH_DOWN_ENTER, DEPTH_UP_ENTER};

/// Squat rep counter.
///
/// One instance per session. `observe` takes `&mut self`, so a counter
/// cannot be driven by two callers at once; samples must arrive in order.
#[derive(Debug, Clone)]
pub struct RepCounter {
    /// Current phase
    phase: Phase,
    /// Completed reps
    rep_count: u32,
    /// Hysteresis band
    thresholds: Thresholds,
    /// Samples seen, including missing ones
    samples_observed: u64,
    /// Samples that carried no usable signal
    samples_missing: u64,
    /// Last usable signal
    last_signal: Option<f64>,
}

impl Default for RepCounter {
    fn default() -> Self {
        Self {
            phase: Phase::Up,
            rep_count: 0,
            thresholds: Thresholds {
                down_enter: DEPTH_DOWN_ENTER,
                up_enter: DEPTH_UP_ENTER,
            },
            samples_observed: 0,
            samples_missing: 0,
            last_signal: None,
        }
    }
}

impl RepCounter {
    /// Create a counter, rejecting bands without a dead zone
    pub fn new(thresholds: Thresholds) -> Result<Self, ThresholdError> {
        thresholds.validate()?;
        Ok(Self {
            thresholds,
            ..Self::default()
        })
    }

    /// Feed one sample, return the event it fired (if any)
    pub fn observe(&mut self, sample: impl Into<Sample>) -> Option<RepEvent> {
        self.observe_detailed(sample).event
    }

    /// Feed one sample, return the full output with reason code
    pub fn observe_detailed(&mut self, sample: impl Into<Sample>) -> ObserveOutput {
        let sample = sample.into();
        self.samples_observed += 1;

        let Some(signal) = sample.value() else {
            self.samples_missing += 1;
            return self.output(None, None, ReasonCode::R105_SAMPLE_MISSING);
        };
        self.last_signal = Some(signal);

        let (event, reason) = self.compute_transition(signal);
        match event {
            Some(RepEvent::DepthReached) => {
                self.phase = Phase::Down;
                debug!(signal, down_enter = self.thresholds.down_enter, "depth reached");
            }
            Some(RepEvent::RepCompleted(count)) => {
                self.phase = Phase::Up;
                self.rep_count = count;
                debug!(signal, reps = count, "rep completed");
            }
            None => {}
        }

        self.output(Some(signal), event, reason)
    }

    /// Decide the transition for a usable signal without mutating
    fn compute_transition(&self, signal: f64) -> (Option<RepEvent>, ReasonCode) {
        match self.phase {
            Phase::Up => {
                if self.thresholds.is_past_down(signal) {
                    (Some(RepEvent::DepthReached), ReasonCode::R103_DEPTH_REACHED)
                } else {
                    (None, ReasonCode::R101_PHASE_UP_HOLD)
                }
            }
            Phase::Down => {
                if self.thresholds.is_past_up(signal) {
                    (
                        Some(RepEvent::RepCompleted(self.rep_count + 1)),
                        ReasonCode::R104_REP_COMPLETED,
                    )
                } else {
                    (None, ReasonCode::R102_PHASE_DOWN_HOLD)
                }
            }
        }
    }

    fn output(&self, signal: Option<f64>, event: Option<RepEvent>, reason: ReasonCode) -> ObserveOutput {
        ObserveOutput::new(signal, self.phase, self.rep_count, event, reason)
    }

    /// Get current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Get completed reps
    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn samples_observed(&self) -> u64 {
        self.samples_observed
    }

    pub fn samples_missing(&self) -> u64 {
        self.samples_missing
    }

    pub fn last_signal(&self) -> Option<f64> {
        self.last_signal
    }

    /// Get current output without observing
    pub fn current_output(&self) -> ObserveOutput {
        let reason = match self.phase {
            Phase::Up => ReasonCode::R101_PHASE_UP_HOLD,
            Phase::Down => ReasonCode::R102_PHASE_DOWN_HOLD,
        };
        self.output(self.last_signal, None, reason)
    }

    /// Back to UP with zero reps, keeping the thresholds
    pub fn reset(&mut self) {
        *self = Self {
            thresholds: self.thresholds,
            ..Self::default()
        };
    }
}

// =============================================================================
// TESTS
// =============================================================================

//! Signal derivation: landmarks → the scalar the rep counter watches
//!
//! Two interchangeable strategies feed the same hysteresis contract:
//! - vertical displacement: hip.y - knee.y, grows as the hip sinks
//! - knee angle: hip/knee/ankle angle in degrees, shrinks as the knee bends

use crate::core::angle::landmark_angle;
use crate::types::{Joint, PoseFrame, ReasonCode, Sample, SignalStrategyKind, Thresholds};
use crate::{DEPTH_DOWN_ENTER, DEPTH_UP_ENTER, KNEE_DOWN_ENTER_DEG, KNEE_UP_ENTER_DEG};

/// Derived sample plus why it may be empty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derived {
    pub sample: Sample,
    /// Set when the sample is missing
    pub reason: Option<ReasonCode>,
}

impl Derived {
    fn value(signal: f64) -> Self {
        Self { sample: Sample::new(signal), reason: None }
    }

    fn missing(reason: ReasonCode) -> Self {
        Self { sample: Sample::missing(), reason: Some(reason) }
    }
}

/// Signal derivation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignalStrategy {
    kind: SignalStrategyKind,
}

impl SignalStrategy {
    pub fn new(kind: SignalStrategyKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> SignalStrategyKind {
        self.kind
    }

    /// Band that matches this strategy's units and direction
    pub fn default_thresholds(&self) -> Thresholds {
        match self.kind {
            SignalStrategyKind::VerticalDisplacement => Thresholds {
                down_enter: DEPTH_DOWN_ENTER,
                up_enter: DEPTH_UP_ENTER,
            },
            SignalStrategyKind::KneeAngle => Thresholds {
                down_enter: KNEE_DOWN_ENTER_DEG,
                up_enter: KNEE_UP_ENTER_DEG,
            },
        }
    }

    /// Derive the sample for one frame
    pub fn derive(&self, frame: &PoseFrame) -> Derived {
        let (Some(hip), Some(knee)) = (frame.get(Joint::LeftHip), frame.get(Joint::LeftKnee)) else {
            return Derived::missing(ReasonCode::R201_LANDMARKS_MISSING);
        };

        match self.kind {
            SignalStrategyKind::VerticalDisplacement => Derived::value(hip.y - knee.y),
            SignalStrategyKind::KneeAngle => {
                let Some(ankle) = frame.get(Joint::LeftAnkle) else {
                    return Derived::missing(ReasonCode::R201_LANDMARKS_MISSING);
                };
                match landmark_angle(hip, knee, ankle) {
                    Some(angle) => Derived::value(angle),
                    None => Derived::missing(ReasonCode::R202_GEOMETRY_DEGENERATE),
                }
            }
        }
    }
}

//! Session summary record

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use super::thresholds::Direction;

/// Strategy used to turn landmarks into the counter's signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalStrategyKind {
    /// hip.y - knee.y
    #[default]
    VerticalDisplacement,
    /// hip/knee/ankle angle in degrees
    KneeAngle,
}

impl SignalStrategyKind {
    /// How this strategy's signal moves as the squat deepens
    pub fn direction(&self) -> Direction {
        match self {
            SignalStrategyKind::VerticalDisplacement => Direction::Increasing,
            SignalStrategyKind::KneeAngle => Direction::Decreasing,
        }
    }
}

impl std::fmt::Display for SignalStrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SignalStrategyKind::VerticalDisplacement => "vertical-displacement",
            SignalStrategyKind::KneeAngle => "knee-angle",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for SignalStrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vertical-displacement" | "vertical" | "depth" => Ok(Self::VerticalDisplacement),
            "knee-angle" | "knee" | "angle" => Ok(Self::KneeAngle),
            other => Err(format!("unknown signal strategy '{}'", other)),
        }
    }
}

/// Summary written when a session ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub reps: u32,
    pub strategy: SignalStrategyKind,
    /// Samples or frames fed to the counter
    pub frames_observed: u64,
    /// Of those, how many carried no usable signal
    pub frames_missing: u64,
    /// Times the back went from good to poor
    pub posture_warnings: u32,
}

impl SessionRecord {
    /// Reps per minute, 0 for zero-length sessions
    pub fn reps_per_minute(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            0.0
        } else {
            self.reps as f64 * 60.0 / self.duration_secs
        }
    }
}

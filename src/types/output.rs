//! Per-tick output structures

use colored::Colorize;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::types::{Phase, ReasonCode, RepEvent, PostureVerdict, DepthVerdict};

/// What the counter reports after each sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserveOutput {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Signal as observed (None = missing)
    pub signal: Option<f64>,
    /// Phase after this sample
    pub phase: Phase,
    /// Reps so far
    pub rep_count: u32,
    /// Event fired by this sample
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<RepEvent>,
    pub reason: ReasonCode,
}

impl ObserveOutput {
    pub fn new(
        signal: Option<f64>,
        phase: Phase,
        rep_count: u32,
        event: Option<RepEvent>,
        reason: ReasonCode,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            signal,
            phase,
            rep_count,
            event,
            reason,
        }
    }

    fn signal_string(&self) -> String {
        self.signal
            .map(|s| format!("{:.3}", s))
            .unwrap_or_else(|| "-".to_string())
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let line = format!(
            "{} signal={} | phase={} | reps={} | {}",
            self.phase.emoji(),
            self.signal_string(),
            self.phase,
            self.rep_count,
            self.reason.code(),
        );
        line.color(self.phase.color()).to_string()
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "signal={} | phase={} | reps={} | reason={}",
            self.signal_string(),
            self.phase,
            self.rep_count,
            self.reason.code()
        )
    }
}

/// Result of processing one pose frame.
///
/// `detected`, `reps` and `feedback` keep the shape the browser client
/// already understands; the rest is diagnostic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameOutput {
    pub detected: bool,
    pub reps: u32,
    /// Phrase to speak/show, empty when nothing new happened
    pub feedback: String,
    pub phase: Phase,
    pub signal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<RepEvent>,
    pub back_angle: Option<f64>,
    pub knee_angle: Option<f64>,
    pub posture: PostureVerdict,
    pub depth: DepthVerdict,
    pub reason: ReasonCode,
}

impl FrameOutput {
    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let mut line = format!(
            "{} reps={} | phase={} | back={} | knee={}",
            self.phase.emoji(),
            self.reps,
            self.phase,
            fmt_angle(self.back_angle),
            fmt_angle(self.knee_angle),
        );
        if !self.feedback.is_empty() {
            line.push_str(&format!(" | \"{}\"", self.feedback));
        }
        let line = line.color(self.phase.color());
        if self.posture == PostureVerdict::Poor {
            line.bold().to_string()
        } else {
            line.to_string()
        }
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "detected={} | reps={} | phase={} | back={} | knee={} | feedback={}",
            self.detected,
            self.reps,
            self.phase,
            fmt_angle(self.back_angle),
            fmt_angle(self.knee_angle),
            self.feedback,
        )
    }
}

fn fmt_angle(angle: Option<f64>) -> String {
    angle
        .map(|a| format!("{:.0}°", a))
        .unwrap_or_else(|| "-".to_string())
}

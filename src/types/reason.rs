//! Reason codes attached to every counter output

use serde::{Deserialize, Serialize};

/// Why the counter produced the output it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // R10x: Counter
    // =========================================================================
    /// Up, signal did not cross down_enter
    R101_PHASE_UP_HOLD,
    /// Down, signal did not cross up_enter
    R102_PHASE_DOWN_HOLD,
    /// Up → Down
    R103_DEPTH_REACHED,
    /// Down → Up, rep counted
    R104_REP_COMPLETED,
    /// No usable signal this tick
    R105_SAMPLE_MISSING,

    // =========================================================================
    // R20x: Frames
    // =========================================================================
    /// Frame lacked the joints the strategy needs
    R201_LANDMARKS_MISSING,
    /// Joints present but geometry degenerate
    R202_GEOMETRY_DEGENERATE,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::R101_PHASE_UP_HOLD => "R101_PHASE_UP_HOLD",
            Self::R102_PHASE_DOWN_HOLD => "R102_PHASE_DOWN_HOLD",
            Self::R103_DEPTH_REACHED => "R103_DEPTH_REACHED",
            Self::R104_REP_COMPLETED => "R104_REP_COMPLETED",
            Self::R105_SAMPLE_MISSING => "R105_SAMPLE_MISSING",
            Self::R201_LANDMARKS_MISSING => "R201_LANDMARKS_MISSING",
            Self::R202_GEOMETRY_DEGENERATE => "R202_GEOMETRY_DEGENERATE",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::R101_PHASE_UP_HOLD => "Standing",
            Self::R102_PHASE_DOWN_HOLD => "Holding depth",
            Self::R103_DEPTH_REACHED => "Depth reached",
            Self::R104_REP_COMPLETED => "Rep completed",
            Self::R105_SAMPLE_MISSING => "No signal this tick",
            Self::R201_LANDMARKS_MISSING => "Required landmarks not visible",
            Self::R202_GEOMETRY_DEGENERATE => "Landmarks coincide",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}

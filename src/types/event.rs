//! Coaching events and verdicts

use serde::{Deserialize, Serialize};

/// Discrete event emitted by the rep counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum RepEvent {
    /// Crossed into the bottom of the squat
    DepthReached,
    /// Stood back up; carries the new rep count
    RepCompleted(u32),
}

/// Back posture judgment over shoulder/hip/knee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostureVerdict {
    Good,
    Poor,
    /// Landmarks missing or degenerate
    #[default]
    Unknown,
}

/// Knee-depth judgment over hip/knee/ankle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthVerdict {
    Deep,
    Shallow,
    #[default]
    Unknown,
}

/// Anything worth telling the lifter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Rep(RepEvent),
    Posture(PostureVerdict),
}

impl Cue {
    /// Text handed to speech/UI collaborators
    pub fn phrase(&self) -> String {
        match self {
            Cue::Rep(RepEvent::DepthReached) => "Good depth".to_string(),
            Cue::Rep(RepEvent::RepCompleted(n)) => format!("Rep {}", n),
            Cue::Posture(PostureVerdict::Poor) => "Straighten your back".to_string(),
            Cue::Posture(_) => String::new(),
        }
    }
}

impl From<RepEvent> for Cue {
    fn from(event: RepEvent) -> Self {
        Cue::Rep(event)
    }
}

impl std::fmt::Display for RepEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepEvent::DepthReached => write!(f, "DEPTH_REACHED"),
            RepEvent::RepCompleted(n) => write!(f, "REP_COMPLETED({})", n),
        }
    }
}

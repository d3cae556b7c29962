//! Squat phase definitions

use serde::{Deserialize, Serialize};

/// The two positions a squat can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Standing, or rising out of the hole
    #[default]
    Up,
    /// Depth reached, waiting for the lifter to stand back up
    Down,
}

impl Phase {
    /// Terminal color name for `colored`
    pub fn color(&self) -> colored::Color {
        match self {
            Phase::Up => colored::Color::Green,
            Phase::Down => colored::Color::Yellow,
        }
    }

    /// Get emoji for phase
    pub fn emoji(&self) -> &'static str {
        match self {
            Phase::Up => "⬆",
            Phase::Down => "⬇",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Up => "UP",
            Phase::Down => "DOWN",
        };
        write!(f, "{}", name)
    }
}

//! GymBuddy: squat rep counting over pose-derived signals
//!
//! Pipeline: landmarks → signal strategy → RepCounter (hysteresis) → cues

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod types;

// =============================================================================
// VERTICAL DISPLACEMENT THRESHOLDS - hip.y - knee.y, normalized coordinates
// =============================================================================

/// Hip drops this far below the knee line → squat is "down"
pub const DEPTH_DOWN_ENTER: f64 = 0.10;

/// Hip rises back above this separation → squat is "up"
pub const DEPTH_UP_ENTER: f64 = 0.05;

// =============================================================================
// KNEE ANGLE THRESHOLDS - hip/knee/ankle, degrees
// =============================================================================

/// Knee bends below this angle → "down"
pub const KNEE_DOWN_ENTER_DEG: f64 = 110.0;

/// Knee straightens beyond this angle → "up"
pub const KNEE_UP_ENTER_DEG: f64 = 160.0;

// =============================================================================
// POSTURE
// =============================================================================

/// Shoulder/hip/knee angle below this is a rounded back
pub const BACK_MIN_ANGLE_DEG: f64 = 160.0;

/// Knee angle below this counts as a deep squat
pub const DEEP_KNEE_ANGLE_DEG: f64 = 90.0;

/// Landmarks with visibility below this are treated as absent
pub const MIN_VISIBILITY: f64 = 0.5;

/// Narrowest accepted gap between down_enter and up_enter
pub const MIN_DEAD_ZONE: f64 = 1e-3;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";

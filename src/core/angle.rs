//! Joint angle and posture classification
//!
//! Stateless; evaluated per frame independently of the counter phase.

use crate::types::{DepthVerdict, Landmark, PostureVerdict};

/// Rays shorter than this are treated as coincident points
const MIN_RAY_LENGTH: f64 = 1e-9;

/// Angle at `b` formed by `a`-`b`-`c`, in degrees within [0, 180].
///
/// Uses cos(θ) = (ba · bc) / (|ba| × |bc|). Returns `None` when two points
/// coincide or any coordinate is non-finite, never NaN.
pub fn calculate_angle(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Option<f64> {
    let ba = (a.0 - b.0, a.1 - b.1);
    let bc = (c.0 - b.0, c.1 - b.1);

    let mag_ba = ba.0.hypot(ba.1);
    let mag_bc = bc.0.hypot(bc.1);

    if !mag_ba.is_finite() || !mag_bc.is_finite() {
        return None;
    }
    if mag_ba < MIN_RAY_LENGTH || mag_bc < MIN_RAY_LENGTH {
        return None;
    }

    let dot = ba.0 * bc.0 + ba.1 * bc.1;
    let cos_angle = (dot / (mag_ba * mag_bc)).clamp(-1.0, 1.0);
    Some(cos_angle.acos().to_degrees())
}

/// `calculate_angle` over landmarks
pub fn landmark_angle(a: &Landmark, b: &Landmark, c: &Landmark) -> Option<f64> {
    calculate_angle(a.xy(), b.xy(), c.xy())
}

/// Back posture from the shoulder/hip/knee angle
pub fn classify_back(angle: Option<f64>, min_deg: f64) -> PostureVerdict {
    match angle {
        Some(a) if a < min_deg => PostureVerdict::Poor,
        Some(_) => PostureVerdict::Good,
        None => PostureVerdict::Unknown,
    }
}

/// Squat depth from the hip/knee/ankle angle
pub fn classify_knee(angle: Option<f64>, deep_deg: f64) -> DepthVerdict {
    match angle {
        Some(a) if a < deep_deg => DepthVerdict::Deep,
        Some(_) => DepthVerdict::Shallow,
        None => DepthVerdict::Unknown,
    }
}

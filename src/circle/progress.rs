use std::f32::consts::TAU;

use super::config::ProgressPolicy;

/// Revolution progress for an accumulated angle in radians.
///
/// Only the magnitude counts, so counterclockwise gestures report the same
/// value as clockwise ones.
pub fn progress(accumulated_angle: f32, policy: ProgressPolicy) -> f32 {
    let revolutions = accumulated_angle.abs() / TAU;
    match policy {
        ProgressPolicy::Saturating => revolutions.clamp(0.0, 1.0),
        ProgressPolicy::Unbounded => revolutions,
    }
}

use std::f32::consts::{PI, TAU};

use super::types::{Point, WindingDirection};

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum AngleStep {
    /// First point after the center froze; nothing to measure against yet.
    Anchored,
    Jitter,
    Advanced(f32),
    /// Discarded motion against the winding, still within tolerance.
    Contrary(f32),
    Reversed(f32),
}

pub(crate) struct AngleTracker {
    noise: f32,
    reversal_max_samples: u8,
    reversal_max_angle: f32,
    last_angle: Option<f32>,
    accumulated: f32,
    winding: WindingDirection,
    contrary_samples: u8,
}

impl AngleTracker {
    pub(crate) fn new(noise: f32, reversal_max_samples: u8, reversal_max_angle: f32) -> Self {
        Self {
            noise,
            reversal_max_samples,
            reversal_max_angle,
            last_angle: None,
            accumulated: 0.0,
            winding: WindingDirection::Unknown,
            contrary_samples: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.last_angle = None;
        self.accumulated = 0.0;
        self.winding = WindingDirection::Unknown;
        self.contrary_samples = 0;
    }

    pub(crate) fn accumulated(&self) -> f32 {
        self.accumulated
    }

    pub(crate) fn winding(&self) -> WindingDirection {
        self.winding
    }

    pub(crate) fn update(&mut self, point: Point, center: Point) -> AngleStep {
        let angle = (point.y - center.y).atan2(point.x - center.x);
        let Some(last_angle) = self.last_angle else {
            self.last_angle = Some(angle);
            return AngleStep::Anchored;
        };

        let delta = shortest_delta(last_angle, angle);
        let Some(sign) = self.winding.sign() else {
            if delta.abs() <= self.noise {
                return AngleStep::Jitter;
            }
            self.winding = WindingDirection::from_delta(delta);
            return self.advance(angle, delta);
        };

        if delta * sign > 0.0 {
            return self.advance(angle, delta);
        }

        if delta.abs() <= self.noise {
            return AngleStep::Jitter;
        }

        self.contrary_samples = self.contrary_samples.saturating_add(1);
        if self.contrary_samples > self.reversal_max_samples
            || delta.abs() > self.reversal_max_angle
        {
            AngleStep::Reversed(delta)
        } else {
            AngleStep::Contrary(delta)
        }
    }

    fn advance(&mut self, angle: f32, delta: f32) -> AngleStep {
        self.last_angle = Some(angle);
        self.accumulated += delta;
        self.contrary_samples = 0;
        AngleStep::Advanced(delta)
    }
}

/// Signed difference `to - from` folded into (-pi, pi].
pub(crate) fn shortest_delta(from: f32, to: f32) -> f32 {
    let mut delta = (to - from) % TAU;
    if delta > PI {
        delta -= TAU;
    } else if delta <= -PI {
        delta += TAU;
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: Point = Point::new(0.0, 0.0);

    fn on_circle(angle: f32) -> Point {
        Point::new(100.0 * angle.cos(), 100.0 * angle.sin())
    }

    fn tracker() -> AngleTracker {
        AngleTracker::new(0.05, 2, 0.35)
    }

    #[test]
    fn delta_wraps_across_pi_boundary() {
        let delta = shortest_delta(PI - 0.1, -PI + 0.1);
        assert!((delta - 0.2).abs() < 1e-5, "delta={delta}");

        let delta = shortest_delta(-PI + 0.1, PI - 0.1);
        assert!((delta + 0.2).abs() < 1e-5, "delta={delta}");
    }

    #[test]
    fn delta_stays_in_half_open_range() {
        assert!((shortest_delta(0.0, PI) - PI).abs() < 1e-6);
        assert!((shortest_delta(0.0, -PI) - PI).abs() < 1e-6);
        assert!(shortest_delta(0.3, 0.3).abs() < 1e-6);
    }

    #[test]
    fn first_point_only_anchors() {
        let mut tracker = tracker();
        assert_eq!(tracker.update(on_circle(0.0), CENTER), AngleStep::Anchored);
        assert_eq!(tracker.accumulated(), 0.0);
        assert_eq!(tracker.winding(), WindingDirection::Unknown);
    }

    #[test]
    fn accumulates_through_the_wrap_point() {
        let mut tracker = tracker();
        let _ = tracker.update(on_circle(2.8), CENTER);
        for step in 1..=6 {
            let step = tracker.update(on_circle(2.8 + step as f32 * 0.2), CENTER);
            assert!(matches!(step, AngleStep::Advanced(d) if d > 0.0));
        }
        assert!((tracker.accumulated() - 1.2).abs() < 1e-4);
        assert_eq!(tracker.winding(), WindingDirection::Clockwise);
    }

    #[test]
    fn counterclockwise_accumulates_negative_angle() {
        let mut tracker = tracker();
        let _ = tracker.update(on_circle(0.0), CENTER);
        let _ = tracker.update(on_circle(-0.3), CENTER);
        let _ = tracker.update(on_circle(-0.6), CENTER);
        assert_eq!(tracker.winding(), WindingDirection::CounterClockwise);
        assert!((tracker.accumulated() + 0.6).abs() < 1e-5);
    }

    #[test]
    fn slow_motion_below_noise_still_accumulates() {
        let mut tracker = tracker();
        let _ = tracker.update(on_circle(0.0), CENTER);
        assert_eq!(tracker.update(on_circle(0.03), CENTER), AngleStep::Jitter);
        assert!(matches!(
            tracker.update(on_circle(0.06), CENTER),
            AngleStep::Advanced(d) if (d - 0.06).abs() < 1e-5
        ));
    }

    #[test]
    fn small_contrary_jitter_is_ignored() {
        let mut tracker = tracker();
        let _ = tracker.update(on_circle(0.0), CENTER);
        let _ = tracker.update(on_circle(0.4), CENTER);
        assert_eq!(tracker.update(on_circle(0.37), CENTER), AngleStep::Jitter);
        assert!((tracker.accumulated() - 0.4).abs() < 1e-5);
        assert!(matches!(
            tracker.update(on_circle(0.5), CENTER),
            AngleStep::Advanced(d) if (d - 0.1).abs() < 1e-5
        ));
    }

    #[test]
    fn sustained_contrary_motion_reverses() {
        let mut tracker = tracker();
        let _ = tracker.update(on_circle(0.0), CENTER);
        let _ = tracker.update(on_circle(1.0), CENTER);

        assert!(matches!(
            tracker.update(on_circle(0.9), CENTER),
            AngleStep::Contrary(_)
        ));
        assert!(matches!(
            tracker.update(on_circle(0.88), CENTER),
            AngleStep::Contrary(_)
        ));
        assert!(matches!(
            tracker.update(on_circle(0.86), CENTER),
            AngleStep::Reversed(_)
        ));
        assert!((tracker.accumulated() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn large_contrary_jump_reverses_immediately() {
        let mut tracker = tracker();
        let _ = tracker.update(on_circle(0.0), CENTER);
        let _ = tracker.update(on_circle(1.0), CENTER);
        assert!(matches!(
            tracker.update(on_circle(0.5), CENTER),
            AngleStep::Reversed(d) if d < 0.0
        ));
    }

    #[test]
    fn forward_motion_clears_contrary_count() {
        let mut tracker = tracker();
        let _ = tracker.update(on_circle(0.0), CENTER);
        let _ = tracker.update(on_circle(1.0), CENTER);
        let _ = tracker.update(on_circle(0.9), CENTER);
        let _ = tracker.update(on_circle(0.9), CENTER);
        let _ = tracker.update(on_circle(1.2), CENTER);
        assert!(matches!(
            tracker.update(on_circle(1.1), CENTER),
            AngleStep::Contrary(_)
        ));
        assert!(matches!(
            tracker.update(on_circle(1.1), CENTER),
            AngleStep::Contrary(_)
        ));
    }

    #[test]
    fn repeated_point_is_not_an_advance() {
        let mut tracker = tracker();
        let _ = tracker.update(on_circle(0.0), CENTER);
        let _ = tracker.update(on_circle(1.0), CENTER);
        let _ = tracker.update(on_circle(0.9), CENTER);

        assert_eq!(tracker.update(on_circle(1.0), CENTER), AngleStep::Jitter);
        assert!((tracker.accumulated() - 1.0).abs() < 1e-5);
        // The contrary count survives, so the next backward step is the second.
        assert!(matches!(
            tracker.update(on_circle(0.88), CENTER),
            AngleStep::Contrary(_)
        ));
        assert!(matches!(
            tracker.update(on_circle(0.86), CENTER),
            AngleStep::Reversed(_)
        ));
    }

    #[test]
    fn reset_clears_angle_state() {
        let mut tracker = tracker();
        let _ = tracker.update(on_circle(0.0), CENTER);
        let _ = tracker.update(on_circle(1.0), CENTER);
        tracker.reset();
        assert_eq!(tracker.accumulated(), 0.0);
        assert_eq!(tracker.winding(), WindingDirection::Unknown);
        assert_eq!(tracker.update(on_circle(2.0), CENTER), AngleStep::Anchored);
    }
}

use super::{
    config::{CenterWindow, MIN_CENTER_WINDOW_SAMPLES},
    types::{squared_distance, GestureCenter, Point},
};

// det(Suu*Svv - Suv^2) relative to (Suu + Svv)^2. Roughly a 15 degree arc of
// clean samples sits at the floor; straight strokes land near zero.
const FIT_CONDITION_MIN: f64 = 1.0e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum CenterObservation {
    Pending,
    Established(GestureCenter),
    Degenerate,
}

pub(crate) struct CenterEstimator {
    window: CenterWindow,
    min_spacing_sq: f32,
    min_bow: f32,
    begin_ms: u64,
    points: Vec<Point>,
    center: GestureCenter,
}

impl CenterEstimator {
    pub(crate) fn new(window: CenterWindow, min_spacing: f32, min_bow: f32) -> Self {
        let capacity = match window {
            CenterWindow::Samples(count) => count as usize,
            CenterWindow::DurationMs(_) => 16,
        };
        Self {
            window,
            min_spacing_sq: min_spacing * min_spacing,
            min_bow,
            begin_ms: 0,
            points: Vec::with_capacity(capacity),
            center: GestureCenter::default(),
        }
    }

    pub(crate) fn begin(&mut self, now_ms: u64, point: Point) {
        self.points.clear();
        self.points.push(point);
        self.begin_ms = now_ms;
        self.center = GestureCenter::default();
    }

    pub(crate) fn reset(&mut self) {
        self.points.clear();
        self.center = GestureCenter::default();
    }

    pub(crate) fn center(&self) -> GestureCenter {
        self.center
    }

    /// Distinct points collected while the window was open.
    pub(crate) fn window_points(&self) -> &[Point] {
        &self.points
    }

    pub(crate) fn observe(&mut self, now_ms: u64, point: Point) -> CenterObservation {
        if self.center.established {
            return CenterObservation::Established(self.center);
        }

        let distinct = self
            .points
            .last()
            .map_or(true, |last| squared_distance(*last, point) >= self.min_spacing_sq);
        if distinct {
            self.points.push(point);
        }

        let closed = match self.window {
            CenterWindow::Samples(count) => self.points.len() >= count as usize,
            CenterWindow::DurationMs(duration_ms) => {
                now_ms.saturating_sub(self.begin_ms) >= duration_ms
            }
        };
        if !closed {
            return CenterObservation::Pending;
        }

        // A jittered straight stroke fits a circle too; its bow stays at the
        // jitter level.
        if window_bow(&self.points) < self.min_bow {
            return CenterObservation::Degenerate;
        }

        match fit_circle_center(&self.points) {
            Some(center) => {
                self.center = GestureCenter {
                    point: center,
                    established: true,
                };
                CenterObservation::Established(self.center)
            }
            None => CenterObservation::Degenerate,
        }
    }
}

/// Largest distance of a window point from the chord joining the first and
/// last points.
fn window_bow(points: &[Point]) -> f32 {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return 0.0;
    };
    let chord_x = last.x - first.x;
    let chord_y = last.y - first.y;
    let chord = chord_x.hypot(chord_y);
    if chord <= f32::EPSILON {
        return points
            .iter()
            .map(|p| p.distance(first))
            .fold(0.0, f32::max);
    }
    points
        .iter()
        .map(|p| (chord_x * (p.y - first.y) - chord_y * (p.x - first.x)).abs() / chord)
        .fold(0.0, f32::max)
}

/// Algebraic least-squares circle fit over moments taken around the centroid.
fn fit_circle_center(points: &[Point]) -> Option<Point> {
    if points.len() < MIN_CENTER_WINDOW_SAMPLES as usize {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.x as f64).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.y as f64).sum::<f64>() / n;

    let mut suu = 0.0;
    let mut svv = 0.0;
    let mut suv = 0.0;
    let mut suuu = 0.0;
    let mut svvv = 0.0;
    let mut suvv = 0.0;
    let mut svuu = 0.0;
    for p in points {
        let u = p.x as f64 - mean_x;
        let v = p.y as f64 - mean_y;
        suu += u * u;
        svv += v * v;
        suv += u * v;
        suuu += u * u * u;
        svvv += v * v * v;
        suvv += u * v * v;
        svuu += v * u * u;
    }

    let spread = suu + svv;
    let det = suu * svv - suv * suv;
    if spread <= f64::EPSILON || det <= FIT_CONDITION_MIN * spread * spread {
        return None;
    }

    let rhs_u = (suuu + suvv) / 2.0;
    let rhs_v = (svvv + svuu) / 2.0;
    let uc = (rhs_u * svv - rhs_v * suv) / det;
    let vc = (rhs_v * suu - rhs_u * suv) / det;

    Some(Point::new((mean_x + uc) as f32, (mean_y + vc) as f32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc_point(center: Point, radius: f32, angle: f32) -> Point {
        Point::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        )
    }

    #[test]
    fn window_closes_after_configured_distinct_samples() {
        let center = Point::new(200.0, 150.0);
        let mut estimator = CenterEstimator::new(CenterWindow::Samples(4), 2.0, 4.0);
        estimator.begin(0, arc_point(center, 80.0, 0.0));

        for step in 1..3 {
            let observed = estimator.observe(step * 16, arc_point(center, 80.0, step as f32 * 0.3));
            assert_eq!(observed, CenterObservation::Pending);
        }

        match estimator.observe(48, arc_point(center, 80.0, 0.9)) {
            CenterObservation::Established(found) => {
                assert!(found.established);
                assert!(found.point.distance(center) < 0.5, "center={:?}", found.point);
            }
            other => panic!("expected established center, got {other:?}"),
        }
    }

    #[test]
    fn stationary_jitter_does_not_close_window() {
        let mut estimator = CenterEstimator::new(CenterWindow::Samples(3), 2.0, 4.0);
        estimator.begin(0, Point::new(100.0, 100.0));

        for t_ms in 1..20 {
            let observed = estimator.observe(t_ms * 8, Point::new(100.5, 100.0));
            assert_eq!(observed, CenterObservation::Pending);
        }
        assert_eq!(estimator.window_points().len(), 1);
        assert!(!estimator.center().established);
    }

    #[test]
    fn collinear_window_is_degenerate() {
        let mut estimator = CenterEstimator::new(CenterWindow::Samples(5), 2.0, 4.0);
        estimator.begin(0, Point::new(10.0, 10.0));
        let mut last = CenterObservation::Pending;
        for step in 1..5 {
            let offset = step as f32 * 12.0;
            last = estimator.observe(step * 16, Point::new(10.0 + offset, 10.0 + offset));
        }
        assert_eq!(last, CenterObservation::Degenerate);
    }

    #[test]
    fn duration_window_closes_on_elapsed_time() {
        let center = Point::new(0.0, 0.0);
        let mut estimator = CenterEstimator::new(CenterWindow::DurationMs(50), 1.0, 4.0);
        estimator.begin(1_000, arc_point(center, 60.0, 0.0));

        assert_eq!(
            estimator.observe(1_020, arc_point(center, 60.0, 0.4)),
            CenterObservation::Pending
        );
        assert_eq!(
            estimator.observe(1_040, arc_point(center, 60.0, 0.8)),
            CenterObservation::Pending
        );
        assert!(matches!(
            estimator.observe(1_050, arc_point(center, 60.0, 1.2)),
            CenterObservation::Established(_)
        ));
    }

    #[test]
    fn duration_window_with_too_few_points_is_degenerate() {
        let mut estimator = CenterEstimator::new(CenterWindow::DurationMs(30), 1.0, 4.0);
        estimator.begin(0, Point::new(50.0, 50.0));
        assert_eq!(
            estimator.observe(40, Point::new(70.0, 55.0)),
            CenterObservation::Degenerate
        );
    }

    #[test]
    fn established_center_stays_frozen() {
        let center = Point::new(120.0, 120.0);
        let mut estimator = CenterEstimator::new(CenterWindow::Samples(3), 1.0, 4.0);
        estimator.begin(0, arc_point(center, 50.0, 0.0));
        let _ = estimator.observe(10, arc_point(center, 50.0, 0.5));
        let first = estimator.observe(20, arc_point(center, 50.0, 1.0));

        let later = estimator.observe(30, Point::new(400.0, 400.0));
        assert_eq!(first, later);
        assert_eq!(estimator.window_points().len(), 3);
    }

    #[test]
    fn jittered_straight_window_is_degenerate() {
        let jitter = [0.0, 1.5, 0.0, -1.5, 0.0, 1.5];
        let mut estimator = CenterEstimator::new(CenterWindow::Samples(6), 2.0, 4.0);
        estimator.begin(0, Point::new(0.0, 100.0));
        let mut last = CenterObservation::Pending;
        for (step, offset) in jitter.iter().enumerate().skip(1) {
            last = estimator.observe(
                step as u64 * 16,
                Point::new(step as f32 * 15.0, 100.0 + offset),
            );
        }
        assert_eq!(last, CenterObservation::Degenerate);
        assert!(!estimator.center().established);
    }

    #[test]
    fn bow_measures_sagitta_over_the_chord() {
        let straight = [Point::new(0.0, 0.0), Point::new(5.0, 1.0), Point::new(10.0, 0.0)];
        assert!((window_bow(&straight) - 1.0).abs() < 1e-5);

        let center = Point::new(0.0, 0.0);
        let arc: Vec<Point> = (0..6)
            .map(|step| arc_point(center, 120.0, step as f32 * 0.26))
            .collect();
        assert!(window_bow(&arc) > 20.0);
    }
}

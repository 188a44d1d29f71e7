use super::types::Point;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum RadiusCheck {
    Accept(f32),
    TooClose(f32),
    OutOfBand { radius: f32, reference: f32 },
}

pub(crate) struct RadiusValidator {
    tolerance: f32,
    min_radius: f32,
    reference: Option<f32>,
}

impl RadiusValidator {
    pub(crate) fn new(tolerance: f32, min_radius: f32) -> Self {
        Self {
            tolerance,
            min_radius,
            reference: None,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.reference = None;
    }

    pub(crate) fn reference(&self) -> Option<f32> {
        self.reference
    }

    pub(crate) fn validate(&mut self, point: Point, center: Point) -> RadiusCheck {
        let radius = point.distance(center);
        if radius < self.min_radius || radius <= f32::EPSILON {
            return RadiusCheck::TooClose(radius);
        }

        let reference = *self.reference.get_or_insert(radius);
        if (radius - reference).abs() > reference * self.tolerance {
            return RadiusCheck::OutOfBand { radius, reference };
        }

        RadiusCheck::Accept(radius)
    }
}

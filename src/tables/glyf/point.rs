use kurbo::Affine;
use otspec::types::*;

/// Represents a point inside a glyf contour
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Point {
    /// x-coordinate
    pub x: int16,
    /// y-coordinate
    pub y: int16,
    /// Is this an on-curve point?
    pub on_curve: bool,
}

impl Point {
    pub fn new(x: int16, y: int16, on_curve: bool) -> Point {
        Point { x, y, on_curve }
    }

    /// Transforms the point using the given affine transformation
    ///
    /// The result is rounded to the nearest font unit, with ties going away
    /// from zero.
    pub fn transform(&self, t: Affine) -> Point {
        let kurbo_point = t * kurbo::Point::new(self.x as f64, self.y as f64);
        Point {
            x: kurbo_point.x.round() as i16,
            y: kurbo_point.y.round() as i16,
            on_curve: self.on_curve,
        }
    }
}

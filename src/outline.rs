//! Floating-point glyph outlines used while composing glyphs.
use kurbo::{Affine, Point, Rect};

/// A point on an outline, with its on-curve flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlinePoint {
    pub pt: Point,
    pub on_curve: bool,
}

impl OutlinePoint {
    pub fn on(x: f64, y: f64) -> OutlinePoint {
        OutlinePoint {
            pt: Point::new(x, y),
            on_curve: true,
        }
    }
}

/// A list of closed contours in TrueType form (quadratic, implied closing
/// segment).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outline {
    pub contours: Vec<Vec<OutlinePoint>>,
}

fn points_bounds<'a, I>(points: I) -> Option<Rect>
where
    I: IntoIterator<Item = &'a OutlinePoint>,
{
    let mut points = points.into_iter();
    let first = points.next()?.pt;
    Some(points.fold(Rect::from_points(first, first), |r, p| r.union_pt(p.pt)))
}

impl Outline {
    pub fn new() -> Outline {
        Outline::default()
    }

    /// A single clockwise rectangle.
    pub fn from_rect(rect: Rect) -> Outline {
        Outline {
            contours: vec![vec![
                OutlinePoint::on(rect.x0, rect.y0),
                OutlinePoint::on(rect.x0, rect.y1),
                OutlinePoint::on(rect.x1, rect.y1),
                OutlinePoint::on(rect.x1, rect.y0),
            ]],
        }
    }

    /// True when there are no points at all.
    pub fn is_empty(&self) -> bool {
        self.contours.iter().all(|c| c.is_empty())
    }

    /// Control-point bounds of the whole outline.
    pub fn bounds(&self) -> Option<Rect> {
        points_bounds(self.contours.iter().flatten())
    }

    /// Control-point bounds of a single contour.
    pub fn contour_bounds(contour: &[OutlinePoint]) -> Option<Rect> {
        points_bounds(contour)
    }

    pub fn transform(&mut self, t: Affine) {
        for p in self.contours.iter_mut().flatten() {
            p.pt = t * p.pt;
        }
    }

    pub fn transformed(&self, t: Affine) -> Outline {
        let mut copy = self.clone();
        copy.transform(t);
        copy
    }

    /// Appends the contours of another outline.
    pub fn extend(&mut self, other: &Outline) {
        self.contours.extend(other.contours.iter().cloned());
    }

    /// Keeps the contours whose bounding box satisfies `keep`.
    pub fn filter_contours<F>(&self, keep: F) -> Outline
    where
        F: Fn(Rect) -> bool,
    {
        Outline {
            contours: self
                .contours
                .iter()
                .filter(|c| Outline::contour_bounds(c).map_or(false, &keep))
                .cloned()
                .collect(),
        }
    }

    /// Rounds every coordinate to the nearest integer, ties away from zero.
    pub fn round(&mut self) {
        for p in self.contours.iter_mut().flatten() {
            p.pt = Point::new(p.pt.x.round(), p.pt.y.round());
        }
    }

    /// Signed area of a contour's control polygon. Negative when the
    /// contour runs clockwise with y pointing up.
    pub fn contour_area(contour: &[OutlinePoint]) -> f64 {
        let n = contour.len();
        (0..n)
            .map(|k| {
                let (a, b) = (contour[k].pt, contour[(k + 1) % n].pt);
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
            / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn outline_bounds_and_transform() {
        let mut outline = Outline::from_rect(Rect::new(64.0, 0.0, 128.0, 64.0));
        outline.extend(&Outline::from_rect(Rect::new(0.0, 128.0, 32.0, 192.0)));
        assert_eq!(outline.bounds(), Some(Rect::new(0.0, 0.0, 128.0, 192.0)));

        let moved = outline.transformed(Affine::translate((10.0, -5.0)));
        assert_eq!(moved.bounds(), Some(Rect::new(10.0, -5.0, 138.0, 187.0)));

        let flipped = outline.transformed(Affine::scale_non_uniform(1.0, -1.0));
        let b = flipped.bounds().unwrap();
        assert_approx_eq!(b.y0, -192.0);
        assert_approx_eq!(b.y1, 0.0);
    }

    #[test]
    fn outline_filter_contours() {
        let mut outline = Outline::from_rect(Rect::new(0.0, 0.0, 64.0, 448.0));
        outline.extend(&Outline::from_rect(Rect::new(0.0, 576.0, 64.0, 640.0)));
        let top = outline.filter_contours(|r| r.y1 > 449.0);
        assert_eq!(top.contours.len(), 1);
        assert_eq!(top.bounds().unwrap().y0, 576.0);
    }

    #[test]
    fn outline_round_ties_away_from_zero() {
        let mut outline = Outline {
            contours: vec![vec![
                OutlinePoint::on(0.5, -0.5),
                OutlinePoint::on(1.49, -2.5),
            ]],
        };
        outline.round();
        assert_eq!(outline.contours[0][0].pt, Point::new(1.0, -1.0));
        assert_eq!(outline.contours[0][1].pt, Point::new(1.0, -3.0));
    }

    #[test]
    fn outline_contour_area() {
        let outline = Outline::from_rect(Rect::new(0.0, 0.0, 64.0, 128.0));
        assert_eq!(Outline::contour_area(&outline.contours[0]), -8192.0);
        let mut reversed = outline.contours[0].clone();
        reversed.reverse();
        assert_eq!(Outline::contour_area(&reversed), 8192.0);
        assert!(Outline::new().is_empty());
    }
}

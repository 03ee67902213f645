//! Overlap removal, through Skia's path simplifier.
//!
//! Outlines are drawn into a `skia_safe::Path` with the non-zero fill rule,
//! simplified, and read back as TrueType contours. Skia gives no promise
//! about contour direction, so the result is re-oriented: outer contours
//! clockwise, holes counter-clockwise (y up).
use crate::outline::{Outline, OutlinePoint};
use kurbo::{CubicBez, Point};
use skia_safe::path::{Iter, Verb};
use skia_safe::{simplify, Path};

/// Tolerance, in font units, when splitting cubics into quadratics.
const CUBIC_ACCURACY: f64 = 0.5;

fn skia_point(p: Point) -> skia_safe::Point {
    skia_safe::Point::new(p.x as f32, p.y as f32)
}

fn font_point(p: &skia_safe::Point) -> Point {
    Point::new(p.x as f64, p.y as f64)
}

fn on(pt: Point) -> OutlinePoint {
    OutlinePoint { pt, on_curve: true }
}

fn off(pt: Point) -> OutlinePoint {
    OutlinePoint { pt, on_curve: false }
}

/// Draws TrueType contours into a path. Two off-curve points in a row
/// imply an on-curve point halfway between them.
fn to_path(outline: &Outline) -> Path {
    let mut path = Path::default();
    for contour in outline.contours.iter().filter(|c| c.len() >= 2) {
        let n = contour.len();
        let first_on = contour.iter().position(|p| p.on_curve);
        let (start, first, count) = match first_on {
            Some(ix) => (contour[ix].pt, ix + 1, n - 1),
            None => (contour[n - 1].pt.lerp(contour[0].pt, 0.5), 0, n),
        };
        path.move_to(skia_point(start));
        let mut pending: Option<Point> = None;
        for k in 0..count {
            let p = contour[(first + k) % n];
            match (p.on_curve, pending) {
                (true, Some(control)) => {
                    path.quad_to(skia_point(control), skia_point(p.pt));
                    pending = None;
                }
                (true, None) => {
                    path.line_to(skia_point(p.pt));
                }
                (false, Some(control)) => {
                    path.quad_to(skia_point(control), skia_point(control.lerp(p.pt, 0.5)));
                    pending = Some(p.pt);
                }
                (false, None) => pending = Some(p.pt),
            }
        }
        if let Some(control) = pending {
            path.quad_to(skia_point(control), skia_point(start));
        }
        path.close();
    }
    path
}

fn finish_contour(outline: &mut Outline, contour: &mut Vec<OutlinePoint>) {
    let mut points = std::mem::take(contour);
    if points.len() > 1 && points.first().map(|p| p.pt) == points.last().map(|p| p.pt) {
        points.pop();
    }
    merge_collinear(&mut points);
    if points.len() >= 3 {
        outline.contours.push(points);
    }
}

/// Reads a simplified path back into TrueType contours.
fn from_path(path: &Path) -> Outline {
    let mut outline = Outline::new();
    let mut contour: Vec<OutlinePoint> = vec![];
    for (verb, points) in Iter::new(path, false) {
        let points: Vec<Point> = points.iter().map(font_point).collect();
        match (verb, points.as_slice()) {
            (Verb::Move, [start]) => {
                finish_contour(&mut outline, &mut contour);
                contour.push(on(*start));
            }
            (Verb::Line, [_, end]) => contour.push(on(*end)),
            // Conics only come back from conic input, which is never drawn.
            (Verb::Quad, [_, control, end]) | (Verb::Conic, [_, control, end]) => {
                contour.push(off(*control));
                contour.push(on(*end));
            }
            (Verb::Cubic, [p0, p1, p2, p3]) => {
                for (_, _, quad) in CubicBez::new(*p0, *p1, *p2, *p3).to_quads(CUBIC_ACCURACY) {
                    contour.push(off(quad.p1));
                    contour.push(on(quad.p2));
                }
            }
            (Verb::Close, _) => finish_contour(&mut outline, &mut contour),
            _ => {}
        }
    }
    finish_contour(&mut outline, &mut contour);
    outline
}

/// Drops on-curve points lying on the straight line between their
/// on-curve neighbours.
fn merge_collinear(points: &mut Vec<OutlinePoint>) {
    let mut k = 0;
    while points.len() >= 3 && k < points.len() {
        let n = points.len();
        let (prev, here, next) = (points[(k + n - 1) % n], points[k], points[(k + 1) % n]);
        let straight = prev.on_curve && here.on_curve && next.on_curve && {
            let (a, b) = (here.pt - prev.pt, next.pt - here.pt);
            (a.x * b.y - a.y * b.x).abs() < 1e-6
        };
        if straight {
            points.remove(k);
            k = k.saturating_sub(1);
        } else {
            k += 1;
        }
    }
}

/// Even-odd test of `p` against a contour's control polygon.
fn contains(contour: &[OutlinePoint], p: Point) -> bool {
    let n = contour.len();
    let mut inside = false;
    for k in 0..n {
        let (a, b) = (contour[k].pt, contour[(k + 1) % n].pt);
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

/// Turns contours nested an even number of times clockwise and the others
/// counter-clockwise.
fn orient(outline: &mut Outline) {
    let depths: Vec<usize> = outline
        .contours
        .iter()
        .enumerate()
        .map(|(i, contour)| {
            let start = contour[0].pt;
            outline
                .contours
                .iter()
                .enumerate()
                .filter(|&(j, other)| j != i && contains(other, start))
                .count()
        })
        .collect();
    for (contour, depth) in outline.contours.iter_mut().zip(depths) {
        let clockwise = Outline::contour_area(contour) < 0.0;
        if clockwise != (depth % 2 == 0) {
            contour.reverse();
        }
    }
}

/// Returns the union of the outline's contours under the non-zero rule.
pub fn remove_overlap(outline: &Outline) -> Outline {
    if outline.is_empty() {
        return Outline::new();
    }
    match simplify(&to_path(outline)) {
        Some(simplified) => {
            let mut merged = from_path(&simplified);
            orient(&mut merged);
            merged
        }
        None => {
            log::warn!("Path simplification failed; keeping overlapping contours");
            outline.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    fn rects(list: &[(f64, f64, f64, f64)]) -> Outline {
        let mut outline = Outline::new();
        for &(x0, y0, x1, y1) in list {
            outline.extend(&Outline::from_rect(Rect::new(x0, y0, x1, y1)));
        }
        outline
    }

    fn areas(outline: &Outline) -> Vec<f64> {
        let mut areas: Vec<f64> = outline.contours.iter().map(|c| Outline::contour_area(c)).collect();
        areas.sort_by(|a, b| a.partial_cmp(b).unwrap());
        areas
    }

    #[test]
    fn union_of_overlapping_bars() {
        let merged = remove_overlap(&rects(&[
            (0.0, 0.0, 192.0, 64.0),
            (0.0, 0.0, 64.0, 192.0),
        ]));
        assert_eq!(merged.contours.len(), 1);
        assert_eq!(merged.contours[0].len(), 6);
        assert_eq!(merged.bounds(), Some(Rect::new(0.0, 0.0, 192.0, 192.0)));
        // clockwise in a y-up coordinate system
        assert_eq!(areas(&merged), vec![-20480.0]);
    }

    #[test]
    fn duplicate_contours_collapse() {
        let merged = remove_overlap(&rects(&[
            (64.0, 0.0, 128.0, 64.0),
            (64.0, 0.0, 128.0, 64.0),
        ]));
        assert_eq!(merged.contours.len(), 1);
        assert_eq!(merged.contours[0].len(), 4);
    }

    #[test]
    fn hole_is_kept() {
        let mut outline = rects(&[(0.0, 0.0, 192.0, 192.0)]);
        let mut hole = Outline::from_rect(Rect::new(64.0, 64.0, 128.0, 128.0));
        hole.contours[0].reverse();
        outline.extend(&hole);
        let merged = remove_overlap(&outline);
        assert_eq!(merged.contours.len(), 2);
        assert_eq!(areas(&merged), vec![-36864.0, 4096.0]);
    }

    #[test]
    fn counter_clockwise_input_is_reoriented() {
        let mut outline = rects(&[(0.0, 0.0, 64.0, 128.0)]);
        outline.contours[0].reverse();
        let merged = remove_overlap(&outline);
        assert_eq!(areas(&merged), vec![-8192.0]);
    }

    #[test]
    fn slanted_stroke_merges_with_mark() {
        let mut outline = Outline {
            contours: vec![vec![
                OutlinePoint::on(0.0, 0.0),
                OutlinePoint::on(64.0, 320.0),
                OutlinePoint::on(128.0, 320.0),
                OutlinePoint::on(64.0, 0.0),
            ]],
        };
        outline.extend(&rects(&[(32.0, 256.0, 160.0, 384.0)]));
        let merged = remove_overlap(&outline);
        assert_eq!(merged.contours.len(), 1);
        assert_eq!(merged.bounds(), Some(Rect::new(0.0, 0.0, 160.0, 384.0)));
        assert!(Outline::contour_area(&merged.contours[0]) < 0.0);
    }

    #[test]
    fn curved_contour_merges_with_bar() {
        // A hump from (0,0) to (128,0) bulging up to y=64, crossed by a bar.
        let mut outline = Outline {
            contours: vec![vec![
                OutlinePoint::on(0.0, 0.0),
                OutlinePoint {
                    pt: Point::new(64.0, 128.0),
                    on_curve: false,
                },
                OutlinePoint::on(128.0, 0.0),
            ]],
        };
        outline.extend(&rects(&[(32.0, -64.0, 96.0, 32.0)]));
        let merged = remove_overlap(&outline);
        assert_eq!(merged.contours.len(), 1);
        assert!(merged.contours[0].iter().any(|p| !p.on_curve));
        let bounds = merged.bounds().unwrap();
        assert_eq!((bounds.x0, bounds.y0, bounds.x1), (0.0, -64.0, 128.0));
    }

    #[test]
    fn all_off_curve_contour_is_drawn() {
        let outline = Outline {
            contours: vec![[(0.0, 64.0), (64.0, 128.0), (128.0, 64.0), (64.0, 0.0)]
                .iter()
                .map(|&(x, y)| OutlinePoint {
                    pt: Point::new(x, y),
                    on_curve: false,
                })
                .collect()],
        };
        let merged = remove_overlap(&outline);
        assert_eq!(merged.contours.len(), 1);
        let bounds = merged.bounds().unwrap();
        assert!(bounds.x0 >= 0.0 && bounds.x1 <= 128.0);
        assert!(bounds.y0 >= 0.0 && bounds.y1 <= 128.0);
    }

    #[test]
    fn empty_outline() {
        assert!(remove_overlap(&Outline::new()).is_empty());
    }
}

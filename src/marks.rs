//! Accent geometry taken from donor glyphs, and the rules that place it on
//! a base letter.
//!
//! Offsets are in font units on Pixellari's 64-unit pixel grid: 32 is half
//! a pixel, 64 one pixel, 192 three pixels.
use crate::error::{Error, Result};
use crate::font::Font;
use crate::outline::Outline;
use kurbo::{Affine, Rect, Vec2};
use std::collections::BTreeMap;

const PIXEL: f64 = 64.0;
const HALF_PIXEL: f64 = 32.0;
const DOT_BELOW_DROP: f64 = 3.0 * PIXEL;

/// The cached top-mark layers, named after the accent and letter case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkKey {
    GraveLower,
    AcuteLower,
    TildeLower,
    GraveUpper,
    AcuteUpper,
    TildeUpper,
    TildeUpperI,
}

impl MarkKey {
    pub const ALL: [MarkKey; 7] = [
        MarkKey::GraveLower,
        MarkKey::AcuteLower,
        MarkKey::TildeLower,
        MarkKey::GraveUpper,
        MarkKey::AcuteUpper,
        MarkKey::TildeUpper,
        MarkKey::TildeUpperI,
    ];

    /// The donor glyph and the base letter it was drawn on.
    pub fn donor(self) -> (&'static str, &'static str) {
        match self {
            MarkKey::GraveLower => ("agrave", "a"),
            MarkKey::AcuteLower => ("aacute", "a"),
            MarkKey::TildeLower => ("atilde", "a"),
            MarkKey::GraveUpper => ("Agrave", "A"),
            MarkKey::AcuteUpper => ("Aacute", "A"),
            MarkKey::TildeUpper => ("Atilde", "A"),
            MarkKey::TildeUpperI => ("Itilde", "I"),
        }
    }
}

/// A mark cut out of a donor glyph, with the bounds of the donor's base
/// letter so it can be re-aligned on another base.
#[derive(Debug, Clone, PartialEq)]
pub struct DonorMark {
    pub layer: Outline,
    pub donor_base: Rect,
}

fn glyph_outline(font: &Font, name: &str) -> Result<Outline> {
    font.glyph_by_name(name)
        .and_then(|gid| font.outline(gid))
        .filter(|o| !o.is_empty())
        .ok_or_else(|| Error::MissingDonor(name.to_string()))
}

/// Cuts the contours of `donor_name` that rise more than one unit above
/// the top of `donor_base_name`.
pub fn extract_top_mark_layer(font: &Font, donor_name: &str, donor_base_name: &str) -> Result<DonorMark> {
    let donor = glyph_outline(font, donor_name)?;
    let donor_base = glyph_outline(font, donor_base_name)?
        .bounds()
        .ok_or_else(|| Error::MissingDonor(donor_base_name.to_string()))?;
    let layer = donor.filter_contours(|bounds| bounds.y1 > donor_base.y1 + 1.0);
    if layer.is_empty() {
        return Err(Error::MissingDonor(donor_name.to_string()));
    }
    Ok(DonorMark { layer, donor_base })
}

/// Every donor mark a synthesis run needs, built once up front.
///
/// Missing donors are recorded rather than fatal; only the characters that
/// need them fail.
#[derive(Debug, Clone, Default)]
pub struct MarkLayers {
    marks: BTreeMap<MarkKey, DonorMark>,
    comma: Option<Outline>,
    period: Option<Outline>,
}

impl MarkLayers {
    pub fn from_font(font: &Font) -> MarkLayers {
        let mut layers = MarkLayers::default();
        for key in MarkKey::ALL.iter() {
            let (donor, base) = key.donor();
            match extract_top_mark_layer(font, donor, base) {
                Ok(mark) => {
                    log::debug!(
                        "{:?}: {} contour(s) from '{}'",
                        key,
                        mark.layer.contours.len(),
                        donor
                    );
                    layers.marks.insert(*key, mark);
                }
                Err(e) => log::warn!("No {:?} mark available: {}", key, e),
            }
        }
        layers.comma = glyph_outline(font, "comma")
            .map_err(|e| log::warn!("No hook or horn donor available: {}", e))
            .ok();
        layers.period = glyph_outline(font, "period")
            .map_err(|e| log::warn!("No dot below donor available: {}", e))
            .ok();
        layers
    }

    pub fn get(&self, key: MarkKey) -> Result<&DonorMark> {
        self.marks
            .get(&key)
            .ok_or_else(|| Error::MissingDonor(key.donor().0.to_string()))
    }

    /// The whole comma glyph, the donor for hooks and horns.
    pub fn comma(&self) -> Result<&Outline> {
        self.comma
            .as_ref()
            .ok_or_else(|| Error::MissingDonor("comma".to_string()))
    }

    /// The whole period glyph, the donor for the dot below.
    pub fn period(&self) -> Result<&Outline> {
        self.period
            .as_ref()
            .ok_or_else(|| Error::MissingDonor("period".to_string()))
    }
}

/// Which edge of the base letters a mark keeps its distance from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Bottom,
    None,
}

/// Moves `mark` from the donor's base letter onto the target base and
/// appends it to `target`.
///
/// The mark is first scaled horizontally by `scale_x` about its own centre,
/// then shifted so the base letters' horizontal centres coincide and their
/// anchored edges line up, plus `y_offset`.
pub fn add_layer_with_alignment(
    target: &mut Outline,
    mark: &Outline,
    donor_base: Rect,
    target_base: Rect,
    anchor: Anchor,
    scale_x: f64,
    y_offset: f64,
) {
    let mut moved = mark.clone();
    if (scale_x - 1.0).abs() > f64::EPSILON {
        if let Some(bounds) = moved.bounds() {
            let centre = bounds.center().to_vec2();
            moved.transform(
                Affine::translate(centre)
                    * Affine::scale_non_uniform(scale_x, 1.0)
                    * Affine::translate(-centre),
            );
        }
    }
    let dx = target_base.center().x - donor_base.center().x;
    let dy = match anchor {
        Anchor::Top => target_base.y1 - donor_base.y1 + y_offset,
        Anchor::Bottom => target_base.y0 - donor_base.y0 + y_offset,
        Anchor::None => y_offset,
    };
    moved.transform(Affine::translate(Vec2::new(dx, dy)));
    target.extend(&moved);
}

/// Appends a copy of the period, centred under the base and dropped three
/// pixels below its bottom.
pub fn add_dot_below(target: &mut Outline, base: Rect, period: &Outline) {
    let dot_bounds = match period.bounds() {
        Some(b) => b,
        None => return,
    };
    let dx = base.center().x - dot_bounds.center().x;
    let dy = (base.y0 - DOT_BELOW_DROP) - dot_bounds.y0;
    target.extend(&period.transformed(Affine::translate(Vec2::new(dx, dy))));
}

/// Appends the comma mirrored upwards as a hook above, half a pixel right
/// of centre and overlapping the top of the base by one pixel less `lift`.
pub fn add_hook_above(target: &mut Outline, base: Rect, comma: &Outline, lift: f64) {
    let hook = comma.transformed(Affine::scale_non_uniform(1.0, -1.0));
    let hook_bounds = match hook.bounds() {
        Some(b) => b,
        None => return,
    };
    let dx = (base.center().x + HALF_PIXEL) - hook_bounds.center().x;
    let dy = (base.y1 - PIXEL + lift) - hook_bounds.y0;
    target.extend(&hook.transformed(Affine::translate(Vec2::new(dx, dy))));
}

/// Appends the comma as a horn on the base's top-right shoulder.
pub fn add_horn_right(target: &mut Outline, base: Rect, comma: &Outline) {
    let horn_bounds = match comma.bounds() {
        Some(b) => b,
        None => return,
    };
    let dx = (base.x1 - HALF_PIXEL) - horn_bounds.center().x;
    let dy = (base.y1 - PIXEL) - horn_bounds.y0;
    target.extend(&comma.transformed(Affine::translate(Vec2::new(dx, dy))));
}

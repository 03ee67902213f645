//! Building composed Vietnamese letters out of base letters and donor
//! accent marks.
use crate::charset::{decompose, horn_base, is_always_rebuild, Decomposition, ShapeMark, ToneMark};
use crate::coverage::{check_coverage, is_covered};
use crate::error::{Error, Result};
use crate::font::Font;
use crate::marks::{
    add_dot_below, add_hook_above, add_horn_right, add_layer_with_alignment, Anchor, MarkKey,
    MarkLayers,
};
use crate::outline::Outline;
use crate::overlap::remove_overlap;
use kurbo::Rect;

/// Extra height given to marks over a capital `I`, which is taller than
/// the `A` the capital marks were drawn for.
const CAPITAL_I_LIFT: f64 = 64.0;
/// A lowercase `i` is narrow, so its tilde is squeezed.
const LOWERCASE_I_TILDE_SCALE: f64 = 0.75;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Rebuild glyphs that already have outlines.
    pub force: bool,
}

/// What happened to a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The font already had a glyph with data; nothing was touched.
    AlreadyPresent,
    /// A new outline was composed and written.
    Built,
}

/// Summary of a synthesis run.
#[derive(Debug, Default)]
pub struct SynthesisReport {
    pub required: usize,
    /// Characters without a glyph with data before the run.
    pub missing_before: Vec<char>,
    /// Every character that ended up satisfied, whether it was built or
    /// was already present.
    pub created: Vec<char>,
    /// The subset of `created` whose outline was written by this run.
    pub built: Vec<char>,
    pub failed: Vec<(char, Error)>,
    /// Characters still without a glyph with data after the run.
    pub still_missing: Vec<char>,
}

/// Rounds, removes overlaps and rounds again.
pub fn normalize(outline: &Outline) -> Outline {
    let mut rounded = outline.clone();
    rounded.round();
    let mut merged = remove_overlap(&rounded);
    merged.round();
    merged
}

fn glyph_with_data(font: &Font, ch: char) -> Option<u16> {
    font.glyph_for_char(ch).filter(|&gid| font.has_data(gid))
}

/// Makes sure the horned form of `base` (ơ, ư, Ơ, Ư) has an outline,
/// building it from the plain letter and a horn if needed.
pub fn ensure_horn_base(font: &mut Font, base: char, layers: &MarkLayers) -> Result<()> {
    let horned = horn_base(base).ok_or(Error::MissingBase(base))?;
    if glyph_with_data(font, horned).is_some() {
        return Ok(());
    }
    let base_gid = glyph_with_data(font, base).ok_or(Error::MissingBase(base))?;
    let mut outline = font.outline(base_gid).ok_or(Error::MissingBase(base))?;
    let bounds = outline.bounds().ok_or(Error::MissingBase(base))?;
    let advance = font.advance_width(base_gid).unwrap_or(0);
    add_horn_right(&mut outline, bounds, layers.comma()?);
    let normalized = normalize(&outline);
    if normalized.is_empty() {
        return Err(Error::EmptyResult(horned));
    }
    let gid = font.ensure_glyph_for_codepoint(horned as u32)?;
    font.set_glyph_outline(gid, &normalized, advance)?;
    log::info!("Built horn base U+{:04X} {} from {}", horned as u32, horned, base);
    Ok(())
}

fn place_tone(
    outline: &mut Outline,
    decomposition: &Decomposition,
    tone: ToneMark,
    base_bounds: Rect,
    layers: &MarkLayers,
) -> Result<()> {
    let base = decomposition.base;
    let upper = decomposition.is_upper();
    let capital_i_lift = if base == 'I' { CAPITAL_I_LIFT } else { 0.0 };
    let (key, scale_x) = match tone {
        ToneMark::HookAbove => {
            add_hook_above(outline, base_bounds, layers.comma()?, capital_i_lift);
            return Ok(());
        }
        ToneMark::DotBelow => {
            add_dot_below(outline, base_bounds, layers.period()?);
            return Ok(());
        }
        ToneMark::Grave if upper => (MarkKey::GraveUpper, 1.0),
        ToneMark::Grave => (MarkKey::GraveLower, 1.0),
        ToneMark::Acute if upper => (MarkKey::AcuteUpper, 1.0),
        ToneMark::Acute => (MarkKey::AcuteLower, 1.0),
        ToneMark::Tilde if base == 'I' => (MarkKey::TildeUpperI, 1.0),
        ToneMark::Tilde if base == 'i' => (MarkKey::TildeLower, LOWERCASE_I_TILDE_SCALE),
        ToneMark::Tilde if upper => (MarkKey::TildeUpper, 1.0),
        ToneMark::Tilde => (MarkKey::TildeLower, 1.0),
    };
    let mark = layers.get(key)?;
    add_layer_with_alignment(
        outline,
        &mark.layer,
        mark.donor_base,
        base_bounds,
        Anchor::Top,
        scale_x,
        capital_i_lift,
    );
    Ok(())
}

/// Makes sure `ch` has a glyph with an outline, composing one from its
/// base letter and marks when it is missing (or always, with `force` or
/// for the toned i/I letters).
///
/// Nothing is written to the target glyph unless composition succeeds.
pub fn ensure_composed_glyph(
    font: &mut Font,
    ch: char,
    layers: &MarkLayers,
    options: SynthesisOptions,
) -> Result<Outcome> {
    if !options.force && !is_always_rebuild(ch) && is_covered(font, ch, true) {
        return Ok(Outcome::AlreadyPresent);
    }
    let decomposition = decompose(ch);
    let shaped = decomposition
        .shaped_base()
        .ok_or(Error::MissingBase(decomposition.base))?;
    if decomposition.shape == Some(ShapeMark::Horn) {
        ensure_horn_base(font, decomposition.base, layers)?;
    }
    let shaped_gid = glyph_with_data(font, shaped).ok_or(Error::MissingBase(shaped))?;

    // A lowercase i loses its dot under a top mark.
    let base_gid = match decomposition.tone {
        Some(tone) if decomposition.base == 'i' && tone.is_above() => font
            .glyph_by_name("dotlessi")
            .filter(|&gid| font.has_data(gid))
            .ok_or_else(|| Error::MissingDonor("dotlessi".to_string()))?,
        _ => shaped_gid,
    };
    let mut outline = font.outline(base_gid).ok_or(Error::MissingBase(shaped))?;
    let base_bounds = outline.bounds().ok_or(Error::MissingBase(shaped))?;
    let advance = font.advance_width(base_gid).unwrap_or(0);

    if let Some(tone) = decomposition.tone {
        place_tone(&mut outline, &decomposition, tone, base_bounds, layers)?;
    }
    let normalized = normalize(&outline);
    if normalized.is_empty() {
        return Err(Error::EmptyResult(ch));
    }
    let gid = font.ensure_glyph_for_codepoint(ch as u32)?;
    font.set_glyph_outline(gid, &normalized, advance)?;
    log::debug!(
        "Built U+{:04X} {} on {} ({} contours, advance {})",
        ch as u32,
        ch,
        font.glyph_name(base_gid),
        normalized.contours.len(),
        advance
    );
    Ok(Outcome::Built)
}

/// Runs composition over every character of `charset`, in order.
///
/// Per-character failures are logged and collected; the run always
/// carries on to the end.
pub fn synthesize(font: &mut Font, charset: &[char], options: SynthesisOptions) -> SynthesisReport {
    let layers = MarkLayers::from_font(font);
    let mut report = SynthesisReport {
        required: charset.len(),
        missing_before: check_coverage(font, charset, true).missing,
        ..Default::default()
    };
    log::info!(
        "Composing {} characters ({} missing)",
        charset.len(),
        report.missing_before.len()
    );
    for &ch in charset {
        match ensure_composed_glyph(font, ch, &layers, options) {
            Ok(outcome) => {
                report.created.push(ch);
                if outcome == Outcome::Built {
                    report.built.push(ch);
                }
            }
            Err(e) => {
                log::warn!("Failed to build U+{:04X} {}: {}", ch as u32, ch, e);
                report.failed.push((ch, e));
            }
        }
    }
    report.still_missing = check_coverage(font, charset, true).missing;
    report
}

mod component;
mod glyph;
mod point;

pub use component::{Component, ComponentFlags};
pub use glyph::{CompositeMaxpValues, Glyph, MAX_COMPONENT_DEPTH};
pub use point::Point;

use crate::tables::loca::loca;
use crate::tables::maxp::maxp10;
use otspec::types::*;
use otspec::{DeserializationError, Deserializer, ReaderContext, SerializationError, Serialize};

/// The 'glyf' OpenType tag.
pub const TAG: Tag = Tag::new(b"glyf");

/// The glyph data table.
#[allow(non_camel_case_types)]
#[derive(Debug, PartialEq, Clone, Default)]
pub struct glyf {
    /// The glyphs, in glyph ID order.
    pub glyphs: Vec<Glyph>,
}

/// Splits the raw glyph data into glyphs using the offsets from the `loca` table.
pub fn from_bytes(data: &[u8], locations: &loca) -> Result<glyf, DeserializationError> {
    let mut glyphs = Vec::with_capacity(locations.offsets.len().saturating_sub(1));
    for (gid, window) in locations.offsets.windows(2).enumerate() {
        let (start, end) = (window[0] as usize, window[1] as usize);
        if start == end {
            glyphs.push(Glyph::default());
            continue;
        }
        if end > data.len() {
            return Err(DeserializationError(format!(
                "Glyph {} runs past the end of the glyf table ({} > {})",
                gid,
                end,
                data.len()
            )));
        }
        let mut c = ReaderContext::new(data[start..end].to_vec());
        let glyph: Glyph = c.de().map_err(|e| {
            DeserializationError(format!("Glyph {}: {}", gid, e.0))
        })?;
        glyphs.push(glyph);
    }
    Ok(glyf { glyphs })
}

impl glyf {
    /// Recomputes the bounding box of every glyph. Composite glyphs are
    /// measured after their components have been updated.
    pub fn recalc_bounds(&mut self) {
        let mut has_composites = false;
        for glyph in self.glyphs.iter_mut() {
            if glyph.has_components() {
                has_composites = true;
            } else {
                glyph.recalc_bounds(&[]);
            }
        }
        if has_composites {
            let snapshot = self.glyphs.clone();
            for glyph in self.glyphs.iter_mut().filter(|g| g.has_components()) {
                glyph.recalc_bounds(&snapshot);
            }
        }
    }

    /// Serializes the glyphs, returning the table data and the matching
    /// location offsets. Each glyph is padded to an even length.
    pub fn compile(&self) -> Result<(Vec<u8>, loca), SerializationError> {
        let mut data: Vec<u8> = vec![];
        let mut offsets: Vec<u32> = Vec::with_capacity(self.glyphs.len() + 1);
        for glyph in &self.glyphs {
            offsets.push(data.len() as u32);
            glyph.to_bytes(&mut data)?;
            if data.len() % 2 != 0 {
                data.push(0);
            }
        }
        offsets.push(data.len() as u32);
        Ok((data, loca { offsets }))
    }

    /// Updates the glyph-derived statistics of a version 1.0 `maxp` table.
    ///
    /// `maxSizeOfInstructions` is only ever raised, since it also covers the
    /// font programs stored outside `glyf`.
    pub fn update_maxp(&self, stats: &mut maxp10) {
        let mut max_points = 0;
        let mut max_contours = 0;
        let mut max_composite = CompositeMaxpValues::default();
        let mut max_components = 0;
        let mut max_instructions = stats.maxSizeOfInstructions;
        for glyph in &self.glyphs {
            max_instructions = max_instructions.max(glyph.instructions.len().min(u16::MAX as usize) as u16);
            match glyph.composite_maxp_values(&self.glyphs) {
                Some(values) => {
                    max_composite.num_points = max_composite.num_points.max(values.num_points);
                    max_composite.num_contours =
                        max_composite.num_contours.max(values.num_contours);
                    max_composite.max_depth = max_composite.max_depth.max(values.max_depth);
                    max_components = max_components.max(glyph.components.len() as u16);
                }
                None => {
                    max_points = max_points.max(glyph.num_points() as u16);
                    max_contours = max_contours.max(glyph.num_contours() as u16);
                }
            }
        }
        stats.maxPoints = max_points;
        stats.maxContours = max_contours;
        stats.maxCompositePoints = max_composite.num_points;
        stats.maxCompositeContours = max_composite.num_contours;
        stats.maxComponentElements = max_components;
        stats.maxComponentDepth = max_composite.max_depth;
        stats.maxSizeOfInstructions = max_instructions;
    }
}

use super::component::{Component, ComponentFlags};
use super::point::Point;
use bitflags::bitflags;
use itertools::izip;
use otspec::types::*;
use otspec::{
    DeserializationError, Deserialize, Deserializer, ReaderContext, SerializationError, Serialize,
    Serializer,
};
use std::cmp::max;

/// Components nested deeper than this are ignored when flattening.
pub const MAX_COMPONENT_DEPTH: u16 = 16;

bitflags! {
    struct SimpleGlyphFlags: u8 {
        const ON_CURVE_POINT = 0x01;
        const X_SHORT_VECTOR = 0x02;
        const Y_SHORT_VECTOR = 0x04;
        const REPEAT_FLAG = 0x08;
        const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR = 0x10;
        const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR = 0x20;
        const OVERLAP_SIMPLE = 0x40;
        const RESERVED = 0x80;
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct CompositeMaxpValues {
    pub num_points: u16,
    pub num_contours: u16,
    pub max_depth: u16,
}

#[derive(Debug, PartialEq, Clone, Default)]
#[allow(non_snake_case)]
/// A higher-level representation of a TrueType outline glyph.
pub struct Glyph {
    /// The minimum X coordinate of points (including transformed component points) within this glyph
    pub xMin: int16,
    /// The maximum X coordinate of points (including transformed component points) within this glyph
    pub xMax: int16,
    /// The minimum Y coordinate of points (including transformed component points) within this glyph
    pub yMin: int16,
    /// The maximum Y coordinate of points (including transformed component points) within this glyph
    pub yMax: int16,
    /// A list of contours, each contour represented as a list of `Point` objects.
    pub contours: Vec<Vec<Point>>,
    /// Truetype instructions (binary)
    pub instructions: Vec<u8>,
    /// A vector of components
    pub components: Vec<Component>,
    /// Whether the low-level representation carried an overlap flag.
    pub overlap: bool,
}

fn read_instructions(c: &mut ReaderContext) -> Result<Vec<u8>, DeserializationError> {
    let instructions_count: uint16 = c.de()?;
    c.de_counted(instructions_count as usize)
}

fn read_coordinates(
    c: &mut ReaderContext,
    flags: &[SimpleGlyphFlags],
    short: SimpleGlyphFlags,
    same_or_positive: SimpleGlyphFlags,
) -> Result<Vec<int16>, DeserializationError> {
    let mut coords = Vec::with_capacity(flags.len());
    let mut last = 0_i16;
    for flag in flags {
        if flag.contains(short) {
            let delta: u8 = c.de()?;
            if flag.contains(same_or_positive) {
                last = last.wrapping_add(delta as i16);
            } else {
                last = last.wrapping_sub(delta as i16);
            }
        } else if !flag.contains(same_or_positive) {
            let delta: i16 = c.de()?;
            last = last.wrapping_add(delta);
        }
        coords.push(last);
    }
    Ok(coords)
}

impl Deserialize for Glyph {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let num_contours: i16 = c.de()?;
        let mut glyph = Glyph {
            xMin: c.de()?,
            yMin: c.de()?,
            xMax: c.de()?,
            yMax: c.de()?,
            ..Default::default()
        };
        if num_contours < 0 {
            let mut has_instructions = false;
            loop {
                let comp: Component = c.de()?;
                let has_more = comp.flags.contains(ComponentFlags::MORE_COMPONENTS);
                if comp.flags.contains(ComponentFlags::OVERLAP_COMPOUND) {
                    glyph.overlap = true;
                }
                if comp.flags.contains(ComponentFlags::WE_HAVE_INSTRUCTIONS) {
                    has_instructions = true;
                }
                glyph.components.push(comp);
                if !has_more {
                    break;
                }
            }
            if has_instructions {
                glyph.instructions = read_instructions(c)?;
            }
            return Ok(glyph);
        }
        if num_contours == 0 {
            if c.remaining() >= 2 {
                glyph.instructions = read_instructions(c)?;
            }
            return Ok(glyph);
        }

        let mut end_pts_of_contour: Vec<usize> = Vec::with_capacity(num_contours as usize);
        for _ in 0..num_contours {
            let end: uint16 = c.de()?;
            let end = end as usize + 1;
            if end_pts_of_contour.last().map_or(false, |&prev| end < prev) {
                return Err(DeserializationError(
                    "Contour end points are not increasing".to_string(),
                ));
            }
            end_pts_of_contour.push(end);
        }
        glyph.instructions = read_instructions(c)?;
        let num_points = *end_pts_of_contour
            .last()
            .ok_or_else(|| DeserializationError("No points?".to_string()))?;

        let mut flags: Vec<SimpleGlyphFlags> = Vec::with_capacity(num_points);
        while flags.len() < num_points {
            let raw: u8 = c.de()?;
            let flag = SimpleGlyphFlags::from_bits_truncate(raw);
            flags.push(flag);
            if flag.contains(SimpleGlyphFlags::REPEAT_FLAG) {
                let repeat_count: u8 = c.de()?;
                for _ in 0..repeat_count {
                    flags.push(flag);
                }
            }
        }
        flags.truncate(num_points);
        glyph.overlap = flags
            .first()
            .map_or(false, |f| f.contains(SimpleGlyphFlags::OVERLAP_SIMPLE));

        let x_coords = read_coordinates(
            c,
            &flags,
            SimpleGlyphFlags::X_SHORT_VECTOR,
            SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
        )?;
        let y_coords = read_coordinates(
            c,
            &flags,
            SimpleGlyphFlags::Y_SHORT_VECTOR,
            SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
        )?;

        // Divvy x/y coords into contours
        let points: Vec<Point> = izip!(&x_coords, &y_coords, &flags)
            .map(|(x, y, flag)| Point {
                x: *x,
                y: *y,
                on_curve: flag.contains(SimpleGlyphFlags::ON_CURVE_POINT),
            })
            .collect();
        let mut start = 0;
        for end in end_pts_of_contour {
            if end > start {
                glyph.contours.push(points[start..end].to_vec());
            }
            start = end;
        }
        Ok(glyph)
    }
}

impl Glyph {
    /// Returns true if this glyph has any components
    pub fn has_components(&self) -> bool {
        !self.components.is_empty()
    }

    /// Returns true if this glyph has neither components nor contours
    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.contours.is_empty()
    }

    /// Returns a bounding box rectangle for this glyph as a `kurbo::Rect`.
    pub fn bounds_rect(&self) -> kurbo::Rect {
        kurbo::Rect::new(
            self.xMin.into(),
            self.yMin.into(),
            self.xMax.into(),
            self.yMax.into(),
        )
    }

    /// Number of points in this glyph (without counting components)
    pub fn num_points(&self) -> usize {
        self.contours.iter().map(|x| x.len()).sum()
    }

    /// Number of contours in this glyph (without counting components)
    pub fn num_contours(&self) -> usize {
        self.contours.len()
    }

    /// The index of the final point of each contour within the flattened point list.
    fn end_points(&self) -> Result<Vec<u16>, SerializationError> {
        let mut count: usize = 0;
        let mut end_points = Vec::with_capacity(self.contours.len());
        for contour in &self.contours {
            if contour.is_empty() {
                return Err(SerializationError("Empty contour in glyph".to_string()));
            }
            count += contour.len();
            if count > u16::MAX as usize {
                return Err(SerializationError("Too many points in glyph".to_string()));
            }
            end_points.push((count - 1) as u16);
        }
        Ok(end_points)
    }

    /// Returns this glyph's contours with all components resolved against
    /// `glyphs`, recursively.
    ///
    /// Missing component references and cycles deeper than
    /// `MAX_COMPONENT_DEPTH` are skipped with a warning.
    pub fn flattened_contours(&self, glyphs: &[Glyph]) -> Vec<Vec<Point>> {
        let mut out = self.contours.clone();
        self.flatten_components_into(glyphs, 1, &mut out);
        out
    }

    fn flatten_components_into(&self, glyphs: &[Glyph], depth: u16, out: &mut Vec<Vec<Point>>) {
        if depth > MAX_COMPONENT_DEPTH {
            log::warn!("Component nesting too deep; ignoring remaining components");
            return;
        }
        for comp in &self.components {
            match glyphs.get(comp.glyph_index as usize) {
                None => {
                    log::warn!("Component not found for ID={:?}", comp.glyph_index);
                }
                Some(other_glyph) => {
                    let mut nested = other_glyph.contours.clone();
                    other_glyph.flatten_components_into(glyphs, depth + 1, &mut nested);
                    for contour in nested {
                        out.push(
                            contour
                                .iter()
                                .map(|pt| pt.transform(comp.transformation))
                                .collect(),
                        );
                    }
                }
            }
        }
    }

    /// Recomputes the bounding box from the glyph's (flattened) points.
    pub fn recalc_bounds(&mut self, glyphs: &[Glyph]) {
        let contours = if self.has_components() {
            self.flattened_contours(glyphs)
        } else {
            self.contours.clone()
        };
        let mut points = contours.iter().flatten();
        let first = match points.next() {
            Some(p) => *p,
            None => {
                self.xMin = 0;
                self.yMin = 0;
                self.xMax = 0;
                self.yMax = 0;
                return;
            }
        };
        let (mut x_min, mut y_min, mut x_max, mut y_max) = (first.x, first.y, first.x, first.y);
        for p in points {
            x_min = x_min.min(p.x);
            y_min = y_min.min(p.y);
            x_max = x_max.max(p.x);
            y_max = y_max.max(p.y);
        }
        self.xMin = x_min;
        self.yMin = y_min;
        self.xMax = x_max;
        self.yMax = y_max;
    }

    /// Get information about composite depth and contour points
    /// suitable for feeding to a maxp table
    pub fn composite_maxp_values(&self, glyphs: &[Glyph]) -> Option<CompositeMaxpValues> {
        self._composite_maxp_values(glyphs, 1)
    }

    fn _composite_maxp_values(&self, glyphs: &[Glyph], depth: u16) -> Option<CompositeMaxpValues> {
        if !self.has_components() || depth > MAX_COMPONENT_DEPTH {
            return None;
        }
        let mut info = CompositeMaxpValues {
            num_points: 0,
            num_contours: 0,
            max_depth: depth,
        };
        for base_glyph in self
            .components
            .iter()
            .filter_map(|c| glyphs.get(c.glyph_index as usize))
        {
            if !base_glyph.has_components() {
                info.num_points = info.num_points.saturating_add(base_glyph.num_points() as u16);
                info.num_contours = info
                    .num_contours
                    .saturating_add(base_glyph.num_contours() as u16);
            } else if let Some(other_info) = base_glyph._composite_maxp_values(glyphs, depth + 1) {
                info.num_points = info.num_points.saturating_add(other_info.num_points);
                info.num_contours = info.num_contours.saturating_add(other_info.num_contours);
                info.max_depth = max(info.max_depth, other_info.max_depth);
            }
        }
        Some(info)
    }

    /// Delta-encodes the points, merging runs of identical flags with
    /// `REPEAT_FLAG`.
    fn compile_deltas(&self) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
        let mut last_x = 0_i16;
        let mut last_y = 0_i16;
        let mut flags: Vec<u8> = vec![];
        let mut compressed_xs: Vec<u8> = vec![];
        let mut compressed_ys: Vec<u8> = vec![];
        for point in self.contours.iter().flatten() {
            let x = point.x.wrapping_sub(last_x);
            let y = point.y.wrapping_sub(last_y);
            let mut flag = if point.on_curve {
                SimpleGlyphFlags::ON_CURVE_POINT
            } else {
                SimpleGlyphFlags::empty()
            };
            if flags.is_empty() && self.overlap {
                flag |= SimpleGlyphFlags::OVERLAP_SIMPLE;
            }
            if x == 0 {
                flag |= SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR
            } else if (-255..=255).contains(&x) {
                flag |= SimpleGlyphFlags::X_SHORT_VECTOR;
                if x > 0 {
                    flag |= SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR
                }
                compressed_xs.push(x.unsigned_abs() as u8);
            } else {
                compressed_xs.extend(&x.to_be_bytes());
            }
            if y == 0 {
                flag |= SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR
            } else if (-255..=255).contains(&y) {
                flag |= SimpleGlyphFlags::Y_SHORT_VECTOR;
                if y > 0 {
                    flag |= SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR
                }
                compressed_ys.push(y.unsigned_abs() as u8);
            } else {
                compressed_ys.extend(&y.to_be_bytes());
            }
            flags.push(flag.bits());
            last_x = point.x;
            last_y = point.y;
        }

        let mut compressed_flags: Vec<u8> = Vec::with_capacity(flags.len());
        let mut i = 0;
        while i < flags.len() {
            let flag = flags[i];
            let mut run = 1;
            while i + run < flags.len() && flags[i + run] == flag && run < 256 {
                run += 1;
            }
            if run > 1 {
                compressed_flags.push(flag | SimpleGlyphFlags::REPEAT_FLAG.bits());
                compressed_flags.push((run - 1) as u8);
            } else {
                compressed_flags.push(flag);
            }
            i += run;
        }
        (compressed_flags, compressed_xs, compressed_ys)
    }
}

impl Serialize for Glyph {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        if self.is_empty() {
            return Ok(());
        }
        if self.has_components() {
            data.put(-1_i16)?;
        } else {
            if self.contours.len() > i16::MAX as usize {
                return Err(SerializationError("Too many contours in glyph".to_string()));
            }
            data.put(self.contours.len() as i16)?;
        }
        data.put(self.xMin)?;
        data.put(self.yMin)?;
        data.put(self.xMax)?;
        data.put(self.yMax)?;
        if self.has_components() {
            let last = self.components.len() - 1;
            for (i, comp) in self.components.iter().enumerate() {
                let flags = comp.recompute_flags(i < last, !self.instructions.is_empty());
                comp.write(flags, data)?;
            }
            if !self.instructions.is_empty() {
                data.put(self.instructions.len() as u16)?;
                data.extend_from_slice(&self.instructions);
            }
        } else {
            data.put(self.end_points()?)?;
            data.put(self.instructions.len() as u16)?;
            data.extend_from_slice(&self.instructions);
            let (compressed_flags, compressed_xs, compressed_ys) = self.compile_deltas();
            data.extend(compressed_flags);
            data.extend(compressed_xs);
            data.extend(compressed_ys);
        }
        Ok(())
    }
}

//! An in-memory TrueType font.
//!
//! The tables the Vietnamese tooling needs to read or rewrite are held in
//! typed form; every other table is carried through as raw bytes. Derived
//! data (`loca`, bounding boxes, `hhea` and `maxp` statistics, checksums)
//! is recomputed when the font is written.
use crate::error::{Error, Result};
use crate::outline::{Outline, OutlinePoint};
use crate::tables;
use crate::tables::cmap::cmap;
use crate::tables::glyf::{glyf, Glyph, Point};
use crate::tables::head::head;
use crate::tables::hhea::hhea;
use crate::tables::hmtx::{hmtx, Metric};
use crate::tables::maxp::maxp;
use crate::tables::post::post;
use otspec::types::*;
use otspec::{
    DeserializationError, Deserialize, Deserializer, ReaderContext, SerializationError, Serializer,
};
use std::collections::BTreeMap;
use std::convert::{TryFrom, TryInto};
use std::io::{Read, Write};
use std::num::Wrapping;

const SFNT_TRUETYPE: uint32 = 0x0001_0000;
const SFNT_APPLE_TRUE: uint32 = 0x7472_7565;
const SFNT_OPENTYPE: uint32 = 0x4F54_544F;
const SFNT_COLLECTION: uint32 = 0x7474_6366;
const SFNT_WOFF: uint32 = 0x774F_4646;
const SFNT_WOFF2: uint32 = 0x774F_4632;

const CHECKSUM_MAGIC: uint32 = 0xB1B0_AFBA;

/// Tables indexed by glyph ID that go stale once glyphs are appended.
const GLYPH_INDEXED_TABLES: [Tag; 5] = [
    Tag::new(b"hdmx"),
    Tag::new(b"LTSH"),
    Tag::new(b"VDMX"),
    Tag::new(b"gvar"),
    Tag::new(b"HVAR"),
];

/// Production names resolved through the cmap when the font has no
/// glyph names of its own.
const PRODUCTION_NAMES: &[(&str, uint32)] = &[
    ("agrave", 0x00E0),
    ("aacute", 0x00E1),
    ("acircumflex", 0x00E2),
    ("atilde", 0x00E3),
    ("abreve", 0x0103),
    ("Agrave", 0x00C0),
    ("Aacute", 0x00C1),
    ("Acircumflex", 0x00C2),
    ("Atilde", 0x00C3),
    ("Abreve", 0x0102),
    ("ecircumflex", 0x00EA),
    ("Ecircumflex", 0x00CA),
    ("ocircumflex", 0x00F4),
    ("Ocircumflex", 0x00D4),
    ("Itilde", 0x0128),
    ("dotlessi", 0x0131),
    ("dcroat", 0x0111),
    ("Dcroat", 0x0110),
    ("ohorn", 0x01A1),
    ("Ohorn", 0x01A0),
    ("uhorn", 0x01B0),
    ("Uhorn", 0x01AF),
    ("comma", 0x002C),
    ("period", 0x002E),
];

/// Computes the `searchRange`, `entrySelector` and `rangeShift` fields
/// used by binary-searchable OpenType arrays of `n` items of `unit` bytes.
pub fn get_search_range(n: uint16, unit: uint16) -> (uint16, uint16, uint16) {
    if n == 0 {
        return (0, 0, 0);
    }
    let entry_selector = 15 - n.leading_zeros() as uint16;
    let search_range = (unit as u32) << entry_selector;
    let range_shift = (n as u32 * unit as u32).saturating_sub(search_range);
    (
        search_range.min(uint16::MAX as u32) as uint16,
        entry_selector,
        range_shift.min(uint16::MAX as u32) as uint16,
    )
}

/// The OpenType table checksum: the wrapping sum of the data read as
/// big-endian u32s, zero-padding the final word.
pub fn checksum(data: &[u8]) -> uint32 {
    let mut sum = Wrapping(0_u32);
    for chunk in data.chunks(4) {
        let mut word = [0_u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum += Wrapping(u32::from_be_bytes(word));
    }
    sum.0
}

fn clamp_i16(value: i32) -> int16 {
    value.max(int16::MIN as i32).min(int16::MAX as i32) as int16
}

/// A name for a glyph added to carry `codepoint`.
pub fn codepoint_glyph_name(codepoint: uint32) -> String {
    if codepoint <= 0xFFFF {
        format!("uni{:04X}", codepoint)
    } else {
        format!("u{:05X}", codepoint)
    }
}

/// Parses `uniXXXX` and `uXXXXX` glyph names.
fn codepoint_from_glyph_name(name: &str) -> Option<uint32> {
    let hex = if let Some(hex) = name.strip_prefix("uni") {
        if hex.len() != 4 {
            return None;
        }
        hex
    } else if let Some(hex) = name.strip_prefix('u') {
        if !(4..=6).contains(&hex.len()) {
            return None;
        }
        hex
    } else {
        return None;
    };
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

fn production_name_codepoint(name: &str) -> Option<uint32> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return Some(c as uint32);
        }
    }
    PRODUCTION_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, cp)| *cp)
}

struct TableRecord {
    tag: Tag,
    offset: uint32,
    length: uint32,
}

impl Deserialize for TableRecord {
    fn from_bytes(c: &mut ReaderContext) -> std::result::Result<Self, DeserializationError> {
        let tag: Tag = c.de()?;
        let _checksum: uint32 = c.de()?;
        Ok(TableRecord {
            tag,
            offset: c.de()?,
            length: c.de()?,
        })
    }
}

fn take_table(raw: &mut BTreeMap<Tag, Vec<u8>>, tag: Tag) -> Result<Vec<u8>> {
    raw.remove(&tag).ok_or(Error::MissingTable(tag))
}

/// A TrueType font.
#[derive(Debug, Clone)]
pub struct Font {
    pub sfnt_version: uint32,
    pub head: head,
    pub hhea: hhea,
    pub maxp: maxp,
    pub hmtx: hmtx,
    pub glyf: glyf,
    pub cmap: cmap,
    /// `None` when the font has no `post` table, or one that could not be
    /// parsed (which is then kept in `tables`).
    pub post: Option<post>,
    /// Every other table, as raw bytes.
    pub tables: BTreeMap<Tag, Vec<u8>>,
    loaded_num_glyphs: usize,
}

/// Reads a font from a reader.
pub fn load<R: Read>(mut file: R) -> Result<Font> {
    let mut data = vec![];
    file.read_to_end(&mut data)?;
    Font::from_bytes(&data)
}

impl Font {
    /// An empty font holding only `.notdef`.
    pub fn new(units_per_em: uint16) -> Font {
        let upm = units_per_em as i32;
        Font {
            sfnt_version: SFNT_TRUETYPE,
            head: head::new(units_per_em),
            hhea: hhea::new(clamp_i16(upm * 4 / 5), clamp_i16(-upm / 5)),
            maxp: maxp::new10(1),
            hmtx: hmtx {
                metrics: vec![Metric {
                    advanceWidth: units_per_em / 2,
                    lsb: 0,
                }],
            },
            glyf: glyf {
                glyphs: vec![Glyph::default()],
            },
            cmap: cmap::default(),
            post: Some(post::new_v2(vec![".notdef".to_string()])),
            tables: BTreeMap::new(),
            loaded_num_glyphs: 1,
        }
    }

    /// Parses a TrueType font file.
    pub fn from_bytes(data: &[u8]) -> Result<Font> {
        let mut c = ReaderContext::new(data.to_vec());
        let sfnt_version: uint32 = c.de()?;
        match sfnt_version {
            SFNT_TRUETYPE | SFNT_APPLE_TRUE => {}
            SFNT_OPENTYPE => {
                return Err(Error::Unsupported(
                    "CFF-flavoured OpenType fonts have no glyf outlines".to_string(),
                ))
            }
            SFNT_COLLECTION => {
                return Err(Error::Unsupported("font collections".to_string()));
            }
            SFNT_WOFF | SFNT_WOFF2 => {
                return Err(Error::Unsupported(
                    "WOFF-compressed fonts; decompress to TTF first".to_string(),
                ))
            }
            other => {
                return Err(DeserializationError(format!(
                    "Unknown sfnt version {:#010x}",
                    other
                ))
                .into())
            }
        }
        let num_tables: uint16 = c.de()?;
        c.consume(6)?; // searchRange, entrySelector, rangeShift
        let records: Vec<TableRecord> = c.de_counted(num_tables as usize)?;
        let mut raw = BTreeMap::new();
        for record in records {
            let start = record.offset as usize;
            let end = start + record.length as usize;
            let table = data.get(start..end).ok_or_else(|| {
                DeserializationError(format!(
                    "Table '{}' ({}..{}) lies outside the file ({} bytes)",
                    record.tag,
                    start,
                    end,
                    data.len()
                ))
            })?;
            raw.insert(record.tag, table.to_vec());
        }
        Font::from_tables(sfnt_version, raw)
    }

    fn from_tables(sfnt_version: uint32, mut raw: BTreeMap<Tag, Vec<u8>>) -> Result<Font> {
        let head: head = otspec::de::from_bytes(&take_table(&mut raw, tables::head::TAG)?)?;
        let hhea: hhea = otspec::de::from_bytes(&take_table(&mut raw, tables::hhea::TAG)?)?;
        let maxp: maxp = otspec::de::from_bytes(&take_table(&mut raw, tables::maxp::TAG)?)?;
        let num_glyphs = maxp.numGlyphs;
        let loca = tables::loca::from_bytes(
            &mut ReaderContext::new(take_table(&mut raw, tables::loca::TAG)?),
            head.loca_is_32bit(),
            num_glyphs,
        )?;
        let glyf = tables::glyf::from_bytes(&take_table(&mut raw, tables::glyf::TAG)?, &loca)?;
        let hmtx = tables::hmtx::from_bytes(
            &mut ReaderContext::new(take_table(&mut raw, tables::hmtx::TAG)?),
            hhea.numberOfHMetrics,
            num_glyphs,
        )?;
        let cmap: cmap = otspec::de::from_bytes(&take_table(&mut raw, tables::cmap::TAG)?)?;

        let post = match raw.get(&tables::post::TAG) {
            None => None,
            Some(data) => match otspec::de::from_bytes::<post>(data) {
                Ok(mut post) => {
                    raw.remove(&tables::post::TAG);
                    if let Some(names) = post.glyphnames.as_mut() {
                        names.truncate(num_glyphs as usize);
                        while names.len() < num_glyphs as usize {
                            names.push(format!("glyph{:05}", names.len()));
                        }
                    }
                    Some(post)
                }
                Err(e) => {
                    log::warn!("Carrying unparseable post table through unchanged: {}", e);
                    None
                }
            },
        };
        log::debug!(
            "Loaded {} glyphs, {} mapped codepoints, {} other tables",
            num_glyphs,
            cmap.mapping.len(),
            raw.len()
        );

        Ok(Font {
            sfnt_version,
            head,
            hhea,
            maxp,
            hmtx,
            glyf,
            cmap,
            post,
            tables: raw,
            loaded_num_glyphs: num_glyphs as usize,
        })
    }

    pub fn num_glyphs(&self) -> usize {
        self.glyf.glyphs.len()
    }

    pub fn glyph_for_codepoint(&self, codepoint: uint32) -> Option<uint16> {
        self.cmap.mapping.get(&codepoint).copied()
    }

    pub fn glyph_for_char(&self, ch: char) -> Option<uint16> {
        self.glyph_for_codepoint(ch as uint32)
    }

    /// Looks a glyph up by name: `post` names first, then `uniXXXX` /
    /// `uXXXXX` names and well-known production names through the cmap.
    pub fn glyph_by_name(&self, name: &str) -> Option<uint16> {
        if let Some(gid) = self.post.as_ref().and_then(|p| p.glyph_id(name)) {
            return Some(gid);
        }
        codepoint_from_glyph_name(name)
            .or_else(|| production_name_codepoint(name))
            .and_then(|cp| self.glyph_for_codepoint(cp))
    }

    /// A printable name for a glyph.
    pub fn glyph_name(&self, gid: uint16) -> String {
        if let Some(name) = self.post.as_ref().and_then(|p| p.glyph_name(gid)) {
            return name.to_string();
        }
        match self.cmap.mapping.iter().find(|(_, &g)| g == gid) {
            Some((&cp, _)) => codepoint_glyph_name(cp),
            None => format!("glyph{:05}", gid),
        }
    }

    /// True when the glyph has at least one contour or component.
    pub fn has_data(&self, gid: uint16) -> bool {
        self.glyf
            .glyphs
            .get(gid as usize)
            .map_or(false, |g| !g.is_empty())
    }

    pub fn advance_width(&self, gid: uint16) -> Option<uint16> {
        self.hmtx
            .metrics
            .get(gid as usize)
            .map(|m| m.advanceWidth)
    }

    /// The glyph's outline with components resolved.
    pub fn outline(&self, gid: uint16) -> Option<Outline> {
        let glyph = self.glyf.glyphs.get(gid as usize)?;
        let contours = glyph
            .flattened_contours(&self.glyf.glyphs)
            .iter()
            .map(|contour| {
                contour
                    .iter()
                    .map(|p| OutlinePoint {
                        pt: kurbo::Point::new(p.x as f64, p.y as f64),
                        on_curve: p.on_curve,
                    })
                    .collect()
            })
            .collect();
        Some(Outline { contours })
    }

    /// Returns the glyph mapped to `codepoint`, appending an empty glyph
    /// (named `uniXXXX`, zero advance) and mapping it if there is none.
    pub fn ensure_glyph_for_codepoint(&mut self, codepoint: uint32) -> Result<uint16> {
        if let Some(gid) = self.glyph_for_codepoint(codepoint) {
            return Ok(gid);
        }
        let gid = self.push_glyph(&codepoint_glyph_name(codepoint))?;
        self.cmap.mapping.insert(codepoint, gid);
        log::debug!("Created glyph {} for U+{:04X}", gid, codepoint);
        Ok(gid)
    }

    /// Appends a named glyph, optionally mapping it to a codepoint.
    pub fn add_glyph(
        &mut self,
        name: &str,
        codepoint: Option<uint32>,
        outline: &Outline,
        advance: uint16,
    ) -> Result<uint16> {
        let gid = self.push_glyph(name)?;
        if let Some(cp) = codepoint {
            self.cmap.mapping.insert(cp, gid);
        }
        self.set_glyph_outline(gid, outline, advance)?;
        Ok(gid)
    }

    fn push_glyph(&mut self, name: &str) -> Result<uint16> {
        let gid: uint16 = self
            .glyf
            .glyphs
            .len()
            .try_into()
            .map_err(|_| Error::TooManyGlyphs)?;
        if gid == uint16::MAX {
            return Err(Error::TooManyGlyphs);
        }
        self.glyf.glyphs.push(Glyph::default());
        self.hmtx.metrics.resize(self.glyf.glyphs.len(), Metric::default());
        if let Some(post) = self.post.as_mut() {
            post.push_glyph_name(name);
        }
        Ok(gid)
    }

    /// Replaces a glyph with a simple glyph drawing `outline`, and sets its
    /// advance width. Coordinates are rounded to the integer grid.
    pub fn set_glyph_outline(&mut self, gid: uint16, outline: &Outline, advance: uint16) -> Result<()> {
        let mut contours = Vec::with_capacity(outline.contours.len());
        for contour in outline.contours.iter().filter(|c| !c.is_empty()) {
            let points = contour
                .iter()
                .map(|p| -> Result<Point> {
                    Ok(Point::new(
                        to_coordinate(p.pt.x)?,
                        to_coordinate(p.pt.y)?,
                        p.on_curve,
                    ))
                })
                .collect::<Result<Vec<Point>>>()?;
            contours.push(points);
        }
        let glyph = self
            .glyf
            .glyphs
            .get_mut(gid as usize)
            .ok_or_else(|| Error::Unsupported(format!("No glyph with ID {}", gid)))?;
        *glyph = Glyph {
            contours,
            ..Default::default()
        };
        glyph.recalc_bounds(&[]);
        let lsb = if glyph.is_empty() { 0 } else { glyph.xMin };
        if self.hmtx.metrics.len() < self.glyf.glyphs.len() {
            self.hmtx.metrics.resize(self.glyf.glyphs.len(), Metric::default());
        }
        self.hmtx.metrics[gid as usize] = Metric {
            advanceWidth: advance,
            lsb,
        };
        Ok(())
    }

    /// Recomputes horizontal metrics from the glyph bounds.
    fn update_metrics(&mut self) {
        let mut advance_width_max: uint16 = 0;
        let mut min_lsb: Option<i32> = None;
        let mut min_rsb: Option<i32> = None;
        let mut max_extent: Option<i32> = None;
        for (glyph, metric) in self.glyf.glyphs.iter().zip(self.hmtx.metrics.iter_mut()) {
            advance_width_max = advance_width_max.max(metric.advanceWidth);
            if glyph.is_empty() {
                continue;
            }
            metric.lsb = glyph.xMin;
            let rsb = metric.advanceWidth as i32 - glyph.xMax as i32;
            min_lsb = Some(min_lsb.map_or(glyph.xMin as i32, |m| m.min(glyph.xMin as i32)));
            min_rsb = Some(min_rsb.map_or(rsb, |m| m.min(rsb)));
            max_extent = Some(max_extent.map_or(glyph.xMax as i32, |m| m.max(glyph.xMax as i32)));
        }
        self.hhea.advanceWidthMax = advance_width_max;
        self.hhea.minLeftSideBearing = clamp_i16(min_lsb.unwrap_or(0));
        self.hhea.minRightSideBearing = clamp_i16(min_rsb.unwrap_or(0));
        self.hhea.xMaxExtent = clamp_i16(max_extent.unwrap_or(0));
    }

    fn update_head_bounds(&mut self) {
        let mut bounds: Option<(int16, int16, int16, int16)> = None;
        for glyph in self.glyf.glyphs.iter().filter(|g| !g.is_empty()) {
            bounds = Some(match bounds {
                None => (glyph.xMin, glyph.yMin, glyph.xMax, glyph.yMax),
                Some((x0, y0, x1, y1)) => (
                    x0.min(glyph.xMin),
                    y0.min(glyph.yMin),
                    x1.max(glyph.xMax),
                    y1.max(glyph.yMax),
                ),
            });
        }
        let (x0, y0, x1, y1) = bounds.unwrap_or((0, 0, 0, 0));
        self.head.xMin = x0;
        self.head.yMin = y0;
        self.head.xMax = x1;
        self.head.yMax = y1;
    }

    /// Compiles the font, recomputing every derived field first.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let num_glyphs: uint16 = self
            .glyf
            .glyphs
            .len()
            .try_into()
            .map_err(|_| Error::TooManyGlyphs)?;
        self.hmtx
            .metrics
            .resize(num_glyphs as usize, Metric::default());

        self.glyf.recalc_bounds();
        let (glyf_data, loca) = self.glyf.compile()?;
        let loca_is_32bit = !loca.fits_short_format();
        self.head.indexToLocFormat = if loca_is_32bit { 1 } else { 0 };
        let loca_data = loca.to_bytes(loca_is_32bit)?;

        self.update_metrics();
        let (hmtx_data, number_of_hmetrics) = self.hmtx.to_bytes()?;
        self.hhea.numberOfHMetrics = number_of_hmetrics;

        self.maxp.numGlyphs = num_glyphs;
        if let Some(stats) = self.maxp.extended.as_mut() {
            self.glyf.update_maxp(stats);
        }
        self.update_head_bounds();
        self.head.checksumAdjustment = 0;

        if num_glyphs as usize != self.loaded_num_glyphs {
            for tag in GLYPH_INDEXED_TABLES.iter() {
                if self.tables.remove(tag).is_some() {
                    log::warn!(
                        "Dropping '{}' table: glyph count changed from {} to {}",
                        tag,
                        self.loaded_num_glyphs,
                        num_glyphs
                    );
                }
            }
        }
        let mapped = self.cmap.mapping.keys().copied();
        if let Some(os2) = self.tables.get_mut(&tables::os2::TAG) {
            if !tables::os2::update_char_ranges(os2, mapped) {
                log::warn!("OS/2 table too short to update its character ranges");
            }
        }

        let mut out: BTreeMap<Tag, Vec<u8>> = self.tables.clone();
        out.insert(tables::head::TAG, otspec::ser::to_bytes(&self.head)?);
        out.insert(tables::hhea::TAG, otspec::ser::to_bytes(&self.hhea)?);
        out.insert(tables::maxp::TAG, otspec::ser::to_bytes(&self.maxp)?);
        out.insert(tables::hmtx::TAG, hmtx_data);
        out.insert(tables::loca::TAG, loca_data);
        out.insert(tables::glyf::TAG, glyf_data);
        out.insert(tables::cmap::TAG, otspec::ser::to_bytes(&self.cmap)?);
        if let Some(post) = self.post.as_ref() {
            out.insert(tables::post::TAG, otspec::ser::to_bytes(post)?);
        }

        let mut bytes = self.compile_sfnt(&out)?;
        let adjustment = CHECKSUM_MAGIC.wrapping_sub(checksum(&bytes));
        self.head.checksumAdjustment = adjustment;
        let head_offset = table_offset(&bytes, tables::head::TAG)
            .ok_or_else(|| SerializationError("head table went missing".to_string()))?;
        let at = head_offset + tables::head::CHECKSUM_ADJUSTMENT_OFFSET;
        bytes[at..at + 4].copy_from_slice(&adjustment.to_be_bytes());
        Ok(bytes)
    }

    fn compile_sfnt(&self, out: &BTreeMap<Tag, Vec<u8>>) -> Result<Vec<u8>> {
        let num_tables = uint16::try_from(out.len())
            .map_err(|_| SerializationError("Too many tables".to_string()))?;
        let (search_range, entry_selector, range_shift) = get_search_range(num_tables, 16);
        let mut data: Vec<u8> = vec![];
        data.put(self.sfnt_version)?;
        data.put(num_tables)?;
        data.put(search_range)?;
        data.put(entry_selector)?;
        data.put(range_shift)?;

        let mut offset = 12 + 16 * out.len();
        let mut body: Vec<u8> = vec![];
        for (tag, table) in out {
            let length = uint32::try_from(table.len())
                .map_err(|_| SerializationError(format!("Table '{}' is too large", tag)))?;
            data.put(*tag)?;
            data.put(checksum(table))?;
            data.put(offset as uint32)?;
            data.put(length)?;
            body.extend_from_slice(table);
            while body.len() % 4 != 0 {
                body.push(0);
            }
            offset = 12 + 16 * out.len() + body.len();
        }
        data.extend(body);
        Ok(data)
    }

    /// Compiles the font and writes it out.
    pub fn save<W: Write>(&mut self, file: &mut W) -> Result<()> {
        let bytes = self.to_bytes()?;
        file.write_all(&bytes)?;
        Ok(())
    }
}

/// Finds a table's offset in a compiled font's table directory.
fn table_offset(font: &[u8], tag: Tag) -> Option<usize> {
    let num_tables = u16::from_be_bytes([*font.get(4)?, *font.get(5)?]) as usize;
    (0..num_tables).find_map(|i| {
        let record = font.get(12 + 16 * i..12 + 16 * (i + 1))?;
        if &record[0..4] == tag.as_bytes() {
            Some(u32::from_be_bytes([record[8], record[9], record[10], record[11]]) as usize)
        } else {
            None
        }
    })
}

fn to_coordinate(value: f64) -> Result<int16> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded < int16::MIN as f64 || rounded > int16::MAX as f64 {
        return Err(Error::CoordinateOverflow(value));
    }
    Ok(rounded as int16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;
    use pretty_assertions::assert_eq;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Outline {
        Outline::from_rect(Rect::new(x0, y0, x1, y1))
    }

    fn small_font() -> Font {
        let mut font = Font::new(1024);
        font.add_glyph("a", Some(0x61), &square(64.0, 0.0, 320.0, 320.0), 384)
            .unwrap();
        font.add_glyph("comma", Some(0x2C), &square(0.0, -64.0, 64.0, 64.0), 128)
            .unwrap();
        font
    }

    #[test]
    fn test_search_range() {
        assert_eq!(get_search_range(5, 16), (64, 2, 16));
        assert_eq!(get_search_range(1, 16), (16, 0, 0));
        assert_eq!(get_search_range(39, 2), (64, 5, 14));
    }

    #[test]
    fn test_checksum() {
        let binary_hhea = vec![
            0x00, 0x01, 0x00, 0x00, 0x02, 0xc1, 0xff, 0x4c, 0x00, 0x00, 0x05, 0x1f, 0xfe, 0x82,
            0xfe, 0x82, 0x04, 0xdd, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x5d,
        ];
        assert_eq!(checksum(&binary_hhea), 0x0623074B);
        assert_eq!(checksum(&[0x01, 0x02]), 0x01020000);
    }

    #[test]
    fn glyph_names() {
        assert_eq!(codepoint_from_glyph_name("uni1EA1"), Some(0x1EA1));
        assert_eq!(codepoint_from_glyph_name("u1F600"), Some(0x1F600));
        assert_eq!(codepoint_from_glyph_name("uniq"), None);
        assert_eq!(codepoint_from_glyph_name("uhorn"), None);
        assert_eq!(codepoint_glyph_name(0x1EA1), "uni1EA1");
        assert_eq!(codepoint_glyph_name(0x1F600), "u1F600");
    }

    #[test]
    fn lookups() {
        let mut font = small_font();
        assert_eq!(font.glyph_by_name("a"), Some(1));
        assert_eq!(font.glyph_by_name("comma"), Some(2));
        font.post = None;
        assert_eq!(font.glyph_by_name("a"), Some(1));
        assert_eq!(font.glyph_by_name("uni002C"), Some(2));
        assert_eq!(font.glyph_by_name("comma"), Some(2));
        assert_eq!(font.glyph_by_name("period"), None);
        assert_eq!(font.glyph_name(1), "uni0061");
        assert!(font.has_data(1));
        assert!(!font.has_data(0));
        assert!(!font.has_data(99));
        assert_eq!(font.advance_width(2), Some(128));
    }

    #[test]
    fn new_glyphs_are_appended_and_mapped() {
        let mut font = small_font();
        let gid = font.ensure_glyph_for_codepoint(0x1EA1).unwrap();
        assert_eq!(gid, 3);
        assert_eq!(font.ensure_glyph_for_codepoint(0x1EA1).unwrap(), 3);
        assert_eq!(font.glyph_by_name("uni1EA1"), Some(3));
        assert_eq!(font.advance_width(3), Some(0));
        assert!(!font.has_data(3));
    }

    #[test]
    fn coordinates_must_fit() {
        let mut font = small_font();
        let err = font
            .set_glyph_outline(1, &square(0.0, 0.0, 40000.0, 64.0), 100)
            .unwrap_err();
        assert!(matches!(err, Error::CoordinateOverflow(_)));
    }

    #[test]
    fn save_and_reload() {
        let mut font = small_font();
        font.tables.insert(Tag::new(b"hdmx"), vec![0, 0, 0, 0]);
        font.tables.insert(Tag::new(b"gasp"), vec![0, 1, 0, 0]);
        font.loaded_num_glyphs = 2;
        let bytes = font.to_bytes().unwrap();
        assert_eq!(checksum(&bytes), CHECKSUM_MAGIC);
        assert_eq!(bytes.len() % 4, 0);

        let reloaded = Font::from_bytes(&bytes).unwrap();
        assert_eq!(reloaded.num_glyphs(), 3);
        assert_eq!(reloaded.cmap, font.cmap);
        assert_eq!(reloaded.hmtx, font.hmtx);
        assert_eq!(reloaded.outline(1), font.outline(1));
        assert_eq!(reloaded.glyph_by_name("comma"), Some(2));
        assert_eq!(reloaded.tables.get(&Tag::new(b"gasp")), Some(&vec![0, 1, 0, 0]));
        assert!(!reloaded.tables.contains_key(&Tag::new(b"hdmx")));
        assert!(!reloaded.head.loca_is_32bit());
        assert_eq!(
            (reloaded.head.xMin, reloaded.head.yMin, reloaded.head.xMax, reloaded.head.yMax),
            (0, -64, 320, 320)
        );
        assert_eq!(reloaded.hhea.advanceWidthMax, 512);
        assert_eq!(reloaded.hhea.minRightSideBearing, 64);
        assert_eq!(reloaded.hhea.xMaxExtent, 320);
        assert_eq!(reloaded.maxp.numGlyphs, 3);
        assert_eq!(reloaded.maxp.extended.as_ref().unwrap().maxPoints, 4);
    }

    #[test]
    fn os2_follows_cmap() {
        let mut font = small_font();
        font.tables.insert(tables::os2::TAG, vec![0; 78]);
        font.ensure_glyph_for_codepoint(0x1EA1).unwrap();
        let bytes = font.to_bytes().unwrap();
        let reloaded = Font::from_bytes(&bytes).unwrap();
        let os2 = &reloaded.tables[&tables::os2::TAG];
        assert_eq!(tables::os2::char_index_range(os2), Some((0x2C, 0x1EA1)));
    }

    #[test]
    fn unsupported_flavours() {
        let otto = [0x4F, 0x54, 0x54, 0x4F, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(Font::from_bytes(&otto), Err(Error::Unsupported(_))));
        assert!(matches!(
            Font::from_bytes(&[0, 1, 0, 0]),
            Err(Error::Deserialization(_))
        ));
        let empty = [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            Font::from_bytes(&empty),
            Err(Error::MissingTable(t)) if t == tables::head::TAG
        ));
    }
}

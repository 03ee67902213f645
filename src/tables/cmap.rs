use crate::font::get_search_range;
use otspec::types::*;
use otspec::{
    DeserializationError, Deserialize, Deserializer, ReaderContext, SerializationError, Serialize,
    Serializer,
};
use std::collections::BTreeMap;
use std::convert::TryFrom;

/// The 'cmap' OpenType tag.
pub const TAG: Tag = Tag::new(b"cmap");

#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, PartialEq)]
struct EncodingRecord {
    platformID: uint16,
    encodingID: uint16,
    subtableOffset: uint32,
}

impl Deserialize for EncodingRecord {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        Ok(EncodingRecord {
            platformID: c.de()?,
            encodingID: c.de()?,
            subtableOffset: c.de()?,
        })
    }
}

impl EncodingRecord {
    /// Whether this record maps Unicode codepoints (excluding the variation
    /// sequence subtable, which is not a plain mapping).
    fn is_unicode(&self) -> bool {
        (self.platformID == 0 && self.encodingID != 5)
            || (self.platformID == 3 && (self.encodingID == 1 || self.encodingID == 10))
    }

    fn is_symbol(&self) -> bool {
        self.platformID == 3 && self.encodingID == 0
    }
}

/// The character to glyph mapping table.
///
/// Only the Unicode mapping is kept: all Unicode subtables are merged into
/// a single map when reading, and the table is written back as format 4
/// (plus format 12 when needed) subtables.
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, PartialEq, Default)]
pub struct cmap {
    /// A mapping between Unicode codepoints and glyph IDs.
    pub mapping: BTreeMap<uint32, uint16>,
}

fn read_format0(c: &mut ReaderContext, map: &mut BTreeMap<uint32, uint16>) -> Result<(), DeserializationError> {
    c.skip(4); // length, language
    let glyph_ids: Vec<u8> = c.de_counted(256)?;
    for (code, gid) in glyph_ids.into_iter().enumerate() {
        if gid != 0 {
            map.entry(code as u32).or_insert(gid as u16);
        }
    }
    Ok(())
}

fn read_format4(c: &mut ReaderContext, map: &mut BTreeMap<uint32, uint16>) -> Result<(), DeserializationError> {
    c.skip(4); // length, language
    let seg_count_x2: uint16 = c.de()?;
    let seg_count = seg_count_x2 as usize / 2;
    c.skip(6);
    let end_code: Vec<uint16> = c.de_counted(seg_count)?;
    c.skip(2);
    let start_code: Vec<uint16> = c.de_counted(seg_count)?;
    let id_delta: Vec<int16> = c.de_counted(seg_count)?;
    let id_range_offsets: Vec<uint16> = c.de_counted(seg_count)?;
    // Some fonts write a bogus length, so take whatever data is left.
    let available = c.remaining() / 2;
    let glyph_id_array: Vec<uint16> = c.de_counted(available)?;

    for i in 0..seg_count {
        let (start, end) = (start_code[i], end_code[i]);
        if start == 0xffff || start > end {
            continue;
        }
        for code in start..=end {
            let gid = if id_range_offsets[i] == 0 {
                (code as i32 + id_delta[i] as i32) as u16
            } else {
                let index = (id_range_offsets[i] / 2) as isize + (code - start) as isize
                    - (seg_count - i) as isize;
                match usize::try_from(index)
                    .ok()
                    .and_then(|ix| glyph_id_array.get(ix))
                {
                    Some(0) | None => 0,
                    Some(gid) => (*gid as i32 + id_delta[i] as i32) as u16,
                }
            };
            if gid != 0 {
                map.entry(code as u32).or_insert(gid);
            }
        }
    }
    Ok(())
}

fn read_format6(c: &mut ReaderContext, map: &mut BTreeMap<uint32, uint16>) -> Result<(), DeserializationError> {
    c.skip(4); // length, language
    let first_code: uint16 = c.de()?;
    let entry_count: uint16 = c.de()?;
    let glyph_ids: Vec<uint16> = c.de_counted(entry_count as usize)?;
    for (i, gid) in glyph_ids.into_iter().enumerate() {
        if gid != 0 {
            map.entry(first_code as u32 + i as u32).or_insert(gid);
        }
    }
    Ok(())
}

fn read_format12(c: &mut ReaderContext, map: &mut BTreeMap<uint32, uint16>) -> Result<(), DeserializationError> {
    c.skip(10); // reserved, length, language
    let num_groups: uint32 = c.de()?;
    for _ in 0..num_groups {
        let start: uint32 = c.de()?;
        let end: uint32 = c.de()?;
        let start_gid: uint32 = c.de()?;
        if start > end || end > 0x10ffff {
            return Err(DeserializationError(format!(
                "Bad cmap12 group {:#x}..{:#x}",
                start, end
            )));
        }
        for code in start..=end {
            let gid = start_gid + (code - start);
            if gid != 0 && gid <= u16::MAX as u32 {
                map.entry(code).or_insert(gid as u16);
            }
        }
    }
    Ok(())
}

fn read_subtable(
    c: &mut ReaderContext,
    record: &EncodingRecord,
    map: &mut BTreeMap<uint32, uint16>,
) -> Result<(), DeserializationError> {
    c.seek(record.subtableOffset as usize)?;
    let format: uint16 = c.de()?;
    match format {
        0 => read_format0(c, map),
        4 => read_format4(c, map),
        6 => read_format6(c, map),
        12 => read_format12(c, map),
        _ => {
            log::debug!(
                "Skipping cmap subtable ({},{}) in format {}",
                record.platformID,
                record.encodingID,
                format
            );
            Ok(())
        }
    }
}

impl Deserialize for cmap {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let _version: uint16 = c.de()?;
        let num_tables: uint16 = c.de()?;
        let records: Vec<EncodingRecord> = c.de_counted(num_tables as usize)?;
        let mut mapping = BTreeMap::new();
        // Full-repertoire subtables first, so their entries win.
        let mut unicode: Vec<&EncodingRecord> = records.iter().filter(|r| r.is_unicode()).collect();
        unicode.sort_by_key(|r| !(r.encodingID == 10 || r.encodingID == 4 || r.encodingID == 6));
        for record in &unicode {
            read_subtable(c, record, &mut mapping)?;
        }
        if unicode.is_empty() {
            for record in records.iter().filter(|r| r.is_symbol()) {
                read_subtable(c, record, &mut mapping)?;
            }
        }
        Ok(cmap { mapping })
    }
}

impl cmap {
    /// Builds a format 4 subtable from the BMP part of the mapping, one
    /// segment per run of consecutive codepoints with consecutive glyph IDs.
    fn compile_format4(&self) -> Result<Vec<u8>, SerializationError> {
        let mut start_code: Vec<uint16> = vec![];
        let mut end_code: Vec<uint16> = vec![];
        let mut id_delta: Vec<int16> = vec![];
        for (&code, &gid) in self.mapping.range(..0xffff) {
            let code = code as u16;
            let extends = match (end_code.last(), start_code.last(), id_delta.last()) {
                (Some(&end), Some(_), Some(&delta)) => {
                    end.wrapping_add(1) == code && code.wrapping_add(delta as u16) == gid
                }
                _ => false,
            };
            if extends {
                if let Some(end) = end_code.last_mut() {
                    *end = code;
                }
            } else {
                start_code.push(code);
                end_code.push(code);
                id_delta.push(gid.wrapping_sub(code) as i16);
            }
        }
        start_code.push(0xffff);
        end_code.push(0xffff);
        id_delta.push(1);

        let seg_count = end_code.len();
        let length = 16 + 8 * seg_count;
        if length > u16::MAX as usize {
            return Err(SerializationError(
                "cmap format 4 subtable too large".to_string(),
            ));
        }
        let (search_range, entry_selector, range_shift) = get_search_range(seg_count as u16, 2);
        let mut data = vec![];
        data.put(4_u16)?;
        data.put(length as u16)?;
        data.put(0_u16)?; // language
        data.put((seg_count * 2) as u16)?;
        data.put(search_range)?;
        data.put(entry_selector)?;
        data.put(range_shift)?;
        data.put(end_code)?;
        data.put(0_u16)?; // reservedPad
        data.put(start_code)?;
        data.put(id_delta)?;
        data.put(vec![0_u16; seg_count])?; // idRangeOffsets
        Ok(data)
    }

    fn compile_format12(&self) -> Result<Vec<u8>, SerializationError> {
        let mut groups: Vec<(uint32, uint32, uint32)> = vec![];
        for (&code, &gid) in &self.mapping {
            let extends = matches!(
                groups.last(),
                Some(&(start, end, start_gid)) if end + 1 == code && start_gid + (code - start) == gid as u32
            );
            match groups.last_mut() {
                Some(group) if extends => group.1 = code,
                _ => groups.push((code, code, gid as u32)),
            }
        }
        let mut data = vec![];
        data.put(12_u16)?;
        data.put(0_u16)?;
        data.put((16 + 12 * groups.len()) as uint32)?;
        data.put(0_u32)?; // language
        data.put(groups.len() as uint32)?;
        for (start, end, start_gid) in groups {
            data.put(start)?;
            data.put(end)?;
            data.put(start_gid)?;
        }
        Ok(data)
    }

    /// Whether any mapped codepoint lies outside the Basic Multilingual Plane.
    pub fn needs_format12(&self) -> bool {
        self.mapping.keys().any(|&c| c > 0xffff)
    }
}

impl Serialize for cmap {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        let format4 = self.compile_format4()?;
        let mut records: Vec<(uint16, uint16, usize)> = vec![(0, 3, 0), (3, 1, 0)];
        let mut subtables = vec![format4];
        if self.needs_format12() {
            subtables.push(self.compile_format12()?);
            records = vec![(0, 3, 0), (0, 4, 1), (3, 1, 0), (3, 10, 1)];
        }
        let header_len = 4 + 8 * records.len();
        let mut subtable_offsets = vec![];
        let mut offset = header_len;
        for st in &subtables {
            subtable_offsets.push(offset as uint32);
            offset += st.len();
        }
        data.put(0_u16)?;
        data.put(records.len() as uint16)?;
        for (platform, encoding, which) in records {
            data.put(platform)?;
            data.put(encoding)?;
            data.put(subtable_offsets[which])?;
        }
        for st in subtables {
            data.extend(st);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cmap_de_range_offset() {
        let binary_cmap = vec![
            0x00, 0x00, 0x00, 0x01, // header
            0x00, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00, 0x0c, // (3,1) record
            0x00, 0x04, 0x00, 0x24, 0x00, 0x00, 0x00, 0x04, 0x00, 0x04, 0x00, 0x01, 0x00, 0x00,
            0x00, 0x42, 0xff, 0xff, // endCode
            0x00, 0x00, // reservedPad
            0x00, 0x41, 0xff, 0xff, // startCode
            0x00, 0x00, 0x00, 0x01, // idDelta
            0x00, 0x04, 0x00, 0x00, // idRangeOffset
            0x00, 0x05, 0x00, 0x03, // glyphIdArray
        ];
        let fcmap: cmap = otspec::de::from_bytes(&binary_cmap).unwrap();
        let expected: BTreeMap<u32, u16> = vec![(0x41, 5), (0x42, 3)].into_iter().collect();
        assert_eq!(fcmap.mapping, expected);
    }

    #[test]
    fn cmap_ser_bmp_only() {
        let fcmap = cmap {
            mapping: vec![(0x41, 1), (0x42, 2), (0x43, 3), (0x61, 7), (0x1ea0, 9)]
                .into_iter()
                .collect(),
        };
        let binary = otspec::ser::to_bytes(&fcmap).unwrap();
        // two records sharing one subtable
        assert_eq!(&binary[0..4], &[0x00, 0x00, 0x00, 0x02]);
        assert_eq!(&binary[8..12], &binary[16..20]);
        // four segments: A-C, a, U+1EA0 and the terminator
        assert_eq!(&binary[20..24], &[0x00, 0x04, 0x00, 0x30]);
        assert_eq!(&binary[26..28], &[0x00, 0x08]);
        let reread: cmap = otspec::de::from_bytes(&binary).unwrap();
        assert_eq!(reread, fcmap);
    }

    #[test]
    fn cmap_ser_beyond_bmp() {
        let fcmap = cmap {
            mapping: vec![(0x41, 1), (0x1f600, 2), (0x1f601, 3)]
                .into_iter()
                .collect(),
        };
        assert!(fcmap.needs_format12());
        let binary = otspec::ser::to_bytes(&fcmap).unwrap();
        assert_eq!(&binary[0..4], &[0x00, 0x00, 0x00, 0x04]);
        let reread: cmap = otspec::de::from_bytes(&binary).unwrap();
        assert_eq!(reread, fcmap);
    }

    #[test]
    fn cmap_symbol_fallback() {
        let binary_cmap = vec![
            0x00, 0x00, 0x00, 0x01, // header
            0x00, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0c, // (3,0) record
            0x00, 0x06, 0x00, 0x0e, 0x00, 0x00, 0xf0, 0x20, 0x00, 0x02, 0x00, 0x03, 0x00, 0x00,
        ];
        let fcmap: cmap = otspec::de::from_bytes(&binary_cmap).unwrap();
        let expected: BTreeMap<u32, u16> = vec![(0xf020, 3)].into_iter().collect();
        assert_eq!(fcmap.mapping, expected);
    }
}

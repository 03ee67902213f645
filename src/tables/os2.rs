//! In-place updates of the raw `OS/2` table.
//!
//! The table is not parsed; only the fields that depend on the character
//! repertoire are rewritten.
use otspec::types::*;

/// The 'OS/2' OpenType tag.
pub const TAG: Tag = Tag::new(b"OS/2");

const UL_UNICODE_RANGE1_OFFSET: usize = 42;
const US_FIRST_CHAR_INDEX_OFFSET: usize = 64;
const US_LAST_CHAR_INDEX_OFFSET: usize = 66;

/// `ulUnicodeRange1` bits for the Latin blocks, with their codepoint ranges.
const LATIN_RANGES: &[(u32, u32, u32)] = &[
    (0, 0x0000, 0x007F),  // Basic Latin
    (1, 0x0080, 0x00FF),  // Latin-1 Supplement
    (2, 0x0100, 0x017F),  // Latin Extended-A
    (3, 0x0180, 0x024F),  // Latin Extended-B
    (29, 0x1E00, 0x1EFF), // Latin Extended Additional
];

fn read_u16(data: &[u8], offset: usize) -> uint16 {
    u16::from_be_bytes([data[offset], data[offset + 1]])
}

fn write_u16(data: &mut [u8], offset: usize, value: uint16) {
    data[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

/// Refreshes `usFirstCharIndex`, `usLastCharIndex` and the Latin bits of
/// `ulUnicodeRange1` from the mapped codepoints.
///
/// Returns false (leaving the data untouched) when the table is too short
/// to hold those fields.
pub fn update_char_ranges<I>(data: &mut [u8], codepoints: I) -> bool
where
    I: IntoIterator<Item = u32>,
{
    if data.len() < US_LAST_CHAR_INDEX_OFFSET + 2 {
        return false;
    }
    let mut first: Option<u32> = None;
    let mut last: Option<u32> = None;
    let mut range1 = u32::from_be_bytes([
        data[UL_UNICODE_RANGE1_OFFSET],
        data[UL_UNICODE_RANGE1_OFFSET + 1],
        data[UL_UNICODE_RANGE1_OFFSET + 2],
        data[UL_UNICODE_RANGE1_OFFSET + 3],
    ]);
    for cp in codepoints {
        first = Some(first.map_or(cp, |f| f.min(cp)));
        last = Some(last.map_or(cp, |l| l.max(cp)));
        if let Some((bit, _, _)) = LATIN_RANGES
            .iter()
            .find(|(_, lo, hi)| (*lo..=*hi).contains(&cp))
        {
            range1 |= 1 << *bit;
        }
    }
    data[UL_UNICODE_RANGE1_OFFSET..UL_UNICODE_RANGE1_OFFSET + 4]
        .copy_from_slice(&range1.to_be_bytes());
    if let (Some(first), Some(last)) = (first, last) {
        write_u16(data, US_FIRST_CHAR_INDEX_OFFSET, first.min(0xFFFF) as uint16);
        write_u16(data, US_LAST_CHAR_INDEX_OFFSET, last.min(0xFFFF) as uint16);
    }
    true
}

/// The table's `usFirstCharIndex` and `usLastCharIndex`.
pub fn char_index_range(data: &[u8]) -> Option<(uint16, uint16)> {
    if data.len() < US_LAST_CHAR_INDEX_OFFSET + 2 {
        return None;
    }
    Some((
        read_u16(data, US_FIRST_CHAR_INDEX_OFFSET),
        read_u16(data, US_LAST_CHAR_INDEX_OFFSET),
    ))
}

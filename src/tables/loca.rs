use otspec::types::*;
use otspec::{DeserializationError, Deserializer, ReaderContext, SerializationError, Serializer};

/// The 'loca' OpenType tag.
pub const TAG: Tag = Tag::new(b"loca");

/// The glyph location table.
///
/// `offsets` holds one entry per glyph plus a final entry marking the end
/// of the last glyph, so glyph `i` spans `offsets[i]..offsets[i + 1]`.
#[allow(non_snake_case, non_camel_case_types)]
#[derive(Debug, PartialEq, Clone, Default)]
pub struct loca {
    pub offsets: Vec<u32>,
}

impl loca {
    /// Whether every offset can be stored in the short (halved 16-bit) format.
    pub fn fits_short_format(&self) -> bool {
        self.offsets
            .iter()
            .all(|&o| o % 2 == 0 && o / 2 <= uint16::MAX as u32)
    }

    pub fn to_bytes(&self, loca_is_32bit: bool) -> Result<Vec<u8>, SerializationError> {
        let mut data = vec![];
        for &offset in &self.offsets {
            if loca_is_32bit {
                data.put(offset)?;
            } else {
                if offset % 2 != 0 || offset / 2 > uint16::MAX as u32 {
                    return Err(SerializationError(format!(
                        "Offset {} cannot be stored in a short loca table",
                        offset
                    )));
                }
                data.put((offset / 2) as uint16)?;
            }
        }
        Ok(data)
    }
}

/// Reads a location table for `num_glyphs` glyphs.
pub fn from_bytes(
    c: &mut ReaderContext,
    loca_is_32bit: bool,
    num_glyphs: uint16,
) -> Result<loca, DeserializationError> {
    let count = num_glyphs as usize + 1;
    let offsets: Vec<u32> = if loca_is_32bit {
        c.de_counted(count)?
    } else {
        let short: Vec<uint16> = c.de_counted(count)?;
        short.iter().map(|x| (*x as u32) * 2).collect()
    };
    if offsets.windows(2).any(|w| w[1] < w[0]) {
        return Err(DeserializationError(
            "loca offsets are not monotonic".to_string(),
        ));
    }
    Ok(loca { offsets })
}

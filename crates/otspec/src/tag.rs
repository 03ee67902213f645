//! OpenType table tags.

use crate::{DeserializationError, Deserialize, ReaderContext, SerializationError, Serialize};

/// A four-byte OpenType tag such as `glyf` or `OS/2`.
///
/// Every byte is expected to be printable ascii (0x20..=0x7E); tags read
/// from a font are validated, tags built with [`Tag::new`] are trusted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag([u8; 4]);

impl Tag {
    /// A tag from a literal, for use in constants.
    pub const fn new(raw: &[u8; 4]) -> Self {
        Tag(*raw)
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl Serialize for Tag {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        data.extend_from_slice(&self.0);
        Ok(())
    }
}

impl Deserialize for Tag {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let bytes = c.consume(4)?;
        if let Some(pos) = bytes.iter().position(|b| !(0x20..=0x7E).contains(b)) {
            return Err(DeserializationError(format!(
                "Bad tag: invalid byte '0x{:02X}' at position {}",
                bytes[pos], pos
            )));
        }
        let mut raw = [0; 4];
        raw.copy_from_slice(bytes);
        Ok(Tag(raw))
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        // Non-ascii bytes (only possible via `Tag::new`) show as `?`.
        for &b in &self.0 {
            let shown = if (0x20..=0x7E).contains(&b) { b as char } else { '?' };
            write!(f, "{}", shown)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Tag({})", self)
    }
}

use otspec::types::*;
use otspec::{
    DeserializationError, Deserialize, Deserializer, ReaderContext, SerializationError, Serialize,
    Serializer,
};

/// The 'head' OpenType tag.
pub const TAG: Tag = Tag::new(b"head");

/// Offset of `checksumAdjustment` within the table.
pub const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;

const MAGIC_NUMBER: uint32 = 0x5F0F3CF5;

/// The font header table.
#[allow(non_snake_case, non_camel_case_types)]
#[derive(Clone, Debug, PartialEq)]
pub struct head {
    pub majorVersion: uint16,
    pub minorVersion: uint16,
    pub fontRevision: Fixed,
    pub checksumAdjustment: uint32,
    pub magicNumber: uint32,
    pub flags: uint16,
    pub unitsPerEm: uint16,
    pub created: LONGDATETIME,
    pub modified: LONGDATETIME,
    pub xMin: int16,
    pub yMin: int16,
    pub xMax: int16,
    pub yMax: int16,
    pub macStyle: uint16,
    pub lowestRecPPEM: uint16,
    pub fontDirectionHint: int16,
    pub indexToLocFormat: int16,
    pub glyphDataFormat: int16,
}

impl head {
    /// Create a new `head` table for a font with the given units-per-em.
    ///
    /// Bounds and `indexToLocFormat` are filled in when the font is compiled.
    pub fn new(upm: uint16) -> head {
        head {
            majorVersion: 1,
            minorVersion: 0,
            fontRevision: Fixed::from_f32(1.0),
            checksumAdjustment: 0,
            magicNumber: MAGIC_NUMBER,
            flags: 0b0000_0000_0000_1011,
            unitsPerEm: upm,
            created: 0,
            modified: 0,
            xMin: 0,
            yMin: 0,
            xMax: 0,
            yMax: 0,
            macStyle: 0,
            lowestRecPPEM: 6,
            fontDirectionHint: 2,
            indexToLocFormat: 0,
            glyphDataFormat: 0,
        }
    }

    pub fn loca_is_32bit(&self) -> bool {
        self.indexToLocFormat == 1
    }
}

impl Deserialize for head {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let table = head {
            majorVersion: c.de()?,
            minorVersion: c.de()?,
            fontRevision: c.de()?,
            checksumAdjustment: c.de()?,
            magicNumber: c.de()?,
            flags: c.de()?,
            unitsPerEm: c.de()?,
            created: c.de()?,
            modified: c.de()?,
            xMin: c.de()?,
            yMin: c.de()?,
            xMax: c.de()?,
            yMax: c.de()?,
            macStyle: c.de()?,
            lowestRecPPEM: c.de()?,
            fontDirectionHint: c.de()?,
            indexToLocFormat: c.de()?,
            glyphDataFormat: c.de()?,
        };
        if table.magicNumber != MAGIC_NUMBER {
            return Err(DeserializationError(format!(
                "Bad head magic number {:#010x}",
                table.magicNumber
            )));
        }
        Ok(table)
    }
}

impl Serialize for head {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        data.put(self.majorVersion)?;
        data.put(self.minorVersion)?;
        data.put(self.fontRevision)?;
        data.put(self.checksumAdjustment)?;
        data.put(self.magicNumber)?;
        data.put(self.flags)?;
        data.put(self.unitsPerEm)?;
        data.put(self.created)?;
        data.put(self.modified)?;
        data.put(self.xMin)?;
        data.put(self.yMin)?;
        data.put(self.xMax)?;
        data.put(self.yMax)?;
        data.put(self.macStyle)?;
        data.put(self.lowestRecPPEM)?;
        data.put(self.fontDirectionHint)?;
        data.put(self.indexToLocFormat)?;
        data.put(self.glyphDataFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn binary_head() -> Vec<u8> {
        vec![
            0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x0a, 0xf8, 0xfe, 0x61, 0x5f, 0x0f,
            0x3c, 0xf5, 0x00, 0x03, 0x03, 0xe8, 0x00, 0x00, 0x00, 0x00, 0xda, 0x56, 0x58, 0xaa,
            0x00, 0x00, 0x00, 0x00, 0xdc, 0x9c, 0x8a, 0x29, 0x00, 0x09, 0x00, 0x00, 0x02, 0x50,
            0x03, 0xe8, 0x00, 0x00, 0x00, 0x06, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00,
        ]
    }

    #[test]
    fn head_de() {
        let deserialized: head = otspec::de::from_bytes(&binary_head()).unwrap();
        assert_eq!(deserialized.unitsPerEm, 1000);
        assert_eq!(deserialized.checksumAdjustment, 0x0af8fe61);
        assert_eq!(deserialized.xMin, 9);
        assert_eq!(deserialized.xMax, 592);
        assert_eq!(deserialized.yMax, 1000);
        assert_eq!(deserialized.created, 0xda5658aa);
        assert!(deserialized.loca_is_32bit());
    }

    #[test]
    fn head_ser_roundtrips_bytes() {
        let deserialized: head = otspec::de::from_bytes(&binary_head()).unwrap();
        let serialized = otspec::ser::to_bytes(&deserialized).unwrap();
        assert_eq!(serialized, binary_head());
    }

    #[test]
    fn head_rejects_bad_magic() {
        let mut bytes = binary_head();
        bytes[12] = 0;
        assert!(otspec::de::from_bytes::<head>(&bytes).is_err());
    }
}

use otspec::types::*;
use otspec::{
    DeserializationError, Deserialize, Deserializer, ReaderContext, SerializationError, Serialize,
    Serializer,
};

/// The 'hhea' OpenType tag.
pub const TAG: Tag = Tag::new(b"hhea");

/// The horizontal header table.
#[allow(non_snake_case, non_camel_case_types)]
#[derive(Clone, Debug, PartialEq)]
pub struct hhea {
    pub majorVersion: uint16,
    pub minorVersion: uint16,
    pub ascender: FWORD,
    pub descender: FWORD,
    pub lineGap: FWORD,
    pub advanceWidthMax: UFWORD,
    pub minLeftSideBearing: FWORD,
    pub minRightSideBearing: FWORD,
    pub xMaxExtent: FWORD,
    pub caretSlopeRise: int16,
    pub caretSlopeRun: int16,
    pub caretOffset: int16,
    pub reserved0: int16,
    pub reserved1: int16,
    pub reserved2: int16,
    pub reserved3: int16,
    pub metricDataFormat: int16,
    pub numberOfHMetrics: uint16,
}

impl hhea {
    pub fn new(ascender: FWORD, descender: FWORD) -> hhea {
        hhea {
            majorVersion: 1,
            minorVersion: 0,
            ascender,
            descender,
            lineGap: 0,
            advanceWidthMax: 0,
            minLeftSideBearing: 0,
            minRightSideBearing: 0,
            xMaxExtent: 0,
            caretSlopeRise: 1,
            caretSlopeRun: 0,
            caretOffset: 0,
            reserved0: 0,
            reserved1: 0,
            reserved2: 0,
            reserved3: 0,
            metricDataFormat: 0,
            numberOfHMetrics: 0,
        }
    }
}

impl Deserialize for hhea {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        Ok(hhea {
            majorVersion: c.de()?,
            minorVersion: c.de()?,
            ascender: c.de()?,
            descender: c.de()?,
            lineGap: c.de()?,
            advanceWidthMax: c.de()?,
            minLeftSideBearing: c.de()?,
            minRightSideBearing: c.de()?,
            xMaxExtent: c.de()?,
            caretSlopeRise: c.de()?,
            caretSlopeRun: c.de()?,
            caretOffset: c.de()?,
            reserved0: c.de()?,
            reserved1: c.de()?,
            reserved2: c.de()?,
            reserved3: c.de()?,
            metricDataFormat: c.de()?,
            numberOfHMetrics: c.de()?,
        })
    }
}

impl Serialize for hhea {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        data.put(self.majorVersion)?;
        data.put(self.minorVersion)?;
        data.put(self.ascender)?;
        data.put(self.descender)?;
        data.put(self.lineGap)?;
        data.put(self.advanceWidthMax)?;
        data.put(self.minLeftSideBearing)?;
        data.put(self.minRightSideBearing)?;
        data.put(self.xMaxExtent)?;
        data.put(self.caretSlopeRise)?;
        data.put(self.caretSlopeRun)?;
        data.put(self.caretOffset)?;
        data.put(self.reserved0)?;
        data.put(self.reserved1)?;
        data.put(self.reserved2)?;
        data.put(self.reserved3)?;
        data.put(self.metricDataFormat)?;
        data.put(self.numberOfHMetrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hhea_serde() {
        let fhhea = hhea {
            majorVersion: 1,
            minorVersion: 0,
            ascender: 705,
            descender: -180,
            lineGap: 0,
            advanceWidthMax: 1311,
            minLeftSideBearing: -382,
            minRightSideBearing: -382,
            xMaxExtent: 1245,
            caretSlopeRise: 1,
            caretSlopeRun: 0,
            caretOffset: 0,
            reserved0: 0,
            reserved1: 0,
            reserved2: 0,
            reserved3: 0,
            metricDataFormat: 0,
            numberOfHMetrics: 1117,
        };
        let binary_hhea = vec![
            0x00, 0x01, 0x00, 0x00, 0x02, 0xc1, 0xff, 0x4c, 0x00, 0x00, 0x05, 0x1f, 0xfe, 0x82,
            0xfe, 0x82, 0x04, 0xdd, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x5d,
        ];
        let deserialized: hhea = otspec::de::from_bytes(&binary_hhea).unwrap();
        assert_eq!(deserialized, fhhea);
        assert_eq!(otspec::ser::to_bytes(&fhhea).unwrap(), binary_hhea);
    }
}

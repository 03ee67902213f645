use otspec::types::*;
use otspec::{
    DeserializationError, Deserialize, Deserializer, ReaderContext, SerializationError, Serialize,
    Serializer,
};

/// The 'maxp' OpenType tag.
pub const TAG: Tag = Tag::new(b"maxp");

const VERSION_0_5: uint32 = 0x0000_5000;
const VERSION_1_0: uint32 = 0x0001_0000;

/// The statistics carried by a version 1.0 `maxp` table.
#[allow(non_snake_case, non_camel_case_types)]
#[derive(Clone, Debug, PartialEq, Default)]
pub struct maxp10 {
    pub maxPoints: uint16,
    pub maxContours: uint16,
    pub maxCompositePoints: uint16,
    pub maxCompositeContours: uint16,
    pub maxZones: uint16,
    pub maxTwilightPoints: uint16,
    pub maxStorage: uint16,
    pub maxFunctionDefs: uint16,
    pub maxInstructionDefs: uint16,
    pub maxStackElements: uint16,
    pub maxSizeOfInstructions: uint16,
    pub maxComponentElements: uint16,
    pub maxComponentDepth: uint16,
}

/// A maxp table, regardless of version.
///
/// Version 0.5 tables only carry the glyph count and have `extended`
/// set to `None`.
#[allow(non_snake_case, non_camel_case_types)]
#[derive(Clone, Debug, PartialEq)]
pub struct maxp {
    pub numGlyphs: uint16,
    pub extended: Option<maxp10>,
}

impl maxp {
    /// A version 1.0 table with every statistic zeroed except `maxZones`.
    pub fn new10(num_glyphs: uint16) -> maxp {
        maxp {
            numGlyphs: num_glyphs,
            extended: Some(maxp10 {
                maxZones: 2,
                ..Default::default()
            }),
        }
    }

    pub fn version(&self) -> uint32 {
        if self.extended.is_some() {
            VERSION_1_0
        } else {
            VERSION_0_5
        }
    }
}

impl Deserialize for maxp {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let version: uint32 = c.de()?;
        let num_glyphs: uint16 = c.de()?;
        let extended = match version {
            VERSION_0_5 => None,
            VERSION_1_0 => Some(maxp10 {
                maxPoints: c.de()?,
                maxContours: c.de()?,
                maxCompositePoints: c.de()?,
                maxCompositeContours: c.de()?,
                maxZones: c.de()?,
                maxTwilightPoints: c.de()?,
                maxStorage: c.de()?,
                maxFunctionDefs: c.de()?,
                maxInstructionDefs: c.de()?,
                maxStackElements: c.de()?,
                maxSizeOfInstructions: c.de()?,
                maxComponentElements: c.de()?,
                maxComponentDepth: c.de()?,
            }),
            _ => {
                return Err(DeserializationError(format!(
                    "Unknown maxp version {:#010x}",
                    version
                )))
            }
        };
        Ok(maxp {
            numGlyphs: num_glyphs,
            extended,
        })
    }
}

impl Serialize for maxp {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        data.put(self.version())?;
        data.put(self.numGlyphs)?;
        if let Some(ext) = &self.extended {
            data.put(ext.maxPoints)?;
            data.put(ext.maxContours)?;
            data.put(ext.maxCompositePoints)?;
            data.put(ext.maxCompositeContours)?;
            data.put(ext.maxZones)?;
            data.put(ext.maxTwilightPoints)?;
            data.put(ext.maxStorage)?;
            data.put(ext.maxFunctionDefs)?;
            data.put(ext.maxInstructionDefs)?;
            data.put(ext.maxStackElements)?;
            data.put(ext.maxSizeOfInstructions)?;
            data.put(ext.maxComponentElements)?;
            data.put(ext.maxComponentDepth)?;
        }
        Ok(())
    }
}

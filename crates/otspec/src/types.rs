//! OpenType data type names, so table definitions read like the spec tables.
use crate::{DeserializationError, Deserialize, Deserializer, ReaderContext};
use crate::{SerializationError, Serialize};

pub use crate::tag::Tag;

pub type uint8 = u8;
pub type uint16 = u16;
pub type uint32 = u32;
pub type int16 = i16;
pub type int32 = i32;
pub type FWORD = i16;
pub type UFWORD = u16;
/// Seconds since 1904-01-01T00:00 UTC, kept raw.
pub type LONGDATETIME = i64;

/// A 16.16 fixed point value, kept as its raw bits so that a read/write
/// cycle reproduces the input exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Fixed(pub u32);

impl Fixed {
    pub fn from_f32(value: f32) -> Self {
        Fixed(ot_round(value * 65536.0) as u32)
    }
}

/// Rounds half up, as the OpenType spec prescribes.
pub fn ot_round(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

impl Serialize for Fixed {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        self.0.to_bytes(data)
    }
}

impl Deserialize for Fixed {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let packed: u32 = c.de()?;
        Ok(Fixed(packed))
    }
}

//! Big-endian reading and writing of OpenType data structures.
//!
//! This crate is used by the `vietfont` crate. No user-serviceable parts inside.
#![allow(non_snake_case, non_camel_case_types, clippy::upper_case_acronyms)]
use std::convert::TryInto;
use std::mem;

pub mod tag;
pub mod types;

pub use tag::Tag;

#[derive(Debug)]
pub struct SerializationError(pub String);
#[derive(Debug)]
pub struct DeserializationError(pub String);

/// A cursor over a byte buffer being deserialized.
pub struct ReaderContext {
    pub input: Vec<u8>,
    pub ptr: usize,
}

impl ReaderContext {
    pub fn new(input: Vec<u8>) -> Self {
        ReaderContext { input, ptr: 0 }
    }

    pub fn consume(&mut self, bytes: usize) -> Result<&[u8], DeserializationError> {
        if self.ptr + bytes > self.input.len() {
            Err(DeserializationError(format!(
                "End of file: wanted {} bytes at offset {}, have {}",
                bytes,
                self.ptr,
                self.input.len()
            )))
        } else {
            let subslice = &self.input[self.ptr..self.ptr + bytes];
            self.ptr += bytes;
            Ok(subslice)
        }
    }

    /// Moves the read pointer to an absolute offset within the buffer.
    pub fn seek(&mut self, offset: usize) -> Result<(), DeserializationError> {
        if offset > self.input.len() {
            return Err(DeserializationError(format!(
                "Seek to {} beyond end of data ({})",
                offset,
                self.input.len()
            )));
        }
        self.ptr = offset;
        Ok(())
    }

    pub fn skip(&mut self, bytes: usize) {
        self.ptr += bytes;
    }

    pub fn remaining(&self) -> usize {
        self.input.len().saturating_sub(self.ptr)
    }
}

pub trait Serializer<T>
where
    T: Serialize,
{
    fn put(&mut self, data: T) -> Result<(), SerializationError>;
}

impl<T> Serializer<T> for Vec<u8>
where
    T: Serialize,
{
    fn put(&mut self, data: T) -> Result<(), SerializationError> {
        data.to_bytes(self)
    }
}

pub trait Deserializer<T>
where
    T: Deserialize,
{
    fn de(&mut self) -> Result<T, DeserializationError>;
    fn de_counted(&mut self, s: usize) -> Result<Vec<T>, DeserializationError>;
}

impl<T> Deserializer<T> for ReaderContext
where
    T: Deserialize,
{
    fn de(&mut self) -> Result<T, DeserializationError> {
        T::from_bytes(self)
    }
    fn de_counted(&mut self, s: usize) -> Result<Vec<T>, DeserializationError> {
        (0..s).map(|_| self.de()).collect()
    }
}

impl std::fmt::Display for SerializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Serialization error {:}", self.0)
    }
}

impl std::fmt::Display for DeserializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Deserialization error {:}", self.0)
    }
}

impl std::error::Error for SerializationError {}
impl std::error::Error for DeserializationError {}

pub trait Serialize {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError>;
}

pub trait Deserialize {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError>
    where
        Self: std::marker::Sized;
}

macro_rules! serde_primitive {
    ($t: ty) => {
        impl Serialize for $t {
            fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
                data.extend_from_slice(&self.to_be_bytes());
                Ok(())
            }
        }

        impl Deserialize for $t {
            fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
                let bytes: &[u8] = c.consume(mem::size_of::<$t>())?;
                let bytes_array: [u8; mem::size_of::<$t>()] = bytes
                    .try_into()
                    .map_err(|_| DeserializationError("Slice with incorrect length".to_string()))?;
                Ok(<$t>::from_be_bytes(bytes_array))
            }
        }
    };
}

serde_primitive!(i8);
serde_primitive!(u8);
serde_primitive!(u16);
serde_primitive!(u32);
serde_primitive!(i16);
serde_primitive!(i32);
serde_primitive!(i64);

impl<T> Serialize for Vec<T>
where
    T: Serialize,
{
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        for el in self {
            el.to_bytes(data)?
        }
        Ok(())
    }
}

/// Reads elements until the input runs out.
impl<T> Deserialize for Vec<T>
where
    T: Deserialize,
{
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let mut res: Vec<T> = vec![];
        while c.remaining() > 0 {
            let start = c.ptr;
            let maybe: Result<T, DeserializationError> = c.de();
            match maybe {
                Ok(x) => res.push(x),
                Err(_) => {
                    c.ptr = start;
                    break;
                }
            }
        }
        Ok(res)
    }
}

impl<T> Serialize for &T
where
    T: Serialize,
{
    fn to_bytes(
        &self,
        data: &mut std::vec::Vec<u8>,
    ) -> std::result::Result<(), SerializationError> {
        (*self).to_bytes(data)
    }
}

/* Provide a serde-style interface */
pub mod ser {
    use crate::SerializationError;
    use crate::Serialize;
    use crate::Serializer;

    pub fn to_bytes<T: Serialize>(data: &T) -> Result<Vec<u8>, SerializationError> {
        let mut out = vec![];
        out.put(data)?;
        Ok(out)
    }
}
pub mod de {
    pub use crate::{DeserializationError, Deserialize, Deserializer, ReaderContext};
    pub fn from_bytes<T: Deserialize>(data: &[u8]) -> Result<T, DeserializationError> {
        let mut rc = ReaderContext::new(data.to_vec());
        rc.de()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ser_primitive() {
        let mut out = vec![];
        out.put(1_u16).unwrap();
        out.put(2_u16).unwrap();
        out.put(4_u32).unwrap();
        out.put(-2_i16).unwrap();
        assert_eq!(
            out,
            [0x00, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x04, 0xff, 0xfe]
        );
    }

    #[test]
    fn de_primitive() {
        let mut rc = ReaderContext::new(vec![0x00, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x04]);
        let first: u16 = rc.de().unwrap();
        let second: u16 = rc.de().unwrap();
        let third: u32 = rc.de().unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(third, 4);
        assert_eq!(rc.remaining(), 0);
    }

    #[test]
    fn de_past_end() {
        let mut rc = ReaderContext::new(vec![0x00]);
        let attempt: Result<u16, _> = rc.de();
        assert!(attempt.is_err());
    }

    #[test]
    fn de_vec_stops_at_partial_element() {
        let mut rc = ReaderContext::new(vec![0x00, 0x01, 0x00, 0x02, 0x03]);
        let all: Vec<u16> = rc.de().unwrap();
        assert_eq!(all, vec![1, 2]);
        assert_eq!(rc.remaining(), 1);
    }

    #[test]
    fn de_counted_reads_exactly() {
        let mut rc = ReaderContext::new(vec![0x00, 0x0a, 0x00, 0x0b, 0x00, 0x0c]);
        let two: Vec<u16> = rc.de_counted(2).unwrap();
        assert_eq!(two, vec![10, 11]);
        assert_eq!(rc.remaining(), 2);
    }

    #[test]
    fn ser_vec() {
        let mut out = vec![];
        let t: Vec<u16> = vec![1, 2, 3];
        out.put(t).unwrap();
        assert_eq!(out, [0x00, 0x01, 0x00, 0x02, 0x00, 0x03]);
    }

    #[test]
    fn seek_out_of_range() {
        let mut rc = ReaderContext::new(vec![0; 4]);
        assert!(rc.seek(4).is_ok());
        assert!(rc.seek(5).is_err());
    }
}

use otspec::{DeserializationError, SerializationError, Tag};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error parsing font: {0}")]
    Deserialization(#[from] DeserializationError),

    #[error("Error compiling font: {0}")]
    Serialization(#[from] SerializationError),

    #[error("IO Error: '{0}'")]
    Io(#[from] io::Error),

    #[error("Font has no '{0}' table")]
    MissingTable(Tag),

    #[error("Unsupported font: {0}")]
    Unsupported(String),

    #[error("Donor glyph '{0}' is missing or has no usable outline")]
    MissingDonor(String),

    #[error("No base glyph for {0:?}")]
    MissingBase(char),

    #[error("Composed outline for {0:?} came out empty")]
    EmptyResult(char),

    #[error("Coordinate {0} does not fit in a TrueType glyph")]
    CoordinateOverflow(f64),

    #[error("Font already holds the maximum number of glyphs")]
    TooManyGlyphs,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

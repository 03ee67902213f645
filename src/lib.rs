//! Vietnamese glyph coverage for pixel TrueType fonts.
//!
//! The crate reads a TrueType font into [`Font`], checks it against the
//! Vietnamese alphabet with [`check_coverage`], and composes missing
//! letters out of existing base letters and donor accents with
//! [`synthesize`].
//!
//! ```no_run
//! use std::fs::File;
//! use vietfont::{font, synthesize, vietnamese_charset, SynthesisOptions};
//!
//! let mut font = font::load(File::open("Pixellari.ttf").unwrap()).unwrap();
//! let report = synthesize(&mut font, &vietnamese_charset(), SynthesisOptions::default());
//! println!("{} still missing", report.still_missing.len());
//! font.save(&mut File::create("Pixellari-Vietnamese.ttf").unwrap()).unwrap();
//! ```
pub mod charset;
pub mod coverage;
mod error;
pub mod font;
pub mod marks;
pub mod outline;
pub mod overlap;
pub mod synthesize;
pub mod tables;

pub use crate::charset::{decompose, unicode_name, vietnamese_charset, Decomposition};
pub use crate::coverage::{check_coverage, CoverageReport};
pub use crate::error::{Error, Result};
pub use crate::font::Font;
pub use crate::outline::{Outline, OutlinePoint};
pub use crate::synthesize::{synthesize, Outcome, SynthesisOptions, SynthesisReport};

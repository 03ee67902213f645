use std::fs::File;
use std::path::Path;
use vietfont::font::{self, Font};
use vietfont::unicode_name;

/// Every required glyph is present.
pub const EXIT_OK: i32 = 0;
pub const EXIT_INPUT_NOT_FOUND: i32 = 1;
/// The run completed but required glyphs are still missing.
pub const EXIT_MISSING_GLYPHS: i32 = 2;
/// The font could not be parsed or written.
pub const EXIT_FONT_ERROR: i32 = 3;

/// Sets up `env_logger`: warnings by default, more with each `-v`.
/// `RUST_LOG` still takes precedence.
pub fn init_logging(verbose: usize) {
    env_logger::init_from_env(env_logger::Env::default().filter_or(
        env_logger::DEFAULT_FILTER_ENV,
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        },
    ));
}

/// Opens and parses a font, reporting problems on stderr. The error is the
/// process exit code to use.
pub fn open_font(path: &Path) -> Result<Font, i32> {
    if !path.exists() {
        eprintln!("Input font not found: {}", path.display());
        return Err(EXIT_INPUT_NOT_FOUND);
    }
    let infile = File::open(path).map_err(|e| {
        eprintln!("Could not open {}: {}", path.display(), e);
        EXIT_FONT_ERROR
    })?;
    font::load(infile).map_err(|e| {
        eprintln!("Could not parse font {}: {}", path.display(), e);
        EXIT_FONT_ERROR
    })
}

pub fn save_font(font: &mut Font, path: &Path) -> Result<(), i32> {
    let mut outfile = File::create(path).map_err(|e| {
        eprintln!("Could not open {} for writing: {}", path.display(), e);
        EXIT_FONT_ERROR
    })?;
    font.save(&mut outfile).map_err(|e| {
        eprintln!("Could not write font {}: {}", path.display(), e);
        EXIT_FONT_ERROR
    })
}

/// `  U+XXXX ch NAME`, as printed after a synthesis run.
pub fn missing_codepoint_line(ch: char) -> String {
    format!("  U+{:04X} {} {}", ch as u32, ch, unicode_name(ch))
}

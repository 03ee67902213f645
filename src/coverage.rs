//! Reporting which required characters a font lacks.
use crate::charset::unicode_name;
use crate::font::Font;
use std::fmt;

/// The result of checking a font against a character set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageReport {
    /// Number of distinct required characters.
    pub required: usize,
    /// Required characters the font does not cover, in charset order.
    pub missing: Vec<char>,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// One `U+XXXX<TAB>ch<TAB>NAME` line per character.
pub struct MissingListing<'a>(pub &'a [char]);

impl fmt::Display for MissingListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.0 {
            writeln!(f, "U+{:04X}\t{}\t{}", *ch as u32, ch, unicode_name(*ch))?;
        }
        Ok(())
    }
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "required {}", self.required)?;
        writeln!(f, "missing {}", self.missing.len())?;
        write!(f, "{}", MissingListing(&self.missing))
    }
}

/// Whether the font covers `ch`: it maps the codepoint and, when `strict`,
/// the glyph has some outline data.
pub fn is_covered(font: &Font, ch: char, strict: bool) -> bool {
    match font.glyph_for_char(ch) {
        None => false,
        Some(gid) => !strict || font.has_data(gid),
    }
}

/// Checks every character of `charset` against the font's cmap.
///
/// With `strict`, mapped glyphs without contours or components also count
/// as missing.
pub fn check_coverage(font: &Font, charset: &[char], strict: bool) -> CoverageReport {
    let missing: Vec<char> = charset
        .iter()
        .copied()
        .filter(|&ch| !is_covered(font, ch, strict))
        .collect();
    log::info!(
        "{} of {} required characters missing",
        missing.len(),
        charset.len()
    );
    CoverageReport {
        required: charset.len(),
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::Outline;
    use kurbo::Rect;
    use pretty_assertions::assert_eq;

    #[test]
    fn coverage_report() {
        let mut font = Font::new(1024);
        let square = Outline::from_rect(Rect::new(0.0, 0.0, 64.0, 64.0));
        font.add_glyph("a", Some('a' as u32), &square, 128).unwrap();
        font.add_glyph("uni1EA1", Some(0x1EA1), &Outline::new(), 128)
            .unwrap();

        let charset = ['a', 'ạ', 'ằ'];
        let report = check_coverage(&font, &charset, false);
        assert_eq!(report.required, 3);
        assert_eq!(report.missing, vec!['ằ']);
        assert!(!report.is_complete());

        let strict = check_coverage(&font, &charset, true);
        assert_eq!(strict.missing, vec!['ạ', 'ằ']);
    }

    #[test]
    fn report_format() {
        let report = CoverageReport {
            required: 178,
            missing: vec!['ằ'],
        };
        assert_eq!(
            report.to_string(),
            "required 178\nmissing 1\nU+1EB1\tằ\tLATIN SMALL LETTER A WITH BREVE AND GRAVE\n"
        );
    }
}

//! The Vietnamese character repertoire and its decomposition into base
//! letters and marks.
use itertools::Itertools;
use unicode_normalization::UnicodeNormalization;

pub const TONE_GRAVE: char = '\u{0300}';
pub const TONE_ACUTE: char = '\u{0301}';
pub const TONE_HOOK: char = '\u{0309}';
pub const TONE_TILDE: char = '\u{0303}';
pub const TONE_DOT: char = '\u{0323}';

pub const SHAPE_CIRCUMFLEX: char = '\u{0302}';
pub const SHAPE_BREVE: char = '\u{0306}';
pub const SHAPE_HORN: char = '\u{031B}';

/// Every letter of the Vietnamese alphabet with every tone, lowercase then
/// uppercase.
pub const VIETNAMESE_REQUIRED: &str = concat!(
    "aàáảãạăằắẳẵặâầấẩẫậbcdđeèéẻẽẹêềếểễệghiìíỉĩị",
    "klmnoòóỏõọôồốổỗộơờớởỡợpqrstuùúủũụưừứửữựvxyỳýỷỹỵ",
    "AÀÁẢÃẠĂẰẮẲẴẶÂẦẤẨẪẬBCDĐEÈÉẺẼẸÊỀẾỂỄỆGHIÌÍỈĨỊ",
    "KLMNOÒÓỎÕỌÔỒỐỔỖỘƠỜỚỞỠỢPQRSTUÙÚỦŨỤƯỪỨỬỮỰVXYỲÝỶỸỴ",
);

/// Toned i/I letters, rebuilt on every run so the dot of `i` is always
/// dropped under a top mark.
pub const ALWAYS_REBUILD: &str = "ìíĩỉịÌÍĨỈỊ";

/// The required letters in order of first appearance, without duplicates.
pub fn vietnamese_charset() -> Vec<char> {
    VIETNAMESE_REQUIRED.chars().unique().collect()
}

pub fn is_always_rebuild(ch: char) -> bool {
    ALWAYS_REBUILD.contains(ch)
}

/// The Unicode name of a character, or `UNKNOWN`.
pub fn unicode_name(ch: char) -> String {
    unicode_names2::name(ch)
        .map(|n| n.to_string())
        .unwrap_or_else(|| "UNKNOWN".to_string())
}

/// The five Vietnamese tones that carry a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToneMark {
    Grave,
    Acute,
    HookAbove,
    Tilde,
    DotBelow,
}

impl ToneMark {
    pub fn from_char(c: char) -> Option<ToneMark> {
        match c {
            TONE_GRAVE => Some(ToneMark::Grave),
            TONE_ACUTE => Some(ToneMark::Acute),
            TONE_HOOK => Some(ToneMark::HookAbove),
            TONE_TILDE => Some(ToneMark::Tilde),
            TONE_DOT => Some(ToneMark::DotBelow),
            _ => None,
        }
    }

    /// Whether the mark sits above the letter.
    pub fn is_above(self) -> bool {
        self != ToneMark::DotBelow
    }
}

/// Marks that turn a base letter into a different letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeMark {
    Breve,
    Circumflex,
    Horn,
}

impl ShapeMark {
    pub fn from_char(c: char) -> Option<ShapeMark> {
        match c {
            SHAPE_BREVE => Some(ShapeMark::Breve),
            SHAPE_CIRCUMFLEX => Some(ShapeMark::Circumflex),
            SHAPE_HORN => Some(ShapeMark::Horn),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            ShapeMark::Breve => SHAPE_BREVE,
            ShapeMark::Circumflex => SHAPE_CIRCUMFLEX,
            ShapeMark::Horn => SHAPE_HORN,
        }
    }
}

/// A letter split into its base, shape mark and tone mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decomposition {
    pub base: char,
    pub shape: Option<ShapeMark>,
    pub tone: Option<ToneMark>,
}

/// Splits a character by canonical decomposition. The first mark of each
/// kind wins; other combining marks are ignored.
pub fn decompose(ch: char) -> Decomposition {
    let mut nfd = std::iter::once(ch).nfd();
    let base = nfd.next().unwrap_or(ch);
    let mut decomposition = Decomposition {
        base,
        shape: None,
        tone: None,
    };
    for mark in nfd {
        if let Some(tone) = ToneMark::from_char(mark) {
            decomposition.tone.get_or_insert(tone);
        } else if let Some(shape) = ShapeMark::from_char(mark) {
            decomposition.shape.get_or_insert(shape);
        }
    }
    decomposition
}

/// The precomposed letter carrying a horn, for the four letters that take one.
pub fn horn_base(base: char) -> Option<char> {
    match base {
        'o' => Some('ơ'),
        'u' => Some('ư'),
        'O' => Some('Ơ'),
        'U' => Some('Ư'),
        _ => None,
    }
}

impl Decomposition {
    /// The letter the tone mark is placed on: the base with its shape mark
    /// applied. Returns `None` if the shape mark does not compose with the
    /// base into a single character.
    pub fn shaped_base(&self) -> Option<char> {
        match self.shape {
            None => Some(self.base),
            Some(ShapeMark::Horn) => horn_base(self.base),
            Some(shape) => {
                let composed: Vec<char> = [self.base, shape.as_char()].iter().cloned().nfc().collect();
                match composed.as_slice() {
                    [single] => Some(*single),
                    _ => None,
                }
            }
        }
    }

    pub fn is_upper(&self) -> bool {
        self.base.is_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_is_deduplicated_and_ordered() {
        let charset = vietnamese_charset();
        assert_eq!(charset.len(), 178);
        assert_eq!(charset[0], 'a');
        assert_eq!(charset[1], 'à');
        assert_eq!(*charset.last().unwrap(), 'Ỵ');
        assert_eq!(charset.iter().unique().count(), charset.len());
        assert_eq!(charset.iter().filter(|c| c.is_lowercase()).count(), 89);
    }

    #[test]
    fn decompose_stacked_marks() {
        let d = decompose('ằ');
        assert_eq!(d.base, 'a');
        assert_eq!(d.shape, Some(ShapeMark::Breve));
        assert_eq!(d.tone, Some(ToneMark::Grave));
        assert_eq!(d.shaped_base(), Some('ă'));
        assert_eq!(d.shaped_base().map(|c| c as u32), Some(0x0103));

        let d = decompose('Ợ');
        assert_eq!(d.base, 'O');
        assert_eq!(d.shape, Some(ShapeMark::Horn));
        assert_eq!(d.tone, Some(ToneMark::DotBelow));
        assert_eq!(d.shaped_base(), Some('Ơ'));
        assert!(d.is_upper());

        let d = decompose('ễ');
        assert_eq!(d.shaped_base(), Some('ê'));
        assert_eq!(d.tone, Some(ToneMark::Tilde));
    }

    #[test]
    fn decompose_plain_letters() {
        assert_eq!(
            decompose('đ'),
            Decomposition {
                base: 'đ',
                shape: None,
                tone: None
            }
        );
        let d = decompose('ỉ');
        assert_eq!((d.base, d.shape, d.tone), ('i', None, Some(ToneMark::HookAbove)));
        assert_eq!(d.shaped_base(), Some('i'));
    }

    #[test]
    fn shape_that_does_not_compose() {
        let d = Decomposition {
            base: 'x',
            shape: Some(ShapeMark::Circumflex),
            tone: None,
        };
        assert_eq!(d.shaped_base(), None);
    }

    #[test]
    fn horn_only_on_o_and_u() {
        let horned = |base| Decomposition {
            base,
            shape: Some(ShapeMark::Horn),
            tone: Some(ToneMark::Grave),
        };
        assert_eq!(horned('u').shaped_base(), Some('ư'));
        assert_eq!(horned('O').shaped_base(), Some('Ơ'));
        assert_eq!(horned('a').shaped_base(), None);
        assert_eq!(horn_base('e'), None);
    }

    #[test]
    fn names_and_rebuild_set() {
        assert_eq!(unicode_name('ằ'), "LATIN SMALL LETTER A WITH BREVE AND GRAVE");
        assert_eq!(unicode_name('\u{E000}'), "UNKNOWN");
        assert!(is_always_rebuild('ĩ'));
        assert!(is_always_rebuild('Ị'));
        assert!(!is_always_rebuild('i'));
    }
}

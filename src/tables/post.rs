use otspec::types::*;
use otspec::{
    DeserializationError, Deserialize, Deserializer, ReaderContext, SerializationError, Serialize,
    Serializer,
};

/// The 'post' OpenType tag.
pub const TAG: Tag = Tag::new(b"post");

/// The standard Macintosh glyph order, referenced by index from version
/// 1.0 and 2.0 tables.
pub const APPLE_NAMES: &[&str] = &[
    ".notdef",
    ".null",
    "nonmarkingreturn",
    "space",
    "exclam",
    "quotedbl",
    "numbersign",
    "dollar",
    "percent",
    "ampersand",
    "quotesingle",
    "parenleft",
    "parenright",
    "asterisk",
    "plus",
    "comma",
    "hyphen",
    "period",
    "slash",
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "colon",
    "semicolon",
    "less",
    "equal",
    "greater",
    "question",
    "at",
    "A",
    "B",
    "C",
    "D",
    "E",
    "F",
    "G",
    "H",
    "I",
    "J",
    "K",
    "L",
    "M",
    "N",
    "O",
    "P",
    "Q",
    "R",
    "S",
    "T",
    "U",
    "V",
    "W",
    "X",
    "Y",
    "Z",
    "bracketleft",
    "backslash",
    "bracketright",
    "asciicircum",
    "underscore",
    "grave",
    "a",
    "b",
    "c",
    "d",
    "e",
    "f",
    "g",
    "h",
    "i",
    "j",
    "k",
    "l",
    "m",
    "n",
    "o",
    "p",
    "q",
    "r",
    "s",
    "t",
    "u",
    "v",
    "w",
    "x",
    "y",
    "z",
    "braceleft",
    "bar",
    "braceright",
    "asciitilde",
    "Adieresis",
    "Aring",
    "Ccedilla",
    "Eacute",
    "Ntilde",
    "Odieresis",
    "Udieresis",
    "aacute",
    "agrave",
    "acircumflex",
    "adieresis",
    "atilde",
    "aring",
    "ccedilla",
    "eacute",
    "egrave",
    "ecircumflex",
    "edieresis",
    "iacute",
    "igrave",
    "icircumflex",
    "idieresis",
    "ntilde",
    "oacute",
    "ograve",
    "ocircumflex",
    "odieresis",
    "otilde",
    "uacute",
    "ugrave",
    "ucircumflex",
    "udieresis",
    "dagger",
    "degree",
    "cent",
    "sterling",
    "section",
    "bullet",
    "paragraph",
    "germandbls",
    "registered",
    "copyright",
    "trademark",
    "acute",
    "dieresis",
    "notequal",
    "AE",
    "Oslash",
    "infinity",
    "plusminus",
    "lessequal",
    "greaterequal",
    "yen",
    "mu",
    "partialdiff",
    "summation",
    "product",
    "pi",
    "integral",
    "ordfeminine",
    "ordmasculine",
    "Omega",
    "ae",
    "oslash",
    "questiondown",
    "exclamdown",
    "logicalnot",
    "radical",
    "florin",
    "approxequal",
    "Delta",
    "guillemotleft",
    "guillemotright",
    "ellipsis",
    "nonbreakingspace",
    "Agrave",
    "Atilde",
    "Otilde",
    "OE",
    "oe",
    "endash",
    "emdash",
    "quotedblleft",
    "quotedblright",
    "quoteleft",
    "quoteright",
    "divide",
    "lozenge",
    "ydieresis",
    "Ydieresis",
    "fraction",
    "currency",
    "guilsinglleft",
    "guilsinglright",
    "fi",
    "fl",
    "daggerdbl",
    "periodcentered",
    "quotesinglbase",
    "quotedblbase",
    "perthousand",
    "Acircumflex",
    "Ecircumflex",
    "Aacute",
    "Edieresis",
    "Egrave",
    "Iacute",
    "Icircumflex",
    "Idieresis",
    "Igrave",
    "Oacute",
    "Ocircumflex",
    "apple",
    "Ograve",
    "Uacute",
    "Ucircumflex",
    "Ugrave",
    "dotlessi",
    "circumflex",
    "tilde",
    "macron",
    "breve",
    "dotaccent",
    "ring",
    "cedilla",
    "hungarumlaut",
    "ogonek",
    "caron",
    "Lslash",
    "lslash",
    "Scaron",
    "scaron",
    "Zcaron",
    "zcaron",
    "brokenbar",
    "Eth",
    "eth",
    "Yacute",
    "yacute",
    "Thorn",
    "thorn",
    "minus",
    "multiply",
    "onesuperior",
    "twosuperior",
    "threesuperior",
    "onehalf",
    "onequarter",
    "threequarters",
    "franc",
    "Gbreve",
    "gbreve",
    "Idotaccent",
    "Scedilla",
    "scedilla",
    "Cacute",
    "cacute",
    "Ccaron",
    "ccaron",
    "dcroat",
];

const VERSION_1_0: uint32 = 0x0001_0000;
const VERSION_2_0: uint32 = 0x0002_0000;
const VERSION_3_0: uint32 = 0x0003_0000;

/// The PostScript table.
///
/// Glyph names are only held for versions 1.0 and 2.0; version 3.0 tables
/// carry none. Writing always uses the table's own version, and a 1.0 table
/// whose glyph list no longer matches the standard order is promoted to 2.0.
#[allow(non_snake_case, non_camel_case_types)]
#[derive(Debug, PartialEq, Clone)]
pub struct post {
    pub version: Fixed,
    pub italicAngle: Fixed,
    pub underlinePosition: FWORD,
    pub underlineThickness: FWORD,
    pub isFixedPitch: uint32,
    pub minMemType42: uint32,
    pub maxMemType42: uint32,
    pub minMemType1: uint32,
    pub maxMemType1: uint32,
    pub glyphnames: Option<Vec<String>>,
}

impl post {
    /// A version 3.0 table, which carries no glyph names.
    pub fn new_v3() -> post {
        post {
            version: Fixed(VERSION_3_0),
            italicAngle: Fixed(0),
            underlinePosition: -75,
            underlineThickness: 50,
            isFixedPitch: 0,
            minMemType42: 0,
            maxMemType42: 0,
            minMemType1: 0,
            maxMemType1: 0,
            glyphnames: None,
        }
    }

    /// A version 2.0 table naming the given glyphs.
    pub fn new_v2(glyphnames: Vec<String>) -> post {
        post {
            version: Fixed(VERSION_2_0),
            glyphnames: Some(glyphnames),
            ..post::new_v3()
        }
    }

    /// Appends a name for a newly added glyph. Tables without glyph names
    /// are left alone.
    pub fn push_glyph_name(&mut self, name: &str) {
        if let Some(names) = self.glyphnames.as_mut() {
            names.push(name.to_string());
        }
    }

    /// The glyph ID carrying the given name, if any.
    pub fn glyph_id(&self, name: &str) -> Option<uint16> {
        self.glyphnames
            .as_ref()?
            .iter()
            .position(|n| n == name)
            .map(|ix| ix as uint16)
    }

    /// The name of the given glyph, if the table has names.
    pub fn glyph_name(&self, gid: uint16) -> Option<&str> {
        self.glyphnames
            .as_ref()?
            .get(gid as usize)
            .map(|s| s.as_str())
    }

    fn is_standard_order(names: &[String]) -> bool {
        names.len() == APPLE_NAMES.len() && names.iter().zip(APPLE_NAMES).all(|(a, b)| a == b)
    }
}

impl Deserialize for post {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let mut table = post {
            version: c.de()?,
            italicAngle: c.de()?,
            underlinePosition: c.de()?,
            underlineThickness: c.de()?,
            isFixedPitch: c.de()?,
            minMemType42: c.de()?,
            maxMemType42: c.de()?,
            minMemType1: c.de()?,
            maxMemType1: c.de()?,
            glyphnames: None,
        };
        match table.version.0 {
            VERSION_1_0 => {
                table.glyphnames = Some(APPLE_NAMES.iter().map(|s| s.to_string()).collect());
            }
            VERSION_2_0 => {
                let num_glyphs: uint16 = c.de()?;
                let glyph_offsets: Vec<uint16> = c.de_counted(num_glyphs as usize)?;
                let mut glyph_name_table: Vec<String> = Vec::new();
                while c.remaining() > 0 {
                    let byte_count: u8 = c.de()?;
                    let name = c.consume(byte_count as usize)?;
                    glyph_name_table.push(String::from_utf8_lossy(name).into_owned());
                }
                let mut glyphnames = Vec::with_capacity(num_glyphs as usize);
                for offset in glyph_offsets {
                    let offset = offset as usize;
                    let name = if offset < APPLE_NAMES.len() {
                        APPLE_NAMES[offset].to_string()
                    } else {
                        glyph_name_table
                            .get(offset - APPLE_NAMES.len())
                            .cloned()
                            .ok_or_else(|| {
                                DeserializationError(format!(
                                    "post name index {} out of range",
                                    offset
                                ))
                            })?
                    };
                    glyphnames.push(name);
                }
                table.glyphnames = Some(glyphnames);
            }
            VERSION_3_0 => {}
            other => {
                return Err(DeserializationError(format!(
                    "Unsupported post version {:#010x}",
                    other
                )))
            }
        }
        Ok(table)
    }
}

impl Serialize for post {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        let names = match (&self.glyphnames, self.version.0) {
            (_, VERSION_3_0) | (None, _) => None,
            (Some(names), VERSION_1_0) if post::is_standard_order(names) => None,
            (Some(names), _) => Some(names),
        };
        let version = match (names, self.version.0) {
            (Some(_), _) => VERSION_2_0,
            (None, VERSION_1_0) if self.glyphnames.is_some() => VERSION_1_0,
            (None, _) => VERSION_3_0,
        };
        data.put(version)?;
        data.put(self.italicAngle)?;
        data.put(self.underlinePosition)?;
        data.put(self.underlineThickness)?;
        data.put(self.isFixedPitch)?;
        data.put(self.minMemType42)?;
        data.put(self.maxMemType42)?;
        data.put(self.minMemType1)?;
        data.put(self.maxMemType1)?;
        if let Some(names) = names {
            data.put(names.len() as uint16)?;
            let mut glyph_name_table: Vec<u8> = Vec::new();
            let mut custom: Vec<&str> = Vec::new();
            for name in names {
                let index = match APPLE_NAMES.iter().position(|r| r == name) {
                    Some(index) => index,
                    None => match custom.iter().position(|r| r == name) {
                        Some(index) => APPLE_NAMES.len() + index,
                        None => {
                            if name.len() > 255 {
                                return Err(SerializationError(format!(
                                    "Glyph name too long: {}",
                                    name
                                )));
                            }
                            glyph_name_table.push(name.len() as u8);
                            glyph_name_table.extend(name.as_bytes());
                            custom.push(name);
                            APPLE_NAMES.len() + custom.len() - 1
                        }
                    },
                };
                if index > uint16::MAX as usize {
                    return Err(SerializationError("Too many glyph names".to_string()));
                }
                data.put(index as uint16)?;
            }
            data.extend(glyph_name_table);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn header(version: u8) -> Vec<u8> {
        vec![
            0x00, version, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0x9c, 0x00, 0x32, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ]
    }

    #[test]
    fn post_serde_v20() {
        let mut binary_post = header(2);
        binary_post.extend(vec![
            0x00, 0x04, // numGlyphs
            0x00, 0x00, 0x00, 0x44, 0x01, 0x02, 0x01, 0x03, // indices
            0x07, 0x75, 0x6e, 0x69, 0x31, 0x45, 0x41, 0x31, // uni1EA1
            0x05, 0x68, 0x6f, 0x72, 0x6e, 0x31, // horn1
        ]);
        let deserialized: post = otspec::de::from_bytes(&binary_post).unwrap();
        assert_eq!(deserialized.underlinePosition, -100);
        assert_eq!(deserialized.underlineThickness, 50);
        assert_eq!(
            deserialized.glyphnames,
            Some(vec![
                ".notdef".to_string(),
                "a".to_string(),
                "uni1EA1".to_string(),
                "horn1".to_string(),
            ])
        );
        assert_eq!(deserialized.glyph_id("uni1EA1"), Some(2));
        assert_eq!(deserialized.glyph_name(1), Some("a"));
        assert_eq!(otspec::ser::to_bytes(&deserialized).unwrap(), binary_post);
    }

    #[test]
    fn post_push_name() {
        let mut binary_post = header(2);
        binary_post.extend(vec![0x00, 0x01, 0x00, 0x00]);
        let mut table: post = otspec::de::from_bytes(&binary_post).unwrap();
        table.push_glyph_name("uni1EA0");
        let reread: post = otspec::de::from_bytes(&otspec::ser::to_bytes(&table).unwrap()).unwrap();
        assert_eq!(reread.glyph_id("uni1EA0"), Some(1));
    }

    #[test]
    fn post_v1_promoted_when_glyphs_added() {
        let mut table: post = otspec::de::from_bytes(&header(1)).unwrap();
        assert_eq!(table.glyph_id("a"), Some(68));
        assert_eq!(otspec::ser::to_bytes(&table).unwrap(), header(1));
        table.push_glyph_name("uni1EA0");
        let binary = otspec::ser::to_bytes(&table).unwrap();
        assert_eq!(binary[1], 0x02);
        let reread: post = otspec::de::from_bytes(&binary).unwrap();
        assert_eq!(reread.glyph_id("uni1EA0"), Some(258));
    }

    #[test]
    fn post_v3_has_no_names() {
        let mut table: post = otspec::de::from_bytes(&header(3)).unwrap();
        assert_eq!(table.glyphnames, None);
        table.push_glyph_name("uni1EA0");
        assert_eq!(otspec::ser::to_bytes(&table).unwrap(), header(3));
    }

    #[test]
    fn post_unknown_version() {
        let mut binary_post = header(2);
        binary_post[1] = 0x02;
        binary_post[2] = 0x50;
        assert!(otspec::de::from_bytes::<post>(&binary_post).is_err());
    }
}

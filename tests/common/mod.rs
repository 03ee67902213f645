#![allow(dead_code)]
use kurbo::Rect;
use vietfont::{Font, Outline};

pub const LOWER_ADVANCE: u16 = 384;
pub const UPPER_ADVANCE: u16 = 448;
pub const NARROW_ADVANCE: u16 = 192;

/// Plain letters of the Vietnamese alphabet, without marks.
pub const PLAIN_LOWER: &str = "abcdđeghiklmnopqrstuvxy";

/// Routes library logging through the test harness; `RUST_LOG=debug`
/// shows each composed glyph.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn rects(list: &[(f64, f64, f64, f64)]) -> Outline {
    let mut outline = Outline::new();
    for &(x0, y0, x1, y1) in list {
        outline.extend(&Outline::from_rect(Rect::new(x0, y0, x1, y1)));
    }
    outline
}

fn add(font: &mut Font, name: &str, ch: char, shapes: &[(f64, f64, f64, f64)], advance: u16) {
    font.add_glyph(name, Some(ch as u32), &rects(shapes), advance)
        .unwrap();
}

const LOWER_BODY: (f64, f64, f64, f64) = (64.0, 0.0, 320.0, 320.0);
const UPPER_BODY: (f64, f64, f64, f64) = (0.0, 0.0, 384.0, 448.0);
const LOWER_STEM: (f64, f64, f64, f64) = (64.0, 0.0, 128.0, 320.0);
const UPPER_STEM: (f64, f64, f64, f64) = (64.0, 0.0, 128.0, 448.0);

/// A small pixel font shaped like Pixellari: every plain Vietnamese letter,
/// the shaped bases ă â ê ô (and capitals), and the donor glyphs the
/// synthesizer borrows accents from. No toned letter besides the donors.
pub fn pixel_font() -> Font {
    init_logging();
    let mut font = Font::new(1024);
    add(&mut font, "comma", ',', &[(0.0, -64.0, 64.0, 128.0)], 128);
    add(&mut font, "period", '.', &[(0.0, 0.0, 64.0, 64.0)], 128);

    for (ix, ch) in PLAIN_LOWER.chars().enumerate() {
        let name = vietfont::font::codepoint_glyph_name(ch as u32);
        // A bump on the right, at a different height per letter, so each
        // letter has its own outline without changing its top or bottom.
        let bump = 64.0 * (ix % 3) as f64;
        match ch {
            'i' => add(&mut font, "i", ch, &[LOWER_STEM, (64.0, 384.0, 128.0, 448.0)], NARROW_ADVANCE),
            _ => add(
                &mut font,
                &name,
                ch,
                &[LOWER_BODY, (320.0, bump, 384.0, bump + 64.0)],
                LOWER_ADVANCE,
            ),
        }
        let upper = ch.to_uppercase().next().unwrap();
        let upper_name = vietfont::font::codepoint_glyph_name(upper as u32);
        match upper {
            'I' => add(&mut font, "I", upper, &[UPPER_STEM], NARROW_ADVANCE),
            _ => add(
                &mut font,
                &upper_name,
                upper,
                &[UPPER_BODY, (384.0, bump, 448.0, bump + 64.0)],
                UPPER_ADVANCE,
            ),
        }
    }
    add(&mut font, "dotlessi", 'ı', &[LOWER_STEM], NARROW_ADVANCE);

    for (name, ch, mark) in &[
        ("abreve", 'ă', (128.0, 384.0, 256.0, 448.0)),
        ("acircumflex", 'â', (128.0, 384.0, 256.0, 512.0)),
        ("ecircumflex", 'ê', (128.0, 384.0, 256.0, 512.0)),
        ("ocircumflex", 'ô', (128.0, 384.0, 256.0, 512.0)),
        ("agrave", 'à', (128.0, 384.0, 192.0, 448.0)),
        ("aacute", 'á', (192.0, 384.0, 256.0, 448.0)),
        ("atilde", 'ã', (64.0, 384.0, 320.0, 448.0)),
    ] {
        add(&mut font, name, *ch, &[LOWER_BODY, *mark], LOWER_ADVANCE);
    }
    for (name, ch, mark) in &[
        ("Abreve", 'Ă', (128.0, 512.0, 256.0, 576.0)),
        ("Acircumflex", 'Â', (128.0, 512.0, 256.0, 640.0)),
        ("Ecircumflex", 'Ê', (128.0, 512.0, 256.0, 640.0)),
        ("Ocircumflex", 'Ô', (128.0, 512.0, 256.0, 640.0)),
        ("Agrave", 'À', (128.0, 512.0, 192.0, 576.0)),
        ("Aacute", 'Á', (192.0, 512.0, 256.0, 576.0)),
        ("Atilde", 'Ã', (64.0, 512.0, 320.0, 576.0)),
    ] {
        add(&mut font, name, *ch, &[UPPER_BODY, *mark], UPPER_ADVANCE);
    }
    add(
        &mut font,
        "Itilde",
        'Ĩ',
        &[UPPER_STEM, (0.0, 512.0, 192.0, 576.0)],
        NARROW_ADVANCE,
    );
    font
}

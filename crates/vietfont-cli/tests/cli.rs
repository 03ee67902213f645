use kurbo::Rect;
use pretty_assertions::assert_eq;
use std::fs::File;
use std::path::PathBuf;
use std::process::Command;
use vietfont::{Font, Outline};

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("vietfont-cli-{}-{}", std::process::id(), name))
}

fn write_small_font(path: &PathBuf) {
    let mut font = Font::new(1024);
    let body = Outline::from_rect(Rect::new(64.0, 0.0, 320.0, 320.0));
    let mut agrave = body.clone();
    agrave.extend(&Outline::from_rect(Rect::new(128.0, 384.0, 192.0, 448.0)));
    font.add_glyph("a", Some('a' as u32), &body, 384).unwrap();
    font.add_glyph("agrave", Some('à' as u32), &agrave, 384)
        .unwrap();
    font.save(&mut File::create(path).unwrap()).unwrap();
}

#[test]
fn missing_input_exits_with_one() {
    let output = Command::new(env!("CARGO_BIN_EXE_ttf-add-vietnamese"))
        .args(&["--input", "no-such-font.ttf", "--output", "unused.ttf"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8_lossy(&output.stderr).trim(),
        "Input font not found: no-such-font.ttf"
    );

    let output = Command::new(env!("CARGO_BIN_EXE_ttf-check-vietnamese"))
        .args(&["--input", "no-such-font.ttf"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn unparseable_input_exits_with_three() {
    let input = scratch_path("garbage.ttf");
    std::fs::write(&input, b"not a font at all").unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_ttf-check-vietnamese"))
        .arg("--input")
        .arg(&input)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let _ = std::fs::remove_file(&input);
}

#[test]
fn check_lists_missing_glyphs() {
    let input = scratch_path("check.ttf");
    write_small_font(&input);
    let output = Command::new(env!("CARGO_BIN_EXE_ttf-check-vietnamese"))
        .arg("--input")
        .arg(&input)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "required 178");
    assert_eq!(lines[1], "missing 176");
    assert_eq!(lines[2], "U+00E1\tá\tLATIN SMALL LETTER A WITH ACUTE");
    assert_eq!(lines.len(), 178);
    let _ = std::fs::remove_file(&input);
}

#[test]
fn add_prints_summary_and_writes_font() {
    let input = scratch_path("add-in.ttf");
    let output_path = scratch_path("add-out.ttf");
    write_small_font(&input);
    let output = Command::new(env!("CARGO_BIN_EXE_ttf-add-vietnamese"))
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output_path)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], format!("Input: {}", input.display()));
    assert_eq!(lines[1], format!("Output: {}", output_path.display()));
    assert_eq!(lines[2], "Vietnamese required: 178");
    assert_eq!(lines[3], "Missing before: 176");
    assert!(lines[4].starts_with("Created now: "));
    assert!(lines[5].starts_with("Failed to build: "));
    assert!(lines[6].starts_with("Still missing after generate: "));
    assert_eq!(lines[7], "Missing codepoints:");
    assert!(lines[8].starts_with("  U+"));

    // Letters that were already present are carried over.
    let written = vietfont::font::load(File::open(&output_path).unwrap()).unwrap();
    let gid = written.glyph_for_char('à').unwrap();
    assert!(written.has_data(gid));
    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output_path);
}

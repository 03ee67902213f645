//! Composes missing Vietnamese letters in a pixel font from its own accents.
use clap::Parser;
use std::path::PathBuf;
use vietfont::{synthesize, vietnamese_charset, SynthesisOptions};
use vietfont_cli::{
    init_logging, missing_codepoint_line, open_font, save_font, EXIT_MISSING_GLYPHS, EXIT_OK,
};

/// Generate Vietnamese glyphs for a pixel font by composing existing accents
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Increase logging
    #[clap(short, long, parse(from_occurrences))]
    verbose: usize,

    /// Input TTF path
    #[clap(long, default_value = "Pixellari.ttf")]
    input: PathBuf,

    /// Output TTF path
    #[clap(long, default_value = "Pixellari-Vietnamese.ttf")]
    output: PathBuf,

    /// Overwrite Vietnamese glyphs even if they already exist
    #[clap(long)]
    force: bool,
}

fn run(args: Args) -> i32 {
    init_logging(args.verbose);
    let mut font = match open_font(&args.input) {
        Ok(font) => font,
        Err(code) => return code,
    };
    let required = vietnamese_charset();
    let report = synthesize(
        &mut font,
        &required,
        SynthesisOptions { force: args.force },
    );
    if let Err(code) = save_font(&mut font, &args.output) {
        return code;
    }

    println!("Input: {}", args.input.display());
    println!("Output: {}", args.output.display());
    println!("Vietnamese required: {}", report.required);
    println!("Missing before: {}", report.missing_before.len());
    println!("Created now: {}", report.created.len());
    println!("Failed to build: {}", report.failed.len());
    println!(
        "Still missing after generate: {}",
        report.still_missing.len()
    );
    if report.still_missing.is_empty() {
        return EXIT_OK;
    }
    println!("Missing codepoints:");
    for ch in &report.still_missing {
        println!("{}", missing_codepoint_line(*ch));
    }
    EXIT_MISSING_GLYPHS
}

fn main() {
    std::process::exit(run(Args::parse()));
}

use clap::Parser;
use std::path::PathBuf;
use vietfont::{check_coverage, vietnamese_charset};
use vietfont_cli::{init_logging, open_font, EXIT_MISSING_GLYPHS, EXIT_OK};

/// List the Vietnamese letters a font does not cover
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Increase logging
    #[clap(short, long, parse(from_occurrences))]
    verbose: usize,

    /// Input TTF path
    #[clap(long, default_value = "Pixellari.ttf")]
    input: PathBuf,

    /// Also count mapped glyphs without any outline as missing
    #[clap(long)]
    strict: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    let font = match open_font(&args.input) {
        Ok(font) => font,
        Err(code) => std::process::exit(code),
    };
    let report = check_coverage(&font, &vietnamese_charset(), args.strict);
    print!("{}", report);
    std::process::exit(if report.is_complete() {
        EXIT_OK
    } else {
        EXIT_MISSING_GLYPHS
    });
}

mod hex_reader;
mod hex_font;
mod glyph_table;
mod emitter;
mod logger;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use anyhow::Context;
use clap::Parser;
use log::{info, LevelFilter};
use crate::emitter::emit;
use crate::glyph_table::GlyphTable;
use crate::hex_font::HexFontReader;

/// Compiles a hex font into a flat 8x16 glyph table for printable ASCII.
#[derive(Parser, Debug)]
#[command(name = "fontgen", version)]
struct Args {
    /// Hex font to read (`XXXX:YYYY...` per line, sorted by codepoint)
    input: PathBuf,
    /// Binary glyph table to write
    output: PathBuf,
    /// Report every glyph decision
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
    /// Only report errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Error
        } else {
            LevelFilter::Warn
        }
    }
}

fn read_table<R: BufRead>(input: R) -> anyhow::Result<GlyphTable> {
    let mut reader = HexFontReader::new(input);
    let table = GlyphTable::from_records(reader.by_ref())?;
    info!("{} glyphs defined", table.defined());
    if reader.wide_glyphs() > 0 {
        info!("{} wide glyphs truncated to their first plane", reader.wide_glyphs());
    }
    Ok(table)
}

/// Reads the hex font at `input` and writes the glyph table to `output`.
/// The output is only created once the whole input has parsed.
fn compile(input: &Path, output: &Path) -> anyhow::Result<()> {
    let file = File::open(input)
        .with_context(|| format!("cannot open {}", input.display()))?;
    let table = read_table(BufReader::new(file))
        .with_context(|| format!("cannot compile {}", input.display()))?;
    emit(&table, output)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.log_level())?;
    compile(&args.input, &args.output)
}

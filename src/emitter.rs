use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use anyhow::Context;
use log::info;
use super::glyph_table::{GlyphTable, GLYPH_COUNT, GLYPH_HEIGHT};
use super::hex_font::{CODEPOINT_MAX, CODEPOINT_MIN};

pub const TABLE_SIZE: usize = GLYPH_COUNT * GLYPH_HEIGHT;

/// Writes every glyph back to back in codepoint order. No header, no padding:
/// glyph N lives at byte offset `N * 16`.
pub fn write_table<W: Write>(table: &GlyphTable, output: &mut W) -> io::Result<()> {
    for codepoint in CODEPOINT_MIN..=CODEPOINT_MAX {
        if let Some(glyph) = table.get(codepoint) {
            output.write_all(glyph)?;
        }
    }
    Ok(())
}

pub fn emit(table: &GlyphTable, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    let mut output = BufWriter::with_capacity(TABLE_SIZE, file);
    write_table(table, &mut output)
        .and_then(|_| output.flush())
        .with_context(|| format!("cannot write {}", path.display()))?;
    info!("table written to {}", path.display());
    Ok(())
}

use log::debug;
use super::hex_font::{GlyphRecord, CODEPOINT_MAX, CODEPOINT_MIN};

pub const GLYPH_HEIGHT: usize = 16;
pub const GLYPH_COUNT: usize = (CODEPOINT_MAX - CODEPOINT_MIN + 1) as usize;

/// One 8x16 cell, a byte per scanline, MSB is the leftmost pixel.
pub type GlyphBitmap = [u8; GLYPH_HEIGHT];

/// Dense table of every printable ASCII glyph, indexed by
/// `codepoint - CODEPOINT_MIN`. Glyphs never inserted stay blank.
pub struct GlyphTable {
    glyphs: [GlyphBitmap; GLYPH_COUNT],
    present: [bool; GLYPH_COUNT],
}

impl Default for GlyphTable {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphTable {
    pub fn new() -> GlyphTable {
        GlyphTable {
            glyphs: [[0u8; GLYPH_HEIGHT]; GLYPH_COUNT],
            present: [false; GLYPH_COUNT],
        }
    }

    /// Builds a table from a record stream, giving up on the first error.
    pub fn from_records<I>(records: I) -> anyhow::Result<GlyphTable>
        where I: IntoIterator<Item = anyhow::Result<GlyphRecord>> {
        let mut table = GlyphTable::new();
        for record in records {
            table.insert(&record?);
        }
        Ok(table)
    }

    fn index(codepoint: u32) -> Option<usize> {
        if (CODEPOINT_MIN..=CODEPOINT_MAX).contains(&codepoint) {
            Some((codepoint - CODEPOINT_MIN) as usize)
        } else {
            None
        }
    }

    /// Copies at most the first 16 bytes of the record over the glyph,
    /// byte by byte. Returns false if the codepoint is outside the table.
    pub fn insert(&mut self, record: &GlyphRecord) -> bool {
        let index = match GlyphTable::index(record.codepoint) {
            Some(index) => index,
            None => {
                debug!("U+{:04X}: outside the printable range, ignored", record.codepoint);
                return false;
            }
        };
        if self.present[index] {
            debug!("U+{:04X}: redefined, later bytes overwrite earlier ones", record.codepoint);
        }
        let glyph = &mut self.glyphs[index];
        let len = record.bytes.len().min(GLYPH_HEIGHT);
        glyph[..len].copy_from_slice(&record.bytes[..len]);
        self.present[index] = true;
        true
    }

    pub fn get(&self, codepoint: u32) -> Option<&GlyphBitmap> {
        GlyphTable::index(codepoint).map(|index| &self.glyphs[index])
    }

    /// Number of codepoints the input actually defined.
    pub fn defined(&self) -> usize {
        self.present.iter().filter(|&&p| p).count()
    }
}

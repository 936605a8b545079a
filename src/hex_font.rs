use std::io::BufRead;
use anyhow::Context;
use log::warn;
use super::hex_reader::*;
use thiserror::Error;

pub const CODEPOINT_MIN: u32 = 0x20;
pub const CODEPOINT_MAX: u32 = 0x7e;

// Two 16-byte planes.
const WIDE_GLYPH_LEN: usize = 32;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GlyphRecord {
    pub codepoint: u32,
    pub bytes: Vec<u8>,
}

impl GlyphRecord {
    pub fn byte_count(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_wide(&self) -> bool {
        self.byte_count() == WIDE_GLYPH_LEN
    }
}

#[derive(Error, Debug, Eq, PartialEq)]
pub enum HexFontError {
    #[error("line {0}: expected a four digit hex codepoint")]
    MissingCodepoint(usize),
    #[error("line {0}: expected ':' after codepoint")]
    MissingSeparator(usize),
    #[error("line {0}: glyph data has an odd number of hex digits")]
    OddPayload(usize),
    #[error("line {0}: glyph data is not a hex byte string")]
    InvalidPayload(usize),
}

/// Reads `XXXX:YYYY...` lines, one glyph per line, sorted by codepoint.
///
/// Yields only printable ASCII glyphs. Codepoints below the range are
/// skipped; the first codepoint above it ends the read without consulting
/// the rest of the input.
pub struct HexFontReader<R: BufRead> {
    input: std::io::Lines<R>,
    line_number: usize,
    wide_glyphs: usize,
    finished: bool,
}

impl<R: BufRead> HexFontReader<R> {
    pub fn new(input: R) -> HexFontReader<R> {
        HexFontReader {
            input: input.lines(),
            line_number: 0,
            wide_glyphs: 0,
            finished: false,
        }
    }

    /// Wide glyphs warned about so far.
    pub fn wide_glyphs(&self) -> usize {
        self.wide_glyphs
    }

    fn next_record(&mut self) -> anyhow::Result<Option<GlyphRecord>> {
        while let Some(line) = self.input.next() {
            self.line_number += 1;
            let line_number = self.line_number;
            let line = line.with_context(|| format!("line {}", line_number))?;
            let (codepoint, payload) = split_line(line.trim_end(), line_number)?;
            if codepoint > CODEPOINT_MAX {
                return Ok(None);
            }
            if codepoint < CODEPOINT_MIN {
                continue;
            }
            let record = GlyphRecord {
                codepoint,
                bytes: payload.hex_bytes().ok_or(HexFontError::InvalidPayload(line_number))?,
            };
            if record.is_wide() {
                self.wide_glyphs += 1;
                warn!("U+{:04X}: wide characters are not supported", codepoint);
            }
            return Ok(Some(record));
        }
        Ok(None)
    }
}

fn split_line(line: &str, line_number: usize) -> anyhow::Result<(u32, &str)> {
    let codepoint = line.get(0..4)
        .and_then(|digits| digits.hex_codepoint())
        .ok_or(HexFontError::MissingCodepoint(line_number))?;
    let payload = match line[4..].strip_prefix(':') {
        Some(payload) => payload,
        None => anyhow::bail!(HexFontError::MissingSeparator(line_number)),
    };
    if payload.is_empty() || !payload.bytes().all(|b| b.is_ascii_hexdigit()) {
        anyhow::bail!(HexFontError::InvalidPayload(line_number))
    }
    if payload.len() % 2 != 0 {
        anyhow::bail!(HexFontError::OddPayload(line_number))
    }
    Ok((codepoint, payload))
}

impl<R: BufRead> Iterator for HexFontReader<R> {
    type Item = anyhow::Result<GlyphRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                None
            },
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for HexFontReader<R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(input: &str) -> anyhow::Result<Vec<GlyphRecord>> {
        HexFontReader::new(Cursor::new(input)).collect()
    }

    fn error_of(input: &str) -> HexFontError {
        let err = read_all(input).unwrap_err();
        err.downcast::<HexFontError>().expect("expected a HexFontError")
    }

    #[test]
    fn can_read_record() -> anyhow::Result<()> {
        let records = read_all("0041:183C7EDBDBDB7E3C18000000\n")?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].codepoint, 0x41);
        assert_eq!(records[0].byte_count(), 12);
        assert_eq!(records[0].bytes[..4], [0x18, 0x3c, 0x7e, 0xdb]);
        assert!(!records[0].is_wide());
        Ok(())
    }

    #[test]
    fn accepts_lowercase_and_crlf() -> anyhow::Result<()> {
        let records = read_all("0061:ff00\r\n007e:0a\r\n")?;
        assert_eq!(records, vec![
            GlyphRecord { codepoint: 0x61, bytes: vec![0xff, 0x00] },
            GlyphRecord { codepoint: 0x7e, bytes: vec![0x0a] },
        ]);
        Ok(())
    }

    #[test]
    fn skips_control_codepoints() -> anyhow::Result<()> {
        let records = read_all("0000:00\n001F:FF\n0020:00\n")?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].codepoint, 0x20);
        Ok(())
    }

    #[test]
    fn stops_after_printable_range() -> anyhow::Result<()> {
        // Nothing after 007F is consulted, not even garbage.
        let records = read_all("0041:FF\n007F:FF\n0042:FF\nnot a glyph\n")?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].codepoint, 0x41);
        Ok(())
    }

    #[test]
    fn stays_finished() -> anyhow::Result<()> {
        let mut reader = HexFontReader::new(Cursor::new("0100:FF\n0041:FF\n"));
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
        Ok(())
    }

    #[test]
    fn wide_glyph_is_still_read() -> anyhow::Result<()> {
        let line = format!("0041:{}\n", "AB".repeat(32));
        let records = read_all(&line)?;
        assert_eq!(records[0].byte_count(), 32);
        assert!(records[0].is_wide());
        Ok(())
    }

    #[test]
    fn counts_only_printable_wide_glyphs() -> anyhow::Result<()> {
        let font = format!("0010:{}\n0020:{}\n0021:{}\n0022:{}\n007E:{}\n0080:{}\n",
            "11".repeat(32), "22".repeat(17), "33".repeat(33),
            "44".repeat(32), "55".repeat(16), "66".repeat(32));
        let mut reader = HexFontReader::new(Cursor::new(font));
        let records = reader.by_ref().collect::<anyhow::Result<Vec<_>>>()?;
        assert_eq!(records.len(), 4);
        assert_eq!(reader.wide_glyphs(), 1);
        assert!(records.iter().filter(|r| r.is_wide()).all(|r| r.codepoint == 0x22));
        Ok(())
    }

    #[test]
    fn no_wide_glyphs_in_narrow_font() -> anyhow::Result<()> {
        let mut reader = HexFontReader::new(Cursor::new("0041:FF\n0042:FFFF\n"));
        assert_eq!(reader.by_ref().count(), 2);
        assert_eq!(reader.wide_glyphs(), 0);
        Ok(())
    }

    #[test]
    fn bad_utf8_reports_line() {
        let input: &[u8] = b"0041:FF\n0042:\xff\xfe\n";
        let err = HexFontReader::new(Cursor::new(input))
            .collect::<anyhow::Result<Vec<_>>>()
            .unwrap_err();
        assert_eq!(format!("{}", err), "line 2");
        assert!(err.downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn rejects_bad_codepoint() {
        assert_eq!(error_of("XX:YY\n"), HexFontError::MissingCodepoint(1));
        assert_eq!(error_of("0041:FF\n41:FF\n"), HexFontError::MissingCodepoint(2));
        assert_eq!(error_of("\n"), HexFontError::MissingCodepoint(1));
    }

    #[test]
    fn rejects_missing_separator() {
        assert_eq!(error_of("0041FF\n"), HexFontError::MissingSeparator(1));
        assert_eq!(error_of("00041:FF\n"), HexFontError::MissingSeparator(1));
    }

    #[test]
    fn rejects_bad_payload() {
        assert_eq!(error_of("0041:\n"), HexFontError::InvalidPayload(1));
        assert_eq!(error_of("0041:YY\n"), HexFontError::InvalidPayload(1));
        assert_eq!(error_of("0041:FFF\n"), HexFontError::OddPayload(1));
    }

    #[test]
    fn pattern_is_checked_before_range() {
        assert_eq!(error_of("0080:F\n"), HexFontError::OddPayload(1));
    }

    #[test]
    fn error_ends_the_read() {
        let mut reader = HexFontReader::new(Cursor::new("0041:F\n0042:FF\n"));
        assert!(matches!(reader.next(), Some(Err(_))));
        assert!(reader.next().is_none());
    }
}

pub trait HexRead {
    fn hex_byte(&self) -> Option<u8>;
    fn hex_codepoint(&self) -> Option<u32>; // exactly four digits
    fn hex_bytes(&self) -> Option<Vec<u8>>; // packed pairs, left to right
}

fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}

impl HexRead for str {
    fn hex_byte(&self) -> Option<u8> {
        if self.len() != 2 || !is_hex(self) {
            return None;
        }
        u8::from_str_radix(self, 16).ok()
    }

    fn hex_codepoint(&self) -> Option<u32> {
        if self.len() != 4 || !is_hex(self) {
            return None;
        }
        u32::from_str_radix(self, 16).ok()
    }

    fn hex_bytes(&self) -> Option<Vec<u8>> {
        if self.len() % 2 != 0 || !is_hex(self) {
            return None;
        }
        // all ASCII, so every even index is a char boundary
        (0..self.len())
            .step_by(2)
            .map(|n| self[n..n + 2].hex_byte())
            .collect()
    }
}

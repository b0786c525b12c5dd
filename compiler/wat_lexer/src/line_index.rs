//! Byte-offset → `Position` conversion.
//!
//! `logos::Lexer::span()` yields byte offsets; the Token Source interface
//! (spec §6) hands the Grammar Engine 1-based line/column positions, so
//! this is the translation layer between the two.

use wat_ir::Position;

pub struct LineIndex {
    /// Byte offset of the start of each line; `line_starts[0] == 0`.
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (offset, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(u32::try_from(offset + 1).unwrap_or(u32::MAX));
            }
        }
        LineIndex { line_starts }
    }

    pub fn position(&self, offset: usize) -> Position {
        let offset = u32::try_from(offset).unwrap_or(u32::MAX);
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insertion) => insertion - 1,
        };
        let line_start = self.line_starts[line_index];
        Position::new(
            u32::try_from(line_index + 1).unwrap_or(u32::MAX),
            offset - line_start + 1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_starts_at_one_one() {
        let idx = LineIndex::new("abc\ndef");
        assert_eq!(idx.position(0), Position::new(1, 1));
        assert_eq!(idx.position(2), Position::new(1, 3));
    }

    #[test]
    fn second_line_resets_column() {
        let idx = LineIndex::new("abc\ndef");
        assert_eq!(idx.position(4), Position::new(2, 1));
        assert_eq!(idx.position(6), Position::new(2, 3));
    }
}

//! @ai:module:intent Map byte offsets to editor positions (UTF-16 columns) and back
//! @ai:module:layer domain
//! @ai:module:public_api LineIndex
//! @ai:module:stateless true

use lsp_types::{Position, Range};

/// @ai:intent Line-start table for one immutable text snapshot
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// @ai:intent Index every line start in the text
    /// @ai:post line_starts[0] == 0 and is strictly increasing
    /// @ai:effects pure
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { text, line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// @ai:intent Convert a byte offset to a zero-based line/UTF-16 character position
    /// @ai:edge_cases offsets past the end clamp to the end; offsets inside a char snap back
    /// @ai:effects pure
    pub fn position(&self, offset: usize) -> Position {
        let offset = self.clamp(offset);
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let start = self.line_starts[line];
        let character = self.text[start..offset].encode_utf16().count();
        Position::new(line as u32, character as u32)
    }

    /// @ai:intent Convert a position back to a byte offset within the text
    /// @ai:effects pure
    pub fn offset(&self, position: Position) -> usize {
        let line = position.line as usize;
        let Some(&start) = self.line_starts.get(line) else {
            return self.text.len();
        };
        let line_text = self.line_text(line);

        let mut units = 0u32;
        for (idx, ch) in line_text.char_indices() {
            if units >= position.character {
                return start + idx;
            }
            units += ch.len_utf16() as u32;
        }
        start + line_text.len()
    }

    pub fn range(&self, start: usize, end: usize) -> Range {
        Range::new(self.position(start), self.position(end.max(start)))
    }

    fn line_text(&self, line: usize) -> &'a str {
        let start = self.line_starts[line];
        let end = self
            .line_starts
            .get(line + 1)
            .map(|&next| next - 1)
            .unwrap_or(self.text.len());
        self.text[start..end].trim_end_matches('\r')
    }

    fn clamp(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_on_first_and_later_lines() {
        let index = LineIndex::new("abc\ndef\n");
        assert_eq!(index.position(0), Position::new(0, 0));
        assert_eq!(index.position(2), Position::new(0, 2));
        assert_eq!(index.position(4), Position::new(1, 0));
        assert_eq!(index.position(6), Position::new(1, 2));
        assert_eq!(index.line_count(), 3);
    }

    #[test]
    fn test_utf16_columns() {
        // 'é' is 2 bytes / 1 unit, '😀' is 4 bytes / 2 units
        let text = "é😀x";
        let index = LineIndex::new(text);
        assert_eq!(index.position(2), Position::new(0, 1));
        assert_eq!(index.position(6), Position::new(0, 3));
        assert_eq!(index.offset(Position::new(0, 3)), 6);
    }

    #[test]
    fn test_offset_clamps() {
        let index = LineIndex::new("ab\r\ncd");
        assert_eq!(index.position(100), Position::new(1, 2));
        assert_eq!(index.offset(Position::new(0, 50)), 2);
        assert_eq!(index.offset(Position::new(9, 0)), 6);
    }
}

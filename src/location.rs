//! Source positions: byte ranges and the byte-offset → line/column mapping.

use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Half-open byte range `start..end` into the source buffer.
///
/// `u32` keeps tokens and nodes small; files >4 GB are not realistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct TextRange {
    pub start: u32,
    pub end: u32,
}

impl TextRange {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// A zero-width range at `offset`.
    pub fn empty(offset: u32) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

impl From<TextRange> for Range<usize> {
    fn from(r: TextRange) -> Self {
        r.start as usize..r.end as usize
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Precomputed line starts so repeated offset lookups are a binary search
/// instead of a rescan of the whole file.
#[derive(Debug, Clone)]
pub struct LineIndex<'src> {
    source: &'src str,
    line_starts: Vec<usize>,
}

impl<'src> LineIndex<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            source,
            line_starts,
        }
    }

    /// Convert a byte offset into `(line, col)`, both 1-indexed.
    ///
    /// Columns count characters, not bytes.  Offsets past the end clamp to
    /// the end of the source.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let col = self
            .source
            .get(line_start..offset)
            .map_or(offset - line_start, |prefix| prefix.chars().count());
        (line + 1, col + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_col(offset: usize, source: &str) -> (usize, usize) {
        LineIndex::new(source).line_col(offset)
    }

    #[test]
    fn test_line_1_for_start() {
        assert_eq!(line_col(0, "import os\n"), (1, 1));
    }

    #[test]
    fn test_second_line() {
        let src = "import os\nimport sys\n";
        assert_eq!(line_col(10, src), (2, 1));
    }

    #[test]
    fn test_column_within_line() {
        assert_eq!(line_col(4, "x = 1\n"), (1, 5));
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(line_col(0, ""), (1, 1));
    }

    #[test]
    fn test_offset_past_end_clamps() {
        assert_eq!(line_col(99, "ab\ncd"), (2, 3));
    }

    #[test]
    fn test_one_index_serves_many_offsets() {
        let src = "a = 1\nbb = 2\n\nccc\n";
        let idx = LineIndex::new(src);
        assert_eq!(idx.line_col(src.find("bb").unwrap()), (2, 1));
        assert_eq!(idx.line_col(src.find('2').unwrap()), (2, 6));
        assert_eq!(idx.line_col(src.find("ccc").unwrap()), (4, 1));
        assert_eq!(idx.line_col(src.len()), (5, 1));
    }

    #[test]
    fn test_columns_count_characters() {
        // `é` is two bytes but one column.
        let src = "s = 'é'; x\n";
        let idx = LineIndex::new(src);
        let x = src.find('x').unwrap();
        assert_eq!(idx.line_col(x), (1, 10));
    }

    #[test]
    fn test_range_helpers() {
        let r = TextRange::new(3, 7);
        assert_eq!(r.len(), 4);
        assert!(!r.is_empty());
        assert!(TextRange::empty(5).is_empty());
        assert_eq!(Range::<usize>::from(r), 3..7);
        assert_eq!(r.to_string(), "3..7");
    }
}

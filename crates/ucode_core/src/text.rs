//! Source positions.
//!
//! All positions are byte offsets into the template or program text. Nodes
//! carry a [`TextRange`]; diagnostics carry a [`TextSpan`]. [`LineMap`]
//! converts offsets to line/column pairs for reporting.

use std::fmt;
use std::ops::Range;

/// A byte offset from the start of the source.
pub type TextPos = u32;

/// A start offset plus a length.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextSpan {
    pub start: TextPos,
    pub length: TextPos,
}

impl TextSpan {
    #[inline]
    pub fn new(start: TextPos, length: TextPos) -> Self {
        Self { start, length }
    }

    #[inline]
    pub fn from_bounds(start: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            length: end.saturating_sub(start),
        }
    }

    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self { start: pos, length: 0 }
    }

    /// Exclusive end offset.
    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.start && pos < self.end()
    }

    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }

    /// Smallest span covering both spans.
    pub fn union(&self, other: &TextSpan) -> TextSpan {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        TextSpan::from_bounds(start, end)
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

/// A half-open `[pos, end)` byte range, stored on every syntax node.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextRange {
    pub pos: TextPos,
    pub end: TextPos,
}

impl TextRange {
    #[inline]
    pub fn new(pos: TextPos, end: TextPos) -> Self {
        Self { pos, end }
    }

    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self { pos, end: pos }
    }

    #[inline]
    pub fn len(&self) -> TextPos {
        self.end - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    #[inline]
    pub fn to_span(&self) -> TextSpan {
        TextSpan::from_bounds(self.pos, self.end)
    }

    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.pos as usize..self.end as usize
    }

    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.pos && pos < self.end
    }

    /// Slice the covered text out of `source`. Returns an empty string when
    /// the range falls outside the source.
    pub fn slice<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.to_range()).unwrap_or("")
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.pos, self.end)
    }
}

impl From<TextRange> for TextSpan {
    fn from(range: TextRange) -> Self {
        range.to_span()
    }
}

impl From<TextSpan> for TextRange {
    fn from(span: TextSpan) -> Self {
        TextRange::new(span.start, span.end())
    }
}

/// Zero-based line and byte column.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LineAndColumn {
    pub line: u32,
    pub character: u32,
}

impl LineAndColumn {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl fmt::Display for LineAndColumn {
    /// One-based `line:column`, the form editors expect.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

/// Offsets of every line start, built once per source.
#[derive(Debug, Clone)]
pub struct LineMap {
    line_starts: Vec<TextPos>,
}

impl LineMap {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0u32];
        line_starts.extend(memchr::memchr_iter(b'\n', text.as_bytes()).map(|i| (i + 1) as u32));
        Self { line_starts }
    }

    /// Zero-based line containing `pos`.
    pub fn line_of(&self, pos: TextPos) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32,
            Err(line) => (line - 1) as u32,
        }
    }

    pub fn line_and_column_of(&self, pos: TextPos) -> LineAndColumn {
        let line = self.line_of(pos);
        let line_start = self.line_starts[line as usize];
        LineAndColumn {
            line,
            character: pos - line_start,
        }
    }

    pub fn line_start(&self, line: u32) -> TextPos {
        self.line_starts[line as usize]
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_span() {
        let span = TextSpan::new(5, 10);
        assert_eq!(span.end(), 15);
        assert!(span.contains(5));
        assert!(span.contains(14));
        assert!(!span.contains(15));
        assert_eq!(span.union(&TextSpan::new(20, 2)), TextSpan::from_bounds(5, 22));
    }

    #[test]
    fn test_range_slice() {
        let source = "{% if (x): %}";
        let range = TextRange::new(3, 5);
        assert_eq!(range.slice(source), "if");
        assert_eq!(TextRange::new(40, 44).slice(source), "");
        assert_eq!(TextSpan::from(range), TextSpan::new(3, 2));
    }

    #[test]
    fn test_line_map() {
        let text = "line1\nline2\nline3";
        let map = LineMap::new(text);
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.line_of(0), 0);
        assert_eq!(map.line_of(5), 0);
        assert_eq!(map.line_of(6), 1);
        assert_eq!(map.line_of(12), 2);

        let lc = map.line_and_column_of(8);
        assert_eq!(lc, LineAndColumn::new(1, 2));
        assert_eq!(lc.to_string(), "2:3");
    }
}

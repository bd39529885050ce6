use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location span.
///
/// Line and column values are 1-based so they can be shown to script
/// authors as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub line: u32,
    pub col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(line: u32, col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            line,
            col,
            end_line,
            end_col,
        }
    }

    /// Create a zero-width span at a single position.
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, line, col)
    }

    /// Merge two spans into one covering both.
    pub fn merge(self, other: Span) -> Span {
        let (line, col) = if (other.line, other.col) < (self.line, self.col) {
            (other.line, other.col)
        } else {
            (self.line, self.col)
        };
        let (end_line, end_col) = if (other.end_line, other.end_col) > (self.end_line, self.end_col)
        {
            (other.end_line, other.end_col)
        } else {
            (self.end_line, self.end_col)
        };
        Span::new(line, col, end_line, end_col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}:{}", self.line, self.col)
    }
}

/// Holds the submitted script text for error reporting.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub source: String,
    /// Cached byte offsets of line starts for fast line lookup.
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Wrap script text for lexing and error reporting.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source = source.into();
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            name: name.into(),
            source,
            line_starts,
        }
    }

    /// Extract a source line by 1-based line number.
    ///
    /// Returns `None` if the line number is out of range. Trailing `\r`
    /// is stripped so CRLF input reports clean lines.
    pub fn line(&self, line_number: u32) -> Option<&str> {
        let idx = line_number.checked_sub(1)? as usize;
        if idx >= self.line_starts.len() {
            return None;
        }
        let start = self.line_starts[idx];
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&next| next.saturating_sub(1))
            .unwrap_or(self.source.len());
        Some(self.source[start..end].trim_end_matches('\r'))
    }

    /// Total number of lines in the script.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_span_is_zero_width() {
        let s = Span::point(3, 9);
        assert_eq!(s.line, 3);
        assert_eq!(s.col, 9);
        assert_eq!(s.end_line, 3);
        assert_eq!(s.end_col, 9);
    }

    #[test]
    fn merge_spans_across_lines() {
        let a = Span::new(1, 4, 1, 9);
        let b = Span::new(2, 2, 2, 7);
        let merged = a.merge(b);
        assert_eq!(merged, Span::new(1, 4, 2, 7));
    }

    #[test]
    fn merge_spans_same_line() {
        let a = Span::new(1, 6, 1, 12);
        let b = Span::new(1, 2, 1, 8);
        assert_eq!(a.merge(b), Span::new(1, 2, 1, 12));
    }

    #[test]
    fn span_display() {
        assert_eq!(format!("{}", Span::new(4, 7, 4, 11)), "line 4:7");
    }

    #[test]
    fn source_line_extraction() {
        let src = SourceFile::new("script", "first\nsecond\nthird");
        assert_eq!(src.line(1), Some("first"));
        assert_eq!(src.line(2), Some("second"));
        assert_eq!(src.line(3), Some("third"));
        assert_eq!(src.line(0), None);
        assert_eq!(src.line(4), None);
    }

    #[test]
    fn source_line_crlf() {
        let src = SourceFile::new("script", "one\r\ntwo\r\n");
        assert_eq!(src.line(1), Some("one"));
        assert_eq!(src.line(2), Some("two"));
    }

    #[test]
    fn empty_source_is_one_line() {
        let src = SourceFile::new("script", "");
        assert_eq!(src.line_count(), 1);
        assert_eq!(src.line(1), Some(""));
    }
}

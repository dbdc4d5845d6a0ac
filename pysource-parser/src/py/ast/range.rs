//! Position and location tracking for source code locations
//!
//! This module defines the data structures for representing positions and locations in source
//! code, as well as utilities for converting byte offsets to line/column positions.
//!
//! ## Types
//!
//! - [`Position`] - A line:column position in source code
//! - [`Range`] - A source code range with start/end positions and byte span
//! - [`SourceLocation`] - Utility for converting byte offsets to positions
//!
//! ## Conventions
//!
//! Lines are 1-based and columns are 0-based character offsets, which is how Python tooling
//! reports token positions. Byte spans index into the normalized source text (see
//! [`SourceText`](crate::py::lexing::source::SourceText)).

use serde::Serialize;
use std::cell::Cell;
use std::fmt;
use std::ops::Range as ByteRange;

/// Represents a position in source code (line and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

/// Represents a location in source code (start and end positions)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    pub span: ByteRange<usize>,
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(span: ByteRange<usize>, start: Position, end: Position) -> Self {
        Self { span, start, end }
    }

    /// Check if a position is contained within this location
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Build a bounding box that contains all provided ranges.
    pub fn bounding_box<'a, I>(mut ranges: I) -> Option<Range>
    where
        I: Iterator<Item = &'a Range>,
    {
        let first = ranges.next()?.clone();
        let mut span_start = first.span.start;
        let mut span_end = first.span.end;
        let mut start_pos = first.start;
        let mut end_pos = first.end;

        for range in ranges {
            if range.start < start_pos {
                start_pos = range.start;
                span_start = range.span.start;
            }
            if range.end > end_pos {
                end_pos = range.end;
                span_end = range.span.end;
            }
        }

        Some(Range::new(span_start..span_end, start_pos, end_pos))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Provides fast conversion from byte offsets to line/column positions
///
/// Lookups are usually made in increasing order, so the last result is cached and a lookup
/// further along the same line only counts the characters in between.
pub struct SourceLocation<'a> {
    source: &'a str,
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
    /// Last lookup as (line index, byte offset, column)
    last: Cell<(usize, usize, usize)>,
}

impl<'a> SourceLocation<'a> {
    /// Create a new SourceLocation from source code
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];

        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }

        Self {
            source,
            line_starts,
            last: Cell::new((0, 0, 0)),
        }
    }

    /// Convert a byte offset to a line/column position
    pub fn byte_to_position(&self, byte_offset: usize) -> Position {
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);

        let (last_line, last_byte, last_column) = self.last.get();
        let (from, base) = if last_line == line && last_byte <= byte_offset {
            (last_byte, last_column)
        } else {
            (self.line_starts[line], 0)
        };
        let column = base
            + self
                .source
                .get(from..byte_offset)
                .map(|prefix| prefix.chars().count())
                .unwrap_or(byte_offset - from);

        self.last.set((line, byte_offset, column));
        Position::new(line + 1, column)
    }

    /// Convert a byte range to a location
    pub fn byte_range_to_range(&self, range: &ByteRange<usize>) -> Range {
        Range::new(
            range.clone(),
            self.byte_to_position(range.start),
            self.byte_to_position(range.end),
        )
    }

    /// Get the total number of lines in the source
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_comparison() {
        let pos1 = Position::new(1, 5);
        let pos2 = Position::new(1, 5);
        let pos3 = Position::new(2, 3);

        assert_eq!(pos1, pos2);
        assert_ne!(pos1, pos3);
        assert!(pos1 < pos3);
    }

    #[test]
    fn test_range_contains_multiline() {
        let range = Range::new(0..0, Position::new(1, 5), Position::new(2, 10));

        assert!(!range.contains(Position::new(1, 4)));
        assert!(range.contains(Position::new(1, 5)));
        assert!(range.contains(Position::new(2, 0)));
        assert!(range.contains(Position::new(2, 10)));
        assert!(!range.contains(Position::new(2, 11)));
    }

    #[test]
    fn test_bounding_box() {
        let a = Range::new(4..9, Position::new(1, 4), Position::new(1, 9));
        let b = Range::new(12..20, Position::new(2, 2), Position::new(2, 10));
        let boxed = Range::bounding_box([a, b].iter()).unwrap();

        assert_eq!(boxed.span, 4..20);
        assert_eq!(boxed.start, Position::new(1, 4));
        assert_eq!(boxed.end, Position::new(2, 10));
    }

    #[test]
    fn test_byte_to_position_counts_characters() {
        let source = "a = 1\nb = 'é'\nc";
        let location = SourceLocation::new(source);

        assert_eq!(location.byte_to_position(0), Position::new(1, 0));
        assert_eq!(location.byte_to_position(6), Position::new(2, 0));
        // 'é' is two bytes wide but one column
        let after_accent = source.find("'\n").unwrap();
        assert_eq!(location.byte_to_position(after_accent), Position::new(2, 6));
        assert_eq!(location.line_count(), 3);
    }

    #[test]
    fn test_lookups_in_any_order_agree() {
        let source = "x = 'é' + 'ü'\ny = 2\n";
        let location = SourceLocation::new(source);
        let forward: Vec<Position> = (0..=source.len())
            .filter(|&i| source.is_char_boundary(i))
            .map(|i| location.byte_to_position(i))
            .collect();
        let backward: Vec<Position> = (0..=source.len())
            .rev()
            .filter(|&i| source.is_char_boundary(i))
            .map(|i| location.byte_to_position(i))
            .collect();

        assert_eq!(forward, backward.into_iter().rev().collect::<Vec<_>>());
        assert_eq!(location.byte_to_position(12), Position::new(1, 11));
        assert_eq!(location.byte_to_position(16), Position::new(2, 0));
        assert_eq!(location.byte_to_position(3), Position::new(1, 3));
    }

    #[test]
    fn test_long_line_positions() {
        let line = format!("DATA = [{}]\n", vec!["7"; 50_000].join(", "));
        let location = SourceLocation::new(&line);
        let mut expected = 0;
        for (offset, _) in line.char_indices().step_by(3) {
            assert_eq!(location.byte_to_position(offset), Position::new(1, expected));
            expected += 3;
        }
    }
}

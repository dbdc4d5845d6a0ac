//! Block element
//!
//!     A block is one indentation level: the contiguous run of sibling statements that share
//!     the exact same indentation text. The root block has the empty indentation; every other
//!     block is the body of the line that opened it.
//!
//!     Comments and blank lines at the end of a block that are still indented at (or beyond)
//!     the block's level stay with it as trailing attachments.

use super::attachment::CommentAttachment;
use super::logical_line::LogicalLine;
use crate::py::ast::range::Range;
use serde::Serialize;
use std::ops::Range as ByteRange;

/// One indentation level and its statements
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub(crate) indent: String,
    pub(crate) width: usize,
    pub(crate) lines: Vec<LogicalLine>,
    pub(crate) trailing: Vec<CommentAttachment>,
}

impl Block {
    pub fn new(indent: impl Into<String>, width: usize) -> Self {
        Self {
            indent: indent.into(),
            width,
            lines: Vec::new(),
            trailing: Vec::new(),
        }
    }

    /// The module-level block
    pub fn root() -> Self {
        Self::new("", 0)
    }

    /// Indentation text shared by every line of the block
    pub fn indent(&self) -> &str {
        &self.indent
    }

    /// Column the block's statements start at, with tabs expanded
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn set_indent(&mut self, indent: impl Into<String>, width: usize) {
        self.indent = indent.into();
        self.width = width;
    }

    pub fn lines(&self) -> &[LogicalLine] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut Vec<LogicalLine> {
        &mut self.lines
    }

    pub fn trailing(&self) -> &[CommentAttachment] {
        &self.trailing
    }

    pub fn trailing_mut(&mut self) -> &mut Vec<CommentAttachment> {
        &mut self.trailing
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Byte span from the first statement to the end of the last statement's body
    pub fn span(&self) -> Option<ByteRange<usize>> {
        self.range().map(|range| range.span)
    }

    pub fn range(&self) -> Option<Range> {
        let first = self.lines.first()?;
        let mut last = self.lines.last()?;
        while let Some(inner) = last.body().and_then(|body| body.lines.last()) {
            last = inner;
        }
        let start = first.range();
        let end = last.range();
        Some(Range::new(start.span.start..end.span.end, start.start, end.end))
    }

    /// Last physical line covered by the block's statements
    pub fn last_line_number(&self) -> Option<usize> {
        self.lines.last().map(|line| *line.extent().end())
    }
}

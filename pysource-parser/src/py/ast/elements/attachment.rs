//! Comment attachments
//!
//!     Comment-only lines and blank lines are not statements, so they never become
//!     [LogicalLine](super::LogicalLine)s. Instead each one is attached to a neighbour: the
//!     statement that follows it (leading attachments), or the block it closes (trailing
//!     attachments).
//!
//!     A comment remembers its indentation as an offset relative to the indentation of the
//!     block that owns it, so re-indenting a block moves its comments along. Two cases cannot
//!     be expressed that way:
//!
//!         - A comment whose column is left of the block's indentation is recorded at the
//!           block indentation and flagged as relocated.
//!         - A comment at or right of the block's column whose whitespace is not an extension
//!           of the block's indentation text (a tab where the block uses spaces, say) keeps its
//!           whole leading whitespace and is flagged as absolute. Re-indenting the block does
//!           not move it.

use crate::py::ast::range::Position;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::ops::Range as ByteRange;

/// Lazy-compiled regex for framed section titles such as `# ==== Title ====`
static BANNER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\s?[#*=-]{4,}.*?[#*=-]{4,}$").unwrap());

/// A comment line or blank line carried by a line or block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommentAttachment {
    /// An empty (or whitespace-only) physical line
    Blank { line: usize },
    /// A comment-only physical line
    Comment {
        /// Indentation beyond the owning block's indentation, or all of it when `absolute`
        offset: String,
        /// Comment text starting at `#`, right-trimmed
        text: String,
        /// Where the comment started in the source
        position: Position,
        /// True when the comment had to be moved to the block indentation
        relocated: bool,
        /// True when `offset` is the full leading whitespace rather than an extension
        absolute: bool,
        span: ByteRange<usize>,
    },
}

impl CommentAttachment {
    pub fn blank(line: usize) -> Self {
        CommentAttachment::Blank { line }
    }

    pub fn comment(
        offset: impl Into<String>,
        text: impl Into<String>,
        position: Position,
        span: ByteRange<usize>,
    ) -> Self {
        CommentAttachment::Comment {
            offset: offset.into(),
            text: text.into(),
            position,
            relocated: false,
            absolute: false,
            span,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CommentAttachment::Blank { .. })
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, CommentAttachment::Comment { .. })
    }

    /// Comment text, or `None` for blank lines
    pub fn text(&self) -> Option<&str> {
        match self {
            CommentAttachment::Comment { text, .. } => Some(text),
            CommentAttachment::Blank { .. } => None,
        }
    }

    pub fn offset(&self) -> &str {
        match self {
            CommentAttachment::Comment { offset, .. } => offset,
            CommentAttachment::Blank { .. } => "",
        }
    }

    pub fn is_relocated(&self) -> bool {
        matches!(
            self,
            CommentAttachment::Comment {
                relocated: true,
                ..
            }
        )
    }

    pub fn is_absolute(&self) -> bool {
        matches!(
            self,
            CommentAttachment::Comment {
                absolute: true,
                ..
            }
        )
    }

    /// 1-based source line of the attachment
    pub fn line(&self) -> usize {
        match self {
            CommentAttachment::Blank { line } => *line,
            CommentAttachment::Comment { position, .. } => position.line,
        }
    }

    /// Separator comments such as `#--`, `# ====` or `# ==== Section ====`
    pub fn is_banner(&self) -> bool {
        let Some(text) = self.text() else {
            return false;
        };
        let Some(rest) = text.strip_prefix('#') else {
            return false;
        };
        repeats_one_char(rest, 1)
            || rest.strip_prefix(' ').is_some_and(|rule| repeats_one_char(rule, 2))
            || BANNER.is_match(text)
    }
}

/// At least `min` copies of the same visible character and nothing else
fn repeats_one_char(text: &str, min: usize) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if !first.is_whitespace() => {
            text.chars().count() >= min && chars.all(|ch| ch == first)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn comment(text: &str) -> CommentAttachment {
        CommentAttachment::comment("", text, Position::new(1, 0), 0..text.len())
    }

    #[rstest]
    #[case("#----------", true)]
    #[case("#==========", true)]
    #[case("# ~~~~~~~~~~", true)]
    #[case("# ==== Section ====", true)]
    #[case("#**** helpers ****", true)]
    #[case("#-", true)]
    #[case("##", true)]
    #[case("# --", true)]
    #[case("# plain remark", false)]
    #[case("#", false)]
    #[case("# -", false)]
    #[case("# -*- coding: utf-8 -*-", false)]
    #[case("#!/usr/bin/env python", false)]
    fn test_banner_detection(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(comment(text).is_banner(), expected, "{text}");
    }

    #[test]
    fn test_blank_attachment() {
        let blank = CommentAttachment::blank(4);
        assert!(blank.is_blank());
        assert_eq!(blank.text(), None);
        assert_eq!(blank.offset(), "");
        assert_eq!(blank.line(), 4);
        assert!(!blank.is_banner());
    }

    #[test]
    fn test_comment_accessors() {
        let attachment =
            CommentAttachment::comment("  ", "# note", Position::new(3, 6), 20..26);
        assert!(attachment.is_comment());
        assert_eq!(attachment.text(), Some("# note"));
        assert_eq!(attachment.offset(), "  ");
        assert_eq!(attachment.line(), 3);
        assert!(!attachment.is_relocated());
    }
}

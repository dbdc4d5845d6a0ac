//! Source normalization
//!
//!     Everything downstream of this module assumes UTF-8 text with `\n` line endings. Sources
//!     come either as a text blob or as a line supplier (each line keeping its own terminator,
//!     the way a file reader hands them out); both end up as one normalized [`SourceText`].
//!
//!     `\r\n` and lone `\r` become `\n`. Nothing else is touched here: trailing whitespace is the
//!     tokenizer's business since it must not be stripped inside string literals.

use super::common::TokenizeError;
use crate::py::ast::range::SourceLocation;
use std::borrow::Cow;

/// Normalized source text, ready for tokenization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    text: String,
}

impl SourceText {
    /// Normalize a text blob
    pub fn from_text(text: &str) -> Self {
        Self {
            text: normalize_line_endings(text).into_owned(),
        }
    }

    /// Normalize a sequence of lines, each retaining its line terminator
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for line in lines {
            text.push_str(line.as_ref());
        }
        Self::from_text(&text)
    }

    /// Decode raw bytes as UTF-8 and normalize them
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TokenizeError> {
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(Self::from_text(text)),
            Err(err) => {
                let valid_up_to = err.valid_up_to();
                // The prefix is valid by definition
                let valid = String::from_utf8_lossy(&bytes[..valid_up_to]);
                let position = SourceLocation::new(&valid).byte_to_position(valid_up_to);
                Err(TokenizeError::InvalidUtf8 { position })
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn ends_with_newline(&self) -> bool {
        self.text.ends_with('\n')
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    let mut normalized = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            normalized.push('\n');
        } else {
            normalized.push(ch);
        }
    }
    Cow::Owned(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::py::ast::range::Position;

    #[test]
    fn test_line_endings_are_normalized() {
        let source = SourceText::from_text("a = 1\r\nb = 2\rc = 3\n");
        assert_eq!(source.as_str(), "a = 1\nb = 2\nc = 3\n");
    }

    #[test]
    fn test_from_lines_keeps_terminators() {
        let source = SourceText::from_lines(["if x:\r\n", "    pass\n"]);
        assert_eq!(source.as_str(), "if x:\n    pass\n");
        assert!(source.ends_with_newline());
    }

    #[test]
    fn test_invalid_utf8_reports_position() {
        let bytes = b"a = 1\nb = '\xff'\n";
        let err = SourceText::from_bytes(bytes).unwrap_err();
        assert_eq!(
            err,
            TokenizeError::InvalidUtf8 {
                position: Position::new(2, 5)
            }
        );
    }
}

//! Token definitions
//!
//!     A token is an immutable record of its kind, its exact text, its byte span in the
//!     normalized source and its start/end positions. Tokens are the only source of truth for
//!     text reconstruction: concatenating the text of every token of a stream, in order, yields
//!     the normalized source minus the trailing whitespace the tokenizer drops.
//!
//!     Unlike Python's own tokenizer, whitespace is not implied by column offsets. Intra-line
//!     spacing is a `Whitespace` token and the leading whitespace of every logical line is an
//!     `Indentation` token, so no byte has to be guessed back on the way out.
//!
//!     `Indent` and `Dedent` are zero-width markers added by the
//!     [semantic indentation](crate::py::lexing::transformations::semantic_indentation) stage.

use crate::py::ast::range::{Position, Range};
use serde::Serialize;
use std::fmt;
use std::ops::Range as ByteRange;

/// The lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// Identifier or keyword
    Name,
    /// Numeric literal
    Number,
    /// String literal, including prefix and quotes
    String,
    /// Operator or delimiter other than brackets and the colon
    Operator,
    /// `(`, `[` or `{`
    OpenBracket,
    /// `)`, `]` or `}`
    CloseBracket,
    /// `:`, the scope-opening token when it ends a logical line
    Colon,
    /// `#` comment, without trailing whitespace
    Comment,
    /// Explicit line continuation: a backslash followed by the line break
    Continuation,
    /// Spacing inside a line, or leading whitespace of a continuation line / comment line
    Whitespace,
    /// Leading whitespace of a logical line, possibly empty
    Indentation,
    /// Zero-width marker: indentation increased
    Indent,
    /// Zero-width marker: indentation decreased by one level
    Dedent,
    /// Line break that ends a statement
    Newline,
    /// Line break that does not end a statement (blank lines, comment lines, inside brackets)
    Nl,
    /// End of input
    Endmarker,
}

impl TokenKind {
    /// Tokens that carry program text (as opposed to layout and comments)
    pub fn is_significant(&self) -> bool {
        matches!(
            self,
            TokenKind::Name
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::Operator
                | TokenKind::OpenBracket
                | TokenKind::CloseBracket
                | TokenKind::Colon
        )
    }

    /// Zero-width structural markers
    pub fn is_marker(&self) -> bool {
        matches!(
            self,
            TokenKind::Indent | TokenKind::Dedent | TokenKind::Endmarker
        )
    }

    /// Line breaks of either flavor
    pub fn is_line_break(&self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Nl)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Name => "NAME",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Operator => "OP",
            TokenKind::OpenBracket => "LBRACKET",
            TokenKind::CloseBracket => "RBRACKET",
            TokenKind::Colon => "COLON",
            TokenKind::Comment => "COMMENT",
            TokenKind::Continuation => "CONTINUATION",
            TokenKind::Whitespace => "WS",
            TokenKind::Indentation => "INDENTATION",
            TokenKind::Indent => "INDENT",
            TokenKind::Dedent => "DEDENT",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Nl => "NL",
            TokenKind::Endmarker => "ENDMARKER",
        };
        write!(f, "{}", name)
    }
}

/// Single lexical token in the parse stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    kind: TokenKind,
    text: String,
    span: ByteRange<usize>,
    start: Position,
    end: Position,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        text: impl Into<String>,
        span: ByteRange<usize>,
        start: Position,
        end: Position,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
            start,
            end,
        }
    }

    /// A zero-width marker token sitting at `at`
    pub fn marker(kind: TokenKind, offset: usize, at: Position) -> Self {
        Self::new(kind, "", offset..offset, at, at)
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn span(&self) -> ByteRange<usize> {
        self.span.clone()
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn range(&self) -> Range {
        Range::new(self.span.clone(), self.start, self.end)
    }

    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Newline
            | TokenKind::Nl
            | TokenKind::Indent
            | TokenKind::Dedent
            | TokenKind::Endmarker => write!(f, "{}", self.kind)?,
            _ => write!(f, "{}({:?})", self.kind, self.text)?,
        }
        write!(f, " at {}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_bare_and_textual_tokens() {
        let name = Token::new(
            TokenKind::Name,
            "foo",
            0..3,
            Position::new(1, 0),
            Position::new(1, 3),
        );
        assert_eq!(name.to_string(), "NAME(\"foo\") at 1:0..1:3");

        let newline = Token::new(
            TokenKind::Newline,
            "\n",
            3..4,
            Position::new(1, 3),
            Position::new(2, 0),
        );
        assert_eq!(newline.to_string(), "NEWLINE at 1:3..2:0");
    }

    #[test]
    fn test_marker_is_zero_width() {
        let dedent = Token::marker(TokenKind::Dedent, 10, Position::new(3, 0));
        assert_eq!(dedent.text(), "");
        assert_eq!(dedent.span(), 10..10);
        assert!(dedent.kind().is_marker());
        assert!(!dedent.kind().is_significant());
    }
}

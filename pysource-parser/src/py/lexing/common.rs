//! Common lexer module
//!
//! Errors shared by the source normalization and tokenization stages. Every variant carries the
//! position of the offending character; none of them is recoverable.

use crate::py::ast::range::Position;
use thiserror::Error;

/// Errors that can occur during lexing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("unterminated string literal at {position}")]
    UnterminatedString { position: Position },

    #[error("unterminated triple-quoted string literal starting at {position}")]
    UnterminatedTripleQuotedString { position: Position },

    #[error("unexpected character {found:?} at {position}")]
    UnexpectedCharacter { found: char, position: Position },

    #[error("unexpected character after line continuation character at {position}")]
    StrayContinuation { position: Position },

    #[error("closing bracket {found:?} does not match {expected:?} at {position}")]
    MismatchedBracket {
        expected: char,
        found: char,
        position: Position,
    },

    #[error("unmatched closing bracket {found:?} at {position}")]
    UnmatchedBracket { found: char, position: Position },

    #[error("invalid UTF-8 at {position}")]
    InvalidUtf8 { position: Position },
}

impl TokenizeError {
    /// Where the scanner gave up
    pub fn position(&self) -> Position {
        match self {
            TokenizeError::UnterminatedString { position }
            | TokenizeError::UnterminatedTripleQuotedString { position }
            | TokenizeError::UnexpectedCharacter { position, .. }
            | TokenizeError::StrayContinuation { position }
            | TokenizeError::MismatchedBracket { position, .. }
            | TokenizeError::UnmatchedBracket { position, .. }
            | TokenizeError::InvalidUtf8 { position } => *position,
        }
    }
}

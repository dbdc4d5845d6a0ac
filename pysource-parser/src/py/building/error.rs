//! Structural errors
//!
//!     Raised when the token stream cannot be arranged into blocks (while parsing), or when a
//!     tree no longer describes valid source (while unparsing a mutated tree). Parse-time
//!     variants carry a source position; unparse-time variants carry the [NodePath] of the
//!     offending node.

use crate::py::ast::range::Position;
use crate::py::ast::traversal::NodePath;
use crate::py::token::TokenKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("unindent does not match any outer indentation level at {position}")]
    InconsistentDedent { position: Position },

    #[error("inconsistent use of tabs and spaces in indentation at {position}")]
    InconsistentIndentation { position: Position },

    #[error("unexpected indent at {position}")]
    UnexpectedIndent { position: Position },

    #[error("expected an indented block after line {line}, found {position}")]
    ExpectedIndentedBlock { line: usize, position: Position },

    #[error("'{open}' was never closed at {position}")]
    UnclosedBracket { open: char, position: Position },

    #[error("missing newline at end of input at {position}")]
    MissingFinalNewline { position: Position },

    #[error("unexpected {found} token at {position}")]
    UnexpectedToken { found: TokenKind, position: Position },

    #[error("block at {path} has no statements")]
    EmptyBlock { path: NodePath },

    #[error("line at {path} opens a block but has no body")]
    MissingBody { path: NodePath },

    #[error("line at {path} has a body but does not end with ':'")]
    UnexpectedBody { path: NodePath },

    #[error("line at {path} is malformed: {reason}")]
    MalformedLine { path: NodePath, reason: &'static str },

    #[error("block at {path} is not indented deeper than its parent")]
    IndentationNotDeeper { path: NodePath },
}

impl StructuralError {
    /// Source position for parse-time errors
    pub fn position(&self) -> Option<Position> {
        match self {
            StructuralError::InconsistentDedent { position }
            | StructuralError::InconsistentIndentation { position }
            | StructuralError::UnexpectedIndent { position }
            | StructuralError::ExpectedIndentedBlock { position, .. }
            | StructuralError::UnclosedBracket { position, .. }
            | StructuralError::MissingFinalNewline { position }
            | StructuralError::UnexpectedToken { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Tree location for unparse-time errors
    pub fn path(&self) -> Option<&NodePath> {
        match self {
            StructuralError::EmptyBlock { path }
            | StructuralError::MissingBody { path }
            | StructuralError::UnexpectedBody { path }
            | StructuralError::MalformedLine { path, .. }
            | StructuralError::IndentationNotDeeper { path } => Some(path),
            _ => None,
        }
    }
}

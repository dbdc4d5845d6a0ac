//! Parsing entry points
//!
//!     The complete pipeline from source to [Code]:
//!         1. Normalization: line endings and UTF-8. See [source](crate::py::lexing::source).
//!         2. Lexing: raw tokens plus indentation markers. See [lexing](crate::py::lexing).
//!         3. Building: the block tree. See [building](crate::py::building).
//!
//!     The stages are chained lazily, so a parse is a single pass over the input. Every
//!     function here is all-or-nothing: it returns a complete tree or the first error found.
//!
//!     Every input entry point produces the same tree for the same text: a blob, a sequence of
//!     lines, raw bytes or a file path.

use crate::py::ast::Code;
use crate::py::building::{build, StructuralError};
use crate::py::lexing::{lex, SourceText, TokenizeError};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors returned by the parsing entry points
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error("invalid input: expected {expected}, found {found}")]
    InvalidInput {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Knobs for a parse. Passed explicitly; there is no global configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Column multiple that tabs advance to when measuring indentation
    pub tab_size: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { tab_size: 8 }
    }
}

impl ParseOptions {
    pub fn with_tab_size(tab_size: usize) -> Self {
        Self { tab_size }
    }
}

/// Parse a normalized source
pub fn parse_source(source: &SourceText, options: &ParseOptions) -> Result<Code, ParseError> {
    debug!(bytes = source.len(), tab_size = options.tab_size, "parsing source");
    build(lex(source, options), options.tab_size)
}

/// Parse a text blob with default options
pub fn parse_text(text: &str) -> Result<Code, ParseError> {
    parse_text_with(text, &ParseOptions::default())
}

pub fn parse_text_with(text: &str, options: &ParseOptions) -> Result<Code, ParseError> {
    parse_source(&SourceText::from_text(text), options)
}

/// Parse a sequence of lines, each keeping its own line terminator
pub fn parse_lines<I, S>(lines: I) -> Result<Code, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse_lines_with(lines, &ParseOptions::default())
}

pub fn parse_lines_with<I, S>(lines: I, options: &ParseOptions) -> Result<Code, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse_source(&SourceText::from_lines(lines), options)
}

/// Parse raw bytes, which must be UTF-8
pub fn parse_bytes(bytes: &[u8]) -> Result<Code, ParseError> {
    parse_bytes_with(bytes, &ParseOptions::default())
}

pub fn parse_bytes_with(bytes: &[u8], options: &ParseOptions) -> Result<Code, ParseError> {
    let source = SourceText::from_bytes(bytes)?;
    parse_source(&source, options)
}

/// Read and parse a file. I/O failures come back untouched as [`ParseError::Io`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Code, ParseError> {
    parse_file_with(path, &ParseOptions::default())
}

pub fn parse_file_with(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Code, ParseError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading source file");
    let bytes = std::fs::read(path)?;
    parse_bytes_with(&bytes, options)
}

/// Parse a dynamically typed value, which must be a string
pub fn parse_value(value: &serde_json::Value) -> Result<Code, ParseError> {
    parse_value_with(value, &ParseOptions::default())
}

pub fn parse_value_with(
    value: &serde_json::Value,
    options: &ParseOptions,
) -> Result<Code, ParseError> {
    use serde_json::Value;

    let found = match value {
        Value::String(text) => return parse_text_with(text, options),
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    Err(ParseError::InvalidInput {
        expected: "string",
        found,
    })
}

//! Source loading utilities
//!
//! This module provides `SourceLoader` - a utility for loading source text from files, strings
//! or bytes and running the pipeline stages on it. It is used by the CLI and by tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use pysource_parser::py::loader::SourceLoader;
//!
//! // From file
//! let code = SourceLoader::from_path("setup.py")?.parse()?;
//!
//! // From string, stopping after lexing
//! let tokens = SourceLoader::from_string("if x:\n    y\n").tokenize()?;
//! ```

use crate::py::ast::Code;
use crate::py::lexing::{lex, tokenize, SourceText};
use crate::py::parsing::{parse_source, ParseError, ParseOptions};
use crate::py::token::Token;
use std::path::Path;

/// Source loader with pipeline shortcuts
#[derive(Debug, Clone)]
pub struct SourceLoader {
    source: SourceText,
    options: ParseOptions,
}

impl SourceLoader {
    /// Load from a file path. The file must be UTF-8.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn from_string<S: AsRef<str>>(source: S) -> Self {
        Self {
            source: SourceText::from_text(source.as_ref()),
            options: ParseOptions::default(),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        Ok(Self {
            source: SourceText::from_bytes(bytes)?,
            options: ParseOptions::default(),
        })
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse the source into a tree
    pub fn parse(&self) -> Result<Code, ParseError> {
        parse_source(&self.source, &self.options)
    }

    /// Tokens with indentation markers
    pub fn tokenize(&self) -> Result<Vec<Token>, ParseError> {
        lex(&self.source, &self.options).collect()
    }

    /// Tokens from core tokenization only, without `Indent` / `Dedent`
    pub fn base_tokens(&self) -> Result<Vec<Token>, ParseError> {
        Ok(tokenize(&self.source).collect::<Result<Vec<_>, _>>()?)
    }

    /// The normalized source text
    pub fn source(&self) -> &str {
        self.source.as_str()
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }
}

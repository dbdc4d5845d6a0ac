//! Lexer
//!
//!     This module orchestrates the tokenization pipeline. Every stage is an iterator adapter
//!     over the previous one, so tokens are produced on demand and nothing is buffered beyond
//!     a line's worth of lookahead.
//!
//! The Lexing Pipeline
//!
//!     1. Source normalization. See [source](source). Line endings become `\n` and byte input
//!        is validated as UTF-8.
//!
//!     2. Core tokenization using a logos lexer. See [base_tokenization](base_tokenization).
//!        Every byte of the normalized source ends up in exactly one token, except trailing
//!        whitespace which is dropped. Each logical line starts with an `Indentation` token.
//!
//!     3. Semantic indentation. See
//!        [semantic_indentation](transformations::semantic_indentation). `Indentation` tokens
//!        are compared against the open levels and zero-width `Indent` / `Dedent` markers are
//!        inserted.
//!
//!     At this point lexing is complete and the stream is ready for the
//!     [builder](crate::py::building).
//!
//! Source Token Preservation
//!
//!     Tokens carry their exact text and byte span. No stage rewrites either: the markers added
//!     by later stages are zero-width, so detokenizing any stage's output reproduces the
//!     normalized source, minus the dropped trailing whitespace.

pub mod base_tokenization;
pub mod common;
pub mod source;
pub mod transformations;

pub use base_tokenization::{tokenize, Tokenizer};
pub use common::TokenizeError;
pub use source::SourceText;
pub use transformations::SemanticIndentationMapper;

use crate::py::parsing::{ParseError, ParseOptions};
use crate::py::token::Token;

/// Run the full lexing pipeline over a normalized source
pub fn lex<'a>(
    source: &'a SourceText,
    options: &ParseOptions,
) -> SemanticIndentationMapper<Tokenizer<'a>> {
    SemanticIndentationMapper::new(tokenize(source), options.tab_size)
}

/// Tokenize a string without indentation markers, collecting the whole stream
pub fn tokenize_str(source: &str) -> Result<Vec<Token>, TokenizeError> {
    let source = SourceText::from_text(source);
    tokenize(&source).collect()
}

/// Lex a string with indentation markers, collecting the whole stream
pub fn lex_str(source: &str, tab_size: usize) -> Result<Vec<Token>, ParseError> {
    let source = SourceText::from_text(source);
    let options = ParseOptions { tab_size };
    lex(&source, &options).collect()
}

//! Core token types and helpers shared across the lexer, builder, and tooling.

pub mod core;
pub mod formatting;

pub use self::core::{Token, TokenKind};
pub use formatting::detokenize;

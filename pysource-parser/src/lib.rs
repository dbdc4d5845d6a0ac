//! # pysource
//!
//! A round-trip preserving parser for Python source.
//!
//! Unlike an AST parser, the output of this crate keeps every byte it needs to regenerate the
//! original text. The contract is
//!
//!     parse_text(text)?.unparse()? == text
//!
//! for any newline-terminated input, the only sanctioned deviations being comments that sit to
//! the left of their block (they are moved to the block's indentation) and trailing whitespace
//! at the end of lines (it is dropped).
//!
//! File Layout
//!
//!     src/py
//!       ├── lexing       Source normalization, tokenizer and the indentation stage
//!       ├── token        Token types shared by every stage
//!       ├── building     Token stream -> Code tree
//!       ├── ast          The document model (Code, Block, LogicalLine, attachments)
//!       ├── formats      Unparser, treeviz and json output
//!       ├── outline      Statement classification and top-level fragments
//!       └── parsing      Public entry points
//!
//! For testing helpers and shared sample sources, see the [testing module](py::testing).

pub mod py;

pub use py::ast::{Block, Code, CommentAttachment, LogicalLine};
pub use py::parsing::{parse_file, parse_text, ParseError, ParseOptions};

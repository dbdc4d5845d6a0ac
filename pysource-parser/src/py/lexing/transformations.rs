//! Token stream transformations
//!
//!     Stages that run over the raw token stream after core tokenization. Each one is an
//!     iterator adapter, so the whole lexing pipeline stays lazy.

pub mod semantic_indentation;

pub use semantic_indentation::{indentation_width, SemanticIndentationMapper};

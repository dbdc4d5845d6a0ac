//! Output formats
//!
//!     - [unparser](unparser): back to source text, the round-trip half of the parser.
//!     - [treeviz](treeviz): one line per node tree rendering for inspection.
//!     - [json](json): serde serialization of the tree or of a token stream.
//!
//!     Token-level detokenizing lives with the tokens, see
//!     [formatting](crate::py::token::formatting).

pub mod json;
pub mod treeviz;
pub mod unparser;

pub use json::{to_json_string, tokens_to_json_string};
pub use treeviz::{to_treeviz_str, to_treeviz_str_with, TreevizOptions};
pub use unparser::unparse;

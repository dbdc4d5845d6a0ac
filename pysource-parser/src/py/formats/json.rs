//! JSON output
//!
//! Serializes the tree or a token stream with `serde_json`. The model types derive
//! `Serialize`, so the output mirrors their field names; tokens include their kind, text,
//! byte span and positions.

use crate::py::ast::elements::Code;
use crate::py::token::Token;

pub fn to_json_string(code: &Code) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(code)
}

pub fn tokens_to_json_string(tokens: &[Token]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(tokens)
}

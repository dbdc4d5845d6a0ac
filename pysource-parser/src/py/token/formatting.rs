//! Detokenizer
//!
//! Converts a stream of tokens back into a string. Unlike the
//! [unparser](crate::py::formats::unparser), which walks the `Code` tree and derives
//! indentation from block depth, the detokenizer works on flat token streams. It is used for
//! round-trip testing of the tokenizer on its own and for debugging token-level transformations.
//!
//! Since every byte of the normalized source belongs to exactly one token, detokenizing is a
//! plain concatenation; the zero-width `Indent` / `Dedent` / `Endmarker` markers contribute
//! nothing.

use super::core::Token;

/// Detokenize a stream of tokens into a string
pub fn detokenize(tokens: &[Token]) -> String {
    let mut result = String::new();
    for token in tokens {
        result.push_str(token.text());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::py::lexing::{lex_str, tokenize_str};

    #[test]
    fn test_detokenize_raw_stream() {
        let source = "def f(a, b):\n    return a + b  # sum\n";
        let tokens = tokenize_str(source).unwrap();
        assert_eq!(detokenize(&tokens), source);
    }

    #[test]
    fn test_detokenize_semantic_stream() {
        let source = "if x:\n    if y:\n        pass\nz = 1\n";
        let tokens = lex_str(source, 8).unwrap();
        assert_eq!(detokenize(&tokens), source);
    }

    #[test]
    fn test_detokenize_drops_trailing_whitespace() {
        let tokens = tokenize_str("a = 1   \n\t\nb = 2\n").unwrap();
        assert_eq!(detokenize(&tokens), "a = 1\n\nb = 2\n");
    }
}

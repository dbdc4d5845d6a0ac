//! Unparser
//!
//!     Writes a [Code] tree back to source text. Unlike the
//!     [detokenizer](crate::py::token::formatting), which concatenates a flat token stream, the
//!     unparser derives every line's indentation from the block it belongs to. A block whose
//!     indentation was changed through the mutation accessors therefore comes out re-indented,
//!     comments included.
//!
//!     Per logical line it emits, in order: the leading attachments, the block indentation
//!     followed by every token except `Indentation`, then the body. A block's trailing
//!     attachments follow its last line.
//!
//!     Before anything is written for a node, the node is checked. A tree that no longer
//!     describes valid source fails with a [StructuralError] naming the offending node's path.

use crate::py::ast::elements::{Block, Code, CommentAttachment, LogicalLine};
use crate::py::ast::traversal::NodePath;
use crate::py::building::error::StructuralError;
use crate::py::token::TokenKind;

/// Reconstruct source text from a tree
pub fn unparse(code: &Code) -> Result<String, StructuralError> {
    let mut out = String::new();
    write_block(code.root(), &NodePath::root(), None, &mut out)?;
    Ok(out)
}

fn write_block(
    block: &Block,
    path: &NodePath,
    parent_indent: Option<&str>,
    out: &mut String,
) -> Result<(), StructuralError> {
    if let Some(parent) = parent_indent {
        if block.is_empty() {
            return Err(StructuralError::EmptyBlock { path: path.clone() });
        }
        let indent = block.indent();
        if indent.len() <= parent.len() || !indent.starts_with(parent) {
            return Err(StructuralError::IndentationNotDeeper { path: path.clone() });
        }
    }

    for (idx, line) in block.lines().iter().enumerate() {
        write_line(line, block.indent(), &path.child(idx), out)?;
    }
    write_attachments(block.trailing(), block.indent(), out);
    Ok(())
}

fn write_line(
    line: &LogicalLine,
    indent: &str,
    path: &NodePath,
    out: &mut String,
) -> Result<(), StructuralError> {
    check_line(line, path)?;

    write_attachments(line.leading(), indent, out);
    out.push_str(indent);
    for token in line.tokens() {
        if token.kind() != TokenKind::Indentation {
            out.push_str(token.text());
        }
    }
    if let Some(body) = line.body() {
        write_block(body, path, Some(indent), out)?;
    }
    Ok(())
}

fn check_line(line: &LogicalLine, path: &NodePath) -> Result<(), StructuralError> {
    let malformed = |reason| StructuralError::MalformedLine {
        path: path.clone(),
        reason,
    };
    match line.tokens().last() {
        None => return Err(malformed("it has no tokens")),
        Some(last) if last.kind() != TokenKind::Newline => {
            return Err(malformed("it does not end with a line break"))
        }
        _ => {}
    }
    match (line.opens_block(), line.body().is_some()) {
        (true, false) => Err(StructuralError::MissingBody { path: path.clone() }),
        (false, true) => Err(StructuralError::UnexpectedBody { path: path.clone() }),
        _ => Ok(()),
    }
}

fn write_attachments(attachments: &[CommentAttachment], indent: &str, out: &mut String) {
    for attachment in attachments {
        match attachment {
            CommentAttachment::Blank { .. } => out.push('\n'),
            CommentAttachment::Comment {
                offset,
                text,
                absolute,
                ..
            } => {
                if !absolute {
                    out.push_str(indent);
                }
                out.push_str(offset);
                out.push_str(text);
                out.push('\n');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::py::parsing::parse_text;

    const SOURCE: &str = "\
# module comment

import os


class Config(object):
    \"\"\"Settings.\"\"\"

    # defaults
    name = 'x'  # inline

    def load(self, path):
        with open(path) as fh:
            return fh.read()
        # end of load

# trailing
";

    #[test]
    fn test_round_trip() {
        let code = parse_text(SOURCE).unwrap();
        assert_eq!(unparse(&code).unwrap(), SOURCE);
    }

    #[test]
    fn test_reindenting_a_block_moves_its_comments() {
        let mut code = parse_text("if x:\n    # why\n    y = 1\n").unwrap();
        code.lines_mut()[0].body_mut().unwrap().set_indent("  ", 2);
        assert_eq!(unparse(&code).unwrap(), "if x:\n  # why\n  y = 1\n");
    }

    #[test]
    fn test_comment_with_foreign_whitespace_is_not_reindented() {
        let mut code = parse_text("if x:\n    y = 1\n\t# tabbed\n    z = 2\n").unwrap();
        code.lines_mut()[0].body_mut().unwrap().set_indent("  ", 2);
        assert_eq!(
            unparse(&code).unwrap(),
            "if x:\n  y = 1\n\t# tabbed\n  z = 2\n"
        );
    }

    #[test]
    fn test_missing_body() {
        let mut code = parse_text("a = 1\nif a:\n    b\n").unwrap();
        code.lines_mut()[1].take_body();
        assert_eq!(
            unparse(&code).unwrap_err(),
            StructuralError::MissingBody {
                path: NodePath::from(vec![1])
            }
        );
    }

    #[test]
    fn test_unexpected_body() {
        let mut code = parse_text("if a:\n    b\nc = 2\n").unwrap();
        let body = code.lines_mut()[0].take_body();
        code.lines_mut()[1].set_body(body);
        assert_eq!(
            unparse(&code).unwrap_err(),
            StructuralError::MissingBody {
                path: NodePath::from(vec![0])
            }
        );
        let body = code.lines_mut()[1].take_body();
        code.lines_mut()[0].set_body(body.clone());
        code.lines_mut()[1].set_body(body);
        assert_eq!(
            unparse(&code).unwrap_err(),
            StructuralError::UnexpectedBody {
                path: NodePath::from(vec![1])
            }
        );
    }

    #[test]
    fn test_empty_block() {
        let mut code = parse_text("while True:\n    if x:\n        break\n").unwrap();
        code.lines_mut()[0].body_mut().unwrap().lines_mut()[0]
            .body_mut()
            .unwrap()
            .lines_mut()
            .clear();
        assert_eq!(
            unparse(&code).unwrap_err(),
            StructuralError::EmptyBlock {
                path: NodePath::from(vec![0, 0])
            }
        );
    }

    #[test]
    fn test_indentation_not_deeper() {
        let mut code = parse_text("def f():\n    pass\n").unwrap();
        code.lines_mut()[0].body_mut().unwrap().set_indent("", 0);
        assert_eq!(
            unparse(&code).unwrap_err(),
            StructuralError::IndentationNotDeeper {
                path: NodePath::from(vec![0])
            }
        );
    }

    #[test]
    fn test_malformed_line() {
        let mut code = parse_text("x = 1\n").unwrap();
        code.lines_mut()[0].tokens_mut().pop();
        assert!(matches!(
            unparse(&code).unwrap_err(),
            StructuralError::MalformedLine { path, .. } if path == NodePath::from(vec![0])
        ));
    }
}

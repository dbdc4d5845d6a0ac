//! Logical line element
//!
//!     A logical line is one statement: every token from its `Indentation` to the `Newline`
//!     that ends it. Explicit continuations and line breaks inside brackets make it span
//!     several physical lines, and inline comments stay in its token list.
//!
//!     A line that ends with the scope-opening `:` owns the block indented below it as its
//!     body.

use super::attachment::CommentAttachment;
use super::block::Block;
use crate::py::ast::range::{Position, Range};
use crate::py::token::{Token, TokenKind};
use serde::Serialize;
use std::ops::Range as ByteRange;

/// A statement, with its comment attachments and optional body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalLine {
    pub(crate) leading: Vec<CommentAttachment>,
    pub(crate) tokens: Vec<Token>,
    pub(crate) body: Option<Block>,
}

impl LogicalLine {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            leading: Vec::new(),
            tokens,
            body: None,
        }
    }

    pub fn with_leading(mut self, leading: Vec<CommentAttachment>) -> Self {
        self.leading = leading;
        self
    }

    pub fn with_body(mut self, body: Block) -> Self {
        self.body = Some(body);
        self
    }

    /// Every token of the statement, from `Indentation` through `Newline`
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Tokens carrying program text, skipping layout and comments
    pub fn code_tokens(&self) -> impl Iterator<Item = &Token> + '_ {
        self.tokens.iter().filter(|t| t.kind().is_significant())
    }

    /// The first significant token, which for most statements is their keyword
    pub fn first_code_token(&self) -> Option<&Token> {
        self.code_tokens().next()
    }

    /// Statement text without its indentation and final line break
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .filter(|t| !matches!(t.kind(), TokenKind::Indentation | TokenKind::Newline))
            .map(Token::text)
            .collect()
    }

    /// Leading whitespace as it appeared in the source
    pub fn indentation(&self) -> &str {
        match self.tokens.first() {
            Some(token) if token.kind() == TokenKind::Indentation => token.text(),
            _ => "",
        }
    }

    /// True when the last significant token is the scope-opening `:`
    pub fn opens_block(&self) -> bool {
        self.code_tokens()
            .last()
            .is_some_and(|t| t.kind() == TokenKind::Colon)
    }

    /// The comment at the end of the statement's last physical line, if any
    pub fn inline_comment(&self) -> Option<&Token> {
        self.tokens
            .iter()
            .rev()
            .skip_while(|t| t.kind().is_line_break())
            .take_while(|t| matches!(t.kind(), TokenKind::Comment | TokenKind::Whitespace))
            .find(|t| t.kind() == TokenKind::Comment)
    }

    pub fn body(&self) -> Option<&Block> {
        self.body.as_ref()
    }

    pub fn body_mut(&mut self) -> Option<&mut Block> {
        self.body.as_mut()
    }

    pub fn set_body(&mut self, body: Option<Block>) {
        self.body = body;
    }

    pub fn take_body(&mut self) -> Option<Block> {
        self.body.take()
    }

    pub fn leading(&self) -> &[CommentAttachment] {
        &self.leading
    }

    pub fn leading_mut(&mut self) -> &mut Vec<CommentAttachment> {
        &mut self.leading
    }

    pub fn tokens_mut(&mut self) -> &mut Vec<Token> {
        &mut self.tokens
    }

    /// Byte span of the statement itself, excluding attachments and body
    pub fn span(&self) -> ByteRange<usize> {
        match (self.tokens.first(), self.tokens.last()) {
            (Some(first), Some(last)) => first.span().start..last.span().end,
            _ => 0..0,
        }
    }

    pub fn start(&self) -> Position {
        self.tokens.first().map(Token::start).unwrap_or_default()
    }

    pub fn end(&self) -> Position {
        self.tokens.last().map(Token::end).unwrap_or_default()
    }

    pub fn range(&self) -> Range {
        Range::new(self.span(), self.start(), self.end())
    }

    /// Physical lines covered by the statement, 1-based and inclusive
    pub fn line_numbers(&self) -> std::ops::RangeInclusive<usize> {
        let first = self.start().line;
        let last = self
            .tokens
            .iter()
            .rev()
            .find(|t| !t.kind().is_marker())
            .map(|t| {
                if t.kind().is_line_break() {
                    t.start().line
                } else {
                    t.end().line
                }
            })
            .unwrap_or(first);
        first..=last
    }

    /// Physical lines covered by the statement and its body
    pub fn extent(&self) -> std::ops::RangeInclusive<usize> {
        let lines = self.line_numbers();
        let last = self
            .body
            .as_ref()
            .and_then(Block::last_line_number)
            .map_or(*lines.end(), |body_end| body_end.max(*lines.end()));
        *lines.start()..=last
    }
}

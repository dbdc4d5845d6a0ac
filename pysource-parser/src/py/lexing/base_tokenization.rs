//! Core tokenization
//!
//!     Tokenization happens in two layers. A vanilla `logos` lexer ([`RawToken`]) recognizes the
//!     lexical shapes of the language: names, numbers, string literals, operators, brackets,
//!     comments, whitespace, line breaks and explicit continuations. It knows nothing about
//!     lines or nesting.
//!
//!     The [`Tokenizer`] adapter wraps it and adds the line-level knowledge:
//!
//!         - The leading whitespace of a code line at bracket depth 0 becomes an `Indentation`
//!           token, emitted even when empty, so every logical line starts with one.
//!         - A line break ends a statement (`Newline`) only at depth 0 on a line that carries
//!           code. Blank lines, comment-only lines and breaks inside brackets produce `Nl`.
//!         - Whitespace right before a line break (or the end of input) is dropped, and so is
//!           trailing whitespace inside comments. Whitespace inside string literals is part of
//!           the literal and stays.
//!         - Bracket nesting is tracked so mismatched closers fail early.
//!
//!     The adapter is lazy and single-pass: it pulls raw tokens on demand and cannot be
//!     restarted. Collect it if the tokens are needed more than once.

use super::common::TokenizeError;
use super::source::SourceText;
use crate::py::ast::range::{Position, SourceLocation};
use crate::py::token::{Token, TokenKind};
use logos::{Lexer, Logos};
use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::ops::Range as ByteRange;

/// Lexical shapes recognized by the logos scanner
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawToken {
    #[regex(r"[ \t\x0c]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    #[token("\\\n")]
    Continuation,

    #[regex(r"#[^\n]*")]
    Comment,

    #[regex(r"[\p{L}\p{Nl}_][\p{L}\p{Nl}\p{Mn}\p{Mc}\p{Nd}\p{Pc}]*")]
    Name,

    #[regex(r"[0-9](_?[0-9])*(\.([0-9](_?[0-9])*)?)?([eE][+-]?[0-9](_?[0-9])*)?[jJ]?")]
    #[regex(r"\.[0-9](_?[0-9])*([eE][+-]?[0-9](_?[0-9])*)?[jJ]?")]
    #[regex(r"0[xX](_?[0-9a-fA-F])+")]
    #[regex(r"0[oO](_?[0-7])+")]
    #[regex(r"0[bB](_?[01])+")]
    Number,

    #[regex(r#"([rRbBuUfF]|[rR][bBfF]|[bBfF][rR])?"([^"\\\n]|\\[^\n]|\\\n)*""#)]
    #[regex(r#"([rRbBuUfF]|[rR][bBfF]|[bBfF][rR])?'([^'\\\n]|\\[^\n]|\\\n)*'"#)]
    #[regex(r#"([rRbBuUfF]|[rR][bBfF]|[bBfF][rR])?""""#, triple_quoted)]
    #[regex(r#"([rRbBuUfF]|[rR][bBfF]|[bBfF][rR])?'''"#, triple_quoted)]
    String,

    #[token("(")]
    #[token("[")]
    #[token("{")]
    Open,

    #[token(")")]
    #[token("]")]
    #[token("}")]
    Close,

    #[token(":")]
    Colon,

    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("%")]
    #[token("@")]
    #[token("&")]
    #[token("|")]
    #[token("^")]
    #[token("~")]
    #[token("<")]
    #[token(">")]
    #[token("=")]
    #[token(".")]
    #[token(",")]
    #[token(";")]
    #[token("**")]
    #[token("//")]
    #[token("<<")]
    #[token(">>")]
    #[token("<=")]
    #[token(">=")]
    #[token("==")]
    #[token("!=")]
    #[token("->")]
    #[token(":=")]
    #[token("...")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("@=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token("**=")]
    #[token("//=")]
    #[token("<<=")]
    #[token(">>=")]
    Operator,
}

/// Consume the body of a triple-quoted literal up to and including its closing delimiter.
///
/// Returns false when the input ends first, which logos reports as an error at the opener.
fn triple_quoted(lex: &mut Lexer<RawToken>) -> bool {
    let slice = lex.slice();
    let delimiter = &slice[slice.len() - 3..];
    let rest = lex.remainder();
    let mut chars = rest.char_indices();
    while let Some((idx, ch)) = chars.next() {
        if ch == '\\' {
            chars.next();
            continue;
        }
        if rest[idx..].starts_with(delimiter) {
            lex.bump(idx + delimiter.len());
            return true;
        }
    }
    false
}

type RawItem = (Result<RawToken, ()>, ByteRange<usize>);

/// Lazy token stream over a normalized source
pub struct Tokenizer<'a> {
    source: &'a str,
    lexer: Lexer<'a, RawToken>,
    location: SourceLocation<'a>,
    peeked: Option<Option<RawItem>>,
    queue: VecDeque<Token>,
    brackets: Vec<(char, Position)>,
    pending_indent: Option<ByteRange<usize>>,
    line_has_code: bool,
    done: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a SourceText) -> Self {
        let text = source.as_str();
        Self {
            source: text,
            lexer: RawToken::lexer(text),
            location: SourceLocation::new(text),
            peeked: None,
            queue: VecDeque::new(),
            brackets: Vec::new(),
            pending_indent: None,
            line_has_code: false,
            done: false,
        }
    }

    fn next_raw(&mut self) -> Option<RawItem> {
        if let Some(peeked) = self.peeked.take() {
            return peeked;
        }
        self.lexer.next().map(|raw| (raw, self.lexer.span()))
    }

    fn peek_raw(&mut self) -> Option<Result<RawToken, ()>> {
        if self.peeked.is_none() {
            let next = self.lexer.next().map(|raw| (raw, self.lexer.span()));
            self.peeked = Some(next);
        }
        self.peeked
            .as_ref()
            .and_then(|peeked| peeked.as_ref())
            .map(|(raw, _)| *raw)
    }

    fn push(&mut self, kind: TokenKind, span: ByteRange<usize>) {
        let text = &self.source[span.clone()];
        let start = self.location.byte_to_position(span.start);
        let end = self.location.byte_to_position(span.end);
        self.queue.push_back(Token::new(kind, text, span, start, end));
    }

    /// Emit the `Indentation` token that opens a logical line, if this is its first code token
    fn begin_code(&mut self, at: usize) {
        if !self.line_has_code {
            let span = self.pending_indent.take().unwrap_or(at..at);
            self.push(TokenKind::Indentation, span);
            self.line_has_code = true;
        }
    }

    fn advance(&mut self) -> Result<(), TokenizeError> {
        let Some((raw, span)) = self.next_raw() else {
            self.finish();
            return Ok(());
        };
        let raw = raw.map_err(|_| self.lexical_error(span.start))?;

        match raw {
            RawToken::Whitespace => match self.peek_raw() {
                // Trailing whitespace is dropped
                None | Some(Ok(RawToken::Newline)) => {}
                Some(Ok(RawToken::Comment)) => self.push(TokenKind::Whitespace, span),
                _ if !self.line_has_code => self.pending_indent = Some(span),
                _ => self.push(TokenKind::Whitespace, span),
            },
            RawToken::Newline => {
                if self.line_has_code && self.brackets.is_empty() {
                    self.push(TokenKind::Newline, span);
                    self.line_has_code = false;
                } else {
                    self.push(TokenKind::Nl, span);
                }
            }
            RawToken::Comment => {
                let text = self.source[span.clone()].trim_end_matches([' ', '\t', '\x0c']);
                let end = span.start + text.len();
                self.push(TokenKind::Comment, span.start..end);
            }
            RawToken::Continuation => {
                self.begin_code(span.start);
                self.push(TokenKind::Continuation, span);
            }
            RawToken::Open => {
                self.begin_code(span.start);
                let ch = self.char_at(span.start);
                let position = self.location.byte_to_position(span.start);
                self.brackets.push((ch, position));
                self.push(TokenKind::OpenBracket, span);
            }
            RawToken::Close => {
                let found = self.char_at(span.start);
                let position = self.location.byte_to_position(span.start);
                match self.brackets.pop() {
                    Some((open, _)) if closing_for(open) == found => {}
                    Some((open, _)) => {
                        return Err(TokenizeError::MismatchedBracket {
                            expected: closing_for(open),
                            found,
                            position,
                        })
                    }
                    None => return Err(TokenizeError::UnmatchedBracket { found, position }),
                }
                self.begin_code(span.start);
                self.push(TokenKind::CloseBracket, span);
            }
            RawToken::Name => self.push_code(TokenKind::Name, span),
            RawToken::Number => self.push_code(TokenKind::Number, span),
            RawToken::String => self.push_code(TokenKind::String, span),
            RawToken::Colon => self.push_code(TokenKind::Colon, span),
            RawToken::Operator => self.push_code(TokenKind::Operator, span),
        }
        Ok(())
    }

    fn push_code(&mut self, kind: TokenKind, span: ByteRange<usize>) {
        self.begin_code(span.start);
        self.push(kind, span);
    }

    fn finish(&mut self) {
        let end = self.source.len();
        let at = self.location.byte_to_position(end);
        self.queue
            .push_back(Token::marker(TokenKind::Endmarker, end, at));
        self.done = true;
    }

    fn char_at(&self, offset: usize) -> char {
        self.source[offset..].chars().next().unwrap_or('\0')
    }

    fn lexical_error(&self, offset: usize) -> TokenizeError {
        let rest = &self.source[offset..];
        let position = self.location.byte_to_position(offset);
        let prefix_len = rest
            .chars()
            .take(2)
            .take_while(|ch| "rRbBuUfF".contains(*ch))
            .count();
        let body = &rest[prefix_len..];

        if body.starts_with("\"\"\"") || body.starts_with("'''") {
            TokenizeError::UnterminatedTripleQuotedString { position }
        } else if body.starts_with('"') || body.starts_with('\'') {
            TokenizeError::UnterminatedString { position }
        } else if rest.starts_with('\\') {
            TokenizeError::StrayContinuation { position }
        } else {
            TokenizeError::UnexpectedCharacter {
                found: self.char_at(offset),
                position,
            }
        }
    }
}

fn closing_for(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Token, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.queue.pop_front() {
                return Some(Ok(token));
            }
            if self.done {
                return None;
            }
            if let Err(err) = self.advance() {
                self.done = true;
                return Some(Err(err));
            }
        }
    }
}

impl FusedIterator for Tokenizer<'_> {}

/// Tokenize a normalized source lazily
pub fn tokenize(source: &SourceText) -> Tokenizer<'_> {
    Tokenizer::new(source)
}

//! Semantic indentation mapper
//!
//!     This mapper turns the `Indentation` tokens of the raw stream into semantic `Indent` and
//!     `Dedent` events, the way Python's own tokenizer does.
//!
//!     The raw tokenizer tells us what whitespace a logical line starts with. That alone is not
//!     useful to the builder: it wants to know when a level opens and closes. The mapper keeps a
//!     stack of the indentation texts currently open, seeded with the empty text of the module
//!     level, and compares each new `Indentation` token against it.
//!
//! Algorithm
//!
//!     1. Same text as the top of the stack: nothing to emit.
//!     2. Text that extends the top: push it and emit one `Indent`.
//!     3. Otherwise pop (one `Dedent` per level) down to the entry with identical text.
//!     4. No identical entry: the line is either a dedent that lands between levels
//!        (`InconsistentDedent`) or a line whose whitespace reaches an open level with different
//!        characters, e.g. a tab where spaces were used (`InconsistentIndentation`).
//!     5. At `Endmarker`, one `Dedent` per level still open precedes it.
//!
//!     Markers are zero-width and are placed right before the `Indentation` token that caused
//!     them, so comment lines in between are never part of an indentation decision.
//!
//!     Widths are only used to classify errors. Tabs advance to the next multiple of the tab
//!     size.

use crate::py::building::error::StructuralError;
use crate::py::lexing::common::TokenizeError;
use crate::py::parsing::ParseError;
use crate::py::token::{Token, TokenKind};
use std::collections::VecDeque;
use std::iter::FusedIterator;

/// Iterator adapter producing `Indent` / `Dedent` markers from `Indentation` tokens
pub struct SemanticIndentationMapper<I> {
    inner: I,
    stack: Vec<String>,
    tab_size: usize,
    queue: VecDeque<Token>,
    done: bool,
}

impl<I> SemanticIndentationMapper<I>
where
    I: Iterator<Item = Result<Token, TokenizeError>>,
{
    pub fn new(inner: I, tab_size: usize) -> Self {
        Self {
            inner,
            stack: vec![String::new()],
            tab_size,
            queue: VecDeque::new(),
            done: false,
        }
    }

    fn map_token(&mut self, token: Token) -> Result<(), StructuralError> {
        match token.kind() {
            TokenKind::Indentation => {
                self.align(&token)?;
                self.queue.push_back(token);
            }
            TokenKind::Endmarker => {
                while self.stack.len() > 1 {
                    self.stack.pop();
                    self.queue.push_back(marker(TokenKind::Dedent, &token));
                }
                self.queue.push_back(token);
            }
            _ => self.queue.push_back(token),
        }
        Ok(())
    }

    fn align(&mut self, token: &Token) -> Result<(), StructuralError> {
        let text = token.text();
        let top = self.stack.last().map(String::as_str).unwrap_or("");

        if text == top {
            return Ok(());
        }
        if text.starts_with(top) {
            self.stack.push(text.to_string());
            self.queue.push_back(marker(TokenKind::Indent, token));
            return Ok(());
        }

        match self.stack.iter().rposition(|open| open == text) {
            Some(level) => {
                for _ in level + 1..self.stack.len() {
                    self.queue.push_back(marker(TokenKind::Dedent, token));
                }
                self.stack.truncate(level + 1);
                Ok(())
            }
            None => {
                let width = indentation_width(text, self.tab_size);
                let top_width = indentation_width(top, self.tab_size);
                let same_width = self
                    .stack
                    .iter()
                    .any(|open| indentation_width(open, self.tab_size) == width);
                let position = token.end();
                if same_width || width > top_width {
                    Err(StructuralError::InconsistentIndentation { position })
                } else {
                    Err(StructuralError::InconsistentDedent { position })
                }
            }
        }
    }
}

fn marker(kind: TokenKind, at: &Token) -> Token {
    Token::marker(kind, at.span().start, at.start())
}

/// Column reached by an indentation text, with tabs stopping at multiples of `tab_size`
pub fn indentation_width(text: &str, tab_size: usize) -> usize {
    let tab_size = tab_size.max(1);
    text.chars().fold(0, |column, ch| match ch {
        '\t' => (column / tab_size + 1) * tab_size,
        '\x0c' => 0,
        _ => column + 1,
    })
}

impl<I> Iterator for SemanticIndentationMapper<I>
where
    I: Iterator<Item = Result<Token, TokenizeError>>,
{
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.queue.pop_front() {
                return Some(Ok(token));
            }
            if self.done {
                return None;
            }
            match self.inner.next() {
                None => self.done = true,
                Some(Err(err)) => {
                    self.done = true;
                    return Some(Err(err.into()));
                }
                Some(Ok(token)) => {
                    if let Err(err) = self.map_token(token) {
                        self.done = true;
                        return Some(Err(err.into()));
                    }
                }
            }
        }
    }
}

impl<I> FusedIterator for SemanticIndentationMapper<I> where
    I: Iterator<Item = Result<Token, TokenizeError>>
{
}

//! Structural builder
//!
//!     Consumes the semantic token stream and arranges it into the block tree. The builder is
//!     a push-down machine: the block being filled is `current`, the blocks it is nested in
//!     wait on `parents`, and tokens accumulate into the logical line under construction until
//!     its `Newline` arrives.
//!
//!     Between statements the stream carries comment lines, blank lines and the layout markers:
//!
//!         - Comment-only and blank lines become pending attachments.
//!         - `Indent` is only legal right after a line ending in `:`. It arms the builder so
//!           the next `Indentation` token opens a block with that exact indentation.
//!         - `Dedent` closes the current block and hands it to the last line of its parent as
//!           that line's body.
//!         - `Indentation` starts the next statement, which takes every pending attachment as
//!           leading attachments.
//!
//!     When a block closes, the pending run that ends in a comment and whose comments are all
//!     still indented at the block's level stays behind as the block's trailing attachments.
//!     The remaining attachments move outward.
//!
//!     Comments are placed by column. One that sits left of the owning block's column is
//!     relocated to the block indentation. One at or right of it keeps its whitespace: as an
//!     offset when the whitespace extends the block's indentation text, verbatim otherwise.

use super::error::StructuralError;
use crate::py::ast::elements::{Block, Code, CommentAttachment, LogicalLine};
use crate::py::ast::range::Position;
use crate::py::lexing::transformations::indentation_width;
use crate::py::parsing::ParseError;
use crate::py::token::{Token, TokenKind};
use tracing::debug;

/// A comment line or blank line that has not found its owner yet
#[derive(Debug)]
enum Pending {
    Blank { line: usize },
    Comment { whitespace: String, token: Token },
}

impl Pending {
    fn attach(self, block: &Placement) -> CommentAttachment {
        match self {
            Pending::Blank { line } => CommentAttachment::blank(line),
            Pending::Comment { whitespace, token } => {
                let relocated = block.is_outdented(&whitespace);
                let absolute = !relocated && !whitespace.starts_with(block.indent);
                let offset = if relocated {
                    debug!(
                        position = %token.start(),
                        indent = ?block.indent,
                        "relocating comment to block indentation"
                    );
                    ""
                } else if absolute {
                    whitespace.as_str()
                } else {
                    &whitespace[block.indent.len()..]
                };
                CommentAttachment::Comment {
                    offset: offset.to_string(),
                    text: token.text().to_string(),
                    position: token.start(),
                    relocated,
                    absolute,
                    span: token.span(),
                }
            }
        }
    }
}

/// Indentation of the block an attachment is being placed in
struct Placement<'a> {
    indent: &'a str,
    width: usize,
    tab_size: usize,
}

impl Placement<'_> {
    /// True when `whitespace` ends left of the block's column
    fn is_outdented(&self, whitespace: &str) -> bool {
        indentation_width(whitespace, self.tab_size) < self.width
    }
}

/// Length of the leading run of `pending` that stays with `block`
fn trailing_run(pending: &[Pending], block: &Placement) -> usize {
    let mut take = 0;
    for (idx, item) in pending.iter().enumerate() {
        if let Pending::Comment { whitespace, .. } = item {
            if block.is_outdented(whitespace) {
                break;
            }
            take = idx + 1;
        }
    }
    take
}

/// Incremental tree builder fed one token at a time
pub struct Builder {
    tab_size: usize,
    current: Block,
    parents: Vec<Block>,
    line: Vec<Token>,
    line_leading: Vec<CommentAttachment>,
    brackets: Vec<Token>,
    pending: Vec<Pending>,
    comment_whitespace: Option<String>,
    in_comment_line: bool,
    /// Line number of a scope opener still waiting for its body
    awaiting_body: Option<usize>,
    opening: bool,
    ended: bool,
    last_end: Position,
}

impl Builder {
    pub fn new(tab_size: usize) -> Self {
        Self {
            tab_size,
            current: Block::root(),
            parents: Vec::new(),
            line: Vec::new(),
            line_leading: Vec::new(),
            brackets: Vec::new(),
            pending: Vec::new(),
            comment_whitespace: None,
            in_comment_line: false,
            awaiting_body: None,
            opening: false,
            ended: false,
            last_end: Position::default(),
        }
    }

    pub fn push(&mut self, token: Token) -> Result<(), StructuralError> {
        if self.ended {
            return Err(unexpected(&token));
        }
        self.last_end = token.end();
        if self.line.is_empty() {
            self.push_between_lines(token)
        } else {
            self.push_in_line(token)
        }
    }

    /// Complete the tree. The stream must have reached its `Endmarker`.
    pub fn finish(mut self) -> Result<Code, StructuralError> {
        if !self.ended {
            let end = Token::marker(TokenKind::Endmarker, 0, self.last_end);
            self.push(end)?;
        }
        Ok(Code::new(self.current, self.tab_size))
    }

    fn push_between_lines(&mut self, token: Token) -> Result<(), StructuralError> {
        match token.kind() {
            TokenKind::Whitespace => {
                self.comment_whitespace = Some(token.text().to_string());
            }
            TokenKind::Comment => {
                let whitespace = self.comment_whitespace.take().unwrap_or_default();
                self.pending.push(Pending::Comment { whitespace, token });
                self.in_comment_line = true;
            }
            TokenKind::Nl => {
                if self.in_comment_line {
                    self.in_comment_line = false;
                } else {
                    self.pending.push(Pending::Blank {
                        line: token.start().line,
                    });
                }
            }
            TokenKind::Indent => {
                if self.awaiting_body.is_none() || self.opening {
                    return Err(StructuralError::UnexpectedIndent {
                        position: token.start(),
                    });
                }
                self.opening = true;
            }
            TokenKind::Dedent => {
                self.expect_no_body(&token)?;
                self.close_block(&token)?;
            }
            TokenKind::Indentation => {
                if self.opening {
                    self.open_block(&token);
                } else {
                    self.expect_no_body(&token)?;
                }
                let placement = Placement {
                    indent: self.current.indent(),
                    width: self.current.width(),
                    tab_size: self.tab_size,
                };
                self.line_leading = self
                    .pending
                    .drain(..)
                    .map(|item| item.attach(&placement))
                    .collect();
                self.line.push(token);
            }
            TokenKind::Endmarker => self.end(&token)?,
            _ => return Err(unexpected(&token)),
        }
        Ok(())
    }

    fn push_in_line(&mut self, token: Token) -> Result<(), StructuralError> {
        match token.kind() {
            TokenKind::Newline => {
                self.line.push(token);
                self.complete_line();
            }
            TokenKind::OpenBracket => {
                self.brackets.push(token.clone());
                self.line.push(token);
            }
            TokenKind::CloseBracket => {
                self.brackets.pop();
                self.line.push(token);
            }
            // Markers only interrupt a line when the input ends inside it
            TokenKind::Dedent | TokenKind::Endmarker => return Err(self.unfinished_line()),
            TokenKind::Indent | TokenKind::Indentation => return Err(unexpected(&token)),
            _ => self.line.push(token),
        }
        Ok(())
    }

    fn complete_line(&mut self) {
        let tokens = std::mem::take(&mut self.line);
        let leading = std::mem::take(&mut self.line_leading);
        let line = LogicalLine::new(tokens).with_leading(leading);
        if line.opens_block() {
            self.awaiting_body = Some(line.start().line);
        }
        self.current.lines.push(line);
    }

    fn unfinished_line(&self) -> StructuralError {
        match self.brackets.last() {
            Some(open) => StructuralError::UnclosedBracket {
                open: open.text().chars().next().unwrap_or('('),
                position: open.start(),
            },
            None => StructuralError::MissingFinalNewline {
                position: self.line.last().map(Token::end).unwrap_or(self.last_end),
            },
        }
    }

    fn expect_no_body(&self, token: &Token) -> Result<(), StructuralError> {
        match self.awaiting_body {
            Some(line) => Err(StructuralError::ExpectedIndentedBlock {
                line,
                position: token.end(),
            }),
            None => Ok(()),
        }
    }

    fn open_block(&mut self, token: &Token) {
        let indent = token.text();
        let width = indentation_width(indent, self.tab_size);
        debug!(
            depth = self.parents.len() + 1,
            indent = ?indent,
            line = token.start().line,
            "opening block"
        );
        let parent = std::mem::replace(&mut self.current, Block::new(indent, width));
        self.parents.push(parent);
        self.opening = false;
        self.awaiting_body = None;
    }

    fn close_block(&mut self, token: &Token) -> Result<(), StructuralError> {
        let parent = self.parents.pop().ok_or_else(|| unexpected(token))?;
        let mut block = std::mem::replace(&mut self.current, parent);

        let placement = Placement {
            indent: block.indent(),
            width: block.width(),
            tab_size: self.tab_size,
        };
        let take = trailing_run(&self.pending, &placement);
        let trailing: Vec<CommentAttachment> = self
            .pending
            .drain(..take)
            .map(|item| item.attach(&placement))
            .collect();
        block.trailing = trailing;
        debug!(
            depth = self.parents.len() + 1,
            lines = block.lines.len(),
            trailing = block.trailing.len(),
            "closing block"
        );

        let owner = self
            .current
            .lines
            .last_mut()
            .ok_or_else(|| unexpected(token))?;
        owner.body = Some(block);
        Ok(())
    }

    fn end(&mut self, token: &Token) -> Result<(), StructuralError> {
        if self.in_comment_line {
            return Err(StructuralError::MissingFinalNewline {
                position: token.start(),
            });
        }
        self.expect_no_body(token)?;
        if !self.parents.is_empty() {
            return Err(unexpected(token));
        }
        let placement = Placement {
            indent: "",
            width: 0,
            tab_size: self.tab_size,
        };
        let trailing: Vec<CommentAttachment> = self
            .pending
            .drain(..)
            .map(|item| item.attach(&placement))
            .collect();
        self.current.trailing = trailing;
        self.ended = true;
        Ok(())
    }
}

fn unexpected(token: &Token) -> StructuralError {
    StructuralError::UnexpectedToken {
        found: token.kind(),
        position: token.start(),
    }
}

/// Build the block tree from a semantic token stream
pub fn build<I>(tokens: I, tab_size: usize) -> Result<Code, ParseError>
where
    I: IntoIterator<Item = Result<Token, ParseError>>,
{
    let mut builder = Builder::new(tab_size);
    for token in tokens {
        builder.push(token?)?;
    }
    Ok(builder.finish()?)
}

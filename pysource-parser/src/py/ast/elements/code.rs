//! Code element
//!
//!     The result of a parse: the root block plus the tab size the source was measured with.
//!     A `Code` is produced once per parse call and owned by the caller; it only changes
//!     through the `&mut` accessors, which give collaborators (reformatters, code generators)
//!     direct access to the tree. There is no locking; exclusivity is the borrow checker's.

use super::attachment::CommentAttachment;
use super::block::Block;
use super::logical_line::LogicalLine;
use crate::py::ast::traversal::{block_at, line_at, line_at_mut, NodePath, Walk};
use crate::py::building::error::StructuralError;
use crate::py::formats::unparser;
use crate::py::token::Token;
use serde::Serialize;

/// A parsed source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Code {
    root: Block,
    tab_size: usize,
}

impl Code {
    pub fn new(root: Block, tab_size: usize) -> Self {
        Self { root, tab_size }
    }

    pub fn root(&self) -> &Block {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Block {
        &mut self.root
    }

    pub fn tab_size(&self) -> usize {
        self.tab_size
    }

    /// Top-level statements in order
    pub fn lines(&self) -> &[LogicalLine] {
        self.root.lines()
    }

    pub fn lines_mut(&mut self) -> &mut Vec<LogicalLine> {
        self.root.lines_mut()
    }

    /// Comments and blank lines after the last statement
    pub fn trailing(&self) -> &[CommentAttachment] {
        self.root.trailing()
    }

    pub fn trailing_mut(&mut self) -> &mut Vec<CommentAttachment> {
        self.root.trailing_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty() && self.root.trailing().is_empty()
    }

    /// Depth-first traversal of every line and body block
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(&self.root)
    }

    /// The line named by `path`
    pub fn get(&self, path: &NodePath) -> Option<&LogicalLine> {
        line_at(&self.root, path)
    }

    pub fn get_mut(&mut self, path: &NodePath) -> Option<&mut LogicalLine> {
        line_at_mut(&mut self.root, path)
    }

    /// The block named by `path`: the root for the empty path, otherwise a line's body
    pub fn block(&self, path: &NodePath) -> Option<&Block> {
        block_at(&self.root, path)
    }

    /// The `n`-th statement in source order, counting nested ones
    pub fn statement(&self, n: usize) -> Option<(NodePath, &LogicalLine)> {
        self.walk()
            .filter_map(|item| item.node.as_line().map(|line| (item.path, line)))
            .nth(n)
    }

    /// Number of statements at any depth
    pub fn statement_count(&self) -> usize {
        self.walk().filter(|item| item.node.as_line().is_some()).count()
    }

    /// The innermost statement covering a 1-based source line
    pub fn statement_at_line(&self, line: usize) -> Option<(NodePath, &LogicalLine)> {
        self.walk()
            .filter_map(|item| item.node.as_line().map(|l| (item.path, l)))
            .filter(|(_, l)| l.line_numbers().contains(&line))
            .last()
    }

    /// Every token of every statement, in source order
    pub fn tokens(&self) -> impl Iterator<Item = &Token> + '_ {
        self.walk()
            .filter_map(|item| item.node.as_line())
            .flat_map(|line| line.tokens().iter())
    }

    /// Reconstruct source text from the tree
    pub fn unparse(&self) -> Result<String, StructuralError> {
        unparser::unparse(self)
    }
}

//! Node paths and depth-first traversal
//!
//!     Nodes don't know their parents. A [`NodePath`] is the route from the root instead: the
//!     index of a line in the root block, then the index of a line in that line's body, and so
//!     on. The path of a line also names the block that line opens; the empty path names the
//!     root block.
//!
//!     [`Walk`] visits lines in source order, yielding each body block right after the line
//!     that owns it and before the block's own lines.

use super::elements::{Block, LogicalLine};
use serde::Serialize;
use std::fmt;

/// Child indices from the root to a node
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Nesting depth of the line this path names; root lines are at depth 0
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "root");
        }
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// A node reached during traversal
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Line(&'a LogicalLine),
    Block(&'a Block),
}

impl<'a> Node<'a> {
    pub fn as_line(&self) -> Option<&'a LogicalLine> {
        match self {
            Node::Line(line) => Some(line),
            Node::Block(_) => None,
        }
    }

    pub fn as_block(&self) -> Option<&'a Block> {
        match self {
            Node::Block(block) => Some(block),
            Node::Line(_) => None,
        }
    }
}

/// One step of a depth-first walk
#[derive(Debug, Clone)]
pub struct WalkItem<'a> {
    pub node: Node<'a>,
    pub path: NodePath,
    pub depth: usize,
}

struct Frame<'a> {
    block: &'a Block,
    path: NodePath,
    next: usize,
    depth: usize,
}

/// Depth-first iterator over the lines and body blocks below a block
pub struct Walk<'a> {
    stack: Vec<Frame<'a>>,
    queued: Option<Frame<'a>>,
}

impl<'a> Walk<'a> {
    pub fn new(root: &'a Block) -> Self {
        Self {
            stack: vec![Frame {
                block: root,
                path: NodePath::root(),
                next: 0,
                depth: 0,
            }],
            queued: None,
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = WalkItem<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(frame) = self.queued.take() {
            let item = WalkItem {
                node: Node::Block(frame.block),
                path: frame.path.clone(),
                depth: frame.depth,
            };
            self.stack.push(frame);
            return Some(item);
        }

        loop {
            let frame = self.stack.last_mut()?;
            let block: &'a Block = frame.block;
            let Some(line) = block.lines.get(frame.next) else {
                self.stack.pop();
                continue;
            };
            let path = frame.path.child(frame.next);
            let depth = frame.depth;
            frame.next += 1;

            if let Some(body) = line.body() {
                self.queued = Some(Frame {
                    block: body,
                    path: path.clone(),
                    next: 0,
                    depth: depth + 1,
                });
            }
            return Some(WalkItem {
                node: Node::Line(line),
                path,
                depth,
            });
        }
    }
}

/// Resolve a path to the line it names
pub fn line_at<'a>(root: &'a Block, path: &NodePath) -> Option<&'a LogicalLine> {
    let (last, prefix) = path.indices().split_last()?;
    let mut block = root;
    for &index in prefix {
        block = block.lines.get(index)?.body()?;
    }
    block.lines.get(*last)
}

/// Resolve a path to the block it names: the root, or the body of the line at `path`
pub fn block_at<'a>(root: &'a Block, path: &NodePath) -> Option<&'a Block> {
    if path.is_root() {
        return Some(root);
    }
    line_at(root, path)?.body()
}

pub fn line_at_mut<'a>(root: &'a mut Block, path: &NodePath) -> Option<&'a mut LogicalLine> {
    let (last, prefix) = path.indices().split_last()?;
    let mut block = root;
    for &index in prefix {
        block = block.lines.get_mut(index)?.body_mut()?;
    }
    block.lines.get_mut(*last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::py::parsing::parse_text;

    const SOURCE: &str = "import os\nclass A:\n    def f(self):\n        pass\n    x = 1\ny = 2\n";

    #[test]
    fn test_walk_order() {
        let code = parse_text(SOURCE).unwrap();
        let steps: Vec<(String, &'static str, usize)> = code
            .walk()
            .map(|item| {
                let kind = match item.node {
                    Node::Line(_) => "line",
                    Node::Block(_) => "block",
                };
                (item.path.to_string(), kind, item.depth)
            })
            .collect();

        assert_eq!(
            steps,
            vec![
                ("0".to_string(), "line", 0),
                ("1".to_string(), "line", 0),
                ("1".to_string(), "block", 1),
                ("1.0".to_string(), "line", 1),
                ("1.0".to_string(), "block", 2),
                ("1.0.0".to_string(), "line", 2),
                ("1.1".to_string(), "line", 1),
                ("2".to_string(), "line", 0),
            ]
        );
    }

    #[test]
    fn test_path_lookup() {
        let code = parse_text(SOURCE).unwrap();
        let path = NodePath::from(vec![1, 0, 0]);

        assert_eq!(code.get(&path).map(|l| l.text()), Some("pass".to_string()));
        assert_eq!(path.depth(), 2);
        assert_eq!(path.parent(), Some(NodePath::from(vec![1, 0])));
        assert!(code.get(&NodePath::from(vec![0, 0])).is_none());
        assert_eq!(
            code.block(&NodePath::from(vec![1])).map(|b| b.indent()),
            Some("    ")
        );
        assert!(code.block(&NodePath::root()).is_some());
    }

    #[test]
    fn test_root_path_display() {
        assert_eq!(NodePath::root().to_string(), "root");
        assert_eq!(NodePath::from(vec![3, 1]).to_string(), "3.1");
    }
}

//! Document model for round-trip parsed source
//!
//!     The model is deliberately shallow. It knows about statements and nesting, and nothing
//!     about expressions: a statement is a [LogicalLine](elements::LogicalLine) holding its
//!     tokens verbatim, and indentation is the manifestation of a [Block](elements::Block),
//!     the child of the line that opened it.
//!
//! Tree Shape
//!
//!         Code
//!         └─ Block (root, indentation "")
//!            ├─ LogicalLine  "import os"
//!            └─ LogicalLine  "def f():"
//!               └─ Block (indentation "    ")
//!                  └─ LogicalLine  "return 1"
//!
//!     Comments and blank lines are not statements. They travel with the statement that follows
//!     them as leading [CommentAttachment](elements::CommentAttachment)s, or stay at the end of
//!     a block as its trailing attachments.
//!
//! Identity and Navigation
//!
//!     Nodes have no parent pointers. A [NodePath](traversal::NodePath) (child indices from the
//!     root) names a line, and the same path names the block that line opens. Lookups and
//!     errors use paths; [walk](elements::Code::walk) yields them during traversal.
//!
//! ## Modules
//!
//! - `range` - Position and Range types for source code locations
//! - `elements` - The model types
//! - `traversal` - Node paths and depth-first iteration

pub mod elements;
pub mod range;
pub mod traversal;

pub use elements::{Block, Code, CommentAttachment, LogicalLine};
pub use range::{Position, Range, SourceLocation};
pub use traversal::{Node, NodePath, Walk, WalkItem};

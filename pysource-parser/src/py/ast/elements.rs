//! Model elements
//!
//!     - [Code](code): the parse result, owning the root block.
//!     - [Block](block): an indentation level with its lines and trailing attachments.
//!     - [LogicalLine](logical_line): one statement, possibly spanning several physical lines.
//!     - [CommentAttachment](attachment): a comment or blank line carried by a line or block.

pub mod attachment;
pub mod block;
pub mod code;
pub mod logical_line;

pub use attachment::CommentAttachment;
pub use block::Block;
pub use code::Code;
pub use logical_line::LogicalLine;

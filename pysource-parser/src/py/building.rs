//! Tree building
//!
//!     Turns the semantic token stream into the [Code](crate::py::ast::Code) tree. There is no
//!     grammar here beyond statements and nesting: the builder only needs to know where logical
//!     lines end, which lines open blocks, and where the indentation markers fall.
//!
//!     See [builder](builder) for the state machine and [error](error) for the failures it
//!     reports. Building is all-or-nothing: on error no partial tree is returned.

pub mod builder;
pub mod error;

pub use builder::{build, Builder};
pub use error::StructuralError;

//! Main module for pysource library functionality

pub mod ast;
pub mod building;
pub mod formats;
pub mod lexing;
pub mod loader;
pub mod outline;
pub mod parsing;
pub mod testing;
pub mod token;

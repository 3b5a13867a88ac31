//! The built-in grammar front-end: recursive descent for statements, Pratt
//! parsing for expressions.
//!
//! The parser builds the same typed AST the renderer consumes and records
//! every table and column it meets in [`References`](crate::references::References).

mod error;
mod parser;
mod pratt;

pub use error::ParseError;
pub use parser::Parser;

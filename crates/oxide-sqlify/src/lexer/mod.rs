//! Tokenization of SQL text.
//!
//! The [`Lexer`] is pulled one token at a time by the parser. Identifier
//! quoting is dialect dependent, so a lexer is always built for a dialect.

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::Lexer;

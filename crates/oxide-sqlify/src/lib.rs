//! # oxide-sqlify
//!
//! A multi-dialect SQL toolkit: parse SQL text into a tagged AST, render an
//! AST back into SQL for a given database, and whitelist queries by the
//! tables or columns they touch.
//!
//! This crate provides:
//! - A hand-written recursive descent parser with Pratt expression parsing
//! - A serde AST whose JSON form is tagged by `type`
//! - Dialect-aware rendering of identifiers, limits and statement quirks
//!
//! ## Round trip
//!
//! ```rust
//! use oxide_sqlify::{Options, SqlParser};
//!
//! let parser = SqlParser::new();
//! let opts = Options::new().database("mysql");
//! let ast = parser.astify("select id from users where id = 1 limit 10, 5", &opts).unwrap();
//! assert_eq!(
//!     parser.sqlify(&ast, &opts).unwrap(),
//!     "SELECT `id` FROM `users` WHERE `id` = 1 LIMIT 10, 5"
//! );
//!
//! // The same AST in Transact-SQL
//! let tsql = Options::new().database("transactsql");
//! assert_eq!(
//!     parser.sqlify(&ast, &tsql).unwrap(),
//!     "SELECT [id] FROM [users] WHERE [id] = 1 OFFSET 10 ROWS FETCH NEXT 5 ROWS ONLY"
//! );
//! ```
//!
//! ## Whitelisting
//!
//! ```rust
//! use oxide_sqlify::{Options, SqlParser};
//!
//! let parser = SqlParser::new();
//! let opts = Options::new();
//! assert!(parser.white_list_check("SELECT * FROM public", &["public"], &opts).is_ok());
//! assert!(parser.white_list_check("SELECT * FROM secret", &["public"], &opts).is_err());
//! ```

pub mod ast;
pub mod dialect;
mod error;
pub mod facade;
pub mod frontend;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod references;
pub mod render;
pub mod whitelist;

pub use ast::{Ast, Expr, Statement};
pub use dialect::Dialect;
pub use error::{Error, Result};
pub use facade::SqlParser;
pub use frontend::{Frontend, GrammarFrontend, ParseOutput};
pub use lexer::{Lexer, Token, TokenKind};
pub use options::{CheckType, Options};
pub use parser::{ParseError, Parser};
pub use render::{RenderConfig, RenderMode, Renderer};

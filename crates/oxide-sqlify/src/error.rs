//! Error types for parsing, rendering and whitelisting.

use crate::options::CheckType;
use crate::parser::ParseError;

/// Errors raised by the facade and the renderer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested dialect has no registered front-end or dialect policy.
    #[error("{0} is not supported currently")]
    UnsupportedDialect(String),

    /// The front-end rejected the SQL text.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A table or column touched by the query is not whitelisted.
    #[error("authority = '{authority}' is required in {kind} whiteList to execute SQL = '{sql}'")]
    WhiteListDenied {
        kind: CheckType,
        authority: String,
        sql: String,
    },

    /// A whitelist entry is not a valid regular expression.
    #[error("invalid whitelist pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A node kind has no renderer. Only raised in strict mode.
    #[error("no renderer for node kind '{0}'")]
    UnrenderableNode(String),

    /// A JSON AST could not be mapped onto the typed AST.
    #[error("invalid AST: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

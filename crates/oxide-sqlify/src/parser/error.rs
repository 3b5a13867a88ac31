use crate::lexer::{Span, TokenKind};

/// Why a front-end rejected its input, and where.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at position {span}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    /// What the grammar accepted at `span`, when a single description fits.
    pub expected: Option<String>,
    pub found: Option<TokenKind>,
}

impl ParseError {
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            expected: None,
            found: None,
        }
    }

    /// `found` is not what the grammar allows here. Running out of input is
    /// reported as [`ParseError::unexpected_eof`].
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, found: TokenKind, span: Span) -> Self {
        if found == TokenKind::Eof {
            return Self::unexpected_eof(expected, span);
        }
        let expected = expected.into();
        Self {
            message: format!("Expected {expected}, found {}", describe(&found)),
            span,
            expected: Some(expected),
            found: Some(found),
        }
    }

    #[must_use]
    pub fn unexpected_eof(expected: impl Into<String>, span: Span) -> Self {
        let expected = expected.into();
        Self {
            message: format!("Expected {expected}, found end of input"),
            span,
            expected: Some(expected),
            found: Some(TokenKind::Eof),
        }
    }
}

/// A short human description of a token for messages.
fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Keyword(kw) => kw.as_str().to_string(),
        TokenKind::Identifier(name) => format!("identifier '{name}'"),
        TokenKind::QuotedIdentifier(name) => format!("quoted identifier '{name}'"),
        TokenKind::Number(n) => format!("number {n}"),
        TokenKind::String(s) | TokenKind::DoubleQuotedString(s) => format!("string '{s}'"),
        other => format!("{other:?}"),
    }
}

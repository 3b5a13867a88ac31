//! Tokens produced by the [`Lexer`](super::Lexer).

use super::Span;

/// Declares the reserved words once; the enum, the lookup and the spelling
/// are generated from the same table.
macro_rules! keywords {
    ($($variant:ident => $text:literal,)*) => {
        /// Reserved SQL keywords.
        ///
        /// Only words that drive statement structure are reserved. Type names,
        /// function names and dialect words such as `ENGINE`, `ROWS` or `ONLY`
        /// lex as identifiers so they stay usable as column names.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($variant,)*
        }

        impl Keyword {
            /// Every reserved word.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// Looks a word up, ignoring case.
            #[must_use]
            pub fn lookup(word: &str) -> Option<Self> {
                let upper = word.to_ascii_uppercase();
                match upper.as_str() {
                    $($text => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Returns the uppercase spelling.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }
        }
    };
}

keywords! {
    Select => "SELECT", From => "FROM", Where => "WHERE", Order => "ORDER",
    By => "BY", Group => "GROUP", Having => "HAVING", Limit => "LIMIT",
    Offset => "OFFSET", Fetch => "FETCH", Distinct => "DISTINCT", All => "ALL",

    Join => "JOIN", Inner => "INNER", Left => "LEFT", Right => "RIGHT",
    Full => "FULL", Outer => "OUTER", Cross => "CROSS", On => "ON", Using => "USING",

    Union => "UNION", Intersect => "INTERSECT", Except => "EXCEPT",

    Insert => "INSERT", Replace => "REPLACE", Into => "INTO", Values => "VALUES",
    Update => "UPDATE", Set => "SET", Delete => "DELETE", Returning => "RETURNING",

    Create => "CREATE", Drop => "DROP", Show => "SHOW", Table => "TABLE",
    View => "VIEW", Database => "DATABASE", Schema => "SCHEMA",
    Temporary => "TEMPORARY", Primary => "PRIMARY", Key => "KEY",
    Unique => "UNIQUE", Default => "DEFAULT",

    And => "AND", Or => "OR", Not => "NOT", In => "IN", Between => "BETWEEN",
    Like => "LIKE", Is => "IS", Null => "NULL", True => "TRUE", False => "FALSE",
    Exists => "EXISTS",

    Asc => "ASC", Desc => "DESC", Nulls => "NULLS",

    As => "AS", Case => "CASE", When => "WHEN", Then => "THEN", Else => "ELSE",
    End => "END", Cast => "CAST", Interval => "INTERVAL", Extract => "EXTRACT",
    Collate => "COLLATE", Match => "MATCH", Against => "AGAINST", If => "IF",
    With => "WITH", Recursive => "RECURSIVE", Over => "OVER",
    Partition => "PARTITION",
}

/// What a token is. Literal payloads keep the source spelling unless noted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Number(String),
    /// `'..'` with escapes resolved.
    String(String),
    /// `".."` in dialects where the double quote delimits strings.
    DoubleQuotedString(String),
    /// `X'..'`, digits only.
    HexString(String),

    Identifier(String),
    /// `"a b"`, `` `a b` `` or `[a b]`, delimiters stripped.
    QuotedIdentifier(String),
    Keyword(Keyword),
    /// `@name` or `@@name`, prefix included.
    Variable(String),
    /// `:name`, colon stripped.
    Parameter(String),

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    /// `!=` or `<>`
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    /// `||`
    Concat,
    BitAnd,
    BitOr,
    BitNot,
    Bang,
    LeftShift,
    RightShift,

    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comma,
    Semicolon,
    Dot,
    DoubleColon,
    /// A lone `:`, as in struct literals.
    Colon,
    Question,

    Eof,
    /// Text the lexer could not classify.
    Error(String),
}

/// A token and the bytes it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword, if the token is one.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    /// Returns true for an unreserved word spelled `word`, ignoring case.
    ///
    /// Dialect words (`ROWS`, `ENGINE`, `IGNORE`) are matched this way.
    #[must_use]
    pub fn is_word(&self, word: &str) -> bool {
        matches!(&self.kind, TokenKind::Identifier(name) if name.eq_ignore_ascii_case(word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(Keyword::lookup("select"), Some(Keyword::Select));
        assert_eq!(Keyword::lookup("ReTuRnInG"), Some(Keyword::Returning));
        assert_eq!(Keyword::lookup("varchar"), None);
        assert_eq!(Keyword::lookup("engine"), None);
    }

    #[test]
    fn test_every_spelling_looks_up_its_keyword() {
        for &kw in Keyword::ALL {
            assert_eq!(Keyword::lookup(kw.as_str()), Some(kw));
        }
    }

    #[test]
    fn test_dialect_words_are_identifiers() {
        let engine = Token::new(TokenKind::Identifier("Engine".into()), Span::new(0, 6));
        let select = Token::new(TokenKind::Keyword(Keyword::Select), Span::new(0, 6));
        assert!(engine.is_word("ENGINE"));
        assert!(!select.is_word("SELECT"));
        assert_eq!(select.as_keyword(), Some(Keyword::Select));
    }
}

//! Dialect-aware SQL tokenizer.

use super::{Keyword, Span, Token, TokenKind};
use crate::dialect::{Dialect, IdentifierQuote};

/// Splits SQL text into [`Token`]s on demand.
///
/// Quoting follows the dialect: backtick dialects read `".."` as a string
/// literal, and Transact-SQL reads `[..]` as an identifier rather than a
/// subscript.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    /// Where the token being scanned began.
    start: usize,
    double_quote_identifiers: bool,
    bracket_identifiers: bool,
}

fn ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

impl<'a> Lexer<'a> {
    /// Creates a lexer with ANSI quoting: `"` for identifiers, `'` for strings.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self::with_dialect(input, Dialect::PostgreSql)
    }

    #[must_use]
    pub const fn with_dialect(input: &'a str, dialect: Dialect) -> Self {
        let quote = dialect.identifier_quote();
        Self {
            input,
            pos: 0,
            start: 0,
            double_quote_identifiers: !matches!(quote, IdentifierQuote::Backtick),
            bracket_identifiers: matches!(quote, IdentifierQuote::Bracket),
        }
    }

    /// Returns the source text under `span`; empty when out of range.
    #[must_use]
    pub fn slice(&self, span: Span) -> &'a str {
        self.input.get(span.start..span.end).unwrap_or_default()
    }

    fn rest(&self) -> &'a str {
        self.input.get(self.pos..).unwrap_or_default()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes `expected` if it is next.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    fn text(&self) -> &'a str {
        self.slice(Span::new(self.start, self.pos))
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    fn error(&self, message: &str) -> Token {
        self.token(TokenKind::Error(message.to_string()))
    }

    /// Whitespace, `--` and `#` line comments, `/* */` block comments.
    fn skip_trivia(&mut self) {
        loop {
            self.eat_while(char::is_whitespace);
            let rest = self.rest();
            if rest.starts_with("--") || rest.starts_with('#') {
                self.eat_while(|c| c != '\n');
            } else if rest.starts_with("/*") {
                self.pos += 2;
                match self.rest().find("*/") {
                    Some(end) => self.pos += end + 2,
                    None => self.pos = self.input.len(),
                }
            } else {
                return;
            }
        }
    }

    fn word(&mut self) -> Token {
        self.eat_while(ident_char);
        let text = self.text();
        match Keyword::lookup(text) {
            Some(keyword) => self.token(TokenKind::Keyword(keyword)),
            None => self.token(TokenKind::Identifier(text.to_string())),
        }
    }

    /// Reads up to `close`; a doubled `close` stands for itself. `None` when
    /// the input ends first.
    fn delimited(&mut self, close: char) -> Option<String> {
        let mut value = String::new();
        loop {
            let c = self.bump()?;
            if c != close {
                value.push(c);
            } else if self.eat(close) {
                value.push(close);
            } else {
                return Some(value);
            }
        }
    }

    fn quoted_identifier(&mut self, close: char) -> Token {
        match self.delimited(close) {
            Some(name) => self.token(TokenKind::QuotedIdentifier(name)),
            None => self.error("Unterminated quoted identifier"),
        }
    }

    fn string(&mut self, quote: char) -> Token {
        match self.delimited(quote) {
            Some(value) if quote == '\'' => self.token(TokenKind::String(value)),
            Some(value) => self.token(TokenKind::DoubleQuotedString(value)),
            None => self.error("Unterminated string literal"),
        }
    }

    /// Digits, an optional fraction and an optional exponent. The first
    /// character is already consumed.
    fn number(&mut self) -> Token {
        self.eat_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.eat_while(|c| c.is_ascii_digit());
        }
        let exponent = matches!(self.peek(), Some('e' | 'E'))
            && self
                .peek_second()
                .is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-');
        if exponent {
            self.bump();
            if !self.eat('+') {
                self.eat('-');
            }
            self.eat_while(|c| c.is_ascii_digit());
        }
        self.token(TokenKind::Number(self.text().to_string()))
    }

    /// `X'..'` after the `X`.
    fn hex(&mut self) -> Token {
        self.bump();
        let digits_start = self.pos;
        self.eat_while(|c| c.is_ascii_hexdigit());
        let digits = self.slice(Span::new(digits_start, self.pos)).to_string();
        match self.bump() {
            Some('\'') => self.token(TokenKind::HexString(digits)),
            Some(_) => self.error("Invalid character in hex literal"),
            None => self.error("Unterminated hex literal"),
        }
    }

    /// `@name`, `@@name`, `@@session.name` after the first `@`.
    fn variable(&mut self) -> Token {
        self.eat('@');
        self.eat_while(|c| ident_char(c) || c == '.');
        self.token(TokenKind::Variable(self.text().to_string()))
    }

    /// `::`, `:name` or a lone `:`.
    fn colon(&mut self) -> Token {
        if self.eat(':') {
            return self.token(TokenKind::DoubleColon);
        }
        if self.peek().is_some_and(|c| c.is_alphabetic() || c == '_') {
            self.eat_while(ident_char);
            let name = self.text().trim_start_matches(':').to_string();
            return self.token(TokenKind::Parameter(name));
        }
        self.token(TokenKind::Colon)
    }

    /// Picks `double` when `second` follows, `single` otherwise.
    fn pair(&mut self, second: char, double: TokenKind, single: TokenKind) -> Token {
        let kind = if self.eat(second) { double } else { single };
        self.token(kind)
    }

    /// Scans the next token; [`TokenKind::Eof`] once the input is exhausted.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();
        self.start = self.pos;
        let Some(c) = self.bump() else {
            return self.token(TokenKind::Eof);
        };

        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' if self.bracket_identifiers => return self.quoted_identifier(']'),
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '~' => TokenKind::BitNot,
            '?' => TokenKind::Question,
            '&' => TokenKind::BitAnd,
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => return self.number(),
            '.' => TokenKind::Dot,
            '@' => return self.variable(),
            ':' => return self.colon(),
            '=' => {
                self.eat('=');
                TokenKind::Eq
            }
            '<' if self.eat('>') => TokenKind::NotEq,
            '<' if self.eat('<') => TokenKind::LeftShift,
            '<' => return self.pair('=', TokenKind::LtEq, TokenKind::Lt),
            '>' if self.eat('>') => TokenKind::RightShift,
            '>' => return self.pair('=', TokenKind::GtEq, TokenKind::Gt),
            '!' => return self.pair('=', TokenKind::NotEq, TokenKind::Bang),
            '|' => return self.pair('|', TokenKind::Concat, TokenKind::BitOr),
            '\'' => return self.string('\''),
            '"' if self.double_quote_identifiers => return self.quoted_identifier('"'),
            '"' => return self.string('"'),
            '`' => return self.quoted_identifier('`'),
            'X' | 'x' if self.peek() == Some('\'') => return self.hex(),
            c if c.is_ascii_digit() => return self.number(),
            c if c.is_alphabetic() || c == '_' => return self.word(),
            c => return self.error(&format!("Unexpected character: {c}")),
        };
        self.token(kind)
    }

    /// Scans the whole input; the last token is always [`TokenKind::Eof`].
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.is_eof();
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn dialect_kinds(input: &str, dialect: Dialect) -> Vec<TokenKind> {
        Lexer::with_dialect(input, dialect)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(token_kinds("   \n\t  "), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            token_kinds("SELECT -- comment\n/* block */ FROM # trailing"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            token_kinds("select FROM wHeRe"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Keyword(Keyword::From),
                TokenKind::Keyword(Keyword::Where),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers_keep_source_text() {
        assert_eq!(
            token_kinds("42 1.50 2.5e-3"),
            vec![
                TokenKind::Number("42".into()),
                TokenKind::Number("1.50".into()),
                TokenKind::Number("2.5e-3".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_with_escaped_quote() {
        assert_eq!(
            token_kinds("'it''s'"),
            vec![TokenKind::String("it's".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_double_quote_depends_on_dialect() {
        assert_eq!(
            dialect_kinds("\"my-table\"", Dialect::PostgreSql),
            vec![TokenKind::QuotedIdentifier("my-table".into()), TokenKind::Eof]
        );
        assert_eq!(
            dialect_kinds("\"abc\" `my-table`", Dialect::MySql),
            vec![
                TokenKind::DoubleQuotedString("abc".into()),
                TokenKind::QuotedIdentifier("my-table".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_bracket_identifiers_in_transact_sql() {
        assert_eq!(
            dialect_kinds("[order details]", Dialect::TransactSql),
            vec![
                TokenKind::QuotedIdentifier("order details".into()),
                TokenKind::Eof
            ]
        );
        assert_eq!(
            dialect_kinds("[1]", Dialect::PostgreSql),
            vec![
                TokenKind::LeftBracket,
                TokenKind::Number("1".into()),
                TokenKind::RightBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_hex_literal() {
        assert_eq!(
            token_kinds("X'4F2a'"),
            vec![TokenKind::HexString("4F2a".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            token_kinds("+ - * / % = != <> < <= > >= || ! ~"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::NotEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
                TokenKind::Concat,
                TokenKind::Bang,
                TokenKind::BitNot,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_placeholders_and_variables() {
        assert_eq!(
            token_kinds("? :name @v @@session.sql_mode ::"),
            vec![
                TokenKind::Question,
                TokenKind::Parameter("name".into()),
                TokenKind::Variable("@v".into()),
                TokenKind::Variable("@@session.sql_mode".into()),
                TokenKind::DoubleColon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_struct_literal_punctuation() {
        assert_eq!(
            token_kinds("{'a': 1}"),
            vec![
                TokenKind::LeftBrace,
                TokenKind::String("a".into()),
                TokenKind::Colon,
                TokenKind::Number("1".into()),
                TokenKind::RightBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_span_tracking_and_slice() {
        let mut lexer = Lexer::new("SELECT toString(id)");
        let tokens = lexer.tokenize();
        assert_eq!(tokens[0].span, Span::new(0, 6));
        assert_eq!(lexer.slice(tokens[1].span), "toString");
    }
}

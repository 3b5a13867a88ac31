//! Pratt expression parser for operator precedence.
//!
//! Operators are carried in the AST as the text they render to, so this
//! module maps tokens straight to operator strings.

use crate::lexer::{Keyword, Token, TokenKind};

/// Binding power of prefix `-`, `+`, `~` and `!`.
pub const UNARY_BP: u8 = 15;

/// Binding power of prefix `NOT`.
pub const NOT_BP: u8 = 3;

/// Binding power of the postfix `::`, `[..]` and `COLLATE` forms.
pub const POSTFIX_BP: u8 = 17;

/// Word operators spelled as bare identifiers rather than keywords.
const WORD_COMPARISONS: [&str; 4] = ["ILIKE", "REGEXP", "RLIKE", "GLOB"];

/// Returns the prefix operator text for a token.
///
/// Returns `None` if the token is not a prefix operator.
#[must_use]
pub const fn prefix_operator(kind: &TokenKind) -> Option<(&'static str, u8)> {
    match kind {
        TokenKind::Minus => Some(("-", UNARY_BP)),
        TokenKind::Plus => Some(("+", UNARY_BP)),
        TokenKind::BitNot => Some(("~", UNARY_BP)),
        TokenKind::Bang => Some(("!", UNARY_BP)),
        TokenKind::Keyword(Keyword::Not) => Some(("NOT", NOT_BP)),
        _ => None,
    }
}

/// Returns the infix binding power for a token.
///
/// Returns `(left_bp, right_bp)` where:
/// - Higher binding power = binds tighter
/// - Left associative: left_bp < right_bp
///
/// Returns `None` if the token is not an infix operator.
#[must_use]
pub fn infix_binding_power(token: &Token) -> Option<(u8, u8)> {
    match &token.kind {
        // Logical OR (lowest precedence)
        TokenKind::Keyword(Keyword::Or) => Some((1, 2)),

        // Logical AND
        TokenKind::Keyword(Keyword::And) => Some((3, 4)),

        // Comparison operators
        TokenKind::Eq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq => Some((5, 6)),

        // IS, IN, BETWEEN, LIKE and their NOT forms
        TokenKind::Keyword(
            Keyword::Is | Keyword::In | Keyword::Between | Keyword::Like | Keyword::Not,
        ) => Some((5, 6)),
        TokenKind::Identifier(word)
            if WORD_COMPARISONS.iter().any(|w| word.eq_ignore_ascii_case(w)) =>
        {
            Some((5, 6))
        }

        // Bitwise OR
        TokenKind::BitOr => Some((7, 8)),

        // Bitwise AND
        TokenKind::BitAnd => Some((9, 10)),

        // Bit shifts
        TokenKind::LeftShift | TokenKind::RightShift => Some((11, 12)),

        // Additive (string concat has same precedence as addition)
        TokenKind::Plus | TokenKind::Minus | TokenKind::Concat => Some((13, 14)),

        // Multiplicative
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some((15, 16)),

        _ => None,
    }
}

/// Returns true if the token starts a postfix form.
#[must_use]
pub const fn is_postfix(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::DoubleColon | TokenKind::LeftBracket | TokenKind::Keyword(Keyword::Collate)
    )
}

/// Converts a plain binary operator token to its operator text.
///
/// `NOT`, `IS`, `IN` and `BETWEEN` need more than one token and are handled
/// by the parser itself. `!=` and `<>` are told apart by the caller, which
/// has the source text.
#[must_use]
pub fn binary_operator(token: &Token) -> Option<&'static str> {
    let op = match &token.kind {
        TokenKind::Plus => "+",
        TokenKind::Minus => "-",
        TokenKind::Star => "*",
        TokenKind::Slash => "/",
        TokenKind::Percent => "%",
        TokenKind::Eq => "=",
        TokenKind::NotEq => "!=",
        TokenKind::Lt => "<",
        TokenKind::LtEq => "<=",
        TokenKind::Gt => ">",
        TokenKind::GtEq => ">=",
        TokenKind::Concat => "||",
        TokenKind::BitAnd => "&",
        TokenKind::BitOr => "|",
        TokenKind::LeftShift => "<<",
        TokenKind::RightShift => ">>",
        TokenKind::Keyword(Keyword::And) => "AND",
        TokenKind::Keyword(Keyword::Or) => "OR",
        TokenKind::Keyword(Keyword::Like) => "LIKE",
        TokenKind::Identifier(word) => {
            return WORD_COMPARISONS
                .into_iter()
                .find(|w| word.eq_ignore_ascii_case(w));
        }
        _ => return None,
    };
    Some(op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Span;

    fn token(kind: TokenKind) -> Token {
        Token::new(kind, Span::new(0, 0))
    }

    #[test]
    fn test_precedence_ordering() {
        // Multiplication should bind tighter than addition
        let add_bp = infix_binding_power(&token(TokenKind::Plus)).unwrap();
        let mul_bp = infix_binding_power(&token(TokenKind::Star)).unwrap();
        assert!(mul_bp.0 > add_bp.0);

        // AND should bind tighter than OR
        let and_bp = infix_binding_power(&token(TokenKind::Keyword(Keyword::And))).unwrap();
        let or_bp = infix_binding_power(&token(TokenKind::Keyword(Keyword::Or))).unwrap();
        assert!(and_bp.0 > or_bp.0);

        // Comparison should bind tighter than logical operators
        let eq_bp = infix_binding_power(&token(TokenKind::Eq)).unwrap();
        assert!(eq_bp.0 > and_bp.0);
    }

    #[test]
    fn test_left_associativity() {
        let (left, right) = infix_binding_power(&token(TokenKind::Plus)).unwrap();
        assert!(left < right);
    }

    #[test]
    fn test_binary_operator_text() {
        assert_eq!(binary_operator(&token(TokenKind::Plus)), Some("+"));
        assert_eq!(binary_operator(&token(TokenKind::Concat)), Some("||"));
        assert_eq!(
            binary_operator(&token(TokenKind::Identifier("ilike".into()))),
            Some("ILIKE")
        );
        assert_eq!(binary_operator(&token(TokenKind::LeftParen)), None);
    }

    #[test]
    fn test_prefix_operator() {
        assert_eq!(prefix_operator(&TokenKind::Minus), Some(("-", UNARY_BP)));
        assert_eq!(
            prefix_operator(&TokenKind::Keyword(Keyword::Not)),
            Some(("NOT", NOT_BP))
        );
        assert_eq!(prefix_operator(&TokenKind::Star), None);
    }

    #[test]
    fn test_word_comparison_binds_like_like() {
        let regexp = infix_binding_power(&token(TokenKind::Identifier("REGEXP".into())));
        let like = infix_binding_power(&token(TokenKind::Keyword(Keyword::Like)));
        assert_eq!(regexp, like);
        assert!(infix_binding_power(&token(TokenKind::Identifier("name".into()))).is_none());
    }
}

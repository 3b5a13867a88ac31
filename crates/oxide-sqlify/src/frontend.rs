//! Front-ends turn SQL text into an AST plus its reference lists.

use crate::ast::Ast;
use crate::dialect::Dialect;
use crate::parser::{ParseError, Parser};

/// What a front-end produces for one SQL text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    pub ast: Ast,
    /// `verb::db::table` entries, `null` for a missing db.
    pub table_list: Vec<String>,
    /// `verb::table::column` entries, `null` for a missing table.
    pub column_list: Vec<String>,
}

/// A grammar that can parse SQL for one dialect name.
pub trait Frontend: Send + Sync {
    /// Parses `sql`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the text is not valid for this grammar.
    fn parse(&self, sql: &str) -> Result<ParseOutput, ParseError>;
}

/// The built-in hand-written grammar, configured for one dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrammarFrontend {
    dialect: Dialect,
}

impl GrammarFrontend {
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }
}

impl Frontend for GrammarFrontend {
    fn parse(&self, sql: &str) -> Result<ParseOutput, ParseError> {
        let mut parser = Parser::new(sql, self.dialect);
        let ast = parser.parse()?;
        let references = parser.into_references();
        Ok(ParseOutput {
            ast,
            table_list: references.table_list(),
            column_list: references.column_list(),
        })
    }
}

//! Abstract Syntax Tree (AST) types for SQL statements.
//!
//! The tree mirrors the JSON shape front-ends exchange: every expression node
//! is tagged by `type`. Deserialization is lenient and normalizes legacy
//! spellings once, so renderers only ever see the canonical form.

mod de;
mod expr;
mod limit;
mod statement;
mod types;

pub use expr::{
    AggrArgs, AggrFunc, AnyValue, ArrayAccess, ArrayLiteral, Assign, BinaryExpr, BoolLiteral,
    Case, CaseArm, Cast, Collate, ColumnName, ColumnRef, Expr, ExprList, Extract, ExtractArgs,
    Flatten, FuncArg, FulltextSearch, Function, Interval, JsonExpr, JsonKeyValue, JsonObjectArg,
    JsonVisitor, Lambda, MapEntry, MapObject, NamedArg, NamedWindow, NamedWindows, NullLiteral,
    NumberLiteral, Over, StarLiteral, StructLiteral, TableFunc, TableList, TextLiteral,
    UnaryExpr, Unnest, Var, WindowFunc, Wrapped,
};
pub use limit::{Limit, LimitSpec};
pub use statement::{
    Column, Columns, CreateStatement, Cte, DeleteStatement, DropStatement, InsertSource,
    InsertStatement, OnDuplicateUpdate, OrderByItem, Returning, SelectStatement, SetItem,
    ShowStatement, Statement, TableExpr, TableOption, UpdateStatement,
};
pub use types::{ColumnDefinition, DataType};

use serde::{Deserialize, Serialize};

/// The result of parsing: one statement, or several separated by `;`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ast {
    Multiple(Vec<Statement>),
    Single(Statement),
}

impl Ast {
    /// Returns the statements in source order.
    #[must_use]
    pub fn statements(&self) -> &[Statement] {
        match self {
            Self::Single(stmt) => core::slice::from_ref(stmt),
            Self::Multiple(stmts) => stmts,
        }
    }

    /// Collapses a one-element list into [`Ast::Single`].
    #[must_use]
    pub fn from_statements(mut stmts: Vec<Statement>) -> Self {
        if stmts.len() == 1 {
            if let Some(stmt) = stmts.pop() {
                return Self::Single(stmt);
            }
        }
        Self::Multiple(stmts)
    }
}

impl From<Statement> for Ast {
    fn from(stmt: Statement) -> Self {
        Self::Single(stmt)
    }
}

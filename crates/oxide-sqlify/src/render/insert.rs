//! INSERT and REPLACE rendering.

use super::{connector, join_fragments, Renderer};
use crate::ast::{Expr, InsertSource, InsertStatement};
use crate::Result;

impl Renderer {
    /// Renders an INSERT, or a REPLACE when `verb` says so.
    ///
    /// # Errors
    ///
    /// See [`Renderer::expr`].
    pub fn insert(&self, verb: &str, insert: &InsertStatement) -> Result<String> {
        let columns = match &insert.columns {
            Some(columns) if !columns.is_empty() => {
                let columns: Vec<String> = columns.iter().map(|c| self.ident(c)).collect();
                format!("({})", columns.join(", "))
            }
            _ => String::new(),
        };
        let source = match &insert.values {
            Some(InsertSource::Values(rows)) => {
                let rows = rows.iter().map(|row| self.row(row)).collect::<Result<Vec<_>>>()?;
                connector("VALUES", &rows.join(", "))
            }
            Some(InsertSource::Query(query)) => self.expr(query)?,
            None => String::new(),
        };
        let on_duplicate = match &insert.on_duplicate_update {
            Some(update) => connector("ON DUPLICATE KEY UPDATE", &self.set_items(&update.set)?),
            None => String::new(),
        };
        Ok(join_fragments([
            verb.to_string(),
            insert.prefix.as_deref().unwrap_or("into").to_uppercase(),
            self.tables(&insert.table)?,
            columns,
            source,
            on_duplicate,
            self.returning(insert.returning.as_ref())?,
        ]))
    }

    /// One VALUES row, always parenthesized.
    fn row(&self, row: &Expr) -> Result<String> {
        match row {
            Expr::ExprList(list) => Ok(format!("({})", self.exprs(&list.value)?.join(", "))),
            other => Ok(format!("({})", self.expr(other)?)),
        }
    }
}

//! DELETE rendering.

use super::{join_fragments, Renderer};
use crate::ast::{Column, DeleteStatement, Expr, TableExpr};
use crate::Result;

impl Renderer {
    /// Renders a DELETE statement.
    ///
    /// In multi-table forms the deleted tables are printed between `DELETE`
    /// and `FROM`. Entries flagged `addition` only exist to populate FROM and
    /// are never printed there; some dialects never print the segment.
    ///
    /// # Errors
    ///
    /// See [`Renderer::expr`].
    pub fn delete(&self, delete: &DeleteStatement) -> Result<String> {
        let targets = if self.dialect().prints_delete_table_refs() {
            self.delete_targets(delete)?
        } else {
            String::new()
        };
        let from = delete.from.as_deref().or(delete.table.as_deref());
        Ok(join_fragments([
            self.with_clause(delete.with.as_deref())?,
            "DELETE".to_string(),
            targets,
            self.from_clause(from)?,
            self.where_clause(delete.where_clause.as_deref())?,
            self.order_by(delete.orderby.as_deref())?,
            self.limit(delete.limit.as_ref())?,
            self.returning(delete.returning.as_ref())?,
        ]))
    }

    fn delete_targets(&self, delete: &DeleteStatement) -> Result<String> {
        if let Some(columns) = delete.columns.as_deref().filter(|c| !c.is_empty()) {
            let mut refs = Vec::with_capacity(columns.len());
            for column in columns {
                let rendered = self.delete_target(column, delete.from.as_deref())?;
                if !rendered.is_empty() {
                    refs.push(rendered);
                }
            }
            return Ok(refs.join(", "));
        }
        if let Some(tables) = delete.table.as_deref() {
            let shown: Vec<TableExpr> = tables.iter().filter(|t| !t.addition).cloned().collect();
            if !shown.is_empty() {
                return self.tables(&shown);
            }
        }
        Ok(String::new())
    }

    /// A `columns` entry names a table (`t.*`), or a bare table name.
    fn delete_target(&self, column: &Column, from: Option<&[TableExpr]>) -> Result<String> {
        match &column.expr {
            Expr::ColumnRef(col) => {
                if let Some(table) = &col.table {
                    let target = TableExpr {
                        db: col.db.clone(),
                        ..TableExpr::table(table.clone())
                    };
                    self.table(&target)
                } else {
                    Ok(col
                        .column
                        .text()
                        .map(|name| self.ident(&name))
                        .unwrap_or_default())
                }
            }
            _ => {
                let columns = crate::ast::Columns::List(vec![column.clone()]);
                Ok(self.columns(&columns, from)?.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Column, DeleteStatement, Expr, Limit, TableExpr};
    use crate::dialect::Dialect;
    use crate::render::{RenderConfig, Renderer};

    fn render(dialect: Dialect, delete: &DeleteStatement) -> String {
        Renderer::new(RenderConfig::new(dialect)).delete(delete).unwrap()
    }

    fn multi_table() -> DeleteStatement {
        DeleteStatement {
            table: Some(vec![
                TableExpr::table("t1").addition(),
                TableExpr::table("t2"),
            ]),
            from: Some(vec![
                TableExpr::table("t1"),
                TableExpr::table("t2").join(
                    "inner join",
                    Some(Expr::qualified_column("t1", "id").binary("=", Expr::qualified_column("t2", "id"))),
                ),
            ]),
            ..DeleteStatement::default()
        }
    }

    #[test]
    fn test_addition_entries_are_suppressed() {
        let sql = render(Dialect::MySql, &multi_table());
        assert_eq!(
            sql,
            "DELETE `t2` FROM `t1` INNER JOIN `t2` ON `t1`.`id` = `t2`.`id`"
        );
    }

    #[test]
    fn test_only_addition_entries_omit_segment() {
        let delete = DeleteStatement {
            table: Some(vec![TableExpr::table("users").addition()]),
            from: Some(vec![TableExpr::table("users")]),
            where_clause: Some(Box::new(Expr::column("id").binary("=", Expr::number(1)))),
            ..DeleteStatement::default()
        };
        assert_eq!(render(Dialect::MySql, &delete), "DELETE FROM `users` WHERE `id` = 1");
    }

    #[test]
    fn test_clickhouse_never_prints_targets() {
        let sql = render(Dialect::ClickHouse, &multi_table());
        assert!(sql.starts_with("DELETE FROM "), "{sql}");
    }

    #[test]
    fn test_columns_targets() {
        let delete = DeleteStatement {
            columns: Some(vec![
                Column::new(Expr::ColumnRef(crate::ast::ColumnRef::star().with_table("a"))),
                Column::new(Expr::column("b")),
            ]),
            from: Some(vec![TableExpr::table("a"), TableExpr::table("b")]),
            ..DeleteStatement::default()
        };
        assert_eq!(render(Dialect::MySql, &delete), "DELETE `a`, `b` FROM `a`, `b`");
    }

    #[test]
    fn test_from_falls_back_to_table() {
        let delete = DeleteStatement {
            table: Some(vec![TableExpr::table("logs")]),
            limit: Some(Limit::count(Expr::number(10))),
            ..DeleteStatement::default()
        };
        assert_eq!(render(Dialect::Sqlite, &delete), "DELETE \"logs\" FROM \"logs\" LIMIT 10");
    }
}

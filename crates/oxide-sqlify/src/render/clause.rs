//! Clause fragments shared by several statements.

use super::{connector, Renderer};
use crate::ast::{Cte, Expr, Returning, SetItem, TableExpr};
use crate::Result;

impl Renderer {
    /// `WITH [RECURSIVE] name[(cols)] AS (query), ..`
    pub(crate) fn with_clause(&self, ctes: Option<&[Cte]>) -> Result<String> {
        let Some(ctes) = ctes.filter(|c| !c.is_empty()) else {
            return Ok(String::new());
        };
        let recursive = ctes.first().is_some_and(|cte| cte.recursive);
        let mut rendered = Vec::with_capacity(ctes.len());
        for cte in ctes {
            let mut name = self.ident(&cte.name);
            if let Some(columns) = &cte.columns {
                let columns: Vec<String> = columns.iter().map(|c| self.ident(c)).collect();
                name.push_str(&format!("({})", columns.join(", ")));
            }
            rendered.push(format!("{name} AS {}", self.subquery(&cte.stmt)?));
        }
        let keyword = if recursive { "WITH RECURSIVE" } else { "WITH" };
        Ok(connector(keyword, &rendered.join(", ")))
    }

    /// Renders a query that must sit inside parentheses.
    pub(crate) fn subquery(&self, expr: &Expr) -> Result<String> {
        match expr {
            Expr::Select(select) if !select.parentheses => Ok(format!("({})", self.select(select)?)),
            Expr::Select(_) | Expr::ExprList(_) => self.expr(expr),
            other => Ok(format!("({})", self.expr(other)?)),
        }
    }

    /// Renders one table reference without its join keyword.
    pub(crate) fn table(&self, table: &TableExpr) -> Result<String> {
        if table.is_dual() {
            return Ok("DUAL".to_string());
        }
        let mut sql = match &table.expr {
            Some(expr) => match expr.as_ref() {
                Expr::Select(_) => self.subquery(expr)?,
                other => self.expr(other)?,
            },
            None => [&table.db, &table.schema, &table.table]
                .into_iter()
                .flatten()
                .map(|part| self.ident(part))
                .collect::<Vec<_>>()
                .join("."),
        };
        if let Some(alias) = &table.alias {
            let alias = self.ident(alias);
            if self.dialect().table_alias_keyword() {
                sql.push_str(&format!(" AS {alias}"));
            } else {
                sql.push_str(&format!(" {alias}"));
            }
        }
        Ok(sql)
    }

    /// Renders a FROM list: joins are space-separated, plain entries
    /// comma-separated.
    pub(crate) fn tables(&self, tables: &[TableExpr]) -> Result<String> {
        let mut sql = String::new();
        for (i, table) in tables.iter().enumerate() {
            let rendered = self.table(table)?;
            match &table.join {
                Some(join) if i > 0 => {
                    sql.push(' ');
                    sql.push_str(&join.to_uppercase());
                    sql.push(' ');
                    sql.push_str(&rendered);
                    if let Some(on) = &table.on {
                        sql.push_str(" ON ");
                        sql.push_str(&self.expr(on)?);
                    } else if let Some(using) = &table.using {
                        let using: Vec<String> = using.iter().map(|c| self.ident(c)).collect();
                        sql.push_str(&format!(" USING ({})", using.join(", ")));
                    }
                }
                _ => {
                    if i > 0 {
                        sql.push_str(", ");
                    }
                    sql.push_str(&rendered);
                }
            }
        }
        Ok(sql)
    }

    /// `FROM <tables>`; empty when absent.
    pub(crate) fn from_clause(&self, tables: Option<&[TableExpr]>) -> Result<String> {
        match tables {
            Some(tables) if !tables.is_empty() => Ok(connector("FROM", &self.tables(tables)?)),
            _ => Ok(String::new()),
        }
    }

    /// `WHERE <expr>`; empty when absent.
    pub(crate) fn where_clause(&self, expr: Option<&Expr>) -> Result<String> {
        match expr {
            Some(expr) => Ok(connector("WHERE", &self.expr(expr)?)),
            None => Ok(String::new()),
        }
    }

    /// `RETURNING <columns>`; empty when absent.
    pub(crate) fn returning(&self, returning: Option<&Returning>) -> Result<String> {
        match returning {
            Some(returning) => Ok(connector(
                "RETURNING",
                &self.select_list(&returning.columns, None)?,
            )),
            None => Ok(String::new()),
        }
    }

    /// `a = 1, t.b = 2`
    pub(crate) fn set_items(&self, items: &[SetItem]) -> Result<String> {
        let mut rendered = Vec::with_capacity(items.len());
        for item in items {
            let column = match &item.table {
                Some(table) => format!("{}.{}", self.ident(table), self.ident(&item.column)),
                None => self.ident(&item.column),
            };
            rendered.push(format!("{column} = {}", self.expr(&item.value)?));
        }
        Ok(rendered.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Columns, SelectStatement};
    use crate::dialect::Dialect;
    use crate::render::RenderConfig;

    fn renderer(dialect: Dialect) -> Renderer {
        Renderer::new(RenderConfig::new(dialect))
    }

    #[test]
    fn test_table_alias_per_dialect() {
        let table = TableExpr::table("users").alias("u");
        assert_eq!(renderer(Dialect::MySql).table(&table).unwrap(), "`users` AS `u`");
        assert_eq!(renderer(Dialect::DuckDb).table(&table).unwrap(), "\"users\" \"u\"");
    }

    #[test]
    fn test_join_list() {
        let tables = vec![
            TableExpr::table("orders").alias("o"),
            TableExpr::table("users").alias("u").join(
                "left join",
                Some(Expr::qualified_column("o", "user_id").binary("=", Expr::qualified_column("u", "id"))),
            ),
            TableExpr::table("extra"),
        ];
        assert_eq!(
            renderer(Dialect::PostgreSql).tables(&tables).unwrap(),
            "\"orders\" AS \"o\" LEFT JOIN \"users\" AS \"u\" ON \"o\".\"user_id\" = \"u\".\"id\", \"extra\""
        );
    }

    #[test]
    fn test_derived_table_is_parenthesized() {
        let inner = SelectStatement::from_table(Columns::All, TableExpr::table("t"));
        let derived = TableExpr::derived(Expr::from(inner)).alias("d");
        assert_eq!(
            renderer(Dialect::PostgreSql).table(&derived).unwrap(),
            "(SELECT * FROM \"t\") AS \"d\""
        );
    }

    #[test]
    fn test_with_clause() {
        let cte = Cte {
            name: "recent".to_string(),
            columns: None,
            stmt: Box::new(Expr::from(SelectStatement::from_table(
                Columns::All,
                TableExpr::table("events"),
            ))),
            recursive: false,
        };
        assert_eq!(
            renderer(Dialect::PostgreSql).with_clause(Some(&[cte])).unwrap(),
            "WITH \"recent\" AS (SELECT * FROM \"events\")"
        );
        assert_eq!(renderer(Dialect::MySql).with_clause(None).unwrap(), "");
    }

    #[test]
    fn test_dual_and_returning() {
        let r = renderer(Dialect::MySql);
        assert_eq!(r.table(&TableExpr::dual()).unwrap(), "DUAL");
        let returning = Returning { columns: Columns::All };
        assert_eq!(r.returning(Some(&returning)).unwrap(), "RETURNING *");
        assert_eq!(r.returning(None).unwrap(), "");
    }
}

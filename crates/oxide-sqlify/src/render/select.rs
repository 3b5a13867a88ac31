//! SELECT rendering, including set-operation chains.

use super::{connector, join_fragments, wrap, Renderer};
use crate::ast::SelectStatement;
use crate::Result;

impl Renderer {
    /// Renders a SELECT and any statements chained through `_next`.
    ///
    /// # Errors
    ///
    /// See [`Renderer::expr`].
    pub fn select(&self, select: &SelectStatement) -> Result<String> {
        let mut sql = self.select_core(select)?;
        let mut current = select;
        while let Some(next) = &current.next {
            let op = current.set_op.as_deref().unwrap_or("union").to_uppercase();
            sql = format!("{sql} {op} {}", self.select_core(next)?);
            current = next;
        }
        Ok(wrap(sql, select.parentheses))
    }

    fn select_core(&self, select: &SelectStatement) -> Result<String> {
        let from = select.from.as_deref();
        let group_by = match &select.groupby {
            Some(items) => connector("GROUP BY", &self.exprs(items)?.join(", ")),
            None => String::new(),
        };
        let having = match &select.having {
            Some(expr) => connector("HAVING", &self.expr(expr)?),
            None => String::new(),
        };
        let window = match &select.window {
            Some(windows) => connector("WINDOW", &self.named_windows(windows)?),
            None => String::new(),
        };
        Ok(join_fragments([
            self.with_clause(select.with.as_deref())?,
            "SELECT".to_string(),
            if select.distinct { "DISTINCT" } else { "" }.to_string(),
            self.select_list(&select.columns, from)?,
            self.from_clause(from)?,
            self.where_clause(select.where_clause.as_deref())?,
            group_by,
            having,
            window,
            self.order_by(select.orderby.as_deref())?,
            self.limit(select.limit.as_ref())?,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Column, Columns, Expr, Limit, OrderByItem, SelectStatement, TableExpr};
    use crate::dialect::Dialect;
    use crate::render::{RenderConfig, Renderer};

    fn render(dialect: Dialect, select: &SelectStatement) -> String {
        Renderer::new(RenderConfig::new(dialect)).select(select).unwrap()
    }

    #[test]
    fn test_star_is_bare_in_every_dialect() {
        let select = SelectStatement::from_table(Columns::All, TableExpr::table("t"));
        for dialect in Dialect::ALL {
            let sql = render(dialect, &select);
            assert!(sql.starts_with("SELECT * FROM "), "{dialect}: {sql}");
            assert!(sql.contains('t'));
        }
    }

    #[test]
    fn test_full_select() {
        let mut select = SelectStatement::from_table(
            Columns::List(vec![
                Column::new(Expr::column("status")),
                Column::new(Expr::function("count", vec![Expr::star()])).alias("n"),
            ]),
            TableExpr::table("orders"),
        );
        select.distinct = true;
        select.where_clause = Some(Box::new(Expr::column("total").binary(">", Expr::number(10))));
        select.groupby = Some(vec![Expr::column("status")]);
        select.having = Some(Box::new(
            Expr::function("count", vec![Expr::star()]).binary(">", Expr::number(1)),
        ));
        select.orderby = Some(vec![OrderByItem::new(Expr::column("status")).direction("DESC")]);
        select.limit = Some(Limit::count(Expr::number(5)));
        assert_eq!(
            render(Dialect::MySql, &select),
            "SELECT DISTINCT `status`, count(*) AS n FROM `orders` WHERE `total` > 10 \
             GROUP BY `status` HAVING count(*) > 1 ORDER BY `status` DESC LIMIT 5"
        );
    }

    #[test]
    fn test_union_chain() {
        let mut first = SelectStatement::from_table(Columns::All, TableExpr::table("a"));
        first.set_op = Some("union all".to_string());
        first.next = Some(Box::new(SelectStatement::from_table(
            Columns::All,
            TableExpr::table("b"),
        )));
        assert_eq!(
            render(Dialect::PostgreSql, &first),
            "SELECT * FROM \"a\" UNION ALL SELECT * FROM \"b\""
        );
    }

    #[test]
    fn test_select_without_from() {
        let select = SelectStatement {
            columns: Columns::List(vec![Column::new(Expr::number(1))]),
            ..SelectStatement::default()
        };
        assert_eq!(render(Dialect::Sqlite, &select), "SELECT 1");
    }
}

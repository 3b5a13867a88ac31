//! UPDATE rendering.

use super::{connector, join_fragments, Renderer};
use crate::ast::UpdateStatement;
use crate::Result;

impl Renderer {
    /// Renders an UPDATE statement.
    ///
    /// # Errors
    ///
    /// See [`Renderer::expr`].
    pub fn update(&self, update: &UpdateStatement) -> Result<String> {
        Ok(join_fragments([
            self.with_clause(update.with.as_deref())?,
            "UPDATE".to_string(),
            self.tables(&update.table)?,
            connector("SET", &self.set_items(&update.set)?),
            self.from_clause(update.from.as_deref())?,
            self.where_clause(update.where_clause.as_deref())?,
            self.order_by(update.orderby.as_deref())?,
            self.limit(update.limit.as_ref())?,
            self.returning(update.returning.as_ref())?,
        ]))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Columns, Expr, Returning, SetItem, TableExpr, UpdateStatement};
    use crate::dialect::Dialect;
    use crate::render::{RenderConfig, Renderer};

    #[test]
    fn test_update_with_returning() {
        let update = UpdateStatement {
            with: None,
            table: vec![TableExpr::table("users")],
            set: vec![
                SetItem::new("name", Expr::string("Bob")),
                SetItem::new("age", Expr::column("age").binary("+", Expr::number(1))),
            ],
            from: None,
            where_clause: Some(Box::new(Expr::column("id").binary("=", Expr::number(1)))),
            orderby: None,
            limit: None,
            returning: Some(Returning { columns: Columns::All }),
        };
        let renderer = Renderer::new(RenderConfig::new(Dialect::PostgreSql));
        assert_eq!(
            renderer.update(&update).unwrap(),
            "UPDATE \"users\" SET \"name\" = 'Bob', \"age\" = \"age\" + 1 WHERE \"id\" = 1 RETURNING *"
        );
    }

    #[test]
    fn test_qualified_set_column() {
        let mut item = SetItem::new("total", Expr::number(0));
        item.table = Some("o".to_string());
        let update = UpdateStatement {
            with: None,
            table: vec![TableExpr::table("orders").alias("o")],
            set: vec![item],
            from: None,
            where_clause: None,
            orderby: None,
            limit: None,
            returning: None,
        };
        let renderer = Renderer::new(RenderConfig::new(Dialect::MySql));
        assert_eq!(
            renderer.update(&update).unwrap(),
            "UPDATE `orders` AS `o` SET `o`.`total` = 0"
        );
    }
}

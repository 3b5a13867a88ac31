//! CREATE, DROP and SHOW rendering.

use super::{join_fragments, Renderer};
use crate::ast::{CreateStatement, DropStatement, ShowStatement, TableOption};
use crate::Result;

impl Renderer {
    /// Renders CREATE TABLE / VIEW / DATABASE / SCHEMA.
    ///
    /// # Errors
    ///
    /// See [`Renderer::expr`].
    pub fn create(&self, create: &CreateStatement) -> Result<String> {
        let keyword = create.keyword.to_uppercase();
        let name = match (&create.table, &create.database) {
            (Some(tables), _) if !tables.is_empty() => self.tables(tables)?,
            (_, Some(database)) => self.ident(database),
            _ => String::new(),
        };
        let definitions = match &create.create_definitions {
            Some(defs) if !defs.is_empty() => format!("({})", self.exprs(defs)?.join(", ")),
            _ => String::new(),
        };
        let options = create
            .table_options
            .as_deref()
            .map(|options| options.iter().map(table_option).collect::<Vec<_>>().join(" "))
            .unwrap_or_default();
        let query = match &create.query_expr {
            Some(query) => format!("AS {}", self.expr(query)?),
            None => String::new(),
        };
        Ok(join_fragments([
            "CREATE".to_string(),
            if create.or_replace { "OR REPLACE" } else { "" }.to_string(),
            if create.temporary { "TEMPORARY" } else { "" }.to_string(),
            keyword,
            if create.if_not_exists { "IF NOT EXISTS" } else { "" }.to_string(),
            name,
            definitions,
            options,
            query,
        ]))
    }

    /// `DROP <KEYWORD> [IF EXISTS] <names>`
    #[must_use]
    pub fn drop_statement(&self, drop: &DropStatement) -> String {
        let names: Vec<String> = drop
            .name
            .iter()
            .map(|table| {
                [&table.db, &table.schema, &table.table]
                    .into_iter()
                    .flatten()
                    .map(|part| self.ident(part))
                    .collect::<Vec<_>>()
                    .join(".")
            })
            .collect();
        join_fragments([
            "DROP".to_string(),
            drop.keyword.to_uppercase(),
            if drop.if_exists { "IF EXISTS" } else { "" }.to_string(),
            names.join(", "),
        ])
    }

    /// `SHOW <KEYWORD>`
    #[must_use]
    pub fn show(show: &ShowStatement) -> String {
        format!("SHOW {}", show.keyword.to_uppercase())
    }
}

/// `ENGINE = MergeTree`; values are kept as written.
fn table_option(option: &TableOption) -> String {
    match &option.symbol {
        Some(symbol) => format!("{} {symbol} {}", option.keyword.to_uppercase(), option.value),
        None => format!("{} {}", option.keyword.to_uppercase(), option.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ColumnDefinition, DataType, Expr, TableExpr};
    use crate::dialect::Dialect;
    use crate::render::RenderConfig;

    fn create_table(if_not_exists: bool) -> CreateStatement {
        CreateStatement {
            keyword: "table".to_string(),
            or_replace: false,
            temporary: false,
            if_not_exists,
            table: Some(vec![TableExpr::table("test")]),
            database: None,
            create_definitions: Some(vec![
                Expr::ColumnDefinition(Box::new(
                    ColumnDefinition::new("id", DataType::new("INTEGER")).primary_key(),
                )),
                Expr::ColumnDefinition(Box::new(
                    ColumnDefinition::new("name", DataType::new("VARCHAR").with_length(50)).not_null(),
                )),
            ]),
            table_options: None,
            query_expr: None,
        }
    }

    #[test]
    fn test_create_table() {
        let renderer = Renderer::new(RenderConfig::new(Dialect::DuckDb));
        assert_eq!(
            renderer.create(&create_table(true)).unwrap(),
            "CREATE TABLE IF NOT EXISTS \"test\" (\"id\" INTEGER PRIMARY KEY, \"name\" VARCHAR(50) NOT NULL)"
        );
    }

    #[test]
    fn test_table_options() {
        let mut create = create_table(false);
        create.table_options = Some(vec![TableOption {
            keyword: "engine".to_string(),
            symbol: Some("=".to_string()),
            value: "MergeTree".to_string(),
        }]);
        let renderer = Renderer::new(RenderConfig::new(Dialect::ClickHouse));
        assert!(renderer.create(&create).unwrap().ends_with(") ENGINE = MergeTree"));
    }

    #[test]
    fn test_create_database() {
        let create = CreateStatement {
            keyword: "database".to_string(),
            or_replace: false,
            temporary: false,
            if_not_exists: false,
            table: None,
            database: Some("analytics".to_string()),
            create_definitions: None,
            table_options: None,
            query_expr: None,
        };
        let renderer = Renderer::new(RenderConfig::new(Dialect::MySql));
        assert_eq!(renderer.create(&create).unwrap(), "CREATE DATABASE `analytics`");
    }

    #[test]
    fn test_drop_and_show() {
        let renderer = Renderer::new(RenderConfig::new(Dialect::DuckDb));
        let drop = DropStatement {
            keyword: "table".to_string(),
            if_exists: true,
            name: vec![TableExpr::table("test")],
        };
        assert_eq!(renderer.drop_statement(&drop), "DROP TABLE IF EXISTS \"test\"");
        let show = ShowStatement {
            keyword: "databases".to_string(),
        };
        assert_eq!(Renderer::show(&show), "SHOW DATABASES");
    }
}

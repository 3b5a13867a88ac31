//! Column references, column definitions and select-list columns.

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use super::registry::ColumnRenderer;
use super::{wrap, Renderer};
use crate::ast::{
    Column, ColumnDefinition, ColumnName, ColumnRef, Columns, Expr, FulltextSearch, TableExpr,
};
use crate::Result;

/// Aliases matching this pattern are printed without quotes.
fn plain_alias() -> Option<&'static Regex> {
    static PLAIN_ALIAS: OnceLock<Option<Regex>> = OnceLock::new();
    PLAIN_ALIAS
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").ok())
        .as_ref()
}

/// The standard [`ColumnRenderer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardColumns;

impl StandardColumns {
    /// Renders the name slot of a column reference.
    fn column_name(renderer: &Renderer, name: &ColumnName) -> Result<String> {
        match name {
            ColumnName::Star => Ok("*".to_string()),
            ColumnName::Name(name) => Ok(renderer.ident(name)),
            ColumnName::Expr(expr) => match expr.as_ref() {
                Expr::String(lit)
                | Expr::DoubleQuoteString(lit)
                | Expr::BackticksQuoteString(lit)
                | Expr::Default(lit) => Ok(renderer.ident(&lit.value)),
                other => renderer.expr(other),
            },
        }
    }
}

impl ColumnRenderer for StandardColumns {
    fn column_ref(&self, renderer: &Renderer, column: &ColumnRef) -> Result<String> {
        let mut parts: Vec<String> = [&column.db, &column.schema, &column.table]
            .into_iter()
            .flatten()
            .map(|q| renderer.ident(q))
            .collect();
        parts.push(Self::column_name(renderer, &column.column)?);
        let mut sql = parts.join(".");
        if let Some(collate) = &column.collate {
            sql.push_str(" COLLATE ");
            sql.push_str(collate);
        }
        Ok(wrap(sql, column.parentheses))
    }

    fn fulltext_search(&self, renderer: &Renderer, search: &FulltextSearch) -> Result<String> {
        let columns = search
            .columns
            .iter()
            .map(|col| self.column_ref(renderer, col))
            .collect::<Result<Vec<_>>>()?;
        let mut against = renderer.expr(&search.expr)?;
        if let Some(mode) = &search.mode {
            against.push(' ');
            against.push_str(&mode.to_uppercase());
        }
        Ok(format!(
            "{} ({}) {} ({against})",
            search.match_keyword.as_deref().unwrap_or("MATCH").to_uppercase(),
            columns.join(", "),
            search.against.as_deref().unwrap_or("AGAINST").to_uppercase(),
        ))
    }

    fn column_definition(&self, renderer: &Renderer, def: &ColumnDefinition) -> Result<String> {
        let upper = |v: &Option<String>| v.as_deref().map(str::to_uppercase).unwrap_or_default();
        let default = match &def.default_val {
            Some(expr) => format!("DEFAULT {}", renderer.expr(expr)?),
            None => String::new(),
        };
        let comment = match &def.comment {
            Some(expr) => format!("COMMENT {}", renderer.expr(expr)?),
            None => String::new(),
        };
        Ok(super::join_fragments([
            Self::column_name(renderer, &def.column.column)?,
            renderer.data_type(&def.definition)?,
            upper(&def.nullable),
            default,
            upper(&def.auto_increment),
            upper(&def.unique),
            upper(&def.primary_key),
            comment,
            def.collate
                .as_deref()
                .map(|c| format!("COLLATE {c}"))
                .unwrap_or_default(),
        ]))
    }
}

/// `column_ref` without a registered renderer: qualifiers and name quoted.
pub(crate) fn fallback_column_ref(renderer: &Renderer, column: &ColumnRef) -> String {
    warn!("Column renderer not registered, using fallback");
    match &column.column {
        ColumnName::Star => {
            let mut parts: Vec<String> = [&column.db, &column.schema, &column.table]
                .into_iter()
                .flatten()
                .map(|q| renderer.ident(q))
                .collect();
            parts.push("*".to_string());
            parts.join(".")
        }
        ColumnName::Name(name) => renderer.ident(name),
        ColumnName::Expr(expr) => expr
            .literal_text()
            .map(|text| renderer.ident(&text))
            .unwrap_or_default(),
    }
}

/// `fulltext_search` without a registered renderer.
pub(crate) fn fallback_fulltext_search(search: &FulltextSearch) -> String {
    warn!("Full-text renderer not registered, using fallback");
    let names: Vec<String> = search
        .columns
        .iter()
        .map(|col| col.column.text().unwrap_or_else(|| "column".to_string()))
        .collect();
    let names = if names.is_empty() {
        "column".to_string()
    } else {
        names.join(", ")
    };
    format!(
        "{} ({names}) {} (?)",
        search.match_keyword.as_deref().unwrap_or("MATCH").to_uppercase(),
        search.against.as_deref().unwrap_or("AGAINST").to_uppercase(),
    )
}

/// `column_definition` without a registered renderer: name and bare type.
pub(crate) fn fallback_column_definition(renderer: &Renderer, def: &ColumnDefinition) -> String {
    warn!("Column definition renderer not registered, using fallback");
    let name = def.name().map(|n| renderer.ident(&n)).unwrap_or_default();
    format!("{name} {}", def.definition.name).trim().to_string()
}

impl Renderer {
    /// Renders a select-list alias: plain names bare, anything else quoted.
    pub(crate) fn alias(&self, alias: &str) -> String {
        let plain = plain_alias().is_some_and(|re| re.is_match(alias));
        if plain {
            alias.to_string()
        } else {
            self.ident(alias)
        }
    }

    /// Renders one select-list entry.
    ///
    /// Against `DUAL`, unqualified column names are printed as written.
    ///
    /// # Errors
    ///
    /// See [`Renderer::expr`].
    pub fn column(&self, column: &Column, is_dual: bool) -> Result<String> {
        let expr = match &column.expr {
            Expr::ColumnRef(col) if is_dual && col.table.is_none() => match &col.column {
                ColumnName::Name(name) => name.clone(),
                _ => self.expr(&column.expr)?,
            },
            other => self.expr(other)?,
        };
        Ok(match &column.alias {
            Some(alias) => format!("{expr} AS {}", self.alias(alias)),
            None => expr,
        })
    }

    /// Renders a select list; `*` yields no entries.
    ///
    /// # Errors
    ///
    /// See [`Renderer::expr`].
    pub fn columns(&self, columns: &Columns, tables: Option<&[TableExpr]>) -> Result<Vec<String>> {
        let Columns::List(columns) = columns else {
            return Ok(Vec::new());
        };
        let is_dual = tables
            .and_then(<[TableExpr]>::first)
            .is_some_and(TableExpr::is_dual);
        columns.iter().map(|col| self.column(col, is_dual)).collect()
    }

    /// `*` or the comma-joined select list.
    pub(crate) fn select_list(
        &self,
        columns: &Columns,
        tables: Option<&[TableExpr]>,
    ) -> Result<String> {
        match columns {
            Columns::All => Ok("*".to_string()),
            list => Ok(self.columns(list, tables)?.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::DataType;
    use crate::dialect::Dialect;
    use crate::render::{ExtensionRegistry, RenderConfig};

    fn renderer(dialect: Dialect) -> Renderer {
        Renderer::new(RenderConfig::new(dialect))
    }

    fn bare(dialect: Dialect) -> Renderer {
        Renderer::with_registry(RenderConfig::new(dialect), ExtensionRegistry::new())
    }

    #[test]
    fn test_column_ref_quoting() {
        let r = renderer(Dialect::PostgreSql);
        let col = ColumnRef::new("my-col").with_table("my-table");
        assert_eq!(r.expr(&Expr::ColumnRef(col)).unwrap(), "\"my-table\".\"my-col\"");
        let r = renderer(Dialect::MySql);
        assert_eq!(r.expr(&Expr::column("my-col")).unwrap(), "`my-col`");
    }

    #[test]
    fn test_fallback_column_ref_never_fails() {
        let r = bare(Dialect::MySql);
        let mut star = ColumnRef::star().with_table("t");
        star.db = Some("db".to_string());
        assert_eq!(r.expr(&Expr::ColumnRef(star)).unwrap(), "`db`.`t`.*");
        assert_eq!(r.expr(&Expr::column("id")).unwrap(), "`id`");
        let nested = ColumnRef {
            column: ColumnName::Expr(Box::new(Expr::string("name"))),
            ..ColumnRef::new("x")
        };
        assert_eq!(r.expr(&Expr::ColumnRef(nested)).unwrap(), "`name`");
    }

    #[test]
    fn test_fallback_fulltext_and_definition() {
        let r = bare(Dialect::MySql);
        let search = FulltextSearch {
            match_keyword: Some("match".to_string()),
            columns: vec![ColumnRef::new("title"), ColumnRef::new("body")],
            against: Some("against".to_string()),
            expr: Box::new(Expr::string("rust")),
            mode: None,
        };
        assert_eq!(
            r.expr(&Expr::FulltextSearch(search)).unwrap(),
            "MATCH (title, body) AGAINST (?)"
        );
        let def = ColumnDefinition::new("id", DataType::new("INT").with_length(11)).not_null();
        assert_eq!(r.expr(&Expr::ColumnDefinition(Box::new(def))).unwrap(), "`id` INT");
    }

    #[test]
    fn test_standard_fulltext_search() {
        let r = renderer(Dialect::MySql);
        let search = FulltextSearch {
            match_keyword: Some("match".to_string()),
            columns: vec![ColumnRef::new("title")],
            against: Some("against".to_string()),
            expr: Box::new(Expr::string("rust")),
            mode: Some("in boolean mode".to_string()),
        };
        assert_eq!(
            r.expr(&Expr::FulltextSearch(search)).unwrap(),
            "MATCH (`title`) AGAINST ('rust' IN BOOLEAN MODE)"
        );
    }

    #[test]
    fn test_column_definition_constraints() {
        let r = renderer(Dialect::ClickHouse);
        let mut def = ColumnDefinition::new("id", DataType::new("UInt64")).not_null();
        def.comment = Some(Box::new(Expr::string("primary key")));
        assert_eq!(
            r.expr(&Expr::ColumnDefinition(Box::new(def))).unwrap(),
            "`id` UInt64 NOT NULL COMMENT 'primary key'"
        );
        let def = ColumnDefinition::new("name", DataType::new("String"))
            .default(Expr::string("default_value"));
        assert_eq!(
            r.expr(&Expr::ColumnDefinition(Box::new(def))).unwrap(),
            "`name` String DEFAULT 'default_value'"
        );
    }

    #[test]
    fn test_alias_quoting() {
        let r = renderer(Dialect::DuckDb);
        let col = Column::new(Expr::column("name")).alias("full_name");
        assert_eq!(r.column(&col, false).unwrap(), "\"name\" AS full_name");
        let col = Column::new(Expr::column("name")).alias("full name");
        assert_eq!(r.column(&col, false).unwrap(), "\"name\" AS \"full name\"");
    }

    #[test]
    fn test_columns_star_and_dual() {
        let r = renderer(Dialect::MySql);
        assert!(r.columns(&Columns::All, None).unwrap().is_empty());
        let cols = Columns::List(vec![Column::new(Expr::column("id"))]);
        assert_eq!(r.columns(&cols, None).unwrap(), vec!["`id`"]);
        let dual = [TableExpr::dual()];
        assert_eq!(r.columns(&cols, Some(&dual)).unwrap(), vec!["id"]);
    }
}

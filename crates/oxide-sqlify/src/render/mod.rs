//! AST-to-SQL rendering.
//!
//! A [`Renderer`] owns everything a render call needs: the target dialect,
//! the render mode and the registry of column capabilities. Nothing is read
//! from ambient state, so independent renderers may run concurrently with
//! different dialects.
//!
//! ```rust
//! use oxide_sqlify::ast::Expr;
//! use oxide_sqlify::dialect::Dialect;
//! use oxide_sqlify::render::{RenderConfig, Renderer};
//!
//! let renderer = Renderer::new(RenderConfig::new(Dialect::PostgreSql));
//! let expr = Expr::column("my-col").binary(">", Expr::number(5));
//! assert_eq!(renderer.expr(&expr).unwrap(), "\"my-col\" > 5");
//! ```

mod clause;
mod column;
mod ddl;
mod delete;
mod expr;
mod insert;
mod limit;
mod registry;
mod select;
mod update;

pub use column::StandardColumns;
pub use registry::{Capability, ColumnRenderer, ExtensionRegistry};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::{Ast, Statement};
use crate::dialect::Dialect;
use crate::Result;

/// What to do with a node the renderer has no rule for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenderMode {
    /// Render the node as a literal value and log a warning.
    #[default]
    BestEffort,
    /// Fail with [`Error::UnrenderableNode`](crate::Error::UnrenderableNode).
    Strict,
}

/// Per-call render configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderConfig {
    pub dialect: Dialect,
    pub mode: RenderMode,
}

impl RenderConfig {
    /// Creates a best-effort configuration for a dialect.
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            mode: RenderMode::BestEffort,
        }
    }

    /// Sets the render mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Renders AST nodes and statements to SQL text.
#[derive(Debug, Clone)]
pub struct Renderer {
    config: RenderConfig,
    registry: ExtensionRegistry,
}

impl Renderer {
    /// Creates a renderer wired with the standard column renderer.
    #[must_use]
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            registry: ExtensionRegistry::standard(),
        }
    }

    /// Creates a renderer with a caller-supplied registry.
    ///
    /// Capabilities missing from `registry` use minimal fallback renderings.
    #[must_use]
    pub const fn with_registry(config: RenderConfig, registry: ExtensionRegistry) -> Self {
        Self { config, registry }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> RenderConfig {
        self.config
    }

    /// Returns the target dialect.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.config.dialect
    }

    /// Quotes an identifier for the target dialect.
    #[must_use]
    pub fn ident(&self, name: &str) -> String {
        self.config.dialect.quote_identifier(name)
    }

    /// Renders one statement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnrenderableNode`](crate::Error::UnrenderableNode) in
    /// strict mode when a node has no rendering rule.
    pub fn statement(&self, stmt: &Statement) -> Result<String> {
        debug!(dialect = %self.config.dialect, verb = stmt.verb(), "Rendering statement");
        match stmt {
            Statement::Select(select) => self.select(select),
            Statement::Insert(insert) => self.insert("INSERT", insert),
            Statement::Replace(insert) => self.insert("REPLACE", insert),
            Statement::Update(update) => self.update(update),
            Statement::Delete(delete) => self.delete(delete),
            Statement::Create(create) => self.create(create),
            Statement::Drop(drop) => Ok(self.drop_statement(drop)),
            Statement::Show(show) => Ok(Self::show(show)),
        }
    }

    /// Renders a whole AST; multiple statements are joined with ` ; `.
    ///
    /// # Errors
    ///
    /// See [`Renderer::statement`].
    pub fn ast(&self, ast: &Ast) -> Result<String> {
        let rendered = ast
            .statements()
            .iter()
            .map(|stmt| self.statement(stmt))
            .collect::<Result<Vec<_>>>()?;
        Ok(rendered.join(" ; "))
    }
}

/// Joins the non-empty fragments with single spaces.
pub(crate) fn join_fragments<I, S>(fragments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for fragment in fragments {
        let fragment = fragment.as_ref();
        if fragment.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(fragment);
    }
    out
}

/// `<KEYWORD> <body>`, or nothing when the body is empty.
pub(crate) fn connector(keyword: &str, body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!("{keyword} {body}")
    }
}

/// Single-quotes a string literal, doubling embedded quotes.
pub(crate) fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Wraps `sql` in parentheses when `flag` is set.
pub(crate) fn wrap(sql: String, flag: bool) -> String {
    if flag {
        format!("({sql})")
    } else {
        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_fragments_skips_empty() {
        assert_eq!(join_fragments(["DELETE", "", "FROM t", ""]), "DELETE FROM t");
        assert_eq!(join_fragments(Vec::<String>::new()), "");
    }

    #[test]
    fn test_connector() {
        assert_eq!(connector("WHERE", "a = 1"), "WHERE a = 1");
        assert_eq!(connector("WHERE", ""), "");
    }

    #[test]
    fn test_quote_string_escapes() {
        assert_eq!(quote_string("it's"), "'it''s'");
    }

    #[test]
    fn test_render_mode_wire_names() {
        let mode: RenderMode = serde_json::from_str("\"bestEffort\"").unwrap();
        assert_eq!(mode, RenderMode::BestEffort);
        assert_eq!(serde_json::to_string(&RenderMode::Strict).unwrap(), "\"strict\"");
    }
}

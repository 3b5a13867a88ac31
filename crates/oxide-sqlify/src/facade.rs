//! The parser facade: dialect dispatch over front-ends and the renderer.
//!
//! ```rust
//! use oxide_sqlify::{Options, SqlParser};
//!
//! let parser = SqlParser::new();
//! let opts = Options::new().database("PostgreSQL");
//! let ast = parser.astify("SELECT * FROM t LIMIT 5", &opts).unwrap();
//! assert_eq!(parser.sqlify(&ast, &opts).unwrap(), "SELECT * FROM \"t\" LIMIT 5");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::ast::{Ast, Columns, Expr, TableExpr};
use crate::dialect::Dialect;
use crate::frontend::{Frontend, GrammarFrontend, ParseOutput};
use crate::options::{CheckType, Options};
use crate::render::Renderer;
use crate::whitelist::WhiteList;
use crate::{Error, Result};

/// Parses SQL into ASTs and renders ASTs back into SQL, per dialect.
///
/// Front-ends are looked up by lowercase dialect name. Every supported
/// dialect starts with the built-in grammar; [`SqlParser::register_frontend`]
/// replaces or adds one.
#[derive(Clone)]
pub struct SqlParser {
    frontends: BTreeMap<String, Arc<dyn Frontend>>,
}

impl fmt::Debug for SqlParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlParser")
            .field("frontends", &self.frontends.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlParser {
    /// Creates a facade with the built-in grammar for every dialect.
    #[must_use]
    pub fn new() -> Self {
        let frontends = Dialect::ALL
            .into_iter()
            .map(|dialect| {
                let frontend: Arc<dyn Frontend> = Arc::new(GrammarFrontend::new(dialect));
                (dialect.name().to_string(), frontend)
            })
            .collect();
        Self { frontends }
    }

    /// Registers a front-end under a dialect name (case-insensitive).
    pub fn register_frontend(&mut self, name: &str, frontend: Arc<dyn Frontend>) {
        self.frontends.insert(name.to_ascii_lowercase(), frontend);
    }

    fn frontend(&self, opts: &Options) -> Result<&dyn Frontend> {
        let name = opts.database_name();
        let frontend = self
            .frontends
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| Error::UnsupportedDialect(name.to_string()))?;
        debug!(database = name, "Selected front-end");
        Ok(frontend.as_ref())
    }

    /// Parses `sql` into an AST plus its table and column lists.
    ///
    /// The text is trimmed first unless `trim_query` is off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDialect`] when no front-end is registered
    /// for the dialect, or [`Error::Parse`] when the text does not parse.
    pub fn parse(&self, sql: &str, opts: &Options) -> Result<ParseOutput> {
        let frontend = self.frontend(opts)?;
        let sql = if opts.trim_query { sql.trim() } else { sql };
        Ok(frontend.parse(sql)?)
    }

    /// Parses `sql` and returns only the AST.
    ///
    /// # Errors
    ///
    /// See [`SqlParser::parse`].
    pub fn astify(&self, sql: &str, opts: &Options) -> Result<Ast> {
        Ok(self.parse(sql, opts)?.ast)
    }

    /// Renders an AST in the dialect named by `opts`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDialect`] for unknown dialect names and
    /// [`Error::UnrenderableNode`] in strict mode.
    pub fn sqlify(&self, ast: &Ast, opts: &Options) -> Result<String> {
        self.renderer(opts)?.ast(ast)
    }

    /// Renders a single expression.
    ///
    /// # Errors
    ///
    /// See [`SqlParser::sqlify`].
    pub fn expr_to_sql(&self, expr: &Expr, opts: &Options) -> Result<String> {
        self.renderer(opts)?.expr(expr)
    }

    /// Renders select-list entries one by one.
    ///
    /// Absent columns and `*` yield an empty list.
    ///
    /// # Errors
    ///
    /// See [`SqlParser::sqlify`].
    pub fn columns_to_sql(
        &self,
        columns: Option<&Columns>,
        tables: Option<&[TableExpr]>,
        opts: &Options,
    ) -> Result<Vec<String>> {
        let Some(columns) = columns else {
            return Ok(Vec::new());
        };
        self.renderer(opts)?.columns(columns, tables)
    }

    /// Requires every table or column `sql` touches to match `allow`.
    ///
    /// Which list is checked follows `opts.check_type`. An empty `allow`
    /// list accepts everything without parsing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WhiteListDenied`] for the first uncovered entry,
    /// [`Error::InvalidPattern`] for a bad pattern, or any [`SqlParser::parse`]
    /// error.
    pub fn white_list_check<S: AsRef<str>>(
        &self,
        sql: &str,
        allow: &[S],
        opts: &Options,
    ) -> Result<()> {
        let list = WhiteList::new(allow)?;
        if list.is_empty() {
            return Ok(());
        }
        let output = self.parse(sql, opts)?;
        let entries = match opts.check_type {
            CheckType::Table => &output.table_list,
            CheckType::Column => &output.column_list,
        };
        list.check(opts.check_type, entries, sql)
    }

    /// Returns the `verb::db::table` entries `sql` touches.
    ///
    /// # Errors
    ///
    /// See [`SqlParser::parse`].
    pub fn table_list(&self, sql: &str, opts: &Options) -> Result<Vec<String>> {
        Ok(self.parse(sql, opts)?.table_list)
    }

    /// Returns the `verb::table::column` entries `sql` touches.
    ///
    /// # Errors
    ///
    /// See [`SqlParser::parse`].
    pub fn column_list(&self, sql: &str, opts: &Options) -> Result<Vec<String>> {
        Ok(self.parse(sql, opts)?.column_list)
    }

    fn renderer(&self, opts: &Options) -> Result<Renderer> {
        let config = opts.render_config()?;
        debug!(dialect = %config.dialect, mode = ?config.mode, "Configured renderer");
        Ok(Renderer::new(config))
    }
}

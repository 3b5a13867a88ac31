//! Table and column references collected while parsing.
//!
//! Entries are rendered as `verb::qualifier::name`, with `null` standing in
//! for a missing qualifier and `(.*)` for a star column, so the lists can be
//! matched directly by whitelist patterns.

use std::collections::{HashMap, HashSet};

/// The qualifier placeholder for an unqualified reference.
const NULL_QUALIFIER: &str = "null";

/// The name recorded for `*`.
const STAR: &str = "(.*)";

#[derive(Debug, Clone, PartialEq, Eq)]
struct TableReference {
    verb: &'static str,
    db: Option<String>,
    table: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnReference {
    verb: &'static str,
    table: Option<String>,
    column: String,
}

/// Accumulates the tables and columns a statement touches.
#[derive(Debug, Clone, Default)]
pub struct References {
    tables: Vec<TableReference>,
    columns: Vec<ColumnReference>,
    aliases: HashMap<String, String>,
    ctes: HashSet<String>,
}

impl References {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a table touched by a statement with the given verb.
    pub fn add_table(&mut self, verb: &'static str, db: Option<&str>, table: &str) {
        self.tables.push(TableReference {
            verb,
            db: db.map(str::to_string),
            table: table.to_string(),
        });
    }

    /// Records a column; `*` is stored as `(.*)`.
    pub fn add_column(&mut self, verb: &'static str, table: Option<&str>, column: &str) {
        let column = if column == "*" { STAR } else { column };
        self.columns.push(ColumnReference {
            verb,
            table: table.map(str::to_string),
            column: column.to_string(),
        });
    }

    /// Records that `alias` names `table` in column qualifiers.
    pub fn add_alias(&mut self, alias: &str, table: &str) {
        self.aliases.insert(alias.to_string(), table.to_string());
    }

    /// Records a common table expression; references to it are not tables.
    pub fn add_cte(&mut self, name: &str) {
        self.ctes.insert(name.to_string());
    }

    /// Returns the distinct table entries in first-seen order.
    #[must_use]
    pub fn table_list(&self) -> Vec<String> {
        let entries = self
            .tables
            .iter()
            .filter(|t| t.db.is_some() || !self.ctes.contains(&t.table))
            .map(|t| {
                format!(
                    "{}::{}::{}",
                    t.verb,
                    t.db.as_deref().unwrap_or(NULL_QUALIFIER),
                    t.table
                )
            });
        dedup(entries)
    }

    /// Returns the distinct column entries in first-seen order, with table
    /// aliases resolved to the table they stand for.
    #[must_use]
    pub fn column_list(&self) -> Vec<String> {
        let entries = self.columns.iter().map(|c| {
            let table = c
                .table
                .as_deref()
                .map(|t| self.aliases.get(t).map_or(t, String::as_str))
                .unwrap_or(NULL_QUALIFIER);
            format!("{}::{table}::{}", c.verb, c.column)
        });
        dedup(entries)
    }
}

fn dedup(entries: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    entries.filter(|e| seen.insert(e.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_entries() {
        let mut refs = References::new();
        refs.add_table("select", None, "users");
        refs.add_table("select", Some("shop"), "orders");
        refs.add_table("select", None, "users");
        assert_eq!(
            refs.table_list(),
            vec!["select::null::users", "select::shop::orders"]
        );
    }

    #[test]
    fn test_column_aliases_resolve() {
        let mut refs = References::new();
        refs.add_column("select", Some("u"), "id");
        refs.add_column("select", None, "*");
        refs.add_alias("u", "users");
        assert_eq!(
            refs.column_list(),
            vec!["select::users::id", "select::null::(.*)"]
        );
    }

    #[test]
    fn test_cte_names_are_not_tables() {
        let mut refs = References::new();
        refs.add_cte("recent");
        refs.add_table("select", None, "recent");
        refs.add_table("select", None, "events");
        assert_eq!(refs.table_list(), vec!["select::null::events"]);
    }
}

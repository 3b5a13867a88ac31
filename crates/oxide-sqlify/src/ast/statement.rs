//! SQL statement nodes.
//!
//! Every optional clause is an `Option`: `None` means the clause is absent,
//! never present-but-empty.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::de::{self, is_false};
use super::limit::{self, Limit};
use super::{Expr, NamedWindows};

/// A parsed statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    Replace(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    Create(CreateStatement),
    Drop(DropStatement),
    Show(ShowStatement),
}

impl Statement {
    /// Returns the lowercase statement verb.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::Insert(_) => "insert",
            Self::Replace(_) => "replace",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
            Self::Create(_) => "create",
            Self::Drop(_) => "drop",
            Self::Show(_) => "show",
        }
    }
}

/// The selected columns: `*` or an explicit list.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Columns {
    #[default]
    All,
    List(Vec<Column>),
}

impl Serialize for Columns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_str("*"),
            Self::List(columns) => columns.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Columns {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Self::All),
            Value::String(s) if s == "*" => Ok(Self::All),
            Value::Array(items) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
                .collect::<Result<Vec<Column>, _>>()
                .map(Self::List),
            single @ Value::Object(_) => serde_json::from_value(single)
                .map(|column| Self::List(vec![column]))
                .map_err(D::Error::custom),
            other => Err(D::Error::custom(format!("invalid column list: {other}"))),
        }
    }
}

/// One entry of a select list: an expression with an optional alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub expr: Expr,
    #[serde(rename = "as", default, deserialize_with = "de::opt_text")]
    pub alias: Option<String>,
}

impl Column {
    /// Creates an unaliased column.
    #[must_use]
    pub const fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    /// Sets the alias.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// A FROM-list entry: a table, a derived table, or a join.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableExpr {
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Derived table, table function or UNNEST.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expr: Option<Box<Expr>>,
    #[serde(rename = "as", default, deserialize_with = "de::opt_text")]
    pub alias: Option<String>,
    /// Join keyword as written, e.g. `LEFT JOIN`.
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub join: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<Box<Expr>>,
    #[serde(default, deserialize_with = "de::opt_names", skip_serializing_if = "Option::is_none")]
    pub using: Option<Vec<String>>,
    /// The entry only repeats a FROM table in a multi-table DELETE.
    #[serde(default, deserialize_with = "de::flag", skip_serializing_if = "is_false")]
    pub addition: bool,
    /// `dual` for the pseudo table.
    #[serde(rename = "type", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl TableExpr {
    /// Creates a plain table reference.
    #[must_use]
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table: Some(name.into()),
            ..Self::default()
        }
    }

    /// Creates a derived table.
    #[must_use]
    pub fn derived(expr: Expr) -> Self {
        Self {
            expr: Some(Box::new(expr)),
            ..Self::default()
        }
    }

    /// Creates the `DUAL` pseudo table.
    #[must_use]
    pub fn dual() -> Self {
        Self {
            kind: Some("dual".to_string()),
            ..Self::default()
        }
    }

    /// Qualifies the table with a database name.
    #[must_use]
    pub fn with_db(mut self, db: impl Into<String>) -> Self {
        self.db = Some(db.into());
        self
    }

    /// Sets the alias.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Turns the entry into a join.
    #[must_use]
    pub fn join(mut self, keyword: impl Into<String>, on: Option<Expr>) -> Self {
        self.join = Some(keyword.into());
        self.on = on.map(Box::new);
        self
    }

    /// Marks the entry as a repeated DELETE target.
    #[must_use]
    pub const fn addition(mut self) -> Self {
        self.addition = true;
        self
    }

    /// Returns true for the `DUAL` pseudo table.
    #[must_use]
    pub fn is_dual(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|kind| kind.eq_ignore_ascii_case("dual"))
    }
}

/// An ORDER BY or PARTITION BY item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByItem {
    pub expr: Expr,
    /// `ASC` or `DESC`.
    #[serde(rename = "type", default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    /// `nulls first` or `nulls last`.
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub nulls: Option<String>,
}

impl OrderByItem {
    /// Creates an item with no explicit direction.
    #[must_use]
    pub const fn new(expr: Expr) -> Self {
        Self {
            expr,
            direction: None,
            nulls: None,
        }
    }

    /// Sets the direction.
    #[must_use]
    pub fn direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }
}

/// One common table expression of a WITH clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cte {
    #[serde(deserialize_with = "de::text")]
    pub name: String,
    #[serde(default, deserialize_with = "de::opt_names", skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    pub stmt: Box<Expr>,
    #[serde(default, deserialize_with = "de::flag", skip_serializing_if = "is_false")]
    pub recursive: bool,
}

/// A RETURNING clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Returning {
    #[serde(default)]
    pub columns: Columns,
}

/// `column = value` inside SET or ON DUPLICATE KEY UPDATE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetItem {
    #[serde(deserialize_with = "de::text")]
    pub column: String,
    pub value: Expr,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

impl SetItem {
    /// Creates an unqualified assignment.
    #[must_use]
    pub fn new(column: impl Into<String>, value: Expr) -> Self {
        Self {
            column: column.into(),
            value,
            table: None,
        }
    }
}

/// A SELECT statement, possibly heading a UNION/INTERSECT/EXCEPT chain.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectStatement {
    #[serde(default, deserialize_with = "de::opt_list", skip_serializing_if = "Option::is_none")]
    pub with: Option<Vec<Cte>>,
    #[serde(default, deserialize_with = "de::flag", skip_serializing_if = "is_false")]
    pub distinct: bool,
    #[serde(default)]
    pub columns: Columns,
    #[serde(default, deserialize_with = "de::opt_list")]
    pub from: Option<Vec<TableExpr>>,
    #[serde(rename = "where", default)]
    pub where_clause: Option<Box<Expr>>,
    #[serde(default, deserialize_with = "de::opt_list", skip_serializing_if = "Option::is_none")]
    pub groupby: Option<Vec<Expr>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub having: Option<Box<Expr>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<NamedWindows>,
    #[serde(default, deserialize_with = "de::opt_list", skip_serializing_if = "Option::is_none")]
    pub orderby: Option<Vec<OrderByItem>>,
    #[serde(default, deserialize_with = "limit::deserialize_opt", skip_serializing_if = "Option::is_none")]
    pub limit: Option<Limit>,
    /// Operator joining this statement to `next`, e.g. `union all`.
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub set_op: Option<String>,
    #[serde(rename = "_next", default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Box<SelectStatement>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub parentheses: bool,
}

impl SelectStatement {
    /// Creates `SELECT <columns> FROM <table>`.
    #[must_use]
    pub fn from_table(columns: Columns, table: TableExpr) -> Self {
        Self {
            columns,
            from: Some(vec![table]),
            ..Self::default()
        }
    }
}

/// Rows of an INSERT: a VALUES list or a query.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    /// Each row is normally an [`Expr::ExprList`].
    Values(Vec<Expr>),
    Query(Box<Expr>),
}

impl Serialize for InsertSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        match self {
            Self::Values(rows) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "values")?;
                map.serialize_entry("values", rows)?;
                map.end()
            }
            Self::Query(query) => query.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for InsertSource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = |items: Vec<Value>| {
            items
                .into_iter()
                .map(|item| Expr::from_value(item).map_err(D::Error::custom))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Values)
        };
        match Value::deserialize(deserializer)? {
            Value::Array(items) => rows(items),
            Value::Object(mut map) if map.get("type").and_then(Value::as_str) == Some("values") => {
                match map.remove("values") {
                    Some(Value::Array(items)) => rows(items),
                    _ => Ok(Self::Values(Vec::new())),
                }
            }
            other => Expr::from_value(other)
                .map(|query| Self::Query(Box::new(query)))
                .map_err(D::Error::custom),
        }
    }
}

/// `ON DUPLICATE KEY UPDATE ..`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnDuplicateUpdate {
    #[serde(deserialize_with = "de::one_or_many")]
    pub set: Vec<SetItem>,
}

/// An INSERT or REPLACE statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertStatement {
    #[serde(deserialize_with = "de::one_or_many")]
    pub table: Vec<TableExpr>,
    #[serde(default, deserialize_with = "de::opt_names")]
    pub columns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<InsertSource>,
    /// `into` as written, or absent.
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_duplicate_update: Option<OnDuplicateUpdate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returning: Option<Returning>,
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatement {
    #[serde(default, deserialize_with = "de::opt_list", skip_serializing_if = "Option::is_none")]
    pub with: Option<Vec<Cte>>,
    #[serde(deserialize_with = "de::one_or_many")]
    pub table: Vec<TableExpr>,
    #[serde(deserialize_with = "de::one_or_many")]
    pub set: Vec<SetItem>,
    #[serde(default, deserialize_with = "de::opt_list", skip_serializing_if = "Option::is_none")]
    pub from: Option<Vec<TableExpr>>,
    #[serde(rename = "where", default)]
    pub where_clause: Option<Box<Expr>>,
    #[serde(default, deserialize_with = "de::opt_list", skip_serializing_if = "Option::is_none")]
    pub orderby: Option<Vec<OrderByItem>>,
    #[serde(default, deserialize_with = "limit::deserialize_opt", skip_serializing_if = "Option::is_none")]
    pub limit: Option<Limit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returning: Option<Returning>,
}

/// A DELETE statement.
///
/// `columns` and `table` name what is deleted in multi-table forms
/// (`DELETE t1 FROM t1 JOIN t2 ..`); `from` is the FROM list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeleteStatement {
    #[serde(default, deserialize_with = "de::opt_list", skip_serializing_if = "Option::is_none")]
    pub with: Option<Vec<Cte>>,
    #[serde(default, deserialize_with = "de::opt_list", skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<Column>>,
    #[serde(default, deserialize_with = "de::opt_list", skip_serializing_if = "Option::is_none")]
    pub table: Option<Vec<TableExpr>>,
    #[serde(default, deserialize_with = "de::opt_list")]
    pub from: Option<Vec<TableExpr>>,
    #[serde(rename = "where", default)]
    pub where_clause: Option<Box<Expr>>,
    #[serde(default, deserialize_with = "de::opt_list", skip_serializing_if = "Option::is_none")]
    pub orderby: Option<Vec<OrderByItem>>,
    #[serde(default, deserialize_with = "limit::deserialize_opt", skip_serializing_if = "Option::is_none")]
    pub limit: Option<Limit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returning: Option<Returning>,
}

/// A table option such as `ENGINE = MergeTree`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOption {
    #[serde(deserialize_with = "de::text")]
    pub keyword: String,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(deserialize_with = "de::text")]
    pub value: String,
}

/// CREATE TABLE / VIEW / DATABASE / SCHEMA.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStatement {
    /// `table`, `view`, `database` or `schema`.
    #[serde(deserialize_with = "de::text")]
    pub keyword: String,
    #[serde(rename = "replace", default, deserialize_with = "de::flag", skip_serializing_if = "is_false")]
    pub or_replace: bool,
    #[serde(default, deserialize_with = "de::flag", skip_serializing_if = "is_false")]
    pub temporary: bool,
    #[serde(default, deserialize_with = "de::flag", skip_serializing_if = "is_false")]
    pub if_not_exists: bool,
    #[serde(default, deserialize_with = "de::opt_list", skip_serializing_if = "Option::is_none")]
    pub table: Option<Vec<TableExpr>>,
    /// Name for CREATE DATABASE / SCHEMA.
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, deserialize_with = "de::opt_list", skip_serializing_if = "Option::is_none")]
    pub create_definitions: Option<Vec<Expr>>,
    #[serde(default, deserialize_with = "de::opt_list", skip_serializing_if = "Option::is_none")]
    pub table_options: Option<Vec<TableOption>>,
    /// `AS <query>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_expr: Option<Box<Expr>>,
}

/// `DROP <keyword> [IF EXISTS] <names>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropStatement {
    #[serde(deserialize_with = "de::text")]
    pub keyword: String,
    #[serde(alias = "prefix", default, deserialize_with = "de::flag", skip_serializing_if = "is_false")]
    pub if_exists: bool,
    #[serde(deserialize_with = "de::one_or_many")]
    pub name: Vec<TableExpr>,
}

/// `SHOW <keyword>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowStatement {
    #[serde(deserialize_with = "de::text")]
    pub keyword: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_statement_dispatch() {
        let stmt: Statement = serde_json::from_value(json!({
            "type": "select",
            "columns": "*",
            "from": [{"db": null, "table": "users", "as": null}],
            "where": null,
            "limit": {"seperator": "", "value": [{"type": "number", "value": 10}]}
        }))
        .unwrap();
        let Statement::Select(select) = stmt else {
            panic!("expected select");
        };
        assert_eq!(select.columns, Columns::All);
        assert_eq!(select.from, Some(vec![TableExpr::table("users")]));
        assert_eq!(select.limit, Some(Limit::count(Expr::number(10))));
    }

    #[test]
    fn test_groupby_wrapper_is_accepted() {
        let select: SelectStatement = serde_json::from_value(json!({
            "columns": "*",
            "groupby": {"columns": [{"type": "column_ref", "table": null, "column": "status"}], "modifiers": []}
        }))
        .unwrap();
        assert_eq!(select.groupby, Some(vec![Expr::column("status")]));
    }

    #[test]
    fn test_insert_values_shapes() {
        let keyed: InsertSource = serde_json::from_value(json!({
            "type": "values",
            "values": [{"type": "expr_list", "value": [{"type": "number", "value": 1}]}]
        }))
        .unwrap();
        let bare: InsertSource = serde_json::from_value(json!([
            {"type": "expr_list", "value": [{"type": "number", "value": 1}]}
        ]))
        .unwrap();
        assert_eq!(keyed, bare);
    }

    #[test]
    fn test_delete_addition_flag() {
        let delete: DeleteStatement = serde_json::from_value(json!({
            "table": [{"table": "t1", "addition": true}, {"table": "t2"}],
            "from": [{"table": "t1"}]
        }))
        .unwrap();
        let table = delete.table.unwrap();
        assert!(table[0].addition);
        assert!(!table[1].addition);
    }

    #[test]
    fn test_drop_accepts_prefix_spelling() {
        let drop: DropStatement = serde_json::from_value(json!({
            "keyword": "table",
            "prefix": "if exists",
            "name": [{"table": "users"}]
        }))
        .unwrap();
        assert!(drop.if_exists);
    }
}

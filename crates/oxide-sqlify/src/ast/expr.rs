//! SQL expression nodes.
//!
//! On the wire every node is a JSON object tagged by `type`. Serialization is
//! derived; deserialization goes through [`Expr::from_value`], which first
//! hoists any `ast` wrapper onto the node and then dispatches on the tag.
//! Tags with no typed counterpart are kept verbatim as [`Expr::Unknown`].

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

use super::de::{self, is_false};
use super::{
    ColumnDefinition, DataType, InsertStatement, OrderByItem, SelectStatement, ShowStatement,
    TableExpr,
};

/// An expression node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expr {
    ColumnRef(ColumnRef),
    BinaryExpr(BinaryExpr),
    UnaryExpr(UnaryExpr),
    Function(Function),
    AggrFunc(AggrFunc),
    Cast(Cast),
    Case(Case),
    WindowFunc(WindowFunc),
    ArrayAccess(ArrayAccess),
    ExprList(ExprList),
    /// A subquery, possibly the head of a set-operation chain.
    Select(Box<SelectStatement>),
    Var(Var),
    MapObject(MapObject),
    FulltextSearch(FulltextSearch),
    ColumnDefinition(Box<ColumnDefinition>),
    Interval(Interval),
    Extract(Extract),
    Collate(Collate),
    Datatype(DataType),
    Assign(Assign),
    Array(ArrayLiteral),
    Struct(StructLiteral),
    Lambda(Lambda),
    Unnest(Unnest),
    Json(JsonExpr),
    JsonVisitor(JsonVisitor),
    JsonObjectArg(JsonObjectArg),
    AnyValue(AnyValue),
    Flatten(Flatten),
    #[serde(rename = "tablefunc")]
    TableFunc(TableFunc),
    FuncArg(FuncArg),
    /// The named windows of a `WINDOW` clause.
    Window(NamedWindows),
    Show(ShowStatement),
    /// An INSERT used where a query is expected, as in a CTE body.
    Insert(Box<InsertStatement>),
    Tables(TableList),
    /// Transparent wrapper around another node.
    #[serde(rename = "expr")]
    Wrapped(Wrapped),

    Number(NumberLiteral),
    Bigint(TextLiteral),
    String(TextLiteral),
    DoubleQuoteString(TextLiteral),
    BackticksQuoteString(TextLiteral),
    HexString(TextLiteral),
    Bool(BoolLiteral),
    Null(NullLiteral),
    Star(StarLiteral),
    /// Named parameter, rendered as `:name`.
    Param(TextLiteral),
    /// Verbatim SQL text, such as a `?` placeholder.
    Origin(TextLiteral),
    /// Keyword-like value rendered as written (`DEFAULT`, a bare name).
    Default(TextLiteral),

    /// A node whose kind has no typed counterpart, kept as received.
    #[serde(untagged)]
    Unknown(Value),
}

impl<'de> Deserialize<'de> for Expr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}

/// Moves the fields of a nested `ast` object onto the node itself.
///
/// Keys of the inner object win over same-named keys of the wrapper. Nested
/// wrappers are unwrapped in a loop, never by recursion.
pub(crate) fn hoist_ast(value: Value) -> Value {
    let Value::Object(mut node) = value else {
        return value;
    };
    while let Some(inner) = node.remove("ast") {
        match inner {
            Value::Object(fields) => node.extend(fields),
            _ => break,
        }
    }
    Value::Object(node)
}

impl Expr {
    /// Builds a typed node from JSON, hoisting `ast` wrappers first.
    ///
    /// Unknown `type` tags and untagged values become [`Expr::Unknown`].
    ///
    /// # Errors
    ///
    /// Returns an error when a known kind is missing a required field.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        let value = hoist_ast(value);
        let Some(kind) = value.get("type").and_then(Value::as_str).map(str::to_owned) else {
            return Ok(Self::Unknown(value));
        };
        let node = match kind.as_str() {
            "column_ref" => Self::ColumnRef(serde_json::from_value(value)?),
            "binary_expr" => Self::BinaryExpr(serde_json::from_value(value)?),
            "unary_expr" => Self::UnaryExpr(serde_json::from_value(value)?),
            "function" => Self::Function(serde_json::from_value(value)?),
            "aggr_func" => Self::AggrFunc(serde_json::from_value(value)?),
            "cast" => Self::Cast(serde_json::from_value(value)?),
            "case" => Self::Case(serde_json::from_value(value)?),
            "window_func" => Self::WindowFunc(serde_json::from_value(value)?),
            "array_access" => Self::ArrayAccess(serde_json::from_value(value)?),
            "expr_list" => Self::ExprList(serde_json::from_value(value)?),
            "select" => Self::Select(serde_json::from_value(value)?),
            "var" => Self::Var(serde_json::from_value(value)?),
            "map_object" => Self::MapObject(serde_json::from_value(value)?),
            "fulltext_search" => Self::FulltextSearch(serde_json::from_value(value)?),
            "column_definition" => Self::ColumnDefinition(serde_json::from_value(value)?),
            "interval" => Self::Interval(serde_json::from_value(value)?),
            "extract" => Self::Extract(serde_json::from_value(value)?),
            "collate" => Self::Collate(serde_json::from_value(value)?),
            "datatype" => Self::Datatype(serde_json::from_value(value)?),
            "assign" => Self::Assign(serde_json::from_value(value)?),
            "array" => Self::Array(serde_json::from_value(value)?),
            "struct" => Self::Struct(serde_json::from_value(value)?),
            "lambda" => Self::Lambda(serde_json::from_value(value)?),
            "unnest" => Self::Unnest(serde_json::from_value(value)?),
            "json" => Self::Json(serde_json::from_value(value)?),
            "json_visitor" => Self::JsonVisitor(serde_json::from_value(value)?),
            "json_object_arg" => Self::JsonObjectArg(serde_json::from_value(value)?),
            "any_value" => Self::AnyValue(serde_json::from_value(value)?),
            "flatten" => Self::Flatten(serde_json::from_value(value)?),
            "tablefunc" => Self::TableFunc(serde_json::from_value(value)?),
            "func_arg" => Self::FuncArg(serde_json::from_value(value)?),
            "window" => Self::Window(serde_json::from_value(value)?),
            "show" => Self::Show(serde_json::from_value(value)?),
            "insert" => Self::Insert(serde_json::from_value(value)?),
            "tables" => Self::Tables(serde_json::from_value(value)?),
            "expr" => Self::Wrapped(serde_json::from_value(value)?),
            "number" => Self::Number(serde_json::from_value(value)?),
            "bigint" => Self::Bigint(serde_json::from_value(value)?),
            "string" | "single_quote_string" | "natural_string" => {
                Self::String(serde_json::from_value(value)?)
            }
            "double_quote_string" => Self::DoubleQuoteString(serde_json::from_value(value)?),
            "backticks_quote_string" => {
                Self::BackticksQuoteString(serde_json::from_value(value)?)
            }
            "hex_string" => Self::HexString(serde_json::from_value(value)?),
            "bool" | "boolean" => Self::Bool(serde_json::from_value(value)?),
            "null" => Self::Null(NullLiteral {}),
            "star" => Self::Star(StarLiteral {}),
            "param" => Self::Param(serde_json::from_value(value)?),
            "origin" => Self::Origin(serde_json::from_value(value)?),
            "default" => Self::Default(serde_json::from_value(value)?),
            _ => Self::Unknown(value),
        };
        Ok(node)
    }

    /// Returns the wire tag of this node.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::ColumnRef(_) => "column_ref",
            Self::BinaryExpr(_) => "binary_expr",
            Self::UnaryExpr(_) => "unary_expr",
            Self::Function(_) => "function",
            Self::AggrFunc(_) => "aggr_func",
            Self::Cast(_) => "cast",
            Self::Case(_) => "case",
            Self::WindowFunc(_) => "window_func",
            Self::ArrayAccess(_) => "array_access",
            Self::ExprList(_) => "expr_list",
            Self::Select(_) => "select",
            Self::Var(_) => "var",
            Self::MapObject(_) => "map_object",
            Self::FulltextSearch(_) => "fulltext_search",
            Self::ColumnDefinition(_) => "column_definition",
            Self::Interval(_) => "interval",
            Self::Extract(_) => "extract",
            Self::Collate(_) => "collate",
            Self::Datatype(_) => "datatype",
            Self::Assign(_) => "assign",
            Self::Array(_) => "array",
            Self::Struct(_) => "struct",
            Self::Lambda(_) => "lambda",
            Self::Unnest(_) => "unnest",
            Self::Json(_) => "json",
            Self::JsonVisitor(_) => "json_visitor",
            Self::JsonObjectArg(_) => "json_object_arg",
            Self::AnyValue(_) => "any_value",
            Self::Flatten(_) => "flatten",
            Self::TableFunc(_) => "tablefunc",
            Self::FuncArg(_) => "func_arg",
            Self::Window(_) => "window",
            Self::Show(_) => "show",
            Self::Insert(_) => "insert",
            Self::Tables(_) => "tables",
            Self::Wrapped(_) => "expr",
            Self::Number(_) => "number",
            Self::Bigint(_) => "bigint",
            Self::String(_) => "string",
            Self::DoubleQuoteString(_) => "double_quote_string",
            Self::BackticksQuoteString(_) => "backticks_quote_string",
            Self::HexString(_) => "hex_string",
            Self::Bool(_) => "bool",
            Self::Null(_) => "null",
            Self::Star(_) => "star",
            Self::Param(_) => "param",
            Self::Origin(_) => "origin",
            Self::Default(_) => "default",
            Self::Unknown(value) => value.get("type").and_then(Value::as_str).unwrap_or("value"),
        }
    }

    /// Returns the plain text a value-bearing node stands for.
    ///
    /// Used where a node occupies a name slot, e.g. a column whose name is
    /// itself an expression.
    #[must_use]
    pub fn literal_text(&self) -> Option<String> {
        match self {
            Self::String(lit)
            | Self::Bigint(lit)
            | Self::DoubleQuoteString(lit)
            | Self::BackticksQuoteString(lit)
            | Self::Param(lit)
            | Self::Origin(lit)
            | Self::Default(lit) => Some(lit.value.clone()),
            Self::Number(lit) => Some(lit.value.to_string()),
            Self::Bool(lit) => Some(lit.value.to_string()),
            Self::ColumnRef(col) => col.column.text(),
            Self::Wrapped(inner) => inner.expr.literal_text(),
            Self::Unknown(value) => de::value_text(value),
            _ => None,
        }
    }

    /// Creates an unqualified column reference.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::ColumnRef(ColumnRef::new(name))
    }

    /// Creates a table-qualified column reference.
    #[must_use]
    pub fn qualified_column(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::ColumnRef(ColumnRef::new(name).with_table(table))
    }

    /// Creates a `*` column reference.
    #[must_use]
    pub fn star() -> Self {
        Self::ColumnRef(ColumnRef::star())
    }

    /// Creates a numeric literal.
    #[must_use]
    pub fn number(value: impl Into<Number>) -> Self {
        Self::Number(NumberLiteral {
            value: value.into(),
            parentheses: false,
        })
    }

    /// Creates a single-quoted string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(TextLiteral::new(value))
    }

    /// Creates a boolean literal.
    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::Bool(BoolLiteral {
            value,
            parentheses: false,
        })
    }

    /// Creates a NULL literal.
    #[must_use]
    pub const fn null() -> Self {
        Self::Null(NullLiteral {})
    }

    /// Creates a verbatim node.
    #[must_use]
    pub fn origin(text: impl Into<String>) -> Self {
        Self::Origin(TextLiteral::new(text))
    }

    /// Creates a named parameter.
    #[must_use]
    pub fn param(name: impl Into<String>) -> Self {
        Self::Param(TextLiteral::new(name))
    }

    /// Creates a function call with the given arguments.
    #[must_use]
    pub fn function(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::Function(Function {
            name: name.into(),
            args: Some(Box::new(Self::list(args))),
            over: None,
            suffix: None,
            parentheses: false,
        })
    }

    /// Creates an unparenthesized expression list.
    #[must_use]
    pub const fn list(items: Vec<Self>) -> Self {
        Self::ExprList(ExprList {
            value: items,
            separator: None,
            parentheses: false,
        })
    }

    /// Creates a unary expression.
    #[must_use]
    pub fn unary(operator: impl Into<String>, expr: Self) -> Self {
        Self::UnaryExpr(UnaryExpr {
            operator: operator.into(),
            expr: Box::new(expr),
            parentheses: false,
        })
    }

    /// Combines `self` and `right` with a binary operator.
    #[must_use]
    pub fn binary(self, operator: impl Into<String>, right: Self) -> Self {
        Self::BinaryExpr(BinaryExpr {
            operator: operator.into(),
            left: Box::new(self),
            right: Box::new(right),
            parentheses: false,
        })
    }

    /// `self AND right`
    #[must_use]
    pub fn and(self, right: Self) -> Self {
        self.binary("AND", right)
    }

    /// Marks the node as written inside parentheses.
    ///
    /// Kinds without a parenthesis flag are wrapped in a one-element
    /// parenthesized list.
    #[must_use]
    pub fn parenthesized(mut self) -> Self {
        if let Some(flag) = self.parentheses_mut() {
            *flag = true;
            return self;
        }
        Self::ExprList(ExprList {
            value: vec![self],
            separator: None,
            parentheses: true,
        })
    }

    fn parentheses_mut(&mut self) -> Option<&mut bool> {
        match self {
            Self::ColumnRef(n) => Some(&mut n.parentheses),
            Self::BinaryExpr(n) => Some(&mut n.parentheses),
            Self::UnaryExpr(n) => Some(&mut n.parentheses),
            Self::Function(n) => Some(&mut n.parentheses),
            Self::AggrFunc(n) => Some(&mut n.parentheses),
            Self::Cast(n) => Some(&mut n.parentheses),
            Self::Case(n) => Some(&mut n.parentheses),
            Self::ExprList(n) => Some(&mut n.parentheses),
            Self::Select(n) => Some(&mut n.parentheses),
            Self::Number(n) => Some(&mut n.parentheses),
            Self::Bool(n) => Some(&mut n.parentheses),
            Self::String(n)
            | Self::Bigint(n)
            | Self::DoubleQuoteString(n)
            | Self::BackticksQuoteString(n)
            | Self::HexString(n)
            | Self::Param(n)
            | Self::Origin(n)
            | Self::Default(n) => Some(&mut n.parentheses),
            _ => None,
        }
    }
}

impl From<ColumnRef> for Expr {
    fn from(col: ColumnRef) -> Self {
        Self::ColumnRef(col)
    }
}

impl From<SelectStatement> for Expr {
    fn from(select: SelectStatement) -> Self {
        Self::Select(Box::new(select))
    }
}

/// The column part of a column reference.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnName {
    /// `*`
    Star,
    /// A plain column name.
    Name(String),
    /// A nested value-bearing node whose text is the name.
    Expr(Box<Expr>),
}

impl ColumnName {
    /// Returns the name as text, `*` for [`ColumnName::Star`].
    #[must_use]
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Star => Some("*".to_string()),
            Self::Name(name) => Some(name.clone()),
            Self::Expr(expr) => expr.literal_text(),
        }
    }
}

impl Serialize for ColumnName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Star => serializer.serialize_str("*"),
            Self::Name(name) => serializer.serialize_str(name),
            Self::Expr(expr) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("expr", expr)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for ColumnName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(name) if name == "*" => Ok(Self::Star),
            Value::String(name) => Ok(Self::Name(name)),
            Value::Number(n) => Ok(Self::Name(n.to_string())),
            Value::Object(mut map) => {
                let inner = match map.remove("expr") {
                    Some(inner) => inner,
                    None => Value::Object(map),
                };
                Expr::from_value(inner)
                    .map(|expr| Self::Expr(Box::new(expr)))
                    .map_err(D::Error::custom)
            }
            other => Err(D::Error::custom(format!("invalid column name: {other}"))),
        }
    }
}

/// A possibly qualified column reference: `db.schema.table.column`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRef {
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub db: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub table: Option<String>,
    pub column: ColumnName,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub collate: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub parentheses: bool,
}

impl ColumnRef {
    /// Creates an unqualified column reference.
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        let column: String = column.into();
        let column = if column == "*" {
            ColumnName::Star
        } else {
            ColumnName::Name(column)
        };
        Self {
            db: None,
            schema: None,
            table: None,
            column,
            collate: None,
            parentheses: false,
        }
    }

    /// Creates an unqualified `*`.
    #[must_use]
    pub fn star() -> Self {
        Self::new("*")
    }

    /// Qualifies the column with a table name or alias.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }
}

/// `<left> <operator> <right>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub operator: String,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub parentheses: bool,
}

/// `<operator><expr>` or `<operator> <expr>` for keyword operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub operator: String,
    pub expr: Box<Expr>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub parentheses: bool,
}

/// A scalar function call.
///
/// `args: None` renders the bare name (`CURRENT_TIMESTAMP`), while an empty
/// list renders `name()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    #[serde(deserialize_with = "de::text")]
    pub name: String,
    #[serde(default)]
    pub args: Option<Box<Expr>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub over: Option<Over>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub parentheses: bool,
}

/// An aggregate call such as `COUNT(DISTINCT id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggrFunc {
    #[serde(deserialize_with = "de::text")]
    pub name: String,
    pub args: AggrArgs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub over: Option<Over>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub parentheses: bool,
}

/// Arguments of an aggregate call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggrArgs {
    pub expr: Box<Expr>,
    #[serde(default, deserialize_with = "de::flag", skip_serializing_if = "is_false")]
    pub distinct: bool,
    #[serde(default, deserialize_with = "de::opt_list", skip_serializing_if = "Option::is_none")]
    pub orderby: Option<Vec<OrderByItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<Box<Expr>>,
}

/// An `OVER` clause: either a named window or an inline specification.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Over {
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_list", skip_serializing_if = "Option::is_none")]
    pub partitionby: Option<Vec<OrderByItem>>,
    #[serde(default, deserialize_with = "de::opt_list", skip_serializing_if = "Option::is_none")]
    pub orderby: Option<Vec<OrderByItem>>,
    /// Frame clause text, e.g. `ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW`.
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub frame: Option<String>,
}

fn default_cast_keyword() -> String {
    "CAST".to_string()
}

fn default_cast_symbol() -> String {
    "as".to_string()
}

/// `CAST(<expr> AS <type>)` or `<expr>::<type>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cast {
    #[serde(default = "default_cast_keyword")]
    pub keyword: String,
    pub expr: Box<Expr>,
    /// `as` or `::`
    #[serde(default = "default_cast_symbol")]
    pub symbol: String,
    #[serde(deserialize_with = "de::first_of")]
    pub target: DataType,
    #[serde(default, skip_serializing_if = "is_false")]
    pub parentheses: bool,
}

/// `CASE [<expr>] WHEN .. THEN .. [ELSE ..] END`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    #[serde(default)]
    pub expr: Option<Box<Expr>>,
    pub args: Vec<CaseArm>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub parentheses: bool,
}

/// One branch of a CASE expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CaseArm {
    When { cond: Expr, result: Expr },
    Else { result: Expr },
}

/// A window function such as `ROW_NUMBER() OVER (..)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowFunc {
    #[serde(deserialize_with = "de::text")]
    pub name: String,
    #[serde(default)]
    pub args: Option<Box<Expr>>,
    pub over: Over,
}

/// `<expr>[<index>]...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayAccess {
    pub expr: Box<Expr>,
    #[serde(deserialize_with = "de::one_or_many")]
    pub indices: Vec<Expr>,
}

/// A list of expressions.
///
/// Unwrapped lists stand for their members in comma contexts (function
/// arguments, IN lists); `parentheses` renders them as `(a, b)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprList {
    #[serde(default, deserialize_with = "de::one_or_many")]
    pub value: Vec<Expr>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub parentheses: bool,
}

#[allow(clippy::unnecessary_wraps)]
fn default_var_prefix() -> Option<String> {
    Some("@".to_string())
}

/// A variable reference such as `@name` or `@@session.sql_mode`.
///
/// A missing prefix defaults to `@`; an explicit `null` means no prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Var {
    #[serde(default = "default_var_prefix", deserialize_with = "de::opt_text")]
    pub prefix: Option<String>,
    #[serde(deserialize_with = "de::text")]
    pub name: String,
    #[serde(default, deserialize_with = "de::names", skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub quoted: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl Var {
    /// Creates a `@name` variable.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            prefix: default_var_prefix(),
            name: name.into(),
            members: Vec::new(),
            quoted: None,
            suffix: None,
        }
    }
}

/// `MAP[k1, v1, k2, v2]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    pub keyword: String,
    #[serde(default, deserialize_with = "de::one_or_many")]
    pub expr: Vec<MapEntry>,
}

/// One key/value pair of a map literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    pub key: Expr,
    pub value: Expr,
}

/// `MATCH (<columns>) AGAINST (<expr> [<mode>])`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulltextSearch {
    #[serde(rename = "match", default, deserialize_with = "de::opt_text")]
    pub match_keyword: Option<String>,
    #[serde(default, deserialize_with = "de::one_or_many")]
    pub columns: Vec<ColumnRef>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub against: Option<String>,
    pub expr: Box<Expr>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// `INTERVAL <expr> <unit>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub expr: Box<Expr>,
    #[serde(deserialize_with = "de::text")]
    pub unit: String,
}

/// `EXTRACT(<field> FROM <source>)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extract {
    pub args: ExtractArgs,
}

/// Arguments of [`Extract`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractArgs {
    #[serde(deserialize_with = "de::text")]
    pub field: String,
    pub source: Box<Expr>,
}

/// `<expr> COLLATE <name>`, or a bare `COLLATE [=] <name>` option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collate {
    #[serde(default)]
    pub expr: Option<Box<Expr>>,
    #[serde(deserialize_with = "de::text")]
    pub name: String,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

/// `<left> <symbol> <right>`, such as `@v := 1` or a struct field `'k': v`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assign {
    pub left: Box<Expr>,
    pub symbol: String,
    pub right: Box<Expr>,
}

/// `ARRAY[..]`, `[..]` or `ARRAY(..)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayLiteral {
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, deserialize_with = "de::flag")]
    pub brackets: bool,
    #[serde(default, deserialize_with = "de::one_or_many")]
    pub expr_list: Vec<Expr>,
}

/// `STRUCT(..)`, or a brace literal `{'k': v}` when there is no keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructLiteral {
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, deserialize_with = "de::one_or_many")]
    pub expr_list: Vec<Expr>,
}

/// `x -> <expr>` or `(x, y) -> <expr>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lambda {
    #[serde(deserialize_with = "de::names")]
    pub args: Vec<String>,
    pub expr: Box<Expr>,
}

/// `UNNEST(<expr>)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unnest {
    pub expr: Box<Expr>,
}

/// Passthrough wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wrapped {
    pub expr: Box<Expr>,
}

/// `<KEYWORD> <items>`, e.g. a `JSON '{..}'` literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonExpr {
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, deserialize_with = "de::one_or_many")]
    pub expr_list: Vec<Expr>,
}

/// One JSON path step, `<symbol><expr>`, such as `->'a'`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonVisitor {
    pub symbol: String,
    pub expr: Box<Expr>,
}

/// `<key> VALUE <value>` inside `JSON_OBJECT(..)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonObjectArg {
    pub expr: JsonKeyValue,
}

/// Key and value of a [`JsonObjectArg`]; `on` is the `NULL ON NULL` /
/// `ABSENT ON NULL` choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonKeyValue {
    pub key: Box<Expr>,
    pub value: Box<Expr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on: Option<Box<Expr>>,
}

/// `ANY_VALUE(<expr>) [OVER ..]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnyValue {
    pub args: Wrapped,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub over: Option<Over>,
}

/// `FLATTEN(INPUT => .., PATH => .., OUTER => .., RECURSIVE => .., MODE => ..)`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Flatten {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Box<Expr>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Box<Expr>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer: Option<Box<Expr>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recursive: Option<Box<Expr>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Box<Expr>>,
}

/// A set-returning call with a column-definition alias:
/// `crosstab(..) AS ct(row_name TEXT, ..)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableFunc {
    #[serde(deserialize_with = "de::qualified_name")]
    pub name: String,
    pub args: Box<Expr>,
    #[serde(rename = "as", default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<Box<Expr>>,
}

/// A named argument, `<name> <symbol> <expr>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncArg {
    pub value: NamedArg,
}

/// Parts of a [`FuncArg`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedArg {
    #[serde(deserialize_with = "de::text")]
    pub name: String,
    pub symbol: String,
    pub expr: Box<Expr>,
}

/// `w AS (..), w2 AS w`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedWindows {
    #[serde(default, deserialize_with = "de::one_or_many")]
    pub expr: Vec<NamedWindow>,
}

/// One entry of a `WINDOW` clause.
///
/// A specification carrying only a name refers to another window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedWindow {
    #[serde(deserialize_with = "de::text")]
    pub name: String,
    #[serde(rename = "as_window_specification", deserialize_with = "de::window_spec")]
    pub spec: Over,
}

/// A bare table list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableList {
    #[serde(default, deserialize_with = "de::one_or_many")]
    pub expr: Vec<TableExpr>,
}

/// A numeric literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberLiteral {
    pub value: Number,
    #[serde(default, skip_serializing_if = "is_false")]
    pub parentheses: bool,
}

/// A literal carried as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLiteral {
    #[serde(deserialize_with = "de::text")]
    pub value: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub parentheses: bool,
}

impl TextLiteral {
    /// Creates an unparenthesized text literal.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            parentheses: false,
        }
    }
}

/// `TRUE` / `FALSE`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoolLiteral {
    pub value: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub parentheses: bool,
}

/// `NULL`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullLiteral {}

/// A bare `*` outside a column reference, as in `COUNT(*)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarLiteral {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dispatch_on_type_tag() {
        let expr: Expr = serde_json::from_value(json!({
            "type": "binary_expr",
            "operator": "=",
            "left": {"type": "column_ref", "table": null, "column": "id"},
            "right": {"type": "number", "value": 1}
        }))
        .unwrap();
        assert_eq!(expr, Expr::column("id").binary("=", Expr::number(1)));
    }

    #[test]
    fn test_ast_wrapper_is_hoisted() {
        let expr = Expr::from_value(json!({
            "ast": {"type": "column_ref", "table": "t", "column": "id"},
            "parentheses": false
        }))
        .unwrap();
        assert_eq!(expr, Expr::qualified_column("t", "id"));
    }

    #[test]
    fn test_nested_ast_wrappers_are_hoisted_iteratively() {
        let value = hoist_ast(json!({"ast": {"ast": {"type": "null"}}}));
        assert_eq!(value, json!({"type": "null"}));
    }

    #[test]
    fn test_unknown_kind_is_kept_verbatim() {
        let value = json!({"type": "mystery", "value": 3});
        let expr = Expr::from_value(value.clone()).unwrap();
        assert_eq!(expr, Expr::Unknown(value));
        assert_eq!(expr.kind(), "mystery");
    }

    #[test]
    fn test_untagged_scalar_is_unknown() {
        let expr: Expr = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(expr.kind(), "value");
        assert_eq!(expr.literal_text(), Some("42".to_string()));
    }

    #[test]
    fn test_string_kind_aliases() {
        let a = Expr::from_value(json!({"type": "single_quote_string", "value": "x"})).unwrap();
        let b = Expr::from_value(json!({"type": "string", "value": "x"})).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_column_name_spellings() {
        let star: ColumnRef = serde_json::from_value(json!({"column": "*"})).unwrap();
        assert_eq!(star.column, ColumnName::Star);

        let nested: ColumnRef =
            serde_json::from_value(json!({"column": {"expr": {"type": "default", "value": "id"}}}))
                .unwrap();
        assert_eq!(nested.column.text(), Some("id".to_string()));
    }

    #[test]
    fn test_serialize_carries_type_tag() {
        let value = serde_json::to_value(Expr::column("id")).unwrap();
        assert_eq!(value["type"], "column_ref");
        assert_eq!(value["column"], "id");
        let value = serde_json::to_value(Expr::null()).unwrap();
        assert_eq!(value, json!({"type": "null"}));
    }

    #[test]
    fn test_var_prefix_defaults() {
        let missing: Var = serde_json::from_value(json!({"name": "v"})).unwrap();
        assert_eq!(missing.prefix.as_deref(), Some("@"));
        let explicit_null: Var = serde_json::from_value(json!({"name": "v", "prefix": null})).unwrap();
        assert_eq!(explicit_null.prefix, None);
    }

    #[test]
    fn test_parenthesized_sets_flag_or_wraps() {
        let Expr::BinaryExpr(bin) = Expr::column("a").binary("+", Expr::number(1)).parenthesized()
        else {
            panic!("expected binary expression");
        };
        assert!(bin.parentheses);

        let Expr::ExprList(list) = Expr::Var(Var::new("v")).parenthesized() else {
            panic!("expected list wrapper");
        };
        assert!(list.parentheses);
        assert_eq!(list.value.len(), 1);
    }
}

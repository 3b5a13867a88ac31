//! SQL data types and column definitions.
//!
//! Type names are kept exactly as written (`String`, `DATETIME64`, `varchar`)
//! because several dialects treat them case-sensitively.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::de::{self, is_false};
use super::{ColumnName, ColumnRef, Expr};

/// A data type, possibly parameterized: `VARCHAR(255)`, `DECIMAL(10, 2)`,
/// `MAP(VARCHAR, INTEGER)`, `STRUCT(name VARCHAR)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataType {
    /// Type name as written.
    #[serde(rename = "dataType", deserialize_with = "de::text")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u64>,
    /// Nested element types or struct fields.
    #[serde(default, deserialize_with = "de::one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Expr>,
    /// Trailing modifiers such as `UNSIGNED`.
    #[serde(default, deserialize_with = "de::names", skip_serializing_if = "Vec::is_empty")]
    pub suffix: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub array: bool,
}

impl DataType {
    /// Creates an unparameterized type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            length: None,
            scale: None,
            args: Vec::new(),
            suffix: Vec::new(),
            array: false,
        }
    }

    /// Sets the length or precision.
    #[must_use]
    pub const fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets the scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: u64) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Adds a nested type or struct field.
    #[must_use]
    pub fn with_arg(mut self, arg: Expr) -> Self {
        self.args.push(arg);
        self
    }

    /// Returns the SQL representation with nested names left unquoted.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let mut sql = self.name.clone();
        match (self.length, self.scale) {
            (Some(length), Some(scale)) => sql.push_str(&format!("({length}, {scale})")),
            (Some(length), None) => sql.push_str(&format!("({length})")),
            _ if !self.args.is_empty() => {
                let args: Vec<String> = self.args.iter().map(bare_arg).collect();
                sql.push_str(&format!("({})", args.join(", ")));
            }
            _ => {}
        }
        if self.array {
            sql.push_str("[]");
        }
        for suffix in &self.suffix {
            sql.push(' ');
            sql.push_str(&suffix.to_uppercase());
        }
        sql
    }
}

fn bare_arg(arg: &Expr) -> String {
    match arg {
        Expr::Datatype(ty) => ty.to_sql(),
        Expr::ColumnDefinition(def) => {
            let name = def.column.column.text().unwrap_or_default();
            format!("{name} {}", def.definition.to_sql())
        }
        other => other.literal_text().unwrap_or_default(),
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// Slot value that may arrive wrapped as `{ "type": "default", "value": <node> }`.
fn wrapped_expr<'de, D>(deserializer: D) -> Result<Option<Box<Expr>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;
    let value = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(mut map)) if map.get("value").is_some_and(Value::is_object) => {
            map.remove("value").unwrap_or(Value::Null)
        }
        Some(other) => other,
    };
    Expr::from_value(value)
        .map(|expr| Some(Box::new(expr)))
        .map_err(D::Error::custom)
}

/// A column definition inside CREATE TABLE or a STRUCT type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub column: ColumnRef,
    pub definition: DataType,
    /// `not null` or `null`, as written.
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub nullable: Option<String>,
    #[serde(default, deserialize_with = "wrapped_expr", skip_serializing_if = "Option::is_none")]
    pub default_val: Option<Box<Expr>>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub auto_increment: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub unique: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    #[serde(default, deserialize_with = "wrapped_expr", skip_serializing_if = "Option::is_none")]
    pub comment: Option<Box<Expr>>,
    #[serde(default, deserialize_with = "de::opt_text", skip_serializing_if = "Option::is_none")]
    pub collate: Option<String>,
}

impl ColumnDefinition {
    /// Creates a definition with no constraints.
    #[must_use]
    pub fn new(name: impl Into<String>, definition: DataType) -> Self {
        Self {
            column: ColumnRef::new(name),
            definition,
            nullable: None,
            default_val: None,
            auto_increment: None,
            unique: None,
            primary_key: None,
            comment: None,
            collate: None,
        }
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        match &self.column.column {
            ColumnName::Star => None,
            other => other.text(),
        }
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = Some("not null".to_string());
        self
    }

    /// Sets the column as PRIMARY KEY.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = Some("primary key".to_string());
        self
    }

    /// Sets the column as UNIQUE.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = Some("unique".to_string());
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, expr: Expr) -> Self {
        self.default_val = Some(Box::new(expr));
        self
    }
}

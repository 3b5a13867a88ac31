//! Lenient deserializers for AST fields.
//!
//! ASTs produced by other tooling spell the same slot several ways: a name
//! may be a string or `{ "value": "..." }`, a flag may be `true`, a keyword
//! string or an object, a list may be a single node. These helpers accept
//! every spelling and hand the renderer one canonical value.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::Over;

/// Extracts the text of a name-like value.
pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(parts) => {
            let parts: Vec<String> = parts.iter().filter_map(value_text).collect();
            (!parts.is_empty()).then(|| parts.join("."))
        }
        Value::Object(map) => ["value", "column", "name", "type"]
            .iter()
            .find_map(|key| map.get(*key).and_then(value_text)),
        _ => None,
    }
}

/// A possibly schema-qualified name: `"f"`, `{ "name": [..] }` or
/// `{ "schema": "s", "name": [..] }`, joined with `.`.
pub(crate) fn qualified_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parts: Vec<String> = match &value {
        Value::Object(map) if map.contains_key("name") => ["schema", "name"]
            .iter()
            .filter_map(|key| map.get(*key))
            .filter_map(value_text)
            .collect(),
        other => value_text(other).into_iter().collect(),
    };
    if parts.is_empty() {
        return Err(D::Error::custom(format!("invalid name: {value}")));
    }
    Ok(parts.join("."))
}

/// A window specification: a window name, an inline specification, or
/// either one wrapped in `{ "window_specification": .. }`.
pub(crate) fn window_spec<'de, D>(deserializer: D) -> Result<Over, D::Error>
where
    D: Deserializer<'de>,
{
    let mut value = Value::deserialize(deserializer)?;
    if let Some(inner) = value
        .as_object_mut()
        .and_then(|map| map.remove("window_specification"))
    {
        value = inner;
    }
    match value {
        Value::String(name) => Ok(Over {
            name: Some(name),
            ..Over::default()
        }),
        other => Over::deserialize(other).map_err(D::Error::custom),
    }
}

/// Optional name: `null`, `"x"`, or `{ "value": "x" }`.
pub(crate) fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_text))
}

/// Required name, with the same spellings as [`opt_text`].
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_text(&value).ok_or_else(|| D::Error::custom(format!("expected a name, found {value}")))
}

/// Flag: absent, `null`, `false` and `""` are unset; anything else is set.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    })
}

/// A list that may also be written as a single element.
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
            .collect(),
        Some(single) => serde_json::from_value(single)
            .map(|item| vec![item])
            .map_err(D::Error::custom),
    }
}

/// A single node that may also arrive as the first element of a list.
pub(crate) fn first_of<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .next()
            .ok_or_else(|| D::Error::custom("expected at least one element"))?,
        single => single,
    };
    serde_json::from_value(value).map_err(D::Error::custom)
}

/// Optional list, also accepting the `{ "columns": [...] }` wrapper used for
/// GROUP BY.
pub(crate) fn opt_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(mut map)) if map.contains_key("columns") => {
            map.remove("columns").unwrap_or(Value::Null)
        }
        Some(other) => other,
    };
    match items {
        Value::Null => Ok(None),
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
            .collect::<Result<Vec<T>, _>>()
            .map(Some),
        single => serde_json::from_value(single)
            .map(|item| Some(vec![item]))
            .map_err(D::Error::custom),
    }
}

/// List of names, each written as a string or a name-bearing object.
pub(crate) fn names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.iter().filter_map(value_text).collect()),
        Some(single) => Ok(value_text(&single).into_iter().collect()),
    }
}

/// Optional list of names.
pub(crate) fn opt_names<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = names(deserializer)?;
    Ok((!names.is_empty()).then_some(names))
}

/// Serializer counterpart of [`flag`]: skip unset flags.
#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) const fn is_false(value: &bool) -> bool {
    !*value
}

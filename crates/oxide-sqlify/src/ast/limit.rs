//! Row limits and the wire shapes they arrive in.
//!
//! Front-ends have historically emitted three different limit shapes. They
//! are recognized once, here, and normalized into [`Limit`]; the renderer only
//! ever sees the normalized form.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use super::de::value_text;
use super::Expr;

/// A normalized row limit.
///
/// `comma` records that the source used MySQL's `LIMIT <offset>, <count>`
/// form, which dialects that accept it reproduce. `fetch_suffix` holds the
/// words after an ANSI `FETCH` count when they say more than `ROWS ONLY`,
/// e.g. `PERCENT ROWS ONLY` or `ROWS WITH TIES`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Limit {
    pub count: Option<Expr>,
    pub offset: Option<Expr>,
    pub comma: bool,
    pub fetch_suffix: Vec<String>,
}

impl Limit {
    /// `LIMIT <count>`
    #[must_use]
    pub const fn count(count: Expr) -> Self {
        Self {
            count: Some(count),
            offset: None,
            comma: false,
            fetch_suffix: Vec::new(),
        }
    }

    /// `OFFSET <offset>` alone.
    #[must_use]
    pub const fn offset_only(offset: Expr) -> Self {
        Self {
            count: None,
            offset: Some(offset),
            comma: false,
            fetch_suffix: Vec::new(),
        }
    }

    /// Adds an offset.
    #[must_use]
    pub fn with_offset(mut self, offset: Expr) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Keeps the words that followed a `FETCH` count. Plain `ROWS ONLY` is
    /// dropped since every dialect spells it on its own.
    #[must_use]
    pub fn with_fetch_suffix<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .flat_map(|w| {
                w.as_ref()
                    .split_whitespace()
                    .map(str::to_ascii_uppercase)
                    .collect::<Vec<_>>()
            })
            .collect();
        let plain = words
            .iter()
            .all(|w| matches!(w.as_str(), "ROW" | "ROWS" | "ONLY"));
        self.fetch_suffix = if plain { Vec::new() } else { words };
        self
    }

    /// Marks the limit as written in comma form.
    #[must_use]
    pub const fn with_comma(mut self) -> Self {
        self.comma = true;
        self
    }
}

/// The wire shapes of a row limit.
#[derive(Debug, Clone, PartialEq)]
pub enum LimitSpec {
    /// `{ "separator": "offset" | "," | .., "value": [..] }`
    Separated { separator: String, value: Vec<Expr> },
    /// `{ "fetch": { "prefix": [..], "value": .., "suffix": [..] }, "offset": { .. } }`
    FetchOffset {
        fetch: Option<Expr>,
        fetch_suffix: Vec<String>,
        offset: Option<Expr>,
    },
    /// `[count]` or `[offset, count]`
    List(Vec<Expr>),
    /// A bare numeric or typed node standing for the count.
    Bare(Expr),
}

/// Unwraps `{ "value": <node> }` wrappers that carry no type of their own.
fn unwrap_value(value: Value) -> Value {
    match value {
        Value::Object(mut map) if !map.contains_key("type") && map.contains_key("value") => {
            map.remove("value").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn is_present(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).is_some_and(|v| !v.is_null())
}

/// Reads a `{ prefix, value, suffix }` triple into its value and suffix words.
fn triple(
    map: &mut Map<String, Value>,
    key: &str,
) -> serde_json::Result<(Option<Expr>, Vec<String>)> {
    let Some(part) = map.remove(key).filter(|v| !v.is_null()) else {
        return Ok((None, Vec::new()));
    };
    let suffix = match &part {
        Value::Object(fields) => match fields.get("suffix") {
            Some(Value::Array(words)) => words.iter().filter_map(value_text).collect(),
            Some(other) => value_text(other).into_iter().collect(),
            None => Vec::new(),
        },
        _ => Vec::new(),
    };
    let value = Expr::from_value(unwrap_value(part))?;
    Ok((Some(value), suffix))
}

impl LimitSpec {
    /// Classifies a JSON limit. Returns `None` for shapes that carry no limit.
    ///
    /// Precedence: fetch/offset keys, then a keyed `value` list, then a bare
    /// node, then a plain list.
    ///
    /// # Errors
    ///
    /// Returns an error when an element of a recognized shape is malformed.
    pub fn from_value(value: Value) -> serde_json::Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::Object(mut map) => {
                if is_present(&map, "fetch") || is_present(&map, "offset") {
                    let (fetch, fetch_suffix) = triple(&mut map, "fetch")?;
                    let (offset, _) = triple(&mut map, "offset")?;
                    return Ok(Some(Self::FetchOffset {
                        fetch,
                        fetch_suffix,
                        offset,
                    }));
                }
                if let Some(Value::Array(items)) = map.get("value") {
                    let separator = map
                        .get("separator")
                        .or_else(|| map.get("seperator"))
                        .and_then(value_text)
                        .unwrap_or_default();
                    let value = items
                        .iter()
                        .cloned()
                        .map(Expr::from_value)
                        .collect::<serde_json::Result<Vec<_>>>()?;
                    return Ok(Some(Self::Separated { separator, value }));
                }
                if map.contains_key("type") {
                    return Expr::from_value(Value::Object(map)).map(|e| Some(Self::Bare(e)));
                }
                match map.remove("value") {
                    None | Some(Value::Null) => Ok(None),
                    Some(inner) => Expr::from_value(inner).map(|e| Some(Self::Bare(e))),
                }
            }
            Value::Array(items) => items
                .into_iter()
                .map(|item| Expr::from_value(unwrap_value(item)))
                .collect::<serde_json::Result<Vec<_>>>()
                .map(|items| Some(Self::List(items))),
            scalar => Expr::from_value(scalar).map(|e| Some(Self::Bare(e))),
        }
    }

    /// Normalizes into a [`Limit`]; `None` when the shape holds no usable limit.
    #[must_use]
    pub fn normalize(self) -> Option<Limit> {
        match self {
            Self::FetchOffset {
                fetch,
                fetch_suffix,
                offset,
            } => {
                if fetch.is_none() && offset.is_none() {
                    return None;
                }
                let limit = Limit {
                    count: fetch,
                    offset,
                    ..Limit::default()
                };
                Some(limit.with_fetch_suffix(fetch_suffix))
            }
            Self::Separated {
                separator,
                mut value,
            } => {
                let is_offset = separator.trim().eq_ignore_ascii_case("offset");
                match value.len() {
                    1 => value.pop().map(|v| {
                        if is_offset {
                            Limit::offset_only(v)
                        } else {
                            Limit::count(v)
                        }
                    }),
                    2 => {
                        let second = value.pop()?;
                        let first = value.pop()?;
                        if separator.trim() == "," {
                            Some(Limit::count(second).with_offset(first).with_comma())
                        } else {
                            Some(Limit::count(first).with_offset(second))
                        }
                    }
                    n => {
                        debug!(values = n, "Ignoring limit with unexpected value count");
                        None
                    }
                }
            }
            Self::List(mut items) => match items.len() {
                1 => items.pop().map(Limit::count),
                2 => {
                    let count = items.pop()?;
                    let offset = items.pop()?;
                    Some(Limit::count(count).with_offset(offset))
                }
                n => {
                    debug!(values = n, "Ignoring limit list with unexpected length");
                    None
                }
            },
            Self::Bare(expr) => Some(Limit::count(expr)),
        }
    }
}

/// Reads an optional limit slot, tolerating every wire shape.
pub(crate) fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<Limit>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    let spec = LimitSpec::from_value(value).map_err(D::Error::custom)?;
    Ok(spec.and_then(LimitSpec::normalize))
}

#[derive(Serialize)]
struct Triple<'a> {
    prefix: Vec<&'a str>,
    value: &'a Expr,
    suffix: Vec<&'a str>,
}

/// Limits serialize in the keyed `separator`/`value` shape, or as ANSI
/// fetch/offset triples when FETCH modifiers must survive.
impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let (Some(count), false) = (&self.count, self.fetch_suffix.is_empty()) {
            let first = if self.offset.is_some() { "NEXT" } else { "FIRST" };
            let fetch = Triple {
                prefix: vec!["FETCH", first],
                value: count,
                suffix: self.fetch_suffix.iter().map(String::as_str).collect(),
            };
            let offset = self.offset.as_ref().map(|value| Triple {
                prefix: vec!["OFFSET"],
                value,
                suffix: vec!["ROWS"],
            });
            let mut map = serializer.serialize_map(Some(2))?;
            map.serialize_entry("fetch", &fetch)?;
            map.serialize_entry("offset", &offset)?;
            return map.end();
        }
        let (separator, value): (&str, Vec<&Expr>) = match (&self.count, &self.offset) {
            (Some(count), Some(offset)) if self.comma => (",", vec![offset, count]),
            (Some(count), Some(offset)) => ("offset", vec![count, offset]),
            (Some(count), None) => ("", vec![count]),
            (None, Some(offset)) => ("offset", vec![offset]),
            (None, None) => ("", Vec::new()),
        };
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("separator", separator)?;
        map.serialize_entry("value", &value)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(value: Value) -> Option<Limit> {
        LimitSpec::from_value(value).unwrap().and_then(LimitSpec::normalize)
    }

    fn num(n: i64) -> Value {
        json!({"type": "number", "value": n})
    }

    #[test]
    fn test_three_shapes_agree() {
        let expected = Some(Limit::count(Expr::number(25)).with_offset(Expr::number(0)));

        let keyed = json!({"separator": "offset", "value": [num(25), num(0)]});
        let list = json!([{"value": num(0)}, {"value": num(25)}]);
        let fetch = json!({
            "fetch": {"prefix": [], "value": num(25), "suffix": []},
            "offset": {"prefix": [], "value": num(0), "suffix": []}
        });

        assert_eq!(normalize(keyed), expected);
        assert_eq!(normalize(list), expected);
        assert_eq!(normalize(fetch), expected);
    }

    #[test]
    fn test_comma_separator_is_offset_first() {
        let limit = normalize(json!({"seperator": ",", "value": [num(10), num(5)]})).unwrap();
        assert_eq!(limit.offset, Some(Expr::number(10)));
        assert_eq!(limit.count, Some(Expr::number(5)));
        assert!(limit.comma);
    }

    #[test]
    fn test_single_value_with_offset_separator() {
        let limit = normalize(json!({"separator": "offset", "value": [num(7)]})).unwrap();
        assert_eq!(limit, Limit::offset_only(Expr::number(7)));
    }

    #[test]
    fn test_bare_numeric_limit() {
        assert_eq!(
            normalize(json!({"type": "number", "value": 10})),
            Some(Limit::count(Expr::number(10)))
        );
    }

    #[test]
    fn test_fetch_wins_over_value() {
        let limit = normalize(json!({
            "fetch": {"value": num(3)},
            "value": [num(99)]
        }))
        .unwrap();
        assert_eq!(limit.count, Some(Expr::number(3)));
    }

    #[test]
    fn test_unrecognized_shapes_yield_nothing() {
        assert_eq!(normalize(json!(null)), None);
        assert_eq!(normalize(json!([])), None);
        assert_eq!(normalize(json!([num(1), num(2), num(3)])), None);
        assert_eq!(normalize(json!({"separator": "", "value": []})), None);
        assert_eq!(normalize(json!({"unrelated": true})), None);
    }

    #[test]
    fn test_fetch_modifiers_are_kept() {
        let limit = normalize(json!({
            "fetch": {"prefix": ["FETCH", "FIRST"], "value": num(10), "suffix": ["PERCENT", "ROWS", "ONLY"]}
        }))
        .unwrap();
        assert_eq!(limit.count, Some(Expr::number(10)));
        assert_eq!(limit.fetch_suffix, vec!["PERCENT", "ROWS", "ONLY"]);

        let ties = normalize(json!({
            "fetch": {"prefix": ["fetch", "next"], "value": num(5), "suffix": ["rows with ties"]},
            "offset": {"prefix": ["offset"], "value": num(2), "suffix": ["rows"]}
        }))
        .unwrap();
        assert_eq!(ties.offset, Some(Expr::number(2)));
        assert_eq!(ties.fetch_suffix, vec!["ROWS", "WITH", "TIES"]);
    }

    #[test]
    fn test_plain_fetch_suffix_is_dropped() {
        let limit = normalize(json!({
            "fetch": {"prefix": ["FETCH", "NEXT"], "value": num(5), "suffix": ["ROWS", "ONLY"]}
        }))
        .unwrap();
        assert_eq!(limit, Limit::count(Expr::number(5)));
    }

    #[test]
    fn test_fetch_modifiers_survive_serialization() {
        let limit = Limit::count(Expr::number(10))
            .with_offset(Expr::number(20))
            .with_fetch_suffix(["PERCENT ROWS ONLY"]);
        let value = serde_json::to_value(&limit).unwrap();
        assert_eq!(value["fetch"]["suffix"], json!(["PERCENT", "ROWS", "ONLY"]));
        assert_eq!(normalize(value), Some(limit));
    }

    #[test]
    fn test_serialized_form_normalizes_back() {
        let limit = Limit::count(Expr::number(5)).with_offset(Expr::number(10)).with_comma();
        let value = serde_json::to_value(&limit).unwrap();
        assert_eq!(value["separator"], ",");
        assert_eq!(normalize(value), Some(limit));
    }
}

//! Attribute value model
//!
//! Every value that flows between configuration, state and contract code is
//! an [`AttrValue`]. One variant per value kind keeps reads and writes
//! exhaustive; absent fields are `Null` rather than a missing key so callers
//! never juggle `Option<AttrValue>`.

use std::collections::BTreeMap;

/// Attribute values keyed by field name.
pub type AttrMap = BTreeMap<String, AttrValue>;

/// A single attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Field is absent / unset.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<AttrValue>),
    Set(Vec<AttrValue>),
    /// String-keyed map of values.
    Map(BTreeMap<String, AttrValue>),
    /// A nested object (one block instance).
    Object(BTreeMap<String, AttrValue>),
}

impl AttrValue {
    /// Human-readable kind name for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            AttrValue::Null => "null",
            AttrValue::Bool(_) => "bool",
            AttrValue::Int(_) => "int",
            AttrValue::Float(_) => "float",
            AttrValue::String(_) => "string",
            AttrValue::List(_) => "list",
            AttrValue::Set(_) => "set",
            AttrValue::Map(_) => "map",
            AttrValue::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// Whether this is the zero value for its kind (`false`, `0`, `""`,
    /// an empty collection). Distinguishing zero from absent is what
    /// separates `get_value` from `get_raw_value` on resource data.
    pub fn is_zero(&self) -> bool {
        match self {
            AttrValue::Null => true,
            AttrValue::Bool(v) => !v,
            AttrValue::Int(v) => *v == 0,
            AttrValue::Float(v) => *v == 0.0,
            AttrValue::String(v) => v.is_empty(),
            AttrValue::List(v) | AttrValue::Set(v) => v.is_empty(),
            AttrValue::Map(v) | AttrValue::Object(v) => v.is_empty(),
        }
    }

    /// Converts into the JSON representation used at the field-codec
    /// boundary. Sets serialize as arrays; `Null` as JSON null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            AttrValue::Null => serde_json::Value::Null,
            AttrValue::Bool(v) => serde_json::Value::Bool(*v),
            AttrValue::Int(v) => serde_json::Value::from(*v),
            AttrValue::Float(v) => serde_json::Value::from(*v),
            AttrValue::String(v) => serde_json::Value::String(v.clone()),
            AttrValue::List(items) | AttrValue::Set(items) => {
                serde_json::Value::Array(items.iter().map(AttrValue::to_json).collect())
            }
            AttrValue::Map(entries) | AttrValue::Object(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Best-effort conversion from JSON without a schema: integral numbers
    /// become `Int`, arrays become `List`, objects become `Object`. Use
    /// [`crate::AttrKind::value_from_json`] when the target kind is known.
    pub fn from_json(value: serde_json::Value) -> AttrValue {
        match value {
            serde_json::Value::Null => AttrValue::Null,
            serde_json::Value::Bool(v) => AttrValue::Bool(v),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    AttrValue::Int(i)
                } else {
                    AttrValue::Float(n.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(v) => AttrValue::String(v),
            serde_json::Value::Array(items) => {
                AttrValue::List(items.into_iter().map(AttrValue::from_json).collect())
            }
            serde_json::Value::Object(entries) => AttrValue::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, AttrValue::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(v: bool) -> Self {
        AttrValue::Bool(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::String(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::String(v)
    }
}

impl<V: Into<AttrValue>> From<Vec<V>> for AttrValue {
    fn from(items: Vec<V>) -> Self {
        AttrValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, String>> for AttrValue {
    fn from(entries: BTreeMap<String, String>) -> Self {
        AttrValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k, AttrValue::String(v)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values_are_zero_but_not_null() {
        for value in [
            AttrValue::Bool(false),
            AttrValue::Int(0),
            AttrValue::String(String::new()),
            AttrValue::List(Vec::new()),
        ] {
            assert!(value.is_zero(), "{value:?}");
            assert!(!value.is_null(), "{value:?}");
        }
        assert!(AttrValue::Null.is_zero());
        assert!(!AttrValue::Int(3).is_zero());
        assert!(!AttrValue::String("x".into()).is_zero());
    }

    #[test]
    fn json_round_trip_preserves_scalars() {
        let value = AttrValue::Object(BTreeMap::from([
            ("name".to_string(), AttrValue::from("demo")),
            ("size".to_string(), AttrValue::from(20_i64)),
            ("enabled".to_string(), AttrValue::from(true)),
        ]));
        assert_eq!(AttrValue::from_json(value.to_json()), value);
    }

    #[test]
    fn integral_json_numbers_become_ints() {
        assert_eq!(
            AttrValue::from_json(serde_json::json!(42)),
            AttrValue::Int(42)
        );
        assert_eq!(
            AttrValue::from_json(serde_json::json!(1.5)),
            AttrValue::Float(1.5)
        );
    }
}

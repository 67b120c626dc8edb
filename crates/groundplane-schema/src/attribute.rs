//! Compiled declarative schema
//!
//! The strongly-typed attribute tree served to hosts speaking the newer
//! plugin protocol. Built once per contract by the [`crate::compiler`] and
//! immutable afterwards.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{Result, SchemaError};
use crate::value::AttrValue;

/// The type of a compiled attribute.
///
/// Collection kinds carry their element kind; nested-object kinds carry the
/// field map. A block declared with a maximum cardinality of one compiles to
/// [`AttrKind::SingleNested`], which is a different shape from a list that
/// happens to hold one element — consumers rely on that distinction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrKind {
    Bool,
    Int,
    Float,
    String,
    List(Box<AttrKind>),
    Set(Box<AttrKind>),
    Map(Box<AttrKind>),
    SingleNested(BTreeMap<String, Attribute>),
    ListNested(BTreeMap<String, Attribute>),
    SetNested(BTreeMap<String, Attribute>),
}

impl AttrKind {
    /// Human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self {
            AttrKind::Bool => "bool".to_string(),
            AttrKind::Int => "int".to_string(),
            AttrKind::Float => "float".to_string(),
            AttrKind::String => "string".to_string(),
            AttrKind::List(elem) => format!("list of {}", elem.describe()),
            AttrKind::Set(elem) => format!("set of {}", elem.describe()),
            AttrKind::Map(elem) => format!("map of {}", elem.describe()),
            AttrKind::SingleNested(_) => "nested object".to_string(),
            AttrKind::ListNested(_) => "list of nested objects".to_string(),
            AttrKind::SetNested(_) => "set of nested objects".to_string(),
        }
    }

    /// Whether this kind models at most one nested block.
    pub fn is_singular_nested(&self) -> bool {
        matches!(self, AttrKind::SingleNested(_))
    }

    /// Type-checks `value` against this kind. `Null` always passes: absence
    /// is legal at the value layer, requiredness is enforced by the host.
    pub fn check_value(&self, name: &str, value: &AttrValue) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        let mismatch = || SchemaError::TypeMismatch {
            name: name.to_string(),
            expected: self.describe(),
            found: value.kind_name().to_string(),
        };
        match self {
            AttrKind::Bool => matches!(value, AttrValue::Bool(_))
                .then_some(())
                .ok_or_else(mismatch),
            AttrKind::Int => matches!(value, AttrValue::Int(_))
                .then_some(())
                .ok_or_else(mismatch),
            // Ints are acceptable where a float is expected; JSON makes no
            // distinction for whole numbers.
            AttrKind::Float => matches!(value, AttrValue::Float(_) | AttrValue::Int(_))
                .then_some(())
                .ok_or_else(mismatch),
            AttrKind::String => matches!(value, AttrValue::String(_))
                .then_some(())
                .ok_or_else(mismatch),
            AttrKind::List(elem) => match value {
                AttrValue::List(items) => {
                    for item in items {
                        elem.check_value(name, item)?;
                    }
                    Ok(())
                }
                _ => Err(mismatch()),
            },
            AttrKind::Set(elem) => match value {
                AttrValue::Set(items) | AttrValue::List(items) => {
                    for item in items {
                        elem.check_value(name, item)?;
                    }
                    Ok(())
                }
                _ => Err(mismatch()),
            },
            AttrKind::Map(elem) => match value {
                AttrValue::Map(entries) => {
                    for entry in entries.values() {
                        elem.check_value(name, entry)?;
                    }
                    Ok(())
                }
                _ => Err(mismatch()),
            },
            AttrKind::SingleNested(fields) => match value {
                AttrValue::Object(entries) => check_object(name, fields, entries),
                _ => Err(mismatch()),
            },
            AttrKind::ListNested(fields) | AttrKind::SetNested(fields) => match value {
                AttrValue::List(items) | AttrValue::Set(items) => {
                    for item in items {
                        match item {
                            AttrValue::Object(entries) => check_object(name, fields, entries)?,
                            _ => return Err(mismatch()),
                        }
                    }
                    Ok(())
                }
                _ => Err(mismatch()),
            },
        }
    }

    /// Converts a JSON value into an [`AttrValue`] of this kind,
    /// type-checking along the way. This is the write half of the
    /// field-codec boundary: models serialize to JSON, the schema decides
    /// how each field lands in the attribute store.
    pub fn value_from_json(&self, name: &str, value: serde_json::Value) -> Result<AttrValue> {
        if value.is_null() {
            return Ok(AttrValue::Null);
        }
        let candidate = match self {
            AttrKind::Set(elem) => match value {
                serde_json::Value::Array(items) => AttrValue::Set(
                    items
                        .into_iter()
                        .map(|item| elem.value_from_json(name, item))
                        .collect::<Result<Vec<_>>>()?,
                ),
                other => AttrValue::from_json(other),
            },
            AttrKind::SetNested(_) => match value {
                serde_json::Value::Array(items) => {
                    AttrValue::Set(items.into_iter().map(AttrValue::from_json).collect())
                }
                other => AttrValue::from_json(other),
            },
            AttrKind::Map(elem) => match value {
                serde_json::Value::Object(entries) => AttrValue::Map(
                    entries
                        .into_iter()
                        .map(|(k, v)| Ok((k, elem.value_from_json(name, v)?)))
                        .collect::<Result<BTreeMap<_, _>>>()?,
                ),
                other => AttrValue::from_json(other),
            },
            AttrKind::Float => match value {
                serde_json::Value::Number(ref n) => {
                    AttrValue::Float(n.as_f64().unwrap_or_default())
                }
                other => AttrValue::from_json(other),
            },
            _ => AttrValue::from_json(value),
        };
        self.check_value(name, &candidate)?;
        Ok(candidate)
    }
}

fn check_object(
    name: &str,
    fields: &BTreeMap<String, Attribute>,
    entries: &BTreeMap<String, AttrValue>,
) -> Result<()> {
    for (key, entry) in entries {
        let attribute = fields
            .get(key)
            .ok_or_else(|| SchemaError::UnknownAttribute {
                name: format!("{name}.{key}"),
            })?;
        attribute.kind.check_value(&format!("{name}.{key}"), entry)?;
    }
    Ok(())
}

/// One compiled attribute: type, behaviour flags, documentation, and the
/// cardinality bounds carried over from the legacy definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub kind: AttrKind,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

impl Attribute {
    pub fn new(kind: AttrKind) -> Self {
        Self {
            kind,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            description: None,
            deprecation_message: None,
            min_items: None,
            max_items: None,
        }
    }

    /// Type-checks a value, including the cardinality bounds. The bounds
    /// were static schema fields in the legacy format; here they run as
    /// part of every write.
    pub fn check_value(&self, name: &str, value: &AttrValue) -> Result<()> {
        self.kind.check_value(name, value)?;

        if self.min_items.is_none() && self.max_items.is_none() {
            return Ok(());
        }
        let count = match value {
            AttrValue::List(items) | AttrValue::Set(items) => items.len(),
            AttrValue::Map(entries) => entries.len(),
            // Singular nested objects and scalars have no item count.
            _ => return Ok(()),
        };
        let below = self.min_items.is_some_and(|min| count < min);
        let above = self.max_items.is_some_and(|max| count > max);
        if below || above {
            return Err(SchemaError::Cardinality {
                name: name.to_string(),
                min: self.min_items,
                max: self.max_items,
                actual: count,
            });
        }
        Ok(())
    }
}

/// The complete compiled schema of one resource or data-source kind:
/// the merged argument/attribute map plus the declared schema version.
///
/// The version is surfaced to the host for state-upgrade support; migration
/// itself is out of scope and never performed here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeSchema {
    pub attributes: BTreeMap<String, Attribute>,
    pub version: i64,
}

impl AttributeSchema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Validates a single write against the schema: the key must exist and
    /// the value must match its compiled attribute.
    pub fn check_write(&self, name: &str, value: &AttrValue) -> Result<()> {
        let attribute = self
            .attributes
            .get(name)
            .ok_or_else(|| SchemaError::UnknownAttribute {
                name: name.to_string(),
            })?;
        attribute.check_value(name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_kinds_reject_mismatched_values() {
        let err = AttrKind::String
            .check_value("name", &AttrValue::Int(3))
            .unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { .. }));
        assert!(
            AttrKind::String
                .check_value("name", &AttrValue::from("ok"))
                .is_ok()
        );
    }

    #[test]
    fn null_always_type_checks() {
        assert!(AttrKind::Int.check_value("size", &AttrValue::Null).is_ok());
        assert!(
            AttrKind::List(Box::new(AttrKind::String))
                .check_value("tags", &AttrValue::Null)
                .is_ok()
        );
    }

    #[test]
    fn cardinality_bounds_run_on_writes() {
        let mut attribute = Attribute::new(AttrKind::List(Box::new(AttrKind::String)));
        attribute.min_items = Some(1);
        attribute.max_items = Some(2);

        let one = AttrValue::List(vec![AttrValue::from("a")]);
        assert!(attribute.check_value("tags", &one).is_ok());

        let three = AttrValue::List(vec![
            AttrValue::from("a"),
            AttrValue::from("b"),
            AttrValue::from("c"),
        ]);
        let err = attribute.check_value("tags", &three).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::Cardinality { actual: 3, .. }
        ));
    }

    #[test]
    fn nested_objects_reject_undeclared_fields() {
        let fields = BTreeMap::from([(
            "algorithm".to_string(),
            Attribute::new(AttrKind::String),
        )]);
        let kind = AttrKind::SingleNested(fields);

        let ok = AttrValue::Object(BTreeMap::from([(
            "algorithm".to_string(),
            AttrValue::from("aes256"),
        )]));
        assert!(kind.check_value("encryption", &ok).is_ok());

        let unknown = AttrValue::Object(BTreeMap::from([(
            "cipher".to_string(),
            AttrValue::from("aes256"),
        )]));
        let err = kind.check_value("encryption", &unknown).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownAttribute { .. }));
    }

    #[test]
    fn set_kind_coerces_json_arrays_to_sets() {
        let kind = AttrKind::Set(Box::new(AttrKind::String));
        let value = kind
            .value_from_json("zones", serde_json::json!(["a", "b"]))
            .unwrap();
        assert_eq!(
            value,
            AttrValue::Set(vec![AttrValue::from("a"), AttrValue::from("b")])
        );
    }
}

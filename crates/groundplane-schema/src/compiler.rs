//! Legacy-to-declarative schema compiler
//!
//! Recursively translates legacy field definitions into the compiled
//! attribute tree. Shapes the declarative protocol cannot express are fatal
//! compilation errors: a partially-wrong schema would accept or reject
//! configuration incorrectly at apply time, which is strictly worse than
//! failing the schema request.

use std::collections::BTreeMap;

use crate::attribute::{AttrKind, Attribute, AttributeSchema};
use crate::error::{Result, SchemaError};
use crate::legacy::{Elem, Schema, SchemaMap, ValueType};

/// Compiles one legacy field definition into a declarative attribute.
pub fn compile_attribute(name: &str, input: &Schema) -> Result<Attribute> {
    let kind = match input.value_type {
        ValueType::Bool => AttrKind::Bool,
        ValueType::Int => AttrKind::Int,
        ValueType::Float => AttrKind::Float,
        ValueType::String => AttrKind::String,
        ValueType::Map => compile_map(name, input)?,
        ValueType::List | ValueType::Set => compile_collection(name, input)?,
    };
    Ok(apply_flags(kind, input))
}

/// Maps in the legacy protocol are always maps of strings. Anything else
/// has no declarative translation and is rejected rather than coerced.
fn compile_map(name: &str, input: &Schema) -> Result<AttrKind> {
    let elem = input.elem.as_ref().ok_or_else(|| SchemaError::MissingElement {
        name: name.to_string(),
    })?;
    match elem {
        Elem::Schema(elem) if elem.value_type == ValueType::String => {
            Ok(AttrKind::Map(Box::new(AttrKind::String)))
        }
        Elem::Schema(elem) => Err(SchemaError::UnsupportedMapElement {
            name: name.to_string(),
            found: elem.value_type.name().to_string(),
        }),
        Elem::Block(_) => Err(SchemaError::UnsupportedMapElement {
            name: name.to_string(),
            found: "nested block".to_string(),
        }),
    }
}

fn compile_collection(name: &str, input: &Schema) -> Result<AttrKind> {
    let elem = input.elem.as_ref().ok_or_else(|| SchemaError::MissingElement {
        name: name.to_string(),
    })?;
    match elem {
        // A collection of a plain type: list of strings, set of ints, ...
        Elem::Schema(elem) => {
            let elem_kind = element_kind(name, elem)?;
            Ok(match input.value_type {
                ValueType::Set => AttrKind::Set(Box::new(elem_kind)),
                _ => AttrKind::List(Box::new(elem_kind)),
            })
        }
        // A collection of nested blocks. Declaring at most one block is the
        // protocol's way of modelling a singular nested object, so that
        // shape compiles to SingleNested rather than a repeated collection.
        Elem::Block(block) => {
            let mut fields = BTreeMap::new();
            for (field_name, field_schema) in &block.attributes {
                let compiled = compile_attribute(&format!("{name}.{field_name}"), field_schema)?;
                fields.insert(field_name.clone(), compiled);
            }
            Ok(if input.max_items == Some(1) {
                AttrKind::SingleNested(fields)
            } else if input.value_type == ValueType::Set {
                AttrKind::SetNested(fields)
            } else {
                AttrKind::ListNested(fields)
            })
        }
    }
}

/// Resolves the element kind of a scalar-element collection. Elements may
/// themselves be collections or maps, but never nested blocks — a block in
/// element position is only legal directly under a list or set.
fn element_kind(name: &str, elem: &Schema) -> Result<AttrKind> {
    match elem.value_type {
        ValueType::Bool => Ok(AttrKind::Bool),
        ValueType::Int => Ok(AttrKind::Int),
        ValueType::Float => Ok(AttrKind::Float),
        ValueType::String => Ok(AttrKind::String),
        ValueType::Map => compile_map(name, elem),
        ValueType::List | ValueType::Set => match elem.elem {
            Some(Elem::Schema(ref inner)) => {
                let inner_kind = element_kind(name, inner)?;
                Ok(match elem.value_type {
                    ValueType::Set => AttrKind::Set(Box::new(inner_kind)),
                    _ => AttrKind::List(Box::new(inner_kind)),
                })
            }
            Some(Elem::Block(_)) => Err(SchemaError::UnsupportedShape {
                name: name.to_string(),
                detail: "nested blocks are not supported inside a collection element".to_string(),
            }),
            None => Err(SchemaError::MissingElement {
                name: name.to_string(),
            }),
        },
    }
}

fn apply_flags(kind: AttrKind, input: &Schema) -> Attribute {
    let mut attribute = Attribute::new(kind);
    attribute.required = input.required;
    attribute.optional = input.optional;
    attribute.computed = input.computed;
    attribute.sensitive = input.sensitive;
    attribute.description = input.description.clone();
    attribute.deprecation_message = input.deprecated.clone();
    attribute.min_items = input.min_items;
    attribute.max_items = input.max_items;
    attribute
}

/// Compiles the full schema of one resource or data-source kind by merging
/// its arguments (user-settable) and attributes (computed-only) into one
/// flat field map. A name declared in both groups is a compilation error.
pub fn compile_schema(
    type_name: &str,
    arguments: &SchemaMap,
    attributes: &SchemaMap,
    version: i64,
) -> Result<AttributeSchema> {
    let mut compiled = BTreeMap::new();
    for (name, schema) in arguments {
        compiled.insert(name.clone(), compile_attribute(name, schema)?);
    }
    for (name, schema) in attributes {
        if compiled.contains_key(name) {
            return Err(SchemaError::DuplicateAttribute { name: name.clone() });
        }
        compiled.insert(name.clone(), compile_attribute(name, schema)?);
    }
    tracing::debug!(
        type_name,
        attributes = compiled.len(),
        version,
        "compiled schema"
    );
    Ok(AttributeSchema {
        attributes: compiled,
        version,
    })
}

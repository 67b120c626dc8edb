//! Legacy field schema
//!
//! The loosely-typed schema format resource authors declare their fields in.
//! It predates the declarative protocol and survives as the authoring
//! surface; the [`crate::compiler`] translates it for hosts that speak the
//! newer protocol.

use std::collections::BTreeMap;

/// Field definitions keyed by name.
pub type SchemaMap = BTreeMap<String, Schema>;

/// Value kind of a legacy field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    Int,
    Float,
    String,
    List,
    Set,
    Map,
}

impl ValueType {
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::List => "list",
            ValueType::Set => "set",
            ValueType::Map => "map",
        }
    }
}

/// Element of a collection field: either a plain schema (list of strings)
/// or a nested block with its own fields (list of objects).
#[derive(Debug, Clone, PartialEq)]
pub enum Elem {
    Schema(Box<Schema>),
    Block(BlockSchema),
}

/// Field definitions of a nested block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockSchema {
    pub attributes: SchemaMap,
}

impl BlockSchema {
    pub fn new(attributes: impl IntoIterator<Item = (&'static str, Schema)>) -> Self {
        Self {
            attributes: attributes
                .into_iter()
                .map(|(name, schema)| (name.to_string(), schema))
                .collect(),
        }
    }
}

/// One legacy field definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub value_type: ValueType,
    pub elem: Option<Elem>,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub force_new: bool,
    pub description: Option<String>,
    pub deprecated: Option<String>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

impl Schema {
    pub fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            elem: None,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            force_new: false,
            description: None,
            deprecated: None,
            min_items: None,
            max_items: None,
        }
    }

    pub fn bool() -> Self {
        Self::new(ValueType::Bool)
    }

    pub fn int() -> Self {
        Self::new(ValueType::Int)
    }

    pub fn float() -> Self {
        Self::new(ValueType::Float)
    }

    pub fn string() -> Self {
        Self::new(ValueType::String)
    }

    pub fn list_of(elem: Schema) -> Self {
        let mut schema = Self::new(ValueType::List);
        schema.elem = Some(Elem::Schema(Box::new(elem)));
        schema
    }

    pub fn set_of(elem: Schema) -> Self {
        let mut schema = Self::new(ValueType::Set);
        schema.elem = Some(Elem::Schema(Box::new(elem)));
        schema
    }

    pub fn list_of_block(block: BlockSchema) -> Self {
        let mut schema = Self::new(ValueType::List);
        schema.elem = Some(Elem::Block(block));
        schema
    }

    pub fn set_of_block(block: BlockSchema) -> Self {
        let mut schema = Self::new(ValueType::Set);
        schema.elem = Some(Elem::Block(block));
        schema
    }

    pub fn map_of(elem: Schema) -> Self {
        let mut schema = Self::new(ValueType::Map);
        schema.elem = Some(Elem::Schema(Box::new(elem)));
        schema
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_deprecation(mut self, message: impl Into<String>) -> Self {
        self.deprecated = Some(message.into());
        self
    }

    pub fn with_min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    pub fn with_max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_chain() {
        let schema = Schema::string()
            .required()
            .force_new()
            .with_description("volume name");
        assert_eq!(schema.value_type, ValueType::String);
        assert!(schema.required);
        assert!(schema.force_new);
        assert!(!schema.optional);
        assert_eq!(schema.description.as_deref(), Some("volume name"));
    }

    #[test]
    fn block_collections_carry_their_fields() {
        let schema = Schema::list_of_block(BlockSchema::new([
            ("algorithm", Schema::string().optional()),
            ("key_id", Schema::string().optional()),
        ]))
        .optional()
        .with_max_items(1);

        match schema.elem {
            Some(Elem::Block(ref block)) => {
                assert_eq!(block.attributes.len(), 2);
            }
            ref other => panic!("expected a block element, got {other:?}"),
        }
        assert_eq!(schema.max_items, Some(1));
    }
}

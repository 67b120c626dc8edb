//! Groundplane schema model
//!
//! This crate carries the two schema representations the provider speaks and
//! the compiler between them:
//!
//! - the **legacy** representation: loosely-typed field definitions keyed by
//!   name ([`Schema`], [`SchemaMap`]), the format resource authors write;
//! - the **declarative** representation: the strongly-typed attribute tree
//!   ([`Attribute`], [`AttrKind`], [`AttributeSchema`]) served to hosts that
//!   speak the newer plugin protocol;
//! - the [`compiler`] that translates the former into the latter, rejecting
//!   shapes the declarative protocol cannot express.
//!
//! Attribute values are modelled as the [`AttrValue`] union so every read and
//! write site matches exhaustively on the value kind.

pub mod attribute;
pub mod compiler;
pub mod error;
pub mod legacy;
pub mod value;

// Re-exports
pub use attribute::{AttrKind, Attribute, AttributeSchema};
pub use compiler::{compile_attribute, compile_schema};
pub use error::{Result, SchemaError};
pub use legacy::{BlockSchema, Elem, Schema, SchemaMap, ValueType};
pub use value::{AttrMap, AttrValue};

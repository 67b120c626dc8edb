//! Schema error types

use thiserror::Error;

/// Errors raised while compiling or enforcing schemas.
///
/// Compilation errors are fatal at schema-request time: a schema that cannot
/// be translated is rejected outright rather than served partially.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("attribute {name:?}: collection is missing an element definition")]
    MissingElement { name: String },

    #[error("attribute {name:?}: map elements must be strings, got {found}")]
    UnsupportedMapElement { name: String, found: String },

    #[error("attribute {name:?}: {detail}")]
    UnsupportedShape { name: String, detail: String },

    #[error("attribute {name:?} is declared as both an argument and a computed attribute")]
    DuplicateAttribute { name: String },

    #[error("attribute {name:?}: expected {expected}, got {found}")]
    TypeMismatch {
        name: String,
        expected: String,
        found: String,
    },

    #[error("attribute {name:?}: {actual} items given, {}", cardinality_text(.min, .max))]
    Cardinality {
        name: String,
        min: Option<usize>,
        max: Option<usize>,
        actual: usize,
    },

    #[error("unknown attribute {name:?}")]
    UnknownAttribute { name: String },
}

fn cardinality_text(min: &Option<usize>, max: &Option<usize>) -> String {
    match (*min, *max) {
        (Some(min), Some(max)) => format!("between {min} and {max} allowed"),
        (Some(min), None) => format!("at least {min} required"),
        (None, Some(max)) => format!("at most {max} allowed"),
        (None, None) => "no bounds declared".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;

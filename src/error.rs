//! Error types for schema compilation and the runtime codecs

use thiserror::Error;

/// Result type for generation operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Generation-time errors.
///
/// Generation is all-or-nothing: any of these aborts the run before a
/// single line of output is produced.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Ambiguous discriminator ownership: {child} is claimed by both {first} and {second}")]
    AmbiguousDiscriminatorOwnership {
        child: String,
        first: String,
        second: String,
    },

    #[error("Discriminator on {definition} has no propertyName")]
    MissingPropertyName { definition: String },

    #[error("Discriminator '{property}' on {definition} has no variant with a constant value")]
    NoResolvableVariants { definition: String, property: String },

    #[error("Duplicate discriminator value '{value}' on {definition}")]
    DuplicateDiscriminatorValue { definition: String, value: String },

    #[error("Type name collision: {name} is produced by both {first} and {second}")]
    TypeNameCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Kind of JSON token seen by a codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Null,
    String,
    Integer,
    Float,
    Boolean,
    Object,
    Array,
}

impl TokenKind {
    pub fn of(value: &serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::String(_) => Self::String,
            Value::Number(n) if n.is_f64() => Self::Float,
            Value::Number(_) => Self::Integer,
            Value::Bool(_) => Self::Boolean,
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        };
        f.write_str(name)
    }
}

/// Decode/encode failures raised by the runtime codecs.
///
/// These reject the single value being decoded; they never fall back to a
/// default.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("{base}: missing discriminator field '{property}'")]
    MissingDiscriminatorField {
        base: &'static str,
        property: &'static str,
    },

    #[error("{base}: unknown discriminator value '{value}' for '{property}'")]
    UnknownDiscriminatorValue {
        base: &'static str,
        property: &'static str,
        value: String,
    },

    #[error("{union}: no alternative accepts a {token} value")]
    NoMatchingUnionAlternative {
        union: &'static str,
        token: TokenKind,
    },

    #[error("{union}: null is not a valid value for this union")]
    InvalidNullForNonNullableUnion { union: &'static str },

    #[error("{type_name}: expected a JSON object, got {found}")]
    ExpectedObject {
        type_name: &'static str,
        found: TokenKind,
    },

    #[error("{type_name}: unknown enum value {value}")]
    UnknownEnumValue {
        type_name: &'static str,
        value: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

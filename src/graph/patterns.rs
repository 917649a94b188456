//! Type Resolver
//!
//! Maps one property's schema node to a `TypeDescriptor`. Resolution never
//! fails: anything the rules below don't recognise becomes `Opaque`, a
//! dynamic JSON value.
//!
//! Rules, first match wins:
//! 1. `$ref`, or the first `$ref` inside `allOf` -> `Reference`
//! 2. `type` array containing `"null"` -> `Optional(..)` of the remaining type
//!    (`["array", "null"]` resolves the items)
//! 3. `type: "array"` -> `Array(items)`, `Array(Opaque)` without `items`
//! 4. `enum` -> the enum's base primitive (string unless typed otherwise)
//! 5. scalar `type`, integers honouring `format`
//! 6. `anyOf: [{$ref}, {type: null}]` -> `Optional(Reference)`
//! 7. any other `anyOf`/`oneOf` -> `Opaque`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{direct_ref, node_ref, primary_type};

// =============================================================================
// Descriptors
// =============================================================================

/// Fixed integer width selected by a `format` hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntegerWidth {
    I16,
    I32,
    I64,
    U16,
    U32,
    U64,
}

impl IntegerWidth {
    /// `uint16/32/64`, `int16/32/64`; anything else is 32-bit signed
    pub fn from_format(format: Option<&str>) -> Self {
        match format {
            Some("uint16") => Self::U16,
            Some("uint32") => Self::U32,
            Some("uint64") => Self::U64,
            Some("int16") => Self::I16,
            Some("int64") => Self::I64,
            _ => Self::I32,
        }
    }

    pub fn of_node(node: &Map<String, Value>) -> Self {
        Self::from_format(node.get("format").and_then(Value::as_str))
    }

    /// Whether `n` is an integer inside this width's range
    pub fn accepts(&self, n: &serde_json::Number) -> bool {
        match self {
            Self::I16 => n.as_i64().is_some_and(|v| i16::try_from(v).is_ok()),
            Self::I32 => n.as_i64().is_some_and(|v| i32::try_from(v).is_ok()),
            Self::I64 => n.as_i64().is_some(),
            Self::U16 => n.as_u64().is_some_and(|v| u16::try_from(v).is_ok()),
            Self::U32 => n.as_u64().is_some_and(|v| u32::try_from(v).is_ok()),
            Self::U64 => n.as_u64().is_some(),
        }
    }
}

/// Primitive value kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scalar {
    String,
    Integer(IntegerWidth),
    Number,
    Boolean,
}

impl Scalar {
    /// Scalar for a JSON type name; `None` for object/array/null
    pub fn from_json_type(json_type: &str, node: &Map<String, Value>) -> Option<Self> {
        match json_type {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer(IntegerWidth::of_node(node))),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }
}

/// Semantic type of one property
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeDescriptor {
    Scalar(Scalar),
    /// Another definition, by bare name
    Reference(String),
    Array(Box<TypeDescriptor>),
    /// Present-but-null is a legal wire value
    Optional(Box<TypeDescriptor>),
    /// Dynamic JSON value
    Opaque,
}

impl TypeDescriptor {
    pub fn optional(inner: TypeDescriptor) -> Self {
        match inner {
            // Opaque values already carry null, and nesting adds nothing
            Self::Opaque => Self::Opaque,
            Self::Optional(_) => inner,
            other => Self::Optional(Box::new(other)),
        }
    }

    pub fn array(items: TypeDescriptor) -> Self {
        Self::Array(Box::new(items))
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, Self::Opaque)
    }

    /// The referenced definition, looking through `Optional` but not `Array`
    pub fn inline_reference(&self) -> Option<&str> {
        match self {
            Self::Reference(name) => Some(name),
            Self::Optional(inner) => inner.inline_reference(),
            _ => None,
        }
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves property nodes to descriptors
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeResolver;

impl TypeResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve_value(&self, node: &Value) -> TypeDescriptor {
        match node.as_object() {
            Some(map) => self.resolve(map),
            None => TypeDescriptor::Opaque,
        }
    }

    pub fn resolve(&self, node: &Map<String, Value>) -> TypeDescriptor {
        if let Some(name) = node_ref(node) {
            return TypeDescriptor::Reference(name.to_string());
        }

        let mut nullable = false;
        let mut json_type: Option<&str> = None;

        match node.get("type") {
            Some(Value::Array(types)) => {
                nullable = types.iter().any(|t| t.as_str() == Some("null"));
                let non_null: Vec<&str> = types
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|t| *t != "null")
                    .collect();

                if non_null.first() == Some(&"array") {
                    let items = self.items(node);
                    return self.wrap(TypeDescriptor::array(items), nullable);
                }
                if non_null.len() == 1 {
                    json_type = Some(non_null[0]);
                }
            }
            Some(Value::String(t)) if t == "array" => {
                return TypeDescriptor::array(self.items(node));
            }
            Some(Value::String(t)) => json_type = Some(t.as_str()),
            _ => {}
        }

        if node.contains_key("enum") {
            let base = json_type
                .and_then(|t| Scalar::from_json_type(t, node))
                .unwrap_or(Scalar::String);
            return self.wrap(TypeDescriptor::Scalar(base), nullable);
        }

        if let Some(t) = json_type {
            return match Scalar::from_json_type(t, node) {
                Some(scalar) => self.wrap(TypeDescriptor::Scalar(scalar), nullable),
                None => TypeDescriptor::Opaque,
            };
        }

        if let Some(any_of) = node.get("anyOf").and_then(Value::as_array) {
            if let Some(name) = nullable_reference(any_of) {
                return TypeDescriptor::optional(TypeDescriptor::Reference(name.to_string()));
            }
            return TypeDescriptor::Opaque;
        }

        TypeDescriptor::Opaque
    }

    fn items(&self, node: &Map<String, Value>) -> TypeDescriptor {
        node.get("items")
            .map(|items| self.resolve_value(items))
            .unwrap_or(TypeDescriptor::Opaque)
    }

    fn wrap(&self, descriptor: TypeDescriptor, nullable: bool) -> TypeDescriptor {
        if nullable {
            TypeDescriptor::optional(descriptor)
        } else {
            descriptor
        }
    }
}

/// `[{$ref}, {type: "null"}]` in either order
fn nullable_reference(items: &[Value]) -> Option<&str> {
    if items.len() != 2 {
        return None;
    }
    let mut reference = None;
    let mut has_null = false;
    for item in items.iter().filter_map(Value::as_object) {
        if let Some(name) = direct_ref(item) {
            reference = Some(name);
        } else if item.get("type").and_then(Value::as_str) == Some("null") {
            has_null = true;
        }
    }
    reference.filter(|_| has_null)
}

/// Whether a node is a property-level union that resolved to `Opaque`
pub fn is_unresolved_union(node: &Map<String, Value>, descriptor: &TypeDescriptor) -> bool {
    descriptor.is_opaque()
        && (node.contains_key("anyOf") || node.contains_key("oneOf"))
        && primary_type(node).is_none()
}

//! Discriminator codec
//!
//! Decodes a tagged JSON object into the sum type that owns its tag.
//!
//! Each base registers its value -> decoder table once, through
//! `discriminated_union!`; the table lives in a `OnceLock` and is read-only
//! afterwards, so concurrent decodes need no locking.
//!
//! Decode:
//! 1. the value must be an object
//! 2. the tag field must be present and non-null; non-string tags compare by
//!    their JSON text (`1`, `true`)
//! 3. the tag must be in the table
//! 4. the matching variant is decoded from the same object (the tag field
//!    itself is ignored by the variant)
//!
//! Encode writes the tag first, then the variant's own fields.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{CodecError, TokenKind};

/// Builds a base value from the fields of a tagged object
pub type VariantDecoder<B> = fn(Map<String, Value>) -> Result<B, CodecError>;

/// Static value -> decoder table for one base
pub struct DiscriminatorRegistry<B> {
    base: &'static str,
    property: &'static str,
    decoders: BTreeMap<&'static str, VariantDecoder<B>>,
}

impl<B> DiscriminatorRegistry<B> {
    pub fn new(base: &'static str, property: &'static str) -> Self {
        Self {
            base,
            property,
            decoders: BTreeMap::new(),
        }
    }

    pub fn register(mut self, value: &'static str, decoder: VariantDecoder<B>) -> Self {
        self.decoders.insert(value, decoder);
        self
    }

    pub fn base(&self) -> &'static str {
        self.base
    }

    pub fn property(&self) -> &'static str {
        self.property
    }

    /// Registered tag values, sorted
    pub fn values(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.decoders.keys().copied()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.decoders.contains_key(value)
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    pub fn decode(&self, value: Value) -> Result<B, CodecError> {
        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(CodecError::ExpectedObject {
                    type_name: self.base,
                    found: TokenKind::of(&other),
                })
            }
        };

        let tag = match fields.get(self.property) {
            None | Some(Value::Null) => {
                return Err(CodecError::MissingDiscriminatorField {
                    base: self.base,
                    property: self.property,
                })
            }
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        let decoder = self
            .decoders
            .get(tag.as_str())
            .ok_or(CodecError::UnknownDiscriminatorValue {
                base: self.base,
                property: self.property,
                value: tag,
            })?;

        decoder(fields)
    }
}

impl<B> std::fmt::Debug for DiscriminatorRegistry<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscriminatorRegistry")
            .field("base", &self.base)
            .field("property", &self.property)
            .field("values", &self.decoders.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A sum type selected by one tag property
pub trait Discriminated: Sized + 'static {
    const NAME: &'static str;
    /// Wire name of the tag property
    const PROPERTY_NAME: &'static str;

    fn registry() -> &'static DiscriminatorRegistry<Self>;

    /// Tag value of the active case
    fn discriminator_value(&self) -> &'static str;

    fn from_json(value: Value) -> Result<Self, CodecError> {
        Self::registry().decode(value)
    }
}

/// A type that is one case of a discriminated base
pub trait DiscriminatorVariant {
    type Base: Discriminated;
    const VALUE: &'static str;
}

/// Decode one variant from the whole tagged object
pub fn decode_variant<T: DeserializeOwned>(fields: Map<String, Value>) -> Result<T, CodecError> {
    Ok(serde_json::from_value(Value::Object(fields))?)
}

/// Tag first, then the variant's fields; a stale tag in the variant is dropped
pub fn encode_variant<T: Serialize>(
    base: &'static str,
    property: &str,
    value: &str,
    variant: &T,
) -> Result<Map<String, Value>, CodecError> {
    let mut out = Map::new();
    out.insert(property.to_string(), Value::String(value.to_string()));

    match serde_json::to_value(variant)? {
        Value::Object(fields) => {
            for (key, field) in fields {
                if key != property {
                    out.insert(key, field);
                }
            }
        }
        other => {
            return Err(CodecError::ExpectedObject {
                type_name: base,
                found: TokenKind::of(&other),
            })
        }
    }

    Ok(out)
}

/// Declare a discriminated sum type.
///
/// One case per tag value, each holding its variant struct:
///
/// ```ignore
/// discriminated_union! {
///     /// Content blocks
///     pub enum ContentBlock: "type" {
///         "image" => Image(ImageContent),
///         "text" => Text(TextContent),
///     }
/// }
/// ```
#[macro_export]
macro_rules! discriminated_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $property:literal {
            $( $value:literal => $case:ident($variant:ty) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $( $case($variant), )+
        }

        impl $crate::Discriminated for $name {
            const NAME: &'static str = stringify!($name);
            const PROPERTY_NAME: &'static str = $property;

            fn registry() -> &'static $crate::DiscriminatorRegistry<Self> {
                static REGISTRY: ::std::sync::OnceLock<$crate::DiscriminatorRegistry<$name>> =
                    ::std::sync::OnceLock::new();
                REGISTRY.get_or_init(|| {
                    $crate::DiscriminatorRegistry::new(stringify!($name), $property)
                        $( .register($value, |fields| {
                            $crate::runtime::discriminator::decode_variant::<$variant>(fields).map($name::$case)
                        }) )+
                })
            }

            fn discriminator_value(&self) -> &'static str {
                match self {
                    $( Self::$case(_) => $value, )+
                }
            }
        }

        $(
            impl $crate::DiscriminatorVariant for $variant {
                type Base = $name;
                const VALUE: &'static str = $value;
            }

            impl ::std::convert::From<$variant> for $name {
                fn from(variant: $variant) -> Self {
                    Self::$case(variant)
                }
            }
        )+

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                let fields = match self {
                    $( Self::$case(inner) => $crate::runtime::discriminator::encode_variant(
                        stringify!($name),
                        $property,
                        $value,
                        inner,
                    ), )+
                }
                .map_err(<S::Error as $crate::__private::serde::ser::Error>::custom)?;
                $crate::__private::serde::Serialize::serialize(&fields, serializer)
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let value = <$crate::__private::serde_json::Value as $crate::__private::serde::Deserialize>::deserialize(deserializer)?;
                <Self as $crate::Discriminated>::from_json(value)
                    .map_err(<D::Error as $crate::__private::serde::de::Error>::custom)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Discriminated;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Circle {
        radius: f64,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Square {
        side: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    }

    crate::discriminated_union! {
        /// Test shapes
        enum Shape: "kind" {
            "circle" => Circle(Circle),
            "square" => Square(Square),
        }
    }

    #[test]
    fn test_registry_values() {
        let registry = Shape::registry();
        assert_eq!(registry.values().collect::<Vec<_>>(), vec!["circle", "square"]);
        assert_eq!(registry.property(), "kind");
        assert_eq!(<Square as DiscriminatorVariant>::VALUE, "square");
    }

    #[test]
    fn test_decode_dispatches_on_tag() {
        let shape: Shape = serde_json::from_value(json!({"kind": "circle", "radius": 2.0})).unwrap();
        assert_eq!(shape, Shape::Circle(Circle { radius: 2.0 }));
        assert_eq!(shape.discriminator_value(), "circle");
    }

    #[test]
    fn test_encode_writes_tag_first() {
        let shape = Shape::from(Square { side: 1.0, label: None });
        let text = serde_json::to_string(&shape).unwrap();
        assert_eq!(text, r#"{"kind":"square","side":1.0}"#);
    }

    #[test]
    fn test_decode_errors() {
        let unknown = Shape::from_json(json!({"kind": "hexagon"})).unwrap_err();
        assert!(matches!(unknown, CodecError::UnknownDiscriminatorValue { ref value, .. } if value == "hexagon"));

        let missing = Shape::from_json(json!({"radius": 1.0})).unwrap_err();
        assert!(matches!(missing, CodecError::MissingDiscriminatorField { property: "kind", .. }));

        let null = Shape::from_json(json!({"kind": null})).unwrap_err();
        assert!(matches!(null, CodecError::MissingDiscriminatorField { .. }));

        let not_object = Shape::from_json(json!([1, 2])).unwrap_err();
        assert!(matches!(not_object, CodecError::ExpectedObject { found: TokenKind::Array, .. }));
    }

    #[test]
    fn test_numeric_tag_compares_as_text() {
        let registry: DiscriminatorRegistry<u8> =
            DiscriminatorRegistry::new("Versioned", "v").register("2", |_| Ok(2));
        assert_eq!(registry.decode(json!({"v": 2})).unwrap(), 2);
        assert!(registry.decode(json!({"v": "3"})).is_err());
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Tile {
        #[serde(flatten)]
        shape: Shape,
    }

    crate::discriminated_union! {
        enum Layer: "layer" {
            "tile" => Tile(Tile),
        }
    }

    #[test]
    fn test_nested_union_shares_the_object() {
        let wire = json!({"layer": "tile", "kind": "circle", "radius": 1.5});
        let layer: Layer = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(
            layer,
            Layer::Tile(Tile {
                shape: Shape::Circle(Circle { radius: 1.5 })
            })
        );

        let text = serde_json::to_string(&layer).unwrap();
        assert_eq!(text, r#"{"layer":"tile","kind":"circle","radius":1.5}"#);
        assert_eq!(serde_json::to_value(&layer).unwrap(), wire);
    }

    #[test]
    fn test_round_trip() {
        let shape = Shape::Square(Square {
            side: 3.0,
            label: Some("big".to_string()),
        });
        let encoded = serde_json::to_value(&shape).unwrap();
        let decoded: Shape = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, shape);
    }
}

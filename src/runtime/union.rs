//! Union codec
//!
//! An untagged union of disjoint primitive alternatives, chosen by the JSON
//! token kind. Declaration order is significant:
//! - integers try 32-bit, then 64-bit, then floating point, then any other
//!   declared alternative in declared order (narrow and unsigned kinds are
//!   range-checked)
//! - every other token maps to the one alternative of its kind
//! - `null` needs an explicit null case
//!
//! Nothing is ever coerced across kinds: a boolean never becomes `0`, a
//! string never becomes a number.

use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::error::{CodecError, TokenKind};

/// Primitive kind of one union alternative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlternativeKind {
    String,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Bool,
    Object,
    Array,
}

impl AlternativeKind {
    /// Kind name as written in `union_type!`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Int16 => "Int16",
            Self::UInt16 => "UInt16",
            Self::Int32 => "Int32",
            Self::UInt32 => "UInt32",
            Self::Int64 => "Int64",
            Self::UInt64 => "UInt64",
            Self::Float => "Float",
            Self::Bool => "Bool",
            Self::Object => "Object",
            Self::Array => "Array",
        }
    }
}

/// A decoded payload, tagged with its alternative kind
#[derive(Debug, Clone, PartialEq)]
pub enum UnionValue {
    String(String),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f64),
    Bool(bool),
    Object(Map<String, Value>),
    Array(Vec<Value>),
}

impl UnionValue {
    pub fn kind(&self) -> AlternativeKind {
        match self {
            Self::String(_) => AlternativeKind::String,
            Self::Int16(_) => AlternativeKind::Int16,
            Self::UInt16(_) => AlternativeKind::UInt16,
            Self::Int32(_) => AlternativeKind::Int32,
            Self::UInt32(_) => AlternativeKind::UInt32,
            Self::Int64(_) => AlternativeKind::Int64,
            Self::UInt64(_) => AlternativeKind::UInt64,
            Self::Float(_) => AlternativeKind::Float,
            Self::Bool(_) => AlternativeKind::Bool,
            Self::Object(_) => AlternativeKind::Object,
            Self::Array(_) => AlternativeKind::Array,
        }
    }
}

impl Serialize for UnionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(v) => serializer.serialize_str(v),
            Self::Int16(v) => serializer.serialize_i16(*v),
            Self::UInt16(v) => serializer.serialize_u16(*v),
            Self::Int32(v) => serializer.serialize_i32(*v),
            Self::UInt32(v) => serializer.serialize_u32(*v),
            Self::Int64(v) => serializer.serialize_i64(*v),
            Self::UInt64(v) => serializer.serialize_u64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Object(v) => v.serialize(serializer),
            Self::Array(v) => v.serialize(serializer),
        }
    }
}

/// A union of primitive alternatives
pub trait UnionType: Sized {
    const NAME: &'static str;
    /// Declared alternatives, in declaration order
    const ALTERNATIVES: &'static [AlternativeKind];
    const NULLABLE: bool;

    /// The case holding `value`; `None` if the kind is not declared
    fn from_alternative(value: UnionValue) -> Option<Self>;

    /// The null case, if any
    fn null() -> Option<Self>;

    /// Payload of the active case; `None` for the null case
    fn to_alternative(&self) -> Option<UnionValue>;
}

fn declares<U: UnionType>(kind: AlternativeKind) -> bool {
    U::ALTERNATIVES.contains(&kind)
}

/// Decode a JSON value into the first alternative that accepts it
pub fn decode_union<U: UnionType>(value: Value) -> Result<U, CodecError> {
    let token = TokenKind::of(&value);

    let candidate = match value {
        Value::Null => {
            return U::null().ok_or(CodecError::InvalidNullForNonNullableUnion { union: U::NAME });
        }
        Value::Number(n) if token == TokenKind::Integer => decode_integer::<U>(&n),
        Value::Number(n) if declares::<U>(AlternativeKind::Float) => n.as_f64().map(UnionValue::Float),
        Value::String(s) if declares::<U>(AlternativeKind::String) => Some(UnionValue::String(s)),
        Value::Bool(b) if declares::<U>(AlternativeKind::Bool) => Some(UnionValue::Bool(b)),
        Value::Object(m) if declares::<U>(AlternativeKind::Object) => Some(UnionValue::Object(m)),
        Value::Array(a) if declares::<U>(AlternativeKind::Array) => Some(UnionValue::Array(a)),
        _ => None,
    };

    candidate
        .and_then(U::from_alternative)
        .ok_or(CodecError::NoMatchingUnionAlternative { union: U::NAME, token })
}

/// 32-bit, 64-bit, float, then the rest in declared order
fn decode_integer<U: UnionType>(n: &Number) -> Option<UnionValue> {
    const PREFERRED: [AlternativeKind; 3] = [AlternativeKind::Int32, AlternativeKind::Int64, AlternativeKind::Float];

    let preferred = PREFERRED.into_iter().filter(|k| declares::<U>(*k));
    let remaining = U::ALTERNATIVES
        .iter()
        .copied()
        .filter(|k| !PREFERRED.contains(k));

    preferred
        .chain(remaining)
        .find_map(|kind| integer_as(kind, n))
}

fn integer_as(kind: AlternativeKind, n: &Number) -> Option<UnionValue> {
    match kind {
        AlternativeKind::Int32 => n.as_i64().and_then(|v| i32::try_from(v).ok()).map(UnionValue::Int32),
        AlternativeKind::Int64 => n.as_i64().map(UnionValue::Int64),
        AlternativeKind::Float => n.as_f64().map(UnionValue::Float),
        AlternativeKind::Int16 => n.as_i64().and_then(|v| i16::try_from(v).ok()).map(UnionValue::Int16),
        AlternativeKind::UInt16 => n.as_u64().and_then(|v| u16::try_from(v).ok()).map(UnionValue::UInt16),
        AlternativeKind::UInt32 => n.as_u64().and_then(|v| u32::try_from(v).ok()).map(UnionValue::UInt32),
        AlternativeKind::UInt64 => n.as_u64().map(UnionValue::UInt64),
        _ => None,
    }
}

/// Write the active payload, or `null` for the null case
pub fn encode_union<U: UnionType, S: Serializer>(union: &U, serializer: S) -> Result<S::Ok, S::Error> {
    match union.to_alternative() {
        Some(value) => value.serialize(serializer),
        None => serializer.serialize_none(),
    }
}

/// Declare a union of primitive alternatives.
///
/// ```
/// acp_codegen::union_type! {
///     /// JSON-RPC request id
///     pub enum RequestId {
///         Long(i64) => Int64,
///         String(String) => String,
///     }
///     nullable Null;
/// }
///
/// let id: RequestId = serde_json::from_str("42").unwrap();
/// assert_eq!(id, RequestId::Long(42));
/// ```
#[macro_export]
macro_rules! union_type {
    (@nullable $null:ident) => { true };
    (@nullable) => { false };
    (@null_ctor $null:ident) => { ::std::option::Option::Some(Self::$null) };
    (@null_ctor) => { ::std::option::Option::None };

    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $case:ident($payload:ty) => $kind:ident ),+ $(,)?
        }
        $( nullable $null:ident; )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $( $case($payload), )+
            $( $null, )?
        }

        impl $crate::UnionType for $name {
            const NAME: &'static str = stringify!($name);
            const ALTERNATIVES: &'static [$crate::AlternativeKind] = &[ $( $crate::AlternativeKind::$kind ),+ ];
            const NULLABLE: bool = $crate::union_type!(@nullable $($null)?);

            fn from_alternative(value: $crate::UnionValue) -> ::std::option::Option<Self> {
                match value {
                    $( $crate::UnionValue::$kind(v) => ::std::option::Option::Some(Self::$case(v)), )+
                    #[allow(unreachable_patterns)]
                    _ => ::std::option::Option::None,
                }
            }

            fn null() -> ::std::option::Option<Self> {
                $crate::union_type!(@null_ctor $($null)?)
            }

            fn to_alternative(&self) -> ::std::option::Option<$crate::UnionValue> {
                match self {
                    $( Self::$case(v) => ::std::option::Option::Some($crate::UnionValue::$kind(v.clone())), )+
                    #[allow(unreachable_patterns)]
                    _ => ::std::option::Option::None,
                }
            }
        }

        $(
            impl ::std::convert::From<$payload> for $name {
                fn from(value: $payload) -> Self {
                    Self::$case(value)
                }
            }
        )+

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                $crate::runtime::union::encode_union(self, serializer)
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let value = <$crate::__private::serde_json::Value as $crate::__private::serde::Deserialize>::deserialize(deserializer)?;
                $crate::runtime::union::decode_union(value)
                    .map_err(<D::Error as $crate::__private::serde::de::Error>::custom)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    crate::union_type! {
        enum RequestId {
            Long(i64) => Int64,
            String(String) => String,
        }
        nullable Null;
    }

    crate::union_type! {
        enum Widening {
            Short(i16) => Int16,
            Double(f64) => Float,
            Long(i64) => Int64,
            Int(i32) => Int32,
        }
    }

    crate::union_type! {
        enum Unsigned {
            UShort(u16) => UInt16,
            ULong(u64) => UInt64,
        }
    }

    #[test]
    fn test_request_id_examples() {
        assert_eq!(decode_union::<RequestId>(json!(42)).unwrap(), RequestId::Long(42));
        assert_eq!(
            decode_union::<RequestId>(json!("abc")).unwrap(),
            RequestId::String("abc".to_string())
        );
        assert_eq!(decode_union::<RequestId>(Value::Null).unwrap(), RequestId::Null);

        let err = decode_union::<RequestId>(json!(true)).unwrap_err();
        assert!(matches!(
            err,
            CodecError::NoMatchingUnionAlternative { union: "RequestId", token: TokenKind::Boolean }
        ));
    }

    #[test]
    fn test_integer_widening_order() {
        // Int32 wins over the earlier-declared Int16
        assert_eq!(decode_union::<Widening>(json!(7)).unwrap(), Widening::Int(7));
        // Out of 32-bit range: Int64 before Float
        assert_eq!(
            decode_union::<Widening>(json!(5_000_000_000i64)).unwrap(),
            Widening::Long(5_000_000_000)
        );
        // Beyond i64: Float
        assert_eq!(
            decode_union::<Widening>(json!(18_000_000_000_000_000_000u64)).unwrap(),
            Widening::Double(18_000_000_000_000_000_000u64 as f64)
        );
        // Float tokens never land on an integer case
        assert_eq!(decode_union::<Widening>(json!(1.5)).unwrap(), Widening::Double(1.5));
    }

    #[test]
    fn test_remaining_alternatives_are_range_checked() {
        assert_eq!(decode_union::<Unsigned>(json!(80)).unwrap(), Unsigned::UShort(80));
        assert_eq!(decode_union::<Unsigned>(json!(70_000)).unwrap(), Unsigned::ULong(70_000));
        assert!(decode_union::<Unsigned>(json!(-1)).is_err());
    }

    #[test]
    fn test_null_requires_null_case() {
        let err = decode_union::<Widening>(Value::Null).unwrap_err();
        assert!(matches!(err, CodecError::InvalidNullForNonNullableUnion { union: "Widening" }));
        assert!(RequestId::NULLABLE);
        assert!(!Widening::NULLABLE);
    }

    #[test]
    fn test_encode_native_values() {
        assert_eq!(serde_json::to_string(&RequestId::Long(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&RequestId::from("x".to_string())).unwrap(), r#""x""#);
        assert_eq!(serde_json::to_string(&RequestId::Null).unwrap(), "null");
    }
}

//! Alias codec
//!
//! A type alias is a named wrapper around exactly one primitive. On the wire
//! it is the primitive itself: `SessionId("abc")` encodes as `"abc"`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A named newtype around a single primitive
pub trait TypeAlias: Sized {
    type Inner;

    fn from_inner(inner: Self::Inner) -> Self;

    fn inner(&self) -> &Self::Inner;

    fn into_inner(self) -> Self::Inner;
}

/// Write the held primitive directly
pub fn serialize_alias<A, S>(alias: &A, serializer: S) -> Result<S::Ok, S::Error>
where
    A: TypeAlias,
    A::Inner: Serialize,
    S: Serializer,
{
    alias.inner().serialize(serializer)
}

/// Read the primitive and wrap it
pub fn deserialize_alias<'de, A, D>(deserializer: D) -> Result<A, D::Error>
where
    A: TypeAlias,
    A::Inner: Deserialize<'de>,
    D: Deserializer<'de>,
{
    A::Inner::deserialize(deserializer).map(A::from_inner)
}

/// Declare a transparent newtype alias.
///
/// ```
/// acp_codegen::type_alias! {
///     /// A unique session identifier
///     #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
///     pub struct SessionId(String);
/// }
///
/// let id = SessionId::from("sess_1".to_string());
/// assert_eq!(serde_json::to_string(&id).unwrap(), r#""sess_1""#);
/// ```
#[macro_export]
macro_rules! type_alias {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($inner:ty);
    ) => {
        $(#[$meta])*
        $vis struct $name(pub $inner);

        impl $crate::TypeAlias for $name {
            type Inner = $inner;

            fn from_inner(inner: $inner) -> Self {
                Self(inner)
            }

            fn inner(&self) -> &$inner {
                &self.0
            }

            fn into_inner(self) -> $inner {
                self.0
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                $crate::runtime::alias::serialize_alias(self, serializer)
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                $crate::runtime::alias::deserialize_alias(deserializer)
            }
        }

        impl ::std::convert::From<$inner> for $name {
            fn from(inner: $inner) -> Self {
                Self(inner)
            }
        }

        impl ::std::convert::From<$name> for $inner {
            fn from(alias: $name) -> Self {
                alias.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::TypeAlias;

    crate::type_alias! {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct TestId(String);
    }

    crate::type_alias! {
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct Ratio(f64);
    }

    #[test]
    fn test_alias_is_transparent() {
        let id = TestId::from("x".to_string());
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""x""#);

        let back: TestId = serde_json::from_str(r#""x""#).unwrap();
        assert_eq!(back, id);
        assert_eq!(back.inner(), "x");
    }

    #[test]
    fn test_alias_rejects_wrong_primitive() {
        assert!(serde_json::from_str::<TestId>("42").is_err());
        assert!(serde_json::from_str::<TestId>(r#"{"0": "x"}"#).is_err());
    }

    #[test]
    fn test_float_alias_and_conversions() {
        let ratio: Ratio = serde_json::from_str("0.5").unwrap();
        assert_eq!(ratio.into_inner(), 0.5);
        assert_eq!(f64::from(Ratio(1.5)), 1.5);
        assert_eq!(TestId("abc".to_string()).to_string(), "abc");
    }
}

//! Integer enum codec
//!
//! Enums backed by integer wire values (`ErrorCode`-style). Decoding maps a
//! value to its declared member. An enum declared with an `other` case is
//! open: any unlisted value lands there and is written back unchanged.
//! A closed enum rejects unlisted values with `CodecError::UnknownEnumValue`.
//!
//! String enums need no runtime support: they are plain serde enums with a
//! `#[serde(rename)]` per member.

/// An enum with explicit integer wire values
pub trait IntEnum: Sized + Copy {
    type Repr: Copy + std::fmt::Display;
    const NAME: &'static str;

    /// Whether unlisted values decode into a catch-all member
    const OPEN: bool;

    fn from_repr(value: Self::Repr) -> Option<Self>;

    fn repr(self) -> Self::Repr;
}

/// Declare an integer-backed enum.
///
/// ```
/// acp_codegen::int_enum! {
///     pub enum ErrorCode: i32 {
///         ParseError = -32700,
///         InvalidRequest = -32600,
///     }
///     /// Any other code
///     other Other;
/// }
///
/// let code: ErrorCode = serde_json::from_str("-32600").unwrap();
/// assert_eq!(code, ErrorCode::InvalidRequest);
///
/// let custom: ErrorCode = serde_json::from_str("-32800").unwrap();
/// assert_eq!(custom, ErrorCode::Other(-32800));
/// assert_eq!(serde_json::to_string(&custom).unwrap(), "-32800");
/// ```
#[macro_export]
macro_rules! int_enum {
    (@from_repr $value:ident $other:ident) => { ::std::option::Option::Some(Self::$other($value)) };
    (@from_repr $value:ident) => { ::std::option::Option::None };
    (@open $other:ident) => { true };
    (@open) => { false };

    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $repr:ident {
            $( $(#[$case_meta:meta])* $case:ident = $value:literal ),+ $(,)?
        }
        $( $(#[$other_meta:meta])* other $other:ident; )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$case_meta])* $case, )+
            $( $(#[$other_meta])* $other($repr), )?
        }

        impl $crate::IntEnum for $name {
            type Repr = $repr;
            const NAME: &'static str = stringify!($name);
            const OPEN: bool = $crate::int_enum!(@open $($other)?);

            fn from_repr(value: $repr) -> ::std::option::Option<Self> {
                match value {
                    $( $value => ::std::option::Option::Some(Self::$case), )+
                    #[allow(unreachable_patterns, unused_variables)]
                    value => $crate::int_enum!(@from_repr value $($other)?),
                }
            }

            fn repr(self) -> $repr {
                match self {
                    $( Self::$case => $value, )+
                    $( Self::$other(value) => value, )?
                }
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                $crate::__private::serde::Serialize::serialize(&$crate::IntEnum::repr(*self), serializer)
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let raw = <$repr as $crate::__private::serde::Deserialize>::deserialize(deserializer)?;
                <Self as $crate::IntEnum>::from_repr(raw).ok_or_else(|| {
                    <D::Error as $crate::__private::serde::de::Error>::custom($crate::CodecError::UnknownEnumValue {
                        type_name: stringify!($name),
                        value: raw.to_string(),
                    })
                })
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::IntEnum;

    crate::int_enum! {
        /// Permission levels
        enum Level: u16 {
            Low = 1,
            /// The default
            Mid = 5,
            High = 9,
        }
    }

    #[test]
    fn test_known_values_round_trip() {
        let level: Level = serde_json::from_str("5").unwrap();
        assert_eq!(level, Level::Mid);
        assert_eq!(serde_json::to_string(&Level::High).unwrap(), "9");
        assert_eq!(Level::Low.repr(), 1);
    }

    #[test]
    fn test_unknown_value_is_rejected() {
        let err = serde_json::from_str::<Level>("4").unwrap_err();
        assert!(err.to_string().contains("Level: unknown enum value 4"));
        assert!(Level::from_repr(0).is_none());
        assert!(!Level::OPEN);
    }

    crate::int_enum! {
        enum Code: i32 {
            ParseError = -32700,
            NotFound = -32002,
        }
        /// Anything else
        other Other;
    }

    #[test]
    fn test_open_enum_keeps_unlisted_values() {
        let code: Code = serde_json::from_str("-32800").unwrap();
        assert_eq!(code, Code::Other(-32800));
        assert_eq!(code.repr(), -32800);
        assert_eq!(serde_json::to_string(&code).unwrap(), "-32800");

        // Listed values still land on their member
        assert_eq!(Code::from_repr(-32002), Some(Code::NotFound));
        assert_eq!(serde_json::to_string(&Code::ParseError).unwrap(), "-32700");
        assert!(Code::OPEN);
    }
}

//! Runtime codecs used by generated models
//!
//! - `alias`: transparent newtypes (`type_alias!`)
//! - `discriminator`: tagged objects dispatched on one property (`discriminated_union!`)
//! - `union`: untagged primitive unions with ordered numeric widening (`union_type!`)
//! - `enums`: integer-backed enums with checked decoding (`int_enum!`)
//!
//! Every codec is stateless. Per-type tables (discriminator registries) are
//! built once on first use and never change afterwards.

pub mod alias;
pub mod discriminator;
pub mod enums;
pub mod union;

pub use alias::TypeAlias;
pub use discriminator::{Discriminated, DiscriminatorRegistry, DiscriminatorVariant, VariantDecoder};
pub use enums::IntEnum;
pub use union::{AlternativeKind, UnionType, UnionValue};

//! ACP Schema Compiler
//!
//! Turns the Agent Client Protocol JSON Schema into typed Rust models, and
//! ships the runtime codecs those models serialize through.
//!
//! ## Features
//!
//! - **Discriminated unions**: explicit `discriminator` blocks and implicit
//!   `anyOf` + `const` patterns become tagged enums with a per-type registry
//! - **Primitive unions**: untagged `anyOf` of scalars with ordered numeric widening
//! - **Transparent aliases**: named primitives serialize as the bare value
//! - **Deterministic output**: same schema, same bytes, with a SHA256 of the input in the header
//!
//! ## Architecture
//!
//! ```text
//! schema.json
//!   └── graph/      ref counts, discriminator + abstract-base classification,
//!   │               type resolution, cycle analysis, diagnostics
//!   └── codegen/    naming, emitted type model, Rust rendering, meta constants
//!         └── generated .rs  ──uses──>  runtime/ (type_alias!, discriminated_union!,
//!                                                 union_type!, int_enum!)
//! ```

pub mod checksum;
pub mod codegen;
pub mod config;
pub mod error;
pub mod graph;
pub mod protocol;
pub mod runtime;
pub mod schema;

pub use checksum::Checksum;
pub use codegen::{generate, generate_document, CodegenConfig, CodegenContext};
pub use config::GeneratorConfig;
pub use error::{CodecError, Result, SchemaError};
pub use runtime::{
    AlternativeKind, Discriminated, DiscriminatorRegistry, DiscriminatorVariant, IntEnum, TypeAlias,
    UnionType, UnionValue, VariantDecoder,
};
pub use schema::{Definitions, MetaDocument, SchemaDocument, SchemaRef};

/// Paths the runtime macros expand to; not part of the public API
#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use serde_json;
}

//! Schema Analysis
//!
//! Passes over the raw definitions map, leaf-first:
//! - `loader`: definition index and global `$ref` counts
//! - `classify`: discriminated bases, their variants, abstract bases
//! - `patterns`: per-property type descriptors
//! - `analysis`: reference cycles that need boxing in the emitted model
//! - `diagnostics`: non-fatal findings collected along the way
//!
//! Every pass reads the schema tree; none of them mutates it.

pub mod analysis;
pub mod classify;
pub mod diagnostics;
pub mod loader;
pub mod patterns;

use serde_json::{Map, Value};

pub use analysis::{BoxedField, ContainmentEdge, CycleAnalysis};
pub use classify::{
    AbstractBase, DerivedInfo, DiscriminatorAnalysis, DiscriminatorBase, DiscriminatorForm,
    DiscriminatorVariant, VariantKind, VariantSource,
};
pub use diagnostics::{DiagnosticCode, DiagnosticItem, Diagnostics, Severity};
pub use loader::RefCounts;
pub use patterns::{IntegerWidth, Scalar, TypeDescriptor, TypeResolver};

/// Bare definition name of a `$ref` target (`#/$defs/SessionId` -> `SessionId`)
pub fn ref_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// The node's own `$ref`, as a bare name
pub fn direct_ref(node: &Map<String, Value>) -> Option<&str> {
    node.get("$ref")
        .and_then(Value::as_str)
        .filter(|r| !r.is_empty())
        .map(ref_name)
}

/// The first `$ref` inside the node's `allOf`, as a bare name
pub fn all_of_ref(node: &Map<String, Value>) -> Option<&str> {
    node.get("allOf")?
        .as_array()?
        .iter()
        .filter_map(Value::as_object)
        .find_map(direct_ref)
}

/// `$ref` of a node, falling back to the first `$ref` in its `allOf`
pub fn node_ref(node: &Map<String, Value>) -> Option<&str> {
    direct_ref(node).or_else(|| all_of_ref(node))
}

/// The first non-null entry of a node's `type` keyword.
///
/// `"string"` yields `string`; `["string", "null"]` also yields `string`.
pub fn primary_type(node: &Map<String, Value>) -> Option<&str> {
    match node.get("type")? {
        Value::String(t) => Some(t.as_str()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null"),
        _ => None,
    }
}

/// Literal text of a `const`/`title`-style value.
///
/// Strings are taken verbatim; anything else uses its JSON text, which is
/// also what the discriminator codec compares against on the wire.
pub fn literal_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

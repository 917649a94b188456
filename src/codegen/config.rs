//! Codegen Configuration
//!
//! Two tiers:
//! - `CodegenConfig`: what the emitted file looks like (runtime crate path,
//!   docs, derives). Loaded from the `[codegen]` section of the tool config.
//! - `RenderProfile`: how semantic types lower to Rust type syntax.
//!
//! Classification (`graph::*`, `CodegenContext::build`) never reads either;
//! only rendering does.

use serde::{Deserialize, Serialize};

use super::names::{RUST_KEYWORDS, UNRAWABLE_KEYWORDS};
use crate::graph::{IntegerWidth, Scalar};

// =============================================================================
// Emission Settings
// =============================================================================

/// Settings that shape the generated source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodegenConfig {
    /// Path the runtime macros are invoked through (`acp_codegen::type_alias!`).
    /// `crate` when generating into this library.
    pub runtime_path: String,

    /// Render schema descriptions as `///` comments
    pub emit_docs: bool,

    /// Derives placed on record structs
    pub record_derives: Vec<String>,

    /// Input path named in the header comment
    pub source_label: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            runtime_path: "acp_codegen".to_string(),
            emit_docs: true,
            record_derives: ["Debug", "Clone", "PartialEq", "Serialize", "Deserialize"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            source_label: "schema/schema.json".to_string(),
        }
    }
}

impl CodegenConfig {
    pub fn with_runtime_path(mut self, path: impl Into<String>) -> Self {
        self.runtime_path = path.into();
        self
    }

    /// `{runtime_path}::{name}!`
    pub fn macro_path(&self, name: &str) -> String {
        format!("{}::{}!", self.runtime_path, name)
    }
}

// =============================================================================
// Render Profile
// =============================================================================

/// Rust type syntax for semantic types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderProfile {
    pub types: TypeMappings,

    /// Prefix for raw identifiers
    pub keyword_escape: String,
}

/// Scalar type names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeMappings {
    pub string: String,
    pub number: String,
    pub boolean: String,
    pub i16: String,
    pub i32: String,
    pub i64: String,
    pub u16: String,
    pub u32: String,
    pub u64: String,
    /// Dynamic JSON value
    pub any: String,
}

impl Default for RenderProfile {
    fn default() -> Self {
        Self::rust()
    }
}

impl RenderProfile {
    pub fn rust() -> Self {
        Self {
            types: TypeMappings {
                string: "String".to_string(),
                number: "f64".to_string(),
                boolean: "bool".to_string(),
                i16: "i16".to_string(),
                i32: "i32".to_string(),
                i64: "i64".to_string(),
                u16: "u16".to_string(),
                u32: "u32".to_string(),
                u64: "u64".to_string(),
                any: "serde_json::Value".to_string(),
            },
            keyword_escape: "r#".to_string(),
        }
    }

    /// Escape a keyword if needed.
    ///
    /// `self`, `Self`, `super` and `crate` can't be raw identifiers and get a
    /// trailing underscore instead.
    pub fn escape_keyword(&self, name: &str) -> String {
        if UNRAWABLE_KEYWORDS.contains(&name) {
            format!("{}_", name)
        } else if RUST_KEYWORDS.contains(&name) {
            format!("{}{}", self.keyword_escape, name)
        } else {
            name.to_string()
        }
    }

    pub fn scalar_type(&self, scalar: Scalar) -> &str {
        match scalar {
            Scalar::String => &self.types.string,
            Scalar::Number => &self.types.number,
            Scalar::Boolean => &self.types.boolean,
            Scalar::Integer(width) => self.integer_type(width),
        }
    }

    pub fn integer_type(&self, width: IntegerWidth) -> &str {
        match width {
            IntegerWidth::I16 => &self.types.i16,
            IntegerWidth::I32 => &self.types.i32,
            IntegerWidth::I64 => &self.types.i64,
            IntegerWidth::U16 => &self.types.u16,
            IntegerWidth::U32 => &self.types.u32,
            IntegerWidth::U64 => &self.types.u64,
        }
    }

    pub fn any_type(&self) -> &str {
        &self.types.any
    }

    pub fn wrap_optional(&self, type_str: &str) -> String {
        format!("Option<{}>", type_str)
    }

    pub fn wrap_array(&self, type_str: &str) -> String {
        format!("Vec<{}>", type_str)
    }

    /// Indirection for recursive fields
    pub fn wrap_box(&self, type_str: &str) -> String {
        format!("Box<{}>", type_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codegen_defaults() {
        let config = CodegenConfig::default();
        assert_eq!(config.runtime_path, "acp_codegen");
        assert!(config.emit_docs);
        assert_eq!(config.macro_path("type_alias"), "acp_codegen::type_alias!");
        assert_eq!(config.with_runtime_path("crate").macro_path("int_enum"), "crate::int_enum!");
    }

    #[test]
    fn test_keyword_escape() {
        let rust = RenderProfile::rust();
        assert_eq!(rust.escape_keyword("type"), "r#type");
        assert_eq!(rust.escape_keyword("name"), "name");
        assert_eq!(rust.escape_keyword("self"), "self_");
        assert_eq!(rust.escape_keyword("crate"), "crate_");
    }

    #[test]
    fn test_scalar_mapping() {
        let rust = RenderProfile::rust();
        assert_eq!(rust.scalar_type(Scalar::String), "String");
        assert_eq!(rust.scalar_type(Scalar::Number), "f64");
        assert_eq!(rust.scalar_type(Scalar::Integer(IntegerWidth::U16)), "u16");
        assert_eq!(rust.scalar_type(Scalar::Integer(IntegerWidth::I32)), "i32");
    }

    #[test]
    fn test_wrappers() {
        let rust = RenderProfile::rust();
        assert_eq!(rust.wrap_optional("String"), "Option<String>");
        assert_eq!(rust.wrap_array("i64"), "Vec<i64>");
        assert_eq!(rust.wrap_box("ContentBlock"), "Box<ContentBlock>");
    }
}

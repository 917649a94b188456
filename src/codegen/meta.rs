//! Method Constants Emitter
//!
//! Renders `meta.json` as Rust constants:
//! - `ProtocolMeta::VERSION`
//! - `AgentMethods::*` / `ClientMethods::*`, one `&'static str` per method
//!
//! Constant names are `SCREAMING_SNAKE(ConvertToPascalCase(key))`, entries
//! sorted by key.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use tracing::{info, warn};

use super::names::{convert_to_pascal_case, to_screaming_snake_case};
use crate::schema::MetaDocument;

/// Header label used when none is configured
pub const DEFAULT_META_LABEL: &str = "schema/meta.json";

/// Constant name for a method key: `session_set_mode` -> `SESSION_SET_MODE`
pub fn constant_name(key: &str) -> String {
    to_screaming_snake_case(&convert_to_pascal_case(key))
}

/// Render the constants file for `meta`
pub fn generate_meta(meta: &MetaDocument, source_label: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("// Generated from {}. Do not edit by hand.\n", source_label));
    if let Some(schema_ref) = &meta.schema_ref {
        output.push_str(&format!("// Schema ref: {}\n", schema_ref));
    }

    output.push('\n');
    output.push_str("/// Protocol metadata\n");
    output.push_str("pub struct ProtocolMeta;\n\n");
    output.push_str("impl ProtocolMeta {\n");
    output.push_str("    /// ACP protocol version\n");
    output.push_str(&format!("    pub const VERSION: u16 = {};\n", meta.version));
    output.push_str("}\n");

    emit_methods(&mut output, "AgentMethods", "Methods that agents handle", &meta.agent_methods);
    emit_methods(&mut output, "ClientMethods", "Methods that clients handle", &meta.client_methods);

    info!(
        agent_methods = meta.agent_methods.len(),
        client_methods = meta.client_methods.len(),
        "meta constants generated"
    );
    output
}

fn emit_methods(output: &mut String, holder: &str, doc: &str, methods: &IndexMap<String, String>) {
    // Sorted by key; the first key wins when two normalize to one constant
    let mut constants: BTreeMap<&str, (String, &str)> = BTreeMap::new();
    let mut taken: BTreeMap<String, &str> = BTreeMap::new();
    for (key, path) in methods {
        constants.insert(key.as_str(), (constant_name(key), path.as_str()));
    }

    output.push('\n');
    output.push_str(&format!("/// {}\n", doc));
    output.push_str(&format!("pub struct {};\n\n", holder));
    output.push_str(&format!("impl {} {{\n", holder));
    for (key, (name, path)) in &constants {
        if name.is_empty() {
            warn!(holder, key, "method key yields an empty constant name, skipped");
            continue;
        }
        if let Some(first) = taken.get(name) {
            warn!(holder, key, first, constant = %name, "method constant already defined, skipped");
            continue;
        }
        taken.insert(name.clone(), *key);
        output.push_str(&format!("    pub const {}: &'static str = {:?};\n", name, path));
    }
    output.push_str("}\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaRef;

    #[test]
    fn test_constant_naming() {
        assert_eq!(constant_name("initialize"), "INITIALIZE");
        assert_eq!(constant_name("session_new"), "SESSION_NEW");
        assert_eq!(constant_name("session_set_mode"), "SESSION_SET_MODE");
        assert_eq!(constant_name("fs_read_text_file"), "FS_READ_TEXT_FILE");
        // Segments are lower-cased past their first letter
        assert_eq!(constant_name("terminal_WAIT_for_exit"), "TERMINAL_WAIT_FOR_EXIT");
    }

    #[test]
    fn test_generate_meta() {
        let meta = MetaDocument::parse(
            r#"{
                "version": 1,
                "agentMethods": {"session_new": "session/new", "initialize": "initialize"},
                "clientMethods": {"fs_write_text_file": "fs/write_text_file"}
            }"#,
        )
        .unwrap()
        .with_schema_ref(SchemaRef::new("v0.4.9"));

        let output = generate_meta(&meta, DEFAULT_META_LABEL);
        assert!(output.starts_with(
            "// Generated from schema/meta.json. Do not edit by hand.\n// Schema ref: v0.4.9\n"
        ));
        assert!(output.contains("    pub const VERSION: u16 = 1;\n"));
        assert!(output.contains(
            "impl AgentMethods {\n    pub const INITIALIZE: &'static str = \"initialize\";\n    pub const SESSION_NEW: &'static str = \"session/new\";\n}\n"
        ));
        assert!(output.contains("    pub const FS_WRITE_TEXT_FILE: &'static str = \"fs/write_text_file\";\n"));
    }

    #[test]
    fn test_duplicate_constants_keep_first_key() {
        let meta = MetaDocument::parse(r#"{"agentMethods": {"session_new": "b", "Session_New": "a"}}"#).unwrap();
        let output = generate_meta(&meta, DEFAULT_META_LABEL);
        assert_eq!(output.matches("SESSION_NEW").count(), 1);
        // "Session_New" sorts first
        assert!(output.contains("pub const SESSION_NEW: &'static str = \"a\";"));
    }

    #[test]
    fn test_empty_method_tables() {
        let meta = MetaDocument::parse("{}").unwrap();
        let output = generate_meta(&meta, DEFAULT_META_LABEL);
        assert!(!output.contains("Schema ref"));
        assert!(output.contains("impl ClientMethods {\n}\n"));
    }
}

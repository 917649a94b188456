//! Rust Code Emitter
//!
//! Renders a `CodegenContext` as one Rust source file.
//!
//! Key constraints:
//! - only `GeneratedType` and `RenderProfile` are read, never schema JSON
//! - runtime macros are invoked by full path (`{runtime_path}::type_alias!`),
//!   so the generated file needs no imports beyond serde's derives
//! - output is a pure function of the context: same context, same bytes

use serde_json::Value;

use super::names::class_name;
use super::{
    AbstractCase, BaseCase, CatchAll, CodegenContext, EnumMember, EnumRepr, Field, GeneratedType, Presence,
    RenderProfile, TypeGroup, TypeKind, UnionAlternative,
};
use crate::graph::{Scalar, TypeDescriptor};

// =============================================================================
// Public API
// =============================================================================

/// Render the whole file: header, imports, then each group in order
pub fn emit_document(ctx: &CodegenContext) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "// Generated from {}. Do not edit by hand.\n",
        ctx.config().source_label
    ));
    if let Some(schema_ref) = ctx.schema_ref() {
        output.push_str(&format!("// Schema ref: {}\n", schema_ref));
    }
    output.push_str(&format!("// Schema sha256: {}\n", ctx.checksum()));
    output.push('\n');
    output.push_str("use serde::{Deserialize, Serialize};\n");

    let mut current: Option<TypeGroup> = None;
    for ty in ctx.types() {
        if current != Some(ty.group()) {
            current = Some(ty.group());
            output.push_str(&format!("\n// {}\n", ty.group().heading()));
        }
        output.push('\n');
        output.push_str(&emit_type(ty, ctx));
    }

    output
}

/// Render one type, including its helper items (`From` impls, default fns)
pub fn emit_type(ty: &GeneratedType, ctx: &CodegenContext) -> String {
    let mut output = String::new();
    let profile = ctx.profile();

    match &ty.kind {
        TypeKind::Alias { target } => emit_alias(&mut output, ty, target, ctx),
        TypeKind::Enum { repr, members, catch_all } => {
            emit_enum(&mut output, ty, *repr, members, catch_all.as_ref(), ctx)
        }
        TypeKind::DiscriminatedBase { property, cases } => emit_discriminated(&mut output, ty, property, cases, ctx),
        TypeKind::AbstractBase { cases } => emit_abstract(&mut output, ty, cases, ctx),
        TypeKind::Union { alternatives, nullable } => emit_union(&mut output, ty, alternatives, *nullable, ctx),
        TypeKind::Record { fields } | TypeKind::Variant { fields, .. } => {
            emit_struct(&mut output, ty, fields, ctx, profile)
        }
    }

    output
}

// =============================================================================
// Aliases & Unions
// =============================================================================

fn emit_alias(output: &mut String, ty: &GeneratedType, target: &TypeDescriptor, ctx: &CodegenContext) {
    let profile = ctx.profile();
    let inner = render_type(target, false, profile);

    let derives = match target {
        TypeDescriptor::Scalar(Scalar::String) => "Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord",
        TypeDescriptor::Scalar(Scalar::Integer(_)) => "Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord",
        TypeDescriptor::Scalar(Scalar::Boolean) => "Debug, Clone, Copy, PartialEq, Eq, Hash",
        TypeDescriptor::Scalar(Scalar::Number) => "Debug, Clone, Copy, PartialEq, PartialOrd",
        TypeDescriptor::Opaque => "Debug, Clone, PartialEq",
        // Composite targets are already serde types; a plain alias keeps them transparent
        _ => {
            push_docs(output, ty.description.as_deref(), "", ctx);
            output.push_str(&format!("pub type {} = {};\n", ty.name, inner));
            return;
        }
    };

    output.push_str(&format!("{} {{\n", ctx.config().macro_path("type_alias")));
    push_docs(output, ty.description.as_deref(), "    ", ctx);
    output.push_str(&format!("    #[derive({})]\n", derives));
    output.push_str(&format!("    pub struct {}({});\n", ty.name, inner));
    output.push_str("}\n");
}

fn emit_union(
    output: &mut String,
    ty: &GeneratedType,
    alternatives: &[UnionAlternative],
    nullable: bool,
    ctx: &CodegenContext,
) {
    output.push_str(&format!("{} {{\n", ctx.config().macro_path("union_type")));
    push_docs(output, ty.description.as_deref(), "    ", ctx);
    output.push_str(&format!("    pub enum {} {{\n", ty.name));
    for alternative in alternatives {
        output.push_str(&format!(
            "        {}({}) => {},\n",
            alternative.case_name,
            payload_type(alternative, ctx.profile()),
            alternative.kind.as_str()
        ));
    }
    output.push_str("    }\n");
    if nullable {
        output.push_str("    nullable Null;\n");
    }
    output.push_str("}\n");
}

fn payload_type(alternative: &UnionAlternative, profile: &RenderProfile) -> String {
    use crate::runtime::AlternativeKind;
    match alternative.kind {
        AlternativeKind::String => profile.types.string.clone(),
        AlternativeKind::Int16 => profile.types.i16.clone(),
        AlternativeKind::UInt16 => profile.types.u16.clone(),
        AlternativeKind::Int32 => profile.types.i32.clone(),
        AlternativeKind::UInt32 => profile.types.u32.clone(),
        AlternativeKind::Int64 => profile.types.i64.clone(),
        AlternativeKind::UInt64 => profile.types.u64.clone(),
        AlternativeKind::Float => profile.types.number.clone(),
        AlternativeKind::Bool => profile.types.boolean.clone(),
        AlternativeKind::Object => "serde_json::Map<String, serde_json::Value>".to_string(),
        AlternativeKind::Array => profile.wrap_array(profile.any_type()),
    }
}

// =============================================================================
// Enum Emission
// =============================================================================

fn emit_enum(
    output: &mut String,
    ty: &GeneratedType,
    repr: EnumRepr,
    members: &[EnumMember],
    catch_all: Option<&CatchAll>,
    ctx: &CodegenContext,
) {
    match repr {
        EnumRepr::String => {
            push_docs(output, ty.description.as_deref(), "", ctx);
            output.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]\n");
            output.push_str(&format!("pub enum {} {{\n", ty.name));
            for member in members {
                push_docs(output, member.description.as_deref(), "    ", ctx);
                output.push_str(&format!("    #[serde(rename = {:?})]\n", member.value));
                output.push_str(&format!("    {},\n", member.name));
            }
            output.push_str("}\n");
        }
        EnumRepr::Integer(width) => {
            output.push_str(&format!("{} {{\n", ctx.config().macro_path("int_enum")));
            push_docs(output, ty.description.as_deref(), "    ", ctx);
            output.push_str(&format!(
                "    pub enum {}: {} {{\n",
                ty.name,
                ctx.profile().integer_type(width)
            ));
            for member in members {
                push_docs(output, member.description.as_deref(), "        ", ctx);
                output.push_str(&format!("        {} = {},\n", member.name, member.value));
            }
            output.push_str("    }\n");
            if let Some(other) = catch_all {
                push_docs(output, other.description.as_deref(), "    ", ctx);
                output.push_str(&format!("    other {};\n", other.name));
            }
            output.push_str("}\n");
        }
    }
}

// =============================================================================
// Sum Types
// =============================================================================

fn emit_discriminated(output: &mut String, ty: &GeneratedType, property: &str, cases: &[BaseCase], ctx: &CodegenContext) {
    output.push_str(&format!("{} {{\n", ctx.config().macro_path("discriminated_union")));
    push_docs(output, ty.description.as_deref(), "    ", ctx);
    output.push_str(&format!("    pub enum {}: {:?} {{\n", ty.name, property));
    for case in cases {
        output.push_str(&format!(
            "        {:?} => {}({}),\n",
            case.value, case.case_name, case.type_name
        ));
    }
    output.push_str("    }\n");
    output.push_str("}\n");
}

fn emit_abstract(output: &mut String, ty: &GeneratedType, cases: &[AbstractCase], ctx: &CodegenContext) {
    push_docs(output, ty.description.as_deref(), "", ctx);
    output.push_str(&format!("#[derive({})]\n", ctx.config().record_derives.join(", ")));
    output.push_str("#[serde(untagged)]\n");
    output.push_str(&format!("pub enum {} {{\n", ty.name));
    for case in cases {
        output.push_str(&format!("    {}({}),\n", case.case_name, case.type_name));
    }
    output.push_str("}\n");

    for case in cases {
        output.push('\n');
        output.push_str(&format!("impl From<{}> for {} {{\n", case.type_name, ty.name));
        output.push_str(&format!("    fn from(value: {}) -> Self {{\n", case.type_name));
        output.push_str(&format!("        Self::{}(value)\n", case.case_name));
        output.push_str("    }\n");
        output.push_str("}\n");
    }
}

// =============================================================================
// Struct Emission
// =============================================================================

fn emit_struct(output: &mut String, ty: &GeneratedType, fields: &[Field], ctx: &CodegenContext, profile: &RenderProfile) {
    push_docs(output, ty.description.as_deref(), "", ctx);
    output.push_str(&format!("#[derive({})]\n", ctx.config().record_derives.join(", ")));

    if fields.is_empty() {
        output.push_str(&format!("pub struct {} {{}}\n", ty.name));
        return;
    }

    let mut default_fns = Vec::new();
    output.push_str(&format!("pub struct {} {{\n", ty.name));
    for field in fields {
        let identifier = profile.escape_keyword(&field.identifier());
        let bare = identifier.trim_start_matches(profile.keyword_escape.as_str());

        let mut docs = field.description.clone();
        if let Some(default) = &field.unsupported_default {
            let note = format!("Defaults to `{}`.", default);
            docs = Some(match docs {
                Some(text) => format!("{}\n\n{}", text, note),
                None => note,
            });
        }
        push_docs(output, docs.as_deref(), "    ", ctx);

        let mut serde_args = Vec::new();
        let flattened = matches!(field.presence, Presence::Flattened);
        if !flattened && (field.forced_rename || bare != field.wire_name) {
            serde_args.push(format!("rename = {:?}", field.wire_name));
        }

        let mut field_type = render_type(&field.descriptor, field.boxed, profile);
        match &field.presence {
            Presence::Required => {}
            Presence::Flattened => serde_args.push("flatten".to_string()),
            Presence::Optional => {
                if !matches!(field.descriptor, TypeDescriptor::Optional(_)) {
                    field_type = profile.wrap_optional(&field_type);
                }
                serde_args.push("default".to_string());
                serde_args.push("skip_serializing_if = \"Option::is_none\"".to_string());
            }
            Presence::Defaulted(value) => {
                let fn_name = format!("default_{}_{}", super::names::to_snake_case(&ty.name), field.identifier());
                serde_args.push(format!("default = {:?}", fn_name));
                default_fns.push((fn_name, field_type.clone(), default_literal(&field.descriptor, value, profile)));
            }
        }

        if !serde_args.is_empty() {
            output.push_str(&format!("    #[serde({})]\n", serde_args.join(", ")));
        }
        output.push_str(&format!("    pub {}: {},\n", identifier, field_type));
    }
    output.push_str("}\n");

    for (name, return_type, literal) in default_fns {
        output.push('\n');
        output.push_str(&format!("fn {}() -> {} {{\n", name, return_type));
        output.push_str(&format!("    {}\n", literal));
        output.push_str("}\n");
    }
}

// =============================================================================
// Types & Literals
// =============================================================================

/// Rust type for a descriptor; `boxed` puts the direct reference behind a `Box`
pub fn render_type(descriptor: &TypeDescriptor, boxed: bool, profile: &RenderProfile) -> String {
    match descriptor {
        TypeDescriptor::Scalar(scalar) => profile.scalar_type(*scalar).to_string(),
        TypeDescriptor::Reference(name) if boxed => profile.wrap_box(&class_name(name)),
        TypeDescriptor::Reference(name) => class_name(name),
        // Vec already allocates
        TypeDescriptor::Array(items) => profile.wrap_array(&render_type(items, false, profile)),
        TypeDescriptor::Optional(inner) => profile.wrap_optional(&render_type(inner, boxed, profile)),
        TypeDescriptor::Opaque => profile.any_type().to_string(),
    }
}

/// Rust expression producing `value` as a `descriptor`
fn default_literal(descriptor: &TypeDescriptor, value: &Value, profile: &RenderProfile) -> String {
    match (descriptor, value) {
        (TypeDescriptor::Scalar(Scalar::String), Value::String(s)) => format!("{:?}.to_string()", s),
        (TypeDescriptor::Scalar(Scalar::Boolean), Value::Bool(b)) => b.to_string(),
        (TypeDescriptor::Scalar(Scalar::Number), Value::Number(n)) => {
            format!("{:?}", n.as_f64().unwrap_or_default())
        }
        (TypeDescriptor::Scalar(Scalar::Integer(_)), Value::Number(n)) => n.to_string(),
        (TypeDescriptor::Array(_), Value::Array(values)) if values.is_empty() => "Vec::new()".to_string(),
        (TypeDescriptor::Array(items), Value::Array(values)) => {
            let items: Vec<String> = values.iter().map(|v| default_literal(items, v, profile)).collect();
            format!("vec![{}]", items.join(", "))
        }
        (TypeDescriptor::Optional(_), Value::Null) => "None".to_string(),
        (TypeDescriptor::Optional(inner), v) => format!("Some({})", default_literal(inner, v, profile)),
        (TypeDescriptor::Opaque, v) => format!("serde_json::json!({})", v),
        _ => "Default::default()".to_string(),
    }
}

/// Description as `///` lines; blank lines stay as a bare `///`
fn push_docs(output: &mut String, description: Option<&str>, indent: &str, ctx: &CodegenContext) {
    if !ctx.config().emit_docs {
        return;
    }
    let Some(description) = description.filter(|d| !d.trim().is_empty()) else {
        return;
    };

    for line in description.replace("\r\n", "\n").trim().lines() {
        let line = line.trim();
        if line.is_empty() {
            output.push_str(&format!("{}///\n", indent));
        } else {
            output.push_str(&format!("{}/// {}\n", indent, line));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::CodegenConfig;
    use crate::schema::{SchemaDocument, SchemaRef};

    fn emit(json: &str) -> String {
        let doc = SchemaDocument::parse(json).unwrap();
        CodegenContext::build(&doc, CodegenConfig::default()).unwrap().emit()
    }

    #[test]
    fn test_header() {
        let doc = SchemaDocument::parse(r#"{"$defs": {"SessionId": {"type": "string"}}}"#)
            .unwrap()
            .with_schema_ref(SchemaRef::new("v0.4.9"));
        let output = CodegenContext::build(&doc, CodegenConfig::default()).unwrap().emit();

        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("// Generated from schema/schema.json. Do not edit by hand."));
        assert_eq!(lines.next(), Some("// Schema ref: v0.4.9"));
        assert!(lines.next().unwrap().starts_with("// Schema sha256: "));
        assert!(output.contains("use serde::{Deserialize, Serialize};"));
        assert!(output.contains("// Type aliases"));
    }

    #[test]
    fn test_alias_rendering() {
        let output = emit(r##"{"$defs": {
            "SessionId": {"type": "string", "description": "A session.\n\nUnique per agent."},
            "ProtocolVersion": {"type": "integer", "format": "uint16"},
            "Entries": {"type": "array", "items": {"$ref": "#/$defs/SessionId"}}
        }}"##);

        assert!(output.contains(
            "acp_codegen::type_alias! {\n    /// A session.\n    ///\n    /// Unique per agent.\n    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]\n    pub struct SessionId(String);\n}\n"
        ));
        assert!(output.contains("pub struct ProtocolVersion(u16);"));
        assert!(output.contains("pub type Entries = Vec<SessionId>;"));
    }

    #[test]
    fn test_enum_rendering() {
        let output = emit(r#"{"$defs": {
            "StopReason": {"oneOf": [{"type": "string", "const": "end_turn"}, {"type": "string", "const": "refusal"}]},
            "ErrorCode": {"oneOf": [
                {"type": "integer", "const": -32700, "title": "Parse error"},
                {"type": "integer", "const": -32601, "title": "Method not found"}
            ]}
        }}"#);

        assert!(output.contains("    #[serde(rename = \"end_turn\")]\n    EndTurn,\n"));
        assert!(output.contains("acp_codegen::int_enum! {\n    pub enum ErrorCode: i32 {\n        ParseError = -32700,\n        MethodNotFound = -32601,\n    }\n}\n"));
    }

    #[test]
    fn test_open_integer_enum_rendering() {
        let output = emit(r#"{"$defs": {"ErrorCode": {"anyOf": [
            {"type": "integer", "const": -32700, "title": "Parse error"},
            {"type": "integer", "title": "Other", "description": "Other undefined error code."}
        ]}}}"#);

        assert!(output.contains(
            "        ParseError = -32700,\n    }\n    /// Other undefined error code.\n    other Other;\n}\n"
        ));
        assert!(!output.contains("Other = 0"));
    }

    #[test]
    fn test_keyword_members_are_escaped() {
        let output = emit(r#"{"$defs": {
            "Scope": {"type": "string", "enum": ["self", "team"]},
            "Target": {"type": "object", "properties": {"self": {"type": "string"}, "self_": {"type": "string"}}}
        }}"#);

        assert!(output.contains("    #[serde(rename = \"self\")]\n    Self_,\n"));
        assert!(output.contains("    #[serde(rename = \"self\", default, skip_serializing_if = \"Option::is_none\")]\n    pub self_: Option<String>,\n"));
        assert!(output.contains("    #[serde(rename = \"self_\", default, skip_serializing_if = \"Option::is_none\")]\n    pub self2: Option<String>,\n"));
    }

    #[test]
    fn test_union_rendering() {
        let output = emit(r#"{"$defs": {"RequestId": {"anyOf": [{"type": "null"}, {"type": "integer", "format": "int64"}, {"type": "string"}]}}}"#);
        assert!(output.contains(
            "acp_codegen::union_type! {\n    pub enum RequestId {\n        Long(i64) => Int64,\n        String(String) => String,\n    }\n    nullable Null;\n}\n"
        ));
    }

    #[test]
    fn test_discriminated_rendering() {
        let output = emit(r##"{"$defs": {
            "Outcome": {
                "discriminator": {"propertyName": "outcome"},
                "oneOf": [
                    {"properties": {"outcome": {"const": "cancelled"}}},
                    {"properties": {"outcome": {"const": "selected"}, "optionId": {"type": "string"}}, "required": ["optionId"]}
                ]
            }
        }}"##);

        assert!(output.contains("acp_codegen::discriminated_union! {\n    pub enum Outcome: \"outcome\" {\n        \"cancelled\" => Cancelled(OutcomeCancelled),\n        \"selected\" => Selected(OutcomeSelected),\n"));
        assert!(output.contains("pub struct OutcomeCancelled {}"));
        assert!(output.contains("    #[serde(rename = \"optionId\")]\n    pub option_id: String,\n"));
    }

    #[test]
    fn test_field_attributes() {
        let output = emit(r##"{"$defs": {
            "Value": {"type": "object", "required": ["value"], "properties": {
                "value": {"type": "string"},
                "type": {"type": "string"},
                "_meta": {"type": "object"},
                "retries": {"type": "integer", "default": 3},
                "tags": {"type": "array", "items": {"type": "string"}, "default": []}
            }}
        }}"##);

        assert!(output.contains("    #[serde(rename = \"value\")]\n    pub value_value: String,\n"));
        assert!(output.contains("    #[serde(default, skip_serializing_if = \"Option::is_none\")]\n    pub r#type: Option<String>,\n"));
        assert!(output.contains("    #[serde(rename = \"_meta\", default, skip_serializing_if = \"Option::is_none\")]\n    pub meta: Option<serde_json::Value>,\n"));
        assert!(output.contains("    #[serde(default = \"default_value_retries\")]\n    pub retries: i32,\n"));
        assert!(output.contains("fn default_value_retries() -> i32 {\n    3\n}\n"));
        assert!(output.contains("fn default_value_tags() -> Vec<String> {\n    Vec::new()\n}\n"));
    }

    #[test]
    fn test_abstract_base_rendering() {
        let output = emit(r##"{"$defs": {
            "Capability": {"anyOf": [{"allOf": [{"$ref": "#/$defs/FsCapability"}]}]},
            "FsCapability": {"type": "object", "properties": {"read": {"type": "boolean"}}}
        }}"##);

        assert!(output.contains("#[serde(untagged)]\npub enum Capability {\n    FsCapability(FsCapability),\n}\n"));
        assert!(output.contains("impl From<FsCapability> for Capability {"));
    }

    #[test]
    fn test_boxed_field_rendering() {
        let output = emit(r##"{"$defs": {"Node": {"type": "object", "properties": {
            "next": {"anyOf": [{"$ref": "#/$defs/Node"}, {"type": "null"}]}
        }}}}"##);
        assert!(output.contains("pub next: Option<Box<Node>>,"));
    }

    #[test]
    fn test_render_type() {
        let profile = RenderProfile::rust();
        let nested = TypeDescriptor::optional(TypeDescriptor::array(TypeDescriptor::Reference("planEntry".to_string())));
        assert_eq!(render_type(&nested, true, &profile), "Option<Vec<PlanEntry>>");
        assert_eq!(render_type(&TypeDescriptor::Opaque, false, &profile), "serde_json::Value");
    }

    #[test]
    fn test_docs_can_be_disabled() {
        let doc = SchemaDocument::parse(r#"{"$defs": {"SessionId": {"type": "string", "description": "Hidden"}}}"#).unwrap();
        let config = CodegenConfig {
            emit_docs: false,
            ..CodegenConfig::default()
        };
        let output = CodegenContext::build(&doc, config).unwrap().emit();
        assert!(!output.contains("Hidden"));
    }
}

//! Code Generation
//!
//! Turns an analysed schema into Rust source.
//!
//! Architecture:
//! - `CodegenContext`: immutable after `build()`; holds one `GeneratedType`
//!   per emitted Rust type, with every classification decision already made
//! - `rust`: renders a context as source text
//! - `meta`: renders method-name constants from `meta.json`
//!
//! The key constraint: renderers never read raw schema JSON, only the
//! `GeneratedType` model.
//!
//! Classification priority per definition:
//! promoted variant > alias > enum > discriminated base > abstract base >
//! root `oneOf`/`anyOf` (enum-like, union, merged record) > record.

pub mod config;
pub mod meta;
pub mod names;
pub mod rust;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, info, info_span};

use crate::checksum::Checksum;
use crate::error::{Result, SchemaError};
use crate::graph::patterns::is_unresolved_union;
use crate::graph::{
    literal_text, primary_type, ContainmentEdge, CycleAnalysis, Diagnostics, DiscriminatorAnalysis,
    DiscriminatorBase, IntegerWidth, RefCounts, Scalar, TypeDescriptor, TypeResolver, VariantKind,
    VariantSource,
};
use crate::runtime::AlternativeKind;
use crate::schema::{Definitions, SchemaDefinition, SchemaDocument, SchemaRef};

pub use config::{CodegenConfig, RenderProfile};
use names::{case_name, class_name, escape_keyword, member_name, to_snake_case, NameRegistry};

/// Keywords that rule out a plain alias
const COMPLEX_KEYWORDS: &[&str] = &[
    "properties",
    "allOf",
    "oneOf",
    "anyOf",
    "enum",
    "items",
    "additionalProperties",
    "required",
    "discriminator",
];

// =============================================================================
// Type Model
// =============================================================================

/// Output section a type is emitted under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeGroup {
    Alias,
    Enum,
    Model,
}

impl TypeGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            Self::Alias => "Type aliases",
            Self::Enum => "Enums",
            Self::Model => "Models",
        }
    }
}

/// Wire representation of an enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumRepr {
    String,
    Integer(IntegerWidth),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    /// The string itself, or the integer literal text
    pub value: String,
    pub description: Option<String>,
}

/// Open member of an integer enum, holding any value no named member claims
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchAll {
    pub name: String,
    pub description: Option<String>,
}

/// One case of a primitive union
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnionAlternative {
    pub case_name: &'static str,
    pub kind: AlternativeKind,
}

impl UnionAlternative {
    pub fn of(kind: AlternativeKind) -> Self {
        let case_name = match kind {
            AlternativeKind::String => "String",
            AlternativeKind::Int16 => "Short",
            AlternativeKind::UInt16 => "UShort",
            AlternativeKind::Int32 => "Int",
            AlternativeKind::UInt32 => "UInt",
            AlternativeKind::Int64 => "Long",
            AlternativeKind::UInt64 => "ULong",
            AlternativeKind::Float => "Double",
            AlternativeKind::Bool => "Bool",
            AlternativeKind::Object => "Object",
            AlternativeKind::Array => "Array",
        };
        Self { case_name, kind }
    }
}

/// How a field behaves when absent from the wire
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    Required,
    /// Absent means `None`
    Optional,
    /// Absent means this literal
    Defaulted(Value),
    /// Reads and writes its members inline with the enclosing object
    Flattened,
}

/// One struct field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub wire_name: String,
    /// PascalCase member name; the Rust field is its snake_case form
    pub member: String,
    /// Wire name must be spelled out even if the identifier matches
    pub forced_rename: bool,
    pub descriptor: TypeDescriptor,
    pub presence: Presence,
    /// Stored behind a `Box` to break a by-value cycle
    pub boxed: bool,
    pub description: Option<String>,
    /// A default that could not be baked in; documented only
    pub unsupported_default: Option<Value>,
}

impl Field {
    pub fn identifier(&self) -> String {
        to_snake_case(&self.member)
    }
}

/// Case of a discriminated base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseCase {
    pub value: String,
    pub case_name: String,
    pub type_name: String,
}

/// Case of an abstract base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractCase {
    pub case_name: String,
    pub type_name: String,
}

/// Final shape of one emitted type
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Named wrapper around one primitive, or a plain `type` alias for
    /// composite targets
    Alias { target: TypeDescriptor },
    Enum {
        repr: EnumRepr,
        members: Vec<EnumMember>,
        /// Integer enums only
        catch_all: Option<CatchAll>,
    },
    /// Tagged sum type, cases sorted by value
    DiscriminatedBase { property: String, cases: Vec<BaseCase> },
    /// Record that is one case of a discriminated base
    Variant { base: String, value: String, fields: Vec<Field> },
    /// Untagged "is one of" sum type
    AbstractBase { cases: Vec<AbstractCase> },
    Union { alternatives: Vec<UnionAlternative>, nullable: bool },
    Record { fields: Vec<Field> },
}

impl TypeKind {
    pub fn group(&self) -> TypeGroup {
        match self {
            Self::Alias { .. } | Self::Union { .. } => TypeGroup::Alias,
            Self::Enum { .. } => TypeGroup::Enum,
            _ => TypeGroup::Model,
        }
    }

    pub fn fields(&self) -> &[Field] {
        match self {
            Self::Record { fields } | Self::Variant { fields, .. } => fields,
            _ => &[],
        }
    }

    fn fields_mut(&mut self) -> Option<&mut Vec<Field>> {
        match self {
            Self::Record { fields } | Self::Variant { fields, .. } => Some(fields),
            _ => None,
        }
    }
}

/// One emitted Rust type
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedType {
    /// Definition the type comes from (the base, for synthesized variants)
    pub definition: String,
    /// Unique origin: the definition name, or `Base[value]` for synthesized variants
    pub origin: String,
    /// Rust type name
    pub name: String,
    pub description: Option<String>,
    pub kind: TypeKind,
}

impl GeneratedType {
    fn new(definition: &str, description: Option<&str>, kind: TypeKind) -> Self {
        Self {
            definition: definition.to_string(),
            origin: definition.to_string(),
            name: class_name(definition),
            description: description.map(str::to_string),
            kind,
        }
    }

    pub fn group(&self) -> TypeGroup {
        self.kind.group()
    }
}

// =============================================================================
// CodegenContext
// =============================================================================

/// Immutable codegen context, frozen after `build()`
#[derive(Debug)]
pub struct CodegenContext {
    config: CodegenConfig,
    profile: RenderProfile,
    /// Emission order: grouped, then by definition name
    types: Vec<GeneratedType>,
    cycles: CycleAnalysis,
    diagnostics: Diagnostics,
    checksum: Checksum,
    schema_ref: Option<SchemaRef>,
}

impl CodegenContext {
    /// Run every analysis pass over `doc`.
    ///
    /// All-or-nothing: any `SchemaError` aborts before a type is produced.
    pub fn build(doc: &SchemaDocument, config: CodegenConfig) -> Result<Self> {
        let span = info_span!("codegen", definitions = doc.len());
        let _enter = span.enter();

        let mut diagnostics = Diagnostics::new();
        let refs = RefCounts::build(doc);
        let analysis = DiscriminatorAnalysis::analyze(doc, &refs, &mut diagnostics)?;

        let mut types = Vec::with_capacity(doc.len());
        {
            let mut builder = ModelBuilder {
                doc,
                analysis: &analysis,
                resolver: TypeResolver::new(),
                diagnostics: &mut diagnostics,
            };
            for def in doc.sorted() {
                builder.report_unresolved(def);
                types.extend(builder.build_definition(def)?);
            }
        }

        let mut names = NameRegistry::new();
        for ty in &types {
            names.claim(&ty.name, &ty.origin)?;
        }

        let cycles = CycleAnalysis::compute(&containment_edges(&types));
        for ty in &mut types {
            let type_name = ty.name.clone();
            let origin = ty.origin.clone();
            let Some(fields) = ty.kind.fields_mut() else {
                continue;
            };
            for field in fields.iter_mut() {
                let Some(target) = field.descriptor.inline_reference().map(class_name) else {
                    continue;
                };
                if cycles.needs_box(&type_name, &field.wire_name) {
                    field.boxed = true;
                    diagnostics.boxed_recursion(origin.as_str(), &field.wire_name, &target);
                }
            }
        }

        // Stable: keeps definition order inside each group, variants after their base
        types.sort_by_key(GeneratedType::group);

        let checksum = doc.checksum()?;
        info!(
            types = types.len(),
            checksum = checksum.short(),
            bases = analysis.bases().count(),
            abstract_bases = analysis.abstract_bases().count(),
            diagnostics = diagnostics.len(),
            "codegen context built"
        );

        Ok(Self {
            config,
            profile: RenderProfile::rust(),
            types,
            cycles,
            diagnostics,
            checksum,
            schema_ref: doc.schema_ref.clone(),
        })
    }

    pub fn types(&self) -> &[GeneratedType] {
        &self.types
    }

    /// Look up an emitted type by Rust name
    pub fn get(&self, name: &str) -> Option<&GeneratedType> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    pub fn profile(&self) -> &RenderProfile {
        &self.profile
    }

    pub fn cycles(&self) -> &CycleAnalysis {
        &self.cycles
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn checksum(&self) -> &Checksum {
        &self.checksum
    }

    pub fn schema_ref(&self) -> Option<&SchemaRef> {
        self.schema_ref.as_ref()
    }

    /// Render the whole context as one Rust source file
    pub fn emit(&self) -> String {
        rust::emit_document(self)
    }
}

/// Generate Rust source for a definitions map with default settings
pub fn generate(definitions: &Definitions) -> Result<String> {
    let doc = SchemaDocument::from_definitions(definitions.clone());
    generate_document(&doc, CodegenConfig::default())
}

/// Generate Rust source for a loaded schema document
pub fn generate_document(doc: &SchemaDocument, config: CodegenConfig) -> Result<String> {
    Ok(CodegenContext::build(doc, config)?.emit())
}

// =============================================================================
// Model Builder
// =============================================================================

struct ModelBuilder<'a, 'd> {
    doc: &'a SchemaDocument,
    analysis: &'a DiscriminatorAnalysis,
    resolver: TypeResolver,
    diagnostics: &'d mut Diagnostics,
}

impl<'a, 'd> ModelBuilder<'a, 'd> {
    fn report_unresolved(&mut self, def: SchemaDefinition<'a>) {
        let Some(node) = self.doc.definitions.get(def.name) else {
            return;
        };
        let mut local = RefCounts::default();
        local.count_node(node);
        for target in local.unresolved(self.doc) {
            self.diagnostics.unresolved_ref(def.name, target);
        }
    }

    fn build_definition(&mut self, def: SchemaDefinition<'a>) -> Result<Vec<GeneratedType>> {
        let name = class_name(def.name);
        let description = def.description();

        if let Some(derived) = self.analysis.derived(def.name) {
            let base = self.doc.get(&derived.base).map(|b| b.node);
            let fields = self.variant_fields(def.name, &name, Some(def.node), base, &derived.property_name);
            debug!(definition = def.name, base = %derived.base, value = %derived.value, "promoted variant");
            let kind = TypeKind::Variant {
                base: class_name(&derived.base),
                value: derived.value.clone(),
                fields,
            };
            return Ok(vec![GeneratedType::new(def.name, description, kind)]);
        }

        if is_simple_alias(def.node) {
            let target = self.known(self.resolver.resolve(def.node));
            debug!(definition = def.name, "alias");
            return Ok(vec![GeneratedType::new(def.name, description, TypeKind::Alias { target })]);
        }

        if let Some(values) = def.get("enum") {
            let kind = self.enum_from_values(def, values)?;
            return Ok(vec![GeneratedType::new(def.name, description, kind)]);
        }

        if let Some(base) = self.analysis.base(def.name) {
            return Ok(self.discriminated(def, base));
        }

        if let Some(abstract_base) = self.analysis.abstract_base(def.name) {
            let cases: Vec<AbstractCase> = abstract_base
                .children
                .iter()
                .filter(|child| self.doc.get(child).is_some())
                .map(|child| AbstractCase {
                    case_name: class_name(child),
                    type_name: class_name(child),
                })
                .collect();
            let kind = if cases.is_empty() {
                TypeKind::Alias { target: TypeDescriptor::Opaque }
            } else {
                TypeKind::AbstractBase { cases }
            };
            return Ok(vec![GeneratedType::new(def.name, description, kind)]);
        }

        let items = def
            .get("oneOf")
            .or_else(|| def.get("anyOf"))
            .and_then(Value::as_array);
        if let Some(items) = items {
            if let Some(repr) = enum_like(items) {
                let kind = self.enum_from_items(def, items, repr)?;
                return Ok(vec![GeneratedType::new(def.name, description, kind)]);
            }
            if let Some((alternatives, nullable)) = union_alternatives(items) {
                debug!(definition = def.name, alternatives = alternatives.len(), nullable, "union");
                let kind = TypeKind::Union { alternatives, nullable };
                return Ok(vec![GeneratedType::new(def.name, description, kind)]);
            }
            if !items_have_properties(items) {
                self.diagnostics.opaque_definition(def.name);
                let kind = TypeKind::Alias { target: TypeDescriptor::Opaque };
                return Ok(vec![GeneratedType::new(def.name, description, kind)]);
            }
        }

        if !def.node.contains_key("properties") && items.is_none() {
            // Nothing to hold: a bare `allOf` ref, or a free-form object
            let target = self.known(self.resolver.resolve(def.node));
            return Ok(vec![GeneratedType::new(def.name, description, TypeKind::Alias { target })]);
        }

        let set = PropertySet::of_record(def.node);
        let fields = self.fields(def.name, &name, &set);
        debug!(definition = def.name, fields = fields.len(), "record");
        Ok(vec![GeneratedType::new(def.name, description, TypeKind::Record { fields })])
    }

    // -------------------------------------------------------------------------
    // Discriminated bases
    // -------------------------------------------------------------------------

    fn discriminated(&mut self, def: SchemaDefinition<'a>, base: &'a DiscriminatorBase) -> Vec<GeneratedType> {
        let cases = base
            .variants
            .iter()
            .map(|v| BaseCase {
                value: v.value.clone(),
                case_name: v.case_name.clone(),
                type_name: v.type_name.clone(),
            })
            .collect();

        let mut out = vec![GeneratedType::new(
            def.name,
            def.description(),
            TypeKind::DiscriminatedBase {
                property: base.property_name.clone(),
                cases,
            },
        )];

        for variant in base.synthesized() {
            let VariantKind::Synthesized { source } = &variant.kind else {
                continue;
            };
            let node = match source {
                VariantSource::Definition(name) => self.doc.get(name).map(|d| d.node),
                VariantSource::Inline(item) => Some(item),
                VariantSource::Nested(_) => None,
            };
            let origin = format!("{}[{}]", def.name, variant.value);
            let mut fields = self.variant_fields(&origin, &variant.type_name, node, Some(def.node), &base.property_name);
            if let VariantSource::Nested(target) = source {
                fields.push(self.embedded(&origin, target, &fields));
            }
            out.push(GeneratedType {
                definition: def.name.to_string(),
                origin,
                name: variant.type_name.clone(),
                description: variant.description.clone(),
                kind: TypeKind::Variant {
                    base: base.class_name.clone(),
                    value: variant.value.clone(),
                    fields,
                },
            });
        }
        out
    }

    /// Base-level properties, overlaid by the variant's own, minus the tag
    fn variant_fields(
        &mut self,
        origin: &str,
        type_name: &str,
        node: Option<&'a Map<String, Value>>,
        base: Option<&'a Map<String, Value>>,
        property: &str,
    ) -> Vec<Field> {
        let mut set = base.map(PropertySet::of).unwrap_or_default();
        if let Some(node) = node {
            set.extend(PropertySet::of_record(node));
        }
        set.remove(property);
        self.fields(origin, type_name, &set)
    }

    /// Whole nested sum type, flattened into the wrapper next to `taken`
    fn embedded(&mut self, origin: &str, target: &str, taken: &[Field]) -> Field {
        let base = class_name(target);
        let mut member = base.clone();
        let mut n = 2;
        while taken.iter().any(|f| f.identifier() == to_snake_case(&member)) {
            member = format!("{}{}", base, n);
            n += 1;
        }
        if member != base {
            self.diagnostics.field_name_conflict(origin, target, &to_snake_case(&member));
        }
        Field {
            wire_name: target.to_string(),
            member,
            forced_rename: false,
            descriptor: TypeDescriptor::Reference(target.to_string()),
            presence: Presence::Flattened,
            boxed: false,
            description: None,
            unsupported_default: None,
        }
    }

    // -------------------------------------------------------------------------
    // Fields
    // -------------------------------------------------------------------------

    fn fields(&mut self, origin: &str, type_name: &str, set: &PropertySet<'a>) -> Vec<Field> {
        let mut entries: Vec<_> = set.entries.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        // Keyed by the identifier as written, keyword escapes included
        let mut used: HashSet<String> = HashSet::new();
        let mut fields = Vec::with_capacity(entries.len());
        for (wire, (node, required)) in entries {
            let mut field = self.field(origin, type_name, wire, node, *required);

            if !used.insert(escape_keyword(&field.identifier())) {
                let base = field.member.clone();
                let mut n = 2;
                while used.contains(&escape_keyword(&to_snake_case(&format!("{}{}", base, n)))) {
                    n += 1;
                }
                field.member = format!("{}{}", base, n);
                field.forced_rename = true;
                used.insert(escape_keyword(&field.identifier()));
                self.diagnostics.field_name_conflict(origin, wire, &field.identifier());
            }
            fields.push(field);
        }
        fields
    }

    fn field(&mut self, origin: &str, type_name: &str, wire: &str, node: &Value, required: bool) -> Field {
        let descriptor = self.known(self.resolver.resolve_value(node));
        let map = node.as_object();

        if map.is_some_and(|m| is_unresolved_union(m, &descriptor)) {
            self.diagnostics.opaque_union(origin, wire);
        }

        let default = map.and_then(|m| m.get("default"));
        let (presence, unsupported_default) = match default {
            _ if required => (Presence::Required, None),
            None => (Presence::Optional, None),
            Some(value) if literal_fits(&descriptor, value) => (Presence::Defaulted(value.clone()), None),
            Some(value) => {
                self.diagnostics.unsupported_default(origin, wire, value);
                (Presence::Optional, Some(value.clone()))
            }
        };

        let member = member_name(type_name, wire);
        Field {
            wire_name: wire.to_string(),
            member: member.identifier,
            forced_rename: member.forced_rename,
            descriptor,
            presence,
            boxed: false,
            description: map
                .and_then(|m| m.get("description"))
                .and_then(Value::as_str)
                .map(str::to_string),
            unsupported_default,
        }
    }

    /// Unknown references degrade to dynamic values
    fn known(&self, descriptor: TypeDescriptor) -> TypeDescriptor {
        match descriptor {
            TypeDescriptor::Reference(name) if self.doc.get(&name).is_none() => TypeDescriptor::Opaque,
            TypeDescriptor::Array(items) => TypeDescriptor::array(self.known(*items)),
            TypeDescriptor::Optional(inner) => TypeDescriptor::optional(self.known(*inner)),
            other => other,
        }
    }

    // -------------------------------------------------------------------------
    // Enums
    // -------------------------------------------------------------------------

    fn enum_from_values(&mut self, def: SchemaDefinition<'a>, values: &Value) -> Result<TypeKind> {
        let values = values
            .as_array()
            .ok_or_else(|| SchemaError::InvalidSchema(format!("{}: enum is not an array", def.name)))?;

        let repr = match primary_type(def.node) {
            Some("integer") => EnumRepr::Integer(IntegerWidth::of_node(def.node)),
            _ => EnumRepr::String,
        };

        let mut members = Members::default();
        for value in values.iter().filter(|v| !v.is_null()) {
            let wire = enum_value(def.name, repr, value)?;
            members.push(def.name, case_name(&literal_text(value)), wire, None, self.diagnostics);
        }

        debug!(definition = def.name, members = members.items.len(), "enum");
        Ok(members.into_kind(repr))
    }

    fn enum_from_items(&mut self, def: SchemaDefinition<'a>, items: &[Value], repr: EnumRepr) -> Result<TypeKind> {
        let mut members = Members::default();
        for item in items.iter().filter_map(Value::as_object) {
            let constant = item.get("const");
            let title = item
                .get("title")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty());

            let name = match (title, constant.map(literal_text)) {
                (Some(title), _) => case_name(title),
                (None, Some(text)) if !text.is_empty() => case_name(&text),
                _ => continue,
            };
            let description = item.get("description").and_then(Value::as_str).map(str::to_string);

            let wire = match (repr, constant) {
                (_, Some(c)) => enum_value(def.name, repr, c)?,
                (EnumRepr::String, None) => match title {
                    Some(t) => t.to_string(),
                    None => continue,
                },
                // No value of its own: stands for every code not listed
                (EnumRepr::Integer(_), None) => {
                    members.open(def.name, name, description, self.diagnostics);
                    continue;
                }
            };

            members.push(def.name, name, wire, description, self.diagnostics);
        }

        debug!(definition = def.name, members = members.items.len(), "enum from oneOf");
        Ok(members.into_kind(repr))
    }
}

/// Member list with normalization conflicts resolved
#[derive(Default)]
struct Members {
    items: Vec<EnumMember>,
    catch_all: Option<CatchAll>,
}

impl Members {
    fn push(&mut self, definition: &str, name: String, value: String, description: Option<String>, diagnostics: &mut Diagnostics) {
        if self.items.iter().any(|m| m.value == value) {
            // Same wire value twice; a second member would be unreachable
            diagnostics.enum_variant_conflict(definition, &value, "(dropped)");
            return;
        }

        let name = self.unique_name(definition, name, diagnostics);
        self.items.push(EnumMember { name, value, description });
    }

    /// The first value-less integer member takes every unlisted value
    fn open(&mut self, definition: &str, name: String, description: Option<String>, diagnostics: &mut Diagnostics) {
        if self.catch_all.is_some() {
            diagnostics.enum_variant_conflict(definition, &name, "(dropped)");
            return;
        }
        let name = self.unique_name(definition, name, diagnostics);
        self.catch_all = Some(CatchAll { name, description });
    }

    fn unique_name(&self, definition: &str, base: String, diagnostics: &mut Diagnostics) -> String {
        let taken = |candidate: &str| {
            self.items.iter().any(|m| m.name == candidate)
                || self.catch_all.as_ref().is_some_and(|c| c.name == candidate)
        };

        let mut name = base.clone();
        let mut n = 2;
        while taken(&name) {
            name = format!("{}{}", base, n);
            n += 1;
        }
        if name != base {
            diagnostics.enum_variant_conflict(definition, &base, &name);
        }
        name
    }

    fn into_kind(self, repr: EnumRepr) -> TypeKind {
        match repr {
            // Integer enums need at least one named value
            EnumRepr::Integer(width) if self.items.is_empty() => TypeKind::Alias {
                target: TypeDescriptor::Scalar(Scalar::Integer(width)),
            },
            EnumRepr::Integer(_) => TypeKind::Enum {
                repr,
                members: self.items,
                catch_all: self.catch_all,
            },
            EnumRepr::String => TypeKind::Enum {
                repr,
                members: self.items,
                catch_all: None,
            },
        }
    }
}

/// Wire text of one enum value
fn enum_value(definition: &str, repr: EnumRepr, value: &Value) -> Result<String> {
    match (repr, value) {
        (EnumRepr::String, v) => Ok(literal_text(v)),
        (EnumRepr::Integer(width), Value::Number(n)) if width.accepts(n) => Ok(n.to_string()),
        (EnumRepr::Integer(width), other) => Err(SchemaError::InvalidSchema(format!(
            "{}: enum value {} does not fit {:?}",
            definition, other, width
        ))),
    }
}

// =============================================================================
// Property Sets
// =============================================================================

/// Wire name -> (schema node, required), in declaration order
#[derive(Debug, Default)]
struct PropertySet<'a> {
    entries: IndexMap<&'a str, (&'a Value, bool)>,
}

impl<'a> PropertySet<'a> {
    /// The node's own `properties`
    fn of(node: &'a Map<String, Value>) -> Self {
        let required: HashSet<&str> = node
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let entries = node
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(name, prop)| (name.as_str(), (prop, required.contains(name.as_str()))))
                    .collect()
            })
            .unwrap_or_default();

        Self { entries }
    }

    /// Own properties plus those of root `oneOf`/`anyOf` items, later items winning
    fn of_record(node: &'a Map<String, Value>) -> Self {
        let mut set = Self::of(node);
        let required: HashSet<&str> = set.entries.iter().filter(|(_, (_, r))| *r).map(|(k, _)| *k).collect();

        let items = node
            .get("oneOf")
            .or_else(|| node.get("anyOf"))
            .and_then(Value::as_array);
        for item in items.into_iter().flatten() {
            let Some(props) = item.get("properties").and_then(Value::as_object) else {
                continue;
            };
            for (name, prop) in props {
                let required = required.contains(name.as_str());
                set.entries.insert(name.as_str(), (prop, required));
            }
        }
        set
    }

    fn extend(&mut self, other: PropertySet<'a>) {
        self.entries.extend(other.entries);
    }

    fn remove(&mut self, name: &str) {
        self.entries.shift_remove(name);
    }
}

// =============================================================================
// Shape Rules
// =============================================================================

/// A `type` with none of the structural keywords (`items` allowed for arrays)
fn is_simple_alias(node: &Map<String, Value>) -> bool {
    if !matches!(node.get("type"), Some(Value::String(_)) | Some(Value::Array(_))) {
        return false;
    }
    let array_typed = primary_type(node) == Some("array");
    !COMPLEX_KEYWORDS
        .iter()
        .filter(|k| !(array_typed && **k == "items"))
        .any(|k| node.contains_key(*k))
}

/// Every item an object of one string/integer type, each with a `const` or `title`
fn enum_like(items: &[Value]) -> Option<EnumRepr> {
    let first = items.first()?.as_object()?;
    let first_type = primary_type(first);

    for item in items {
        let item = item.as_object()?;
        if primary_type(item) != first_type {
            return None;
        }
        if !item.contains_key("const") && !item.contains_key("title") {
            return None;
        }
    }

    match first_type? {
        "string" => Some(EnumRepr::String),
        "integer" => Some(EnumRepr::Integer(IntegerWidth::of_node(first))),
        _ => None,
    }
}

/// Primitive alternatives of a root union; `None` unless at least two
/// non-null alternatives are declared and no item carries `properties`
fn union_alternatives(items: &[Value]) -> Option<(Vec<UnionAlternative>, bool)> {
    let mut kinds = Vec::new();
    let mut nullable = false;

    for item in items.iter().filter_map(Value::as_object) {
        if item.contains_key("properties") {
            return None;
        }
        match item.get("type") {
            Some(Value::Array(types)) => {
                nullable |= types.iter().any(|t| t.as_str() == Some("null"));
                if let Some(t) = types.iter().filter_map(Value::as_str).find(|t| *t != "null") {
                    kinds.extend(alternative_kind(t, item));
                }
            }
            Some(Value::String(t)) if t == "null" => nullable = true,
            Some(Value::String(t)) => kinds.extend(alternative_kind(t, item)),
            _ => {}
        }
    }

    // Counted before de-duplication
    if kinds.len() < 2 {
        return None;
    }

    let mut unique: Vec<AlternativeKind> = Vec::with_capacity(kinds.len());
    for kind in kinds {
        if !unique.contains(&kind) {
            unique.push(kind);
        }
    }
    Some((unique.into_iter().map(UnionAlternative::of).collect(), nullable))
}

fn alternative_kind(json_type: &str, item: &Map<String, Value>) -> Option<AlternativeKind> {
    match json_type {
        "string" => Some(AlternativeKind::String),
        "integer" => Some(match IntegerWidth::of_node(item) {
            IntegerWidth::I16 => AlternativeKind::Int16,
            IntegerWidth::I32 => AlternativeKind::Int32,
            IntegerWidth::I64 => AlternativeKind::Int64,
            IntegerWidth::U16 => AlternativeKind::UInt16,
            IntegerWidth::U32 => AlternativeKind::UInt32,
            IntegerWidth::U64 => AlternativeKind::UInt64,
        }),
        "number" => Some(AlternativeKind::Float),
        "boolean" => Some(AlternativeKind::Bool),
        "object" => Some(AlternativeKind::Object),
        "array" => Some(AlternativeKind::Array),
        _ => None,
    }
}

fn items_have_properties(items: &[Value]) -> bool {
    items.iter().any(|item| item.get("properties").is_some())
}

/// Whether `value` can be written as a Rust literal of `descriptor`
fn literal_fits(descriptor: &TypeDescriptor, value: &Value) -> bool {
    match (descriptor, value) {
        (TypeDescriptor::Scalar(Scalar::String), Value::String(_)) => true,
        (TypeDescriptor::Scalar(Scalar::Boolean), Value::Bool(_)) => true,
        (TypeDescriptor::Scalar(Scalar::Number), Value::Number(_)) => true,
        (TypeDescriptor::Scalar(Scalar::Integer(width)), Value::Number(n)) => width.accepts(n),
        (TypeDescriptor::Array(items), Value::Array(values)) => values.iter().all(|v| literal_fits(items, v)),
        (TypeDescriptor::Optional(_), Value::Null) => true,
        (TypeDescriptor::Optional(inner), v) => literal_fits(inner, v),
        (TypeDescriptor::Opaque, _) => true,
        _ => false,
    }
}

/// By-value containment between emitted types.
///
/// `Vec` already adds indirection, so only direct and `Option` references
/// count; sum-type cases can't be boxed and are recorded as such.
fn containment_edges(types: &[GeneratedType]) -> Vec<ContainmentEdge> {
    let mut edges = Vec::new();
    for ty in types {
        match &ty.kind {
            TypeKind::Record { fields } | TypeKind::Variant { fields, .. } => {
                for field in fields {
                    if let Some(target) = field.descriptor.inline_reference() {
                        edges.push(ContainmentEdge::field(&ty.name, &field.wire_name, class_name(target)));
                    }
                }
            }
            TypeKind::DiscriminatedBase { cases, .. } => {
                edges.extend(cases.iter().map(|c| ContainmentEdge::case(&ty.name, &c.type_name)));
            }
            TypeKind::AbstractBase { cases } => {
                edges.extend(cases.iter().map(|c| ContainmentEdge::case(&ty.name, &c.type_name)));
            }
            TypeKind::Alias { target } => {
                if let Some(target) = target.inline_reference() {
                    edges.push(ContainmentEdge::case(&ty.name, class_name(target)));
                }
            }
            TypeKind::Enum { .. } | TypeKind::Union { .. } => {}
        }
    }
    edges
}

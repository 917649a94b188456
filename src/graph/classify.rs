//! Discriminator Analysis
//!
//! Finds the tagged unions in a schema and decides how each branch is
//! represented:
//! - explicit bases: `discriminator.propertyName` + `oneOf`
//! - implicit bases: `anyOf` of `allOf`+`$ref` items that carry a `const`
//!   (or only a `title`) for a shared property
//! - abstract bases: `anyOf` of plain `allOf`+`$ref` items with no constant
//!
//! A variant whose `$ref` is a plain object record used exactly once in the
//! whole schema, and once in its base, is *promoted*: the referenced
//! definition itself becomes the branch. Every other branch gets a
//! *synthesized* wrapper type named `{Base}{Value}` so a shared definition
//! never ends up owned by two bases. A branch pointing at another tagged or
//! untagged union embeds it whole instead of flattening its cases.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info};

use super::diagnostics::Diagnostics;
use super::loader::RefCounts;
use super::{all_of_ref, literal_text, node_ref};
use crate::codegen::names::{case_name, class_name, convert_property_name};
use crate::error::{Result, SchemaError};
use crate::schema::{SchemaDefinition, SchemaDocument};

// =============================================================================
// Analysis Output
// =============================================================================

/// Which schema shape produced a base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscriminatorForm {
    /// `discriminator` + `oneOf`
    Explicit,
    /// `anyOf` with constant-bearing `allOf` items
    Implicit,
}

/// Where a synthesized wrapper takes its members from
#[derive(Debug, Clone, PartialEq)]
pub enum VariantSource {
    /// The referenced definition's own properties
    Definition(String),
    /// The referenced definition is itself a sum type, held as one field
    Nested(String),
    /// The branch item itself (no ref, or the ref does not resolve)
    Inline(Map<String, Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum VariantKind {
    /// The referenced definition is the branch type
    Promoted,
    /// A new wrapper type holds the branch's members
    Synthesized { source: VariantSource },
}

/// One branch of a discriminated base
#[derive(Debug, Clone, PartialEq)]
pub struct DiscriminatorVariant {
    /// Literal discriminator value on the wire
    pub value: String,
    /// Case identifier inside the base enum
    pub case_name: String,
    /// Type held by the case
    pub type_name: String,
    /// Bare `$ref` name of the branch, if any
    pub ref_name: Option<String>,
    pub kind: VariantKind,
    pub description: Option<String>,
}

impl DiscriminatorVariant {
    pub fn is_promoted(&self) -> bool {
        matches!(self.kind, VariantKind::Promoted)
    }
}

/// A tagged union and its value -> type mapping
#[derive(Debug, Clone, PartialEq)]
pub struct DiscriminatorBase {
    pub definition: String,
    pub class_name: String,
    /// Wire name of the tag property
    pub property_name: String,
    pub form: DiscriminatorForm,
    /// Sorted by value
    pub variants: Vec<DiscriminatorVariant>,
}

impl DiscriminatorBase {
    /// Discriminator value -> concrete type name
    pub fn mapping(&self) -> BTreeMap<&str, &str> {
        self.variants
            .iter()
            .map(|v| (v.value.as_str(), v.type_name.as_str()))
            .collect()
    }

    pub fn variant(&self, value: &str) -> Option<&DiscriminatorVariant> {
        self.variants.iter().find(|v| v.value == value)
    }

    pub fn synthesized(&self) -> impl Iterator<Item = &DiscriminatorVariant> {
        self.variants.iter().filter(|v| !v.is_promoted())
    }
}

/// Back-reference from a promoted definition to its base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedInfo {
    pub base: String,
    pub property_name: String,
    pub value: String,
}

/// "Is one of" marker without a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbstractBase {
    pub definition: String,
    pub class_name: String,
    /// Bare child names, declared order, de-duplicated
    pub children: Vec<String>,
}

/// Result of the discriminator pass over a whole document
#[derive(Debug, Clone, Default)]
pub struct DiscriminatorAnalysis {
    bases: BTreeMap<String, DiscriminatorBase>,
    derived: BTreeMap<String, DerivedInfo>,
    abstract_bases: BTreeMap<String, AbstractBase>,
    child_to_abstract: BTreeMap<String, String>,
}

/// A branch that resolved to a discriminator value
struct Candidate<'a> {
    ref_name: Option<&'a str>,
    value: String,
    item: &'a Map<String, Value>,
}

/// A definition that qualified as a base, before variants are decided
struct PendingBase<'a> {
    definition: SchemaDefinition<'a>,
    property: String,
    form: DiscriminatorForm,
    candidates: Vec<Candidate<'a>>,
}

impl DiscriminatorAnalysis {
    /// Classify every definition in `doc`.
    ///
    /// Explicit-form problems and ambiguous abstract ownership abort the run;
    /// an implicit `anyOf` that doesn't qualify only leaves a diagnostic.
    pub fn analyze(doc: &SchemaDocument, refs: &RefCounts, diagnostics: &mut Diagnostics) -> Result<Self> {
        let definitions = doc.sorted();

        let mut pending = Vec::new();
        for def in &definitions {
            if let Some(base) = explicit_base(*def, doc)? {
                pending.push(base);
            }
        }
        let explicit: HashSet<&str> = pending.iter().map(|p| p.definition.name).collect();
        for def in &definitions {
            if explicit.contains(def.name) {
                continue;
            }
            if let Some(base) = implicit_base(*def, diagnostics) {
                pending.push(base);
            }
        }

        let base_names: HashSet<&str> = pending.iter().map(|p| p.definition.name).collect();

        let mut analysis = Self::default();
        for def in &definitions {
            if base_names.contains(def.name) {
                continue;
            }
            analysis.detect_abstract(*def)?;
        }

        for base in pending {
            analysis.resolve_variants(base, doc, refs, &base_names)?;
        }

        info!(
            bases = analysis.bases.len(),
            promoted = analysis.derived.len(),
            abstract_bases = analysis.abstract_bases.len(),
            "discriminator analysis complete"
        );

        Ok(analysis)
    }

    fn detect_abstract(&mut self, def: SchemaDefinition<'_>) -> Result<()> {
        if def.node.contains_key("discriminator") {
            return Ok(());
        }
        let Some(any_of) = def.get("anyOf").and_then(Value::as_array) else {
            return Ok(());
        };

        let mut children: Vec<String> = Vec::new();
        for item in any_of.iter().filter_map(Value::as_object) {
            let child = match all_of_ref(item) {
                Some(child) if !has_const_property(item) => child,
                _ => return Ok(()),
            };
            if !children.iter().any(|c| c == child) {
                children.push(child.to_string());
            }
        }
        if children.is_empty() {
            return Ok(());
        }

        for child in &children {
            if let Some(first) = self.child_to_abstract.get(child) {
                if first != def.name {
                    return Err(SchemaError::AmbiguousDiscriminatorOwnership {
                        child: child.clone(),
                        first: first.clone(),
                        second: def.name.to_string(),
                    });
                }
            }
            self.child_to_abstract.insert(child.clone(), def.name.to_string());
        }

        debug!(definition = def.name, children = children.len(), "abstract base");
        self.abstract_bases.insert(
            def.name.to_string(),
            AbstractBase {
                definition: def.name.to_string(),
                class_name: class_name(def.name),
                children,
            },
        );
        Ok(())
    }

    fn resolve_variants(
        &mut self,
        pending: PendingBase<'_>,
        doc: &SchemaDocument,
        refs: &RefCounts,
        base_names: &HashSet<&str>,
    ) -> Result<()> {
        let def_name = pending.definition.name;
        let base_class = class_name(def_name);

        let mut local: HashMap<&str, usize> = HashMap::new();
        for candidate in &pending.candidates {
            if let Some(r) = candidate.ref_name {
                *local.entry(r).or_default() += 1;
            }
        }

        let mut variants: Vec<DiscriminatorVariant> = Vec::with_capacity(pending.candidates.len());
        for candidate in &pending.candidates {
            if variants.iter().any(|v| v.value == candidate.value) {
                return Err(SchemaError::DuplicateDiscriminatorValue {
                    definition: def_name.to_string(),
                    value: candidate.value.clone(),
                });
            }

            let promote = candidate.ref_name.is_some_and(|r| {
                doc.get(r).is_some_and(|d| is_plain_record(d.node))
                    && refs.get(r) == 1
                    && local.get(r).copied() == Some(1)
            });

            let variant = match candidate.ref_name {
                Some(r) if promote => {
                    debug!(base = def_name, value = %candidate.value, definition = r, "promoted variant");
                    self.derived.insert(
                        r.to_string(),
                        DerivedInfo {
                            base: def_name.to_string(),
                            property_name: pending.property.clone(),
                            value: candidate.value.clone(),
                        },
                    );
                    DiscriminatorVariant {
                        value: candidate.value.clone(),
                        case_name: String::new(),
                        type_name: class_name(r),
                        ref_name: Some(r.to_string()),
                        kind: VariantKind::Promoted,
                        description: doc.get(r).and_then(|d| d.description()).map(str::to_string),
                    }
                }
                _ => {
                    let type_name = format!("{}{}", base_class, convert_property_name(&candidate.value));
                    let referenced = candidate.ref_name.and_then(|r| doc.get(r));
                    let source = match referenced {
                        Some(target)
                            if base_names.contains(target.name) || self.abstract_bases.contains_key(target.name) =>
                        {
                            VariantSource::Nested(target.name.to_string())
                        }
                        Some(target) => VariantSource::Definition(target.name.to_string()),
                        None => VariantSource::Inline(candidate.item.clone()),
                    };
                    let description = candidate
                        .item
                        .get("description")
                        .and_then(Value::as_str)
                        .or_else(|| referenced.and_then(|d| d.description()))
                        .map(str::to_string);
                    debug!(base = def_name, value = %candidate.value, wrapper = %type_name, "synthesized variant");
                    DiscriminatorVariant {
                        value: candidate.value.clone(),
                        case_name: String::new(),
                        type_name,
                        ref_name: candidate.ref_name.map(str::to_string),
                        kind: VariantKind::Synthesized { source },
                        description,
                    }
                }
            };
            variants.push(variant);
        }

        variants.sort_by(|a, b| a.value.cmp(&b.value));
        assign_case_names(&mut variants);

        self.bases.insert(
            def_name.to_string(),
            DiscriminatorBase {
                definition: def_name.to_string(),
                class_name: base_class,
                property_name: pending.property,
                form: pending.form,
                variants,
            },
        );
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn base(&self, definition: &str) -> Option<&DiscriminatorBase> {
        self.bases.get(definition)
    }

    /// Bases sorted by definition name
    pub fn bases(&self) -> impl Iterator<Item = &DiscriminatorBase> {
        self.bases.values()
    }

    pub fn is_base(&self, definition: &str) -> bool {
        self.bases.contains_key(definition)
    }

    /// Base info for a promoted definition
    pub fn derived(&self, definition: &str) -> Option<&DerivedInfo> {
        self.derived.get(definition)
    }

    pub fn abstract_base(&self, definition: &str) -> Option<&AbstractBase> {
        self.abstract_bases.get(definition)
    }

    pub fn abstract_bases(&self) -> impl Iterator<Item = &AbstractBase> {
        self.abstract_bases.values()
    }

    /// The single abstract base claiming `child`
    pub fn abstract_parent(&self, child: &str) -> Option<&str> {
        self.child_to_abstract.get(child).map(String::as_str)
    }
}

// =============================================================================
// Base Detection
// =============================================================================

fn explicit_base<'a>(def: SchemaDefinition<'a>, doc: &'a SchemaDocument) -> Result<Option<PendingBase<'a>>> {
    let (Some(discriminator), Some(one_of)) = (
        def.get("discriminator").and_then(Value::as_object),
        def.get("oneOf").and_then(Value::as_array),
    ) else {
        return Ok(None);
    };

    let property = discriminator
        .get("propertyName")
        .and_then(Value::as_str)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| SchemaError::MissingPropertyName {
            definition: def.name.to_string(),
        })?;

    let candidates: Vec<Candidate<'a>> = one_of
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|item| {
            let ref_name = node_ref(item);
            // The item's own const wins; a bare ref may carry it on its target
            let value = const_of(item, property).or_else(|| {
                let target = doc.get(ref_name?)?;
                const_of(target.node, property)
            })?;
            Some(Candidate {
                ref_name,
                value: literal_text(value),
                item,
            })
        })
        .collect();

    if candidates.is_empty() {
        return Err(SchemaError::NoResolvableVariants {
            definition: def.name.to_string(),
            property: property.to_string(),
        });
    }

    debug!(definition = def.name, property, variants = candidates.len(), "explicit discriminator");
    Ok(Some(PendingBase {
        definition: def,
        property: property.to_string(),
        form: DiscriminatorForm::Explicit,
        candidates,
    }))
}

fn implicit_base<'a>(def: SchemaDefinition<'a>, diagnostics: &mut Diagnostics) -> Option<PendingBase<'a>> {
    if def.node.contains_key("discriminator") || def.node.contains_key("oneOf") {
        return None;
    }
    let any_of = def.get("anyOf").and_then(Value::as_array).filter(|a| !a.is_empty())?;

    // Primitive unions (null | integer | string) have no allOf refs
    let has_complex = any_of
        .iter()
        .filter_map(Value::as_object)
        .any(|item| all_of_ref(item).is_some());
    if !has_complex {
        return None;
    }

    let mut property: Option<String> = None;
    let mut candidates = Vec::new();

    for item in any_of.iter().filter_map(Value::as_object) {
        let ref_name = all_of_ref(item);

        let constant = item
            .get("properties")
            .and_then(Value::as_object)
            .and_then(|props| {
                props.iter().find_map(|(name, prop)| {
                    prop.get("const").map(|c| (name.as_str(), literal_text(c)))
                })
            });

        let value = match constant {
            Some((name, value)) => {
                property.get_or_insert_with(|| name.to_string());
                Some(value)
            }
            None => item
                .get("title")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(|title| {
                    property.get_or_insert_with(|| "type".to_string());
                    title.to_string()
                }),
        };

        if let Some(value) = value.filter(|v| !v.is_empty()) {
            candidates.push(Candidate { ref_name, value, item });
        }
    }

    let property = match property {
        Some(p) if candidates.len() >= 2 => p,
        _ => {
            if candidates.len() == 1 {
                diagnostics.undiscriminated_any_of(def.name, candidates.len());
            }
            return None;
        }
    };

    let mut seen = HashSet::new();
    if !candidates.iter().all(|c| seen.insert(c.value.as_str())) {
        debug!(definition = def.name, "implicit anyOf repeats a value; not discriminated");
        return None;
    }

    debug!(definition = def.name, property = %property, variants = candidates.len(), "implicit discriminator");
    Some(PendingBase {
        definition: def,
        property,
        form: DiscriminatorForm::Implicit,
        candidates,
    })
}

/// `item.properties[property].const`
fn const_of<'a>(item: &'a Map<String, Value>, property: &str) -> Option<&'a Value> {
    item.get("properties")?
        .as_object()?
        .get(property)?
        .as_object()?
        .get("const")
}

fn has_const_property(item: &Map<String, Value>) -> bool {
    item.get("properties")
        .and_then(Value::as_object)
        .is_some_and(|props| props.values().any(|p| p.get("const").is_some()))
}

/// An object definition with no sum-type or value keywords of its own
fn is_plain_record(node: &Map<String, Value>) -> bool {
    let object = node.contains_key("properties") || node.get("type").and_then(Value::as_str) == Some("object");
    object && !["oneOf", "anyOf", "enum", "const", "discriminator"].iter().any(|k| node.contains_key(*k))
}

/// Case identifiers: `PascalCase(value)`, de-duplicated with a numeric suffix
fn assign_case_names(variants: &mut [DiscriminatorVariant]) {
    let mut used: HashSet<String> = HashSet::new();
    for variant in variants.iter_mut() {
        let name = case_name(&variant.value);
        let mut candidate = name.clone();
        let mut n = 2;
        while used.contains(&candidate) {
            candidate = format!("{}{}", name, n);
            n += 1;
        }
        used.insert(candidate.clone());
        variant.case_name = candidate;
    }
}

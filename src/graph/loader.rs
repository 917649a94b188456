//! Definition Index & Ref Counter
//!
//! Walks every definition once and counts `$ref` occurrences by bare target
//! name. The counts drive the promote-or-wrap decision for discriminated
//! variants: only a definition referenced exactly once can become a variant
//! without a wrapper.

use std::collections::{BTreeSet, HashMap};

use serde_json::Value;
use tracing::debug;

use super::ref_name;
use crate::schema::SchemaDocument;

/// Global `$ref` counts, keyed by bare definition name
#[derive(Debug, Clone, Default)]
pub struct RefCounts {
    counts: HashMap<String, usize>,
}

impl RefCounts {
    /// Count every `$ref` in every definition, nested anywhere
    pub fn build(doc: &SchemaDocument) -> Self {
        let mut counts = Self::default();
        for node in doc.definitions.values() {
            counts.count_node(node);
        }
        debug!(
            targets = counts.counts.len(),
            refs = counts.total(),
            "counted schema references"
        );
        counts
    }

    /// Count the refs inside one node (recursive)
    pub fn count_node(&mut self, node: &Value) {
        match node {
            Value::Object(map) => {
                for (key, value) in map {
                    if key == "$ref" {
                        if let Some(target) = value.as_str() {
                            *self.counts.entry(ref_name(target).to_string()).or_default() += 1;
                        }
                    } else {
                        self.count_node(value);
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.count_node(item);
                }
            }
            _ => {}
        }
    }

    /// Occurrences of `name`; zero when never referenced
    pub fn get(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    /// Total number of `$ref` occurrences
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Referenced names that have no definition, sorted
    pub fn unresolved<'a>(&'a self, doc: &SchemaDocument) -> BTreeSet<&'a str> {
        self.counts
            .keys()
            .filter(|name| !doc.definitions.contains_key(name.as_str()))
            .map(String::as_str)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: &str) -> SchemaDocument {
        SchemaDocument::parse(json).unwrap()
    }

    #[test]
    fn test_counts_nested_refs() {
        let doc = doc(r##"{"$defs": {
            "A": {"type": "object", "properties": {
                "b": {"$ref": "#/$defs/B"},
                "list": {"type": "array", "items": {"$ref": "#/$defs/B"}},
                "either": {"anyOf": [{"$ref": "#/$defs/C"}, {"type": "null"}]}
            }},
            "B": {"allOf": [{"$ref": "#/$defs/C"}]},
            "C": {"type": "string"}
        }}"##);
        let counts = RefCounts::build(&doc);
        assert_eq!(counts.get("B"), 2);
        assert_eq!(counts.get("C"), 2);
        assert_eq!(counts.get("A"), 0);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_unknown_names_count_zero() {
        let counts = RefCounts::build(&doc(r#"{"$defs": {}}"#));
        assert_eq!(counts.get("Missing"), 0);
    }

    #[test]
    fn test_unresolved_targets() {
        let doc = doc(r##"{"$defs": {"A": {"properties": {"x": {"$ref": "#/$defs/Ghost"}}}}}"##);
        let counts = RefCounts::build(&doc);
        let unresolved: Vec<_> = counts.unresolved(&doc).into_iter().collect();
        assert_eq!(unresolved, vec!["Ghost"]);
    }
}

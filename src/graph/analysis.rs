//! Reference Cycle Analysis
//!
//! Rust types that contain each other by value have infinite size. The
//! emitter reports every by-value containment (struct field, union case) as
//! a `ContainmentEdge`; strongly connected components over those edges tell
//! it which fields must be stored behind a `Box`.
//!
//! `Vec<T>` already allocates, so array-typed fields never produce an edge.

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

// =============================================================================
// Containment Edge
// =============================================================================

/// `from` holds a `to` by value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainmentEdge {
    /// Containing type name
    pub from: String,
    /// Contained type name
    pub to: String,
    /// Wire name of the field carrying the value; `None` for enum cases,
    /// which are never boxed
    pub field: Option<String>,
}

impl ContainmentEdge {
    pub fn field(from: impl Into<String>, field: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            field: Some(field.into()),
        }
    }

    pub fn case(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            field: None,
        }
    }
}

// =============================================================================
// Analysis Result
// =============================================================================

/// Field that must be boxed to keep its type finite
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoxedField {
    pub type_name: String,
    pub field: String,
    pub target: String,
}

/// Cycle groups and the boxing decisions derived from them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CycleAnalysis {
    /// Cyclic components (more than one member, or a self-reference), members sorted
    groups: Vec<Vec<String>>,
    boxed: BTreeSet<BoxedField>,
}

impl CycleAnalysis {
    /// Compute SCCs over the containment graph
    pub fn compute(edges: &[ContainmentEdge]) -> Self {
        let mut graph: DiGraph<&str, ()> = DiGraph::new();
        let mut index: HashMap<&str, NodeIndex> = HashMap::new();

        for edge in edges {
            for name in [edge.from.as_str(), edge.to.as_str()] {
                if !index.contains_key(name) {
                    index.insert(name, graph.add_node(name));
                }
            }
        }
        for edge in edges {
            if let (Some(&from), Some(&to)) = (index.get(edge.from.as_str()), index.get(edge.to.as_str())) {
                graph.update_edge(from, to, ());
            }
        }

        let mut component_of: HashMap<&str, usize> = HashMap::new();
        let mut groups = Vec::new();

        for scc in kosaraju_scc(&graph) {
            let cyclic = scc.len() > 1 || scc.iter().any(|&n| graph.contains_edge(n, n));
            if !cyclic {
                continue;
            }
            let id = groups.len();
            let mut members: Vec<String> = scc
                .iter()
                .filter_map(|&n| graph.node_weight(n))
                .map(|name| {
                    component_of.insert(name, id);
                    name.to_string()
                })
                .collect();
            members.sort();
            groups.push(members);
        }

        let boxed = edges
            .iter()
            .filter_map(|edge| {
                let field = edge.field.as_ref()?;
                let from = component_of.get(edge.from.as_str())?;
                let to = component_of.get(edge.to.as_str())?;
                (from == to).then(|| BoxedField {
                    type_name: edge.from.clone(),
                    field: field.clone(),
                    target: edge.to.clone(),
                })
            })
            .collect();

        Self { groups, boxed }
    }

    /// Whether `field` of `type_name` must be stored as `Box<T>`
    pub fn needs_box(&self, type_name: &str, field: &str) -> bool {
        self.boxed
            .iter()
            .any(|b| b.type_name == type_name && b.field == field)
    }

    pub fn is_cyclic(&self, type_name: &str) -> bool {
        self.groups.iter().any(|g| g.iter().any(|m| m == type_name))
    }

    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }

    pub fn boxed_fields(&self) -> impl Iterator<Item = &BoxedField> {
        self.boxed.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acyclic_graph_boxes_nothing() {
        let analysis = CycleAnalysis::compute(&[
            ContainmentEdge::field("Plan", "entry", "PlanEntry"),
            ContainmentEdge::field("PlanEntry", "priority", "PlanEntryPriority"),
        ]);
        assert!(analysis.groups().is_empty());
        assert!(!analysis.needs_box("Plan", "entry"));
    }

    #[test]
    fn test_self_reference_is_boxed() {
        let analysis = CycleAnalysis::compute(&[ContainmentEdge::field("Node", "parent", "Node")]);
        assert!(analysis.is_cyclic("Node"));
        assert!(analysis.needs_box("Node", "parent"));
    }

    #[test]
    fn test_cycle_through_enum_case() {
        // Block -> Wrapper (case) -> Block (field)
        let analysis = CycleAnalysis::compute(&[
            ContainmentEdge::case("Block", "Wrapper"),
            ContainmentEdge::field("Wrapper", "inner", "Block"),
            ContainmentEdge::field("Wrapper", "meta", "Meta"),
        ]);
        assert_eq!(analysis.groups(), &[vec!["Block".to_string(), "Wrapper".to_string()]]);
        assert!(analysis.needs_box("Wrapper", "inner"));
        assert!(!analysis.needs_box("Wrapper", "meta"));
        assert_eq!(analysis.boxed_fields().count(), 1);
    }
}

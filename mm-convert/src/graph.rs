//! The conversion graph built from a merged catalog
//!
//! Formats are nodes, one-step conversions are directed edges. Nodes live in
//! a map keyed by canonical extension and edges refer to their target by key,
//! so the graph owns all of its data and can be cloned or dropped freely.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::catalog::FormatCatalog;

/// One directed conversion out of a format node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionEdge {
    /// Canonical extension of the target format.
    pub to: String,
    pub cost: u64,
    pub operation: String,
    pub dependencies: BTreeSet<String>,
}

/// A format known to the graph, with its outgoing conversions.
#[derive(Debug, Clone)]
pub struct FormatNode {
    key: String,
    edges: Vec<ConversionEdge>,
}

impl FormatNode {
    fn new(key: &str) -> Self {
        FormatNode {
            key: key.to_string(),
            edges: Vec::new(),
        }
    }

    /// Canonical extension identifying this format.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn edges(&self) -> &[ConversionEdge] {
        &self.edges
    }

    /// The first edge leading to `to`, if any.
    pub fn edge_to(&self, to: &str) -> Option<&ConversionEdge> {
        self.edges.iter().find(|edge| edge.to == to)
    }
}

/// Directed graph of formats keyed by canonical extension.
///
/// Every format mentioned by the catalog becomes a node, whether it appears
/// as a source or only as a destination. Destination-only formats simply end
/// up with no outgoing edges.
#[derive(Debug, Clone, Default)]
pub struct FormatGraph {
    nodes: BTreeMap<String, FormatNode>,
}

impl FormatGraph {
    pub fn from_catalog(catalog: &FormatCatalog) -> Self {
        let mut graph = FormatGraph::default();
        for (from, destinations) in catalog.iter() {
            for to in destinations.keys() {
                graph.ensure_node(to);
            }
            let edges = destinations
                .iter()
                .map(|(to, spec)| ConversionEdge {
                    to: to.clone(),
                    cost: spec.cost,
                    operation: spec.operation.clone(),
                    dependencies: spec.dependencies.clone(),
                })
                .collect();
            graph
                .nodes
                .entry(from.clone())
                .or_insert_with(|| FormatNode::new(from))
                .edges = edges;
        }
        debug!(
            formats = graph.nodes.len(),
            edges = graph.edge_count(),
            "built conversion graph"
        );
        graph
    }

    fn ensure_node(&mut self, key: &str) {
        if !self.nodes.contains_key(key) {
            self.nodes.insert(key.to_string(), FormatNode::new(key));
        }
    }

    pub fn contains(&self, format: &str) -> bool {
        self.nodes.contains_key(format)
    }

    pub fn node(&self, format: &str) -> Option<&FormatNode> {
        self.nodes.get(format)
    }

    /// All known formats, sorted.
    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|node| node.edges.len()).sum()
    }

    /// The first edge between two formats, if both exist and are connected.
    pub fn edge_between(&self, from: &str, to: &str) -> Option<&ConversionEdge> {
        self.nodes.get(from)?.edge_to(to)
    }

    /// Sum of every edge's base cost, saturating. The router derives its
    /// unmet-dependency penalty from this so the penalty always dominates
    /// any real path.
    pub fn total_edge_cost(&self) -> u64 {
        self.nodes
            .values()
            .flat_map(|node| node.edges.iter())
            .fold(0u64, |acc, edge| acc.saturating_add(edge.cost))
    }
}

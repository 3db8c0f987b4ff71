//! JSON format output for lineage data.

use crate::graph::traversal::Lineage;
use schemars::JsonSchema;
use serde::Serialize;

/// JSON representation of one table's lineage
#[derive(Debug, Serialize, JsonSchema)]
pub struct LineageJson {
    pub root: String,
    pub nodes: Vec<NodeJson>,
    pub edges: Vec<EdgeJson>,
    pub stats: LineageStats,
}

/// JSON representation of a visited table
#[derive(Debug, Serialize, JsonSchema)]
pub struct NodeJson {
    pub name: String,
    pub is_root: bool,
}

/// JSON representation of a lineage edge
#[derive(Debug, Serialize, JsonSchema)]
pub struct EdgeJson {
    pub from: String,
    pub to: String,
    pub label: String,
}

/// Lineage statistics
#[derive(Debug, Serialize, JsonSchema)]
pub struct LineageStats {
    pub node_count: usize,
    pub edge_count: usize,
}

/// Generate JSON output from a lineage
pub fn to_json(lineage: &Lineage) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&build_lineage_json(lineage))
}

/// Build the JSON structure
pub fn build_lineage_json(lineage: &Lineage) -> LineageJson {
    let nodes = lineage
        .sorted_nodes()
        .into_iter()
        .map(|table| NodeJson {
            name: table.to_string(),
            is_root: lineage.is_root(table),
        })
        .collect();

    let edges = lineage
        .edges
        .iter()
        .map(|edge| EdgeJson {
            from: edge.from.to_string(),
            to: edge.to.to_string(),
            label: edge.label.to_string(),
        })
        .collect();

    LineageJson {
        root: lineage.root.to_string(),
        nodes,
        edges,
        stats: LineageStats {
            node_count: lineage.node_count(),
            edge_count: lineage.edge_count(),
        },
    }
}

//! Graphviz DOT format output for lineage diagrams.

use crate::graph::format::{DiagramStyle, Layout};
use crate::graph::traversal::Lineage;

/// Generate a DOT digraph named after the root, with the root node filled
pub fn to_dot(lineage: &Lineage, style: &DiagramStyle) -> String {
    let mut output = String::new();

    output.push_str(&format!("digraph {} {{\n", escape_dot_id(lineage.root.as_str())));

    let rankdir = match style.layout {
        Layout::LR => "LR",
        Layout::TB => "TB",
    };
    output.push_str(&format!("  rankdir={};\n", rankdir));
    output.push_str("  node [shape=ellipse];\n\n");

    for table in lineage.sorted_nodes() {
        let id = escape_dot_id(table.as_str());
        if lineage.is_root(table) {
            output.push_str(&format!(
                "  {} [style=filled, color={}];\n",
                id,
                escape_dot_id(&style.root_color)
            ));
        } else {
            output.push_str(&format!("  {};\n", id));
        }
    }

    if !lineage.edges.is_empty() {
        output.push('\n');
    }

    for edge in &lineage.edges {
        output.push_str(&format!(
            "  {} -> {} [label={}];\n",
            escape_dot_id(edge.from.as_str()),
            escape_dot_id(edge.to.as_str()),
            escape_dot_id(edge.label)
        ));
    }

    output.push_str("}\n");
    output
}

/// Escape a string for use as a DOT ID
fn escape_dot_id(s: &str) -> String {
    let is_plain = !s.is_empty()
        && !s.starts_with(|c: char| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if is_plain {
        s.to_string()
    } else {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

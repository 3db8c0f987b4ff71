//! Mermaid flowchart format output.

use crate::graph::format::{DiagramStyle, Layout};
use crate::graph::traversal::Lineage;
use ahash::AHashMap;

/// Generate a Mermaid flowchart from a lineage
pub fn to_mermaid(lineage: &Lineage, style: &DiagramStyle) -> String {
    let mut output = String::new();

    let direction = match style.layout {
        Layout::LR => "LR",
        Layout::TB => "TB",
    };
    output.push_str(&format!("flowchart {}\n", direction));

    // Table names carry dots, so nodes get positional ids and a label
    let mut ids: AHashMap<&str, String> = AHashMap::new();
    for (i, table) in lineage.sorted_nodes().into_iter().enumerate() {
        let id = format!("t{}", i);
        output.push_str(&format!(
            "    {}[\"{}\"]\n",
            id,
            escape_mermaid_label(table.as_str())
        ));
        ids.insert(table.as_str(), id);
    }

    if !lineage.edges.is_empty() {
        output.push('\n');
    }

    for edge in &lineage.edges {
        let (Some(from), Some(to)) = (ids.get(edge.from.as_str()), ids.get(edge.to.as_str()))
        else {
            continue;
        };
        output.push_str(&format!("    {} -->|{}| {}\n", from, edge.label, to));
    }

    if let Some(root_id) = ids.get(lineage.root.as_str()) {
        output.push_str(&format!(
            "\n    style {} fill:{},color:#ffffff\n",
            root_id, style.root_color
        ));
    }

    output
}

/// Escape a string for use inside a quoted Mermaid label
fn escape_mermaid_label(s: &str) -> String {
    s.replace('"', "#quot;")
}

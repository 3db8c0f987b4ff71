//! Lineage command: a single table's diagram.

use super::{GraphArgs, InputArgs};
use crate::config::RenderYamlConfig;
use crate::emit::{encode, graphviz};
use crate::graph::{traverse_with, OutputFormat};
use crate::table::TableId;
use anyhow::{bail, Context};
use std::fs;
use std::path::PathBuf;

pub fn run(
    input: InputArgs,
    graph: GraphArgs,
    table: String,
    output: Option<PathBuf>,
    format: Option<String>,
) -> anyhow::Result<()> {
    let config = RenderYamlConfig::load_optional(input.config.as_deref())?;

    let format = if let Some(ref f) = format {
        f.parse().map_err(|e: String| anyhow::anyhow!(e))?
    } else if let Some(ref out) = output {
        out.extension()
            .and_then(|e| e.to_str())
            .and_then(OutputFormat::from_extension)
            .unwrap_or(OutputFormat::Dot)
    } else {
        OutputFormat::Dot
    };

    if format.is_rendered() && output.is_none() {
        bail!(
            "format '{}' is an image and needs --output; use dot, mermaid or json for stdout",
            format
        );
    }

    let style = graph.style(&config)?;
    let options = graph.traversal_options(&config);
    let (index, _) = input.load(&config)?;

    let root = TableId::new(table.trim());
    if !index.contains(root.as_str()) {
        tracing::warn!("{} does not appear in the dependency data", root);
    }

    let lineage = traverse_with(&root, &index, &options);
    let content = encode(&lineage, format, &style)?;

    match output {
        Some(ref out_path) if format.is_rendered() => {
            graphviz::render(&graph.dot_command(&config), &content, format, out_path)?;
            eprintln!("Rendered to: {}", out_path.display());
        }
        Some(ref out_path) => {
            fs::write(out_path, content.as_bytes())
                .with_context(|| format!("failed to write {}", out_path.display()))?;
            eprintln!("Lineage written to: {}", out_path.display());
        }
        None => print!("{}", content),
    }

    if !matches!(format, OutputFormat::Json) {
        eprintln!(
            "\nLineage of {}: {} tables, {} edges",
            lineage.root,
            lineage.node_count(),
            lineage.edge_count()
        );
    }

    Ok(())
}

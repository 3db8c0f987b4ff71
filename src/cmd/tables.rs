//! Tables command: list every table with its direct neighbor counts.

use super::InputArgs;
use crate::config::RenderYamlConfig;
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Serialize, JsonSchema)]
pub(crate) struct TablesJsonOutput {
    table_count: usize,
    edge_count: usize,
    tables: Vec<TableEntry>,
}

#[derive(Serialize, JsonSchema)]
pub(crate) struct TableEntry {
    name: String,
    downstream: usize,
    upstream: usize,
}

pub fn run(input: InputArgs, json: bool) -> anyhow::Result<()> {
    let config = RenderYamlConfig::load_optional(input.config.as_deref())?;
    let (index, _) = input.load(&config)?;

    let entries: Vec<TableEntry> = index
        .tables()
        .into_iter()
        .map(|t| TableEntry {
            name: t.to_string(),
            downstream: index.downstream_of(t.as_str()).len(),
            upstream: index.upstream_of(t.as_str()).len(),
        })
        .collect();

    if json {
        let output = TablesJsonOutput {
            table_count: index.len(),
            edge_count: index.edge_count(),
            tables: entries,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No tables found.");
        return Ok(());
    }

    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0).max(5);
    println!("{:<width$}  {:>10}  {:>8}", "TABLE", "DOWNSTREAM", "UPSTREAM");
    for entry in &entries {
        println!(
            "{:<width$}  {:>10}  {:>8}",
            entry.name, entry.downstream, entry.upstream
        );
    }
    println!(
        "\n{} tables, {} edges",
        index.len(),
        index.edge_count()
    );

    Ok(())
}

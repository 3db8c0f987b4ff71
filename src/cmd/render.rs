//! Render command: one diagram per table.

use super::glob_util::{split_list, TableFilter};
use super::{GraphArgs, InputArgs};
use crate::config::RenderYamlConfig;
use crate::emit::{Emitter, FileEmitter};
use crate::graph::{traverse_with, OutputFormat};
use crate::table::TableId;
use anyhow::bail;
use indicatif::{ProgressBar, ProgressStyle};
use schemars::JsonSchema;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// JSON summary of a render run
#[derive(Serialize, JsonSchema)]
pub(crate) struct RenderJsonOutput {
    input: String,
    output_dir: String,
    format: String,
    dry_run: bool,
    statistics: RenderStatistics,
    results: Vec<RenderTableResult>,
}

#[derive(Serialize, JsonSchema)]
pub(crate) struct RenderStatistics {
    tables_in_index: usize,
    edges_in_index: usize,
    tables_selected: usize,
    succeeded: usize,
    failed: usize,
    elapsed_secs: f64,
}

#[derive(Serialize, JsonSchema)]
pub(crate) struct RenderTableResult {
    table: String,
    nodes: usize,
    edges: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    artifact: Option<String>,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Outcome counters across all rendered tables
#[derive(Debug, Default)]
pub struct RenderResult {
    pub total_tables: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<(TableId, String)>,
}

impl RenderResult {
    pub fn new(total_tables: usize) -> Self {
        Self {
            total_tables,
            ..Self::default()
        }
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, table: TableId, error: String) {
        self.failed += 1;
        self.errors.push((table, error));
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    input: InputArgs,
    graph: GraphArgs,
    output: PathBuf,
    format: Option<String>,
    tables: Option<String>,
    exclude: Option<String>,
    keep_source: bool,
    progress: bool,
    fail_fast: bool,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let config = RenderYamlConfig::load_optional(input.config.as_deref())?;

    let format = match format {
        Some(f) => f.parse().map_err(|e: String| anyhow::anyhow!(e))?,
        None => config.output.format.unwrap_or(OutputFormat::Png),
    };
    let style = graph.style(&config)?;
    let options = graph.traversal_options(&config);
    let keep_source = keep_source || config.output.keep_source;

    let include = match tables.as_deref() {
        Some(t) => split_list(Some(t)),
        None => config.tables.include.clone(),
    };
    let mut exclude_patterns = config.tables.exclude.clone();
    exclude_patterns.extend(split_list(exclude.as_deref()));
    let filter = TableFilter::new(&include, &exclude_patterns)?;

    let start_time = Instant::now();
    let (index, stats) = input.load(&config)?;

    if index.is_empty() {
        if json {
            let output_json = RenderJsonOutput {
                input: input.file.display().to_string(),
                output_dir: output.display().to_string(),
                format: format.to_string(),
                dry_run,
                statistics: RenderStatistics {
                    tables_in_index: 0,
                    edges_in_index: 0,
                    tables_selected: 0,
                    succeeded: 0,
                    failed: 0,
                    elapsed_secs: start_time.elapsed().as_secs_f64(),
                },
                results: Vec::new(),
            };
            println!("{}", serde_json::to_string_pretty(&output_json)?);
        } else {
            eprintln!("No tables found in {}.", input.file.display());
        }
        return Ok(());
    }

    let roots = filter.select(&index);
    if !json {
        println!(
            "Loaded {} tables and {} edges from {} file(s) ({} rows, {} without downstream deps)",
            index.len(),
            index.edge_count(),
            stats.files,
            stats.rows,
            stats.rows_without_deps
        );
        if dry_run {
            println!("Dry run: would render {} diagrams", roots.len());
        } else {
            println!(
                "Rendering {} diagrams as {} into {}",
                roots.len(),
                format,
                output.display()
            );
        }
        println!();
    }

    let mut emitter = FileEmitter::new(output.clone())
        .with_format(format)
        .with_style(style)
        .with_keep_source(keep_source)
        .with_dot_command(graph.dot_command(&config));

    if !dry_run && !roots.is_empty() {
        emitter.ensure_output_dir()?;
    }

    let pb = if progress && !json {
        let pb = ProgressBar::new(roots.len() as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )?
            .progress_chars("█▓▒░  ")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let mut result = RenderResult::new(roots.len());
    let mut json_results = Vec::new();

    for root in &roots {
        tracing::info!("start generating graph for {}.", root);
        let lineage = traverse_with(root, &index, &options);

        if let Some(ref pb) = pb {
            pb.set_message(root.to_string());
        }

        let outcome = if dry_run {
            Ok(emitter.claim_artifact_path(&lineage))
        } else {
            emitter.emit(&lineage)
        };

        let (artifact, status, error) = match outcome {
            Ok(path) => {
                tracing::info!("successfully generated graph for {}.", root);
                result.record_success();
                (Some(path.display().to_string()), "success", None)
            }
            Err(e) => {
                if fail_fast {
                    if let Some(ref pb) = pb {
                        pb.abandon();
                    }
                    return Err(e.context(format!("failed to render graph for {}", root)));
                }
                let message = format!("{:#}", e);
                tracing::warn!("failed to render graph for {}: {}", root, message);
                result.record_failure((*root).clone(), message.clone());
                (None, "failed", Some(message))
            }
        };

        json_results.push(RenderTableResult {
            table: root.to_string(),
            nodes: lineage.node_count(),
            edges: lineage.edge_count(),
            artifact,
            status: status.to_string(),
            error,
        });

        if let Some(ref pb) = pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let elapsed = start_time.elapsed();

    if json {
        let output_json = RenderJsonOutput {
            input: input.file.display().to_string(),
            output_dir: output.display().to_string(),
            format: format.to_string(),
            dry_run,
            statistics: RenderStatistics {
                tables_in_index: index.len(),
                edges_in_index: index.edge_count(),
                tables_selected: result.total_tables,
                succeeded: result.succeeded,
                failed: result.failed,
                elapsed_secs: elapsed.as_secs_f64(),
            },
            results: json_results,
        };
        println!("{}", serde_json::to_string_pretty(&output_json)?);
    } else {
        if dry_run {
            println!("✓ Dry run completed!");
            println!("\nWould create {} files:", result.total_tables);
            for r in &json_results {
                if let Some(ref artifact) = r.artifact {
                    println!("  - {}", artifact);
                }
            }
        } else if !result.has_failures() {
            println!("✓ Rendered {} diagrams", result.succeeded);
        } else {
            println!(
                "Rendered {} of {} diagrams ({} failed)",
                result.succeeded, result.total_tables, result.failed
            );
            println!("\nFailures:");
            for (table, error) in &result.errors {
                println!("  - {}: {}", table, error);
            }
        }
        println!("  Elapsed time: {:.3?}", elapsed);
    }

    if result.has_failures() {
        bail!(
            "{} of {} diagrams failed to render",
            result.failed,
            result.total_tables
        );
    }

    Ok(())
}

mod glob_util;
pub(crate) mod lineage;
pub(crate) mod render;
mod schema;
pub(crate) mod tables;

use crate::config::RenderYamlConfig;
use crate::emit::DEFAULT_DOT_COMMAND;
use crate::graph::format::{check_root_color, DEFAULT_ROOT_COLOR};
use crate::graph::{DiagramStyle, EdgeIndex, Layout, TraversalOptions, VisitedMode};
use crate::ingest::{load_index, IngestConfig, IngestStats};
use anyhow::bail;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

use glob_util::expand_file_pattern;

#[derive(Parser)]
#[command(name = "table-dep-graph")]
#[command(version)]
#[command(
    about = "Render upstream and downstream dependency diagrams for data tables",
    long_about = None
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where dependencies are read from
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Dependency CSV file or glob pattern (e.g., exports/*.csv)
    /// Supports .gz, .bz2, .xz, .zst compression
    pub file: PathBuf,

    /// YAML config file with defaults for any option
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Separator between entries of DOWNSTREAM_DEPS (default: ',')
    #[arg(long)]
    pub dependency_delimiter: Option<char>,

    /// CSV field separator (default: ',')
    #[arg(long)]
    pub csv_delimiter: Option<char>,
}

/// How a lineage is traversed and drawn
#[derive(Args, Debug, Clone, Default)]
pub struct GraphArgs {
    /// Layout direction: lr or tb
    #[arg(long)]
    pub layout: Option<String>,

    /// Color of the root table's node (default: purple)
    #[arg(long)]
    pub root_color: Option<String>,

    /// Stop expanding tables this many hops away from the root
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Track visited tables separately per direction, so a table both
    /// upstream and downstream of the root gets both edges
    #[arg(long)]
    pub independent_phases: bool,

    /// Graphviz executable used for png/svg/pdf (default: dot)
    #[arg(long)]
    pub dot_command: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render one dependency diagram per table into a directory
    Render {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        graph: GraphArgs,

        /// Output directory for diagrams
        #[arg(short, long, default_value = "graphs")]
        output: PathBuf,

        /// Output format: png, svg, pdf, dot, mermaid, json (default: png)
        #[arg(short, long)]
        format: Option<String>,

        /// Only render specific tables (comma-separated glob patterns)
        #[arg(short, long)]
        tables: Option<String>,

        /// Skip specific tables (comma-separated glob patterns)
        #[arg(short, long)]
        exclude: Option<String>,

        /// Keep the DOT source next to rendered images
        #[arg(long)]
        keep_source: bool,

        /// Show progress during rendering
        #[arg(short, long)]
        progress: bool,

        /// Stop on the first table that fails to render
        #[arg(long)]
        fail_fast: bool,

        /// Preview without writing files (dry run)
        #[arg(long)]
        dry_run: bool,

        /// Output the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the dependency diagram of a single table
    Lineage {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        graph: GraphArgs,

        /// Root table identifier (cluster.schema.table)
        #[arg(long)]
        table: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: dot, mermaid, json, png, svg, pdf
        /// (default: from output extension, else dot)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// List tables with their direct dependency counts
    Tables {
        #[command(flatten)]
        input: InputArgs,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print JSON schemas of the --json / json format outputs
    Schema {
        /// Only print the schema for this output (lineage, render, tables)
        name: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Render {
            input,
            graph,
            output,
            format,
            tables,
            exclude,
            keep_source,
            progress,
            fail_fast,
            dry_run,
            json,
        } => render::run(
            input,
            graph,
            output,
            format,
            tables,
            exclude,
            keep_source,
            progress,
            fail_fast,
            dry_run,
            json,
        ),
        Commands::Lineage {
            input,
            graph,
            table,
            output,
            format,
        } => lineage::run(input, graph, table, output, format),
        Commands::Tables { input, json } => tables::run(input, json),
        Commands::Schema { name } => schema::run(name),
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "table-dep-graph",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}

impl InputArgs {
    /// Parsing settings, CLI flags first, then config file, then defaults
    fn ingest_config(&self, config: &RenderYamlConfig) -> anyhow::Result<IngestConfig> {
        let defaults = IngestConfig::default();
        let csv_delimiter = match self.csv_delimiter.or(config.input.csv_delimiter) {
            Some(c) if c.is_ascii() => c as u8,
            Some(c) => bail!("CSV delimiter must be a single ASCII character, got '{}'", c),
            None => defaults.csv_delimiter,
        };

        Ok(IngestConfig {
            dependency_delimiter: self
                .dependency_delimiter
                .or(config.input.dependency_delimiter)
                .unwrap_or(defaults.dependency_delimiter),
            csv_delimiter,
        })
    }

    /// Expand the input pattern and build the complete index
    fn load(&self, config: &RenderYamlConfig) -> anyhow::Result<(EdgeIndex, IngestStats)> {
        let ingest = self.ingest_config(config)?;
        let expanded = expand_file_pattern(&self.file)?;
        if expanded.pattern_was_glob {
            tracing::info!(
                "merging {} files matching {}",
                expanded.files.len(),
                self.file.display()
            );
        }
        load_index(&expanded.files, &ingest)
    }
}

impl GraphArgs {
    fn traversal_options(&self, config: &RenderYamlConfig) -> TraversalOptions {
        let mode = if self.independent_phases || config.graph.independent_phases {
            VisitedMode::Independent
        } else {
            VisitedMode::Shared
        };

        TraversalOptions {
            mode,
            max_depth: self.max_depth.or(config.graph.max_depth),
        }
    }

    fn style(&self, config: &RenderYamlConfig) -> anyhow::Result<DiagramStyle> {
        let layout = match &self.layout {
            Some(l) => l.parse().map_err(|e: String| anyhow::anyhow!(e))?,
            None => config.output.layout.unwrap_or(Layout::LR),
        };
        let root_color = self
            .root_color
            .clone()
            .or_else(|| config.graph.root_color.clone())
            .unwrap_or_else(|| DEFAULT_ROOT_COLOR.to_string());
        check_root_color(&root_color).map_err(|e| anyhow::anyhow!(e))?;

        Ok(DiagramStyle { layout, root_color })
    }

    fn dot_command(&self, config: &RenderYamlConfig) -> String {
        self.dot_command
            .clone()
            .or_else(|| config.graphviz.command.clone())
            .unwrap_or_else(|| DEFAULT_DOT_COMMAND.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> InputArgs {
        InputArgs {
            file: PathBuf::from("deps.csv"),
            config: None,
            dependency_delimiter: None,
            csv_delimiter: None,
        }
    }

    #[test]
    fn test_cli_flags_override_config() {
        let config = RenderYamlConfig::parse(
            "input:\n  dependency_delimiter: \"|\"\n  csv_delimiter: \";\"\ngraph:\n  max_depth: 4\n",
        )
        .unwrap();

        let mut args = input();
        args.csv_delimiter = Some('\t');
        let ingest = args.ingest_config(&config).unwrap();
        assert_eq!(ingest.csv_delimiter, b'\t');
        assert_eq!(ingest.dependency_delimiter, '|');

        let graph = GraphArgs {
            max_depth: Some(1),
            ..Default::default()
        };
        assert_eq!(graph.traversal_options(&config).max_depth, Some(1));
        assert_eq!(
            GraphArgs::default().traversal_options(&config).max_depth,
            Some(4)
        );
    }

    #[test]
    fn test_graph_defaults() {
        let config = RenderYamlConfig::default();
        let graph = GraphArgs::default();

        let style = graph.style(&config).unwrap();
        assert_eq!(style.layout, Layout::LR);
        assert_eq!(style.root_color, "purple");
        assert_eq!(graph.dot_command(&config), "dot");
        assert_eq!(graph.traversal_options(&config).mode, VisitedMode::Shared);
    }

    #[test]
    fn test_invalid_layout() {
        let graph = GraphArgs {
            layout: Some("diagonal".to_string()),
            ..Default::default()
        };
        assert!(graph.style(&RenderYamlConfig::default()).is_err());
    }

    #[test]
    fn test_root_color_flag_rejects_separators() {
        let graph = GraphArgs {
            root_color: Some("red;style t1 fill:blue".to_string()),
            ..Default::default()
        };
        let err = graph.style(&RenderYamlConfig::default()).unwrap_err();
        assert!(err.to_string().contains("root color"));
    }

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }
}

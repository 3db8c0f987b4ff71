//! CLI for generating dependency CSV fixtures.
//!
//! Usage:
//!   gen-fixtures --scale small --seed 42 > fixtures/small.csv
//!   gen-fixtures --layers 8 --tables-per-layer 40 --back-edges 3 -o deps.csv

use clap::Parser;
use std::fs::File;
use std::io;
use test_data_gen::{write_csv, Generator, Scale};

#[derive(Parser, Debug)]
#[command(name = "gen-fixtures")]
#[command(about = "Generate dependency CSV fixtures for table-dep-graph", long_about = None)]
struct Args {
    /// Scale preset: small, medium, large
    #[arg(short, long, default_value = "small")]
    scale: String,

    /// Random seed for reproducibility
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Override the number of layers
    #[arg(long)]
    layers: Option<usize>,

    /// Override the number of tables per layer
    #[arg(long)]
    tables_per_layer: Option<usize>,

    /// Override the maximum downstream deps per table
    #[arg(long)]
    max_fan_out: Option<usize>,

    /// Override the number of edges pointing back to earlier layers
    #[arg(long)]
    back_edges: Option<usize>,

    /// Override the number of isolated tables
    #[arg(long)]
    isolated: Option<usize>,

    /// Leave out rows for leaf tables so they only appear as dependency targets
    #[arg(long)]
    omit_leaf_rows: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let scale: Scale = args.scale.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let mut config = scale.config(args.seed);
    if let Some(layers) = args.layers {
        config.layers = layers;
    }
    if let Some(n) = args.tables_per_layer {
        config.tables_per_layer = n;
    }
    if let Some(n) = args.max_fan_out {
        config.max_fan_out = n;
    }
    if let Some(n) = args.back_edges {
        config.back_edges = n;
    }
    if let Some(n) = args.isolated {
        config.isolated_tables = n;
    }
    config.omit_leaf_rows = args.omit_leaf_rows;

    let rows = Generator::new(config).generate();

    if let Some(ref path) = args.output {
        let file = File::create(path)?;
        write_csv(&rows, file)?;
        eprintln!("Generated {} rows to {}", rows.len(), path);
    } else {
        write_csv(&rows, io::stdout().lock())?;
    }

    Ok(())
}

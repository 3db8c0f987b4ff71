//! Dependency row generator.
//!
//! Tables are arranged in layers. Edges normally point from a layer to a
//! later one, so the relation is a DAG unless back edges are requested.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;
use std::io::Write;

/// Generation scale presets
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// 20 tables in 4 layers
    Small,
    /// 500 tables in 10 layers
    Medium,
    /// 5,000 tables in 20 layers
    Large,
}

impl Scale {
    pub fn config(&self, seed: u64) -> GeneratorConfig {
        let (layers, tables_per_layer, max_fan_out, isolated_tables, back_edges) = match self {
            Scale::Small => (4, 5, 3, 2, 0),
            Scale::Medium => (10, 50, 4, 20, 5),
            Scale::Large => (20, 250, 5, 100, 25),
        };

        GeneratorConfig {
            clusters: vec!["prod".to_string(), "analytics".to_string()],
            schemas_per_cluster: 3,
            layers,
            tables_per_layer,
            max_fan_out,
            isolated_tables,
            back_edges,
            omit_leaf_rows: false,
            seed,
        }
    }
}

impl std::str::FromStr for Scale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(Scale::Small),
            "medium" => Ok(Scale::Medium),
            "large" => Ok(Scale::Large),
            _ => Err(format!(
                "Unknown scale: {}. Valid options: small, medium, large",
                s
            )),
        }
    }
}

/// Shape of the generated dependency data
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub clusters: Vec<String>,
    pub schemas_per_cluster: usize,
    pub layers: usize,
    pub tables_per_layer: usize,
    /// Upper bound on downstream deps per table
    pub max_fan_out: usize,
    /// Tables with no edges at all
    pub isolated_tables: usize,
    /// Edges from a later layer back to an earlier one (creates cycles)
    pub back_edges: usize,
    /// Leave out rows for last-layer tables so they appear only as targets
    pub omit_leaf_rows: bool,
    pub seed: u64,
}

/// One CSV row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureRow {
    pub cluster: String,
    pub schema: String,
    pub table_name: String,
    pub downstream: Vec<String>,
}

impl FixtureRow {
    /// Fully qualified identifier, `cluster.schema.table`
    pub fn table_id(&self) -> String {
        format!("{}.{}.{}", self.cluster, self.schema, self.table_name)
    }
}

pub struct Generator {
    config: GeneratorConfig,
    rng: ChaCha8Rng,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    pub fn with_scale(seed: u64, scale: Scale) -> Self {
        Self::new(scale.config(seed))
    }

    pub fn generate(&mut self) -> Vec<FixtureRow> {
        let layers = self.config.layers.max(1);
        let per_layer = self.config.tables_per_layer.max(1);

        let mut grid: Vec<Vec<FixtureRow>> = Vec::with_capacity(layers);
        for layer in 0..layers {
            let row_layer = (0..per_layer)
                .map(|t| self.new_row(format!("l{}_t{}", layer, t)))
                .collect();
            grid.push(row_layer);
        }

        let ids: Vec<Vec<String>> = grid
            .iter()
            .map(|layer| layer.iter().map(FixtureRow::table_id).collect())
            .collect();

        for layer in 0..layers.saturating_sub(1) {
            for t in 0..per_layer {
                let fan_out = self.rng.random_range(0..=self.config.max_fan_out);
                let mut targets = BTreeSet::new();
                for _ in 0..fan_out {
                    let target_layer = self.rng.random_range(layer + 1..layers);
                    let target = self.rng.random_range(0..per_layer);
                    targets.insert(ids[target_layer][target].clone());
                }
                grid[layer][t].downstream = targets.into_iter().collect();
            }
        }

        if layers > 1 {
            for _ in 0..self.config.back_edges {
                let from_layer = self.rng.random_range(1..layers);
                let to_layer = self.rng.random_range(0..from_layer);
                let from = self.rng.random_range(0..per_layer);
                let to = ids[to_layer][self.rng.random_range(0..per_layer)].clone();

                let row = &mut grid[from_layer][from];
                if !row.downstream.contains(&to) {
                    row.downstream.push(to);
                }
            }
        }

        let last_layer = layers - 1;
        let mut rows: Vec<FixtureRow> = grid
            .into_iter()
            .enumerate()
            .flat_map(|(layer, rows)| {
                let omit = self.config.omit_leaf_rows && layer == last_layer && layers > 1;
                rows.into_iter()
                    .filter(move |row| !(omit && row.downstream.is_empty()))
            })
            .collect();

        for i in 0..self.config.isolated_tables {
            rows.push(self.new_row(format!("isolated_{}", i)));
        }

        rows
    }

    fn new_row(&mut self, table_name: String) -> FixtureRow {
        let cluster = if self.config.clusters.is_empty() {
            "default".to_string()
        } else {
            self.config.clusters[self.rng.random_range(0..self.config.clusters.len())].clone()
        };
        let schema = format!(
            "schema{}",
            self.rng
                .random_range(0..self.config.schemas_per_cluster.max(1))
        );

        FixtureRow {
            cluster,
            schema,
            table_name,
            downstream: Vec::new(),
        }
    }
}

/// Write rows as a dependency CSV
pub fn write_csv<W: Write>(rows: &[FixtureRow], writer: W) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["CLUSTER", "SCHEMA", "TABLE_NAME", "DOWNSTREAM_DEPS"])?;
    for row in rows {
        let deps = row.downstream.join(",");
        csv_writer.write_record([
            row.cluster.as_str(),
            row.schema.as_str(),
            row.table_name.as_str(),
            deps.as_str(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Render rows to a CSV string
pub fn render_csv(rows: &[FixtureRow]) -> String {
    let mut buf = Vec::new();
    // Writing to a Vec cannot fail
    let _ = write_csv(rows, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

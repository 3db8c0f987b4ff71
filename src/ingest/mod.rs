//! Reading declared dependencies from CSV exports.
//!
//! Each row names a table through `CLUSTER`, `SCHEMA` and `TABLE_NAME` and
//! lists its immediate downstream tables in `DOWNSTREAM_DEPS`. Dependency
//! entries are already fully qualified identifiers.

mod compression;

pub use compression::Compression;

use crate::graph::EdgeIndex;
use crate::table::TableId;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// Columns every dependency export must have
pub const REQUIRED_COLUMNS: [&str; 4] = ["CLUSTER", "SCHEMA", "TABLE_NAME", "DOWNSTREAM_DEPS"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parsing settings for dependency exports
#[derive(Debug, Clone, Copy)]
pub struct IngestConfig {
    /// Separator between entries of `DOWNSTREAM_DEPS`
    pub dependency_delimiter: char,
    /// CSV field separator
    pub csv_delimiter: u8,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            dependency_delimiter: ',',
            csv_delimiter: b',',
        }
    }
}

#[derive(Debug, Deserialize)]
struct DependencyRow {
    #[serde(rename = "CLUSTER")]
    cluster: String,
    #[serde(rename = "SCHEMA")]
    schema: String,
    #[serde(rename = "TABLE_NAME")]
    table_name: String,
    #[serde(rename = "DOWNSTREAM_DEPS")]
    downstream_deps: String,
}

/// One table and the tables it feeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDeps {
    pub table: TableId,
    pub downstream: Vec<TableId>,
}

/// Counters collected while loading exports
#[derive(Debug, Default, Clone)]
pub struct IngestStats {
    pub files: usize,
    pub rows: usize,
    pub rows_without_deps: usize,
}

/// Parse dependency rows from any reader
pub fn read_dependencies<R: Read>(reader: R, config: &IngestConfig) -> Result<Vec<TableDeps>> {
    let mut reader = BufReader::new(reader);
    skip_bom(&mut reader)?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(config.csv_delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            bail!("missing required column: {}", column);
        }
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: DependencyRow = record
            .deserialize(Some(&headers))
            .with_context(|| format!("invalid row at line {}", line))?;

        for (column, value) in [
            ("CLUSTER", &row.cluster),
            ("SCHEMA", &row.schema),
            ("TABLE_NAME", &row.table_name),
        ] {
            if value.is_empty() {
                bail!("empty {} at line {}", column, line);
            }
        }

        let table = TableId::from_parts(&row.cluster, &row.schema, &row.table_name);
        let downstream = split_deps(&row.downstream_deps, config.dependency_delimiter);
        rows.push(TableDeps { table, downstream });
    }

    Ok(rows)
}

/// Parse one dependency export, decompressing by extension
pub fn read_dependency_file(path: &Path, config: &IngestConfig) -> Result<Vec<TableDeps>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let compression = Compression::from_path(path);
    if compression != Compression::None {
        tracing::debug!("decompressing {} as {}", path.display(), compression);
    }
    let reader = compression.wrap_reader(Box::new(file))?;

    read_dependencies(reader, config).with_context(|| format!("failed to read {}", path.display()))
}

/// Build the complete index from one or more exports.
///
/// Files are merged in the order given; the index is only returned once
/// every file has been read.
pub fn load_index(paths: &[PathBuf], config: &IngestConfig) -> Result<(EdgeIndex, IngestStats)> {
    let mut stats = IngestStats::default();
    let mut all_rows = Vec::new();

    for path in paths {
        let rows = read_dependency_file(path, config)?;
        tracing::info!("read {} rows from {}", rows.len(), path.display());
        stats.files += 1;
        all_rows.extend(rows);
    }

    stats.rows = all_rows.len();
    let index = EdgeIndex::from_rows(all_rows.into_iter().map(|row| {
        if row.downstream.is_empty() {
            tracing::debug!("{} has no downstream deps.", row.table);
            stats.rows_without_deps += 1;
        }
        (row.table, row.downstream)
    }));

    Ok((index, stats))
}

fn split_deps(field: &str, delimiter: char) -> Vec<TableId> {
    field
        .split(delimiter)
        .map(str::trim)
        .filter(|dep| !dep.is_empty())
        .map(TableId::from)
        .collect()
}

fn skip_bom<R: Read>(reader: &mut BufReader<R>) -> Result<()> {
    if reader.fill_buf()?.starts_with(UTF8_BOM) {
        reader.consume(UTF8_BOM.len());
    }
    Ok(())
}

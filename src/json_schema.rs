//! JSON Schema generation for CLI output types.
//!
//! Schemas are generated using the schemars crate and exported via the
//! `schema` subcommand.

use schemars::{schema_for, Schema};
use std::collections::BTreeMap;

/// Returns all JSON schemas for outputs that can be emitted as JSON.
/// Uses BTreeMap for deterministic ordering (important for diffable output).
pub fn all_schemas() -> BTreeMap<&'static str, Schema> {
    let mut schemas = BTreeMap::new();

    // lineage command and the json render format
    schemas.insert(
        "lineage",
        schema_for!(crate::graph::format::json::LineageJson),
    );

    // render --json summary
    schemas.insert("render", schema_for!(crate::cmd::render::RenderJsonOutput));

    // tables --json
    schemas.insert("tables", schema_for!(crate::cmd::tables::TablesJsonOutput));

    schemas
}

/// Generate a single schema by name.
pub fn get_schema(name: &str) -> Option<Schema> {
    all_schemas().remove(name)
}

/// List all available schema names.
pub fn schema_names() -> Vec<&'static str> {
    all_schemas().keys().copied().collect()
}

//! Schema command: print JSON schemas of JSON outputs.

use crate::json_schema::{all_schemas, get_schema, schema_names};
use anyhow::bail;

pub fn run(name: Option<String>) -> anyhow::Result<()> {
    match name {
        Some(name) => {
            let Some(schema) = get_schema(&name) else {
                bail!(
                    "Unknown schema: {}. Valid options: {}",
                    name,
                    schema_names().join(", ")
                );
            };
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&all_schemas())?);
        }
    }
    Ok(())
}

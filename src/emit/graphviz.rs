//! Rendering DOT sources to images with the Graphviz `dot` executable.

use crate::graph::OutputFormat;
use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::Path;
use std::process::Command;

/// Default Graphviz executable
pub const DEFAULT_DOT_COMMAND: &str = "dot";

/// Render `dot_source` to `output_path` in an image `format`.
///
/// The source is written to an intermediate file next to the output and
/// removed once the command has finished, whether it succeeded or not.
pub fn render(command: &str, dot_source: &str, format: OutputFormat, output_path: &Path) -> Result<()> {
    if !format.is_rendered() {
        bail!("format '{}' is not rendered by Graphviz", format);
    }

    let dir = match output_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut source = tempfile::Builder::new()
        .prefix(".lineage-")
        .suffix(".dot")
        .tempfile_in(dir)
        .with_context(|| format!("failed to create intermediate file in {}", dir.display()))?;
    source.write_all(dot_source.as_bytes())?;
    source.flush()?;

    let output = Command::new(command)
        .arg(format!("-T{}", format.extension()))
        .arg("-o")
        .arg(output_path)
        .arg(source.path())
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!(
                    "Graphviz '{}' command not found. Install Graphviz or use --format dot instead.",
                    command
                )
            } else {
                anyhow::anyhow!("Failed to run {}: {}", command, e)
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "Graphviz {} command failed with status {}: {}",
            command,
            output.status,
            stderr.trim()
        );
    }

    Ok(())
}

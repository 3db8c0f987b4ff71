//! YAML configuration for the render and lineage commands.
//!
//! Every field is optional. Command-line flags take precedence over values
//! read from the file.

use crate::graph::format::check_root_color;
use crate::graph::{Layout, OutputFormat};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Artifact settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
    pub layout: Option<Layout>,
    /// Keep the DOT source next to rendered images
    pub keep_source: bool,
}

/// Traversal and styling settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphConfig {
    pub root_color: Option<String>,
    pub independent_phases: bool,
    pub max_depth: Option<usize>,
}

/// Input parsing settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub dependency_delimiter: Option<char>,
    pub csv_delimiter: Option<char>,
}

/// Which tables get a diagram
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TablesConfig {
    /// Glob patterns of tables to render
    pub include: Vec<String>,
    /// Glob patterns of tables to skip
    pub exclude: Vec<String>,
}

/// Graphviz invocation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphvizConfig {
    /// Executable used to render images, `dot` when unset
    pub command: Option<String>,
}

/// Complete YAML configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderYamlConfig {
    pub output: OutputConfig,
    pub graph: GraphConfig,
    pub input: InputConfig,
    pub tables: TablesConfig,
    pub graphviz: GraphvizConfig,
}

impl RenderYamlConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = serde_yaml_ng::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an optional path, falling back to defaults
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if let Some(c) = self.input.csv_delimiter {
            if !c.is_ascii() {
                bail!("input.csv_delimiter must be a single ASCII character, got '{}'", c);
            }
        }
        if let Some(color) = &self.graph.root_color {
            if let Err(e) = check_root_color(color) {
                bail!("graph.root_color: {}", e);
            }
        }
        Ok(())
    }
}

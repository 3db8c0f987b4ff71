//! Output format implementations for lineage diagrams.

mod dot;
pub(crate) mod json;
mod mermaid;

pub use dot::to_dot;
pub use json::to_json;
pub use mermaid::to_mermaid;
#[allow(unused_imports)]
pub use json::{EdgeJson, LineageJson, LineageStats, NodeJson};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default fill color of the root node
pub const DEFAULT_ROOT_COLOR: &str = "purple";

/// Artifact format for a lineage diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PNG image rendered by Graphviz
    #[default]
    Png,
    /// SVG image rendered by Graphviz
    Svg,
    /// PDF document rendered by Graphviz
    Pdf,
    /// Graphviz DOT source
    Dot,
    /// Mermaid flowchart
    Mermaid,
    /// JSON for programmatic use
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "svg" => Ok(OutputFormat::Svg),
            "pdf" => Ok(OutputFormat::Pdf),
            "dot" | "graphviz" | "gv" => Ok(OutputFormat::Dot),
            "mermaid" | "mmd" => Ok(OutputFormat::Mermaid),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown format: {}. Valid options: png, svg, pdf, dot, mermaid, json",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Png => write!(f, "png"),
            OutputFormat::Svg => write!(f, "svg"),
            OutputFormat::Pdf => write!(f, "pdf"),
            OutputFormat::Dot => write!(f, "dot"),
            OutputFormat::Mermaid => write!(f, "mermaid"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl OutputFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Dot => "dot",
            OutputFormat::Mermaid => "mmd",
            OutputFormat::Json => "json",
        }
    }

    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(OutputFormat::Png),
            "svg" => Some(OutputFormat::Svg),
            "pdf" => Some(OutputFormat::Pdf),
            "dot" | "gv" => Some(OutputFormat::Dot),
            "mmd" | "mermaid" => Some(OutputFormat::Mermaid),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    /// Whether this format needs the Graphviz `dot` executable
    pub fn is_rendered(&self) -> bool {
        matches!(
            self,
            OutputFormat::Png | OutputFormat::Svg | OutputFormat::Pdf
        )
    }
}

/// Layout direction for diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Left to right
    #[default]
    LR,
    /// Top to bottom
    TB,
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lr" | "left-right" | "horizontal" => Ok(Layout::LR),
            "tb" | "td" | "top-bottom" | "top-down" | "vertical" => Ok(Layout::TB),
            _ => Err(format!("Unknown layout: {}. Valid options: lr, tb", s)),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::LR => write!(f, "lr"),
            Layout::TB => write!(f, "tb"),
        }
    }
}

/// Presentation settings shared by the DOT and Mermaid encoders
#[derive(Debug, Clone)]
pub struct DiagramStyle {
    pub layout: Layout,
    /// Graphviz/Mermaid color for the root node
    pub root_color: String,
}

impl Default for DiagramStyle {
    fn default() -> Self {
        Self {
            layout: Layout::LR,
            root_color: DEFAULT_ROOT_COLOR.to_string(),
        }
    }
}

/// Check that a root color fits unquoted into a Mermaid `style` line
pub fn check_root_color(color: &str) -> Result<(), String> {
    if color.trim().is_empty() {
        return Err("root color must not be empty".to_string());
    }
    if let Some(c) = color
        .chars()
        .find(|c| matches!(c, ',' | ';' | '"') || c.is_control())
    {
        return Err(format!(
            "root color must not contain {:?}, got {:?}",
            c, color
        ));
    }
    Ok(())
}

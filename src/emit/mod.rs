//! Writing one diagram artifact per root table.

pub mod graphviz;

use crate::graph::{to_dot, to_json, to_mermaid, DiagramStyle, Lineage, OutputFormat};
use ahash::AHashSet;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub use graphviz::DEFAULT_DOT_COMMAND;

/// Consumer of traversal results
pub trait Emitter {
    /// Persist a diagram for `lineage` and return where it was written
    fn emit(&mut self, lineage: &Lineage) -> Result<PathBuf>;
}

/// Encode a lineage in a text format.
///
/// Image formats are encoded as their DOT source.
pub fn encode(lineage: &Lineage, format: OutputFormat, style: &DiagramStyle) -> Result<String> {
    Ok(match format {
        OutputFormat::Mermaid => to_mermaid(lineage, style),
        OutputFormat::Json => to_json(lineage)
            .with_context(|| format!("failed to encode lineage of {} as JSON", lineage.root))?,
        OutputFormat::Dot | OutputFormat::Png | OutputFormat::Svg | OutputFormat::Pdf => {
            to_dot(lineage, style)
        }
    })
}

/// Writes `<output_dir>/<root>.<ext>` for every lineage.
///
/// Roots whose sanitized names collide get a `~N` suffix, so no artifact
/// overwrites another within one emitter.
#[derive(Debug, Clone)]
pub struct FileEmitter {
    output_dir: PathBuf,
    format: OutputFormat,
    style: DiagramStyle,
    keep_source: bool,
    dot_command: String,
    claimed_stems: AHashSet<String>,
}

impl FileEmitter {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            format: OutputFormat::default(),
            style: DiagramStyle::default(),
            keep_source: false,
            dot_command: DEFAULT_DOT_COMMAND.to_string(),
            claimed_stems: AHashSet::new(),
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_style(mut self, style: DiagramStyle) -> Self {
        self.style = style;
        self
    }

    /// Keep `<root>.dot` next to rendered images
    pub fn with_keep_source(mut self, keep_source: bool) -> Self {
        self.keep_source = keep_source;
        self
    }

    pub fn with_dot_command(mut self, command: impl Into<String>) -> Self {
        self.dot_command = command.into();
        self
    }

    /// Reserve the artifact path for `lineage`.
    ///
    /// Each call claims a new file name; a root whose name is already taken
    /// gets the first free `<stem>~N`.
    pub fn claim_artifact_path(&mut self, lineage: &Lineage) -> PathBuf {
        let base = lineage.root.file_stem();
        let mut stem = base.clone();
        let mut n = 1;
        while !self.claimed_stems.insert(stem.clone()) {
            n += 1;
            stem = format!("{}~{}", base, n);
        }
        if n > 1 {
            tracing::warn!(
                "file name {} for {} is already taken, writing {} instead",
                base,
                lineage.root,
                stem
            );
        }

        self.output_dir
            .join(format!("{}.{}", stem, self.format.extension()))
    }

    pub fn ensure_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "failed to create output directory {}",
                self.output_dir.display()
            )
        })
    }
}

impl Emitter for FileEmitter {
    fn emit(&mut self, lineage: &Lineage) -> Result<PathBuf> {
        let path = self.claim_artifact_path(lineage);
        let content = encode(lineage, self.format, &self.style)?;

        if self.format.is_rendered() {
            if self.keep_source {
                let source_path = path.with_extension(OutputFormat::Dot.extension());
                fs::write(&source_path, &content)
                    .with_context(|| format!("failed to write {}", source_path.display()))?;
            }
            graphviz::render(&self.dot_command, &content, self.format, &path)?;
        } else {
            fs::write(&path, &content)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }

        Ok(path)
    }
}

//! Table lineage graph.
//!
//! This module provides:
//! - The dependency index built from declared downstream edges
//! - Bidirectional traversal from a root table
//! - Output formats: DOT (Graphviz), Mermaid, JSON

pub mod format;
pub mod index;
pub mod traversal;

pub use format::{to_dot, to_json, to_mermaid, DiagramStyle, Layout, OutputFormat};
pub use index::EdgeIndex;
pub use traversal::{
    traverse, traverse_with, Lineage, LineageEdge, TraversalOptions, VisitedMode,
    DOWNSTREAM_LABEL,
};

//! Test data generator for table-dep-graph integration tests.
//!
//! Generates deterministic dependency CSVs with layered tables, optional
//! back edges (cycles), isolated tables and tables that only appear as
//! dependency targets.
//!
//! # Example
//!
//! ```rust
//! use test_data_gen::{render_csv, Generator, Scale};
//!
//! // Generate a small dataset with seed for reproducibility
//! let mut gen = Generator::with_scale(42, Scale::Small);
//! let rows = gen.generate();
//!
//! let csv = render_csv(&rows);
//! assert!(csv.starts_with("CLUSTER,SCHEMA,TABLE_NAME,DOWNSTREAM_DEPS"));
//! ```

pub mod generator;

pub use generator::{render_csv, write_csv, FixtureRow, Generator, GeneratorConfig, Scale};

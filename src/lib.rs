// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

pub mod config;
pub mod emit;
pub mod graph;
pub mod ingest;
pub mod table;

//! Tests for reading dependency exports from disk.

use flate2::write::GzEncoder;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use table_dep_graph::ingest::{load_index, read_dependency_file, IngestConfig};
use tempfile::TempDir;

const HEADER: &str = "CLUSTER,SCHEMA,TABLE_NAME,DOWNSTREAM_DEPS\n";

fn write_csv(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, format!("{}{}", HEADER, body)).unwrap();
    path
}

#[test]
fn test_read_plain_file() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "deps.csv", "prod,raw,events,prod.mart.daily\n");

    let rows = read_dependency_file(&path, &IngestConfig::default()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].table.as_str(), "prod.raw.events");
}

#[test]
fn test_read_file_with_bom() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("excel.csv");
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(HEADER.as_bytes());
    bytes.extend_from_slice(b"c,s,t,\n");
    fs::write(&path, bytes).unwrap();

    let rows = read_dependency_file(&path, &IngestConfig::default()).unwrap();
    assert_eq!(rows[0].table.as_str(), "c.s.t");
}

#[test]
fn test_read_gzip_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deps.csv.gz");

    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(HEADER.as_bytes()).unwrap();
    encoder.write_all(b"c,s,a,\"c.s.b,c.s.c\"\n").unwrap();
    fs::write(&path, encoder.finish().unwrap()).unwrap();

    let rows = read_dependency_file(&path, &IngestConfig::default()).unwrap();
    assert_eq!(rows[0].downstream.len(), 2);
}

#[test]
fn test_read_zstd_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deps.csv.zst");
    let content = format!("{}c,s,a,c.s.b\n", HEADER);
    fs::write(&path, zstd::encode_all(content.as_bytes(), 3).unwrap()).unwrap();

    let rows = read_dependency_file(&path, &IngestConfig::default()).unwrap();
    assert_eq!(rows[0].downstream[0].as_str(), "c.s.b");
}

#[test]
fn test_errors_name_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.csv");
    fs::write(&path, "CLUSTER,SCHEMA\nc,s\n").unwrap();

    let err = read_dependency_file(&path, &IngestConfig::default()).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("broken.csv"));
    assert!(message.contains("TABLE_NAME"));
}

#[test]
fn test_missing_file() {
    let err = read_dependency_file(
        &PathBuf::from("/nonexistent/deps.csv"),
        &IngestConfig::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("failed to open"));
}

#[test]
fn test_load_index_merges_files() {
    let dir = TempDir::new().unwrap();
    let first = write_csv(&dir, "a.csv", "c,s,a,c.s.b\nc,s,lonely,\n");
    let second = write_csv(&dir, "b.csv", "c,s,b,c.s.c\n");

    let (index, stats) = load_index(&[first, second], &IngestConfig::default()).unwrap();

    assert_eq!(stats.files, 2);
    assert_eq!(stats.rows, 3);
    assert_eq!(stats.rows_without_deps, 1);
    assert_eq!(index.len(), 4);
    assert_eq!(index.edge_count(), 2);
    assert!(index.downstream_of("c.s.b").contains("c.s.c"));
    assert!(index.upstream_of("c.s.b").contains("c.s.a"));
}

#[test]
fn test_load_index_stops_on_bad_file() {
    let dir = TempDir::new().unwrap();
    let good = write_csv(&dir, "a.csv", "c,s,a,c.s.b\n");
    let bad = dir.path().join("b.csv");
    fs::write(&bad, format!("{},s,t,\n", HEADER)).unwrap();

    assert!(load_index(&[good, bad], &IngestConfig::default()).is_err());
}

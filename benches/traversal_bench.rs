//! Benchmarks for ingest, traversal and diagram encoding.
//!
//! Tests:
//! - CSV ingest into an edge index at different scales
//! - Traversal of every root in a generated index
//! - Shared vs independent visited sets
//! - DOT and Mermaid encoding of a single lineage

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use table_dep_graph::graph::{
    to_dot, to_mermaid, traverse, traverse_with, DiagramStyle, EdgeIndex, TraversalOptions,
    VisitedMode,
};
use table_dep_graph::ingest::{read_dependencies, IngestConfig};
use test_data_gen::{render_csv, Generator, Scale};

fn generated_csv(scale: Scale) -> String {
    let rows = Generator::with_scale(42, scale).generate();
    render_csv(&rows)
}

fn build_index(csv: &str) -> EdgeIndex {
    let rows = read_dependencies(csv.as_bytes(), &IngestConfig::default()).unwrap();
    EdgeIndex::from_rows(rows.into_iter().map(|r| (r.table, r.downstream)))
}

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");

    for (name, scale) in [
        ("small", Scale::Small),
        ("medium", Scale::Medium),
        ("large", Scale::Large),
    ] {
        let csv = generated_csv(scale);
        group.throughput(Throughput::Bytes(csv.len() as u64));
        group.bench_with_input(BenchmarkId::new("build_index", name), &csv, |b, csv| {
            b.iter(|| black_box(build_index(csv).edge_count()))
        });
    }

    group.finish();
}

fn bench_traverse_all_roots(c: &mut Criterion) {
    let mut group = c.benchmark_group("traverse_all_roots");
    group.sample_size(20);

    for (name, scale) in [("medium", Scale::Medium), ("large", Scale::Large)] {
        let index = build_index(&generated_csv(scale));
        group.throughput(Throughput::Elements(index.len() as u64));
        group.bench_with_input(BenchmarkId::new("shared", name), &index, |b, index| {
            b.iter(|| {
                let mut edges = 0;
                for root in index.tables() {
                    edges += traverse(root, index).edge_count();
                }
                black_box(edges)
            })
        });
    }

    group.finish();
}

fn bench_visited_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("visited_mode");
    let index = build_index(&generated_csv(Scale::Medium));
    let roots: Vec<_> = index.tables().into_iter().take(100).cloned().collect();

    for mode in [VisitedMode::Shared, VisitedMode::Independent] {
        let options = TraversalOptions {
            mode,
            max_depth: None,
        };
        group.bench_function(BenchmarkId::new("mode", mode.to_string()), |b| {
            b.iter(|| {
                for root in &roots {
                    black_box(traverse_with(root, &index, &options).node_count());
                }
            })
        });
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let index = build_index(&generated_csv(Scale::Large));
    let style = DiagramStyle::default();

    let largest = index
        .tables()
        .into_iter()
        .map(|root| traverse(root, &index))
        .max_by_key(|lineage| lineage.edge_count());

    if let Some(lineage) = largest {
        group.throughput(Throughput::Elements(lineage.edge_count() as u64));
        group.bench_function("dot", |b| b.iter(|| black_box(to_dot(&lineage, &style))));
        group.bench_function("mermaid", |b| {
            b.iter(|| black_box(to_mermaid(&lineage, &style)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_ingest,
    bench_traverse_all_roots,
    bench_visited_modes,
    bench_encode
);
criterion_main!(benches);

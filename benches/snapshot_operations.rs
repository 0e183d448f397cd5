//! Benchmark suite for snapshot decoding, caching and scans

use std::fs;
use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use supplygraph::query;
use supplygraph::{decode, Session, SessionConfig, SnapshotDocument, SnapshotSet, TemporalAnalyzer};
use tempfile::TempDir;

/// Parts -> Facility -> ProductOffering chain with `size` parts
fn create_test_document(size: usize) -> Value {
    let facilities = (size / 10).max(1);
    let offerings = (size / 20).max(1);

    let parts: Vec<Value> = (0..size)
        .map(|i| json!([format!("part {}", i), ["bolt", "nut", "gear"][i % 3], (i % 10) as f64 / 10.0, format!("P_{}", i)]))
        .collect();
    let facility_rows: Vec<Value> = (0..facilities)
        .map(|i| json!([format!("plant {}", i), (i * 1000) as f64, format!("F_{}", i)]))
        .collect();
    let offering_rows: Vec<Value> = (0..offerings)
        .map(|i| json!([(i % 200) as f64, (i % 50) as f64, format!("PO_{}", i)]))
        .collect();

    let mut edges: Vec<Value> = (0..size)
        .map(|i| json!(["PartsToFacility", (i % 900) as f64, (i % 400) as f64, format!("P_{}", i), format!("F_{}", i % facilities)]))
        .collect();
    edges.extend(
        (0..facilities).map(|i| json!(["FacilityToProductOfferings", 5, format!("F_{}", i), format!("PO_{}", i % offerings)])),
    );

    json!({
        "directed": true,
        "node_types": {
            "Parts": ["name", "subtype", "importance_factor", "id"],
            "Facility": ["name", "operating_cost", "id"],
            "ProductOffering": ["cost", "demand", "id"]
        },
        "node_values": {
            "Parts": parts,
            "Facility": facility_rows,
            "ProductOffering": offering_rows
        },
        "relationship_types": {
            "PartsToFacility": ["distance", "transport_cost"],
            "FacilityToProductOfferings": ["lead_time"]
        },
        "relationship_values": edges
    })
}

fn write_snapshots(dir: &Path, count: usize, size: usize) {
    let bytes = serde_json::to_vec(&create_test_document(size)).unwrap();
    for t in 0..count {
        fs::write(dir.join(format!("timestamp_{}.json", t)), &bytes).unwrap();
    }
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for size in [100, 1000, 10000] {
        let bytes = serde_json::to_vec(&create_test_document(size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| {
                let document = SnapshotDocument::from_slice(bytes).unwrap();
                black_box(decode(&document).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_cache_hit(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    write_snapshots(dir.path(), 2, 10000);
    let mut session = Session::open(SessionConfig::new(dir.path())).unwrap();
    session.select(0).unwrap();

    c.bench_function("cache_hit", |b| {
        b.iter(|| black_box(session.graph_at(0).unwrap()));
    });
}

fn bench_domain_queries(c: &mut Criterion) {
    let document = SnapshotDocument::from_value(create_test_document(10000)).unwrap();
    let graph = decode(&document).unwrap();

    c.bench_function("parts_for_product_offering", |b| {
        b.iter(|| black_box(query::parts_for_product_offering(&graph, "PO_0")));
    });
    c.bench_function("long_haul_shipments", |b| {
        b.iter(|| black_box(query::long_haul_shipments(&graph, 500.0, 200.0)));
    });
    c.bench_function("ego_graph_radius_2", |b| {
        b.iter(|| black_box(query::ego_graph(&graph, "F_0", 2).unwrap()));
    });
}

fn bench_trend_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("trend_scan");
    group.sample_size(20);

    for count in [5, 20] {
        let dir = TempDir::new().unwrap();
        write_snapshots(dir.path(), count, 1000);
        let set = SnapshotSet::discover(dir.path()).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(count), &set, |b, set| {
            b.iter(|| {
                let analyzer = TemporalAnalyzer::new(set);
                black_box(analyzer.node_attribute_trend("Parts", "importance_factor").unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_cache_hit, bench_domain_queries, bench_trend_scan);
criterion_main!(benches);

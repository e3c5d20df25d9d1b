//! Benchmarks for lineage traversal and documentation propagation
//!
//! A generated project: one documented source feeding a chain of models,
//! each model depending on the previous two.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use docprop_core::Config;
use docprop_dbt::{Catalog, Manifest};
use docprop_engine::{
    analyze_project, propagate_project, traverse_project, ColumnRegistry, RecordingReporter, TracingReporter,
};
use serde_json::{json, Map, Value};

const SOURCE_ID: &str = "source.project.raw.events";

fn manifest_columns(num_columns: usize, documented: bool) -> Value {
    let columns: Map<String, Value> = (0..num_columns)
        .map(|i| {
            // Only every other source column is documented
            let description = if documented && i % 2 == 0 {
                format!("Column {} of the raw events.", i)
            } else {
                String::new()
            };
            (
                format!("col_{}", i),
                json!({"name": format!("col_{}", i), "description": description, "meta": {}, "tags": []}),
            )
        })
        .collect();

    Value::Object(columns)
}

fn catalog_columns(num_columns: usize) -> Value {
    let columns: Map<String, Value> = (0..num_columns)
        .map(|i| {
            let name = format!("COL_{}", i);
            (name.clone(), json!({"name": name, "type": "TEXT", "index": i + 1, "comment": null}))
        })
        .collect();

    Value::Object(columns)
}

/// Generate manifest and catalog JSON with N models of `num_columns` columns
fn generate_project(num_models: usize, num_columns: usize) -> (String, String) {
    let mut manifest_nodes = Map::new();
    let mut catalog_nodes = Map::new();

    for i in 0..num_models {
        let model_id = format!("model.project.model_{}", i);

        let depends_on: Vec<String> = if i == 0 {
            vec![SOURCE_ID.to_string()]
        } else {
            (i.saturating_sub(2)..i)
                .map(|j| format!("model.project.model_{}", j))
                .collect()
        };

        manifest_nodes.insert(
            model_id.clone(),
            json!({
                "unique_id": model_id,
                "resource_type": "model",
                "name": format!("model_{}", i),
                "config": {"enabled": true, "materialized": "table"},
                "depends_on": {"macros": [], "nodes": depends_on},
                "columns": {}
            }),
        );
        catalog_nodes.insert(model_id, json!({"columns": catalog_columns(num_columns)}));
    }

    let manifest = json!({
        "metadata": {"dbt_version": "1.5.0"},
        "nodes": manifest_nodes,
        "sources": {
            SOURCE_ID: {"unique_id": SOURCE_ID, "columns": manifest_columns(num_columns, true)}
        }
    });
    let catalog = json!({
        "nodes": catalog_nodes,
        "sources": {SOURCE_ID: {"columns": catalog_columns(num_columns)}}
    });

    (manifest.to_string(), catalog.to_string())
}

/// Benchmark: build the column registry (100, 500, 1000 models)
fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal");

    for num_models in [100, 500, 1000].iter() {
        let (manifest_json, catalog_json) = generate_project(*num_models, 20);
        let manifest = Manifest::from_str(&manifest_json).unwrap();
        let catalog = Catalog::from_str(&catalog_json).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(num_models), num_models, |b, _| {
            b.iter(|| {
                let mut registry = ColumnRegistry::new();
                traverse_project(&manifest, &catalog, &mut registry, &mut RecordingReporter::new()).unwrap();
                black_box(registry)
            });
        });
    }

    group.finish();
}

/// Benchmark: traversal, resolution and statistics without writing
fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");
    group.sample_size(20);

    for num_models in [50, 200].iter() {
        let (manifest_json, catalog_json) = generate_project(*num_models, 20);
        let manifest = Manifest::from_str(&manifest_json).unwrap();
        let catalog = Catalog::from_str(&catalog_json).unwrap();
        let config = Config::default();

        group.bench_with_input(BenchmarkId::from_parameter(num_models), num_models, |b, _| {
            b.iter(|| black_box(analyze_project(&manifest, &catalog, &config, &mut RecordingReporter::new()).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark: full run including manifest updates and serialization
fn bench_full_run(c: &mut Criterion) {
    let (manifest_json, catalog_json) = generate_project(100, 20);
    let catalog = Catalog::from_str(&catalog_json).unwrap();
    let config = Config::default();

    c.bench_function("propagate_and_serialize_100_models", |b| {
        b.iter(|| {
            let mut manifest = Manifest::from_str(&manifest_json).unwrap();
            propagate_project(&mut manifest, &catalog, &config, &mut TracingReporter).unwrap();
            black_box(manifest.to_json().unwrap())
        });
    });
}

criterion_group!(benches, bench_traversal, bench_analysis, bench_full_run);
criterion_main!(benches);

//! Benchmarks for per-frame visibility queries
//!
//! Measures:
//! - Resolving a selection in each mode
//! - Classifying every entity and connection for one frame

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use healthgrid_graph::{
    sample, Category, Connection, DomainGraph, Entity, GeoPosition, SequenceDefinitions,
};
use healthgrid_reveal::{resolve, RevealConfig, RevealEngine, RevealMode};

/// Ring of `n` entities, each linked to the next, with one long sequence.
fn ring(n: usize) -> DomainGraph {
    let ids: Vec<String> = (0..n).map(|i| format!("e{i}")).collect();
    let entities = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let lng = (i as f64 / n as f64) * 360.0 - 180.0;
            Entity::new(id.as_str(), GeoPosition::new(0.0, lng), id.as_str(), Category::Sensor, "#06b6d4", 1.0)
        })
        .collect();
    let connections = (0..n)
        .map(|i| Connection::new(ids[i].as_str(), ids[(i + 1) % n].as_str()))
        .collect();
    let sequences = SequenceDefinitions::new().with(ids[0].as_str(), ids.iter().map(String::as_str));

    match DomainGraph::new(entities, connections, sequences) {
        Ok(graph) => graph,
        Err(e) => panic!("ring graph rejected: {e}"),
    }
}

/// Benchmark selection resolution
fn bench_resolve(c: &mut Criterion) {
    let graph = match sample::health_grid() {
        Ok(graph) => graph,
        Err(e) => panic!("sample grid rejected: {e}"),
    };
    let mut group = c.benchmark_group("resolve");

    for mode in [RevealMode::Neighbor, RevealMode::Sequence] {
        group.bench_with_input(BenchmarkId::from_parameter(mode), &mode, |b, &mode| {
            b.iter(|| resolve(black_box(&graph), mode, black_box("twban")))
        });
    }
    group.finish();
}

/// Benchmark one frame's worth of classification at different graph sizes
fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    for &n in &[16usize, 256, 1024] {
        let graph = Arc::new(ring(n));
        let mut engine = RevealEngine::new(
            Arc::clone(&graph),
            RevealConfig {
                mode: RevealMode::Sequence,
                ..Default::default()
            },
        );
        let _ = engine.select("e0");
        for _ in 0..n / 2 {
            engine.tick();
        }

        group.throughput(Throughput::Elements((graph.entities().len() + graph.connections().len()) as u64));
        group.bench_with_input(BenchmarkId::new("sequence_half_revealed", n), &engine, |b, engine| {
            b.iter(|| {
                let view = engine.view();
                let entities = graph
                    .entities()
                    .iter()
                    .filter(|e| view.is_entity_revealed(e.id.as_str()))
                    .count();
                let connections = graph
                    .connections()
                    .iter()
                    .filter(|c| view.is_connection_revealed(c))
                    .count();
                black_box((entities, connections))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_frame);
criterion_main!(benches);

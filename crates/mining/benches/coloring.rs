use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, SamplingMode};
use rand::prelude::*;

use graph_mining::prelude::*;

fn uniform_undirected_graph(node_count: usize, edge_count: usize, seed: u64) -> UndirectedCsrGraph<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let edges: Vec<(usize, usize)> = (0..edge_count)
        .map(|_| (rng.gen_range(0..node_count), rng.gen_range(0..node_count)))
        .collect();

    GraphBuilder::new()
        .csr_layout(CsrLayout::Deduplicated)
        .edges(edges)
        .build()
}

fn coloring(c: &mut Criterion) {
    let node_count = 10_000;
    let edge_count = 50_000;
    let graph = uniform_undirected_graph(node_count, edge_count, 42);
    let ordering = degeneracy_ordering(&graph);
    let directed = induce_direction(&graph, &ordering);

    let mut group = c.benchmark_group("coloring");
    group
        .sample_size(10)
        .measurement_time(Duration::from_secs(20))
        .sampling_mode(SamplingMode::Flat);

    group.bench_function("barenboim", |b| {
        b.iter(|| black_box(barenboim_coloring(&directed, &BarenboimConfig::default())))
    });
    group.bench_function("elkin", |b| {
        b.iter(|| black_box(elkin_coloring(&directed, &ElkinConfig::default())))
    });
    group.bench_function("johansson", |b| {
        b.iter(|| black_box(johansson_coloring(&directed)))
    });
    group.bench_function("jones_plassmann_v1", |b| {
        b.iter(|| black_box(jones_plassmann_v1(&directed, &JonesPlassmannConfig::default())))
    });
    group.bench_function("jones_plassmann_v3", |b| {
        b.iter(|| black_box(jones_plassmann_v3(&directed, &JonesPlassmannConfig::default())))
    });
    group.bench_function("jones_plassmann_v4", |b| {
        b.iter(|| black_box(jones_plassmann_v4(&directed, &JonesPlassmannConfig::default())))
    });
    group.bench_function("dense_sparse", |b| {
        b.iter(|| black_box(dense_sparse_coloring(&directed, &DenseSparseConfig::default())))
    });

    group.finish();
}

criterion_group!(benches, coloring);
criterion_main!(benches);

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

fn k_clique(c: &mut Criterion) {
    let node_count = 2_000;
    let edge_count = 30_000;
    let graph = uniform_undirected_graph(node_count, edge_count, 7);
    let ordering = degeneracy_ordering(&graph);
    let directed = induce_direction(&graph, &ordering);

    let mut group = c.benchmark_group("k_clique");
    group
        .sample_size(10)
        .measurement_time(Duration::from_secs(20))
        .sampling_mode(SamplingMode::Flat);

    for k in [3usize, 4, 5] {
        group.bench_function(format!("node_parallel_k{k}"), |b| {
            b.iter(|| {
                black_box(count_k_cliques_with_driver(
                    &directed,
                    k,
                    KCliqueDriver::NodeParallel,
                ))
            })
        });
        group.bench_function(format!("edge_task_k{k}"), |b| {
            b.iter(|| {
                black_box(count_k_cliques_with_driver(
                    &directed,
                    k,
                    KCliqueDriver::EdgeTask,
                ))
            })
        });
    }

    group.finish();
}

fn maximal_clique(c: &mut Criterion) {
    let node_count = 500;
    let edge_count = 8_000;
    let graph = uniform_undirected_graph(node_count, edge_count, 11);
    let ordering = degeneracy_ordering(&graph);
    let set_graph: SetGraph<usize, SortedVertexSet<usize>> = SetGraph::from_undirected_csr(&graph);

    let mut group = c.benchmark_group("maximal_clique");
    group
        .sample_size(10)
        .measurement_time(Duration::from_secs(20))
        .sampling_mode(SamplingMode::Flat);

    group.bench_function("tomita", |b| b.iter(|| black_box(tomita_mce(&set_graph))));
    group.bench_function("eppstein", |b| {
        b.iter(|| black_box(eppstein_mce(&set_graph, &ordering)))
    });
    group.bench_function("subgraph", |b| {
        b.iter(|| black_box(subgraph_mce(&set_graph, &ordering, &BronKerboschConfig::default())))
    });

    group.finish();
}

criterion_group!(benches, k_clique, maximal_clique);
criterion_main!(benches);

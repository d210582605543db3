//! Vertex orderings: permutations of `[0..n)` consumed by the direction
//! inducer and the clique kernels. An ordering is stored in *order form*
//! (`order[i]` = the `i`-th vertex) and can be converted to *rank form*
//! (`rank[v]` = the position of `v`) in `O(n)`.

use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::time::Instant;

use log::info;
use nanorand::{Rng, WyRand};
use rayon::prelude::*;

use graph_builder::index::Idx;
use graph_builder::prelude::*;

/// A permutation of `[0..n)`, stored in order form.
#[derive(Clone, Debug)]
pub struct Ordering<NI> {
    order: Vec<NI>,
}

impl<NI: Idx> Ordering<NI> {
    pub fn from_order(order: Vec<NI>) -> Self {
        Ordering { order }
    }

    /// Builds an ordering from rank form by inverting the permutation.
    pub fn from_rank(rank: &[NI]) -> Self {
        let mut order = vec![NI::zero(); rank.len()];
        for (v, &r) in rank.iter().enumerate() {
            order[r.index()] = NI::new(v);
        }
        Ordering { order }
    }

    /// `order[i]` = the `i`-th vertex in the ordering.
    pub fn order(&self) -> &[NI] {
        &self.order
    }

    /// `rank[v]` = the position of `v` in the ordering. `O(n)`.
    pub fn rank(&self) -> Vec<NI> {
        let mut rank = vec![NI::zero(); self.order.len()];
        for (i, &v) in self.order.iter().enumerate() {
            rank[v.index()] = NI::new(i);
        }
        rank
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// The identity ordering: `order[i] = i`.
pub fn identity_ordering<NI: Idx>(n: NI) -> Ordering<NI> {
    Ordering::from_order(NI::zero().range(n).collect())
}

/// Orders vertices ascending by degree (ties broken by vertex id), so
/// that low-degree vertices are ranked first. This matches the
/// convention used by the degeneracy orderings below, where rank order
/// drives the direction inducer (§4.4.3): lower rank ⇒ smaller directed
/// out-degree.
pub fn degree_ordering<NI, G>(graph: &G) -> Ordering<NI>
where
    NI: Idx,
    G: Graph<NI> + UndirectedDegrees<NI> + Sync,
{
    let n = graph.node_count();
    let mut order: Vec<NI> = NI::zero().range(n).collect();
    order.par_sort_unstable_by_key(|&v| (graph.degree(v), v));
    Ordering::from_order(order)
}

/// Exact degeneracy ordering via the Matula-Beck bucket-queue peeling
/// algorithm: repeatedly remove a vertex of minimum remaining degree,
/// bucketed by degree value so each step is `O(1)` amortized.
pub fn degeneracy_ordering<NI, G>(graph: &G) -> Ordering<NI>
where
    NI: Idx,
    G: Graph<NI> + UndirectedDegrees<NI> + UndirectedNeighbors<NI> + Sync,
{
    let start = Instant::now();
    let n = graph.node_count().index();

    let mut degree: Vec<usize> = (0..n).map(|v| graph.degree(NI::new(v)).index()).collect();
    let max_degree = degree.iter().copied().max().unwrap_or(0);

    // D[d] = vertices with current remaining degree d.
    let mut buckets: Vec<Vec<NI>> = vec![Vec::new(); max_degree + 1];
    for v in 0..n {
        buckets[degree[v]].push(NI::new(v));
    }
    // position[v] = index of v within its current bucket, so removal is O(1).
    let mut position: Vec<usize> = vec![0; n];
    for bucket in &buckets {
        for (i, &v) in bucket.iter().enumerate() {
            position[v.index()] = i;
        }
    }

    let mut removed = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut smallest = 0usize;

    for _ in 0..n {
        while buckets[smallest].is_empty() {
            smallest += 1;
        }
        let v = buckets[smallest].pop().unwrap();
        removed[v.index()] = true;
        order.push(v);

        for &w in graph.neighbors(v) {
            let w = w.index();
            if removed[w] {
                continue;
            }
            let d = degree[w];
            // Remove w from its current bucket via swap-remove using its
            // tracked position, then reinsert one bucket down.
            let pos = position[w];
            let last = buckets[d].len() - 1;
            buckets[d].swap(pos, last);
            position[buckets[d][pos].index()] = pos;
            buckets[d].pop();

            degree[w] = d - 1;
            buckets[d - 1].push(NI::new(w));
            position[w] = buckets[d - 1].len() - 1;

            if d - 1 < smallest {
                smallest = d - 1;
            }
        }
    }

    info!(
        "Computed exact degeneracy ordering in {:?}",
        start.elapsed()
    );

    Ordering::from_order(order)
}

/// Threshold policy used to decide which vertices get peeled in a round
/// of the approximate degeneracy ordering (§4.4.2).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ThresholdPolicy {
    Avg,
    Min,
    ProbMin,
    ProbMedian,
}

/// Configuration for the approximate (parallel) degeneracy ordering.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct DegeneracyConfig {
    #[cfg_attr(feature = "clap", clap(long, default_value_t = DegeneracyConfig::DEFAULT_EPSILON))]
    pub epsilon: f64,
    #[cfg_attr(feature = "clap", clap(long, value_enum, default_value_t = ThresholdPolicy::Avg))]
    pub policy: ThresholdPolicy,
    #[cfg_attr(feature = "clap", clap(long, default_value_t = DegeneracyConfig::DEFAULT_SEED))]
    pub seed: u64,
}

impl DegeneracyConfig {
    pub const DEFAULT_EPSILON: f64 = 0.1;
    pub const DEFAULT_SEED: u64 = 0x5eed_0000_0000;
}

impl Default for DegeneracyConfig {
    fn default() -> Self {
        DegeneracyConfig {
            epsilon: Self::DEFAULT_EPSILON,
            policy: ThresholdPolicy::Avg,
            seed: Self::DEFAULT_SEED,
        }
    }
}

/// Approximate degeneracy ordering via iterative parallel threshold
/// peeling (§4.4.2). Non-deterministic in exact output order across
/// runs (random sampling, parallel partition ties), but always produces
/// a valid ordering whose induced core number is at least the true
/// degeneracy.
pub fn approximate_degeneracy_ordering<NI, G>(graph: &G, config: &DegeneracyConfig) -> Ordering<NI>
where
    NI: Idx,
    G: Graph<NI> + UndirectedDegrees<NI> + UndirectedNeighbors<NI> + Sync,
{
    let start = Instant::now();
    let n = graph.node_count().index();

    let degree: Vec<AtomicUsize> = (0..n)
        .map(|v| AtomicUsize::new(graph.degree(NI::new(v)).index()))
        .collect();

    let mut active: Vec<usize> = (0..n).collect();
    let mut order = Vec::with_capacity(n);
    let mut rng = WyRand::new_seed(config.seed);
    let mut round = 0u64;

    while !active.is_empty() {
        let current_degree = |v: usize| -> usize { degree[v].load(AtomicOrdering::Relaxed) };

        let threshold = compute_threshold(&active, &degree, config, &mut rng);

        let (peel, keep): (Vec<usize>, Vec<usize>) = active
            .par_iter()
            .copied()
            .partition(|&v| current_degree(v) <= threshold);

        if peel.is_empty() {
            // Guard against stalling: peel the single minimum-degree vertex.
            let min_v = *active
                .iter()
                .min_by_key(|&&v| current_degree(v))
                .expect("active is non-empty");
            peel_vertices(graph, &degree, &[min_v], &mut order);
            active.retain(|&v| v != min_v);
            round += 1;
            continue;
        }

        let mut peel = peel;
        peel.sort_unstable_by_key(|&v| current_degree(v));
        peel_vertices(graph, &degree, &peel, &mut order);

        active = keep;
        round += 1;
    }

    info!(
        "Computed approximate degeneracy ordering in {} rounds, {:?}",
        round,
        start.elapsed()
    );

    Ordering::from_order(order.into_iter().map(NI::new).collect())
}

fn peel_vertices<NI, G>(graph: &G, degree: &[AtomicUsize], peeled: &[usize], order: &mut Vec<usize>)
where
    NI: Idx,
    G: UndirectedNeighbors<NI>,
{
    for &v in peeled {
        order.push(v);
        for &w in graph.neighbors(NI::new(v)) {
            let w = w.index();
            let _ = degree[w].fetch_sub(1, AtomicOrdering::AcqRel);
        }
    }
}

fn compute_threshold(
    active: &[usize],
    degree: &[AtomicUsize],
    config: &DegeneracyConfig,
    rng: &mut WyRand,
) -> usize {
    let current_degree = |v: usize| -> usize { degree[v].load(AtomicOrdering::Relaxed) };

    match config.policy {
        ThresholdPolicy::Avg => {
            let sum: usize = active.iter().map(|&v| current_degree(v)).sum();
            let mean = sum as f64 / active.len() as f64;
            ((1.0 + config.epsilon) * mean).floor() as usize
        }
        ThresholdPolicy::Min => {
            let min = active.iter().map(|&v| current_degree(v)).min().unwrap_or(0);
            ((2.0 * (1.0 + config.epsilon)) * min as f64).ceil() as usize
        }
        ThresholdPolicy::ProbMin | ThresholdPolicy::ProbMedian => {
            let sample_count =
                (4usize).max((active.len() as f64).powf((1.0 - config.epsilon) / 2.0) as usize);
            let mut samples: Vec<usize> = (0..sample_count)
                .map(|_| {
                    let idx = rng.generate_range(0..active.len());
                    current_degree(active[idx])
                })
                .collect();
            samples.sort_unstable();
            match config.policy {
                ThresholdPolicy::ProbMin => samples[0],
                ThresholdPolicy::ProbMedian => samples[samples.len() / 2],
                _ => unreachable!(),
            }
        }
    }
}

/// The induced core number of a ranking: the maximum, over all
/// vertices, of the number of neighbors ranked strictly later. Used by
/// the ordering verifier (§4.4, §8.1).
pub fn induced_core_number<NI, G>(graph: &G, rank: &[NI]) -> u64
where
    NI: Idx,
    G: Graph<NI> + UndirectedNeighbors<NI> + Sync,
{
    let n = graph.node_count().index();
    (0..n)
        .into_par_iter()
        .map(|v| {
            let rv = rank[v];
            graph
                .neighbors(NI::new(v))
                .filter(|&&u| rank[u.index()] > rv)
                .count() as u64
        })
        .max()
        .unwrap_or(0)
}

/// `GCVerifierOrdering` (§4.4.2, §8.1): an independent check for a
/// degeneracy ordering (exact or approximate). Per the acceptance rule,
/// `ordering` is valid iff its induced core number is no worse than
/// `degree_ordering_core` — the induced core number of the plain degree
/// ordering over the same graph, computed once by the caller via
/// [`degree_ordering`] and [`induced_core_number`].
pub fn verify_degeneracy_ordering<NI, G>(
    graph: &G,
    ordering: &Ordering<NI>,
    degree_ordering_core: u64,
) -> bool
where
    NI: Idx,
    G: Graph<NI> + UndirectedNeighbors<NI> + Sync,
{
    induced_core_number(graph, &ordering.rank()) <= degree_ordering_core
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_builder::prelude::{CsrLayout, GraphBuilder, UndirectedCsrGraph};

    #[test]
    fn order_rank_round_trip() {
        let ordering = Ordering::<u32>::from_order(vec![2, 0, 1, 3]);
        let rank = ordering.rank();
        let round_tripped = Ordering::from_rank(&rank);
        assert_eq!(round_tripped.order(), ordering.order());
    }

    #[test]
    fn degeneracy_of_triangle_is_two() {
        let graph: UndirectedCsrGraph<usize> = GraphBuilder::new()
            .csr_layout(CsrLayout::Sorted)
            .edges(vec![(0, 1), (1, 2), (0, 2)])
            .build();

        let ordering = degeneracy_ordering(&graph);
        let rank = ordering.rank();
        assert_eq!(induced_core_number(&graph, &rank), 2);
    }

    #[test]
    fn degeneracy_of_path_is_one() {
        let graph: UndirectedCsrGraph<usize> = GraphBuilder::new()
            .csr_layout(CsrLayout::Sorted)
            .edges(vec![(0, 1), (1, 2)])
            .build();

        let ordering = degeneracy_ordering(&graph);
        let rank = ordering.rank();
        assert_eq!(induced_core_number(&graph, &rank), 1);
    }

    #[test]
    fn approximate_degeneracy_floor_holds() {
        let graph: UndirectedCsrGraph<usize> = GraphBuilder::new()
            .csr_layout(CsrLayout::Sorted)
            .edges(vec![
                (0, 1),
                (1, 2),
                (0, 2),
                (2, 3),
                (3, 4),
                (3, 5),
                (4, 5),
            ])
            .build();

        let exact = degeneracy_ordering(&graph);
        let exact_core = induced_core_number(&graph, &exact.rank());

        let degree_order = degree_ordering(&graph);
        let degree_core = induced_core_number(&graph, &degree_order.rank());

        let approx = approximate_degeneracy_ordering(&graph, &DegeneracyConfig::default());

        assert!(verify_degeneracy_ordering(&graph, &approx, degree_core));
        assert!(verify_degeneracy_ordering(&graph, &exact, degree_core));
        assert!(exact_core <= degree_core);
    }

    #[test]
    fn verifier_rejects_an_ordering_worse_than_degree_order() {
        let graph: UndirectedCsrGraph<usize> = GraphBuilder::new()
            .csr_layout(CsrLayout::Sorted)
            .edges(vec![(0, 1), (1, 2), (0, 2), (2, 3), (3, 4), (3, 5), (4, 5)])
            .build();

        let degree_order = degree_ordering(&graph);
        let degree_core = induced_core_number(&graph, &degree_order.rank());

        // Reversing the degree ordering maximizes out-degree at the
        // front instead of minimizing it, which should fail acceptance
        // whenever the graph actually has a non-trivial core.
        let mut reversed: Vec<usize> = degree_order.order().to_vec();
        reversed.reverse();
        let worst = Ordering::from_order(reversed);

        assert!(!verify_degeneracy_ordering(&graph, &worst, degree_core));
    }
}

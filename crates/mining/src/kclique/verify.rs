//! An independent k-clique counter (§4.6.4) used only to cross-check
//! [`crate::kclique::danisch::count_k_cliques`] in tests: a plain
//! recursive Bron-Kerbosch-free enumeration with no shared scratch
//! state at all, working directly off each vertex's full neighbor set
//! rather than the rank-restricted candidate sets the main kernel
//! uses.

use graph_builder::index::Idx;
use graph_builder::prelude::*;

/// Recomputes the number of `k`-cliques in `graph` from scratch, by
/// extending partial cliques one out-neighbor intersection at a time.
/// Deliberately simple (no parallelism, no incremental restriction of
/// neighbor sets beyond a plain sorted intersection) so it can serve as
/// a trusted oracle for the production kernel.
pub fn verify_k_clique_count<NI>(graph: &DirectedCsrGraph<NI>, k: usize, expected: u64) -> bool
where
    NI: Idx,
{
    independent_count(graph, k) == expected
}

fn independent_count<NI: Idx>(graph: &DirectedCsrGraph<NI>, k: usize) -> u64 {
    let n = graph.node_count().index();
    match k {
        0 => return 0,
        1 => return n as u64,
        2 => return graph.edge_count().index() as u64,
        _ => {}
    }

    let mut total = 0u64;
    for v in 0..n {
        let candidates: Vec<usize> = graph.out_neighbors(NI::new(v)).map(|u| u.index()).collect();
        total += extend(graph, &candidates, k - 1);
    }
    total
}

fn extend<NI: Idx>(graph: &DirectedCsrGraph<NI>, candidates: &[usize], remaining: usize) -> u64 {
    if remaining == 1 {
        return candidates.len() as u64;
    }

    let mut total = 0u64;
    for (i, &w) in candidates.iter().enumerate() {
        let w_out: Vec<usize> = graph.out_neighbors(NI::new(w)).map(|u| u.index()).collect();
        let next: Vec<usize> = candidates[i + 1..]
            .iter()
            .copied()
            .filter(|x| w_out.contains(x))
            .collect();
        total += extend(graph, &next, remaining - 1);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::induce_direction;
    use crate::kclique::danisch::count_k_cliques;
    use crate::kclique::KCliqueConfig;
    use crate::ordering::degeneracy_ordering;

    #[test]
    fn agrees_with_danisch_kernel_on_k5_plus_pendant() {
        let graph: UndirectedCsrGraph<usize> = GraphBuilder::new()
            .csr_layout(CsrLayout::Sorted)
            .edges(vec![
                (0, 1),
                (0, 2),
                (0, 3),
                (0, 4),
                (1, 2),
                (1, 3),
                (1, 4),
                (2, 3),
                (2, 4),
                (3, 4),
                (4, 5),
            ])
            .build();
        let ordering = degeneracy_ordering(&graph);
        let directed = induce_direction(&graph, &ordering);

        for k in 1..=5 {
            let produced = count_k_cliques(&directed, k, KCliqueConfig::default());
            assert!(verify_k_clique_count(&directed, k, produced), "k={k}");
        }
    }
}

//! Danisch-style recursive k-clique listing kernel (§4.6.2).
//!
//! Every vertex `v` at the top level owns the candidate set
//! `sub = {w ∈ out_neighbors(v)}`: since the graph is oriented by rank
//! and a clique's members are totally ordered by rank, any clique
//! containing `v` as its lowest-ranked member has its remaining
//! `k - 1` members inside `sub`. Recursing restricts `sub` to the
//! out-neighborhood of each chosen member in turn (`build subgraph` +
//! `order and count` in the original description), until the base
//! case `level == 2`, where the remaining count is exactly the number
//! of directed edges inside the current candidate set.
//!
//! Membership in the candidate set at a given recursion depth plays
//! the role the original's mutable per-vertex `label` array played:
//! both just answer "is `w` still a candidate at this level", this
//! version answers it with a sorted-slice binary search over a local
//! `Vec` instead of a shared scratch array, trading a reusable buffer
//! for simplicity.

use graph_builder::index::Idx;
use graph_builder::prelude::*;

use crate::kclique::drivers::count_k_cliques_with_driver;
use crate::kclique::KCliqueConfig;

/// Counts the number of `k`-cliques in `graph`, a directed CSR graph
/// already oriented by a vertex ranking (§4.4.3), using the driver
/// named by `config`.
///
/// `k == 1` and `k == 2` are handled without recursion, per §4.6.2,
/// regardless of driver.
pub fn count_k_cliques<NI>(graph: &DirectedCsrGraph<NI>, k: usize, config: KCliqueConfig) -> u64
where
    NI: Idx,
{
    count_k_cliques_with_driver(graph, k, config.driver)
}

/// Recurses on a sorted candidate set `sub`, all of whose members are
/// reachable from the clique built so far; `level` is how many more
/// members the clique still needs.
pub(crate) fn listing<NI: Idx>(graph: &DirectedCsrGraph<NI>, sub: &[usize], level: usize) -> u64 {
    if level < 2 {
        return sub.len() as u64;
    }
    if level == 2 {
        return sub
            .iter()
            .map(|&w| {
                graph
                    .out_neighbors(NI::new(w))
                    .filter(|&&x| sub.binary_search(&x.index()).is_ok())
                    .count() as u64
            })
            .sum();
    }

    sub.iter()
        .map(|&w| {
            let restricted: Vec<usize> = graph
                .out_neighbors(NI::new(w))
                .map(|u| u.index())
                .filter(|x| sub.binary_search(x).is_ok())
                .collect();
            listing(graph, &restricted, level - 1)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::induce_direction;
    use crate::ordering::degeneracy_ordering;

    fn directed_k5() -> DirectedCsrGraph<usize> {
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
            ])
            .build();
        let ordering = degeneracy_ordering(&graph);
        induce_direction(&graph, &ordering)
    }

    #[test]
    fn counts_triangles_in_triangle_graph() {
        let graph: UndirectedCsrGraph<usize> = GraphBuilder::new()
            .csr_layout(CsrLayout::Sorted)
            .edges(vec![(0, 1), (1, 2), (0, 2)])
            .build();
        let ordering = degeneracy_ordering(&graph);
        let directed = induce_direction(&graph, &ordering);

        assert_eq!(count_k_cliques(&directed, 3, KCliqueConfig::default()), 1);
    }

    #[test]
    fn counts_all_cliques_in_k5() {
        let directed = directed_k5();

        assert_eq!(count_k_cliques(&directed, 1, KCliqueConfig::default()), 5);
        assert_eq!(count_k_cliques(&directed, 2, KCliqueConfig::default()), 10);
        assert_eq!(count_k_cliques(&directed, 3, KCliqueConfig::default()), 10);
        assert_eq!(count_k_cliques(&directed, 4, KCliqueConfig::default()), 5);
        assert_eq!(count_k_cliques(&directed, 5, KCliqueConfig::default()), 1);
        assert_eq!(count_k_cliques(&directed, 6, KCliqueConfig::default()), 0);
    }
}

//! Building a directed graph out of an undirected graph plus a vertex
//! ranking: keep an edge `u -- v` as `u -> v` iff `u` is ranked before
//! `v` (§4.4.3). Every coloring and clique kernel in this crate
//! operates on the resulting directed CSR rather than on the original
//! undirected graph, since consulting only out-neighbors avoids
//! revisiting each edge from both endpoints.

use std::time::Instant;

use log::info;
use rayon::prelude::*;

use graph_builder::index::Idx;
use graph_builder::prelude::*;

use crate::ordering::Ordering;

/// Builds a directed CSR graph from an undirected graph and a vertex
/// ordering: an undirected edge `{u, v}` becomes the directed edge
/// `rank(u) < rank(v) ? (u -> v) : (v -> u)`.
///
/// The out-degree of every vertex in the result is exactly its number
/// of neighbors ranked strictly later, matching
/// [`crate::ordering::induced_core_number`].
pub fn induce_direction<NI, NV, EV>(
    graph: &UndirectedCsrGraph<NI, NV, EV>,
    ordering: &Ordering<NI>,
) -> DirectedCsrGraph<NI>
where
    NI: Idx,
    UndirectedCsrGraph<NI, NV, EV>: UndirectedNeighbors<NI> + UndirectedDegrees<NI>,
{
    let start = Instant::now();
    let rank = ordering.rank();
    let n = graph.node_count();

    let edges: Vec<(NI, NI)> = (0..n.index())
        .into_par_iter()
        .flat_map_iter(|i| {
            let u = NI::new(i);
            let ru = rank[i];
            graph.neighbors(u).filter_map(move |&v| {
                if ru < rank[v.index()] {
                    Some((u, v))
                } else {
                    None
                }
            })
        })
        .collect();

    let directed: DirectedCsrGraph<NI> = GraphBuilder::new()
        .csr_layout(CsrLayout::Sorted)
        .edges(edges)
        .build();

    info!(
        "Induced direction over {} nodes, {} directed edges, in {:?}",
        n.index(),
        directed.edge_count().index(),
        start.elapsed()
    );

    directed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::degeneracy_ordering;

    #[test]
    fn triangle_direction_matches_degeneracy_rank() {
        let graph: UndirectedCsrGraph<usize> = GraphBuilder::new()
            .csr_layout(CsrLayout::Sorted)
            .edges(vec![(0, 1), (1, 2), (0, 2)])
            .build();

        let ordering = degeneracy_ordering(&graph);
        let rank = ordering.rank();
        let directed = induce_direction(&graph, &ordering);

        assert_eq!(directed.node_count(), 3);
        assert_eq!(directed.edge_count(), 3);

        for v in 0..3 {
            let out: Vec<usize> = directed.out_neighbors(v).copied().collect();
            for &w in &out {
                assert!(rank[v] < rank[w]);
            }
        }
    }

    #[test]
    fn path_direction_has_n_minus_one_edges() {
        let graph: UndirectedCsrGraph<usize> = GraphBuilder::new()
            .csr_layout(CsrLayout::Sorted)
            .edges(vec![(0, 1), (1, 2), (2, 3)])
            .build();

        let ordering = degeneracy_ordering(&graph);
        let directed = induce_direction(&graph, &ordering);

        assert_eq!(directed.edge_count(), 3);
    }
}

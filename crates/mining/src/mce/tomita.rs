//! Sequential Tomita-pivoting Bron-Kerbosch (§4.7.1): the recursive
//! core every other driver in this module builds on.

use std::time::Instant;

use log::info;

use graph_builder::index::Idx;

use crate::mce::MaximalClique;
use crate::set::VertexSet;
use crate::set_graph::SetGraph;

/// Enumerates every maximal clique of `graph` via a single sequential
/// Tomita-pivoting recursion starting from the whole vertex set.
pub fn tomita_mce<NI, S>(graph: &SetGraph<NI, S>) -> Vec<MaximalClique<NI>>
where
    NI: Idx,
    S: VertexSet<NI>,
{
    let start = Instant::now();
    let n = graph.node_count();

    let all: Vec<NI> = NI::zero().range(n).collect();
    let cand = S::from_sorted_slice(&all);
    let fini = S::empty();

    let mut cliques = Vec::new();
    expand(graph, cand, fini, &mut Vec::new(), &mut cliques);

    info!(
        "Tomita MCE over {} nodes found {} maximal cliques in {:?}",
        n.index(),
        cliques.len(),
        start.elapsed()
    );

    cliques
}

/// The shared recursive step: choose a pivot `p ∈ cand ∪ fini`
/// maximizing `|cand ∩ N(p)|`, then for each `q ∈ cand \ N(p)` recurse
/// into `(cand ∩ N(q), fini ∩ N(q), Q ∪ {q})`, moving `q` from `cand`
/// to `fini` afterwards. Terminal when `cand` and `fini` are both
/// empty: `q` is a maximal clique.
pub(crate) fn expand<NI, S>(
    graph: &SetGraph<NI, S>,
    mut cand: S,
    mut fini: S,
    q: &mut Vec<NI>,
    out: &mut Vec<MaximalClique<NI>>,
) where
    NI: Idx,
    S: VertexSet<NI>,
{
    if cand.is_empty() && fini.is_empty() {
        let mut clique = q.clone();
        clique.sort_unstable();
        out.push(clique);
        return;
    }

    let pivot = choose_pivot(graph, &cand, &fini);
    let pivot_neighbors = graph.neighbors(pivot);

    let extend_candidates: Vec<NI> = cand
        .iter()
        .filter(|&v| !pivot_neighbors.contains(v))
        .collect();

    for v in extend_candidates {
        let v_neighbors = graph.neighbors(v);
        let next_cand = cand.intersect(v_neighbors);
        let next_fini = fini.intersect(v_neighbors);

        q.push(v);
        expand(graph, next_cand, next_fini, q, out);
        q.pop();

        cand.remove(v);
        fini.add(v);
    }
}

fn choose_pivot<NI, S>(graph: &SetGraph<NI, S>, cand: &S, fini: &S) -> NI
where
    NI: Idx,
    S: VertexSet<NI>,
{
    cand.iter()
        .chain(fini.iter())
        .max_by_key(|&p| cand.intersect_count(graph.neighbors(p)))
        .expect("choose_pivot called with cand ∪ fini non-empty")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::set::SortedVertexSet;
    use graph_builder::prelude::*;

    fn build(edges: Vec<(usize, usize)>) -> SetGraph<usize, SortedVertexSet<usize>> {
        let graph: UndirectedCsrGraph<usize> = GraphBuilder::new()
            .csr_layout(CsrLayout::Sorted)
            .edges(edges)
            .build();
        SetGraph::from_undirected_csr(&graph)
    }

    #[test]
    fn triangle_has_one_maximal_clique() {
        let g = build(vec![(0, 1), (1, 2), (0, 2)]);
        let cliques = tomita_mce(&g);
        assert_eq!(cliques.len(), 1);
        assert_eq!(cliques[0], vec![0, 1, 2]);
    }

    #[test]
    fn path_has_edges_as_maximal_cliques() {
        let g = build(vec![(0, 1), (1, 2)]);
        let mut cliques = tomita_mce(&g);
        cliques.sort();
        assert_eq!(cliques, vec![vec![0, 1], vec![1, 2]]);
    }

    #[test]
    fn eppstein_canonical_example_has_expected_count() {
        // Two triangles sharing an edge, plus a pendant off the shared
        // edge: a small, well-known Bron-Kerbosch stress case.
        let g = build(vec![(0, 1), (0, 2), (1, 2), (1, 3), (2, 3), (3, 4)]);
        let cliques = tomita_mce(&g);
        // {0,1,2}, {1,2,3}, {3,4}
        assert_eq!(cliques.len(), 3);
        assert!(cliques.iter().any(|c| c == &vec![0, 1, 2]));
        assert!(cliques.iter().any(|c| c == &vec![1, 2, 3]));
        assert!(cliques.iter().any(|c| c == &vec![3, 4]));
    }
}

//! Eppstein's parallel outer loop (§4.7.2): run the Tomita pivoting
//! recursion from one root per vertex, concurrently, restricting each
//! root's candidate/finished sets to its degeneracy-ordered
//! neighborhood instead of the whole graph.

use std::time::Instant;

use log::info;
use parking_lot::Mutex;
use rayon::prelude::*;

use graph_builder::index::Idx;

use crate::mce::tomita::expand;
use crate::mce::MaximalClique;
use crate::ordering::Ordering;
use crate::set::VertexSet;
use crate::set_graph::SetGraph;

/// Enumerates every maximal clique of `graph`, fanning one Tomita
/// recursion out per vertex `v` over `rank`: `cand` holds `v`'s
/// higher-ranked neighbors, `fini` its lower-ranked ones, so every
/// clique is discovered exactly once, rooted at its lowest-ranked
/// member.
pub fn eppstein_mce<NI, S>(graph: &SetGraph<NI, S>, ordering: &Ordering<NI>) -> Vec<MaximalClique<NI>>
where
    NI: Idx,
    S: VertexSet<NI>,
{
    let start = Instant::now();
    let n = graph.node_count();
    let rank = ordering.rank();

    let cliques: Mutex<Vec<MaximalClique<NI>>> = Mutex::new(Vec::new());

    (0..n.index()).into_par_iter().for_each(|i| {
        let v = NI::new(i);
        let v_neighbors = graph.neighbors(v);
        let rv = rank[i].index();

        let higher: Vec<NI> = v_neighbors.iter().filter(|&u| rank[u.index()] > rv).collect();
        let lower: Vec<NI> = v_neighbors.iter().filter(|&u| rank[u.index()] < rv).collect();

        let cand = S::from_sorted_slice(&sort(higher));
        let fini = S::from_sorted_slice(&sort(lower));

        let mut local = Vec::new();
        expand(graph, cand, fini, &mut vec![v], &mut local);

        if !local.is_empty() {
            cliques.lock().extend(local);
        }
    });

    let cliques = cliques.into_inner();

    info!(
        "Eppstein MCE over {} nodes found {} maximal cliques in {:?}",
        n.index(),
        cliques.len(),
        start.elapsed()
    );

    cliques
}

fn sort<NI: Idx>(mut v: Vec<NI>) -> Vec<NI> {
    v.sort_unstable();
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordering::degeneracy_ordering;
    use crate::set::SortedVertexSet;
    use graph_builder::prelude::*;

    fn build(edges: Vec<(usize, usize)>) -> (SetGraph<usize, SortedVertexSet<usize>>, Ordering<usize>) {
        let graph: UndirectedCsrGraph<usize> = GraphBuilder::new()
            .csr_layout(CsrLayout::Sorted)
            .edges(edges)
            .build();
        let ordering = degeneracy_ordering(&graph);
        (SetGraph::from_undirected_csr(&graph), ordering)
    }

    #[test]
    fn agrees_with_tomita_on_two_joined_triangles() {
        let (g, ordering) = build(vec![(0, 1), (0, 2), (1, 2), (1, 3), (2, 3), (3, 4)]);

        let mut eppstein = eppstein_mce(&g, &ordering);
        let mut tomita = crate::mce::tomita::tomita_mce(&g);
        eppstein.sort();
        tomita.sort();

        assert_eq!(eppstein, tomita);
    }

    #[test]
    fn k5_has_one_maximal_clique() {
        let (g, ordering) = build(vec![
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
        ]);

        let cliques = eppstein_mce(&g, &ordering);
        assert_eq!(cliques.len(), 1);
        assert_eq!(cliques[0].len(), 5);
    }
}

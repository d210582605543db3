//! A graph whose neighborhoods are [`VertexSet`]s instead of raw CSR
//! slices, built once from a CSR graph and shared read-only across
//! threads by the clique kernels.

use rayon::prelude::*;

use graph_builder::index::Idx;
use graph_builder::prelude::*;

use crate::set::VertexSet;

/// `n` vertex sets, one per vertex, built once from an immutable CSR
/// graph. Never mutated after construction.
pub struct SetGraph<NI: Idx, S: VertexSet<NI>> {
    neighbors: Vec<S>,
    node_count: NI,
    edge_count: NI,
}

impl<NI: Idx, S: VertexSet<NI>> SetGraph<NI, S> {
    /// Builds a set-graph from a directed or undirected CSR graph by
    /// bulk-constructing each neighborhood's set from its sorted slice.
    pub fn from_csr<G>(graph: &G) -> Self
    where
        G: Graph<NI> + DirectedNeighbors<NI> + DirectedDegrees<NI> + Sync,
    {
        let n = graph.node_count();
        let neighbors: Vec<S> = (0..n.index())
            .into_par_iter()
            .map(|i| {
                let v = NI::new(i);
                let slice: Vec<NI> = graph.out_neighbors(v).copied().collect();
                S::from_sorted_slice(&slice)
            })
            .collect();

        SetGraph {
            neighbors,
            node_count: n,
            edge_count: graph.edge_count(),
        }
    }

    /// Builds a set-graph from an undirected CSR graph.
    pub fn from_undirected_csr<NV, EV>(graph: &UndirectedCsrGraph<NI, NV, EV>) -> Self
    where
        UndirectedCsrGraph<NI, NV, EV>: UndirectedNeighbors<NI>,
    {
        let n = graph.node_count();
        let neighbors: Vec<S> = (0..n.index())
            .into_par_iter()
            .map(|i| {
                let v = NI::new(i);
                let slice: Vec<NI> = graph.neighbors(v).copied().collect();
                S::from_sorted_slice(&slice)
            })
            .collect();

        SetGraph {
            neighbors,
            node_count: n,
            edge_count: graph.edge_count(),
        }
    }

    /// Builds a set-graph directly from precomputed neighborhoods, used
    /// when materializing an induced, relabelled subgraph (§4.7.3)
    /// rather than deriving it from a CSR graph.
    pub(crate) fn from_parts(neighbors: Vec<S>, node_count: NI, edge_count: NI) -> Self {
        SetGraph {
            neighbors,
            node_count,
            edge_count,
        }
    }

    pub fn node_count(&self) -> NI {
        self.node_count
    }

    pub fn edge_count(&self) -> NI {
        self.edge_count
    }

    pub fn neighbors(&self, v: NI) -> &S {
        &self.neighbors[v.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::set::SortedVertexSet;

    #[test]
    fn builds_from_undirected_triangle() {
        let graph: UndirectedCsrGraph<usize> = GraphBuilder::new()
            .csr_layout(CsrLayout::Sorted)
            .edges(vec![(0, 1), (1, 2), (0, 2)])
            .build();

        let set_graph: SetGraph<usize, SortedVertexSet<usize>> =
            SetGraph::from_undirected_csr(&graph);

        assert_eq!(set_graph.node_count(), 3);
        assert_eq!(set_graph.neighbors(0).cardinality(), 2);
        assert!(set_graph.neighbors(0).contains(1));
        assert!(set_graph.neighbors(0).contains(2));
    }
}

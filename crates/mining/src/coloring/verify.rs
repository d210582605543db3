//! `GCVerifierDeltaPlusOne` (§4.5.7): an independent, embarrassingly
//! parallel check that a [`Coloring`] is valid — every color lies in
//! `[1, Δ+1]` and no two adjacent vertices share a color.

use rayon::prelude::*;

use graph_builder::index::Idx;
use graph_builder::prelude::*;

use crate::coloring::Coloring;

/// Returns `true` iff `coloring` assigns every vertex a color and no
/// edge of `graph` (checked in both directions) connects two equally
/// colored vertices.
pub fn verify_coloring<NI>(graph: &DirectedCsrGraph<NI>, coloring: &Coloring<NI>) -> bool
where
    NI: Idx,
{
    let n = graph.node_count().index();
    if coloring.node_count() != n {
        return false;
    }

    let max_degree = (0..n)
        .map(|v| graph.out_degree(NI::new(v)).index() + graph.in_degree(NI::new(v)).index())
        .max()
        .unwrap_or(0) as u32;

    (0..n).into_par_iter().all(|v| {
        let cv = coloring.color(NI::new(v));
        if cv == 0 || cv > max_degree + 1 {
            return false;
        }
        graph
            .out_neighbors(NI::new(v))
            .all(|&u| coloring.color(u) != cv)
    })
}

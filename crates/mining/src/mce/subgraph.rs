//! Subgraph-materializing variant of Eppstein's outer loop (§4.7.3):
//! identical root fan-out, but once a root's combined candidate and
//! finished sets exceed [`BronKerboschConfig::subgraph_threshold`],
//! build an induced, relabelled [`SetGraph`] over just those members
//! before recursing, trading a one-time relabelling cost for tighter
//! cache locality during the recursion itself.

use std::time::Instant;

use log::info;
use parking_lot::Mutex;
use rayon::prelude::*;

use graph_builder::index::Idx;

use crate::mce::tomita::expand;
use crate::mce::{BronKerboschConfig, MaximalClique};
use crate::ordering::Ordering;
use crate::set::VertexSet;
use crate::set_graph::SetGraph;

pub fn subgraph_mce<NI, S>(
    graph: &SetGraph<NI, S>,
    ordering: &Ordering<NI>,
    config: &BronKerboschConfig,
) -> Vec<MaximalClique<NI>>
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

        let higher = sort(v_neighbors.iter().filter(|&u| rank[u.index()] > rv).collect());
        let lower = sort(v_neighbors.iter().filter(|&u| rank[u.index()] < rv).collect());

        let mut local = Vec::new();

        if higher.len() + lower.len() > config.subgraph_threshold {
            expand_via_materialized_subgraph(graph, v, &higher, &lower, &mut local);
        } else {
            let cand = S::from_sorted_slice(&higher);
            let fini = S::from_sorted_slice(&lower);
            expand(graph, cand, fini, &mut vec![v], &mut local);
        }

        if !local.is_empty() {
            cliques.lock().extend(local);
        }
    });

    let cliques = cliques.into_inner();

    info!(
        "Subgraph MCE over {} nodes found {} maximal cliques in {:?}",
        n.index(),
        cliques.len(),
        start.elapsed()
    );

    cliques
}

/// Builds the induced subgraph over `{v} ∪ higher ∪ lower`, relabelled
/// to a dense `0..m` id space, runs the Tomita recursion on it, then
/// maps the resulting cliques' members back to the original ids.
fn expand_via_materialized_subgraph<NI, S>(
    graph: &SetGraph<NI, S>,
    v: NI,
    higher: &[NI],
    lower: &[NI],
    out: &mut Vec<MaximalClique<NI>>,
) where
    NI: Idx,
    S: VertexSet<NI>,
{
    let mut members: Vec<NI> = Vec::with_capacity(1 + higher.len() + lower.len());
    members.push(v);
    members.extend_from_slice(higher);
    members.extend_from_slice(lower);
    members.sort_unstable();
    members.dedup();

    let local_of = |global: NI| -> NI { NI::new(members.binary_search(&global).expect("member of induced subgraph")) };

    let local_neighbors: Vec<S> = members
        .iter()
        .map(|&m| {
            let global_neighbors = graph.neighbors(m);
            let mut local: Vec<NI> = global_neighbors
                .iter()
                .filter(|u| members.binary_search(u).is_ok())
                .map(local_of)
                .collect();
            local.sort_unstable();
            S::from_sorted_slice(&local)
        })
        .collect();

    let edge_count = local_neighbors.iter().map(|s| s.cardinality()).sum::<u64>() / 2;
    let local_graph = SetGraph::from_parts(local_neighbors, NI::new(members.len()), NI::new(edge_count as usize));

    let local_v = local_of(v);
    let v_neighbors = local_graph.neighbors(local_v);
    let local_cand: Vec<NI> = v_neighbors
        .iter()
        .filter(|&u| members[u.index()] != v && higher.binary_search(&members[u.index()]).is_ok())
        .collect();
    let local_fini: Vec<NI> = v_neighbors
        .iter()
        .filter(|&u| lower.binary_search(&members[u.index()]).is_ok())
        .collect();

    let cand = S::from_sorted_slice(&sort(local_cand));
    let fini = S::from_sorted_slice(&sort(local_fini));

    let mut local_cliques = Vec::new();
    expand(&local_graph, cand, fini, &mut vec![local_v], &mut local_cliques);

    out.extend(
        local_cliques
            .into_iter()
            .map(|clique| clique.into_iter().map(|local| members[local.index()]).collect()),
    );
}

fn sort<NI: Idx>(mut v: Vec<NI>) -> Vec<NI> {
    v.sort_unstable();
    v
}

//! Bron-Kerbosch maximal clique enumeration (§4.7): unlike k-clique
//! counting, this enumerates every *maximal* clique (one not properly
//! contained in a larger clique), not just cliques of a fixed size.
//!
//! [`tomita`] implements the sequential pivoting recursion; [`eppstein`]
//! parallelizes it by fanning a top-level task out per vertex over a
//! degeneracy ordering; [`subgraph`] is the same outer loop but
//! materializes an induced, relabelled subgraph before recursing when
//! the candidate set is large enough to make that pay off.

pub mod eppstein;
pub mod subgraph;
pub mod tomita;

use graph_builder::index::Idx;

/// Which Bron-Kerbosch driver to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum BronKerboschVariant {
    /// Single-threaded Tomita pivoting from one global call.
    Sequential,
    /// Eppstein's parallel outer loop over a degeneracy ordering.
    Eppstein,
    /// Like Eppstein, but materializes induced subgraphs above a size
    /// threshold for cache locality.
    Subgraph,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct BronKerboschConfig {
    #[cfg_attr(feature = "clap", clap(long, value_enum, default_value_t = BronKerboschVariant::Eppstein))]
    pub variant: BronKerboschVariant,
    /// Candidate-set size above which [`subgraph`] materializes an
    /// induced subgraph instead of recursing on the original graph.
    #[cfg_attr(feature = "clap", clap(long, default_value_t = 32))]
    pub subgraph_threshold: usize,
}

impl Default for BronKerboschConfig {
    fn default() -> Self {
        BronKerboschConfig {
            variant: BronKerboschVariant::Eppstein,
            subgraph_threshold: 32,
        }
    }
}

/// A maximal clique, as the sorted list of its member vertex ids.
pub type MaximalClique<NI> = Vec<NI>;

pub(crate) fn sorted_intersect_adjacency<NI: Idx>(a: &[NI], b: &[NI]) -> Vec<NI> {
    let (mut i, mut j) = (0, 0);
    let mut out = Vec::new();
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

pub(crate) fn sorted_difference_adjacency<NI: Idx>(a: &[NI], b: &[NI]) -> Vec<NI> {
    let (mut i, mut j) = (0, 0);
    let mut out = Vec::new();
    while i < a.len() {
        if j >= b.len() || a[i] < b[j] {
            out.push(a[i]);
            i += 1;
        } else if a[i] > b[j] {
            j += 1;
        } else {
            i += 1;
            j += 1;
        }
    }
    out
}

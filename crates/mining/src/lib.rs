//! Parallel graph mining kernels built on top of [`graph_builder`]'s
//! immutable CSR graph representation.
//!
//! This crate provides the primitives needed to do graph coloring and
//! clique mining at scale on shared-memory machines:
//!
//! - [`set`]: a polymorphic vertex-set abstraction (sorted array, bitmap,
//!   hash) with an `intersect_count` fast path, used throughout the clique
//!   kernels.
//! - [`set_graph`]: a graph whose neighborhoods are [`set::VertexSet`]s.
//! - [`ordering`]: vertex orderings (identity, degree, exact and
//!   approximate degeneracy).
//! - [`direction`]: building a directed graph from an undirected graph and
//!   a ranking.
//! - [`coloring`]: parallel Δ+1 graph coloring (Barenboim, Elkin,
//!   Johansson, Jones-Plassmann, dense/sparse decomposition).
//! - [`kclique`]: k-clique counting (Danisch-style recursive listing).
//! - [`mce`]: Bron-Kerbosch maximal clique enumeration.
//!
//! # Example
//!
//! ```
//! use graph_builder::prelude::*;
//! use graph_mining::prelude::*;
//!
//! let graph: UndirectedCsrGraph<usize> = GraphBuilder::new()
//!     .edges(vec![(0, 1), (1, 2), (0, 2)])
//!     .build();
//!
//! let ordering = degeneracy_ordering(&graph);
//! let directed = induce_direction(&graph, &ordering);
//! let count = count_k_cliques(&directed, 3, KCliqueConfig::default());
//! assert_eq!(count, 1);
//! ```

pub mod coloring;
pub mod direction;
pub mod kclique;
pub mod mce;
pub mod ordering;
pub mod prelude;
pub mod set;
pub mod set_graph;

use graph_builder::index::Idx;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error")]
    IoError {
        #[from]
        source: std::io::Error,
    },
    #[error("verification failed: {0}")]
    VerificationFailed(String),
    #[error("invalid kernel parameter: {0}")]
    InvalidParameter(String),
}

/// Extension trait to construct an [`atomic::Atomic`] wrapper around an
/// [`Idx`] value without spelling out the type at each call site.
pub trait AtomicExt: Idx {
    fn atomic(self) -> atomic::Atomic<Self>;
}

impl<T: Idx> AtomicExt for T {
    fn atomic(self) -> atomic::Atomic<Self> {
        atomic::Atomic::new(self)
    }
}

pub use graph_builder::prelude::*;

pub use crate::coloring::barenboim::{barenboim_coloring, BarenboimConfig};
pub use crate::coloring::dense_sparse::{dense_sparse_coloring, DenseSparseConfig};
pub use crate::coloring::elkin::{elkin_coloring, ElkinConfig};
pub use crate::coloring::johansson::johansson_coloring;
pub use crate::coloring::jones_plassmann::{
    jones_plassmann_v1, jones_plassmann_v3, jones_plassmann_v4, JonesPlassmannConfig,
};
pub use crate::coloring::verify::verify_coloring;
pub use crate::coloring::{color, Coloring, ColoringAlgorithm, ColoringConfig};

pub use crate::kclique::danisch::count_k_cliques;
pub use crate::kclique::drivers::{count_k_cliques_with_driver, KCliqueDriver};
pub use crate::kclique::verify::verify_k_clique_count;
pub use crate::kclique::KCliqueConfig;

pub use crate::mce::eppstein::eppstein_mce;
pub use crate::mce::subgraph::subgraph_mce;
pub use crate::mce::tomita::tomita_mce;
pub use crate::mce::{BronKerboschConfig, BronKerboschVariant};

pub use crate::direction::induce_direction;
pub use crate::ordering::{
    approximate_degeneracy_ordering, degeneracy_ordering, degree_ordering, identity_ordering,
    induced_core_number, verify_degeneracy_ordering, DegeneracyConfig, Ordering, ThresholdPolicy,
};
pub use crate::set::{HashVertexSet, RoaringVertexSet, SortedVertexSet, VertexSet};
pub use crate::set_graph::SetGraph;

pub use crate::AtomicExt;
pub use crate::Error;

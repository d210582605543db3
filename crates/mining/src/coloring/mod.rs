//! Parallel Δ+1 graph coloring.
//!
//! All algorithms in this module share the same contract: given a
//! directed CSR graph (typically produced by [`crate::direction::induce_direction`]
//! over a degeneracy ordering, so that `Δ` is tight), they return a
//! [`Coloring`] assigning each vertex a color in `[1, Δ+1]` such that no
//! two neighbors (in either direction of the original undirected graph)
//! share a color.
//!
//! The algorithms differ only in how they resolve concurrent conflicts
//! and how many rounds they need; see [`barenboim`], [`elkin`],
//! [`johansson`], [`jones_plassmann`] and [`dense_sparse`].

pub mod barenboim;
pub mod dense_sparse;
pub mod elkin;
pub mod johansson;
pub mod jones_plassmann;
pub mod verify;

use graph_builder::index::Idx;
use graph_builder::prelude::DirectedCsrGraph;

/// The result of a coloring run: `colors[v]` is the color assigned to
/// vertex `v`, always in `[1, chromatic_palette_size]`.
#[derive(Clone, Debug)]
pub struct Coloring<NI: Idx> {
    colors: Vec<u32>,
    _marker: std::marker::PhantomData<NI>,
}

impl<NI: Idx> Coloring<NI> {
    pub(crate) fn new(colors: Vec<u32>) -> Self {
        Coloring {
            colors,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn color(&self, v: NI) -> u32 {
        self.colors[v.index()]
    }

    pub fn colors(&self) -> &[u32] {
        &self.colors
    }

    pub fn node_count(&self) -> usize {
        self.colors.len()
    }

    /// The number of distinct colors actually used, i.e. `max(colors) + 1`.
    pub fn color_count(&self) -> u32 {
        self.colors.iter().copied().max().map_or(0, |c| c + 1)
    }
}

/// Identifies which coloring algorithm a driver should run; used by the
/// CLI and by benchmarks to select among the family uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ColoringAlgorithm {
    Barenboim,
    Elkin,
    Johansson,
    JonesPlassmannV1,
    JonesPlassmannV3,
    JonesPlassmannV4,
    DenseSparse,
}

/// Shared configuration knobs across the coloring family. Individual
/// algorithms additionally accept their own `*Config` type for
/// algorithm-specific parameters (e.g. [`barenboim::BarenboimConfig`]).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct ColoringConfig {
    #[cfg_attr(feature = "clap", clap(long, value_enum, default_value_t = ColoringAlgorithm::Barenboim))]
    pub algorithm: ColoringAlgorithm,
    #[cfg_attr(feature = "clap", clap(long, default_value_t = 0x5eed_0000_0001))]
    pub seed: u64,
}

impl Default for ColoringConfig {
    fn default() -> Self {
        ColoringConfig {
            algorithm: ColoringAlgorithm::Barenboim,
            seed: 0x5eed_0000_0001,
        }
    }
}

/// Degree-bounded palette shared by the one-shot algorithms: a sorted
/// vector of candidate colors, shrunk as neighbors commit.
pub(crate) type Palette = Vec<u32>;

pub(crate) fn initial_palette(max_degree: u32) -> Palette {
    (1..=max_degree + 1).collect()
}

pub(crate) fn remove_color(palette: &mut Palette, color: u32) {
    if let Ok(pos) = palette.binary_search(&color) {
        palette.remove(pos);
    }
}

/// Runs the algorithm named by `config.algorithm`, seeding it from
/// `config.seed` and leaving every other per-algorithm knob (e.g.
/// [`barenboim::BarenboimConfig::delta_hat_constant`]) at its default.
/// The CLI and benchmarks use this as their single dispatch point;
/// callers who need to tune those extra knobs call the algorithm
/// function directly with their own `*Config` instead.
pub fn color<NI>(graph: &DirectedCsrGraph<NI>, config: &ColoringConfig) -> Coloring<NI>
where
    NI: Idx,
{
    match config.algorithm {
        ColoringAlgorithm::Barenboim => barenboim::barenboim_coloring(
            graph,
            &barenboim::BarenboimConfig {
                seed: config.seed,
                ..Default::default()
            },
        ),
        ColoringAlgorithm::Elkin => elkin::elkin_coloring(
            graph,
            &elkin::ElkinConfig {
                seed: config.seed,
                ..Default::default()
            },
        ),
        ColoringAlgorithm::Johansson => johansson::johansson_coloring(graph),
        ColoringAlgorithm::JonesPlassmannV1 => jones_plassmann::jones_plassmann_v1(
            graph,
            &jones_plassmann::JonesPlassmannConfig { seed: config.seed },
        ),
        ColoringAlgorithm::JonesPlassmannV3 => jones_plassmann::jones_plassmann_v3(
            graph,
            &jones_plassmann::JonesPlassmannConfig { seed: config.seed },
        ),
        ColoringAlgorithm::JonesPlassmannV4 => jones_plassmann::jones_plassmann_v4(
            graph,
            &jones_plassmann::JonesPlassmannConfig { seed: config.seed },
        ),
        ColoringAlgorithm::DenseSparse => dense_sparse::dense_sparse_coloring(
            graph,
            &dense_sparse::DenseSparseConfig {
                seed: config.seed,
                ..Default::default()
            },
        ),
    }
}

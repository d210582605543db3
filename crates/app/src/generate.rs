//! Synthetic graph generation for `--gen` (§6): uniform-random and
//! Kronecker/R-MAT, the same two families the GAP Benchmark Suite and
//! the Graph500 reference generator offer.

use clap::ValueEnum;
use rand::prelude::*;

use graph_mining::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Generator {
    Uniform,
    Kronecker,
}

/// Recursive-matrix (R-MAT) quadrant probabilities from the Graph500
/// reference generator.
const RMAT_A: f64 = 0.57;
const RMAT_B: f64 = 0.19;
const RMAT_C: f64 = 0.19;

pub fn generate(generator: Generator, scale: u32, avg_degree: usize, seed: u64) -> UndirectedCsrGraph<u64> {
    let node_count = 1u64 << scale;
    let edge_count = node_count as usize * avg_degree;

    let edges: Vec<(u64, u64)> = match generator {
        Generator::Uniform => uniform_edges(node_count, edge_count, seed),
        Generator::Kronecker => kronecker_edges(scale, edge_count, seed),
    };

    GraphBuilder::new().csr_layout(CsrLayout::Deduplicated).edges(edges).build()
}

fn uniform_edges(node_count: u64, edge_count: usize, seed: u64) -> Vec<(u64, u64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..edge_count)
        .map(|_| (rng.gen_range(0..node_count), rng.gen_range(0..node_count)))
        .collect()
}

fn kronecker_edges(scale: u32, edge_count: usize, seed: u64) -> Vec<(u64, u64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..edge_count).map(|_| rmat_edge(scale, &mut rng)).collect()
}

fn rmat_edge(scale: u32, rng: &mut StdRng) -> (u64, u64) {
    let (mut u, mut v) = (0u64, 0u64);
    for level in 0..scale {
        let bit = 1u64 << level;
        let quadrant: f64 = rng.gen();
        let (u_bit, v_bit) = if quadrant < RMAT_A {
            (false, false)
        } else if quadrant < RMAT_A + RMAT_B {
            (false, true)
        } else if quadrant < RMAT_A + RMAT_B + RMAT_C {
            (true, false)
        } else {
            (true, true)
        };
        if u_bit {
            u |= bit;
        }
        if v_bit {
            v |= bit;
        }
    }
    (u, v)
}

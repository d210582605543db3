//! One-shot randomized Δ+1 coloring (Barenboim/Elkin/Kuhn-style pick,
//! commit, palette-update rounds), §4.5.2.
//!
//! Operates on a directed CSR graph oriented by rank (produced by
//! [`crate::direction::induce_direction`]): out-neighbors of `v` are
//! exactly the neighbors ranked after `v`. A round only has `v` check
//! its out-neighbors for a tentative-color collision, which is enough
//! for the commit step to be race-free without any locking, since each
//! undirected edge is examined by exactly one of its two endpoints.

use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};
use std::time::Instant;

use log::info;
use nanorand::Rng;
use parking_lot::Mutex;
use rayon::prelude::*;

use graph_builder::index::Idx;
use graph_builder::prelude::*;

use crate::coloring::{initial_palette, remove_color, Coloring, Palette};

/// Tuning knobs for the one-shot Barenboim driver.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct BarenboimConfig {
    /// The `c` constant in the high/low-degree split threshold
    /// `c · log n`. Left at its literature default; never re-derived.
    #[cfg_attr(feature = "clap", clap(long, default_value_t = BarenboimConfig::DEFAULT_DELTA_HAT_CONSTANT))]
    pub delta_hat_constant: u32,
    #[cfg_attr(feature = "clap", clap(long, default_value_t = 0x5eed_0000_0002))]
    pub seed: u64,
}

impl BarenboimConfig {
    pub const DEFAULT_DELTA_HAT_CONSTANT: u32 = 1;
}

impl Default for BarenboimConfig {
    fn default() -> Self {
        BarenboimConfig {
            delta_hat_constant: Self::DEFAULT_DELTA_HAT_CONSTANT,
            seed: 0x5eed_0000_0002,
        }
    }
}

/// Runs the Barenboim one-shot coloring driver to completion: a fixed
/// number of global rounds, followed by a high/low-degree split, each
/// running its own batch of rounds, and finally an exhaustive fallback
/// loop to color any stragglers.
pub fn barenboim_coloring<NI>(graph: &DirectedCsrGraph<NI>, config: &BarenboimConfig) -> Coloring<NI>
where
    NI: Idx,
{
    let start = Instant::now();
    let n = graph.node_count().index();

    let degree = |v: usize| -> u32 {
        (graph.out_degree(NI::new(v)).index() + graph.in_degree(NI::new(v)).index()) as u32
    };
    let max_degree = (0..n).map(degree).max().unwrap_or(0);

    let colors: Vec<AtomicU32> = (0..n).map(|_| AtomicU32::new(0)).collect();
    let palettes: Vec<Mutex<Palette>> = (0..n)
        .map(|v| Mutex::new(initial_palette(degree(v))))
        .collect();
    let _ = max_degree;

    let mut uncolored: Vec<usize> = (0..n).collect();

    let global_rounds = if max_degree > 1 {
        (((max_degree as f64).ln() / (16.0f64 / 15.0).ln()).ceil() as usize).max(1)
    } else {
        1
    };

    for round in 0..global_rounds {
        if uncolored.is_empty() {
            break;
        }
        run_round(graph, &colors, &palettes, &uncolored, config.seed ^ round as u64);
        uncolored.retain(|&v| colors[v].load(AtomicOrdering::Relaxed) == 0);
    }

    if !uncolored.is_empty() {
        let log_n = (n as f64).max(2.0).ln();
        let threshold = (config.delta_hat_constant as f64 * log_n).ceil() as u32;

        let (mut high, mut low): (Vec<usize>, Vec<usize>) = uncolored
            .iter()
            .partition(|&&v| remaining_degree(graph, &colors, v) > threshold);

        let delta_hat = high
            .iter()
            .chain(low.iter())
            .map(|&v| remaining_degree(graph, &colors, v))
            .max()
            .unwrap_or(1)
            .max(1);
        let split_rounds = (((5.0 * (delta_hat as f64).ln()) / (4.0f64 / 3.0).ln()).ceil() as usize).max(1);

        for round in 0..split_rounds {
            if high.is_empty() {
                break;
            }
            run_round(graph, &colors, &palettes, &high, config.seed ^ 0xA ^ round as u64);
            high.retain(|&v| colors[v].load(AtomicOrdering::Relaxed) == 0);
        }
        for round in 0..split_rounds {
            if low.is_empty() {
                break;
            }
            run_round(graph, &colors, &palettes, &low, config.seed ^ 0xB ^ round as u64);
            low.retain(|&v| colors[v].load(AtomicOrdering::Relaxed) == 0);
        }

        uncolored = high.into_iter().chain(low).collect();
    }

    // Exhaustive fallback: guaranteed to terminate because every round
    // colors at least one vertex once the palette-shrink invariant has
    // kicked in (neighbors keep removing each other's committed colors).
    let mut fallback_round = 0u64;
    while !uncolored.is_empty() {
        run_round(
            graph,
            &colors,
            &palettes,
            &uncolored,
            config.seed ^ 0xC ^ fallback_round,
        );
        uncolored.retain(|&v| colors[v].load(AtomicOrdering::Relaxed) == 0);
        fallback_round += 1;
    }

    let final_colors: Vec<u32> = colors
        .into_iter()
        .map(|c| c.load(AtomicOrdering::Relaxed) - 1)
        .collect();

    info!(
        "Barenboim coloring of {} nodes used {} colors in {:?}",
        n,
        final_colors.iter().copied().max().map_or(0, |c| c + 1),
        start.elapsed()
    );

    Coloring::new(final_colors)
}

fn remaining_degree<NI: Idx>(
    graph: &DirectedCsrGraph<NI>,
    colors: &[AtomicU32],
    v: usize,
) -> u32 {
    let out = graph
        .out_neighbors(NI::new(v))
        .filter(|&&u| colors[u.index()].load(AtomicOrdering::Relaxed) == 0)
        .count();
    let in_ = graph
        .in_neighbors(NI::new(v))
        .filter(|&&u| colors[u.index()].load(AtomicOrdering::Relaxed) == 0)
        .count();
    (out + in_) as u32
}

pub(crate) fn run_round<NI: Idx>(
    graph: &DirectedCsrGraph<NI>,
    colors: &[AtomicU32],
    palettes: &[Mutex<Palette>],
    candidates: &[usize],
    seed: u64,
) {
    // Pick: each candidate chooses a color from its own palette.
    let chosen: Vec<u32> = candidates
        .par_iter()
        .map(|&v| {
            let palette = palettes[v].lock();
            if palette.is_empty() {
                0
            } else {
                let mut rng = nanorand::WyRand::new_seed(seed ^ v as u64);
                palette[rng.generate_range(0..palette.len())]
            }
        })
        .collect();

    // Commit: v only looks at out-neighbors (ranked after v), so each
    // undirected edge is checked from exactly one side.
    candidates
        .par_iter()
        .zip(chosen.par_iter())
        .for_each(|(&v, &c)| {
            if c == 0 || colors[v].load(AtomicOrdering::Relaxed) != 0 {
                return;
            }
            let conflict = graph.out_neighbors(NI::new(v)).any(|&u| {
                let idx = candidates.binary_search(&u.index());
                idx.is_ok() && chosen[idx.unwrap()] == c
            });
            if !conflict {
                colors[v].store(c, AtomicOrdering::Relaxed);
            }
        });

    // Palette update: drop newly committed neighbor colors.
    candidates.par_iter().for_each(|&v| {
        if colors[v].load(AtomicOrdering::Relaxed) != 0 {
            return;
        }
        let mut palette = palettes[v].lock();
        for &u in graph.out_neighbors(NI::new(v)) {
            let uc = colors[u.index()].load(AtomicOrdering::Relaxed);
            if uc != 0 {
                remove_color(&mut palette, uc);
            }
        }
        for &u in graph.in_neighbors(NI::new(v)) {
            let uc = colors[u.index()].load(AtomicOrdering::Relaxed);
            if uc != 0 {
                remove_color(&mut palette, uc);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coloring::verify::verify_coloring;
    use crate::direction::induce_direction;
    use crate::ordering::degeneracy_ordering;

    fn directed_triangle() -> DirectedCsrGraph<usize> {
        let graph: UndirectedCsrGraph<usize> = GraphBuilder::new()
            .csr_layout(CsrLayout::Sorted)
            .edges(vec![(0, 1), (1, 2), (0, 2)])
            .build();
        let ordering = degeneracy_ordering(&graph);
        induce_direction(&graph, &ordering)
    }

    #[test]
    fn colors_triangle_properly() {
        let directed = directed_triangle();
        let coloring = barenboim_coloring(&directed, &BarenboimConfig::default());
        assert!(verify_coloring(&directed, &coloring));
        assert!(coloring.color_count() <= 4);
    }

    #[test]
    fn colors_wheel_properly() {
        let graph: UndirectedCsrGraph<usize> = GraphBuilder::new()
            .csr_layout(CsrLayout::Sorted)
            .edges(vec![
                (0, 1),
                (0, 2),
                (0, 3),
                (0, 4),
                (0, 5),
                (0, 6),
                (1, 2),
                (2, 3),
                (3, 4),
                (4, 5),
                (5, 6),
                (6, 1),
            ])
            .build();
        let ordering = degeneracy_ordering(&graph);
        let directed = induce_direction(&graph, &ordering);
        let coloring = barenboim_coloring(&directed, &BarenboimConfig::default());
        assert!(verify_coloring(&directed, &coloring));
    }
}

//! Elkin-style multi-trial one-shot coloring (§4.5.3): each uncolored
//! vertex samples *every* palette color independently with probability
//! `p_i = (d_i + εΔ) / ((d_i + 1) · |palette|)`, instead of Barenboim's
//! single pick, and commits the minimum surviving candidate. An
//! "effective degree" `d_i` is shrunk each round by a fixed schedule;
//! the driver stops once a round makes no progress and hands the
//! remainder to [`crate::coloring::barenboim`].

use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};
use std::time::Instant;

use log::info;
use nanorand::Rng;
use parking_lot::Mutex;
use rayon::prelude::*;

use graph_builder::index::Idx;
use graph_builder::prelude::*;

use crate::coloring::barenboim::run_round as barenboim_run_round;
use crate::coloring::{initial_palette, remove_color, Coloring, Palette};

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct ElkinConfig {
    #[cfg_attr(feature = "clap", clap(long, default_value_t = 0.1))]
    pub epsilon: f64,
    #[cfg_attr(feature = "clap", clap(long, default_value_t = 32))]
    pub max_rounds: usize,
    #[cfg_attr(feature = "clap", clap(long, default_value_t = 0x5eed_0000_0003))]
    pub seed: u64,
}

impl Default for ElkinConfig {
    fn default() -> Self {
        ElkinConfig {
            epsilon: 0.1,
            max_rounds: 32,
            seed: 0x5eed_0000_0003,
        }
    }
}

pub fn elkin_coloring<NI>(graph: &DirectedCsrGraph<NI>, config: &ElkinConfig) -> Coloring<NI>
where
    NI: Idx,
{
    let start = Instant::now();
    let n = graph.node_count().index();

    let degree = |v: usize| -> u32 {
        (graph.out_degree(NI::new(v)).index() + graph.in_degree(NI::new(v)).index()) as u32
    };
    let max_degree = (0..n).map(degree).max().unwrap_or(0);

    // Rescale the configured epsilon into [0.5, 1), the range the
    // probability formula below requires; mirrors the original's
    // halve-or-double loop rather than trusting an out-of-range default.
    let mut epsilon = if config.epsilon > 0.0 { config.epsilon } else { 0.5 };
    while epsilon >= 1.0 {
        epsilon /= 2.0;
    }
    while epsilon < 0.5 {
        epsilon *= 2.0;
    }

    let colors: Vec<AtomicU32> = (0..n).map(|_| AtomicU32::new(0)).collect();
    let palettes: Vec<Mutex<Palette>> = (0..n)
        .map(|v| Mutex::new(initial_palette(degree(v))))
        .collect();
    let effective_degree: Vec<AtomicU32> = (0..n).map(|v| AtomicU32::new(degree(v))).collect();

    let mut uncolored: Vec<usize> = (0..n).collect();
    let mut round = 0usize;

    loop {
        if uncolored.is_empty() || round >= config.max_rounds {
            break;
        }
        let colored_before = n - uncolored.len();

        let chosen: Vec<Option<u32>> = uncolored
            .par_iter()
            .map(|&v| {
                let palette = palettes[v].lock();
                if palette.is_empty() {
                    return None;
                }
                let d = effective_degree[v].load(AtomicOrdering::Relaxed) as f64;
                let p = ((d + epsilon * max_degree as f64)
                    / ((d + 1.0) * palette.len() as f64))
                    .clamp(0.0, 1.0);

                let mut rng = nanorand::WyRand::new_seed(config.seed ^ (v as u64) ^ (round as u64) << 32);
                let candidates: Vec<u32> = palette
                    .iter()
                    .copied()
                    .filter(|_| rng.generate::<f64>() < p)
                    .collect();
                candidates.into_iter().min()
            })
            .collect();

        uncolored.par_iter().zip(chosen.par_iter()).for_each(|(&v, &c)| {
            let Some(c) = c else { return };
            if colors[v].load(AtomicOrdering::Relaxed) != 0 {
                return;
            }
            let conflict = graph.out_neighbors(NI::new(v)).any(|&u| {
                let idx = uncolored.binary_search(&u.index());
                idx.is_ok() && chosen[idx.unwrap()] == Some(c)
            });
            if !conflict {
                colors[v].store(c, AtomicOrdering::Relaxed);
            }
        });

        uncolored.par_iter().for_each(|&v| {
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
            effective_degree[v].fetch_update(AtomicOrdering::Relaxed, AtomicOrdering::Relaxed, |d| {
                Some(d.saturating_sub(d / 4 + 1))
            }).ok();
        });

        uncolored.retain(|&v| colors[v].load(AtomicOrdering::Relaxed) == 0);
        round += 1;

        if n - uncolored.len() == colored_before {
            // Zero progress this round: hand the remainder to Barenboim.
            break;
        }
    }

    // Hand any remainder to the Barenboim one-shot primitive, reusing the
    // same color/palette arrays so ids need no remapping.
    let mut fallback_round = 0u64;
    while !uncolored.is_empty() {
        barenboim_run_round(
            graph,
            &colors,
            &palettes,
            &uncolored,
            config.seed ^ 0xE1_1E ^ fallback_round,
        );
        uncolored.retain(|&v| colors[v].load(AtomicOrdering::Relaxed) == 0);
        fallback_round += 1;
    }

    let final_colors: Vec<u32> = colors
        .iter()
        .map(|c| c.load(AtomicOrdering::Relaxed) - 1)
        .collect();

    info!(
        "Elkin coloring of {} nodes used {} colors in {:?}",
        n,
        final_colors.iter().copied().max().map_or(0, |c| c + 1),
        start.elapsed()
    );

    Coloring::new(final_colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coloring::verify::verify_coloring;
    use crate::direction::induce_direction;
    use crate::ordering::degeneracy_ordering;

    #[test]
    fn colors_k4_properly() {
        let graph: UndirectedCsrGraph<usize> = GraphBuilder::new()
            .csr_layout(CsrLayout::Sorted)
            .edges(vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)])
            .build();
        let ordering = degeneracy_ordering(&graph);
        let directed = induce_direction(&graph, &ordering);
        let coloring = elkin_coloring(&directed, &ElkinConfig::default());
        assert!(verify_coloring(&directed, &coloring));
        assert!(coloring.color_count() <= 4);
    }
}

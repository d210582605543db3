//! k-clique counting over a directed (rank-oriented) CSR graph.
//!
//! The directed orientation (§4.4.3) means any `k`-clique's vertices,
//! sorted by rank, form a path of forward edges; the [`danisch`]
//! kernel exploits this to recurse downward in `k` while only ever
//! following out-edges, cutting the search space by roughly `k!`
//! relative to an undirected search.

pub mod danisch;
pub mod drivers;
pub mod verify;

/// Configuration shared by every k-clique counting driver.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct KCliqueConfig {
    #[cfg_attr(feature = "clap", clap(long, value_enum, default_value_t = crate::kclique::drivers::KCliqueDriver::NodeParallel))]
    pub driver: drivers::KCliqueDriver,
}

impl Default for KCliqueConfig {
    fn default() -> Self {
        KCliqueConfig {
            driver: drivers::KCliqueDriver::NodeParallel,
        }
    }
}

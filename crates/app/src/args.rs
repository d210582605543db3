//! Global CLI flags shared by every subcommand (§6).

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Args;

use crate::generate::Generator;

#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Load the graph from an edge-list file instead of generating one.
    #[arg(short = 'f', long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Synthesize a graph instead of loading one from `--file`.
    #[arg(short = 'g', long, value_enum, requires = "scale")]
    pub gen: Option<Generator>,

    /// log2 of the synthetic graph's vertex count.
    #[arg(long, value_name = "N")]
    pub scale: Option<u32>,

    /// Average degree of a synthesized graph.
    #[arg(long, default_value_t = 16)]
    pub deg: usize,

    /// Do not symmetrize a directed edge-list file (default: symmetrize).
    #[arg(short = 'u', long)]
    pub undirected: bool,

    /// Run the verifier after every trial.
    #[arg(short = 'v', long)]
    pub verify: bool,

    /// Worker thread count; defaults to the available parallelism.
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Trial repetitions.
    #[arg(short = 'n', long = "num-trials", default_value_t = 1)]
    pub num_trials: usize,

    /// Kernel-specific named parameters: `name=value,name2=value2`.
    #[arg(short = 'p', long = "param", value_delimiter = ',', value_parser = parse_param)]
    pub param: Vec<(String, String)>,

    /// Seed for synthetic generation and any kernel randomness not
    /// otherwise configured by its own `*Config`.
    #[arg(long, default_value_t = 0x5eed_0000_0001)]
    pub seed: u64,
}

impl CommonArgs {
    pub fn params(&self) -> HashMap<String, String> {
        self.param.iter().cloned().collect()
    }
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{raw}`"))?;
    Ok((name.to_owned(), value.to_owned()))
}

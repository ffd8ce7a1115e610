#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

use adn_config::Opts;
use adn_graph::{Plan, chain_optimize, display_chain};
use clap::Parser as _;
use std::{
    io::{self, Write},
    path::PathBuf,
};

pub mod chain;
pub mod utils;

/// Result type for the driver.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// An error that aborts a driver run.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("couldn't read {0}: {1}")]
    Read(PathBuf, #[source] io::Error),
    #[error("couldn't parse {0}: {1}")]
    Yaml(PathBuf, #[source] serde_yaml::Error),
    #[error("couldn't parse {0}: {1}")]
    Json(PathBuf, #[source] serde_json::Error),
    #[error("invalid chain: {0}")]
    InvalidChain(String),
    #[error("no properties for `{element}`: pass `--property-dir` or give them inline")]
    MissingProperties { element: String },
    #[error(transparent)]
    Analysis(#[from] adn_analysis::AnalysisError),
    #[error(transparent)]
    Optimize(#[from] adn_graph::OptimizeError),
    #[error("couldn't write the plan: {0}")]
    Emit(#[from] io::Error),
}

pub fn parse_args<I, T>(itr: I) -> Result<Opts, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Opts::try_parse_from(itr)
}

/// Loads the chain named by `opts` and optimizes it.
pub fn optimize(opts: &Opts) -> Result<Plan> {
    let chain = chain::load_chain(&opts.input, opts.property_dir.as_deref())?;
    if opts.verbose {
        eprintln!("{}", display_chain(&chain));
    }
    Ok(chain_optimize(chain, opts.path, &opts.optimizer_config())?)
}

/// Runs the optimizer and prints the plan to stdout as JSON.
pub fn run_optimizer(opts: &Opts) -> Result<()> {
    let plan = optimize(opts)?;
    let json = if opts.pretty_json {
        serde_json::to_string_pretty(&plan)
    } else {
        serde_json::to_string(&plan)
    }
    .map_err(io::Error::from)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{json}")?;
    Ok(())
}

//! ADN CLI arguments.

use crate::{EquivalenceLevel, OptimizerConfig, Strategy, TrafficPath};
use std::path::PathBuf;

#[cfg(feature = "clap")]
use clap::{Parser, ValueHint};

/// Element chain placement optimizer.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "clap", derive(Parser))]
#[cfg_attr(feature = "clap", command(name = "adn", version, arg_required_else_help = true))]
#[allow(clippy::manual_non_exhaustive)]
pub struct Opts {
    /// Chain description to optimize, in JSON or YAML.
    #[cfg_attr(feature = "clap", arg(value_hint = ValueHint::FilePath))]
    pub input: PathBuf,
    /// Directory holding `<element>.yaml` property files for elements without inline properties.
    #[cfg_attr(
        feature = "clap",
        arg(help_heading = "Input options", long, short = 'P', value_hint = ValueHint::DirPath)
    )]
    pub property_dir: Option<PathBuf>,

    /// Traffic direction to optimize.
    #[cfg_attr(feature = "clap", arg(long, value_enum, default_value_t))]
    pub path: TrafficPath,
    /// Equivalence level every accepted transformation must satisfy.
    #[cfg_attr(feature = "clap", arg(long, short = 'O', value_enum, default_value_t))]
    pub level: EquivalenceLevel,
    /// Optimization strategy.
    #[cfg_attr(feature = "clap", arg(long, value_enum, default_value_t))]
    pub strategy: Strategy,
    /// Maximum number of moves the reorderer may accept.
    #[cfg_attr(
        feature = "clap",
        arg(long, default_value_t = OptimizerConfig::DEFAULT_MAX_MOVES)
    )]
    pub max_moves: usize,
    /// Longest chain the exhaustive strategy accepts.
    #[cfg_attr(
        feature = "clap",
        arg(long, default_value_t = OptimizerConfig::DEFAULT_MAX_EXHAUSTIVE_LEN)
    )]
    pub max_exhaustive_len: usize,

    /// Use verbose output.
    #[cfg_attr(feature = "clap", arg(help_heading = "Display options", long, short))]
    pub verbose: bool,
    /// Pretty-print JSON output.
    #[cfg_attr(feature = "clap", arg(help_heading = "Display options", long))]
    pub pretty_json: bool,

    // Allows `Opts { x: y, ..Default::default() }`.
    #[doc(hidden)]
    #[cfg_attr(feature = "clap", arg(skip))]
    pub _non_exhaustive: (),
}

impl Default for Opts {
    fn default() -> Self {
        let config = OptimizerConfig::default();
        Self {
            input: PathBuf::new(),
            property_dir: None,
            path: TrafficPath::default(),
            level: config.level,
            strategy: config.strategy,
            max_moves: config.max_moves,
            max_exhaustive_len: config.max_exhaustive_len,
            verbose: false,
            pretty_json: false,
            _non_exhaustive: (),
        }
    }
}

impl Opts {
    /// Returns the optimizer configuration selected on the command line.
    pub fn optimizer_config(&self) -> OptimizerConfig {
        OptimizerConfig {
            level: self.level,
            strategy: self.strategy,
            max_moves: self.max_moves,
            max_exhaustive_len: self.max_exhaustive_len,
            ..Default::default()
        }
    }
}

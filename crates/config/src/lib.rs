#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

use serde::{Deserialize, Serialize};
use std::path::Path;

#[macro_use]
mod macros;

mod opts;
pub use opts::Opts;

config_enum! {
    /// How strictly a chain transformation must preserve observable behavior.
    #[derive(Default)]
    #[strum(serialize_all = "lowercase")]
    pub enum EquivalenceLevel {
        /// Every position-valid transformation is accepted.
        ///
        /// Only useful for deployment experiments that intentionally break semantics.
        Ignore,
        /// Read lineages must match. Drop and record observability may change.
        #[default]
        Weak,
        /// Both read and record lineages must match.
        Strong,
    }
}

config_enum! {
    /// Traffic direction analyzed independently by the optimizer.
    #[derive(Default)]
    #[strum(serialize_all = "lowercase")]
    pub enum TrafficPath {
        #[default]
        Request,
        Response,
    }
}

config_enum! {
    /// Global optimization strategy.
    #[derive(Default)]
    #[strum(serialize_all = "lowercase")]
    pub enum Strategy {
        /// Local-search reordering followed by placement gathering.
        #[default]
        Heuristic,
        /// Minimum-cost search over every permutation. Only tractable for short chains.
        Exhaustive,
    }
}

config_enum! {
    /// Serialization format of chain and property files.
    #[strum(serialize_all = "lowercase")]
    pub enum ChainFormat {
        Json,
        #[strum(serialize = "yaml", serialize = "yml")]
        Yaml,
    }
}

impl ChainFormat {
    /// Guesses the format from a file extension. Anything unrecognized is JSON.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.to_ascii_lowercase().parse().ok())
            .unwrap_or(Self::Json)
    }
}

config_enum! {
    /// Where an element executes.
    #[derive(Default)]
    pub enum Site {
        /// Pinned to the client sidecar.
        #[strum(to_string = "client", serialize = "C")]
        Client,
        /// Pinned to the server sidecar.
        #[strum(to_string = "server", serialize = "S")]
        Server,
        /// The client/server boundary marker.
        #[strum(to_string = "network", serialize = "N")]
        Network,
        /// Free to run on either side.
        #[default]
        #[strum(to_string = "dontcare", serialize = "C/S", serialize = "none")]
        DontCare,
    }
}

config_enum! {
    /// Consistency requirement of an element's state.
    #[derive(Default)]
    pub enum Consistency {
        #[default]
        #[strum(to_string = "eventual", serialize = "weak", serialize = "none")]
        Eventual,
        #[strum(to_string = "strong")]
        Strong,
    }
}

config_enum! {
    /// Where strongly consistent state is replicated, if anywhere.
    #[derive(Default)]
    #[strum(serialize_all = "snake_case")]
    pub enum StateDependence {
        ClientReplica,
        ServerReplica,
        #[default]
        #[strum(to_string = "none")]
        Independent,
    }
}

/// Weights of the deployment cost model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostWeights {
    /// Cost of running one element at full workload.
    pub element: f64,
    /// Cost of the network hop at full workload.
    pub network: f64,
    /// Fraction of the workload removed by each drop or block element.
    pub drop: f64,
    /// Penalty for strongly consistent state that is not replicated on its side.
    pub strong: f64,
    /// Fixed overhead of deploying anything on a side.
    pub deploy: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self { element: 1.0, network: 1.0, drop: 0.1, strong: 5.0, deploy: 5.0 }
    }
}

/// Optimizer settings, passed explicitly to every pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub level: EquivalenceLevel,
    pub strategy: Strategy,
    pub weights: CostWeights,
    /// Maximum number of moves the reorderer may accept before giving up.
    pub max_moves: usize,
    /// Longest chain the exhaustive optimizer accepts, network marker included.
    pub max_exhaustive_len: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            level: EquivalenceLevel::default(),
            strategy: Strategy::default(),
            weights: CostWeights::default(),
            max_moves: Self::DEFAULT_MAX_MOVES,
            max_exhaustive_len: Self::DEFAULT_MAX_EXHAUSTIVE_LEN,
        }
    }
}

impl OptimizerConfig {
    /// Default for [`max_moves`](Self::max_moves).
    pub const DEFAULT_MAX_MOVES: usize = 10_000;
    /// Default for [`max_exhaustive_len`](Self::max_exhaustive_len).
    pub const DEFAULT_MAX_EXHAUSTIVE_LEN: usize = 8;

    /// Creates a configuration with the given equivalence level and default everything else.
    pub fn with_level(level: EquivalenceLevel) -> Self {
        Self { level, ..Default::default() }
    }
}

/// Field-effect analysis settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Name of the variable bound to the in-flight RPC message.
    pub rpc_target: String,
    /// Elements whose reads are observations only (telemetry sinks).
    pub recording_elements: Vec<String>,
    /// Functions that return random values.
    pub random_sources: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            rpc_target: "rpc".into(),
            recording_elements: vec!["logging".into(), "metrics".into()],
            random_sources: vec!["randomf".into(), "randomi".into()],
        }
    }
}

impl AnalysisConfig {
    /// Returns `true` if `name` only records what it reads.
    pub fn is_recording(&self, name: &str) -> bool {
        self.recording_elements.iter().any(|e| e == name)
    }

    /// Returns `true` if calling `name` yields a random value.
    pub fn is_random_source(&self, name: &str) -> bool {
        self.random_sources.iter().any(|f| f == name)
    }
}

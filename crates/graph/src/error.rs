use adn_analysis::AnalysisError;
use adn_config::TrafficPath;

/// Result type for the graph crate.
pub type Result<T, E = OptimizeError> = std::result::Result<T, E>;

/// An error that aborts the optimization of a chain.
#[derive(Debug, thiserror::Error)]
pub enum OptimizeError {
    #[error("element `{element}` lists field `{field}` twice in its {path} {set} set")]
    DuplicateField { element: String, path: TrafficPath, set: &'static str, field: String },
    #[error("chain has no network element")]
    MissingNetwork,
    #[error("chain has {count} network elements, expected exactly one")]
    MultipleNetwork { count: usize },
    #[error("placement is invalid: {chain}")]
    InvalidPlacement { chain: String },
    #[error("reordering the {path} chain did not converge after {moves} moves")]
    MoveBudgetExhausted { path: TrafficPath, moves: usize },
    #[error("chain of {len} elements is too long for exhaustive search (at most {max})")]
    ChainTooLong { len: usize, max: usize },
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

use adn_config::TrafficPath;
use std::{io, path::PathBuf};

/// Result type for the analysis crate.
pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;

/// An error that occurred while computing or loading element properties.
///
/// None of these are recoverable: a wrong effect set makes every later equivalence proof unsound.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("malformed IR: {node} {context}")]
    MalformedIr { node: &'static str, context: String },
    #[error("cannot resolve the target of `{expr}`: {method} must be called on a named variable")]
    UnresolvableTarget { method: &'static str, expr: String },
    #[error("unsupported: {feature} on `{target}`")]
    UnsupportedFeature { feature: &'static str, target: String },
    #[error("couldn't read {0}: {1}")]
    ReadProperties(PathBuf, #[source] io::Error),
    #[error("couldn't parse {0}: {1}")]
    ParseYaml(PathBuf, #[source] serde_yaml::Error),
    #[error("couldn't parse {0}: {1}")]
    ParseJson(PathBuf, #[source] serde_json::Error),
    #[error("invalid properties for `{element}`: {reason}")]
    InvalidProperties { element: String, reason: String },
    #[error("in element `{element}` ({path} path)")]
    Element {
        element: String,
        path: TrafficPath,
        #[source]
        source: Box<AnalysisError>,
    },
    #[error("in the state of element `{element}`")]
    State {
        element: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    pub(crate) fn malformed(node: &'static str, context: impl Into<String>) -> Self {
        Self::MalformedIr { node, context: context.into() }
    }

    /// Attaches the element and path being analyzed.
    pub(crate) fn in_element(self, element: &str, path: TrafficPath) -> Self {
        Self::Element { element: element.into(), path, source: Box::new(self) }
    }

    /// Attaches the element whose state declarations are being analyzed.
    pub(crate) fn in_state_of(self, element: &str) -> Self {
        Self::State { element: element.into(), source: Box::new(self) }
    }
}

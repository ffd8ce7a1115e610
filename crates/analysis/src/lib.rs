#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

// Convenience re-exports.
pub use adn_ir as ir;

pub mod analyzer;

mod error;
pub use error::{AnalysisError, Result};

pub mod field;
pub use field::{Field, FieldSet};

mod flow;
pub use flow::{analyze_element, forward_direction};

mod loader;
pub use loader::{load_properties, read_property_file};

mod props;
pub use props::{Effects, ElementProps, ElementState, PathEffects};

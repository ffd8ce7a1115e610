#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

// Convenience re-exports.
pub use adn_analysis as analysis;

// Used in integration tests. See `../tests/properties.rs`.
#[cfg(test)]
use rand as _;

mod cost;
pub use cost::{ExhaustiveOptimizer, ExhaustiveStats, cost, cost_chain_optimize};

mod element;
pub use element::{DisplayChain, Element, display_chain, network_position};

mod equivalence;
pub use equivalence::{Oracle, equivalent, init_dependency, position_valid};

mod error;
pub use error::{OptimizeError, Result};

mod gather;
pub use gather::{Placement, gather, placement};

pub mod lineage;
pub use lineage::{Lineage, Reader, Writer, gen_dependency, known_fields};

mod pipeline;
pub use pipeline::chain_optimize;

mod reorder;
pub use reorder::{ReorderStats, Reorderer, reorder};

mod split;
pub use split::{Plan, split_and_consolidate};

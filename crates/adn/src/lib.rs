#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![allow(unused_crate_dependencies)]

#[doc(inline)]
pub use adn_analysis as analysis;
#[doc(inline)]
pub use adn_config as config;
#[doc(inline)]
pub use adn_graph as graph;
#[doc(inline)]
pub use adn_ir as ir;

#[cfg(feature = "cli")]
#[doc(inline)]
pub use adn_cli as cli;

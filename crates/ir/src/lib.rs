#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod ast;
pub use ast::*;

pub mod pretty;
pub use pretty::Printer;

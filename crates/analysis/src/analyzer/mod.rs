//! Field-effect analyzers.
//!
//! Each analyzer walks a handler body once and matches every IR node kind exhaustively. Adding a
//! node kind to the IR is therefore a compile error here until each analyzer decides what the
//! new kind means for its effect.

use indexmap::IndexMap;
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;

mod resolver;
pub use resolver::{ERROR_NAME, method_target, resolve};

mod read;
pub use read::ReadAnalyzer;

mod write;
pub use write::WriteAnalyzer;

mod copy;
pub use copy::CopyAnalyzer;

mod drop;
pub use drop::DropAnalyzer;

mod alias;
pub use alias::AliasAnalyzer;

/// An [`IndexMap`] using [`FxHasher`] as its hasher.
pub type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Creates a map with an empty entry per target, in target order.
fn target_map<T>(targets: impl IntoIterator<Item = impl Into<String>>) -> FxIndexMap<String, Vec<T>> {
    targets.into_iter().map(|t| (t.into(), Vec::new())).collect()
}

#[cfg(test)]
pub(crate) mod test_utils {
    use adn_ir::{Direction, Expr, MethodKind, Stmt};

    /// `name := rpc.GET('field')`
    pub(crate) fn get_into(name: &str, obj: &str, field: &str) -> Stmt {
        Stmt::assign(name, Expr::get(obj, field))
    }

    /// `obj.SET('field', value)`
    pub(crate) fn set(obj: &str, field: &str, value: Expr) -> Stmt {
        Stmt::Expr(Expr::set(obj, field, value))
    }

    /// `send(name, direction)`
    pub(crate) fn send(name: &str, direction: Direction) -> Stmt {
        Stmt::send(Expr::ident(name), direction)
    }

    /// `send(err('msg'), direction)`
    pub(crate) fn send_err(msg: &str, direction: Direction) -> Stmt {
        Stmt::send(Expr::error(msg), direction)
    }

    /// `obj.DELETE(field)`
    pub(crate) fn delete(obj: &str, field: &str) -> Stmt {
        Stmt::Expr(Expr::method(obj, MethodKind::Delete, vec![Expr::str(field)]))
    }
}

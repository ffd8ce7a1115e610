//! Element IR.
//!
//! The grammar is closed: analyzers match on every kind exhaustively, so adding a node kind is a
//! compile error in each of them until it is handled.

mod expr;
pub use expr::{BinOp, Expr, FuncCall, Lit, MethodCall, MethodKind};

mod stmt;
pub use stmt::{Arm, Assign, Block, Direction, Match, Pattern, Send, Stmt};

mod program;
pub use program::{Handler, Program, StateDecl};

/// An identifier: a state variable, a local temporary, or a function name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[display("{_0}")]
pub struct Ident(pub String);

impl Ident {
    /// Creates a new identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Ident {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Ident {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

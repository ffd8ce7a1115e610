use super::{Expr, Ident};

/// A block of statements.
pub type Block = Vec<Stmt>;

/// A statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// Entry placeholder inserted by the front end. No effect.
    Start,
    /// Exit placeholder inserted by the front end. No effect.
    End,
    /// An explicit no-op.
    Pass,
    /// An assignment to a local: `x := expr`.
    Assign(Assign),
    /// A pattern match: `match expr { pat => { ... } ... }`.
    Match(Match),
    /// A send of a message in a direction: `send(rpc, Down)`.
    Send(Send),
    /// An expression evaluated for its effects.
    Expr(Expr),
}

impl Stmt {
    /// Creates `name := value`.
    pub fn assign(name: &str, value: Expr) -> Self {
        Self::Assign(Assign { left: Ident::new(name), right: value })
    }

    /// Creates a match over `expr` with the given `(pattern, body)` arms.
    pub fn match_(expr: Expr, arms: Vec<(Expr, Block)>) -> Self {
        let arms = arms
            .into_iter()
            .map(|(value, body)| Arm { pattern: Pattern { value }, body })
            .collect();
        Self::Match(Match { expr, arms })
    }

    /// Creates `send(msg, direction)`.
    pub fn send(msg: Expr, direction: Direction) -> Self {
        Self::Send(Send { msg, direction })
    }

    /// Returns `true` for the front end's placeholder statements.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Start | Self::End | Self::Pass)
    }
}

/// An assignment: `left := right`.
#[derive(Clone, Debug, PartialEq)]
pub struct Assign {
    pub left: Ident,
    pub right: Expr,
}

/// A pattern match.
#[derive(Clone, Debug, PartialEq)]
pub struct Match {
    /// The scrutinee.
    pub expr: Expr,
    pub arms: Vec<Arm>,
}

/// A match arm: `pattern => { body }`.
#[derive(Clone, Debug, PartialEq)]
pub struct Arm {
    pub pattern: Pattern,
    pub body: Block,
}

/// A match pattern. Branch conditions are never evaluated statically.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub value: Expr,
}

/// A send statement.
#[derive(Clone, Debug, PartialEq)]
pub struct Send {
    pub msg: Expr,
    pub direction: Direction,
}

/// Direction a message travels in.
///
/// Requests travel `Down` towards the server; responses travel `Up` towards the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr, strum::EnumIs)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn reverse(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Returns the direction name.
    pub fn to_str(self) -> &'static str {
        self.into()
    }
}

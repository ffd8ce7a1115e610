use super::Ident;

/// An expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// A variable reference: `rpc`, `cache`.
    Ident(Ident),
    /// A literal: `'user'`, `42`, `true`.
    Lit(Lit),
    /// A binary operation: `a + b`, `a == b`.
    Binary(Box<Expr>, BinOp, Box<Expr>),
    /// A free function call: `randomf(0, 1)`.
    FuncCall(FuncCall),
    /// A method call on a named target: `rpc.GET('user')`.
    MethodCall(MethodCall),
    /// An error message: `err('forbidden')`.
    Error(Box<Expr>),
}

impl Expr {
    /// Creates an identifier expression.
    pub fn ident(name: &str) -> Self {
        Self::Ident(Ident::new(name))
    }

    /// Creates a string literal expression.
    pub fn str(value: &str) -> Self {
        Self::Lit(Lit::Str(value.into()))
    }

    /// Creates a number literal expression.
    pub fn number(value: impl ToString) -> Self {
        Self::Lit(Lit::Number(value.to_string()))
    }

    /// Creates a boolean literal expression.
    pub fn bool(value: bool) -> Self {
        Self::Lit(Lit::Bool(value))
    }

    /// Creates a binary expression.
    pub fn binary(lhs: Self, op: BinOp, rhs: Self) -> Self {
        Self::Binary(Box::new(lhs), op, Box::new(rhs))
    }

    /// Creates a call to a free function.
    pub fn call(name: &str, args: Vec<Self>) -> Self {
        Self::FuncCall(FuncCall { name: Ident::new(name), args })
    }

    /// Creates a method call on the variable `obj`.
    pub fn method(obj: &str, method: MethodKind, args: Vec<Self>) -> Self {
        Self::MethodCall(MethodCall { obj: Box::new(Self::ident(obj)), method, args })
    }

    /// Creates `obj.GET(field)`.
    pub fn get(obj: &str, field: &str) -> Self {
        Self::method(obj, MethodKind::Get, vec![Self::str(field)])
    }

    /// Creates `obj.SET(field, value)`.
    pub fn set(obj: &str, field: &str, value: Self) -> Self {
        Self::method(obj, MethodKind::Set, vec![Self::str(field), value])
    }

    /// Creates an error message with a string payload.
    pub fn error(msg: &str) -> Self {
        Self::Error(Box::new(Self::str(msg)))
    }

    /// Returns the identifier if this is a plain variable reference.
    pub fn as_ident(&self) -> Option<&Ident> {
        match self {
            Self::Ident(ident) => Some(ident),
            _ => None,
        }
    }

    /// Returns `true` if this is an error message.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// A literal.
#[derive(Clone, Debug, PartialEq)]
pub enum Lit {
    /// A string literal. Contains the unquoted contents.
    Str(String),
    /// An integer or floating-point literal, as written.
    Number(String),
    /// A boolean literal.
    Bool(bool),
}

/// A binary operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
pub enum BinOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    Neq,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Ge,
    #[strum(serialize = "&&")]
    And,
    #[strum(serialize = "||")]
    Or,
}

impl BinOp {
    /// Returns the operator symbol.
    pub fn to_str(self) -> &'static str {
        self.into()
    }
}

/// A free function call: `name(args...)`.
#[derive(Clone, Debug, PartialEq)]
pub struct FuncCall {
    pub name: Ident,
    pub args: Vec<Expr>,
}

/// A method call: `obj.METHOD(args...)`.
///
/// The object must be a plain identifier; anything else is rejected by the analyzers.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodCall {
    pub obj: Box<Expr>,
    pub method: MethodKind,
    pub args: Vec<Expr>,
}

/// The methods every state variable and the RPC message support.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr, strum::EnumIs)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MethodKind {
    Get,
    Set,
    Size,
    Delete,
    ByteSize,
}

impl MethodKind {
    /// Returns the method name as written in the IR: `GET`, `BYTE_SIZE`, ...
    pub fn to_str(self) -> &'static str {
        self.into()
    }
}

use super::{Block, Ident};

/// One element definition as produced by the front end.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    /// Library element name.
    pub name: String,
    /// Declared state variables.
    pub state: Vec<StateDecl>,
    /// Initialization handler.
    pub init: Block,
    /// Request handler.
    pub req: Block,
    /// Response handler.
    pub resp: Block,
}

impl Program {
    /// Creates an empty program named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// Returns the body of the given handler.
    pub fn handler(&self, handler: Handler) -> &Block {
        match handler {
            Handler::Init => &self.init,
            Handler::Request => &self.req,
            Handler::Response => &self.resp,
        }
    }
}

/// A handler of a [`Program`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Handler {
    Init,
    Request,
    Response,
}

/// A state variable declaration with its decorators:
/// `cache: Map<string, string> @consistency(strong) @combiner(LWW) @persistence(true)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateDecl {
    pub name: Ident,
    pub ty: String,
    pub consistency: String,
    pub combiner: String,
    pub persistence: String,
}

impl StateDecl {
    /// Creates an eventually consistent, last-writer-wins, ephemeral declaration.
    pub fn new(name: &str, ty: &str) -> Self {
        Self {
            name: Ident::new(name),
            ty: ty.into(),
            consistency: "eventual".into(),
            combiner: "LWW".into(),
            persistence: "ephemeral".into(),
        }
    }

    /// Sets the consistency decorator.
    pub fn consistency(mut self, consistency: &str) -> Self {
        self.consistency = consistency.into();
        self
    }
}

use super::method_target;
use crate::Result;
use adn_ir::{Expr, Stmt};

/// Tracks the local names that refer to a target.
///
/// Starting from the target itself, `x := e` makes `x` an alias when `e` refers to an alias: a
/// plain reference, an operand of a binary expression, an argument of a function call, or a
/// `GET` on an alias.
///
/// `x := y` with `y` an alias is a rename: `x` is the same value. Every other alias is derived
/// from the target's data, and sending it emits a new message.
#[derive(Clone, Debug)]
pub struct AliasAnalyzer {
    aliases: Vec<String>,
    derived: Vec<String>,
}

impl AliasAnalyzer {
    /// Creates a new analyzer starting from `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Self { aliases: vec![target.into()], derived: Vec::new() }
    }

    /// Returns the aliases found so far. The first one is the target.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Returns the aliases built from the target's data rather than renaming it.
    pub fn derived(&self) -> &[String] {
        &self.derived
    }

    /// Returns the target and its renames.
    pub fn renames(&self) -> impl Iterator<Item = &String> {
        self.aliases.iter().filter(|a| !self.derived.contains(a))
    }

    /// Returns `true` if `name` refers to the target.
    pub fn is_alias(&self, name: &str) -> bool {
        self.aliases.iter().any(|a| a == name)
    }

    /// Visits `block` and returns every alias, the target first.
    pub fn visit_block(&mut self, block: &[Stmt]) -> Result<&[String]> {
        for stmt in block {
            self.visit_stmt(stmt)?;
        }
        Ok(&self.aliases)
    }

    pub fn visit_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Start | Stmt::End | Stmt::Pass | Stmt::Send(_) | Stmt::Expr(_) => {}
            Stmt::Assign(assign) => {
                if self.refers_to_target(&assign.right)? && !self.is_alias(assign.left.as_str()) {
                    let rename = assign.right.as_ident().is_some();
                    trace!(alias = %assign.left, rename, "found alias");
                    self.aliases.push(assign.left.to_string());
                    if !rename {
                        self.derived.push(assign.left.to_string());
                    }
                }
            }
            Stmt::Match(m) => {
                for arm in &m.arms {
                    self.visit_block(&arm.body)?;
                }
            }
        }
        Ok(())
    }

    /// Returns `true` if `expr` evaluates to (part of) the target.
    pub fn refers_to_target(&self, expr: &Expr) -> Result<bool> {
        match expr {
            Expr::Ident(ident) => Ok(self.is_alias(ident.as_str())),
            Expr::Lit(_) | Expr::Error(_) => Ok(false),
            Expr::Binary(lhs, _, rhs) => {
                Ok(self.refers_to_target(lhs)? || self.refers_to_target(rhs)?)
            }
            Expr::FuncCall(call) => {
                for arg in &call.args {
                    if self.refers_to_target(arg)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Expr::MethodCall(call) => {
                let target = method_target(call)?;
                Ok(call.method.is_get() && self.is_alias(target))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::test_utils::*;
    use adn_ir::{BinOp, Direction, MethodKind};

    #[test]
    fn follows_assignments() {
        let body = vec![
            Stmt::assign("r", Expr::ident("rpc")),
            get_into("user", "r", "user"),
            Stmt::assign("n", Expr::binary(Expr::number(1), BinOp::Add, Expr::ident("user"))),
            Stmt::assign("wrapped", Expr::call("wrap", vec![Expr::ident("n")])),
            Stmt::assign("size", Expr::method("rpc", MethodKind::Size, vec![])),
            Stmt::assign("other", Expr::get("cache", "user")),
            send("r", Direction::Down),
        ];
        let mut analyzer = AliasAnalyzer::new("rpc");
        assert_eq!(analyzer.visit_block(&body).unwrap(), ["rpc", "r", "user", "n", "wrapped"]);
        assert!(!analyzer.is_alias("size"));
        assert!(!analyzer.is_alias("other"));
        assert_eq!(analyzer.derived(), ["user", "n", "wrapped"]);
        assert_eq!(analyzer.renames().collect::<Vec<_>>(), ["rpc", "r"]);
    }

    #[test]
    fn aliases_inside_arms() {
        let body = vec![Stmt::match_(
            Expr::get("rpc", "kind"),
            vec![(Expr::str("a"), vec![Stmt::assign("copy", Expr::ident("rpc"))])],
        )];
        let mut analyzer = AliasAnalyzer::new("rpc");
        analyzer.visit_block(&body).unwrap();
        assert!(analyzer.is_alias("copy"));
    }
}

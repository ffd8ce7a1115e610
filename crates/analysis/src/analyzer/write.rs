use super::{FxIndexMap, method_target, resolve, target_map};
use crate::{AnalysisError, Result};
use adn_ir::{Expr, MethodKind, Stmt};

/// Collects `(field, value)` pairs written to each target through `target.SET(field, value)`.
#[derive(Clone, Debug)]
pub struct WriteAnalyzer {
    fields: FxIndexMap<String, Vec<(String, String)>>,
    /// Targets bound to the RPC message itself. Some methods cannot be lowered on them.
    messages: Vec<String>,
}

impl WriteAnalyzer {
    /// Creates a new analyzer tracking `targets`.
    pub fn new(targets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { fields: target_map(targets), messages: Vec::new() }
    }

    /// Marks `targets` as bound to the RPC message.
    pub fn with_messages(mut self, targets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.messages.extend(targets.into_iter().map(Into::into));
        self
    }

    /// Returns the `(field, value)` pairs written to `target`, in visit order.
    pub fn writes(&self, target: &str) -> &[(String, String)] {
        self.fields.get(target).map_or(&[], Vec::as_slice)
    }

    /// Returns the fields written to any target, in visit order.
    pub fn all_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.values().flatten().map(|(field, _)| field.as_str())
    }

    pub fn visit_block(&mut self, block: &[Stmt]) -> Result<bool> {
        let mut write = false;
        for stmt in block {
            write |= self.visit_stmt(stmt)?;
        }
        Ok(write)
    }

    pub fn visit_stmt(&mut self, stmt: &Stmt) -> Result<bool> {
        match stmt {
            Stmt::Start | Stmt::End | Stmt::Pass => Ok(false),
            Stmt::Assign(assign) => self.visit_expr(&assign.right),
            Stmt::Match(m) => {
                let mut write = self.visit_expr(&m.expr)?;
                for arm in &m.arms {
                    write |= self.visit_expr(&arm.pattern.value)?;
                    write |= self.visit_block(&arm.body)?;
                }
                Ok(write)
            }
            Stmt::Send(send) => self.visit_expr(&send.msg),
            Stmt::Expr(expr) => self.visit_expr(expr),
        }
    }

    pub fn visit_expr(&mut self, expr: &Expr) -> Result<bool> {
        match expr {
            Expr::Ident(_) | Expr::Lit(_) => Ok(false),
            Expr::Binary(lhs, _, rhs) => Ok(self.visit_expr(lhs)? | self.visit_expr(rhs)?),
            Expr::FuncCall(call) => self.visit_exprs(&call.args),
            Expr::MethodCall(call) => {
                let target = method_target(call)?;
                match call.method {
                    MethodKind::Set if self.fields.contains_key(target) => {
                        let [field, value] = call.args.as_slice() else {
                            return Err(AnalysisError::malformed(
                                "SET",
                                format!(
                                    "on `{target}` takes 2 arguments but {} were supplied",
                                    call.args.len()
                                ),
                            ));
                        };
                        let pair = (resolve(field), resolve(value));
                        if let Some(writes) = self.fields.get_mut(target) {
                            writes.push(pair);
                        }
                        return Ok(true);
                    }
                    MethodKind::Delete if self.messages.iter().any(|m| m == target) => {
                        return Err(AnalysisError::UnsupportedFeature {
                            feature: "DELETE",
                            target: target.into(),
                        });
                    }
                    MethodKind::Get
                    | MethodKind::Set
                    | MethodKind::Size
                    | MethodKind::Delete
                    | MethodKind::ByteSize => {}
                }
                self.visit_exprs(&call.args)
            }
            Expr::Error(msg) => self.visit_expr(msg),
        }
    }

    fn visit_exprs(&mut self, exprs: &[Expr]) -> Result<bool> {
        let mut write = false;
        for expr in exprs {
            write |= self.visit_expr(expr)?;
        }
        Ok(write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::test_utils::*;
    use adn_ir::Direction;

    #[test]
    fn collects_set_pairs() {
        let body = vec![
            get_into("u", "rpc", "user"),
            set("rpc", "user", Expr::str("anonymous")),
            Stmt::match_(
                Expr::ident("u"),
                vec![(Expr::str("bob"), vec![set("cache", "last", Expr::ident("u"))])],
            ),
            send("rpc", Direction::Down),
        ];
        let mut analyzer = WriteAnalyzer::new(["rpc", "cache"]);
        assert!(analyzer.visit_block(&body).unwrap());
        assert_eq!(analyzer.writes("rpc"), [("user".to_string(), "anonymous".to_string())]);
        assert_eq!(analyzer.writes("cache"), [("last".to_string(), "u".to_string())]);
        assert_eq!(analyzer.all_fields().collect::<Vec<_>>(), ["user", "last"]);
    }

    #[test]
    fn untracked_targets_are_ignored() {
        let body = vec![set("cache", "k", Expr::get("rpc", "v"))];
        let mut analyzer = WriteAnalyzer::new(["rpc"]);
        assert!(!analyzer.visit_block(&body).unwrap());
        assert!(analyzer.writes("rpc").is_empty());
    }

    #[test]
    fn set_arity_is_checked() {
        let body = vec![Stmt::Expr(Expr::method("rpc", MethodKind::Set, vec![Expr::str("user")]))];
        let err = WriteAnalyzer::new(["rpc"]).visit_block(&body).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedIr { node: "SET", .. }), "{err}");
    }

    #[test]
    fn delete_on_message_is_unsupported() {
        let body = vec![delete("rpc", "user")];
        let err = WriteAnalyzer::new(["rpc"]).with_messages(["rpc"]).visit_block(&body).unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedFeature { feature: "DELETE", .. }), "{err}");

        // State variables support DELETE.
        let body = vec![delete("cache", "user")];
        assert!(!WriteAnalyzer::new(["rpc"]).with_messages(["rpc"]).visit_block(&body).unwrap());
    }
}

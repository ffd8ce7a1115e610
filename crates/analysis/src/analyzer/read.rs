use super::{FxIndexMap, method_target, resolve, target_map};
use crate::Result;
use adn_ir::{Expr, Stmt};

/// Collects the fields read from each target through `target.GET(field)`.
///
/// Every visit returns whether the visited node contains a read, so that callers up the
/// expression tree can tell a read apart from a plain reference.
#[derive(Clone, Debug)]
pub struct ReadAnalyzer {
    fields: FxIndexMap<String, Vec<String>>,
}

impl ReadAnalyzer {
    /// Creates a new analyzer tracking `targets`.
    pub fn new(targets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { fields: target_map(targets) }
    }

    /// Returns the fields read from `target`, in visit order.
    pub fn fields(&self, target: &str) -> &[String] {
        self.fields.get(target).map_or(&[], Vec::as_slice)
    }

    /// Returns the fields read from every target, in visit order.
    pub fn all_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.values().flatten().map(String::as_str)
    }

    pub fn visit_block(&mut self, block: &[Stmt]) -> Result<bool> {
        let mut read = false;
        for stmt in block {
            read |= self.visit_stmt(stmt)?;
        }
        Ok(read)
    }

    pub fn visit_stmt(&mut self, stmt: &Stmt) -> Result<bool> {
        match stmt {
            Stmt::Start | Stmt::End | Stmt::Pass => Ok(false),
            Stmt::Assign(assign) => self.visit_expr(&assign.right),
            Stmt::Match(m) => {
                let mut read = self.visit_expr(&m.expr)?;
                for arm in &m.arms {
                    read |= self.visit_expr(&arm.pattern.value)?;
                    read |= self.visit_block(&arm.body)?;
                }
                Ok(read)
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
                if call.method.is_get()
                    && let Some(fields) = self.fields.get_mut(target)
                {
                    fields.extend(call.args.iter().map(resolve));
                    return Ok(true);
                }
                self.visit_exprs(&call.args)
            }
            Expr::Error(msg) => self.visit_expr(msg),
        }
    }

    fn visit_exprs(&mut self, exprs: &[Expr]) -> Result<bool> {
        let mut read = false;
        for expr in exprs {
            read |= self.visit_expr(expr)?;
        }
        Ok(read)
    }
}

use super::resolve;
use adn_ir::Stmt;

/// Counts the sends whose message resolves to one of the targets.
///
/// Sends only appear at statement level, so expressions are never visited.
#[derive(Clone, Debug)]
pub struct CopyAnalyzer {
    targets: Vec<String>,
    sends: usize,
}

impl CopyAnalyzer {
    /// Creates a new analyzer tracking `targets`.
    pub fn new(targets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { targets: targets.into_iter().map(Into::into).collect(), sends: 0 }
    }

    /// Visits `block` and returns the total number of matching sends.
    pub fn visit_block(&mut self, block: &[Stmt]) -> usize {
        for stmt in block {
            self.visit_stmt(stmt);
        }
        self.sends
    }

    pub fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Start | Stmt::End | Stmt::Pass | Stmt::Assign(_) | Stmt::Expr(_) => {}
            Stmt::Match(m) => {
                for arm in &m.arms {
                    self.visit_block(&arm.body);
                }
            }
            Stmt::Send(send) => {
                let name = resolve(&send.msg);
                if self.targets.contains(&name) {
                    self.sends += 1;
                }
            }
        }
    }
}

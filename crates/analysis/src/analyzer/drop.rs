use super::resolve;
use adn_config::AnalysisConfig;
use adn_ir::{Direction, Expr, Stmt};

/// Finds sends that can terminate the chain on one direction.
///
/// A send in the analyzed direction whose message resolves to a target is a drop. A match with an
/// error send in any arm is also a drop: branch conditions are not evaluated statically, so every
/// arm is assumed reachable.
///
/// Calls to a [random source](AnalysisConfig::is_random_source) anywhere in the body set
/// [`random_included`](Self::random_included).
#[derive(Clone, Debug)]
pub struct DropAnalyzer<'a> {
    targets: Vec<String>,
    direction: Direction,
    config: &'a AnalysisConfig,
    random_included: bool,
}

impl<'a> DropAnalyzer<'a> {
    /// Creates a new analyzer tracking `targets` sent in `direction`.
    pub fn new(
        targets: impl IntoIterator<Item = impl Into<String>>,
        direction: Direction,
        config: &'a AnalysisConfig,
    ) -> Self {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            direction,
            config,
            random_included: false,
        }
    }

    /// Returns `true` if the body calls a random source.
    pub fn random_included(&self) -> bool {
        self.random_included
    }

    pub fn visit_block(&mut self, block: &[Stmt]) -> bool {
        let mut drop = false;
        for stmt in block {
            drop |= self.visit_stmt(stmt);
        }
        drop
    }

    pub fn visit_stmt(&mut self, stmt: &Stmt) -> bool {
        match stmt {
            Stmt::Start | Stmt::End | Stmt::Pass => false,
            Stmt::Assign(assign) => {
                self.visit_expr(&assign.right);
                false
            }
            Stmt::Match(m) => {
                self.visit_expr(&m.expr);
                let mut drop = false;
                for arm in &m.arms {
                    self.visit_expr(&arm.pattern.value);
                    drop |= self.visit_block(&arm.body);
                    drop |= contains_error_send(&arm.body);
                }
                drop
            }
            Stmt::Send(send) => {
                self.visit_expr(&send.msg);
                send.direction == self.direction && self.targets.contains(&resolve(&send.msg))
            }
            Stmt::Expr(expr) => {
                self.visit_expr(expr);
                false
            }
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(_) | Expr::Lit(_) => {}
            Expr::Binary(lhs, _, rhs) => {
                self.visit_expr(lhs);
                self.visit_expr(rhs);
            }
            Expr::FuncCall(call) => {
                if self.config.is_random_source(call.name.as_str()) {
                    self.random_included = true;
                }
                call.args.iter().for_each(|arg| self.visit_expr(arg));
            }
            Expr::MethodCall(call) => {
                self.visit_expr(&call.obj);
                call.args.iter().for_each(|arg| self.visit_expr(arg));
            }
            Expr::Error(msg) => self.visit_expr(msg),
        }
    }
}

/// Returns `true` if `block` sends an error anywhere, in any direction.
fn contains_error_send(block: &[Stmt]) -> bool {
    block.iter().any(|stmt| match stmt {
        Stmt::Send(send) => send.msg.is_error(),
        Stmt::Match(m) => m.arms.iter().any(|arm| contains_error_send(&arm.body)),
        Stmt::Start | Stmt::End | Stmt::Pass | Stmt::Assign(_) | Stmt::Expr(_) => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{ERROR_NAME, test_utils::*};
    use adn_ir::BinOp;

    fn config() -> AnalysisConfig {
        AnalysisConfig { random_sources: vec!["randomf".into()], ..Default::default() }
    }

    fn analyzer(direction: Direction, config: &AnalysisConfig) -> DropAnalyzer<'_> {
        DropAnalyzer::new([ERROR_NAME], direction, config)
    }

    #[test]
    fn error_send_on_direction() {
        let config = config();
        let body = vec![send_err("denied", Direction::Up)];
        assert!(analyzer(Direction::Up, &config).visit_block(&body));
        assert!(!analyzer(Direction::Down, &config).visit_block(&body));
        assert!(!analyzer(Direction::Up, &config).visit_block(&[send("rpc", Direction::Up)]));
    }

    #[test]
    fn error_in_any_arm_is_a_drop() {
        let config = config();
        let nested = Stmt::match_(
            Expr::get("rpc", "b"),
            vec![(Expr::str("x"), vec![send_err("nope", Direction::Down)])],
        );
        let body = vec![Stmt::match_(
            Expr::get("rpc", "a"),
            vec![
                (Expr::str("ok"), vec![send("rpc", Direction::Down)]),
                (Expr::str("maybe"), vec![nested]),
            ],
        )];
        // The nested error is sent downwards, but any error branch counts.
        assert!(analyzer(Direction::Up, &config).visit_block(&body));
    }

    #[test]
    fn random_sources() {
        let config = config();
        let body = vec![
            Stmt::assign(
                "p",
                Expr::binary(
                    Expr::call("randomf", vec![Expr::number(0), Expr::number(1)]),
                    BinOp::Lt,
                    Expr::number(0.1),
                ),
            ),
            Stmt::match_(
                Expr::ident("p"),
                vec![
                    (Expr::bool(true), vec![send_err("fault", Direction::Up)]),
                    (Expr::bool(false), vec![send("rpc", Direction::Down)]),
                ],
            ),
        ];
        let mut drop = analyzer(Direction::Up, &config);
        assert!(drop.visit_block(&body));
        assert!(drop.random_included());

        let mut drop = analyzer(Direction::Up, &config);
        drop.visit_block(&[Stmt::Expr(Expr::call("randomi", vec![]))]);
        assert!(!drop.random_included());
    }
}

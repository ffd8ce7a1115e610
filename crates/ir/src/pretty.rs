//! IR pretty-printing.

use crate::ast::{Block, Expr, Handler, Lit, Program, Stmt};
use core::fmt::{self, Write};

const INDENT: &str = "    ";

/// IR pretty-printer.
#[derive(Debug)]
pub struct Printer<W> {
    writer: W,
    indent: usize,
}

impl<W> Printer<W> {
    /// Creates a new printer with the given writer.
    pub fn new(writer: W) -> Self {
        Self { writer, indent: 0 }
    }
}

impl<W: Write> Printer<W> {
    /// Prints a whole element definition.
    pub fn print_program(&mut self, program: &Program) -> fmt::Result {
        let Program { name, state, init: _, req: _, resp: _ } = program;

        writeln!(self.writer, "element {name}")?;
        if !state.is_empty() {
            self.writer.write_str("state:\n")?;
            for decl in state {
                writeln!(
                    self.writer,
                    "{INDENT}{}: {} @{} @{} @{}",
                    decl.name, decl.ty, decl.consistency, decl.combiner, decl.persistence
                )?;
            }
        }
        for handler in [Handler::Init, Handler::Request, Handler::Response] {
            let name: &'static str = handler.into();
            writeln!(self.writer, "{name}:")?;
            self.indent += 1;
            self.print_block(program.handler(handler))?;
            self.indent -= 1;
        }
        Ok(())
    }

    /// Prints each statement of a block on its own line.
    pub fn print_block(&mut self, block: &Block) -> fmt::Result {
        for stmt in block {
            self.print_stmt(stmt)?;
        }
        Ok(())
    }

    /// Prints a single statement, followed by a newline.
    pub fn print_stmt(&mut self, stmt: &Stmt) -> fmt::Result {
        self.print_indent()?;
        match stmt {
            Stmt::Start => self.writer.write_str("START")?,
            Stmt::End => self.writer.write_str("END")?,
            Stmt::Pass => self.writer.write_str("pass")?,
            Stmt::Assign(assign) => {
                write!(self.writer, "{} := ", assign.left)?;
                self.print_expr(&assign.right)?;
            }
            Stmt::Match(m) => {
                self.writer.write_str("match ")?;
                self.print_expr(&m.expr)?;
                self.writer.write_str(" {\n")?;
                self.indent += 1;
                for arm in &m.arms {
                    self.print_indent()?;
                    self.print_expr(&arm.pattern.value)?;
                    self.writer.write_str(" => {\n")?;
                    self.indent += 1;
                    self.print_block(&arm.body)?;
                    self.indent -= 1;
                    self.print_indent()?;
                    self.writer.write_str("}\n")?;
                }
                self.indent -= 1;
                self.print_indent()?;
                self.writer.write_char('}')?;
            }
            Stmt::Send(send) => {
                self.writer.write_str("send(")?;
                self.print_expr(&send.msg)?;
                write!(self.writer, ", {})", send.direction.to_str())?;
            }
            Stmt::Expr(expr) => self.print_expr(expr)?,
        }
        self.writer.write_char('\n')
    }

    /// Prints a single expression.
    pub fn print_expr(&mut self, expr: &Expr) -> fmt::Result {
        match expr {
            Expr::Ident(ident) => write!(self.writer, "{ident}"),
            Expr::Lit(Lit::Str(s)) => write!(self.writer, "'{s}'"),
            Expr::Lit(Lit::Number(n)) => self.writer.write_str(n),
            Expr::Lit(Lit::Bool(b)) => write!(self.writer, "{b}"),
            Expr::Binary(lhs, op, rhs) => {
                self.print_expr(lhs)?;
                write!(self.writer, " {} ", op.to_str())?;
                self.print_expr(rhs)
            }
            Expr::FuncCall(call) => {
                write!(self.writer, "{}", call.name)?;
                self.print_args(&call.args)
            }
            Expr::MethodCall(call) => {
                self.print_expr(&call.obj)?;
                write!(self.writer, ".{}", call.method.to_str())?;
                self.print_args(&call.args)
            }
            Expr::Error(msg) => {
                self.writer.write_str("err(")?;
                self.print_expr(msg)?;
                self.writer.write_char(')')
            }
        }
    }

    fn print_args(&mut self, args: &[Expr]) -> fmt::Result {
        self.writer.write_char('(')?;
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.writer.write_str(", ")?;
            }
            self.print_expr(arg)?;
        }
        self.writer.write_char(')')
    }

    fn print_indent(&mut self) -> fmt::Result {
        for _ in 0..self.indent {
            self.writer.write_str(INDENT)?;
        }
        Ok(())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer::new(f).print_program(self)
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer::new(f).print_stmt(self)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer::new(f).print_expr(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinOp, Direction, MethodKind, StateDecl};

    #[test]
    fn print_expr() {
        let expr = Expr::binary(Expr::get("rpc", "user"), BinOp::Eq, Expr::str("bob"));
        assert_eq!(expr.to_string(), "rpc.GET('user') == 'bob'");
        assert_eq!(Expr::error("denied").to_string(), "err('denied')");
        let call = Expr::call("randomf", vec![Expr::number(0), Expr::number(1)]);
        assert_eq!(call.to_string(), "randomf(0, 1)");
    }

    #[test]
    fn print_program() {
        let mut program = Program::new("acl");
        program.state.push(StateDecl::new("acl_tab", "Map<string, string>").consistency("strong"));
        program.req = vec![
            Stmt::Start,
            Stmt::assign(
                "permission",
                Expr::method("acl_tab", MethodKind::Get, vec![Expr::get("rpc", "name")]),
            ),
            Stmt::match_(
                Expr::ident("permission"),
                vec![
                    (Expr::str("Y"), vec![Stmt::send(Expr::ident("rpc"), Direction::Down)]),
                    (Expr::str("N"), vec![Stmt::send(Expr::error("forbidden"), Direction::Up)]),
                ],
            ),
            Stmt::End,
        ];

        let expected = "\
element acl
state:
    acl_tab: Map<string, string> @strong @LWW @ephemeral
init:
request:
    START
    permission := acl_tab.GET(rpc.GET('name'))
    match permission {
        'Y' => {
            send(rpc, Down)
        }
        'N' => {
            send(err('forbidden'), Up)
        }
    }
    END
response:
";
        assert_eq!(program.to_string(), expected);
    }
}

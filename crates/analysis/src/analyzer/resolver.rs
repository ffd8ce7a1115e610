//! Expression to name resolution.

use crate::{AnalysisError, Result};
use adn_ir::{Expr, Lit, MethodCall};

/// Name every error message resolves to.
pub const ERROR_NAME: &str = "ERROR";

/// Resolves an expression to the flat name analyzers compare against target lists.
///
/// Literals resolve to their contents, so `rpc.GET('user')` reads the field `user`. Every error
/// message resolves to [`ERROR_NAME`].
pub fn resolve(expr: &Expr) -> String {
    let mut out = String::new();
    resolve_into(expr, &mut out);
    out
}

fn resolve_into(expr: &Expr, out: &mut String) {
    match expr {
        Expr::Ident(ident) => out.push_str(ident.as_str()),
        Expr::Lit(Lit::Str(s)) | Expr::Lit(Lit::Number(s)) => out.push_str(s),
        Expr::Lit(Lit::Bool(b)) => out.push_str(if *b { "true" } else { "false" }),
        Expr::Binary(lhs, op, rhs) => {
            resolve_into(lhs, out);
            out.push_str(op.to_str());
            resolve_into(rhs, out);
        }
        Expr::FuncCall(call) => {
            out.push_str(call.name.as_str());
            resolve_args(&call.args, out);
        }
        Expr::MethodCall(call) => {
            resolve_into(&call.obj, out);
            out.push('.');
            out.push_str(call.method.to_str());
            resolve_args(&call.args, out);
        }
        Expr::Error(_) => out.push_str(ERROR_NAME),
    }
}

fn resolve_args(args: &[Expr], out: &mut String) {
    out.push('(');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        resolve_into(arg, out);
    }
    out.push(')');
}

/// Returns the variable a method is called on.
///
/// Methods can only be called on named variables; anything else cannot be attributed to a target.
pub fn method_target(call: &MethodCall) -> Result<&str> {
    match call.obj.as_ident() {
        Some(ident) => Ok(ident.as_str()),
        None => Err(AnalysisError::UnresolvableTarget {
            method: call.method.to_str(),
            expr: resolve(&Expr::MethodCall(call.clone())),
        }),
    }
}

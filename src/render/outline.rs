//! Indented structural dump of an expression tree.

use crate::expression::{ExprKind, Expression, Lambda};
use std::fmt;

const INDENT: usize = 3;

/// Displays one node per line with its kind and declared type
pub struct Outline<'a> {
    expr: &'a Expression,
}

/// Outline of an expression
pub fn outline(expr: &Expression) -> Outline<'_> {
    Outline { expr }
}

/// Outline of a lambda: its parameters, then its body
pub fn outline_lambda(lambda: &Lambda) -> LambdaOutline<'_> {
    LambdaOutline { lambda }
}

impl fmt::Display for Outline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self.expr, 0)
    }
}

pub struct LambdaOutline<'a> {
    lambda: &'a Lambda,
}

impl fmt::Display for LambdaOutline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Lambda : {}", self.lambda.return_type())?;
        for p in self.lambda.parameters() {
            writeln!(
                f,
                "{:indent$}parameter {} : {}",
                "",
                p.name(),
                p.data_type(),
                indent = INDENT
            )?;
        }
        writeln!(f, "{:indent$}body:", "", indent = INDENT)?;
        write_node(f, self.lambda.body(), 2)
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, expr: &Expression, level: usize) -> fmt::Result {
    let pad = level * INDENT;
    match expr.kind() {
        ExprKind::Parameter(p) => {
            writeln!(f, "{:pad$}Parameter {} : {}", "", p.name(), expr.data_type())
        }
        ExprKind::Constant(value) => {
            writeln!(f, "{:pad$}Constant {} : {}", "", value, expr.data_type())
        }
        ExprKind::Member { object, field } => {
            writeln!(f, "{:pad$}MemberAccess .{} : {}", "", field, expr.data_type())?;
            labelled(f, "object", object, level)
        }
        ExprKind::Binary { left, right, .. } => {
            writeln!(f, "{:pad$}{} : {}", "", expr.node_type(), expr.data_type())?;
            labelled(f, "left", left, level)?;
            labelled(f, "right", right, level)
        }
        ExprKind::Call {
            method,
            target,
            args,
        } => {
            writeln!(f, "{:pad$}Call {} : {}", "", method.as_str(), expr.data_type())?;
            labelled(f, "target", target, level)?;
            for (i, arg) in args.iter().enumerate() {
                labelled(f, &format!("argument {}", i), arg, level)?;
            }
            Ok(())
        }
    }
}

fn labelled(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    child: &Expression,
    level: usize,
) -> fmt::Result {
    writeln!(f, "{:pad$}{}:", "", label, pad = (level + 1) * INDENT)?;
    write_node(f, child, level + 2)
}

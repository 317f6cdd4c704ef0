//! Tree rewriting.
//!
//! A [`Transform`] is offered every node, parents before children. Returning
//! `Some` replaces the node (its subtree is not visited further); returning
//! `None` keeps the node, whose children are then mapped and which is rebuilt
//! through the builder so operand types are validated again. The input tree is
//! never modified.

use crate::expression::builder::{binary, call, constant, lambda, member, param};
use crate::expression::{ExprKind, Expression, ExpressionError, ExpressionResult, Lambda, Parameter};
use crate::value::{DataType, Value};
use log::{debug, trace};

/// A node-level rewrite rule
pub trait Transform {
    /// Return a replacement for `expr`, or `None` to keep it
    fn transform(&mut self, expr: &Expression) -> ExpressionResult<Option<Expression>>;
}

impl<F> Transform for F
where
    F: FnMut(&Expression) -> ExpressionResult<Option<Expression>>,
{
    fn transform(&mut self, expr: &Expression) -> ExpressionResult<Option<Expression>> {
        self(expr)
    }
}

/// Produce a new tree by applying `transform` throughout `expr`
pub fn map_tree<T>(expr: &Expression, transform: &mut T) -> ExpressionResult<Expression>
where
    T: Transform + ?Sized,
{
    if let Some(replacement) = transform.transform(expr)? {
        return Ok(replacement);
    }

    match expr.kind() {
        ExprKind::Parameter(_) | ExprKind::Constant(_) => Ok(expr.clone()),

        ExprKind::Member { object, field } => member(map_tree(object, transform)?, field),

        ExprKind::Binary { op, left, right } => {
            // Both sides always, regardless of operator
            let left = map_tree(left, transform)?;
            let right = map_tree(right, transform)?;
            binary(*op, left, right)
        }

        ExprKind::Call {
            method,
            target,
            args,
        } => {
            let target = map_tree(target, transform)?;
            let args = args
                .iter()
                .map(|arg| map_tree(arg, transform))
                .collect::<ExpressionResult<Vec<_>>>()?;
            call(*method, target, args)
        }
    }
}

/// Produce a new lambda by applying `transform` to its parameter list and body
///
/// A declared parameter may only be rewritten into another parameter.
pub fn map_lambda<T>(source: &Lambda, transform: &mut T) -> ExpressionResult<Lambda>
where
    T: Transform + ?Sized,
{
    let mut parameters = Vec::with_capacity(source.arity());
    for p in source.parameters() {
        let mapped = map_tree(&param(p), transform)?;
        match mapped.kind() {
            ExprKind::Parameter(replacement) => parameters.push(replacement.clone()),
            _ => {
                return Err(ExpressionError::ArityMismatch {
                    context: "lambda rewrite".to_string(),
                    reason: format!(
                        "declared parameter {} was rewritten into a {} node",
                        p.name(),
                        mapped.node_type()
                    ),
                })
            }
        }
    }

    let body = map_tree(source.body(), transform)?;
    lambda(parameters, body)
}

/// Replaces every constant of one type with a value computed from the old one
pub struct ConstantRewrite<F> {
    data_type: DataType,
    rewrite: F,
}

impl<F> ConstantRewrite<F>
where
    F: Fn(&Value) -> Value,
{
    pub fn new(data_type: DataType, rewrite: F) -> Self {
        Self { data_type, rewrite }
    }
}

impl<F> Transform for ConstantRewrite<F>
where
    F: Fn(&Value) -> Value,
{
    fn transform(&mut self, expr: &Expression) -> ExpressionResult<Option<Expression>> {
        match expr.kind() {
            ExprKind::Constant(value) if *expr.data_type() == self.data_type => {
                let rewritten = (self.rewrite)(value);
                trace!("Rewriting constant {} to {}", value, rewritten);
                Ok(Some(constant(rewritten)))
            }
            _ => Ok(None),
        }
    }
}

/// Replaces every reference to one parameter with another parameter
pub struct ParameterSubstitution {
    from: Parameter,
    to: Parameter,
}

impl ParameterSubstitution {
    /// Both parameters must have the same declared type
    pub fn new(from: Parameter, to: Parameter) -> ExpressionResult<Self> {
        if from.data_type() != to.data_type() {
            return Err(ExpressionError::TypeMismatch {
                expected: from.data_type().to_string(),
                actual: to.data_type().clone(),
                context: format!("substitution of parameter {}", from.name()),
            });
        }
        Ok(Self { from, to })
    }
}

impl Transform for ParameterSubstitution {
    fn transform(&mut self, expr: &Expression) -> ExpressionResult<Option<Expression>> {
        match expr.kind() {
            ExprKind::Parameter(p) if p.same_as(&self.from) => Ok(Some(param(&self.to))),
            _ => Ok(None),
        }
    }
}

/// Rewrite every constant of `data_type` in a lambda
pub fn rewrite_constants<F>(
    source: &Lambda,
    data_type: DataType,
    rewrite: F,
) -> ExpressionResult<Lambda>
where
    F: Fn(&Value) -> Value,
{
    debug!("Rewriting {} constants in {}", data_type, source);
    map_lambda(source, &mut ConstantRewrite::new(data_type, rewrite))
}

/// Substitute `to` for every occurrence of `from` in an expression
pub fn substitute_parameter(
    expr: &Expression,
    from: &Parameter,
    to: &Parameter,
) -> ExpressionResult<Expression> {
    debug!("Substituting parameter {} in {}", from.name(), expr);
    map_tree(expr, &mut ParameterSubstitution::new(from.clone(), to.clone())?)
}

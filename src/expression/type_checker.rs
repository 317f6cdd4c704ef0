//! Type checking for expressions.
//!
//! The builder already types each node as it is created; the checker walks a
//! whole tree again to verify parameter scoping and that every declared type
//! still agrees with what its children produce.

use crate::expression::{ExprKind, Expression, ExpressionError, ExpressionResult, Lambda, Parameter};
use crate::value::DataType;

/// Type checker for expressions
pub struct TypeChecker<'a> {
    /// Parameters that may be referenced
    scope: &'a [Parameter],
}

impl<'a> TypeChecker<'a> {
    /// Create a new type checker with the given parameters in scope
    pub fn new(scope: &'a [Parameter]) -> Self {
        Self { scope }
    }

    /// Type check an expression and return its output type
    pub fn check(&self, expr: &Expression) -> ExpressionResult<DataType> {
        let derived = match expr.kind() {
            ExprKind::Parameter(p) => {
                if !self.scope.iter().any(|declared| declared.same_as(p)) {
                    return Err(ExpressionError::ArityMismatch {
                        context: "lambda".to_string(),
                        reason: format!(
                            "body references parameter {} which is not among the {} declared",
                            p.name(),
                            self.scope.len()
                        ),
                    });
                }
                p.data_type().clone()
            }

            ExprKind::Constant(value) => value.data_type(),

            ExprKind::Member { object, field } => {
                let object_type = self.check(object)?;
                let schema = object_type
                    .as_record()
                    .ok_or_else(|| ExpressionError::TypeMismatch {
                        expected: "a record".to_string(),
                        actual: object_type.clone(),
                        context: format!("member access .{}", field),
                    })?;
                schema
                    .field_type(field)
                    .cloned()
                    .ok_or_else(|| ExpressionError::UnknownField {
                        record: schema.name.clone(),
                        field: field.clone(),
                    })?
            }

            ExprKind::Binary { op, left, right } => {
                let left_type = self.check(left)?;
                let right_type = self.check(right)?;
                op.output_type(&left_type, &right_type)
                    .ok_or_else(|| ExpressionError::TypeMismatch {
                        expected: op.operand_requirement().to_string(),
                        actual: if left_type == right_type {
                            left_type.clone()
                        } else {
                            right_type.clone()
                        },
                        context: format!("operator {}", op.as_str()),
                    })?
            }

            ExprKind::Call {
                method,
                target,
                args,
            } => {
                let (target_type, arg_types, result_type) = method.signature();
                let actual_target = self.check(target)?;
                if actual_target != target_type {
                    return Err(ExpressionError::TypeMismatch {
                        expected: target_type.to_string(),
                        actual: actual_target,
                        context: format!("method {}", method.as_str()),
                    });
                }
                if args.len() != arg_types.len() {
                    return Err(ExpressionError::ArgumentCountMismatch {
                        context: format!("method {}", method.as_str()),
                        expected: arg_types.len(),
                        actual: args.len(),
                    });
                }
                for (arg, expected) in args.iter().zip(arg_types.iter()) {
                    let actual = self.check(arg)?;
                    if actual != *expected {
                        return Err(ExpressionError::TypeMismatch {
                            expected: expected.to_string(),
                            actual,
                            context: format!("method {}", method.as_str()),
                        });
                    }
                }
                result_type
            }
        };

        if derived != *expr.data_type() {
            return Err(ExpressionError::TypeMismatch {
                expected: expr.data_type().to_string(),
                actual: derived,
                context: format!("{} node", expr.node_type()),
            });
        }

        Ok(derived)
    }
}

/// Helper function to type check an expression against a parameter scope
pub fn type_check_expression(expr: &Expression, scope: &[Parameter]) -> ExpressionResult<DataType> {
    TypeChecker::new(scope).check(expr)
}

/// Check that a lambda is a single-parameter boolean predicate and return
/// its parameter
pub fn validate_predicate<'l>(
    lambda: &'l Lambda,
    context: &str,
) -> ExpressionResult<&'l Parameter> {
    let parameter = match lambda.parameters() {
        [only] => only,
        other => {
            return Err(ExpressionError::ArityMismatch {
                context: context.to_string(),
                reason: format!("predicate must take exactly 1 parameter, got {}", other.len()),
            })
        }
    };

    if *lambda.return_type() != DataType::Boolean {
        return Err(ExpressionError::TypeMismatch {
            expected: DataType::Boolean.to_string(),
            actual: lambda.return_type().clone(),
            context: context.to_string(),
        });
    }

    Ok(parameter)
}

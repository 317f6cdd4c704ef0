//! Factory functions for expression nodes.
//!
//! Every function that combines nodes checks operand types against the
//! operator or method and fails with [`ExpressionError::TypeMismatch`] instead
//! of producing a tree that could only fail later, at evaluation time.

use crate::expression::expr::{ExprKind, Expression, Lambda, Parameter};
use crate::expression::operator::{BinaryOperator, Method};
use crate::expression::type_checker::TypeChecker;
use crate::expression::{ExpressionError, ExpressionResult};
use crate::value::{DataType, Value};

/// Declare a new parameter; each call yields a distinct variable
pub fn parameter(name: impl Into<String>, data_type: DataType) -> Parameter {
    Parameter::new(name, data_type)
}

/// Create a reference to a parameter
pub fn param(parameter: &Parameter) -> Expression {
    Expression::from_parts(
        ExprKind::Parameter(parameter.clone()),
        parameter.data_type().clone(),
    )
}

/// Create a constant expression
pub fn constant(value: impl Into<Value>) -> Expression {
    let value = value.into();
    let data_type = value.data_type();
    Expression::from_parts(ExprKind::Constant(value), data_type)
}

pub fn int(n: i32) -> Expression {
    constant(n)
}

pub fn boolean(b: bool) -> Expression {
    constant(b)
}

pub fn string(s: impl Into<String>) -> Expression {
    constant(Value::String(s.into()))
}

/// Create a binary operation, checking operand types
pub fn binary(
    op: BinaryOperator,
    left: Expression,
    right: Expression,
) -> ExpressionResult<Expression> {
    let data_type = op
        .output_type(left.data_type(), right.data_type())
        .ok_or_else(|| {
            // Report whichever operand breaks the requirement
            let offending = if fits(op, left.data_type()) {
                right.data_type()
            } else {
                left.data_type()
            };
            ExpressionError::TypeMismatch {
                expected: op.operand_requirement().to_string(),
                actual: offending.clone(),
                context: format!("operator {}", op.as_str()),
            }
        })?;

    Ok(Expression::from_parts(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        data_type,
    ))
}

fn fits(op: BinaryOperator, operand: &DataType) -> bool {
    if op.is_arithmetic() || op.is_ordering() {
        operand.is_numeric()
    } else if op.is_comparison() {
        operand.as_record().is_none()
    } else {
        *operand == DataType::Boolean
    }
}

/// Create an addition expression
pub fn add(left: Expression, right: Expression) -> ExpressionResult<Expression> {
    binary(BinaryOperator::Add, left, right)
}

/// Create a subtraction expression
pub fn subtract(left: Expression, right: Expression) -> ExpressionResult<Expression> {
    binary(BinaryOperator::Subtract, left, right)
}

/// Create a multiplication expression
pub fn multiply(left: Expression, right: Expression) -> ExpressionResult<Expression> {
    binary(BinaryOperator::Multiply, left, right)
}

/// Create a division expression
pub fn divide(left: Expression, right: Expression) -> ExpressionResult<Expression> {
    binary(BinaryOperator::Divide, left, right)
}

pub fn equal(left: Expression, right: Expression) -> ExpressionResult<Expression> {
    binary(BinaryOperator::Equal, left, right)
}

pub fn not_equal(left: Expression, right: Expression) -> ExpressionResult<Expression> {
    binary(BinaryOperator::NotEqual, left, right)
}

pub fn greater_than(left: Expression, right: Expression) -> ExpressionResult<Expression> {
    binary(BinaryOperator::GreaterThan, left, right)
}

pub fn greater_than_or_equal(left: Expression, right: Expression) -> ExpressionResult<Expression> {
    binary(BinaryOperator::GreaterThanOrEqual, left, right)
}

pub fn less_than(left: Expression, right: Expression) -> ExpressionResult<Expression> {
    binary(BinaryOperator::LessThan, left, right)
}

pub fn less_than_or_equal(left: Expression, right: Expression) -> ExpressionResult<Expression> {
    binary(BinaryOperator::LessThanOrEqual, left, right)
}

/// Create a short-circuiting AND expression
pub fn and_also(left: Expression, right: Expression) -> ExpressionResult<Expression> {
    binary(BinaryOperator::AndAlso, left, right)
}

/// Create a short-circuiting OR expression
pub fn or_else(left: Expression, right: Expression) -> ExpressionResult<Expression> {
    binary(BinaryOperator::OrElse, left, right)
}

/// Create a field access on a record-typed expression
pub fn member(object: Expression, field: &str) -> ExpressionResult<Expression> {
    let schema = object
        .data_type()
        .as_record()
        .ok_or_else(|| ExpressionError::TypeMismatch {
            expected: "a record".to_string(),
            actual: object.data_type().clone(),
            context: format!("member access .{}", field),
        })?;

    let data_type = schema
        .field_type(field)
        .cloned()
        .ok_or_else(|| ExpressionError::UnknownField {
            record: schema.name.clone(),
            field: field.to_string(),
        })?;

    Ok(Expression::from_parts(
        ExprKind::Member {
            object: Box::new(object),
            field: field.to_string(),
        },
        data_type,
    ))
}

/// Create a method call, checking the target and argument types
pub fn call(
    method: Method,
    target: Expression,
    args: Vec<Expression>,
) -> ExpressionResult<Expression> {
    let (target_type, arg_types, result_type) = method.signature();
    let context = format!("method {}", method.as_str());

    if *target.data_type() != target_type {
        return Err(ExpressionError::TypeMismatch {
            expected: target_type.to_string(),
            actual: target.data_type().clone(),
            context,
        });
    }

    if args.len() != arg_types.len() {
        return Err(ExpressionError::ArgumentCountMismatch {
            context,
            expected: arg_types.len(),
            actual: args.len(),
        });
    }

    for (arg, expected) in args.iter().zip(arg_types.iter()) {
        if arg.data_type() != expected {
            return Err(ExpressionError::TypeMismatch {
                expected: expected.to_string(),
                actual: arg.data_type().clone(),
                context,
            });
        }
    }

    Ok(Expression::from_parts(
        ExprKind::Call {
            method,
            target: Box::new(target),
            args,
        },
        result_type,
    ))
}

/// Create a lambda; the body may only reference the declared parameters
pub fn lambda(parameters: Vec<Parameter>, body: Expression) -> ExpressionResult<Lambda> {
    for (i, p) in parameters.iter().enumerate() {
        if parameters[..i].iter().any(|earlier| earlier.same_as(p)) {
            return Err(ExpressionError::ArityMismatch {
                context: "lambda".to_string(),
                reason: format!("parameter {} is declared more than once", p.name()),
            });
        }
    }

    TypeChecker::new(&parameters).check(&body)?;

    Ok(Lambda::from_parts(parameters, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::RecordSchema;

    #[test]
    fn test_binary_builders() {
        let x = parameter("x", DataType::Int32);
        let y = parameter("y", DataType::Int32);

        let expr = add(multiply(param(&x), param(&y)).unwrap(), int(10)).unwrap();
        assert_eq!(expr.data_type(), &DataType::Int32);
        assert_eq!(expr.node_type(), "Add");

        let expr = greater_than(param(&x), int(5)).unwrap();
        assert_eq!(expr.data_type(), &DataType::Boolean);

        let expr = and_also(
            greater_than(param(&x), int(5)).unwrap(),
            less_than(param(&x), int(10)).unwrap(),
        )
        .unwrap();
        assert_eq!(expr.data_type(), &DataType::Boolean);
    }

    #[test]
    fn test_add_with_boolean_operand_fails() {
        let err = add(boolean(true), int(1)).unwrap_err();
        assert_eq!(
            err,
            ExpressionError::TypeMismatch {
                expected: "Int32".to_string(),
                actual: DataType::Boolean,
                context: "operator +".to_string(),
            }
        );

        let err = add(int(1), boolean(true)).unwrap_err();
        assert!(matches!(
            err,
            ExpressionError::TypeMismatch {
                actual: DataType::Boolean,
                ..
            }
        ));
    }

    #[test]
    fn test_logical_requires_booleans() {
        assert!(matches!(
            and_also(int(1), boolean(true)),
            Err(ExpressionError::TypeMismatch { .. })
        ));
        assert!(matches!(
            or_else(boolean(true), string("no")),
            Err(ExpressionError::TypeMismatch {
                actual: DataType::Varchar,
                ..
            })
        ));
    }

    #[test]
    fn test_comparison_requires_matching_types() {
        let err = less_than(int(1), string("2")).unwrap_err();
        assert!(matches!(
            err,
            ExpressionError::TypeMismatch {
                actual: DataType::Varchar,
                ..
            }
        ));
        assert!(equal(string("a"), string("b")).is_ok());
        assert!(not_equal(boolean(true), boolean(false)).is_ok());
    }

    #[test]
    fn test_ordering_requires_numbers() {
        assert!(matches!(
            less_than(string("a"), string("b")),
            Err(ExpressionError::TypeMismatch {
                actual: DataType::Varchar,
                ..
            })
        ));
        assert!(matches!(
            greater_than(boolean(true), boolean(false)),
            Err(ExpressionError::TypeMismatch {
                actual: DataType::Boolean,
                ..
            })
        ));
        assert!(greater_than_or_equal(int(2), int(1)).is_ok());
    }

    #[test]
    fn test_member_access() {
        let schema = RecordSchema::new(
            "Product",
            vec![("Name", DataType::Varchar), ("Price", DataType::Int32)],
        );
        let p = parameter("p", DataType::Record(schema));

        let price = member(param(&p), "Price").unwrap();
        assert_eq!(price.data_type(), &DataType::Int32);

        assert!(matches!(
            member(param(&p), "Weight"),
            Err(ExpressionError::UnknownField { .. })
        ));
        assert!(matches!(
            member(int(1), "Price"),
            Err(ExpressionError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_call_checks_signature() {
        let s = parameter("s", DataType::Varchar);

        let expr = call(Method::Contains, param(&s), vec![string("a")]).unwrap();
        assert_eq!(expr.data_type(), &DataType::Boolean);

        assert!(matches!(
            call(Method::Contains, int(1), vec![string("a")]),
            Err(ExpressionError::TypeMismatch { .. })
        ));
        assert!(matches!(
            call(Method::StartsWith, param(&s), vec![]),
            Err(ExpressionError::ArgumentCountMismatch { .. })
        ));
        assert!(matches!(
            call(Method::EndsWith, param(&s), vec![int(3)]),
            Err(ExpressionError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_lambda_scoping() {
        let x = parameter("x", DataType::Int32);
        let y = parameter("y", DataType::Int32);

        // Unused parameters are fine
        let f = lambda(vec![x.clone(), y.clone()], add(param(&x), int(1)).unwrap()).unwrap();
        assert_eq!(f.arity(), 2);
        assert_eq!(f.return_type(), &DataType::Int32);

        // Body referencing an undeclared parameter is rejected
        let err = lambda(vec![x.clone()], add(param(&x), param(&y)).unwrap()).unwrap_err();
        assert!(matches!(err, ExpressionError::ArityMismatch { .. }));

        // A same-named but distinct parameter is still undeclared
        let other_x = parameter("x", DataType::Int32);
        assert!(matches!(
            lambda(vec![other_x], param(&x)),
            Err(ExpressionError::ArityMismatch { .. })
        ));

        // Declaring the same parameter twice is rejected
        assert!(matches!(
            lambda(vec![x.clone(), x.clone()], param(&x)),
            Err(ExpressionError::ArityMismatch { .. })
        ));
    }
}

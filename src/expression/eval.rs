//! Expression evaluation implementation.
//!
//! [`ExpressionEvaluator`] walks a tree directly. [`Lambda::compile`] instead
//! resolves parameters to argument slots once and turns the tree into nested
//! closures, so repeated calls do no lookups. Both share the operator
//! semantics below: wrapping `Int32` arithmetic and short-circuiting
//! `AndAlso`/`OrElse`.

use crate::expression::type_checker::validate_predicate;
use crate::expression::{
    BinaryOperator, ExprKind, Expression, ExpressionError, ExpressionResult, Lambda, Method,
    Parameter,
};
use crate::value::{DataType, Value};
use log::debug;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Evaluator for expressions
pub struct ExpressionEvaluator<'a> {
    /// Parameters in positional order
    parameters: &'a [Parameter],
    /// Argument bound to each parameter
    arguments: &'a [Value],
}

impl<'a> ExpressionEvaluator<'a> {
    /// Bind arguments to parameters, checking count and types
    pub fn new(parameters: &'a [Parameter], arguments: &'a [Value]) -> ExpressionResult<Self> {
        check_arguments(parameters, arguments)?;
        Ok(Self {
            parameters,
            arguments,
        })
    }

    /// Evaluate an expression and return the result
    pub fn evaluate(&self, expr: &Expression) -> ExpressionResult<Value> {
        let value = match expr.kind() {
            ExprKind::Parameter(p) => self.lookup(p)?.clone(),

            ExprKind::Constant(value) => value.clone(),

            ExprKind::Member { object, field } => read_member(&self.evaluate(object)?, field)?,

            ExprKind::Binary { op, left, right } => {
                if op.is_logical() {
                    let left_val = expect_bool(self.evaluate(left)?, *op)?;
                    match short_circuit(*op, left_val) {
                        Some(decided) => Value::Boolean(decided),
                        None => Value::Boolean(expect_bool(self.evaluate(right)?, *op)?),
                    }
                } else {
                    let left_val = self.evaluate(left)?;
                    let right_val = self.evaluate(right)?;
                    apply_binary(*op, left_val, right_val)?
                }
            }

            ExprKind::Call {
                method,
                target,
                args,
            } => {
                let target_val = self.evaluate(target)?;
                let arg_vals = args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<ExpressionResult<Vec<_>>>()?;
                apply_method(*method, &target_val, &arg_vals)?
            }
        };

        // Normally guaranteed by the builder
        if !value.is_compatible_with(expr.data_type()) {
            return Err(ExpressionError::TypeMismatch {
                expected: expr.data_type().to_string(),
                actual: value.data_type(),
                context: format!("{} node", expr.node_type()),
            });
        }

        Ok(value)
    }

    fn lookup(&self, parameter: &Parameter) -> ExpressionResult<&'a Value> {
        self.parameters
            .iter()
            .position(|p| p.same_as(parameter))
            .map(|idx| &self.arguments[idx])
            .ok_or_else(|| unbound(parameter))
    }
}

/// Helper function to evaluate a lambda with positional arguments
pub fn evaluate_lambda(lambda: &Lambda, arguments: &[Value]) -> ExpressionResult<Value> {
    ExpressionEvaluator::new(lambda.parameters(), arguments)?.evaluate(lambda.body())
}

type CompiledNode = Box<dyn Fn(&[Value]) -> ExpressionResult<Value> + Send + Sync>;

/// A lambda turned into a directly callable function
#[derive(Clone)]
pub struct CompiledLambda {
    lambda: Arc<Lambda>,
    body: Arc<CompiledNode>,
}

impl Lambda {
    /// Compile this lambda into a callable
    pub fn compile(&self) -> ExpressionResult<CompiledLambda> {
        debug!("Compiling {}", self);
        let body = compile_node(self.body(), self.parameters())?;
        Ok(CompiledLambda {
            lambda: Arc::new(self.clone()),
            body: Arc::new(body),
        })
    }
}

impl CompiledLambda {
    /// The lambda this was compiled from
    pub fn lambda(&self) -> &Lambda {
        &self.lambda
    }

    /// Call with one argument per declared parameter
    pub fn call(&self, arguments: &[Value]) -> ExpressionResult<Value> {
        check_arguments(self.lambda.parameters(), arguments)?;
        (self.body)(arguments)
    }

    /// Call a single-parameter boolean lambda on one row
    pub fn test(&self, row: &Value) -> ExpressionResult<bool> {
        validate_predicate(&self.lambda, "predicate test")?;
        self.accepts(row)
    }

    /// Keep the rows this predicate accepts
    pub fn filter<'r>(&self, rows: &'r [Value]) -> ExpressionResult<Vec<&'r Value>> {
        validate_predicate(&self.lambda, "predicate filter")?;
        let mut kept = Vec::new();
        for row in rows {
            if self.accepts(row)? {
                kept.push(row);
            }
        }
        debug!("Predicate {} kept {} of {} rows", self.lambda, kept.len(), rows.len());
        Ok(kept)
    }

    /// Run an already validated predicate
    fn accepts(&self, row: &Value) -> ExpressionResult<bool> {
        match self.call(std::slice::from_ref(row))? {
            Value::Boolean(b) => Ok(b),
            other => Err(ExpressionError::TypeMismatch {
                expected: DataType::Boolean.to_string(),
                actual: other.data_type(),
                context: "predicate result".to_string(),
            }),
        }
    }
}

impl fmt::Debug for CompiledLambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledLambda")
            .field("lambda", &self.lambda.to_string())
            .finish()
    }
}

fn compile_node(expr: &Expression, parameters: &[Parameter]) -> ExpressionResult<CompiledNode> {
    let node: CompiledNode = match expr.kind() {
        ExprKind::Parameter(p) => {
            let slot = parameters
                .iter()
                .position(|declared| declared.same_as(p))
                .ok_or_else(|| unbound(p))?;
            Box::new(move |args: &[Value]| -> ExpressionResult<Value> {
                Ok(args[slot].clone())
            })
        }

        ExprKind::Constant(value) => {
            let value = value.clone();
            Box::new(move |_: &[Value]| -> ExpressionResult<Value> { Ok(value.clone()) })
        }

        ExprKind::Member { object, field } => {
            let object = compile_node(object, parameters)?;
            let field = field.clone();
            Box::new(move |args: &[Value]| -> ExpressionResult<Value> {
                read_member(&object(args)?, &field)
            })
        }

        ExprKind::Binary { op, left, right } => {
            let op = *op;
            let left = compile_node(left, parameters)?;
            let right = compile_node(right, parameters)?;
            if op.is_logical() {
                Box::new(move |args: &[Value]| -> ExpressionResult<Value> {
                    let left_val = expect_bool(left(args)?, op)?;
                    match short_circuit(op, left_val) {
                        Some(decided) => Ok(Value::Boolean(decided)),
                        None => Ok(Value::Boolean(expect_bool(right(args)?, op)?)),
                    }
                })
            } else {
                Box::new(move |args: &[Value]| -> ExpressionResult<Value> {
                    apply_binary(op, left(args)?, right(args)?)
                })
            }
        }

        ExprKind::Call {
            method,
            target,
            args,
        } => {
            let method = *method;
            let target = compile_node(target, parameters)?;
            let call_args = args
                .iter()
                .map(|arg| compile_node(arg, parameters))
                .collect::<ExpressionResult<Vec<_>>>()?;
            Box::new(move |args: &[Value]| -> ExpressionResult<Value> {
                let target_val = target(args)?;
                let arg_vals = call_args
                    .iter()
                    .map(|arg| arg(args))
                    .collect::<ExpressionResult<Vec<_>>>()?;
                apply_method(method, &target_val, &arg_vals)
            })
        }
    };

    Ok(node)
}

/// Check that arguments line up with the declared parameters
fn check_arguments(parameters: &[Parameter], arguments: &[Value]) -> ExpressionResult<()> {
    if arguments.len() != parameters.len() {
        return Err(ExpressionError::ArgumentCountMismatch {
            context: format!("lambda ({})", parameter_names(parameters)),
            expected: parameters.len(),
            actual: arguments.len(),
        });
    }

    for (p, arg) in parameters.iter().zip(arguments.iter()) {
        if !arg.is_compatible_with(p.data_type()) {
            return Err(ExpressionError::TypeMismatch {
                expected: p.data_type().to_string(),
                actual: arg.data_type(),
                context: format!("argument {}", p.name()),
            });
        }
    }

    Ok(())
}

fn parameter_names(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(Parameter::name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn unbound(parameter: &Parameter) -> ExpressionError {
    ExpressionError::ArityMismatch {
        context: "evaluation".to_string(),
        reason: format!("parameter {} is not bound", parameter.name()),
    }
}

/// Result decided by the left operand alone, if any
fn short_circuit(op: BinaryOperator, left: bool) -> Option<bool> {
    match (op, left) {
        (BinaryOperator::AndAlso, false) => Some(false),
        (BinaryOperator::OrElse, true) => Some(true),
        _ => None,
    }
}

fn expect_bool(value: Value, op: BinaryOperator) -> ExpressionResult<bool> {
    match value {
        Value::Boolean(b) => Ok(b),
        other => Err(ExpressionError::TypeMismatch {
            expected: DataType::Boolean.to_string(),
            actual: other.data_type(),
            context: format!("operator {}", op.as_str()),
        }),
    }
}

/// Evaluate a non-logical binary operation
fn apply_binary(op: BinaryOperator, left: Value, right: Value) -> ExpressionResult<Value> {
    if op.is_comparison() {
        return compare_values(op, &left, &right);
    }

    let (a, b) = match (&left, &right) {
        (Value::Int32(a), Value::Int32(b)) => (*a, *b),
        _ => {
            let actual = if left.as_i32().is_none() { left } else { right };
            return Err(ExpressionError::TypeMismatch {
                expected: op.operand_requirement().to_string(),
                actual: actual.data_type(),
                context: format!("operator {}", op.as_str()),
            });
        }
    };

    let result = match op {
        BinaryOperator::Add => a.wrapping_add(b),
        BinaryOperator::Subtract => a.wrapping_sub(b),
        BinaryOperator::Multiply => a.wrapping_mul(b),
        BinaryOperator::Divide => {
            if b == 0 {
                return Err(ExpressionError::DivisionByZero);
            }
            a.wrapping_div(b)
        }
        _ => unreachable!("logical operators are evaluated by the callers"),
    };

    Ok(Value::Int32(result))
}

/// Compare two values with a comparison operator
fn compare_values(op: BinaryOperator, left: &Value, right: &Value) -> ExpressionResult<Value> {
    let mismatch = |actual: &Value| ExpressionError::TypeMismatch {
        expected: op.operand_requirement().to_string(),
        actual: actual.data_type(),
        context: format!("operator {}", op.as_str()),
    };

    if op.is_ordering() {
        let ordering = match (left, right) {
            (Value::Int32(a), Value::Int32(b)) => a.cmp(b),
            (Value::Int32(_), _) => return Err(mismatch(right)),
            _ => return Err(mismatch(left)),
        };
        let result = match op {
            BinaryOperator::GreaterThan => ordering == Ordering::Greater,
            BinaryOperator::GreaterThanOrEqual => ordering != Ordering::Less,
            BinaryOperator::LessThan => ordering == Ordering::Less,
            _ => ordering != Ordering::Greater,
        };
        return Ok(Value::Boolean(result));
    }

    if left.data_type() != right.data_type() {
        return Err(mismatch(right));
    }
    match op {
        BinaryOperator::Equal => Ok(Value::Boolean(left == right)),
        BinaryOperator::NotEqual => Ok(Value::Boolean(left != right)),
        _ => unreachable!("only comparison operators reach compare_values"),
    }
}

fn read_member(object: &Value, field: &str) -> ExpressionResult<Value> {
    match object {
        Value::Record(record) => {
            record
                .get(field)
                .cloned()
                .ok_or_else(|| ExpressionError::UnknownField {
                    record: record.schema().name.clone(),
                    field: field.to_string(),
                })
        }
        other => Err(ExpressionError::TypeMismatch {
            expected: "a record".to_string(),
            actual: other.data_type(),
            context: format!("member access .{}", field),
        }),
    }
}

fn apply_method(method: Method, target: &Value, args: &[Value]) -> ExpressionResult<Value> {
    let context = format!("method {}", method.as_str());
    let target = match target {
        Value::String(s) => s,
        other => {
            return Err(ExpressionError::TypeMismatch {
                expected: DataType::Varchar.to_string(),
                actual: other.data_type(),
                context,
            })
        }
    };
    let needle = match args {
        [Value::String(s)] => s,
        [other] => {
            return Err(ExpressionError::TypeMismatch {
                expected: DataType::Varchar.to_string(),
                actual: other.data_type(),
                context,
            })
        }
        _ => {
            return Err(ExpressionError::ArgumentCountMismatch {
                context,
                expected: 1,
                actual: args.len(),
            })
        }
    };

    let result = match method {
        Method::Contains => target.contains(needle.as_str()),
        Method::StartsWith => target.starts_with(needle.as_str()),
        Method::EndsWith => target.ends_with(needle.as_str()),
    };
    Ok(Value::Boolean(result))
}

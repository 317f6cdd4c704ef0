//! Human-readable rendering of expressions and lambdas.

use crate::expression::{ExprKind, Expression, Lambda};
use crate::value::Value;
use std::fmt;

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ExprKind::Parameter(p) => write!(f, "{}", p.name()),
            ExprKind::Constant(value) => write_literal(f, value),
            ExprKind::Member { object, field } => write!(f, "{}.{}", object, field),
            ExprKind::Binary { op, left, right } => {
                write!(f, "({} {} {})", left, op.as_str(), right)
            }
            ExprKind::Call {
                method,
                target,
                args,
            } => {
                write!(f, "{}.{}(", target, method.as_str())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parameters() {
            [single] => write!(f, "{}", single.name())?,
            params => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p.name())?;
                }
                write!(f, ")")?;
            }
        }
        write!(f, " => {}", self.body())
    }
}

fn write_literal(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::String(s) => write!(f, "{:?}", s),
        other => write!(f, "{}", other),
    }
}

#[cfg(test)]
mod tests {
    use crate::expression::builder::*;
    use crate::expression::Method;
    use crate::value::{DataType, RecordSchema};

    #[test]
    fn test_render_arithmetic_lambda() {
        let x = parameter("x", DataType::Int32);
        let y = parameter("y", DataType::Int32);
        let f = lambda(
            vec![x.clone(), y.clone()],
            add(multiply(param(&x), param(&y)).unwrap(), int(10)).unwrap(),
        )
        .unwrap();

        assert_eq!(f.to_string(), "(x, y) => ((x * y) + 10)");
    }

    #[test]
    fn test_render_predicate() {
        let num = parameter("num", DataType::Int32);
        let f = lambda(
            vec![num.clone()],
            and_also(
                greater_than(param(&num), int(5)).unwrap(),
                less_than(param(&num), int(10)).unwrap(),
            )
            .unwrap(),
        )
        .unwrap();

        assert_eq!(f.to_string(), "num => ((num > 5) AndAlso (num < 10))");
    }

    #[test]
    fn test_render_member_and_call() {
        let schema = RecordSchema::new(
            "Product",
            vec![("Name", DataType::Varchar), ("Price", DataType::Int32)],
        );
        let p = parameter("p", DataType::Record(schema));
        let expr = or_else(
            equal(member(param(&p), "Price").unwrap(), int(0)).unwrap(),
            call(
                Method::Contains,
                member(param(&p), "Name").unwrap(),
                vec![string("say \"hi\"")],
            )
            .unwrap(),
        )
        .unwrap();

        assert_eq!(
            expr.to_string(),
            r#"((p.Price == 0) OrElse p.Name.Contains("say \"hi\""))"#
        );
    }

    #[test]
    fn test_render_constants_and_nullary_lambda() {
        assert_eq!(boolean(true).to_string(), "true");
        assert_eq!(int(-3).to_string(), "-3");
        assert_eq!(lambda(vec![], int(1)).unwrap().to_string(), "() => 1");
    }
}

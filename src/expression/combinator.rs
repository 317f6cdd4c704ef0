//! Logical composition of independently built predicates.

use crate::expression::builder::{binary, lambda, parameter};
use crate::expression::type_checker::validate_predicate;
use crate::expression::visitor::substitute_parameter;
use crate::expression::{Connective, ExpressionError, ExpressionResult, Lambda};
use log::debug;

/// Name of the shared parameter a combined predicate is built over
pub const COMBINED_PARAMETER_NAME: &str = "x";

/// Join two single-parameter boolean lambdas with a logical connective
///
/// Each lambda's own parameter is rebound to one fresh parameter before the
/// bodies are combined, so the result takes a single argument.
pub fn combine_predicates(
    left: &Lambda,
    right: &Lambda,
    connective: Connective,
) -> ExpressionResult<Lambda> {
    let left_param = validate_predicate(left, "left predicate")?;
    let right_param = validate_predicate(right, "right predicate")?;

    if left_param.data_type() != right_param.data_type() {
        return Err(ExpressionError::TypeMismatch {
            expected: left_param.data_type().to_string(),
            actual: right_param.data_type().clone(),
            context: "combined predicate parameter".to_string(),
        });
    }

    let shared = parameter(COMBINED_PARAMETER_NAME, left_param.data_type().clone());
    let left_body = substitute_parameter(left.body(), left_param, &shared)?;
    let right_body = substitute_parameter(right.body(), right_param, &shared)?;

    let combined = lambda(
        vec![shared],
        binary(connective.operator(), left_body, right_body)?,
    )?;
    debug!("Combined {} and {} into {}", left, right, combined);
    Ok(combined)
}

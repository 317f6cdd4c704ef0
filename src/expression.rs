//! Expression tree framework.
//!
//! This module provides:
//! - Typed expression AST with identity-compared parameters
//! - Builder functions that validate operand types
//! - Whole-tree type checking
//! - Tree rewriting through transforms
//! - Predicate composition
//! - Evaluation and compilation of lambdas

pub mod builder;
pub mod combinator;
pub mod error;
pub mod eval;
pub mod expr;
pub mod operator;
pub mod type_checker;
pub mod visitor;

pub use combinator::combine_predicates;
pub use error::{ExpressionError, ExpressionResult};
pub use eval::{evaluate_lambda, CompiledLambda, ExpressionEvaluator};
pub use expr::{ExprKind, Expression, Lambda, Parameter};
pub use operator::{BinaryOperator, Connective, Method};
pub use type_checker::{type_check_expression, validate_predicate, TypeChecker};
pub use visitor::{
    map_lambda, map_tree, rewrite_constants, substitute_parameter, ConstantRewrite,
    ParameterSubstitution, Transform,
};

//! Text renderings of expression trees.
//!
//! - `Display` for expressions and lambdas (see `pretty`)
//! - Indented structural outlines for diagnostics
//! - SQL `WHERE` clauses for row predicates

pub mod outline;
pub mod pretty;
pub mod sql;

pub use outline::{outline, outline_lambda, LambdaOutline, Outline};
pub use sql::{to_sql, SqlRenderer};

//! Rendering of row predicates as SQL `WHERE` clauses.
//!
//! Only a small grammar is accepted: `AND`/`OR` over comparisons whose
//! operands are columns of the row parameter or literals, plus boolean
//! columns standing alone. Anything else is rejected rather than rendered
//! approximately.

use crate::expression::{
    validate_predicate, ExprKind, Expression, ExpressionError, ExpressionResult, Lambda, Parameter,
};
use crate::value::Value;
use log::debug;

const RENDERER: &str = "SQL";

/// Renders predicates over rows of one table
#[derive(Debug, Clone)]
pub struct SqlRenderer {
    table: String,
}

impl SqlRenderer {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    /// Render `SELECT * FROM <table> WHERE <predicate>`
    pub fn render_select(&self, predicate: &Lambda) -> ExpressionResult<String> {
        if !is_identifier(&self.table) {
            return Err(ExpressionError::UnsupportedNode {
                renderer: RENDERER,
                node: format!("table name {:?}", self.table),
            });
        }
        let condition = self.render_where(predicate)?;
        Ok(format!("SELECT * FROM {} WHERE {}", self.table, condition))
    }

    /// Render only the condition of a `WHERE` clause
    pub fn render_where(&self, predicate: &Lambda) -> ExpressionResult<String> {
        let row = validate_predicate(predicate, "SQL predicate")?;
        if row.data_type().as_record().is_none() {
            return Err(ExpressionError::UnsupportedNode {
                renderer: RENDERER,
                node: format!("row parameter {} of type {}", row.name(), row.data_type()),
            });
        }

        let sql = self.render_condition(predicate.body(), row)?;
        debug!("Rendered {} as {}", predicate, sql);
        Ok(sql)
    }

    fn render_condition(&self, expr: &Expression, row: &Parameter) -> ExpressionResult<String> {
        match expr.kind() {
            ExprKind::Binary { op, left, right } if op.is_logical() => Ok(format!(
                "{} {} {}",
                self.render_nested(left, row)?,
                sql_operator(expr)?,
                self.render_nested(right, row)?
            )),

            ExprKind::Binary { left, right, .. } => Ok(format!(
                "{} {} {}",
                self.render_operand(left, row)?,
                sql_operator(expr)?,
                self.render_operand(right, row)?
            )),

            ExprKind::Member { object, field } => column(expr, object, field, row),

            ExprKind::Constant(value @ Value::Boolean(_)) => literal(expr, value),

            _ => Err(unsupported(expr)),
        }
    }

    /// Logical operands are parenthesised so precedence never matters
    fn render_nested(&self, expr: &Expression, row: &Parameter) -> ExpressionResult<String> {
        let sql = self.render_condition(expr, row)?;
        match expr.kind() {
            ExprKind::Binary { op, .. } if op.is_logical() => Ok(format!("({})", sql)),
            _ => Ok(sql),
        }
    }

    fn render_operand(&self, expr: &Expression, row: &Parameter) -> ExpressionResult<String> {
        match expr.kind() {
            ExprKind::Member { object, field } => column(expr, object, field, row),
            ExprKind::Constant(value) => literal(expr, value),
            _ => Err(unsupported(expr)),
        }
    }
}

/// Convenience wrapper around [`SqlRenderer::render_select`]
pub fn to_sql(table: &str, predicate: &Lambda) -> ExpressionResult<String> {
    SqlRenderer::new(table).render_select(predicate)
}

fn sql_operator(expr: &Expression) -> ExpressionResult<&'static str> {
    match expr.kind() {
        ExprKind::Binary { op, .. } => op.sql_str().ok_or_else(|| unsupported(expr)),
        _ => Err(unsupported(expr)),
    }
}

fn column(
    expr: &Expression,
    object: &Expression,
    field: &str,
    row: &Parameter,
) -> ExpressionResult<String> {
    match object.kind() {
        ExprKind::Parameter(p) if p.same_as(row) && is_identifier(field) => Ok(field.to_string()),
        _ => Err(unsupported(expr)),
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, the only names emitted unquoted
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn literal(expr: &Expression, value: &Value) -> ExpressionResult<String> {
    match value {
        Value::Int32(n) => Ok(n.to_string()),
        Value::Boolean(true) => Ok("TRUE".to_string()),
        Value::Boolean(false) => Ok("FALSE".to_string()),
        Value::String(s) => Ok(format!("'{}'", s.replace('\'', "''"))),
        Value::Record(_) => Err(unsupported(expr)),
    }
}

fn unsupported(expr: &Expression) -> ExpressionError {
    ExpressionError::UnsupportedNode {
        renderer: RENDERER,
        node: format!("{} {}", expr.node_type(), expr),
    }
}

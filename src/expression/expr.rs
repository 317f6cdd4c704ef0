//! Expression AST definitions.
//!
//! Nodes are immutable once built and can only be created through the
//! functions in [`crate::expression::builder`], which validate operand types.
//! Parameters are shared handles compared by identity: two parameters that
//! happen to have the same name are still different variables.

use crate::expression::operator::{BinaryOperator, Method};
use crate::value::{DataType, Value};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Debug)]
struct ParameterDecl {
    name: String,
    data_type: DataType,
}

/// A named, typed free variable of a lambda
#[derive(Debug, Clone)]
pub struct Parameter(Arc<ParameterDecl>);

impl Parameter {
    pub(crate) fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self(Arc::new(ParameterDecl {
            name: name.into(),
            data_type,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn data_type(&self) -> &DataType {
        &self.0.data_type
    }

    /// Whether both handles denote the same parameter
    pub fn same_as(&self, other: &Parameter) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for Parameter {}

impl Hash for Parameter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state)
    }
}

/// Expression tree node together with its declared result type
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    kind: ExprKind,
    data_type: DataType,
}

/// The variant of an expression node
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Reference to a lambda parameter
    Parameter(Parameter),

    /// Literal constant value
    Constant(Value),

    /// Field access on a record-typed expression
    Member {
        object: Box<Expression>,
        field: String,
    },

    /// Binary operation
    Binary {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    /// Method call on a target value
    Call {
        method: Method,
        target: Box<Expression>,
        args: Vec<Expression>,
    },
}

impl Expression {
    pub(crate) fn from_parts(kind: ExprKind, data_type: DataType) -> Self {
        Self { kind, data_type }
    }

    pub fn kind(&self) -> &ExprKind {
        &self.kind
    }

    /// Declared result type of this node
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Short name of the node kind, used by diagnostics
    pub fn node_type(&self) -> &'static str {
        match &self.kind {
            ExprKind::Parameter(_) => "Parameter",
            ExprKind::Constant(_) => "Constant",
            ExprKind::Member { .. } => "MemberAccess",
            ExprKind::Binary { op, .. } => match op {
                BinaryOperator::Add => "Add",
                BinaryOperator::Subtract => "Subtract",
                BinaryOperator::Multiply => "Multiply",
                BinaryOperator::Divide => "Divide",
                BinaryOperator::Equal => "Equal",
                BinaryOperator::NotEqual => "NotEqual",
                BinaryOperator::GreaterThan => "GreaterThan",
                BinaryOperator::GreaterThanOrEqual => "GreaterThanOrEqual",
                BinaryOperator::LessThan => "LessThan",
                BinaryOperator::LessThanOrEqual => "LessThanOrEqual",
                BinaryOperator::AndAlso => "AndAlso",
                BinaryOperator::OrElse => "OrElse",
            },
            ExprKind::Call { .. } => "Call",
        }
    }

    /// Direct children, left to right
    pub fn children(&self) -> Vec<&Expression> {
        match &self.kind {
            ExprKind::Parameter(_) | ExprKind::Constant(_) => Vec::new(),
            ExprKind::Member { object, .. } => vec![object.as_ref()],
            ExprKind::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            ExprKind::Call { target, args, .. } => {
                let mut children = vec![target.as_ref()];
                children.extend(args.iter());
                children
            }
        }
    }

    /// Check if this expression is a constant (references no parameters)
    pub fn is_constant(&self) -> bool {
        match &self.kind {
            ExprKind::Parameter(_) => false,
            ExprKind::Constant(_) => true,
            _ => self.children().into_iter().all(|child| child.is_constant()),
        }
    }

    /// Whether `parameter` occurs anywhere in this tree
    pub fn references(&self, parameter: &Parameter) -> bool {
        match &self.kind {
            ExprKind::Parameter(p) => p.same_as(parameter),
            _ => self
                .children()
                .into_iter()
                .any(|child| child.references(parameter)),
        }
    }

    /// Distinct parameters referenced by this tree, in order of first occurrence
    pub fn free_parameters(&self) -> Vec<Parameter> {
        let mut found = Vec::new();
        self.collect_parameters(&mut found);
        found
    }

    fn collect_parameters(&self, found: &mut Vec<Parameter>) {
        match &self.kind {
            ExprKind::Parameter(p) => {
                if !found.iter().any(|seen| seen.same_as(p)) {
                    found.push(p.clone());
                }
            }
            _ => {
                for child in self.children() {
                    child.collect_parameters(found);
                }
            }
        }
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Expression::node_count)
            .sum::<usize>()
    }
}

/// A parameter list plus a body; the unit that gets evaluated or compiled
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    parameters: Vec<Parameter>,
    body: Expression,
}

impl Lambda {
    pub(crate) fn from_parts(parameters: Vec<Parameter>, body: Expression) -> Self {
        Self { parameters, body }
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn body(&self) -> &Expression {
        &self.body
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn return_type(&self) -> &DataType {
        self.body.data_type()
    }
}

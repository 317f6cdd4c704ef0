//! Operator definitions for expressions.

use crate::value::DataType;

/// Binary operators supported in expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,

    // Comparison
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,

    // Logical, short-circuiting
    AndAlso,
    OrElse,
}

impl BinaryOperator {
    /// Get the output type of this operator given input types
    pub fn output_type(&self, left: &DataType, right: &DataType) -> Option<DataType> {
        if self.is_arithmetic() {
            return match (left, right) {
                (DataType::Int32, DataType::Int32) => Some(DataType::Int32),
                _ => None,
            };
        }

        if self.is_ordering() {
            return match (left, right) {
                (DataType::Int32, DataType::Int32) => Some(DataType::Boolean),
                _ => None,
            };
        }

        if self.is_comparison() {
            // Equality takes any pair of same-typed scalars
            return match left {
                DataType::Record(_) => None,
                _ if left == right => Some(DataType::Boolean),
                _ => None,
            };
        }

        match (left, right) {
            (DataType::Boolean, DataType::Boolean) => Some(DataType::Boolean),
            _ => None,
        }
    }

    /// The operand type this operator requires, for error messages
    pub fn operand_requirement(&self) -> &'static str {
        if self.is_arithmetic() || self.is_ordering() {
            "Int32"
        } else if self.is_comparison() {
            "matching scalar types"
        } else {
            "Boolean"
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Subtract
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
        )
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Equal
                | BinaryOperator::NotEqual
                | BinaryOperator::GreaterThan
                | BinaryOperator::GreaterThanOrEqual
                | BinaryOperator::LessThan
                | BinaryOperator::LessThanOrEqual
        )
    }

    /// `<`, `<=`, `>` and `>=`, defined on numbers only
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            BinaryOperator::GreaterThan
                | BinaryOperator::GreaterThanOrEqual
                | BinaryOperator::LessThan
                | BinaryOperator::LessThanOrEqual
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::AndAlso | BinaryOperator::OrElse)
    }

    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::AndAlso => "AndAlso",
            BinaryOperator::OrElse => "OrElse",
        }
    }

    /// SQL spelling, for operators the SQL renderer accepts
    pub fn sql_str(&self) -> Option<&'static str> {
        match self {
            BinaryOperator::Equal => Some("="),
            BinaryOperator::NotEqual => Some("<>"),
            BinaryOperator::GreaterThan => Some(">"),
            BinaryOperator::GreaterThanOrEqual => Some(">="),
            BinaryOperator::LessThan => Some("<"),
            BinaryOperator::LessThanOrEqual => Some("<="),
            BinaryOperator::AndAlso => Some("AND"),
            BinaryOperator::OrElse => Some("OR"),
            _ => None,
        }
    }
}

/// Logical connective used to join two predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn operator(&self) -> BinaryOperator {
        match self {
            Connective::And => BinaryOperator::AndAlso,
            Connective::Or => BinaryOperator::OrElse,
        }
    }

    /// Apply the connective to already-computed operands
    pub fn apply(&self, left: bool, right: bool) -> bool {
        match self {
            Connective::And => left && right,
            Connective::Or => left || right,
        }
    }
}

/// String methods callable from an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Contains,
    StartsWith,
    EndsWith,
}

impl Method {
    /// Target type, argument types and result type of the method
    pub fn signature(&self) -> (DataType, Vec<DataType>, DataType) {
        match self {
            Method::Contains | Method::StartsWith | Method::EndsWith => {
                (DataType::Varchar, vec![DataType::Varchar], DataType::Boolean)
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Contains => "Contains",
            Method::StartsWith => "StartsWith",
            Method::EndsWith => "EndsWith",
        }
    }
}

//! Runtime values and the data types expressions are declared with.

use crate::expression::{ExpressionError, ExpressionResult};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Declared type of an expression node or value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum DataType {
    Boolean,
    Int32,
    Varchar,
    /// A row-like value with named, typed fields
    Record(Arc<RecordSchema>),
}

impl DataType {
    /// Whether arithmetic operators accept this type
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int32)
    }

    pub fn as_record(&self) -> Option<&Arc<RecordSchema>> {
        match self {
            DataType::Record(schema) => Some(schema),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Boolean => write!(f, "Boolean"),
            DataType::Int32 => write!(f, "Int32"),
            DataType::Varchar => write!(f, "Varchar"),
            DataType::Record(schema) => write!(f, "{}", schema.name),
        }
    }
}

/// Field layout of a record type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RecordSchema {
    pub name: String,
    pub fields: Vec<(String, DataType)>,
}

impl RecordSchema {
    pub fn new(name: impl Into<String>, fields: Vec<(&str, DataType)>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            fields: fields
                .into_iter()
                .map(|(field, data_type)| (field.to_string(), data_type))
                .collect(),
        })
    }

    /// Declared type of a field, if the schema has it
    pub fn field_type(&self, field: &str) -> Option<&DataType> {
        self.field_index(field).map(|idx| &self.fields[idx].1)
    }

    fn field_index(&self, field: &str) -> Option<usize> {
        self.fields.iter().position(|(name, _)| name == field)
    }
}

/// A record instance; values are stored in schema order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Record {
    schema: Arc<RecordSchema>,
    values: Vec<Value>,
}

impl Record {
    /// Create a record, checking the values against the schema
    pub fn new(schema: Arc<RecordSchema>, values: Vec<Value>) -> ExpressionResult<Self> {
        if values.len() != schema.fields.len() {
            return Err(ExpressionError::ArgumentCountMismatch {
                context: format!("record {}", schema.name),
                expected: schema.fields.len(),
                actual: values.len(),
            });
        }

        for ((field, data_type), value) in schema.fields.iter().zip(values.iter()) {
            if !value.is_compatible_with(data_type) {
                return Err(ExpressionError::TypeMismatch {
                    expected: data_type.to_string(),
                    actual: value.data_type(),
                    context: format!("field {}.{}", schema.name, field),
                });
            }
        }

        Ok(Self { schema, values })
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Look up a field value by name
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.schema.field_index(field).map(|idx| &self.values[idx])
    }
}

/// Values produced by evaluation and bound to parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Int32(i32),
    String(String),
    Record(Record),
}

impl Value {
    /// Get the data type of this value
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Boolean(_) => DataType::Boolean,
            Value::Int32(_) => DataType::Int32,
            Value::String(_) => DataType::Varchar,
            Value::Record(record) => DataType::Record(record.schema.clone()),
        }
    }

    /// Check if this value is compatible with the given data type
    pub fn is_compatible_with(&self, data_type: &DataType) -> bool {
        match (self, data_type) {
            (Value::Boolean(_), DataType::Boolean) => true,
            (Value::Int32(_), DataType::Int32) => true,
            (Value::String(_), DataType::Varchar) => true,
            (Value::Record(record), DataType::Record(schema)) => record.schema == *schema,
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Int32(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Record(record) => {
                write!(f, "{} {{ ", record.schema.name)?;
                for (i, ((field, _), value)) in record
                    .schema
                    .fields
                    .iter()
                    .zip(record.values.iter())
                    .enumerate()
                {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} = {}", field, value)?;
                }
                write!(f, " }}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int32(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_schema() -> Arc<RecordSchema> {
        RecordSchema::new(
            "Product",
            vec![
                ("Id", DataType::Int32),
                ("Name", DataType::Varchar),
                ("Price", DataType::Int32),
            ],
        )
    }

    #[test]
    fn test_value_data_type() {
        assert_eq!(Value::Boolean(true).data_type(), DataType::Boolean);
        assert_eq!(Value::Int32(1).data_type(), DataType::Int32);
        assert_eq!(Value::from("a").data_type(), DataType::Varchar);
    }

    #[test]
    fn test_record_field_access() {
        let schema = product_schema();
        let record = Record::new(
            schema.clone(),
            vec![1.into(), "Mouse".into(), 500.into()],
        )
        .unwrap();

        assert_eq!(record.get("Price"), Some(&Value::Int32(500)));
        assert_eq!(record.get("Name"), Some(&Value::from("Mouse")));
        assert_eq!(record.get("Weight"), None);
        assert_eq!(schema.field_type("Price"), Some(&DataType::Int32));
        assert!(Value::Record(record).is_compatible_with(&DataType::Record(schema)));
    }

    #[test]
    fn test_record_rejects_bad_values() {
        let schema = product_schema();

        assert!(matches!(
            Record::new(schema.clone(), vec![1.into()]),
            Err(ExpressionError::ArgumentCountMismatch {
                expected: 3,
                actual: 1,
                ..
            })
        ));

        assert!(matches!(
            Record::new(schema, vec![1.into(), 2.into(), 500.into()]),
            Err(ExpressionError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_distinct_schemas_are_not_compatible() {
        let other = RecordSchema::new("Course", vec![("Id", DataType::Int32)]);
        let record = Record::new(other, vec![7.into()]).unwrap();
        assert!(!Value::Record(record).is_compatible_with(&DataType::Record(product_schema())));
    }

    #[test]
    fn test_value_display() {
        let record = Record::new(
            product_schema(),
            vec![2.into(), "Mouse".into(), 500.into()],
        )
        .unwrap();
        assert_eq!(
            Value::Record(record).to_string(),
            "Product { Id = 2, Name = Mouse, Price = 500 }"
        );
        assert_eq!(Value::Boolean(false).to_string(), "false");
    }
}

use std::sync::Arc;

use allocative::Allocative;
use bitvec::prelude::*;

use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::value::Value;

/// Column definition in the schema: a name and its declared type.
#[derive(Debug, Clone, PartialEq, Allocative)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Physical storage for column data.
/// Each variant wraps a collection of a specific type to ensure contiguous memory
/// allocation (columnar storage).
#[derive(Debug, Clone, Allocative)]
pub enum ColumnData {
    /// Vector of 64-bit integers.
    Int(Vec<i64>),
    /// Vector of 64-bit floats.
    Double(Vec<f64>),
    /// Vector of reference-counted strings.
    Text(Vec<Arc<str>>),
    /// Compact bit-vector for boolean values.
    Bool(#[allocative(skip)] BitVec),
}

/// Stores every value of one column, in row order.
#[derive(Debug, Clone, Allocative)]
pub struct Column {
    /// The logical data type of the column.
    pub data_type: DataType,
    /// The actual values stored in the column.
    pub data: ColumnData,
}

impl Column {
    /// Creates a new, empty column for the given data type.
    pub fn new(data_type: DataType) -> Self {
        let data = match data_type {
            DataType::Int => ColumnData::Int(vec![]),
            DataType::Double => ColumnData::Double(vec![]),
            DataType::Bool => ColumnData::Bool(bitvec!()),
            DataType::String => ColumnData::Text(vec![]),
        };
        Self { data_type, data }
    }

    /// Appends a new value to the end of the column.
    ///
    /// # Errors
    /// Returns [Error::Value] if the value's type does not match the column's data type.
    /// The column is left unchanged in that case.
    ///
    /// # Example
    /// ```
    /// # use simpledb::column::Column;
    /// # use simpledb::{DataType, Value};
    /// let mut col = Column::new(DataType::Int);
    /// col.push(Value::Int(30)).unwrap();
    ///
    /// assert_eq!(col.len(), 1);
    /// assert!(col.push(Value::Bool(true)).is_err());
    /// ```
    pub fn push(&mut self, value: Value) -> Result<()> {
        match (&mut self.data, value) {
            (ColumnData::Int(col), Value::Int(v)) => col.push(v),
            (ColumnData::Double(col), Value::Double(v)) => col.push(v),
            (ColumnData::Text(col), Value::Text(v)) => col.push(v),
            (ColumnData::Bool(col), Value::Bool(v)) => col.push(v),
            (_, value) => {
                return Err(Error::value(format!(
                    "value {value} has type {} while column data type is {}",
                    value.data_type(),
                    self.data_type
                )));
            }
        }
        Ok(())
    }

    /// Returns the number of values currently stored in the column.
    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Int(col) => col.len(),
            ColumnData::Double(col) => col.len(),
            ColumnData::Text(col) => col.len(),
            ColumnData::Bool(col) => col.len(),
        }
    }

    /// Returns true if there is no value in the column, else false.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retrieves the value at the specified row index, or `None` if it is out of bounds.
    pub fn get(&self, row_idx: usize) -> Option<Value> {
        match &self.data {
            ColumnData::Int(col) => col.get(row_idx).map(|v| Value::Int(*v)),
            ColumnData::Double(col) => col.get(row_idx).map(|v| Value::Double(*v)),
            ColumnData::Text(col) => col.get(row_idx).map(|v| Value::Text(Arc::clone(v))),
            ColumnData::Bool(col) => col.get(row_idx).map(|v| Value::Bool(*v)),
        }
    }

    /// Shortens the column to `len` values. Used to undo a partially applied row insertion.
    pub(crate) fn truncate(&mut self, len: usize) {
        match &mut self.data {
            ColumnData::Int(col) => col.truncate(len),
            ColumnData::Double(col) => col.truncate(len),
            ColumnData::Text(col) => col.truncate(len),
            ColumnData::Bool(col) => col.truncate(len),
        }
    }
}

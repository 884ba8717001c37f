use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use allocative::Allocative;

use crate::data_type::DataType;
use crate::error::{Error, Result};

/// Represents a single data value stored in the database.
///
/// There is no `NULL`: every cell holds a value of its column's declared type.
#[derive(Debug, Clone, PartialEq, Allocative)]
pub enum Value {
    /// A 64-bit signed integer value.
    Int(i64),
    /// A finite 64-bit floating-point value.
    Double(f64),
    /// A UTF-8 string value, wrapped in an [Arc] for cheap cloning.
    Text(Arc<str>),
    /// A boolean value.
    Bool(bool),
}

impl Value {
    /// Returns the inner integer value if this is a [Value::Int].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the inner float value if this is a [Value::Double].
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns a reference to the inner string slice if this is a [Value::Text].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the inner boolean value if this is a [Value::Bool].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the logical [DataType] corresponding to this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int(_) => DataType::Int,
            Self::Double(_) => DataType::Double,
            Self::Text(_) => DataType::String,
            Self::Bool(_) => DataType::Bool,
        }
    }

    /// Coerces a raw literal into a value of the given type.
    ///
    /// # Errors
    /// Returns [Error::Value] if an `int` or `double` literal is not a valid number.
    /// `bool` never fails: only `true` and `1` (case-insensitive) are true.
    ///
    /// # Example
    /// ```
    /// # use simpledb::{DataType, Value};
    /// assert_eq!(Value::parse("42", DataType::Int).unwrap(), Value::Int(42));
    /// assert_eq!(Value::parse("TRUE", DataType::Bool).unwrap(), Value::Bool(true));
    /// assert!(Value::parse("x", DataType::Int).is_err());
    /// ```
    pub fn parse(text: &str, data_type: DataType) -> Result<Self> {
        match data_type {
            DataType::Int => text
                .parse::<i64>()
                .map(Self::Int)
                .map_err(|e| Error::value(format!("'{text}' is not a valid int: {e}"))),
            DataType::Double => {
                let f = text
                    .parse::<f64>()
                    .map_err(|e| Error::value(format!("'{text}' is not a valid double: {e}")))?;
                if !f.is_finite() {
                    return Err(Error::value(format!("'{text}' is not a finite double")));
                }
                Ok(Self::Double(f))
            }
            DataType::Bool => {
                let lower = text.to_lowercase();
                Ok(Self::Bool(lower == "true" || lower == "1"))
            }
            DataType::String => Ok(Self::Text(Arc::from(text))),
        }
    }

    /// Orders two values of the same kind.
    ///
    /// Doubles compare by magnitude, so `-0.0` equals `0.0`.
    ///
    /// # Errors
    /// Returns [Error::Value] when the two values hold different kinds, or for a NaN double.
    pub fn compare(&self, other: &Value) -> Result<Ordering> {
        match (self, other) {
            (Self::Int(l), Self::Int(r)) => Ok(l.cmp(r)),
            (Self::Double(l), Self::Double(r)) => l
                .partial_cmp(r)
                .ok_or_else(|| Error::value(format!("cannot order doubles {l} and {r}"))),
            (Self::Text(l), Self::Text(r)) => Ok(l.as_bytes().cmp(r.as_bytes())),
            (Self::Bool(l), Self::Bool(r)) => Ok(l.cmp(r)),
            _ => Err(Error::value(format!(
                "cannot compare {} value {} with {} value {}",
                self.data_type(),
                self,
                other.data_type(),
                other
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

use std::fmt;
use std::str::FromStr;

use allocative::Allocative;

use crate::error::Error;

/// Represents the supported data types in the database schema.
/// A column's type is fixed when the table is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Allocative)]
pub enum DataType {
    /// A 64-bit signed integer.
    Int,
    /// A 64-bit floating-point number.
    Double,
    /// A variable-length UTF-8 character string.
    String,
    /// A boolean value (true or false).
    Bool,
}

impl DataType {
    /// The canonical lowercase name, as reported by `DESCRIBE`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Double => "double",
            Self::String => "string",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a declared column type. Matching is case-insensitive and accepts the usual aliases.
impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "int" | "integer" => Ok(Self::Int),
            "double" | "float" | "real" => Ok(Self::Double),
            "string" | "text" | "varchar" => Ok(Self::String),
            "bool" | "boolean" => Ok(Self::Bool),
            _ => Err(Error::syntax(format!("unknown column type '{s}'"))),
        }
    }
}

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::column::ColumnDef;
use crate::error::Error;

/// One parsed statement of the command language.
#[derive(Debug, PartialEq)]
pub enum Statement {
    CreateTable(CreateTable),
    InsertInto(InsertInto),
    Select(Select),
    DropTable { name: String },
    ShowTables,
    Describe { name: String },
    /// A statement kind the engine does not support.
    Unrecognized(String),
}

#[derive(Debug, PartialEq)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

/// Values stay raw text until the target table coerces them by column type.
#[derive(Debug, PartialEq)]
pub struct InsertInto {
    pub table: String,
    pub values: Vec<String>,
}

#[derive(Debug, PartialEq)]
pub enum ColumnsSelect {
    Star,
    ColumnsNames(Vec<String>),
}

#[derive(Debug, PartialEq)]
pub struct Select {
    pub columns: ColumnsSelect,
    pub table: String,
    pub where_clause: Option<Predicate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

impl ComparisonOp {
    /// Tells whether an ordering between a stored value and a literal satisfies the operator.
    pub fn matches(&self, ord: Ordering) -> bool {
        match self {
            Self::Eq => ord == Ordering::Equal,
            Self::NotEq => ord != Ordering::Equal,
            Self::Lt => ord == Ordering::Less,
            Self::Gt => ord == Ordering::Greater,
            Self::LtEq => ord != Ordering::Greater,
            Self::GtEq => ord != Ordering::Less,
        }
    }
}

impl FromStr for ComparisonOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Self::Eq),
            "!=" | "<>" => Ok(Self::NotEq),
            "<" => Ok(Self::Lt),
            ">" => Ok(Self::Gt),
            "<=" => Ok(Self::LtEq),
            ">=" => Ok(Self::GtEq),
            _ => Err(Error::syntax(format!("unsupported operator '{s}'"))),
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
        };
        f.write_str(op)
    }
}

/// The single `column operator literal` condition of a `WHERE` clause.
///
/// The literal is kept as text: its type depends on the column it is compared with.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: String,
    pub op: ComparisonOp,
    pub literal: String,
}

impl Predicate {
    /// Builds a predicate from its three tokens.
    pub fn from_parts(column: &str, op: &str, literal: &str) -> Result<Self, Error> {
        Ok(Self {
            column: column.to_string(),
            op: op.parse()?,
            literal: literal.to_string(),
        })
    }
}

/// Parses `column op literal`; anything other than exactly three words is rejected.
impl FromStr for Predicate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        match parts.as_slice() {
            [column, op, literal] => Self::from_parts(column, op, literal),
            _ => Err(Error::syntax(format!(
                "condition must be 'column operator value', got '{s}'"
            ))),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.op, self.literal)
    }
}

//! SimpleDB: an in-memory relational engine driven by a small SQL-like language.
//!
//! A statement goes through the [tokenizer], the [parser] and is then dispatched by the
//! [Database] to the [Table] it names.

pub mod ast;
pub mod column;
pub mod data_type;
pub mod database;
pub mod error;
pub mod parser;
pub mod result;
pub mod sample;
pub mod shell;
pub mod table;
pub mod tokenizer;
pub mod value;

pub use column::ColumnDef;
pub use data_type::DataType;
pub use database::{Database, DatabaseInfo, Outcome};
pub use error::{Error, Result};
pub use result::QueryResult;
pub use shell::Shell;
pub use table::{Row, Schema, Table};
pub use value::Value;

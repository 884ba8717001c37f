use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};

use allocative::Allocative;
use tracing::{debug, info};

use crate::ast::{ColumnsSelect, CreateTable, InsertInto, Select, Statement};
use crate::error::{Error, Result};
use crate::parser;
use crate::result::QueryResult;
use crate::table::{Schema, Table};
use crate::value::Value;

/// The main entry point for the in-memory database engine.
/// It owns every table and routes parsed statements to them.
#[derive(Debug, Default, Allocative)]
pub struct Database {
    /// A map of table names to their respective [Table] structures.
    tables: HashMap<String, Table>,
}

/// What a successfully executed statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created { table: String },
    Inserted { table: String, rows: usize },
    Dropped { table: String },
    /// Result of a `SELECT`.
    Rows(QueryResult),
    /// Result of `SHOW TABLES`: one `(name, rows)` line per table, sorted by name.
    Tables(QueryResult),
    /// Result of `DESCRIBE`: one `(name, type)` line per column, plus the table's row count.
    Described {
        table: String,
        columns: QueryResult,
        rows: usize,
    },
    /// Blank input.
    Empty,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { table } => write!(f, "Table '{table}' created successfully."),
            Self::Inserted { rows, .. } if *rows == 1 => write!(f, "1 row inserted."),
            Self::Inserted { rows, .. } => write!(f, "{rows} rows inserted."),
            Self::Dropped { table } => write!(f, "Table '{table}' dropped successfully."),
            Self::Rows(result) => write!(f, "{result}"),
            Self::Tables(result) => write!(
                f,
                "Tables in database:\n{}({} tables)",
                result.render_grid(),
                result.row_count()
            ),
            Self::Described {
                table,
                columns,
                rows,
            } => write!(
                f,
                "Table: {table}\n{}({} columns, {rows} rows)",
                columns.render_grid(),
                columns.row_count()
            ),
            Self::Empty => Ok(()),
        }
    }
}

/// Size of the database, as reported by the shell's `info` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseInfo {
    pub tables: usize,
    pub rows: usize,
    /// Heap memory held by all tables, in bytes.
    pub heap_bytes: usize,
}

impl fmt::Display for DatabaseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== SimpleDB Database Information ===")?;
        writeln!(f, "Total tables: {}", self.tables)?;
        writeln!(f, "Total rows: {}", self.rows)?;
        writeln!(f, "Heap bytes: {}", self.heap_bytes)?;
        write!(f, "=====================================")
    }
}

impl Database {
    /// Creates a new, empty database instance.
    pub fn new() -> Self {
        Self {
            tables: HashMap::default(),
        }
    }

    /// Creates a new table in the database.
    ///
    /// # Errors
    /// Returns [Error::Schema] if a table with the same name already exists, or if the
    /// schema declares the same column twice. The registry is unchanged on error.
    pub fn create_table(&mut self, name: &str, schema: Schema) -> Result<()> {
        if self.has_table(name) {
            return Err(Error::schema(format!("table '{name}' already exists")));
        }
        let table = Table::with_schema(name, schema)?;
        self.tables.insert(name.to_string(), table);
        info!(table = name, "created table");
        Ok(())
    }

    /// Removes a table and all of its rows.
    ///
    /// # Errors
    /// Returns [Error::Schema] if the table does not exist.
    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        match self.tables.remove(name) {
            Some(table) => {
                info!(table = name, rows = table.row_count(), "dropped table");
                Ok(())
            }
            None => Err(not_found(name)),
        }
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Retrieves a reference to a table by name.
    pub fn get_table(&self, name: &str) -> Result<&Table> {
        self.tables.get(name).ok_or_else(|| not_found(name))
    }

    /// Retrieves a mutable reference to a table by name.
    pub fn get_table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables.get_mut(name).ok_or_else(|| not_found(name))
    }

    /// Returns the names of all tables, sorted lexicographically.
    pub fn list_tables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn info(&self) -> DatabaseInfo {
        DatabaseInfo {
            tables: self.tables.len(),
            rows: self.tables.values().map(Table::row_count).sum(),
            heap_bytes: allocative::size_of_unique_allocated_data(&self.tables),
        }
    }

    /// Appends one row given as raw text to a table.
    pub fn insert_into<S: AsRef<str>>(&mut self, table: &str, values: &[S]) -> Result<()> {
        self.get_table_mut(table)?.insert_values(values)
    }

    /// Runs a `SELECT`: filters the rows, then projects the requested columns.
    pub fn select(&self, select: &Select) -> Result<QueryResult> {
        let table = self.get_table(&select.table)?;
        let indices = table.select_rows(select.where_clause.as_ref())?;
        let projection: &[String] = match &select.columns {
            ColumnsSelect::Star => &[],
            ColumnsSelect::ColumnsNames(names) => names,
        };
        Ok(table.project_rows(&indices, projection))
    }

    /// One `(Table Name, Rows)` line per table, sorted by name.
    pub fn show_tables(&self) -> QueryResult {
        let rows = self
            .list_tables()
            .into_iter()
            .filter_map(|name| self.tables.get(name))
            .map(|table| {
                vec![
                    Value::Text(table.name.as_str().into()),
                    Value::Int(table.row_count() as i64),
                ]
            })
            .collect();
        QueryResult::new(vec!["Table Name".into(), "Rows".into()], rows)
    }

    /// The schema of a table as `(Column Name, Type)` lines, plus its row count.
    pub fn describe(&self, name: &str) -> Result<(QueryResult, usize)> {
        let table = self.get_table(name)?;
        let rows = table
            .columns()
            .iter()
            .map(|def| {
                vec![
                    Value::Text(def.name.as_str().into()),
                    Value::Text(def.data_type.name().into()),
                ]
            })
            .collect();
        let columns = QueryResult::new(vec!["Column Name".into(), "Type".into()], rows);
        Ok((columns, table.row_count()))
    }

    /// Parses and runs one statement.
    ///
    /// # Errors
    /// Returns the first error met while parsing or running the statement. A failing
    /// statement leaves the database as it was.
    ///
    /// # Example
    /// ```
    /// use simpledb::{Database, Outcome, Value};
    /// let mut db = Database::new();
    /// db.execute("CREATE TABLE users (id int, name string)").unwrap();
    /// db.execute("INSERT INTO users VALUES (1, Alice)").unwrap();
    ///
    /// let Outcome::Rows(result) = db.execute("SELECT name FROM users WHERE id = 1").unwrap() else {
    ///     panic!("expected rows");
    /// };
    /// assert_eq!(result.rows, vec![vec![Value::Text("Alice".into())]]);
    /// ```
    pub fn execute(&mut self, sql: &str) -> Result<Outcome> {
        if sql.trim().is_empty() {
            return Ok(Outcome::Empty);
        }
        let statement = parser::parse(sql)?;

        match statement {
            Statement::CreateTable(CreateTable { name, columns }) => {
                self.create_table(&name, Schema { columns })?;
                Ok(Outcome::Created { table: name })
            }
            Statement::InsertInto(InsertInto { table, values }) => {
                self.insert_into(&table, &values)?;
                Ok(Outcome::Inserted { table, rows: 1 })
            }
            Statement::Select(select) => self.select(&select).map(Outcome::Rows),
            Statement::DropTable { name } => {
                self.drop_table(&name)?;
                Ok(Outcome::Dropped { table: name })
            }
            Statement::ShowTables => Ok(Outcome::Tables(self.show_tables())),
            Statement::Describe { name } => {
                let (columns, rows) = self.describe(&name)?;
                Ok(Outcome::Described {
                    table: name,
                    columns,
                    rows,
                })
            }
            // only terminators, e.g. `;`
            Statement::Unrecognized(keyword) if keyword.is_empty() => Ok(Outcome::Empty),
            Statement::Unrecognized(keyword) => Err(Error::syntax(format!(
                "unsupported statement: '{keyword}'"
            ))),
        }
    }

    /// Runs one statement and writes its rendered outcome to `out`.
    ///
    /// Statement errors are written to `out` as `Error: <message>` and are not returned:
    /// the caller can keep sending statements. Only a failure of `out` itself is returned.
    pub fn execute_query<W: Write>(&mut self, sql: &str, out: &mut W) -> io::Result<()> {
        match self.execute(sql) {
            Ok(Outcome::Empty) => Ok(()),
            Ok(outcome) => writeln!(out, "{outcome}"),
            Err(e) => {
                debug!(error = %e, sql, "statement failed");
                writeln!(out, "Error: {e}")
            }
        }
    }
}

fn not_found(name: &str) -> Error {
    Error::schema(format!("table '{name}' not found"))
}

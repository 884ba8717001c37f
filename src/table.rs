use std::collections::HashMap;

use allocative::Allocative;
use tracing::warn;

use crate::ast::Predicate;
use crate::column::{Column, ColumnDef};
use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::result::QueryResult;
use crate::value::Value;

/// One row: a value per column, in schema order.
pub type Row = Vec<Value>;

#[derive(Debug, Clone, Default, Allocative)]
pub struct Schema {
    pub columns: Vec<ColumnDef>,
}

/// A named relation: its schema and its rows, stored column by column.
///
/// Rows are append-only. Every stored row has exactly one value per column, of that
/// column's declared type.
#[derive(Debug, Clone, Allocative)]
pub struct Table {
    pub name: String,
    pub schema: Schema,
    columns: Vec<Column>,
    column_index: HashMap<String, usize>,
    row_count: usize,
}

impl Table {
    /// Creates a table with no columns and no rows.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: Schema::default(),
            columns: vec![],
            column_index: HashMap::new(),
            row_count: 0,
        }
    }

    /// Creates a table and declares every column of `schema`, in order.
    ///
    /// # Errors
    /// Fails with [Error::Schema] if two columns share a name.
    pub fn with_schema(name: impl Into<String>, schema: Schema) -> Result<Self> {
        let mut table = Self::new(name);
        for column in schema.columns {
            table.add_column(column.name, column.data_type)?;
        }
        Ok(table)
    }

    /// Appends a column to the schema.
    ///
    /// # Errors
    /// Fails with [Error::Schema] if the name is already taken, or if the table already holds
    /// rows (they would have no value for the new column).
    pub fn add_column(&mut self, name: impl Into<String>, data_type: DataType) -> Result<()> {
        let name = name.into();
        if self.column_index.contains_key(&name) {
            return Err(Error::schema(format!(
                "column '{name}' already exists in table '{}'",
                self.name
            )));
        }
        if self.row_count > 0 {
            return Err(Error::schema(format!(
                "cannot add column '{name}' to non-empty table '{}'",
                self.name
            )));
        }
        self.column_index.insert(name.clone(), self.columns.len());
        self.columns.push(Column::new(data_type));
        self.schema.columns.push(ColumnDef { name, data_type });
        Ok(())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index.contains_key(name)
    }

    /// Position of a column in the schema.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.column_index.get(name).copied().ok_or_else(|| {
            Error::schema(format!("column '{name}' not found in table '{}'", self.name))
        })
    }

    /// The column definitions, in declaration order.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.schema.columns
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Appends a typed row.
    ///
    /// # Errors
    /// - [Error::Schema] if the row does not have one value per column.
    /// - [Error::Value] if a value's type differs from its column's type.
    ///
    /// Nothing is stored unless the whole row is accepted.
    pub fn insert_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::schema(format!(
                "row has {} values but table '{}' has {} columns",
                row.len(),
                self.name,
                self.columns.len()
            )));
        }
        for (value, def) in row.iter().zip(&self.schema.columns) {
            if value.data_type() != def.data_type {
                return Err(Error::value(format!(
                    "value {value} has type {} but column '{}' is {}",
                    value.data_type(),
                    def.name,
                    def.data_type
                )));
            }
        }

        for (i, value) in row.into_iter().enumerate() {
            if let Err(e) = self.columns[i].push(value) {
                for column in &mut self.columns[..i] {
                    column.truncate(self.row_count);
                }
                return Err(e);
            }
        }
        self.row_count += 1;
        Ok(())
    }

    /// Appends a row given as raw text, coercing each value by its column's type.
    ///
    /// # Errors
    /// - [Error::Schema] if the number of values differs from the number of columns.
    /// - [Error::Value] if a value cannot be coerced; no row is appended.
    ///
    /// # Example
    /// ```
    /// # use simpledb::{DataType, Table, Value};
    /// let mut table = Table::new("users");
    /// table.add_column("id", DataType::Int).unwrap();
    /// table.add_column("name", DataType::String).unwrap();
    ///
    /// table.insert_values(&["1", "Alice"]).unwrap();
    /// assert!(table.insert_values(&["x", "Bob"]).is_err());
    ///
    /// assert_eq!(table.row_count(), 1);
    /// assert_eq!(table.get_row(0), Some(vec![Value::Int(1), Value::Text("Alice".into())]));
    /// ```
    pub fn insert_values<S: AsRef<str>>(&mut self, values: &[S]) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(Error::schema(format!(
                "{} values given but table '{}' has {} columns",
                values.len(),
                self.name,
                self.columns.len()
            )));
        }
        let row = values
            .iter()
            .zip(&self.schema.columns)
            .map(|(value, def)| Value::parse(value.as_ref(), def.data_type))
            .collect::<Result<Row>>()?;
        self.insert_row(row)
    }

    pub fn get_row(&self, row_idx: usize) -> Option<Row> {
        if self.row_count <= row_idx {
            return None;
        }
        self.columns.iter().map(|col| col.get(row_idx)).collect()
    }

    /// Indices of every stored row, in storage order.
    pub fn scan(&self) -> Vec<usize> {
        (0..self.row_count).collect()
    }

    /// Indices of the rows matching `predicate`, in storage order. `None` selects every row.
    ///
    /// This is a full scan of the predicate's column. A predicate naming an unknown column
    /// matches nothing.
    ///
    /// # Errors
    /// Returns [Error::Value] if the literal cannot be coerced to the column's type.
    pub fn select_rows(&self, predicate: Option<&Predicate>) -> Result<Vec<usize>> {
        let Some(predicate) = predicate else {
            return Ok(self.scan());
        };
        let Some((idx, literal)) = self.resolve(predicate)? else {
            warn!(
                table = %self.name,
                column = %predicate.column,
                "condition on unknown column matches no rows"
            );
            return Ok(vec![]);
        };

        let column = &self.columns[idx];
        let mut selected = vec![];
        for row_idx in 0..self.row_count {
            if let Some(value) = column.get(row_idx) {
                if Self::holds(predicate, &value, &literal)? {
                    selected.push(row_idx);
                }
            }
        }
        Ok(selected)
    }

    /// Tests a single row against `predicate`.
    ///
    /// Returns `Ok(false)` if the predicate names a column this table does not have.
    pub fn evaluate_condition(&self, row: &[Value], predicate: &Predicate) -> Result<bool> {
        let Some((idx, literal)) = self.resolve(predicate)? else {
            return Ok(false);
        };
        let value = row.get(idx).ok_or_else(|| {
            Error::schema(format!(
                "row has {} values but column '{}' is at position {idx}",
                row.len(),
                predicate.column
            ))
        })?;
        Self::holds(predicate, value, &literal)
    }

    /// Column position and typed literal of `predicate`, or `None` for an unknown column.
    fn resolve(&self, predicate: &Predicate) -> Result<Option<(usize, Value)>> {
        let Some(&idx) = self.column_index.get(&predicate.column) else {
            return Ok(None);
        };
        let literal = Value::parse(&predicate.literal, self.schema.columns[idx].data_type)?;
        Ok(Some((idx, literal)))
    }

    fn holds(predicate: &Predicate, value: &Value, literal: &Value) -> Result<bool> {
        Ok(predicate.op.matches(value.compare(literal)?))
    }

    /// Builds the result set for the given rows.
    ///
    /// An empty `projection` keeps every column in schema order; otherwise only the named
    /// columns that exist are kept, in the order given. Out-of-range indices are skipped.
    pub fn project_rows(&self, row_indices: &[usize], projection: &[String]) -> QueryResult {
        let selected: Vec<(usize, String)> = if projection.is_empty() {
            self.schema
                .columns
                .iter()
                .enumerate()
                .map(|(i, def)| (i, def.name.clone()))
                .collect()
        } else {
            projection
                .iter()
                .filter_map(|name| self.column_index.get(name).map(|&i| (i, name.clone())))
                .collect()
        };

        let rows = row_indices
            .iter()
            .filter(|&&row_idx| row_idx < self.row_count)
            .map(|&row_idx| {
                selected
                    .iter()
                    .filter_map(|(col_idx, _)| self.columns[*col_idx].get(row_idx))
                    .collect()
            })
            .collect();

        QueryResult::new(selected.into_iter().map(|(_, name)| name).collect(), rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Table {
        let schema = Schema {
            columns: vec![
                ColumnDef::new("id", DataType::Int),
                ColumnDef::new("name", DataType::String),
                ColumnDef::new("age", DataType::Int),
            ],
        };
        let mut table = Table::with_schema("users", schema).unwrap();
        table.insert_values(&["1", "Alice", "30"]).unwrap();
        table.insert_values(&["2", "Bob", "25"]).unwrap();
        table.insert_values(&["3", "Charlie", "30"]).unwrap();
        table
    }

    #[test]
    fn test_table_creation() {
        let table = users();

        assert_eq!(table.columns().len(), 3);
        assert_eq!(table.column_index("age"), Ok(2));
        assert!(table.has_column("name"));
        assert!(!table.has_column("Name"));
        assert!(matches!(table.column_index("email"), Err(Error::Schema(_))));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut table = Table::new("t");
        table.add_column("a", DataType::Int).unwrap();

        let err = table.add_column("a", DataType::Bool);

        assert!(matches!(err, Err(Error::Schema(_))));
        assert_eq!(table.columns().len(), 1);
    }

    #[test]
    fn test_add_column_after_rows_rejected() {
        let mut table = users();

        assert!(matches!(
            table.add_column("email", DataType::String),
            Err(Error::Schema(_))
        ));
    }

    #[test]
    fn test_insert_and_get() {
        let table = users();

        assert_eq!(table.row_count(), 3);
        assert_eq!(
            table.get_row(1),
            Some(vec![Value::Int(2), Value::Text("Bob".into()), Value::Int(25)])
        );
        assert_eq!(table.get_row(3), None);
    }

    #[test]
    fn test_insert_typed_row() {
        let mut table = users();

        table
            .insert_row(vec![Value::Int(4), Value::Text("Diana".into()), Value::Int(28)])
            .unwrap();

        assert_eq!(table.row_count(), 4);
    }

    #[test]
    fn test_column_count_mismatch() {
        let mut table = users();

        assert!(matches!(
            table.insert_row(vec![Value::Int(1)]),
            Err(Error::Schema(_))
        ));
        assert!(matches!(
            table.insert_values(&["1", "a", "2", "3"]),
            Err(Error::Schema(_))
        ));
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_type_mismatch_leaves_table_intact() {
        let mut table = users();

        let result = table.insert_row(vec![
            Value::Int(4),
            Value::Text("Diana".into()),
            Value::Text("old".into()),
        ]);

        assert!(matches!(result, Err(Error::Value(_))));
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.get_row(3), None);
        assert_eq!(table.select_rows(None).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_bad_literal_is_value_error() {
        let mut table = users();

        let result = table.insert_values(&["4", "Diana", "twenty"]);

        assert!(matches!(result, Err(Error::Value(_))));
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_select_rows() {
        let table = users();

        let pred: Predicate = "age = 30".parse().unwrap();
        assert_eq!(table.select_rows(Some(&pred)).unwrap(), vec![0, 2]);

        let pred: Predicate = "age != 30".parse().unwrap();
        assert_eq!(table.select_rows(Some(&pred)).unwrap(), vec![1]);

        let pred: Predicate = "name < Bob".parse().unwrap();
        assert_eq!(table.select_rows(Some(&pred)).unwrap(), vec![0]);

        let pred: Predicate = "id >= 2".parse().unwrap();
        assert_eq!(table.select_rows(Some(&pred)).unwrap(), vec![1, 2]);

        assert_eq!(table.select_rows(None).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_select_unknown_column_matches_nothing() {
        let table = users();

        let pred: Predicate = "email = x".parse().unwrap();
        assert!(table.select_rows(Some(&pred)).unwrap().is_empty());
    }

    #[test]
    fn test_select_bad_literal_fails() {
        let table = users();

        let pred: Predicate = "age > old".parse().unwrap();
        assert!(matches!(
            table.select_rows(Some(&pred)),
            Err(Error::Value(_))
        ));
    }

    #[test]
    fn test_evaluate_condition() {
        let table = users();
        let row = table.get_row(0).unwrap();

        assert!(table
            .evaluate_condition(&row, &"name = Alice".parse().unwrap())
            .unwrap());
        assert!(!table
            .evaluate_condition(&row, &"age < 30".parse().unwrap())
            .unwrap());
        assert!(table
            .evaluate_condition(&row, &"age <= 30".parse().unwrap())
            .unwrap());
        assert!(!table
            .evaluate_condition(&row, &"missing = 1".parse().unwrap())
            .unwrap());
    }

    #[test]
    fn test_select_rows_agrees_with_evaluate_condition() {
        let table = users();

        for text in ["age = 30", "age > 25", "name != Bob", "id <= 2", "name >= Alice"] {
            let pred: Predicate = text.parse().unwrap();
            let expected: Vec<usize> = table
                .scan()
                .into_iter()
                .filter(|&i| {
                    let row = table.get_row(i).unwrap();
                    table.evaluate_condition(&row, &pred).unwrap()
                })
                .collect();
            assert_eq!(table.select_rows(Some(&pred)).unwrap(), expected, "{text}");
        }
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        let mut table = Table::new("p");
        table.add_column("x", DataType::Double).unwrap();
        table.insert_values(&["-0.0"]).unwrap();
        table.insert_values(&["0.5"]).unwrap();

        let pred: Predicate = "x = 0".parse().unwrap();
        assert_eq!(table.select_rows(Some(&pred)).unwrap(), vec![0]);

        let pred: Predicate = "x < 0".parse().unwrap();
        assert!(table.select_rows(Some(&pred)).unwrap().is_empty());
    }

    #[test]
    fn test_bool_and_double_predicates() {
        let mut table = Table::new("products");
        table.add_column("price", DataType::Double).unwrap();
        table.add_column("in_stock", DataType::Bool).unwrap();
        table.insert_values(&["999.99", "true"]).unwrap();
        table.insert_values(&["25.50", "false"]).unwrap();
        table.insert_values(&["75.00", "1"]).unwrap();

        let pred: Predicate = "price > 50".parse().unwrap();
        assert_eq!(table.select_rows(Some(&pred)).unwrap(), vec![0, 2]);

        let pred: Predicate = "in_stock = TRUE".parse().unwrap();
        assert_eq!(table.select_rows(Some(&pred)).unwrap(), vec![0, 2]);

        let pred: Predicate = "in_stock < true".parse().unwrap();
        assert_eq!(table.select_rows(Some(&pred)).unwrap(), vec![1]);
    }

    #[test]
    fn test_project_all_columns() {
        let table = users();

        let result = table.project_rows(&[2, 0], &[]);

        assert_eq!(result.columns, vec!["id", "name", "age"]);
        assert_eq!(result.row_count(), 2);
        assert_eq!(
            result.rows[0],
            vec![Value::Int(3), Value::Text("Charlie".into()), Value::Int(30)]
        );
    }

    #[test]
    fn test_project_named_columns_skips_unknown() {
        let table = users();

        let result = table.project_rows(
            &[0, 1, 99],
            &["age".into(), "nope".into(), "name".into()],
        );

        assert_eq!(result.columns, vec!["age", "name"]);
        assert_eq!(
            result.rows,
            vec![
                vec![Value::Int(30), Value::Text("Alice".into())],
                vec![Value::Int(25), Value::Text("Bob".into())],
            ]
        );
    }
}

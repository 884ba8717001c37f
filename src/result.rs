use std::fmt;

use crate::value::Value;

/// Minimum width of a rendered column.
const MIN_WIDTH: usize = 8;

/// Represents a row-oriented result set: header names, rows and their count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    /// The names of the columns included in the result set.
    pub columns: Vec<String>,
    /// The data, one vector of [Value] per row, in storage order.
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Every row rendered as text, in order.
    pub fn rendered_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(Value::to_string).collect())
            .collect()
    }

    /// Width of each column: the longest of its header and rendered values, at least 8.
    pub fn widths(&self) -> Vec<usize> {
        let rendered = self.rendered_rows();
        self.columns
            .iter()
            .enumerate()
            .map(|(i, header)| {
                rendered
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain([header.chars().count(), MIN_WIDTH])
                    .max()
                    .unwrap_or(MIN_WIDTH)
            })
            .collect()
    }

    /// Renders the bordered grid: rule, header, rule, one line per row, rule.
    pub fn render_grid(&self) -> String {
        let widths = self.widths();
        let rule = {
            let mut line = String::from("+");
            for width in &widths {
                line.push_str(&"-".repeat(width + 2));
                line.push('+');
            }
            line
        };

        let mut out = String::new();
        out.push_str(&rule);
        out.push('\n');
        push_line(&mut out, &widths, self.columns.iter().map(String::as_str));
        out.push_str(&rule);
        out.push('\n');
        for row in self.rendered_rows() {
            push_line(&mut out, &widths, row.iter().map(String::as_str));
        }
        out.push_str(&rule);
        out.push('\n');
        out
    }
}

fn push_line<'a>(out: &mut String, widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    out.push('|');
    for (cell, &width) in cells.zip(widths) {
        out.push_str(&format!(" {cell:<width$} |"));
    }
    out.push('\n');
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({} rows)", self.render_grid(), self.row_count())
    }
}

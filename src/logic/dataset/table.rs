//! Column-major in-memory table
//!
//! The raw dataset has no mandated schema beyond optionally containing
//! catalog features and the label column, so cells stay loosely typed until
//! alignment coerces them.

use serde::{Deserialize, Serialize};

/// One cell of the raw table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Parse a raw CSV field into the tightest cell type
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(v) => Cell::Number(v),
            Err(_) => Cell::Text(trimmed.to_string()),
        }
    }

    /// Numeric view of the cell, if it has one
    pub fn numeric(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            Cell::Missing => None,
        }
    }
}

/// A named column of cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Cell>,
}

impl Column {
    pub fn new(name: &str, values: Vec<Cell>) -> Self {
        Self {
            name: name.to_string(),
            values,
        }
    }

    /// Convenience constructor for purely numeric columns
    pub fn numeric(name: &str, values: Vec<f64>) -> Self {
        Self {
            name: name.to_string(),
            values: values.into_iter().map(Cell::Number).collect(),
        }
    }
}

/// Error when columns disagree on row count
#[derive(Debug, Clone)]
pub struct TableShapeError {
    pub column: String,
    pub expected_rows: usize,
    pub actual_rows: usize,
}

impl std::fmt::Display for TableShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Column '{}' has {} rows, expected {}",
            self.column, self.actual_rows, self.expected_rows
        )
    }
}

impl std::error::Error for TableShapeError {}

/// Column-major table with a uniform row count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataTable {
    columns: Vec<Column>,
    n_rows: usize,
}

impl DataTable {
    /// Build a table, enforcing a uniform row count across columns
    pub fn new(columns: Vec<Column>) -> Result<Self, TableShapeError> {
        let n_rows = columns.first().map(|c| c.values.len()).unwrap_or(0);
        for column in &columns {
            if column.values.len() != n_rows {
                return Err(TableShapeError {
                    column: column.name.clone(),
                    expected_rows: n_rows,
                    actual_rows: column.values.len(),
                });
            }
        }
        Ok(Self { columns, n_rows })
    }

    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            n_rows: 0,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Numeric view of one column; cells without a numeric reading
    /// take `fill`
    pub fn numeric_column(&self, name: &str, fill: f64) -> Option<Vec<f64>> {
        self.column(name)
            .map(|c| c.values.iter().map(|v| v.numeric().unwrap_or(fill)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_parse() {
        assert_eq!(Cell::parse("3.5"), Cell::Number(3.5));
        assert_eq!(Cell::parse(" 7 "), Cell::Number(7.0));
        assert_eq!(Cell::parse("abc"), Cell::Text("abc".to_string()));
        assert_eq!(Cell::parse(""), Cell::Missing);
        assert_eq!(Cell::parse("   "), Cell::Missing);
    }

    #[test]
    fn test_cell_numeric() {
        assert_eq!(Cell::Number(2.0).numeric(), Some(2.0));
        assert_eq!(Cell::Text("4".to_string()).numeric(), Some(4.0));
        assert_eq!(Cell::Text("n/a".to_string()).numeric(), None);
        assert_eq!(Cell::Missing.numeric(), None);
    }

    #[test]
    fn test_table_uniform_rows() {
        let table = DataTable::new(vec![
            Column::numeric("a", vec![1.0, 2.0]),
            Column::numeric("b", vec![3.0, 4.0]),
        ])
        .unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.n_cols(), 2);
    }

    #[test]
    fn test_table_ragged_rejected() {
        let err = DataTable::new(vec![
            Column::numeric("a", vec![1.0, 2.0]),
            Column::numeric("b", vec![3.0]),
        ])
        .unwrap_err();
        assert_eq!(err.column, "b");
        assert_eq!(err.expected_rows, 2);
        assert_eq!(err.actual_rows, 1);
    }

    #[test]
    fn test_numeric_column_fill() {
        let table = DataTable::new(vec![Column::new(
            "mixed",
            vec![Cell::Number(1.0), Cell::Text("x".to_string()), Cell::Missing],
        )])
        .unwrap();
        assert_eq!(table.numeric_column("mixed", 0.0), Some(vec![1.0, 0.0, 0.0]));
        assert_eq!(table.numeric_column("absent", 0.0), None);
    }
}

//! CSV loading for the encoded survey dataset
//!
//! The whole file is read into memory; the pipeline is batch-oriented and
//! the survey datasets are small.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::logic::dataset::table::{Cell, Column, DataTable};

/// Errors while reading the raw dataset file
#[derive(Debug)]
pub enum DatasetError {
    /// Dataset path does not resolve
    NotFound(PathBuf),
    /// Underlying I/O failure
    Io(std::io::Error),
    /// CSV structure problems (bad header, ragged records)
    Malformed(String),
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::NotFound(path) => {
                write!(f, "Dataset file not found: {}", path.display())
            }
            DatasetError::Io(e) => write!(f, "Dataset I/O error: {}", e),
            DatasetError::Malformed(msg) => write!(f, "Malformed dataset: {}", msg),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(e: std::io::Error) -> Self {
        DatasetError::Io(e)
    }
}

impl From<csv::Error> for DatasetError {
    fn from(e: csv::Error) -> Self {
        DatasetError::Malformed(e.to_string())
    }
}

/// Load a delimited dataset file into a [`DataTable`]
///
/// The first row is the header. Cells parse to numbers where possible and
/// stay as text otherwise; empty fields become [`Cell::Missing`].
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataTable, DatasetError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut columns: Vec<Column> = headers
        .iter()
        .map(|name| Column::new(name, Vec::new()))
        .collect();

    for record in rdr.records() {
        let record = record?;
        for (col, field) in columns.iter_mut().zip(record.iter()) {
            col.values.push(Cell::parse(field));
        }
    }

    let table = DataTable::new(columns)
        .map_err(|e| DatasetError::Malformed(e.to_string()))?;

    log::info!(
        "Loaded dataset {} ({} rows x {} columns)",
        path.display(),
        table.n_rows(),
        table.n_cols()
    );

    Ok(table)
}

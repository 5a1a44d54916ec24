//! Dataset Module - Raw Survey Table Ingestion
//!
//! Reads the encoded survey dataset fully into memory as a column-major
//! table of loosely-typed cells. No schema validation happens here; the
//! feature auditor decides what is usable.

pub mod loader;
pub mod split;
pub mod table;

#[cfg(test)]
mod tests;

pub use loader::{load_csv, DatasetError};
pub use split::{stratified_split, SplitError, SplitIndices};
pub use table::{Cell, Column, DataTable, TableShapeError};

//! Schema Reconciler
//!
//! Aligns an arbitrary input table to the exact ordered feature set a
//! trained model expects. Missing columns are filled with a constant
//! default so inference never aborts on schema drift; the tradeoff is
//! degraded predictions, which the drift warning surfaces.

use ndarray::Array2;

use crate::logic::dataset::DataTable;

// ============================================================================
// POLICY
// ============================================================================

/// Alignment behavior knobs
#[derive(Debug, Clone, Copy)]
pub struct AlignPolicy {
    /// Value inserted for absent columns and for cells that fail numeric
    /// coercion
    pub fill_value: f64,
    /// When true, absent columns abort alignment instead of defaulting
    pub strict: bool,
}

impl Default for AlignPolicy {
    fn default() -> Self {
        Self {
            fill_value: 0.0,
            strict: false,
        }
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

/// A numeric matrix whose column order matches the model's training schema
#[derive(Debug, Clone)]
pub struct AlignedMatrix {
    pub matrix: Array2<f64>,
    pub feature_names: Vec<String>,
}

impl AlignedMatrix {
    pub fn n_samples(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.matrix.ncols()
    }

    /// True when every cell is finite
    pub fn is_finite(&self) -> bool {
        self.matrix.iter().all(|v| v.is_finite())
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Strict-mode alignment failure: the input is missing expected columns
#[derive(Debug, Clone)]
pub struct SchemaDriftError {
    pub missing: Vec<String>,
}

impl std::fmt::Display for SchemaDriftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Input is missing {} expected columns: {:?}",
            self.missing.len(),
            self.missing
        )
    }
}

impl std::error::Error for SchemaDriftError {}

// ============================================================================
// ALIGNMENT
// ============================================================================

/// Resolve the column set the model needs
///
/// Resolution order: the model's recorded training-time order, else the
/// supplied fallback, else the input's current columns unchanged.
pub fn resolve_needed_columns(
    x: &DataTable,
    model_order: Option<&[String]>,
    fallback: Option<&[String]>,
) -> Vec<String> {
    if let Some(order) = model_order {
        return order.to_vec();
    }
    if let Some(fallback) = fallback {
        return fallback.to_vec();
    }
    x.column_names().iter().map(|s| s.to_string()).collect()
}

/// Align `x` to exactly `needed` columns, in that order
///
/// Columns absent from `x` are filled with the policy's fill value, extra
/// columns are dropped, and every cell is coerced to `f64` (coercion
/// failures also take the fill value). The input table is never mutated.
pub fn align_features(
    x: &DataTable,
    needed: &[String],
    policy: &AlignPolicy,
) -> Result<AlignedMatrix, SchemaDriftError> {
    let missing: Vec<String> = needed
        .iter()
        .filter(|name| !x.has_column(name))
        .cloned()
        .collect();

    if !missing.is_empty() {
        if policy.strict {
            return Err(SchemaDriftError { missing });
        }
        log::warn!(
            "Aligning with {} absent columns defaulted to {}: {:?}",
            missing.len(),
            policy.fill_value,
            missing
        );
    }

    let n_rows = x.n_rows();
    let mut matrix = Array2::from_elem((n_rows, needed.len()), policy.fill_value);

    for (j, name) in needed.iter().enumerate() {
        if let Some(column) = x.column(name) {
            for (i, cell) in column.values.iter().enumerate() {
                matrix[[i, j]] = cell.numeric().unwrap_or(policy.fill_value);
            }
        }
    }

    Ok(AlignedMatrix {
        matrix,
        feature_names: needed.to_vec(),
    })
}

//! Feature Availability Auditor
//!
//! Cross-checks the catalog against the raw dataset, derives the robust
//! feature subset, and splits the table into model inputs and labels.
//! The per-feature trace lines are advisory reporting output; the returned
//! report is the correctness-relevant result.

use crate::logic::catalog::FeatureCatalog;
use crate::logic::dataset::{Column, DataTable};

// ============================================================================
// AVAILABILITY REPORT
// ============================================================================

/// Catalog-vs-dataset partition for one pipeline run
#[derive(Debug, Clone)]
pub struct AvailabilityReport {
    /// Catalog features present in the dataset, in catalog order
    pub available: Vec<String>,
    /// Catalog features absent from the dataset, in catalog order
    pub missing: Vec<String>,
    /// Available features minus the leakage denylist, in catalog order
    pub robust: Vec<String>,
}

impl AvailabilityReport {
    pub fn total(&self) -> usize {
        self.available.len() + self.missing.len()
    }

    pub fn found(&self) -> usize {
        self.available.len()
    }

    /// Fraction of the catalog present, in [0, 1]
    pub fn coverage(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.found() as f64 / self.total() as f64
    }

    pub fn has_drift(&self) -> bool {
        !self.missing.is_empty()
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Error when the label column is absent from the raw dataset
///
/// Fatal: without labels no statistically valid evaluation can continue.
#[derive(Debug, Clone)]
pub struct MissingLabelError {
    pub column: String,
}

impl std::fmt::Display for MissingLabelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Label column '{}' not found in dataset", self.column)
    }
}

impl std::error::Error for MissingLabelError {}

// ============================================================================
// AUDIT
// ============================================================================

/// Partition the catalog against the dataset's columns
///
/// Iterates in catalog order so the trace is deterministic. Missing features
/// are schema drift: reported and warned, never fatal.
pub fn audit(dataset: &DataTable, catalog: &FeatureCatalog) -> AvailabilityReport {
    let mut available = Vec::new();
    let mut missing = Vec::new();

    log::info!("Auditing {} catalog features", catalog.len());

    for feature in catalog.all() {
        if dataset.has_column(feature) {
            log::info!("  present: {}", feature);
            available.push(feature.clone());
        } else {
            log::info!("  absent:  {}", feature);
            missing.push(feature.clone());
        }
    }

    let robust: Vec<String> = available
        .iter()
        .filter(|f| !catalog.is_denylisted(f))
        .cloned()
        .collect();

    let report = AvailabilityReport {
        available,
        missing,
        robust,
    };

    log::info!(
        "Feature audit: {}/{} catalog features present ({:.0}%)",
        report.found(),
        report.total(),
        report.coverage() * 100.0
    );

    if report.has_drift() {
        log::warn!(
            "Schema drift: {} catalog features missing from dataset: {:?}",
            report.missing.len(),
            report.missing
        );
    }

    report
}

// ============================================================================
// X / Y SPLIT
// ============================================================================

/// Audit outcome plus the model-input / label split
#[derive(Debug, Clone)]
pub struct AuditOutcome {
    pub report: AvailabilityReport,
    /// Robust feature columns only, dataset row order preserved
    pub x: DataTable,
    /// Label column coerced to numeric (unreadable cells become 0)
    pub y: Vec<f64>,
}

/// Run the availability audit and split the dataset into `X` and `y`
pub fn process(
    dataset: &DataTable,
    catalog: &FeatureCatalog,
    label_column: &str,
) -> Result<AuditOutcome, MissingLabelError> {
    let report = audit(dataset, catalog);

    let y = dataset
        .numeric_column(label_column, 0.0)
        .ok_or_else(|| MissingLabelError {
            column: label_column.to_string(),
        })?;

    let columns: Vec<Column> = report
        .robust
        .iter()
        .filter_map(|f| dataset.column(f).cloned())
        .collect();

    // Robust columns all come from `dataset`, so row counts agree
    let x = DataTable::new(columns).expect("robust columns share the dataset row count");

    Ok(AuditOutcome { report, x, y })
}

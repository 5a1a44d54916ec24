//! Features Module - Availability Audit & Schema Alignment
//!
//! Reconciles what the encoded dataset actually contains against the
//! catalog and the trained model's expected schema. Auditing partitions the
//! catalog into present/missing and derives the robust subset; alignment
//! produces the exact ordered numeric matrix the model was trained on.

pub mod align;
pub mod audit;


pub use align::{align_features, resolve_needed_columns, AlignPolicy, AlignedMatrix, SchemaDriftError};
pub use audit::{AuditOutcome, AvailabilityReport, MissingLabelError};

//! Explain Module - Per-Feature Attribution & Category Rollups
//!
//! Turns model scores into analyst-facing explanations: additive
//! per-feature attributions over the tree ensemble, category aggregates,
//! and single-sample breakdowns.

pub mod aggregate;
pub mod engine;
pub mod types;

pub use aggregate::{category_aggregates, global_importance, FeatureImportance};
pub use engine::{AttributionConfig, AttributionEngine, AttributionError};
pub use types::{AttributionMatrix, ContributionRow, SampleBreakdown, SampleOutOfRangeError};

//! RetainSight Core - student dropout risk analytics
//!
//! Scores students with a pre-trained tree-ensemble classifier, explains
//! each score with additive per-feature attributions, and rolls the
//! attributions up into analyst-facing categories with financial framing.
//! The reporting surface (dashboard, CLI) consumes the [`AnalysisBundle`]
//! this crate produces; rendering stays outside.

pub mod constants;
pub mod logic;

pub use logic::catalog::{FeatureCatalog, LegibilityMap};
pub use logic::explain::{AttributionConfig, AttributionMatrix};
pub use logic::finance;
pub use logic::model::{RiskSummary, RiskThreshold};
pub use logic::pipeline::{
    run_analysis, AnalysisBundle, AnalysisRunner, PipelineConfig, PipelineError,
};

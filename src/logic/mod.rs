//! Logic Module - Analysis Engines
//!
//! The stages of the scoring-and-explanation pipeline:
//! - `catalog/` - Feature catalog, semantic groups, legible names
//! - `dataset/` - Raw table ingestion and splitting
//! - `features/` - Availability audit and schema alignment
//! - `model/` - Classifier artifact, inference, threshold, cache
//! - `explain/` - Per-feature attribution and category rollups
//! - `finance` - Monetary framing of at-risk headcounts
//! - `pipeline` - End-to-end orchestration

pub mod catalog;
pub mod dataset;
pub mod explain;
pub mod features;
pub mod finance;
pub mod model;
pub mod pipeline;

//! Model Module - Classifier Artifact & Inference
//!
//! Loads the pre-trained tree-ensemble artifact and runs batch inference.
//! The artifact keeps its tree structure accessible so the attribution
//! engine can walk decision paths.

pub mod artifact;
pub mod cache;
pub mod threshold;
pub mod tree;


// Re-export common types
pub use artifact::{load_model, LoadedModel, ModelArtifact, ModelLoadError, ModelMetadata};
pub use cache::{CacheKey, LoadCache};
pub use threshold::{RiskSummary, RiskThreshold};
pub use tree::DecisionTree;

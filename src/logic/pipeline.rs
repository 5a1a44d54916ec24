//! Pipeline - end-to-end analysis orchestration
//!
//! Load model and dataset, audit feature availability, align to the model's
//! schema, score, attribute, and aggregate. One run produces one owned
//! [`AnalysisBundle`]; the reporting surface reads it and recomputes only
//! the cheap, parameter-dependent views (risk counts, financial framing).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::constants;
use crate::logic::catalog::{FeatureCatalog, LegibilityMap};
use crate::logic::dataset::{load_csv, DatasetError};
use crate::logic::explain::{
    category_aggregates, global_importance, AttributionConfig, AttributionEngine,
    AttributionError, AttributionMatrix, FeatureImportance, SampleBreakdown,
    SampleOutOfRangeError,
};
use crate::logic::features::{
    align_features, resolve_needed_columns, AlignPolicy, AlignedMatrix, AvailabilityReport,
    MissingLabelError, SchemaDriftError,
};
use crate::logic::features::audit;
use crate::logic::model::{
    load_model, CacheKey, LoadCache, ModelLoadError, ModelMetadata, RiskSummary, RiskThreshold,
};

// ============================================================================
// ERRORS
// ============================================================================

/// Any fatal failure along the pipeline
#[derive(Debug)]
pub enum PipelineError {
    Model(ModelLoadError),
    Dataset(DatasetError),
    MissingLabel(MissingLabelError),
    /// Strict alignment refused to default missing columns
    SchemaDrift(SchemaDriftError),
    Attribution(AttributionError),
    /// Fingerprinting the artifacts for the cache failed
    Io(std::io::Error),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Model(e) => write!(f, "{}", e),
            PipelineError::Dataset(e) => write!(f, "{}", e),
            PipelineError::MissingLabel(e) => write!(f, "{}", e),
            PipelineError::SchemaDrift(e) => write!(f, "{}", e),
            PipelineError::Attribution(e) => write!(f, "{}", e),
            PipelineError::Io(e) => write!(f, "Artifact fingerprinting failed: {}", e),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Model(e) => Some(e),
            PipelineError::Dataset(e) => Some(e),
            PipelineError::MissingLabel(e) => Some(e),
            PipelineError::SchemaDrift(e) => Some(e),
            PipelineError::Attribution(e) => Some(e),
            PipelineError::Io(e) => Some(e),
        }
    }
}

impl From<ModelLoadError> for PipelineError {
    fn from(e: ModelLoadError) -> Self {
        PipelineError::Model(e)
    }
}

impl From<DatasetError> for PipelineError {
    fn from(e: DatasetError) -> Self {
        PipelineError::Dataset(e)
    }
}

impl From<MissingLabelError> for PipelineError {
    fn from(e: MissingLabelError) -> Self {
        PipelineError::MissingLabel(e)
    }
}

impl From<SchemaDriftError> for PipelineError {
    fn from(e: SchemaDriftError) -> Self {
        PipelineError::SchemaDrift(e)
    }
}

impl From<AttributionError> for PipelineError {
    fn from(e: AttributionError) -> Self {
        PipelineError::Attribution(e)
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self {
        PipelineError::Io(e)
    }
}

// ============================================================================
// CONFIG
// ============================================================================

/// Where the artifacts live and how to treat drift and class orientation
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub model_path: PathBuf,
    pub dataset_path: PathBuf,
    pub label_column: String,
    pub align: AlignPolicy,
    pub attribution: AttributionConfig,
}

impl PipelineConfig {
    pub fn new(model_path: impl Into<PathBuf>, dataset_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            dataset_path: dataset_path.into(),
            label_column: constants::DEFAULT_LABEL_COLUMN.to_string(),
            align: AlignPolicy::default(),
            attribution: AttributionConfig::default(),
        }
    }

    /// Configuration from environment overrides and shipped defaults
    pub fn from_env() -> Self {
        Self {
            model_path: PathBuf::from(constants::get_model_path()),
            dataset_path: PathBuf::from(constants::get_dataset_path()),
            label_column: constants::get_label_column(),
            align: AlignPolicy::default(),
            attribution: AttributionConfig::default(),
        }
    }
}

// ============================================================================
// BUNDLE
// ============================================================================

/// Everything one pipeline run produced
#[derive(Debug)]
pub struct AnalysisBundle {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub model: ModelMetadata,
    pub availability: AvailabilityReport,
    pub aligned: AlignedMatrix,
    /// Display labels for `aligned.feature_names`, order preserved
    pub legible_names: Vec<String>,
    /// Ground-truth labels from the dataset
    pub labels: Vec<f64>,
    /// Predicted class per student
    pub predicted: Vec<usize>,
    /// Positive-class (dropout) probability per student
    pub p_dropout: Vec<f64>,
    pub attributions: AttributionMatrix,
    /// Group name -> mean absolute attribution
    pub category_aggregates: HashMap<String, f64>,
}

impl AnalysisBundle {
    pub fn n_students(&self) -> usize {
        self.p_dropout.len()
    }

    /// Risk classification at a cutoff; recomputed, never stored
    pub fn risk_summary(&self, threshold: &RiskThreshold) -> RiskSummary {
        threshold.summarize(&self.p_dropout)
    }

    /// Features ranked by global importance
    pub fn importance_ranking(&self) -> Vec<FeatureImportance> {
        global_importance(&self.attributions)
    }

    /// Category aggregates sorted descending for presentation
    pub fn ranked_categories(&self) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = self
            .category_aggregates
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    /// Explanation of one student's score
    pub fn sample_breakdown(
        &self,
        names: &LegibilityMap,
        index: usize,
    ) -> Result<SampleBreakdown, SampleOutOfRangeError> {
        self.attributions
            .sample_breakdown(&self.aligned, names, index)
    }
}

// ============================================================================
// RUN
// ============================================================================

/// Run the full pipeline once
pub fn run_analysis(
    config: &PipelineConfig,
    catalog: &FeatureCatalog,
    names: &LegibilityMap,
) -> Result<AnalysisBundle, PipelineError> {
    let loaded = load_model(&config.model_path)?;
    let dataset = load_csv(&config.dataset_path)?;

    let outcome = audit::process(&dataset, catalog, &config.label_column)?;

    let needed = resolve_needed_columns(
        &outcome.x,
        loaded.artifact.recorded_feature_order(),
        Some(&outcome.report.robust),
    );
    let aligned = align_features(&outcome.x, &needed, &config.align)?;

    let positive_class = config.attribution.positive_class;
    if positive_class >= loaded.artifact.n_classes {
        return Err(AttributionError::ClassOutOfRange {
            class: positive_class,
            n_outputs: loaded.artifact.n_classes,
        }
        .into());
    }

    let predicted = loaded.artifact.predict(&aligned.matrix);
    let proba = loaded.artifact.predict_proba(&aligned.matrix);
    let p_dropout: Vec<f64> = proba.column(positive_class).to_vec();

    let engine = AttributionEngine::with_config(&loaded.artifact, config.attribution);
    let attributions = engine.explain(&aligned)?;

    let category_aggregates = category_aggregates(&attributions, &catalog.group_map());
    let legible_names = names.resolve_all(&aligned.feature_names);

    let bundle = AnalysisBundle {
        run_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        model: loaded.metadata,
        availability: outcome.report,
        aligned,
        legible_names,
        labels: outcome.y,
        predicted,
        p_dropout,
        attributions,
        category_aggregates,
    };

    log::info!(
        "Analysis {} complete: {} students, {} features",
        bundle.run_id,
        bundle.n_students(),
        bundle.aligned.n_features()
    );

    Ok(bundle)
}

// ============================================================================
// CACHED RUNNER
// ============================================================================

/// Runs analyses through the load-once cache
///
/// Interactive hosts keep one runner alive; repeated `run` calls with
/// unchanged artifacts return the same bundle.
pub struct AnalysisRunner {
    config: PipelineConfig,
    catalog: FeatureCatalog,
    names: LegibilityMap,
    cache: LoadCache<AnalysisBundle>,
}

impl AnalysisRunner {
    pub fn new(config: PipelineConfig, catalog: FeatureCatalog, names: LegibilityMap) -> Self {
        Self {
            config,
            catalog,
            names,
            cache: LoadCache::new(),
        }
    }

    /// Runner over the shipped student-dropout catalog and labels
    pub fn with_defaults(config: PipelineConfig) -> Self {
        Self::new(
            config,
            FeatureCatalog::student_dropout(),
            LegibilityMap::student_dropout(),
        )
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn names(&self) -> &LegibilityMap {
        &self.names
    }

    pub fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    /// Current analysis, loading only when the artifacts changed
    pub fn run(&self) -> Result<Arc<AnalysisBundle>, PipelineError> {
        let key = CacheKey::for_paths(&self.config.model_path, &self.config.dataset_path)?;
        self.cache
            .get_or_insert_with(key, || run_analysis(&self.config, &self.catalog, &self.names))
    }

    /// Drop the cached analysis; the next `run` reloads from disk
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }
}

// ============================================================================
// TESTS
// ============================================================================

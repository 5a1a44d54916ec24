//! Model artifact loading and batch inference
//!
//! The artifact is the JSON export of the trained classifier: flattened
//! trees grouped into one forest per raw output, per-output base scores,
//! and the training-time feature order when the export recorded it.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::logic::model::tree::DecisionTree;

// ============================================================================
// ARTIFACT
// ============================================================================

/// Pre-trained tree-ensemble classifier
///
/// A single forest produces a binary raw margin mapped through a sigmoid;
/// `n_classes` forests produce per-class raw scores mapped through a
/// softmax.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    #[serde(default)]
    pub model_type: String,
    pub n_classes: usize,
    /// Per-output raw-score offsets, one per forest
    pub base_scores: Vec<f64>,
    /// Training-time ordered feature list, when the export recorded it
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub forests: Vec<Vec<DecisionTree>>,
}

impl ModelArtifact {
    pub fn n_outputs(&self) -> usize {
        self.forests.len()
    }

    pub fn n_trees(&self) -> usize {
        self.forests.iter().map(|f| f.len()).sum()
    }

    /// Feature count: the recorded training order wins; otherwise the
    /// widest split index across all trees decides
    pub fn n_features(&self) -> usize {
        if let Some(names) = &self.feature_names {
            return names.len();
        }
        self.forests
            .iter()
            .flatten()
            .flat_map(|t| t.feature.iter())
            .filter(|&&f| f >= 0)
            .map(|&f| f as usize + 1)
            .max()
            .unwrap_or(0)
    }

    /// Training-time ordered feature list, if recorded
    pub fn recorded_feature_order(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    /// Structural consistency checks run at load time
    pub fn validate(&self) -> Result<(), String> {
        if self.forests.is_empty() {
            return Err("artifact has no trees".to_string());
        }
        if self.n_classes < 2 {
            return Err(format!("n_classes must be >= 2, got {}", self.n_classes));
        }
        if self.n_outputs() != 1 && self.n_outputs() != self.n_classes {
            return Err(format!(
                "expected 1 or {} forests, got {}",
                self.n_classes,
                self.n_outputs()
            ));
        }
        if self.n_outputs() == 1 && self.n_classes != 2 {
            return Err("a single-forest artifact must be binary".to_string());
        }
        if self.base_scores.len() != self.n_outputs() {
            return Err(format!(
                "{} base scores for {} forests",
                self.base_scores.len(),
                self.n_outputs()
            ));
        }
        let n_features = self.n_features();
        for (k, forest) in self.forests.iter().enumerate() {
            for (t, tree) in forest.iter().enumerate() {
                tree.validate(n_features)
                    .map_err(|e| format!("forest {} tree {}: {}", k, t, e))?;
            }
        }
        Ok(())
    }

    /// Raw scores per sample and output
    ///
    /// `x` must have exactly [`Self::n_features`] columns; the pipeline
    /// guarantees this by aligning before inference.
    pub fn predict_margins(&self, x: &Array2<f64>) -> Array2<f64> {
        debug_assert_eq!(x.ncols(), self.n_features());
        let mut margins = Array2::zeros((x.nrows(), self.n_outputs()));
        for (i, row) in x.outer_iter().enumerate() {
            for (k, forest) in self.forests.iter().enumerate() {
                let mut score = self.base_scores[k];
                for tree in forest {
                    score += tree.predict_one(row);
                }
                margins[[i, k]] = score;
            }
        }
        margins
    }

    /// Class probabilities per sample: `[P(class 0), ..., P(class n-1)]`
    pub fn predict_proba(&self, x: &Array2<f64>) -> Array2<f64> {
        let margins = self.predict_margins(x);
        let mut proba = Array2::zeros((x.nrows(), self.n_classes));

        if self.n_outputs() == 1 {
            for (i, margin) in margins.column(0).iter().enumerate() {
                let p = sigmoid(*margin);
                proba[[i, 0]] = 1.0 - p;
                proba[[i, 1]] = p;
            }
        } else {
            for (i, row) in margins.outer_iter().enumerate() {
                let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let exp: Vec<f64> = row.iter().map(|m| (m - max).exp()).collect();
                let total: f64 = exp.iter().sum();
                for (k, e) in exp.iter().enumerate() {
                    proba[[i, k]] = e / total;
                }
            }
        }
        proba
    }

    /// Predicted class labels
    pub fn predict(&self, x: &Array2<f64>) -> Vec<usize> {
        let proba = self.predict_proba(x);
        proba
            .outer_iter()
            .map(|row| {
                if self.n_classes == 2 {
                    usize::from(row[1] >= 0.5)
                } else {
                    row.iter()
                        .enumerate()
                        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                        .map(|(k, _)| k)
                        .unwrap_or(0)
                }
            })
            .collect()
    }
}

fn sigmoid(margin: f64) -> f64 {
    1.0 / (1.0 + (-margin).exp())
}

// ============================================================================
// LOADING
// ============================================================================

/// Errors while resolving the model artifact
#[derive(Debug)]
pub enum ModelLoadError {
    /// Model artifact path does not resolve
    NotFound(PathBuf),
    Io(std::io::Error),
    /// Unparseable JSON or inconsistent tree structure
    Malformed(String),
}

impl std::fmt::Display for ModelLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelLoadError::NotFound(path) => {
                write!(f, "Model file not found: {}", path.display())
            }
            ModelLoadError::Io(e) => write!(f, "Model I/O error: {}", e),
            ModelLoadError::Malformed(msg) => write!(f, "Malformed model artifact: {}", msg),
        }
    }
}

impl std::error::Error for ModelLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelLoadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ModelLoadError {
    fn from(e: std::io::Error) -> Self {
        ModelLoadError::Io(e)
    }
}

/// Model metadata recorded at load time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub model_type: String,
    pub n_trees: usize,
    pub n_classes: usize,
    pub n_features: usize,
    /// SHA-256 of the artifact file, hex-encoded
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
}

/// A validated artifact plus its load metadata
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub artifact: ModelArtifact,
    pub metadata: ModelMetadata,
}

/// Load and validate a model artifact from disk
pub fn load_model(path: impl AsRef<Path>) -> Result<LoadedModel, ModelLoadError> {
    let path = path.as_ref();
    log::info!("Loading model artifact from: {}", path.display());

    if !path.exists() {
        return Err(ModelLoadError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path)?;
    let fingerprint = hex::encode(Sha256::digest(&bytes));

    let artifact: ModelArtifact =
        serde_json::from_slice(&bytes).map_err(|e| ModelLoadError::Malformed(e.to_string()))?;
    artifact.validate().map_err(ModelLoadError::Malformed)?;

    let metadata = ModelMetadata {
        model_path: path.display().to_string(),
        model_type: artifact.model_type.clone(),
        n_trees: artifact.n_trees(),
        n_classes: artifact.n_classes,
        n_features: artifact.n_features(),
        fingerprint,
        loaded_at: Utc::now(),
    };

    log::info!(
        "Model loaded: {} trees, {} classes, {} features, fingerprint {}",
        metadata.n_trees,
        metadata.n_classes,
        metadata.n_features,
        &metadata.fingerprint[..12]
    );

    Ok(LoadedModel { artifact, metadata })
}

//! Attribution Engine
//!
//! Computes one additive contribution per (sample, feature) pair by walking
//! each sample's decision paths: every split credits the shift in expected
//! output to the feature that decided it, so a row's contributions plus the
//! ensemble baseline reproduce the raw score exactly.
//!
//! Per-class models yield a samples x features x classes result; the engine
//! keeps only the positive-class slice. Additivity validation is off by
//! default: large ensembles accumulate float error and a failed check would
//! reject an otherwise usable batch.

use ndarray::{Array2, Array3, Axis};

use crate::logic::features::AlignedMatrix;
use crate::logic::model::ModelArtifact;

use super::types::AttributionMatrix;

// ============================================================================
// CONFIG
// ============================================================================

/// Attribution behavior knobs
#[derive(Debug, Clone, Copy)]
pub struct AttributionConfig {
    /// Class slice to keep when the model produces per-class attributions.
    /// The risk class: class 1 in the shipped binary setting.
    pub positive_class: usize,
    /// Whether to verify row sums against raw scores
    pub check_additivity: bool,
    /// Relative tolerance for the additivity check
    pub additivity_tolerance: f64,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            positive_class: 1,
            check_additivity: false,
            additivity_tolerance: 1e-3,
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Attribution failures abort the whole batch; no partial results
#[derive(Debug, Clone)]
pub enum AttributionError {
    /// The aligned matrix holds a NaN or infinity
    NonFiniteInput { row: usize, feature: String },
    /// Matrix width disagrees with the model's feature count
    FeatureCountMismatch { matrix: usize, model: usize },
    /// Configured positive class not produced by this model
    ClassOutOfRange { class: usize, n_outputs: usize },
    /// Row sum drifted from the raw score beyond tolerance
    AdditivityViolation { row: usize, error: f64 },
}

impl std::fmt::Display for AttributionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributionError::NonFiniteInput { row, feature } => {
                write!(f, "Non-finite input at row {}, feature '{}'", row, feature)
            }
            AttributionError::FeatureCountMismatch { matrix, model } => {
                write!(
                    f,
                    "Aligned matrix has {} features, model expects {}",
                    matrix, model
                )
            }
            AttributionError::ClassOutOfRange { class, n_outputs } => {
                write!(
                    f,
                    "Positive class {} out of range for {} model outputs",
                    class, n_outputs
                )
            }
            AttributionError::AdditivityViolation { row, error } => {
                write!(
                    f,
                    "Attribution row {} misses its raw score by {:e}",
                    row, error
                )
            }
        }
    }
}

impl std::error::Error for AttributionError {}

// ============================================================================
// ENGINE
// ============================================================================

/// Wraps a loaded model for batch attribution
pub struct AttributionEngine<'a> {
    model: &'a ModelArtifact,
    config: AttributionConfig,
}

impl<'a> AttributionEngine<'a> {
    pub fn new(model: &'a ModelArtifact) -> Self {
        Self {
            model,
            config: AttributionConfig::default(),
        }
    }

    pub fn with_config(model: &'a ModelArtifact, config: AttributionConfig) -> Self {
        Self { model, config }
    }

    pub fn config(&self) -> &AttributionConfig {
        &self.config
    }

    /// Attribute every sample in the batch
    pub fn explain(&self, aligned: &AlignedMatrix) -> Result<AttributionMatrix, AttributionError> {
        self.validate_input(aligned)?;

        let raw = self.raw_contributions(aligned);
        let (slice, output) = self.select_output(raw)?;
        let baseline = self.baseline(output);

        if self.config.check_additivity {
            self.verify_additivity(aligned, &slice, baseline, output)?;
        }

        Ok(AttributionMatrix {
            values: slice,
            baseline,
            feature_names: aligned.feature_names.clone(),
        })
    }

    /// Expected raw score of one output with no feature information
    pub fn baseline(&self, output: usize) -> f64 {
        self.model.base_scores[output]
            + self.model.forests[output]
                .iter()
                .map(|t| t.root_value())
                .sum::<f64>()
    }

    fn validate_input(&self, aligned: &AlignedMatrix) -> Result<(), AttributionError> {
        if aligned.n_features() != self.model.n_features() {
            return Err(AttributionError::FeatureCountMismatch {
                matrix: aligned.n_features(),
                model: self.model.n_features(),
            });
        }
        for (i, row) in aligned.matrix.outer_iter().enumerate() {
            for (j, v) in row.iter().enumerate() {
                if !v.is_finite() {
                    return Err(AttributionError::NonFiniteInput {
                        row: i,
                        feature: aligned.feature_names[j].clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// samples x features x outputs path contributions
    fn raw_contributions(&self, aligned: &AlignedMatrix) -> Array3<f64> {
        let n_samples = aligned.n_samples();
        let n_features = aligned.n_features();
        let n_outputs = self.model.n_outputs();

        let mut raw = Array3::zeros((n_samples, n_features, n_outputs));
        let mut scratch = vec![0.0; n_features];

        for (i, row) in aligned.matrix.outer_iter().enumerate() {
            for (k, forest) in self.model.forests.iter().enumerate() {
                scratch.fill(0.0);
                for tree in forest {
                    tree.path_contributions(row, &mut scratch);
                }
                for (j, &c) in scratch.iter().enumerate() {
                    raw[[i, j, k]] = c;
                }
            }
        }
        raw
    }

    /// Reduce the 3-D result to the 2-D matrix downstream consumers use
    fn select_output(&self, raw: Array3<f64>) -> Result<(Array2<f64>, usize), AttributionError> {
        let n_outputs = raw.len_of(Axis(2));
        if n_outputs == 1 {
            // Binary margin models are already positive-class oriented
            return Ok((raw.index_axis(Axis(2), 0).to_owned(), 0));
        }
        let class = self.config.positive_class;
        if class >= n_outputs {
            return Err(AttributionError::ClassOutOfRange { class, n_outputs });
        }
        Ok((raw.index_axis(Axis(2), class).to_owned(), class))
    }

    fn verify_additivity(
        &self,
        aligned: &AlignedMatrix,
        values: &Array2<f64>,
        baseline: f64,
        output: usize,
    ) -> Result<(), AttributionError> {
        let margins = self.model.predict_margins(&aligned.matrix);
        for i in 0..values.nrows() {
            let reconstructed = baseline + values.row(i).sum();
            let margin = margins[[i, output]];
            let error = (reconstructed - margin).abs();
            let scale = margin.abs().max(1.0);
            if error > self.config.additivity_tolerance * scale {
                return Err(AttributionError::AdditivityViolation { row: i, error });
            }
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::tree::stump;
    use ndarray::array;

    fn binary_model() -> ModelArtifact {
        ModelArtifact {
            model_type: "gradient_boosting".to_string(),
            n_classes: 2,
            base_scores: vec![-0.5],
            feature_names: Some(vec!["hours".to_string(), "pending".to_string()]),
            forests: vec![vec![
                stump(0, 5.0, 1.2, -0.8, 0.4),
                stump(1, 1.5, -0.4, 0.9, 0.7),
            ]],
        }
    }

    fn per_class_model() -> ModelArtifact {
        ModelArtifact {
            model_type: "random_forest".to_string(),
            n_classes: 2,
            base_scores: vec![0.0, 0.0],
            feature_names: Some(vec!["hours".to_string()]),
            forests: vec![
                vec![stump(0, 5.0, -1.0, 1.0, 0.5)],
                vec![stump(0, 5.0, 1.0, -1.0, 0.5)],
            ],
        }
    }

    fn aligned(matrix: ndarray::Array2<f64>, names: &[&str]) -> AlignedMatrix {
        AlignedMatrix {
            matrix,
            feature_names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_additivity_exact() {
        let model = binary_model();
        let engine = AttributionEngine::new(&model);
        let x = aligned(array![[2.0, 1.0], [8.0, 3.0], [5.0, 1.5]], &["hours", "pending"]);

        let attributions = engine.explain(&x).unwrap();
        let margins = model.predict_margins(&x.matrix);

        for i in 0..x.n_samples() {
            let reconstructed = attributions.baseline + attributions.values.row(i).sum();
            assert!((reconstructed - margins[[i, 0]]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_additivity_check_passes_when_enabled() {
        let model = binary_model();
        let config = AttributionConfig {
            check_additivity: true,
            ..Default::default()
        };
        let engine = AttributionEngine::with_config(&model, config);
        let x = aligned(array![[2.0, 1.0], [8.0, 3.0]], &["hours", "pending"]);

        assert!(engine.explain(&x).is_ok());
    }

    #[test]
    fn test_positive_class_slice() {
        let model = per_class_model();
        let engine = AttributionEngine::new(&model);
        // hours = 8 takes the right branch: class-1 forest outputs -1,
        // class-0 forest outputs +1. The kept slice must be class 1.
        let x = aligned(array![[8.0]], &["hours"]);

        let attributions = engine.explain(&x).unwrap();
        assert!((attributions.values[[0, 0]] - (-1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_positive_class_configurable() {
        let model = per_class_model();
        let default_engine = AttributionEngine::new(&model);
        let flipped = AttributionEngine::with_config(
            &model,
            AttributionConfig {
                positive_class: 0,
                ..Default::default()
            },
        );
        let x = aligned(array![[8.0]], &["hours"]);

        let class1 = default_engine.explain(&x).unwrap();
        let class0 = flipped.explain(&x).unwrap();
        // The two class forests mirror each other
        assert!((class1.values[[0, 0]] + class0.values[[0, 0]]).abs() < 1e-12);
    }

    #[test]
    fn test_class_out_of_range() {
        let model = per_class_model();
        let engine = AttributionEngine::with_config(
            &model,
            AttributionConfig {
                positive_class: 5,
                ..Default::default()
            },
        );
        let x = aligned(array![[8.0]], &["hours"]);

        assert!(matches!(
            engine.explain(&x),
            Err(AttributionError::ClassOutOfRange { class: 5, n_outputs: 2 })
        ));
    }

    #[test]
    fn test_nan_fails_whole_batch() {
        let model = binary_model();
        let engine = AttributionEngine::new(&model);
        let x = aligned(array![[2.0, 1.0], [f64::NAN, 3.0]], &["hours", "pending"]);

        match engine.explain(&x) {
            Err(AttributionError::NonFiniteInput { row, feature }) => {
                assert_eq!(row, 1);
                assert_eq!(feature, "hours");
            }
            other => panic!("expected NonFiniteInput, got {other:?}"),
        }
    }

    #[test]
    fn test_feature_count_mismatch() {
        let model = binary_model();
        let engine = AttributionEngine::new(&model);
        let x = aligned(array![[2.0]], &["hours"]);

        assert!(matches!(
            engine.explain(&x),
            Err(AttributionError::FeatureCountMismatch { matrix: 1, model: 2 })
        ));
    }

    #[test]
    fn test_empty_batch() {
        let model = binary_model();
        let engine = AttributionEngine::new(&model);
        let x = aligned(ndarray::Array2::zeros((0, 2)), &["hours", "pending"]);

        let attributions = engine.explain(&x).unwrap();
        assert_eq!(attributions.n_samples(), 0);
        assert_eq!(attributions.n_features(), 2);
    }
}

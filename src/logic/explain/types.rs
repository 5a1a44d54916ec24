use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::logic::catalog::LegibilityMap;
use crate::logic::features::AlignedMatrix;

/// Per-sample, per-feature attributions toward the positive class
///
/// Row sums plus `baseline` reproduce each sample's raw model score.
#[derive(Debug, Clone)]
pub struct AttributionMatrix {
    /// samples x features, column order matching `feature_names`
    pub values: Array2<f64>,
    /// The model's expected raw score absent any feature information
    pub baseline: f64,
    pub feature_names: Vec<String>,
}

impl AttributionMatrix {
    pub fn n_samples(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.values.ncols()
    }

    /// Contribution rows for one sample, legible labels attached
    pub fn sample_breakdown(
        &self,
        aligned: &AlignedMatrix,
        names: &LegibilityMap,
        index: usize,
    ) -> Result<SampleBreakdown, SampleOutOfRangeError> {
        if index >= self.n_samples() {
            return Err(SampleOutOfRangeError {
                index,
                n_samples: self.n_samples(),
            });
        }

        let contributions = self
            .feature_names
            .iter()
            .enumerate()
            .map(|(j, feature)| ContributionRow {
                feature: feature.clone(),
                label: names.legible(feature).to_string(),
                value: aligned.matrix[[index, j]],
                attribution: self.values[[index, j]],
            })
            .collect::<Vec<_>>();

        let model_score = self.baseline + self.values.row(index).sum();

        Ok(SampleBreakdown {
            index,
            baseline: self.baseline,
            model_score,
            contributions,
        })
    }
}

/// One feature's part in a single prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionRow {
    pub feature: String,
    pub label: String,
    /// The sample's aligned input value for this feature
    pub value: f64,
    pub attribution: f64,
}

/// Explanation of one sample's score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleBreakdown {
    pub index: usize,
    pub baseline: f64,
    /// Raw score: baseline plus all attributions
    pub model_score: f64,
    pub contributions: Vec<ContributionRow>,
}

impl SampleBreakdown {
    /// Contributions sorted by absolute attribution, strongest first
    pub fn ranked(&self) -> Vec<&ContributionRow> {
        let mut rows: Vec<&ContributionRow> = self.contributions.iter().collect();
        rows.sort_by(|a, b| {
            b.attribution
                .abs()
                .partial_cmp(&a.attribution.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        rows
    }
}

/// Requested sample index past the end of the batch
#[derive(Debug, Clone)]
pub struct SampleOutOfRangeError {
    pub index: usize,
    pub n_samples: usize,
}

impl std::fmt::Display for SampleOutOfRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sample index {} out of range for batch of {}",
            self.index, self.n_samples
        )
    }
}

impl std::error::Error for SampleOutOfRangeError {}

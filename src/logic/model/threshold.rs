//! Risk Threshold Configuration
//!
//! The cutoff on the positive-class probability that marks a student as
//! at-risk. Classifications are never stored; they are recomputed from the
//! cached probabilities whenever the cutoff moves.

use serde::{Deserialize, Serialize};

/// Risk cutoff configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskThreshold {
    /// Probability cutoff (0.0 - 1.0)
    pub cutoff: f64,

    /// Minimum cutoff (floor)
    pub min_cutoff: f64,

    /// Maximum cutoff (ceiling)
    pub max_cutoff: f64,
}

impl Default for RiskThreshold {
    fn default() -> Self {
        Self {
            cutoff: crate::constants::DEFAULT_RISK_CUTOFF,
            min_cutoff: 0.05,
            max_cutoff: 0.95,
        }
    }
}

impl RiskThreshold {
    pub fn new(cutoff: f64) -> Self {
        let mut threshold = Self::default();
        threshold.set(cutoff);
        threshold
    }

    /// High sensitivity (lower cutoff, more students flagged)
    pub fn high_sensitivity() -> Self {
        Self::new(0.3)
    }

    /// Low sensitivity (higher cutoff, fewer students flagged)
    pub fn low_sensitivity() -> Self {
        Self::new(0.7)
    }

    /// Move the cutoff, clamped to the configured bounds
    pub fn set(&mut self, cutoff: f64) {
        self.cutoff = cutoff.max(self.min_cutoff).min(self.max_cutoff);
    }

    /// Check one positive-class probability against the cutoff
    pub fn is_at_risk(&self, p_positive: f64) -> bool {
        p_positive >= self.cutoff
    }

    /// Classify a batch of positive-class probabilities
    pub fn classify(&self, p_positive: &[f64]) -> Vec<bool> {
        p_positive.iter().map(|&p| self.is_at_risk(p)).collect()
    }

    /// Summarize a batch at the current cutoff
    pub fn summarize(&self, p_positive: &[f64]) -> RiskSummary {
        let n_at_risk = p_positive.iter().filter(|&&p| self.is_at_risk(p)).count();
        let n_samples = p_positive.len();
        RiskSummary {
            cutoff: self.cutoff,
            n_samples,
            n_at_risk,
            at_risk_share: if n_samples > 0 {
                n_at_risk as f64 / n_samples as f64
            } else {
                0.0
            },
        }
    }
}

/// Risk classification summary at one cutoff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSummary {
    pub cutoff: f64,
    pub n_samples: usize,
    pub n_at_risk: usize,
    pub at_risk_share: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_default() {
        let threshold = RiskThreshold::default();
        assert_eq!(threshold.cutoff, 0.5);
    }

    #[test]
    fn test_set_clamps_to_bounds() {
        let mut threshold = RiskThreshold::default();
        threshold.set(0.01);
        assert_eq!(threshold.cutoff, 0.05);
        threshold.set(0.99);
        assert_eq!(threshold.cutoff, 0.95);
        threshold.set(0.42);
        assert_eq!(threshold.cutoff, 0.42);
    }

    #[test]
    fn test_classify_boundary_inclusive() {
        let threshold = RiskThreshold::new(0.5);
        assert_eq!(
            threshold.classify(&[0.49, 0.5, 0.51]),
            vec![false, true, true]
        );
    }

    #[test]
    fn test_summarize_recomputes_per_cutoff() {
        let probabilities = vec![0.2, 0.4, 0.6, 0.8];

        let lenient = RiskThreshold::high_sensitivity().summarize(&probabilities);
        assert_eq!(lenient.n_at_risk, 3);

        let strict = RiskThreshold::low_sensitivity().summarize(&probabilities);
        assert_eq!(strict.n_at_risk, 2);
        assert_eq!(strict.n_samples, 4);
        assert_eq!(strict.at_risk_share, 0.5);
    }

    #[test]
    fn test_summarize_empty() {
        let summary = RiskThreshold::default().summarize(&[]);
        assert_eq!(summary.n_at_risk, 0);
        assert_eq!(summary.at_risk_share, 0.0);
    }
}

//! Category rollups and global importance
//!
//! Aggregates low-level attributions into the catalog's semantic groups for
//! reporting. A feature assigned to no group contributes nowhere; a group
//! with no member present in the batch yields no entry. Absence and zero
//! importance mean different things to the reader.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::AttributionMatrix;

/// Mean absolute attribution per feature, in matrix column order
pub fn mean_abs_by_feature(attributions: &AttributionMatrix) -> Vec<f64> {
    let n_samples = attributions.n_samples();
    attributions
        .values
        .columns()
        .into_iter()
        .map(|col| {
            if n_samples == 0 {
                0.0
            } else {
                col.iter().map(|v| v.abs()).sum::<f64>() / n_samples as f64
            }
        })
        .collect()
}

/// Group name -> mean absolute attribution over the group's members
///
/// The mean is taken over per-feature means, so every member feature
/// weighs equally regardless of magnitude spread. The returned map is
/// unordered; presentation sorting is the caller's concern.
pub fn category_aggregates(
    attributions: &AttributionMatrix,
    groups: &HashMap<String, Vec<String>>,
) -> HashMap<String, f64> {
    let per_feature = mean_abs_by_feature(attributions);
    let mut aggregates = HashMap::new();

    for (group, members) in groups {
        let member_means: Vec<f64> = attributions
            .feature_names
            .iter()
            .enumerate()
            .filter(|(_, name)| members.contains(*name))
            .map(|(j, _)| per_feature[j])
            .collect();

        if !member_means.is_empty() {
            let mean = member_means.iter().sum::<f64>() / member_means.len() as f64;
            aggregates.insert(group.clone(), mean);
        }
    }

    aggregates
}

/// One feature's global importance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Features ranked by mean absolute attribution, strongest first
///
/// Ties keep matrix column order.
pub fn global_importance(attributions: &AttributionMatrix) -> Vec<FeatureImportance> {
    let per_feature = mean_abs_by_feature(attributions);
    let mut ranking: Vec<FeatureImportance> = attributions
        .feature_names
        .iter()
        .zip(per_feature)
        .map(|(feature, importance)| FeatureImportance {
            feature: feature.clone(),
            importance,
        })
        .collect();

    ranking.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranking
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample_attributions() -> AttributionMatrix {
        AttributionMatrix {
            values: array![[1.0, -2.0, 0.5], [-1.0, 2.0, 0.5]],
            baseline: 0.0,
            feature_names: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        }
    }

    fn groups(pairs: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(g, members)| {
                (
                    g.to_string(),
                    members.iter().map(|m| m.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_mean_abs_by_feature() {
        let per_feature = mean_abs_by_feature(&sample_attributions());
        assert_eq!(per_feature, vec![1.0, 2.0, 0.5]);
    }

    #[test]
    fn test_category_mean_of_member_means() {
        let aggregates = category_aggregates(
            &sample_attributions(),
            &groups(&[("Academic", &["a", "b"]), ("Behavioral", &["c"])]),
        );

        assert_eq!(aggregates.len(), 2);
        assert!((aggregates["Academic"] - 1.5).abs() < 1e-12);
        assert!((aggregates["Behavioral"] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_aggregates_non_negative() {
        let aggregates = category_aggregates(
            &sample_attributions(),
            &groups(&[("Academic", &["a", "b", "c"])]),
        );
        assert!(aggregates.values().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_unassigned_feature_ignored() {
        // "c" belongs to no group; its attribution must not leak anywhere
        let aggregates =
            category_aggregates(&sample_attributions(), &groups(&[("Academic", &["a"])]));
        assert_eq!(aggregates.len(), 1);
        assert!((aggregates["Academic"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_group_yields_no_entry() {
        let aggregates = category_aggregates(
            &sample_attributions(),
            &groups(&[("Academic", &["a"]), ("Ghost", &["not_present"])]),
        );
        assert!(aggregates.contains_key("Academic"));
        assert!(!aggregates.contains_key("Ghost"));
    }

    #[test]
    fn test_global_importance_sorted_desc() {
        let ranking = global_importance(&sample_attributions());
        assert_eq!(ranking[0].feature, "b");
        assert_eq!(ranking[1].feature, "a");
        assert_eq!(ranking[2].feature, "c");
        assert!(ranking.windows(2).all(|w| w[0].importance >= w[1].importance));
    }

    #[test]
    fn test_empty_batch_zero_importance() {
        let attributions = AttributionMatrix {
            values: ndarray::Array2::zeros((0, 2)),
            baseline: 0.0,
            feature_names: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(mean_abs_by_feature(&attributions), vec![0.0, 0.0]);
    }
}

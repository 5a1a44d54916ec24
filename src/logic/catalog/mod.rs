//! Feature Catalog - Centralized Feature Definition
//!
//! **CRITICAL: This module controls the feature schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment CATALOG_VERSION
//! 2. Change order → increment CATALOG_VERSION
//! 3. Remove feature → increment CATALOG_VERSION
//!
//! ## Why versioning matters:
//! - Model artifact compatibility
//! - Cache keying across runs
//! - Cross-version migrations of encoded datasets
//!
//! The catalog is an immutable value constructed once at startup and passed
//! explicitly to the auditor and aggregator. Group membership is a partition:
//! construction fails if an identifier appears in two groups.

pub mod names;

pub use names::LegibilityMap;

use crc32fast::Hasher;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// CATALOG VERSION
// ============================================================================

/// Current catalog layout version
/// MUST be incremented when the default layout changes
pub const CATALOG_VERSION: u8 = 1;

// ============================================================================
// DEFAULT LAYOUT (Authoritative source)
// ============================================================================

/// Socioeconomic background features
const SOCIOECONOMIC: &[&str] = &[
    "housing_situation",
    "currently_working",
    "scholarship_support",
];

/// Geographic / commute features
const GEOGRAPHIC: &[&str] = &[
    "home_city_code",
    "campus_return_frequency",
    "local_origin",
];

/// Academic standing features
const ACADEMIC: &[&str] = &[
    "pending_courses",
    "current_term",
    "school_type",
];

/// Behavioral / engagement features
const BEHAVIORAL: &[&str] = &[
    "weekly_study_hours",
    "left_for_work_opportunity",
    "extracurricular_participation",
    "prior_course_withdrawal",
    "prior_program_transfer",
];

/// Demographic features
const DEMOGRAPHIC: &[&str] = &[
    "age_bracket",
    "gender",
];

/// Features whose value only exists because the outcome already happened.
/// They are excluded from the robust feature set used for scoring and
/// attribution: a student who already transferred out once carries the
/// answer inside the question.
const LEAKAGE_DENYLIST: &[&str] = &["prior_program_transfer"];

// ============================================================================
// CATALOG TYPES
// ============================================================================

/// One semantic group of catalog features, in reporting order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureGroup {
    pub name: String,
    pub features: Vec<String>,
}

impl FeatureGroup {
    pub fn new(name: &str, features: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            features: features.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Immutable feature catalog: ordered groups + leakage denylist
#[derive(Debug, Clone)]
pub struct FeatureCatalog {
    version: u8,
    groups: Vec<FeatureGroup>,
    denylist: Vec<String>,
    // Flattened feature ids in catalog order
    all: Vec<String>,
    // Feature id -> index into `groups`
    group_index: HashMap<String, usize>,
}

/// Error when a feature identifier appears in more than one group
#[derive(Debug, Clone)]
pub struct DuplicateFeatureError {
    pub feature: String,
    pub first_group: String,
    pub second_group: String,
}

impl std::fmt::Display for DuplicateFeatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature '{}' assigned to both '{}' and '{}'",
            self.feature, self.first_group, self.second_group
        )
    }
}

impl std::error::Error for DuplicateFeatureError {}

impl FeatureCatalog {
    /// Build a catalog from explicit groups
    ///
    /// Fails if any feature id appears in two groups: category rollups
    /// require the groups to partition the id set.
    pub fn new(
        version: u8,
        groups: Vec<FeatureGroup>,
        denylist: Vec<String>,
    ) -> Result<Self, DuplicateFeatureError> {
        let mut all = Vec::new();
        let mut group_index: HashMap<String, usize> = HashMap::new();

        for (gi, group) in groups.iter().enumerate() {
            for feature in &group.features {
                if let Some(&prev) = group_index.get(feature) {
                    return Err(DuplicateFeatureError {
                        feature: feature.clone(),
                        first_group: groups[prev].name.clone(),
                        second_group: group.name.clone(),
                    });
                }
                group_index.insert(feature.clone(), gi);
                all.push(feature.clone());
            }
        }

        Ok(Self {
            version,
            groups,
            denylist,
            all,
            group_index,
        })
    }

    /// The student-dropout catalog this deployment ships with
    pub fn student_dropout() -> Self {
        let groups = vec![
            FeatureGroup::new("Socioeconomic", SOCIOECONOMIC),
            FeatureGroup::new("Geographic", GEOGRAPHIC),
            FeatureGroup::new("Academic", ACADEMIC),
            FeatureGroup::new("Behavioral", BEHAVIORAL),
            FeatureGroup::new("Demographic", DEMOGRAPHIC),
        ];
        let denylist = LEAKAGE_DENYLIST.iter().map(|s| s.to_string()).collect();

        // The shipped layout is a partition by construction
        Self::new(CATALOG_VERSION, groups, denylist)
            .expect("default catalog must not contain duplicate features")
    }

    /// Shared default instance
    pub fn shared() -> &'static FeatureCatalog {
        static DEFAULT: Lazy<FeatureCatalog> = Lazy::new(FeatureCatalog::student_dropout);
        &DEFAULT
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    /// All feature ids in catalog order
    pub fn all(&self) -> &[String] {
        &self.all
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.group_index.contains_key(feature)
    }

    pub fn groups(&self) -> &[FeatureGroup] {
        &self.groups
    }

    /// Group name a feature belongs to, if any
    pub fn group_of(&self, feature: &str) -> Option<&str> {
        self.group_index
            .get(feature)
            .map(|&gi| self.groups[gi].name.as_str())
    }

    pub fn denylist(&self) -> &[String] {
        &self.denylist
    }

    pub fn is_denylisted(&self, feature: &str) -> bool {
        self.denylist.iter().any(|d| d == feature)
    }

    /// Group name -> member feature ids, for the category aggregator
    pub fn group_map(&self) -> HashMap<String, Vec<String>> {
        self.groups
            .iter()
            .map(|g| (g.name.clone(), g.features.clone()))
            .collect()
    }

    /// CRC32 hash of the ordered layout
    /// Used to detect layout mismatches across runs and as a cache key part
    pub fn layout_hash(&self) -> u32 {
        let mut hasher = Hasher::new();
        hasher.update(&[self.version]);
        for feature in &self.all {
            hasher.update(feature.as_bytes());
            hasher.update(&[0]); // Separator
        }
        hasher.finalize()
    }

    /// Complete catalog information for serialization/logging
    pub fn info(&self) -> CatalogInfo {
        CatalogInfo {
            version: self.version,
            hash: self.layout_hash(),
            feature_count: self.all.len(),
            group_names: self.groups.iter().map(|g| g.name.clone()).collect(),
            denylist: self.denylist.clone(),
        }
    }
}

impl Default for FeatureCatalog {
    fn default() -> Self {
        Self::student_dropout()
    }
}

/// Catalog summary for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub group_names: Vec<String>,
    pub denylist: Vec<String>,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_counts() {
        let catalog = FeatureCatalog::student_dropout();
        assert_eq!(catalog.groups().len(), 5);
        assert_eq!(catalog.len(), 16);
        assert_eq!(catalog.version(), CATALOG_VERSION);
    }

    #[test]
    fn test_groups_partition_features() {
        let catalog = FeatureCatalog::student_dropout();
        let from_groups: usize = catalog.groups().iter().map(|g| g.features.len()).sum();
        assert_eq!(from_groups, catalog.all().len());

        for feature in catalog.all() {
            assert!(catalog.group_of(feature).is_some());
        }
    }

    #[test]
    fn test_duplicate_feature_rejected() {
        let groups = vec![
            FeatureGroup::new("A", &["x", "y"]),
            FeatureGroup::new("B", &["y"]),
        ];
        let err = FeatureCatalog::new(1, groups, vec![]).unwrap_err();
        assert_eq!(err.feature, "y");
        assert_eq!(err.first_group, "A");
        assert_eq!(err.second_group, "B");
    }

    #[test]
    fn test_catalog_order_is_group_order() {
        let catalog = FeatureCatalog::student_dropout();
        assert_eq!(catalog.all()[0], "housing_situation");
        assert_eq!(catalog.all()[15], "gender");
    }

    #[test]
    fn test_layout_hash_consistency() {
        let catalog = FeatureCatalog::student_dropout();
        assert_eq!(catalog.layout_hash(), catalog.layout_hash());
        assert_ne!(catalog.layout_hash(), 0);
    }

    #[test]
    fn test_layout_hash_order_sensitive() {
        let a = FeatureCatalog::new(
            1,
            vec![FeatureGroup::new("G", &["x", "y"])],
            vec![],
        )
        .unwrap();
        let b = FeatureCatalog::new(
            1,
            vec![FeatureGroup::new("G", &["y", "x"])],
            vec![],
        )
        .unwrap();
        assert_ne!(a.layout_hash(), b.layout_hash());
    }

    #[test]
    fn test_denylist_membership() {
        let catalog = FeatureCatalog::student_dropout();
        assert!(catalog.is_denylisted("prior_program_transfer"));
        assert!(!catalog.is_denylisted("weekly_study_hours"));
        // The denylisted feature is still a catalog member
        assert!(catalog.contains("prior_program_transfer"));
    }

    #[test]
    fn test_group_of() {
        let catalog = FeatureCatalog::student_dropout();
        assert_eq!(catalog.group_of("scholarship_support"), Some("Socioeconomic"));
        assert_eq!(catalog.group_of("gender"), Some("Demographic"));
        assert_eq!(catalog.group_of("nonexistent"), None);
    }

    #[test]
    fn test_catalog_info() {
        let catalog = FeatureCatalog::student_dropout();
        let info = catalog.info();
        assert_eq!(info.feature_count, 16);
        assert_eq!(info.hash, catalog.layout_hash());
        assert_eq!(info.group_names.len(), 5);
    }
}

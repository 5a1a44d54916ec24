//! Legible Names - internal feature ids to display labels
//!
//! Exact-match lookup with identity fallback. No fuzzy matching, no case
//! normalization: an id either has a curated label or is shown as-is.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Curated labels for the student-dropout catalog.
///
/// The map is deliberately partial: `prior_program_transfer` never reaches a
/// report (it is denylisted at audit time), so it carries no label.
const STUDENT_DROPOUT_LABELS: &[(&str, &str)] = &[
    ("housing_situation", "Housing Situation"),
    ("currently_working", "Currently Working"),
    ("scholarship_support", "Scholarship Support"),
    ("home_city_code", "Home City"),
    ("campus_return_frequency", "Campus Return Frequency"),
    ("local_origin", "Local Origin"),
    ("pending_courses", "Pending Courses"),
    ("current_term", "Current Term"),
    ("school_type", "School Type"),
    ("weekly_study_hours", "Weekly Study Hours"),
    ("left_for_work_opportunity", "Left For Work Opportunity"),
    ("extracurricular_participation", "Extracurricular Activities"),
    ("prior_course_withdrawal", "Prior Course Withdrawal"),
    ("age_bracket", "Age Bracket"),
    ("gender", "Gender"),
];

/// Display-label lookup for internal feature identifiers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegibilityMap {
    entries: HashMap<String, String>,
}

impl LegibilityMap {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Labels for the student-dropout catalog
    pub fn student_dropout() -> Self {
        Self {
            entries: STUDENT_DROPOUT_LABELS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Display label for one identifier, falling back to the identifier
    pub fn legible<'a>(&'a self, feature: &'a str) -> &'a str {
        self.entries.get(feature).map(String::as_str).unwrap_or(feature)
    }

    /// Display labels for an ordered identifier list, order preserved
    pub fn resolve_all(&self, features: &[String]) -> Vec<String> {
        features.iter().map(|f| self.legible(f).to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LegibilityMap {
    fn default() -> Self {
        Self::student_dropout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_label() {
        let names = LegibilityMap::student_dropout();
        assert_eq!(names.legible("weekly_study_hours"), "Weekly Study Hours");
    }

    #[test]
    fn test_identity_fallback() {
        let names = LegibilityMap::student_dropout();
        assert_eq!(names.legible("prior_program_transfer"), "prior_program_transfer");
        assert_eq!(names.legible("totally_unknown"), "totally_unknown");
    }

    #[test]
    fn test_exact_match_only() {
        let names = LegibilityMap::student_dropout();
        // No case normalization
        assert_eq!(names.legible("Weekly_Study_Hours"), "Weekly_Study_Hours");
    }

    #[test]
    fn test_resolve_all_preserves_order() {
        let names = LegibilityMap::student_dropout();
        let ids = vec!["gender".to_string(), "unknown_col".to_string()];
        assert_eq!(
            names.resolve_all(&ids),
            vec!["Gender".to_string(), "unknown_col".to_string()]
        );
    }
}

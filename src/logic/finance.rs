//! Financial Impact Model
//!
//! Pure functions translating at-risk headcounts into monetary terms for
//! institutional decision-makers. No state, no I/O.

use serde::{Deserialize, Serialize};

/// Annual revenue at stake for a group of at-risk students
pub fn exposure(at_risk_count: u64, revenue_per_student: f64) -> f64 {
    at_risk_count as f64 * revenue_per_student
}

/// One retention scenario's outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionScenario {
    /// Retention success rate, percent
    pub success_rate_pct: f64,
    /// Students retained at that rate, truncated to whole students
    pub students_retained: u64,
    pub preserved_revenue: f64,
}

/// Preserved revenue across a sweep of retention success rates
pub fn retention_scenarios(
    at_risk_count: u64,
    revenue_per_student: f64,
    success_rates_pct: &[f64],
) -> Vec<RetentionScenario> {
    success_rates_pct
        .iter()
        .map(|&rate| {
            let students_retained = (at_risk_count as f64 * rate / 100.0).floor() as u64;
            RetentionScenario {
                success_rate_pct: rate,
                students_retained,
                preserved_revenue: exposure(students_retained, revenue_per_student),
            }
        })
        .collect()
}

/// Return on a retention investment, percent
///
/// Zero investment yields zero, never a division error.
pub fn roi_pct(preserved_revenue: f64, investment: f64) -> f64 {
    if investment == 0.0 {
        return 0.0;
    }
    (preserved_revenue - investment) / investment * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exposure() {
        assert_eq!(exposure(100, 50_000.0), 5_000_000.0);
        assert_eq!(exposure(0, 50_000.0), 0.0);
    }

    #[test]
    fn test_scenarios_truncate_retained_count() {
        let scenarios = retention_scenarios(7, 1_000.0, &[50.0]);
        assert_eq!(scenarios[0].students_retained, 3); // floor(3.5)
        assert_eq!(scenarios[0].preserved_revenue, 3_000.0);
    }

    #[test]
    fn test_scenarios_monotonic_in_rate() {
        let rates: Vec<f64> = (0..=20).map(|i| i as f64 * 5.0).collect();
        let scenarios = retention_scenarios(137, 50_000.0, &rates);
        for pair in scenarios.windows(2) {
            assert!(pair[1].preserved_revenue >= pair[0].preserved_revenue);
        }
        assert_eq!(scenarios.last().unwrap().students_retained, 137);
    }

    #[test]
    fn test_roi() {
        assert_eq!(roi_pct(150_000.0, 100_000.0), 50.0);
        assert_eq!(roi_pct(50_000.0, 100_000.0), -50.0);
    }

    #[test]
    fn test_roi_zero_investment_guard() {
        let roi = roi_pct(1_000_000.0, 0.0);
        assert_eq!(roi, 0.0);
        assert!(roi.is_finite());
    }
}

//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change default artifact locations, only edit this file.

/// Default model artifact path
///
/// This is the fallback path when no environment variable is set.
pub const DEFAULT_MODEL_PATH: &str = "./models/best_model.json";

/// Default encoded dataset path
pub const DEFAULT_DATASET_PATH: &str = "./database/encoded_forms.csv";

/// Label column recorded by the ingestion pipeline
pub const DEFAULT_LABEL_COLUMN: &str = "dropped_out";

/// Default risk probability cutoff
pub const DEFAULT_RISK_CUTOFF: f64 = 0.5;

/// Default average annual revenue per student
pub const DEFAULT_REVENUE_PER_STUDENT: f64 = 50_000.0;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "RetainSight";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model artifact path from environment or use default
pub fn get_model_path() -> String {
    std::env::var("RETAINSIGHT_MODEL_PATH").unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}

/// Get dataset path from environment or use default
pub fn get_dataset_path() -> String {
    std::env::var("RETAINSIGHT_DATASET_PATH").unwrap_or_else(|_| DEFAULT_DATASET_PATH.to_string())
}

/// Get label column name from environment or use default
pub fn get_label_column() -> String {
    std::env::var("RETAINSIGHT_LABEL_COLUMN").unwrap_or_else(|_| DEFAULT_LABEL_COLUMN.to_string())
}

/// Get risk cutoff from environment or use default
pub fn get_risk_cutoff() -> f64 {
    std::env::var("RETAINSIGHT_RISK_CUTOFF")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_RISK_CUTOFF)
}

/// Get per-student revenue from environment or use default
pub fn get_revenue_per_student() -> f64 {
    std::env::var("RETAINSIGHT_REVENUE_PER_STUDENT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_REVENUE_PER_STUDENT)
}

//! RetainSight Core - Analysis Entry Point
//!
//! Runs the full pipeline against the configured artifacts and prints the
//! executive report: risk counts, feature importance, category ranking,
//! and financial scenarios.

use retainsight_core::logic::finance;
use retainsight_core::{constants, AnalysisRunner, PipelineConfig, RiskThreshold};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("Analysis failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), retainsight_core::PipelineError> {
    println!(
        "{} v{} - dropout risk analysis",
        constants::APP_NAME,
        constants::APP_VERSION
    );

    let runner = AnalysisRunner::with_defaults(PipelineConfig::from_env());
    let bundle = runner.run()?;

    println!("\nModel: {} ({} trees, {} features)",
        bundle.model.model_path, bundle.model.n_trees, bundle.model.n_features);
    println!("Run {} at {}", bundle.run_id, bundle.generated_at.to_rfc3339());
    println!(
        "Students scored: {} | catalog coverage: {}/{} features",
        bundle.n_students(),
        bundle.availability.found(),
        bundle.availability.total()
    );
    if bundle.availability.has_drift() {
        println!("Missing features: {:?}", bundle.availability.missing);
    }

    let threshold = RiskThreshold::new(constants::get_risk_cutoff());
    let risk = bundle.risk_summary(&threshold);
    println!(
        "\nAt risk (cutoff {:.2}): {} of {} students ({:.1}%)",
        risk.cutoff,
        risk.n_at_risk,
        risk.n_samples,
        risk.at_risk_share * 100.0
    );

    println!("\nGlobal feature importance:");
    for entry in bundle.importance_ranking() {
        println!(
            "  {:<28} {:.4}",
            runner.names().legible(&entry.feature),
            entry.importance
        );
    }

    println!("\nImportance by category:");
    for (rank, (category, importance)) in bundle.ranked_categories().iter().enumerate() {
        println!("  {}. {:<14} {:.4}", rank + 1, category, importance);
    }

    let revenue = constants::get_revenue_per_student();
    let at_risk = risk.n_at_risk as u64;
    println!(
        "\nRevenue exposure: {:.2} ({} students x {:.2})",
        finance::exposure(at_risk, revenue),
        at_risk,
        revenue
    );

    println!("Retention scenarios:");
    for scenario in finance::retention_scenarios(at_risk, revenue, &[25.0, 50.0, 75.0, 100.0]) {
        println!(
            "  {:>5.1}% success: {:>4} students retained, {:.2} preserved",
            scenario.success_rate_pct, scenario.students_retained, scenario.preserved_revenue
        );
    }

    if let Ok(breakdown) = bundle.sample_breakdown(runner.names(), 0) {
        println!(
            "\nStrongest factors for student 0 (score {:.3}):",
            breakdown.model_score
        );
        for row in breakdown.ranked().iter().take(3) {
            println!("  {:<28} {:+.4}", row.label, row.attribution);
        }
    }

    Ok(())
}

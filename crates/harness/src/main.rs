//! Golden dataset report binary
//!
//! Usage: `intake-report [dataset.yaml]`
//!
//! Loads settings (config files + CAMPAIGN_INTAKE_ environment variables),
//! runs the dataset through the pipeline, and prints the JSON report.

use anyhow::Context;
use campaign_intake_config::load_settings;
use campaign_intake_harness::{load_dataset, run_batch};
use campaign_intake_pipeline::IntakePipeline;
use tracing_subscriber::EnvFilter;

const DEFAULT_DATASET: &str = "data/golden_cases.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let dataset_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATASET.to_string());

    let env = std::env::var("CAMPAIGN_INTAKE_ENV").ok();
    let settings = load_settings(env.as_deref()).context("loading settings")?;

    let pipeline = IntakePipeline::new(settings.pipeline);
    let cases = load_dataset(&dataset_path)
        .await
        .with_context(|| format!("loading dataset {dataset_path}"))?;

    tracing::info!(total = cases.len(), dataset = %dataset_path, "Running golden dataset");
    let report = run_batch(&pipeline, cases, &settings.harness).await;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

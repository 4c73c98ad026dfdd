//! Golden dataset harness
//!
//! Loads golden intake cases, runs them through the pipeline concurrently,
//! scores each extraction against the expected record (fuzzy name match,
//! canonical category aliasing, exact urgency, percentage-tolerance
//! amounts), and aggregates a batch report.

pub mod dataset;
pub mod scoring;

use std::collections::BTreeMap;

use campaign_intake_config::HarnessConfig;
use campaign_intake_pipeline::IntakePipeline;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use dataset::{load_dataset, ExpectedDraft, GoldenCase};
pub use scoring::{canonical_category, score_case, CaseScore};

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("unknown category label `{0}` in expected record")]
    UnknownCategory(String),
}

/// Outcome of one scored case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    pub id: String,
    pub difficulty: Option<String>,
    pub passed: bool,
    pub weighted: f32,
    /// Extraction or scoring failure, when one occurred
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DifficultyStats {
    pub total: usize,
    pub passed: usize,
}

/// Aggregated result of one batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub mean_weighted: f32,
    pub by_difficulty: BTreeMap<String, DifficultyStats>,
    pub cases: Vec<CaseReport>,
}

/// Run every case through the pipeline, `parallelism` at a time.
/// Extractions for different transcripts share no mutable state, so they
/// run fully in parallel.
pub async fn run_batch(
    pipeline: &IntakePipeline,
    cases: Vec<GoldenCase>,
    config: &HarnessConfig,
) -> BatchReport {
    let total = cases.len();

    let mut reports: Vec<CaseReport> = stream::iter(cases)
        .map(|case| async move {
            let transcript = case.to_transcript();
            let difficulty = case.difficulty.map(|d| format!("{d:?}").to_lowercase());
            let id = case.id.clone().unwrap_or_default();

            match pipeline.extract(&transcript).await {
                Ok(result) => match score_case(&result, &case.expected, config) {
                    Ok(score) => CaseReport {
                        id,
                        difficulty,
                        passed: score.passed,
                        weighted: score.weighted,
                        error: None,
                    },
                    Err(err) => CaseReport {
                        id,
                        difficulty,
                        passed: false,
                        weighted: 0.0,
                        error: Some(err.to_string()),
                    },
                },
                Err(err) => CaseReport {
                    id,
                    difficulty,
                    passed: false,
                    weighted: 0.0,
                    error: Some(err.to_string()),
                },
            }
        })
        .buffer_unordered(config.parallelism.max(1))
        .collect()
        .await;

    // buffer_unordered completes out of order; sort for stable reports
    reports.sort_by(|a, b| a.id.cmp(&b.id));

    let passed = reports.iter().filter(|r| r.passed).count();
    let errored = reports.iter().filter(|r| r.error.is_some()).count();
    let mean_weighted = if reports.is_empty() {
        0.0
    } else {
        reports.iter().map(|r| r.weighted).sum::<f32>() / reports.len() as f32
    };

    let mut by_difficulty: BTreeMap<String, DifficultyStats> = BTreeMap::new();
    for report in &reports {
        let key = report
            .difficulty
            .clone()
            .unwrap_or_else(|| "untagged".to_string());
        let stats = by_difficulty.entry(key).or_default();
        stats.total += 1;
        if report.passed {
            stats.passed += 1;
        }
    }

    tracing::info!(total, passed, errored, "Batch run complete");

    BatchReport {
        generated_at: Utc::now(),
        total,
        passed,
        failed: total - passed,
        errored,
        mean_weighted,
        by_difficulty,
        cases: reports,
    }
}

//! Golden dataset loading
//!
//! A dataset is a YAML list of cases: transcript text, optional id and
//! difficulty tag, and the expected record. Category labels in expected
//! records are free-form aliases ("medical", "rent help") resolved through
//! the canonical alias table at scoring time.

use campaign_intake_core::{Difficulty, Transcript, UrgencyLevel};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::HarnessError;

/// Expected record for one golden case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectedDraft {
    #[serde(default)]
    pub name: Option<String>,
    /// Free-form category label, canonicalized at scoring time
    pub category: String,
    #[serde(default)]
    pub urgency_level: Option<UrgencyLevel>,
    #[serde(default)]
    pub goal_amount: Option<f64>,
}

/// One golden intake case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoldenCase {
    #[serde(default)]
    pub id: Option<String>,
    pub transcript: String,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    pub expected: ExpectedDraft,
}

impl GoldenCase {
    /// Build the pipeline input for this case
    pub fn to_transcript(&self) -> Transcript {
        Transcript::with_metadata(self.transcript.clone(), self.id.clone(), self.difficulty)
    }
}

/// Parse a dataset out of YAML text; cases without ids get generated ones.
pub fn parse_dataset(yaml: &str) -> Result<Vec<GoldenCase>, HarnessError> {
    let mut cases: Vec<GoldenCase> = serde_yaml::from_str(yaml)?;
    for case in &mut cases {
        if case.id.is_none() {
            case.id = Some(Uuid::new_v4().to_string());
        }
    }
    Ok(cases)
}

/// Load a dataset from disk
pub async fn load_dataset(path: &str) -> Result<Vec<GoldenCase>, HarnessError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| HarnessError::Io {
            path: path.to_string(),
            source,
        })?;
    let cases = parse_dataset(&raw)?;
    tracing::debug!(path, total = cases.len(), "Dataset loaded");
    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_case() {
        let cases = parse_dataset(
            r#"
- transcript: "I need $200 for groceries."
  expected:
    category: food
"#,
        )
        .unwrap();
        assert_eq!(cases.len(), 1);
        assert!(cases[0].id.is_some());
        assert_eq!(cases[0].expected.category, "food");
        assert_eq!(cases[0].expected.goal_amount, None);
    }

    #[test]
    fn test_parse_full_case() {
        let cases = parse_dataset(
            r#"
- id: maria
  transcript: "My name is Maria Torres and I need $5,000 for medical bills."
  difficulty: hard
  expected:
    name: Maria Torres
    category: healthcare
    urgency_level: HIGH
    goal_amount: 5000
"#,
        )
        .unwrap();
        let case = &cases[0];
        assert_eq!(case.id.as_deref(), Some("maria"));
        assert_eq!(case.difficulty, Some(Difficulty::Hard));
        assert_eq!(case.expected.urgency_level, Some(UrgencyLevel::High));
        assert_eq!(case.expected.goal_amount, Some(5000.0));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(parse_dataset("not: [valid").is_err());
    }
}

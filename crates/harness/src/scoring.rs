//! Case scoring
//!
//! Compares one extraction against the expected record:
//! - names fuzzily (normalization, token containment, Jaro-Winkler)
//! - categories through a canonical alias table
//! - urgency exactly
//! - amounts within a percentage tolerance
//!
//! and folds the field outcomes into a weighted pass/fail.

use campaign_intake_config::HarnessConfig;
use campaign_intake_core::{Category, ExtractionResult};
use strsim::jaro_winkler;

use crate::{ExpectedDraft, HarnessError};

/// Field weights for the weighted score
const NAME_WEIGHT: f32 = 0.2;
const CATEGORY_WEIGHT: f32 = 0.3;
const URGENCY_WEIGHT: f32 = 0.2;
const AMOUNT_WEIGHT: f32 = 0.3;

/// Jaro-Winkler similarity at or above which two names count as the same
const NAME_SIMILARITY_FLOOR: f64 = 0.88;

/// Per-field outcomes of one scored case
#[derive(Debug, Clone, Copy)]
pub struct CaseScore {
    pub name_ok: bool,
    pub category_ok: bool,
    pub urgency_ok: bool,
    pub amount_ok: bool,
    pub weighted: f32,
    pub passed: bool,
}

/// Resolve a free-form category label to its canonical enum value
pub fn canonical_category(label: &str) -> Option<Category> {
    let normalized = label.trim().to_lowercase().replace(['-', '_'], " ");
    let category = match normalized.as_str() {
        "safety" | "domestic violence" | "abuse" => Category::Safety,
        "legal" | "court" | "legal aid" => Category::Legal,
        "healthcare" | "health" | "medical" | "medical bills" => Category::Healthcare,
        "emergency" | "disaster" => Category::Emergency,
        "housing" | "rent" | "rent help" | "shelter" => Category::Housing,
        "employment" | "job" | "work" | "job loss" => Category::Employment,
        "education" | "school" | "tuition" | "training" => Category::Education,
        "family" | "childcare" | "caregiving" => Category::Family,
        "food" | "groceries" | "meals" => Category::Food,
        "utilities" | "bills" | "utility bills" => Category::Utilities,
        "transportation" | "transport" | "car" | "vehicle" => Category::Transportation,
        "other" | "personal" | "general" => Category::Other,
        _ => return None,
    };
    Some(category)
}

fn normalize_person_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fuzzy name comparison: equal after normalization, token containment
/// ("Maria Torres" vs "Maria Elena Torres"), or high string similarity.
pub fn names_match(extracted: Option<&str>, expected: Option<&str>) -> bool {
    match (extracted, expected) {
        (None, None) => true,
        (Some(extracted), Some(expected)) => {
            let a = normalize_person_name(extracted);
            let b = normalize_person_name(expected);
            if a.is_empty() || b.is_empty() {
                return a == b;
            }
            if a == b {
                return true;
            }
            let a_tokens: Vec<&str> = a.split(' ').collect();
            let b_tokens: Vec<&str> = b.split(' ').collect();
            if a_tokens.iter().all(|t| b_tokens.contains(t))
                || b_tokens.iter().all(|t| a_tokens.contains(t))
            {
                return true;
            }
            jaro_winkler(&a, &b) >= NAME_SIMILARITY_FLOOR
        }
        _ => false,
    }
}

/// Amount comparison within a percentage tolerance of the expected value
pub fn amounts_match(extracted: Option<f64>, expected: Option<f64>, tolerance_pct: f64) -> bool {
    match (extracted, expected) {
        (None, None) => true,
        (Some(extracted), Some(expected)) => {
            (extracted - expected).abs() <= expected.abs() * tolerance_pct / 100.0
        }
        _ => false,
    }
}

/// Score one extraction against its expected record. Expected fields left
/// unspecified (urgency, sometimes name/amount) do not count against the
/// case.
pub fn score_case(
    result: &ExtractionResult,
    expected: &ExpectedDraft,
    config: &HarnessConfig,
) -> Result<CaseScore, HarnessError> {
    let expected_category = canonical_category(&expected.category)
        .ok_or_else(|| HarnessError::UnknownCategory(expected.category.clone()))?;

    let name_ok = match &expected.name {
        Some(expected_name) => names_match(result.name.as_deref(), Some(expected_name)),
        None => true,
    };
    let category_ok = result.category == expected_category;
    let urgency_ok = match expected.urgency_level {
        Some(expected_level) => result.urgency_level == expected_level,
        None => true,
    };
    let amount_ok = match expected.goal_amount {
        Some(expected_amount) => amounts_match(
            result.goal_amount,
            Some(expected_amount),
            config.amount_tolerance_pct,
        ),
        None => true,
    };

    let credit = |ok: bool, weight: f32| if ok { weight } else { 0.0 };
    let weighted = credit(name_ok, NAME_WEIGHT)
        + credit(category_ok, CATEGORY_WEIGHT)
        + credit(urgency_ok, URGENCY_WEIGHT)
        + credit(amount_ok, AMOUNT_WEIGHT);

    Ok(CaseScore {
        name_ok,
        category_ok,
        urgency_ok,
        amount_ok,
        weighted,
        passed: weighted >= config.pass_threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_intake_core::{
        DebugTrace, FieldConfidence, UrgencyLevel, BENEFICIARY_SELF,
    };

    fn result(
        name: Option<&str>,
        category: Category,
        urgency: UrgencyLevel,
        amount: Option<f64>,
    ) -> ExtractionResult {
        ExtractionResult {
            name: name.map(str::to_string),
            category,
            urgency_level: urgency,
            goal_amount: amount,
            beneficiary_relationship: BENEFICIARY_SELF.to_string(),
            confidence: FieldConfidence::default(),
            debug: DebugTrace::default(),
        }
    }

    fn expected(category: &str, amount: Option<f64>) -> ExpectedDraft {
        ExpectedDraft {
            name: None,
            category: category.to_string(),
            urgency_level: None,
            goal_amount: amount,
        }
    }

    #[test]
    fn test_category_aliases() {
        assert_eq!(canonical_category("medical"), Some(Category::Healthcare));
        assert_eq!(canonical_category("Rent Help"), Some(Category::Housing));
        assert_eq!(canonical_category("TRANSPORT"), Some(Category::Transportation));
        assert_eq!(canonical_category("made-up"), None);
    }

    #[test]
    fn test_fuzzy_name_matching() {
        assert!(names_match(Some("Maria Torres"), Some("maria torres")));
        assert!(names_match(Some("Maria Torres"), Some("Maria Elena Torres")));
        assert!(names_match(Some("Jon Smith"), Some("John Smith")));
        assert!(!names_match(Some("Maria Torres"), Some("Robert Chen")));
        assert!(names_match(None, None));
        assert!(!names_match(None, Some("Maria Torres")));
    }

    #[test]
    fn test_amount_tolerance_boundary() {
        // 2% of 1000 is 20: a 1-dollar miss passes, a 25-dollar miss fails
        assert!(amounts_match(Some(999.0), Some(1000.0), 2.0));
        assert!(!amounts_match(Some(975.0), Some(1000.0), 2.0));
        assert!(amounts_match(Some(1020.0), Some(1000.0), 2.0));
        assert!(!amounts_match(Some(1021.0), Some(1000.0), 2.0));
    }

    #[test]
    fn test_weighted_pass() {
        let config = HarnessConfig::default();
        let score = score_case(
            &result(None, Category::Food, UrgencyLevel::Medium, Some(200.0)),
            &expected("groceries", Some(200.0)),
            &config,
        )
        .unwrap();
        assert!(score.passed);
        assert!((score.weighted - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_wrong_category_and_amount_fails() {
        let config = HarnessConfig::default();
        let score = score_case(
            &result(None, Category::Other, UrgencyLevel::Medium, None),
            &expected("groceries", Some(200.0)),
            &config,
        )
        .unwrap();
        assert!(!score.passed);
    }

    #[test]
    fn test_unknown_label_errors() {
        let config = HarnessConfig::default();
        let err = score_case(
            &result(None, Category::Food, UrgencyLevel::Medium, None),
            &expected("no-such-label", None),
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, HarnessError::UnknownCategory(_)));
    }
}

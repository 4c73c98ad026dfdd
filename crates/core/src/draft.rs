//! Campaign draft model
//!
//! The structured output of one extraction: need category, urgency level,
//! requester name and goal amount, with per-field confidences and a debug
//! trace explaining how each field was resolved.

use serde::{Deserialize, Serialize};

/// Fixed beneficiary relationship for first-person narratives
pub const BENEFICIARY_SELF: &str = "myself";

/// Need category. Exactly one value per transcript; never null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Safety,
    Legal,
    Healthcare,
    Emergency,
    Housing,
    Employment,
    Education,
    Family,
    Food,
    Utilities,
    Transportation,
    Other,
}

impl Category {
    /// All categories, in priority order (used for tie-breaking)
    pub const ALL: [Category; 12] = [
        Category::Safety,
        Category::Legal,
        Category::Healthcare,
        Category::Emergency,
        Category::Housing,
        Category::Employment,
        Category::Education,
        Category::Family,
        Category::Food,
        Category::Utilities,
        Category::Transportation,
        Category::Other,
    ];

    /// Position in the fixed priority order; lower ranks win ties
    pub fn priority_rank(&self) -> usize {
        Category::ALL.iter().position(|c| c == self).unwrap_or(usize::MAX)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Safety => "SAFETY",
            Category::Legal => "LEGAL",
            Category::Healthcare => "HEALTHCARE",
            Category::Emergency => "EMERGENCY",
            Category::Housing => "HOUSING",
            Category::Employment => "EMPLOYMENT",
            Category::Education => "EDUCATION",
            Category::Family => "FAMILY",
            Category::Food => "FOOD",
            Category::Utilities => "UTILITIES",
            Category::Transportation => "TRANSPORTATION",
            Category::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency level, ordered LOW < MEDIUM < HIGH < CRITICAL
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "LOW",
            UrgencyLevel::Medium => "MEDIUM",
            UrgencyLevel::High => "HIGH",
            UrgencyLevel::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field confidence map, all values in 0..=1
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfidence {
    pub name: f32,
    pub category: f32,
    pub urgency_level: f32,
    pub goal_amount: f32,
    pub overall: f32,
}

/// One name-tier attempt, kept for the debug trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameAttempt {
    /// Tier that produced the candidate
    pub tier: String,
    /// Candidate text as matched
    pub candidate: String,
    /// "accepted" or the rejection reason
    pub outcome: String,
}

/// Debug trace for the name resolver
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameTrace {
    pub attempts: Vec<NameAttempt>,
    /// True when the speaker declined to give a name
    pub declined: bool,
}

/// Debug trace for the urgency assessor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgencyTrace {
    /// Name of the rule that fired
    pub rule: String,
    /// Set when an objective severity signal overrode downplaying language
    pub override_reason: Option<String>,
    /// True when the objective override applied (blocks de-escalation)
    pub objective_override: bool,
}

/// Full per-extraction debug trace
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugTrace {
    pub name: NameTrace,
    /// Rule firings and score notes from the category classifier
    pub category: Vec<String>,
    pub urgency: UrgencyTrace,
    /// Strategy failures caught and degraded to baseline
    pub strategy_failures: Vec<String>,
}

/// Aggregate result of one extraction. Created once per transcript by the
/// orchestrator; read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub name: Option<String>,
    pub category: Category,
    pub urgency_level: UrgencyLevel,
    pub goal_amount: Option<f64>,
    pub beneficiary_relationship: String,
    pub confidence: FieldConfidence,
    pub debug: DebugTrace,
}

impl ExtractionResult {
    /// Compute the overall confidence as the weighted mean of the fields
    pub fn compute_overall(confidence: &FieldConfidence) -> f32 {
        confidence.name * 0.2
            + confidence.category * 0.3
            + confidence.urgency_level * 0.25
            + confidence.goal_amount * 0.25
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_ordering() {
        assert!(UrgencyLevel::Low < UrgencyLevel::Medium);
        assert!(UrgencyLevel::Medium < UrgencyLevel::High);
        assert!(UrgencyLevel::High < UrgencyLevel::Critical);
    }

    #[test]
    fn test_category_serialization() {
        assert_eq!(
            serde_json::to_string(&Category::Healthcare).unwrap(),
            "\"HEALTHCARE\""
        );
        let back: Category = serde_json::from_str("\"TRANSPORTATION\"").unwrap();
        assert_eq!(back, Category::Transportation);
    }

    #[test]
    fn test_priority_rank_order() {
        assert!(Category::Safety.priority_rank() < Category::Legal.priority_rank());
        assert!(Category::Healthcare.priority_rank() < Category::Housing.priority_rank());
        assert!(Category::Family.priority_rank() < Category::Other.priority_rank());
    }

    #[test]
    fn test_result_wire_shape() {
        let result = ExtractionResult {
            name: Some("Maria Torres".into()),
            category: Category::Healthcare,
            urgency_level: UrgencyLevel::High,
            goal_amount: Some(5000.0),
            beneficiary_relationship: BENEFICIARY_SELF.to_string(),
            confidence: FieldConfidence::default(),
            debug: DebugTrace::default(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["urgencyLevel"], "HIGH");
        assert_eq!(json["goalAmount"], 5000.0);
        assert_eq!(json["beneficiaryRelationship"], "myself");
        assert!(json["confidence"]["urgencyLevel"].is_number());
    }

    #[test]
    fn test_overall_confidence_weighting() {
        let confidence = FieldConfidence {
            name: 1.0,
            category: 1.0,
            urgency_level: 1.0,
            goal_amount: 1.0,
            overall: 0.0,
        };
        assert!((ExtractionResult::compute_overall(&confidence) - 1.0).abs() < 1e-6);
    }
}

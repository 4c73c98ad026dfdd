//! Built-in strategy implementations
//!
//! A compile-time-known set of optional strategies the orchestrator wires
//! in from config switches. Each one is independently unit-testable and
//! follows the same contract: report a confidence, or fail and let the
//! built-in heuristic stand.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use campaign_intake_core::{
    Category, CategoryAssessment, CategoryEnhancement, CategoryStrategy, IntakeError, Result,
    Transcript, UrgencyContext, UrgencyDeescalator, UrgencyLevel, UrgencyStrategy,
};

static CHILDCARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:childcare|daycare|babysitter|after-?school care|caring for my (?:mother|father|parents)|caregiver)\b")
        .unwrap()
});

static UTILITY_BILL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:electric|power|water|gas|heating|internet|phone)\s+bill\b|\butilit(?:y|ies)\b")
        .unwrap()
});

static RECURRING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:every month|each month|monthly|again this month|keeps? (?:coming|happening))\b")
        .unwrap()
});

static DATED_DEADLINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:by|before|due|until)\s+(?:tomorrow|tonight|today|monday|tuesday|wednesday|thursday|friday|saturday|sunday|the (?:\d{1,2}(?:st|nd|rd|th)|end of the (?:week|month)))\b")
        .unwrap()
});

static SAME_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:today|tonight|tomorrow)\b").unwrap());

static SEVERE_CIRCUMSTANCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:life-?threatening|nowhere to (?:go|stay|sleep)|homeless|uninhabitable|in danger|emergency surgery|foreclos\w+|shut(?:-| )?off)\b")
        .unwrap()
});

/// Category enhancer: dependent-care language firms up FAMILY when the
/// baseline is uncertain.
#[derive(Default)]
pub struct DependentCareEnhancer;

impl DependentCareEnhancer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CategoryStrategy for DependentCareEnhancer {
    fn id(&self) -> &'static str {
        "dependent_care"
    }

    async fn enhance(
        &self,
        transcript: &Transcript,
        current: &CategoryAssessment,
    ) -> Result<CategoryEnhancement> {
        let relevant = matches!(current.category, Category::Other | Category::Family);
        if relevant && CHILDCARE.is_match(&transcript.text) {
            return Ok(CategoryEnhancement {
                category: Category::Family,
                confidence: 0.75,
                reasons: vec!["dependent-care language present".to_string()],
            });
        }
        Ok(CategoryEnhancement {
            category: current.category,
            confidence: current.confidence,
            reasons: vec![],
        })
    }
}

/// Category enhancer: recurring utility-bill phrasing firms up UTILITIES.
#[derive(Default)]
pub struct RecurringBillEnhancer;

impl RecurringBillEnhancer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CategoryStrategy for RecurringBillEnhancer {
    fn id(&self) -> &'static str {
        "recurring_bill"
    }

    async fn enhance(
        &self,
        transcript: &Transcript,
        current: &CategoryAssessment,
    ) -> Result<CategoryEnhancement> {
        let text = &transcript.text;
        if current.category != Category::Utilities
            && UTILITY_BILL.is_match(text)
            && RECURRING.is_match(text)
        {
            return Ok(CategoryEnhancement {
                category: Category::Utilities,
                confidence: 0.7,
                reasons: vec!["recurring utility-bill phrasing".to_string()],
            });
        }
        Ok(CategoryEnhancement {
            category: current.category,
            confidence: current.confidence,
            reasons: vec![],
        })
    }
}

/// Alternate urgency assessment keyed purely on dated deadlines. Fails when
/// the transcript carries no dated deadline, which sends the orchestrator
/// back to the built-in cascade.
#[derive(Default)]
pub struct DeadlineUrgencyStrategy;

impl DeadlineUrgencyStrategy {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UrgencyStrategy for DeadlineUrgencyStrategy {
    fn id(&self) -> &'static str {
        "dated_deadline"
    }

    async fn assess(
        &self,
        transcript: &Transcript,
        _context: &UrgencyContext,
    ) -> Result<UrgencyLevel> {
        let text = &transcript.text;
        if !DATED_DEADLINE.is_match(text) {
            return Err(IntakeError::strategy(self.id(), "no dated deadline found"));
        }
        if SAME_DAY.is_match(text) {
            Ok(UrgencyLevel::Critical)
        } else {
            Ok(UrgencyLevel::High)
        }
    }
}

/// Post-hoc review that lowers CRITICAL to HIGH when no severe
/// circumstance backs it. Never raises a level; the orchestrator already
/// refuses to de-escalate past an objective override.
#[derive(Default)]
pub struct ConservativeDeescalator;

impl ConservativeDeescalator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UrgencyDeescalator for ConservativeDeescalator {
    fn id(&self) -> &'static str {
        "conservative_deescalation"
    }

    async fn review(&self, transcript: &Transcript, level: UrgencyLevel) -> Result<UrgencyLevel> {
        if level == UrgencyLevel::Critical && !SEVERE_CIRCUMSTANCE.is_match(&transcript.text) {
            return Ok(UrgencyLevel::High);
        }
        Ok(level)
    }
}

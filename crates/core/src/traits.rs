//! Strategy traits for pluggable field extractors
//!
//! Each extraction field can be backed by an optional external strategy.
//! Strategies are loaded once at process start, held read-only for the
//! lifetime of the process, and consulted by the orchestrator. A failing
//! strategy never fails the pipeline: the call site catches the error and
//! falls back to the built-in heuristic for that field only.

use async_trait::async_trait;

use crate::draft::{Category, UrgencyLevel};
use crate::error::Result;
use crate::transcript::Transcript;

/// Outcome of an external name extraction strategy
#[derive(Debug, Clone, Default)]
pub struct NameStrategyOutcome {
    /// Best name according to the strategy, if any
    pub primary: Option<String>,
    pub confidence: f32,
    /// Alternative candidates, best first
    pub candidates: Vec<String>,
    /// Free-form reasoning for the debug trace
    pub reasoning: String,
}

/// Outcome of an external amount extraction strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct AmountStrategyOutcome {
    pub primary: Option<f64>,
    pub confidence: f32,
}

/// Already-resolved fields passed into the urgency step as context
#[derive(Debug, Clone, Copy)]
pub struct UrgencyContext {
    pub category: Category,
    pub amount: Option<f64>,
}

/// Current category result handed to enhancement strategies
#[derive(Debug, Clone, Copy)]
pub struct CategoryAssessment {
    pub category: Category,
    pub confidence: f32,
}

/// Proposal returned by a category enhancement strategy
#[derive(Debug, Clone)]
pub struct CategoryEnhancement {
    pub category: Category,
    pub confidence: f32,
    pub reasons: Vec<String>,
}

/// External name extractor, consulted before accepting the heuristic result
#[async_trait]
pub trait NameStrategy: Send + Sync {
    /// Stable identifier used in the debug trace
    fn id(&self) -> &'static str;

    async fn extract(&self, transcript: &Transcript) -> Result<NameStrategyOutcome>;
}

/// External amount extractor
#[async_trait]
pub trait AmountStrategy: Send + Sync {
    fn id(&self) -> &'static str;

    async fn extract(&self, transcript: &Transcript) -> Result<AmountStrategyOutcome>;
}

/// Alternate urgency assessor, consulted before the built-in cascade
#[async_trait]
pub trait UrgencyStrategy: Send + Sync {
    fn id(&self) -> &'static str;

    async fn assess(&self, transcript: &Transcript, context: &UrgencyContext)
        -> Result<UrgencyLevel>;
}

/// Category enhancement strategy. May override the current category only
/// when it reports higher confidence than the current assessment.
#[async_trait]
pub trait CategoryStrategy: Send + Sync {
    fn id(&self) -> &'static str;

    async fn enhance(
        &self,
        transcript: &Transcript,
        current: &CategoryAssessment,
    ) -> Result<CategoryEnhancement>;
}

/// Post-hoc urgency review. May lower an over-assessed level; the
/// orchestrator ignores any attempt to raise it.
#[async_trait]
pub trait UrgencyDeescalator: Send + Sync {
    fn id(&self) -> &'static str;

    async fn review(&self, transcript: &Transcript, level: UrgencyLevel) -> Result<UrgencyLevel>;
}

//! Core types for the campaign intake extraction pipeline
//!
//! This crate provides the foundational types used across all other crates:
//! - Transcript input type with optional reporting metadata
//! - Candidate spans produced by the tiered matchers
//! - The campaign draft model (category, urgency, extraction result)
//! - Error types
//! - Strategy traits for pluggable field extractors

pub mod candidate;
pub mod draft;
pub mod error;
pub mod traits;
pub mod transcript;

pub use candidate::Candidate;
pub use draft::{
    Category, DebugTrace, ExtractionResult, FieldConfidence, NameAttempt, NameTrace,
    UrgencyLevel, UrgencyTrace, BENEFICIARY_SELF,
};
pub use error::{IntakeError, Result};
pub use traits::{
    AmountStrategy, AmountStrategyOutcome, CategoryAssessment, CategoryEnhancement,
    CategoryStrategy, NameStrategy, NameStrategyOutcome, UrgencyContext, UrgencyDeescalator,
    UrgencyStrategy,
};
pub use transcript::{Difficulty, Transcript};

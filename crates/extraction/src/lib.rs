//! Heuristic extraction for campaign intake transcripts
//!
//! The four resolvers that turn one spoken-style narrative into the fields
//! of a campaign draft:
//! - [`name::NameResolver`] - requester name via tiered patterns
//! - [`amount::AmountResolver`] - goal amount via candidate scoring
//! - [`category::CategoryClassifier`] - need category via keyword scoring
//!   plus data-driven conflict resolution
//! - [`urgency::UrgencyAssessor`] - urgency level via an ordered rule table
//!
//! All resolvers are pure functions of the transcript text (plus explicit
//! context arguments); they hold compiled patterns only and share no
//! mutable state across invocations.

pub mod amount;
pub mod category;
pub mod matcher;
pub mod name;
pub mod numbers;
pub mod urgency;

pub use amount::{AmountResolver, ResolvedAmount};
pub use category::{CategoryClassifier, CategoryDecision};
pub use matcher::{PatternTier, TieredMatcher};
pub use name::{NameResolver, ResolvedName};
pub use urgency::{UrgencyAssessor, UrgencyDecision};

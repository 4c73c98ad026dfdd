//! Campaign intake extraction pipeline
//!
//! Wires the four resolvers into one orchestrator and applies the optional
//! strategy set with a uniform degrade-to-baseline rule: a failing strategy
//! is caught at its call site, logged, recorded in the debug trace, and the
//! built-in heuristic result stands.

pub mod orchestrator;
pub mod strategies;

pub use orchestrator::{IntakePipeline, StrategySet};
pub use strategies::{
    ConservativeDeescalator, DeadlineUrgencyStrategy, DependentCareEnhancer,
    RecurringBillEnhancer,
};

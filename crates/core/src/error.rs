use thiserror::Error;

/// Errors surfaced by the intake pipeline
#[derive(Error, Debug)]
pub enum IntakeError {
    /// The transcript was empty or otherwise unusable. The pipeline fails
    /// fast instead of returning a partially populated draft.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An optional strategy failed. Callers never see this directly; the
    /// orchestrator catches it at the call site and falls back to the
    /// built-in heuristic for that field.
    #[error("strategy `{strategy}` failed: {message}")]
    Strategy { strategy: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl IntakeError {
    /// Convenience constructor for strategy failures
    pub fn strategy(strategy: impl Into<String>, message: impl Into<String>) -> Self {
        IntakeError::Strategy {
            strategy: strategy.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, IntakeError>;

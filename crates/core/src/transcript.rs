//! Transcript input type
//!
//! A transcript is the immutable text of one spoken-style request for
//! financial help, plus optional metadata used only for reporting.

use serde::{Deserialize, Serialize};

/// Dataset difficulty tag, used by the scoring harness for breakdowns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
}

/// One transcribed request narrative. Never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Raw transcript text
    pub text: String,
    /// Optional case id for reporting
    #[serde(default)]
    pub id: Option<String>,
    /// Optional difficulty tag for reporting
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl Transcript {
    /// Create a transcript from bare text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            id: None,
            difficulty: None,
        }
    }

    /// Create a transcript with reporting metadata
    pub fn with_metadata(
        text: impl Into<String>,
        id: Option<String>,
        difficulty: Option<Difficulty>,
    ) -> Self {
        Self {
            text: text.into(),
            id,
            difficulty,
        }
    }

    /// True when the transcript carries no extractable text
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl From<&str> for Transcript {
    fn from(text: &str) -> Self {
        Transcript::new(text)
    }
}

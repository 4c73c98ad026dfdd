//! Configuration management for the campaign intake pipeline
//!
//! Supports loading configuration from:
//! - YAML files (`config/default.yaml`, `config/{env}.yaml`)
//! - Environment variables (`CAMPAIGN_INTAKE_` prefix, `__` separator)
//!
//! Strategy selection is a set of independent boolean switches read once at
//! startup into a [`PipelineConfig`] value object and passed into the
//! orchestrator; there is no ambient mutable state.

pub mod settings;

pub use settings::{
    load_settings, HarnessConfig, PipelineConfig, RuntimeEnvironment, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Strategy switches for one pipeline instance.
///
/// Each switch is boolean and independent; a switch left absent in config
/// means "use the built-in heuristic only" for that field. Category
/// enhancers run in the fixed order: dependent-care, recurring-bill.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Consult the deadline-scanning urgency strategy before the built-in
    /// cascade (falls back to the cascade on failure)
    #[serde(default)]
    pub alternate_urgency_strategy: bool,

    /// Enable the dependent-care category enhancer
    #[serde(default)]
    pub dependent_care_enhancer: bool,

    /// Enable the recurring-bill category enhancer
    #[serde(default)]
    pub recurring_bill_enhancer: bool,

    /// Enable the post-hoc urgency de-escalation pass
    #[serde(default)]
    pub urgency_deescalation: bool,
}

/// Batch scoring harness settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Concurrent extractions during a batch run
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,

    /// Amount tolerance in percent for expected-vs-extracted comparison
    #[serde(default = "default_amount_tolerance_pct")]
    pub amount_tolerance_pct: f64,

    /// Weighted score at or above which a case counts as passed
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: f32,
}

fn default_parallelism() -> usize {
    8
}

fn default_amount_tolerance_pct() -> f64 {
    2.0
}

fn default_pass_threshold() -> f32 {
    0.75
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
            amount_tolerance_pct: default_amount_tolerance_pct(),
            pass_threshold: default_pass_threshold(),
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub harness: HarnessConfig,
}

impl Settings {
    /// Validate settings after load
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.harness.parallelism == 0 {
            return Err(ConfigError::InvalidValue {
                field: "harness.parallelism".into(),
                message: "must be at least 1".into(),
            });
        }
        if !(0.0..=100.0).contains(&self.harness.amount_tolerance_pct) {
            return Err(ConfigError::InvalidValue {
                field: "harness.amount_tolerance_pct".into(),
                message: "must be within 0..=100".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.harness.pass_threshold) {
            return Err(ConfigError::InvalidValue {
                field: "harness.pass_threshold".into(),
                message: "must be within 0..=1".into(),
            });
        }
        Ok(())
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (CAMPAIGN_INTAKE_ prefix)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("CAMPAIGN_INTAKE")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    tracing::debug!(environment = ?settings.environment, "Settings loaded");
    Ok(settings)
}

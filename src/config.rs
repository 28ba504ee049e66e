//! Export configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! the behavior of a stock Dialogflow ES export.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ExportResult};

/// Top-level export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Maximum number of concrete utterances generated per template.
    #[serde(default = "default_permutation_limit")]
    pub permutation_limit: usize,
    /// Priority written into every converted intent.
    #[serde(default = "default_intent_priority")]
    pub intent_priority: u32,
    /// Agent-level settings written to `agent.json`.
    #[serde(default)]
    pub agent: AgentConfig,
    /// Extra builtin slot type mappings (`"VF.FOO" = "@sys.foo"`).
    ///
    /// Entries here take precedence over the built-in table.
    #[serde(default)]
    pub slot_types: IndexMap<String, String>,
}

/// Settings for the generated `agent.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
    #[serde(default = "default_ml_min_confidence")]
    pub ml_min_confidence: f64,
}

fn default_permutation_limit() -> usize {
    22
}
fn default_intent_priority() -> u32 {
    500_000
}
fn default_timezone() -> String {
    "America/New_York".into()
}
fn default_ml_min_confidence() -> f64 {
    0.3
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            default_timezone: default_timezone(),
            ml_min_confidence: default_ml_min_confidence(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            permutation_limit: default_permutation_limit(),
            intent_priority: default_intent_priority(),
            agent: AgentConfig::default(),
            slot_types: IndexMap::new(),
        }
    }
}

impl ExportConfig {
    /// Load and validate a config from a TOML file.
    pub fn load(path: &Path) -> ExportResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(content: &str) -> ExportResult<Self> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, origin: &str) -> ExportResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ExportResult<()> {
        if self.permutation_limit == 0 {
            return Err(ConfigError::Invalid {
                message: "permutation_limit must be at least 1".into(),
            }
            .into());
        }
        if !(0.0..=1.0).contains(&self.agent.ml_min_confidence) {
            return Err(ConfigError::Invalid {
                message: format!(
                    "agent.ml_min_confidence must be within 0.0..=1.0, got {}",
                    self.agent.ml_min_confidence
                ),
            }
            .into());
        }
        for (source, target) in &self.slot_types {
            if !target.starts_with('@') {
                return Err(ConfigError::Invalid {
                    message: format!(
                        "slot type mapping for {source} must start with '@', got {target:?}"
                    ),
                }
                .into());
            }
        }
        Ok(())
    }
}

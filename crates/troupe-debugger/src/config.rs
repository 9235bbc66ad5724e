//! Debugger configuration.
//!
//! Loaded from the adapter's TOML settings block; every field has a default
//! so an absent block configures a working engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths::OS_CASE_INSENSITIVE;

fn default_max_value_length() -> usize {
    256
}

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DebuggerConfig {
    /// Upper bound, in characters, on rendered variable values.
    #[serde(default = "default_max_value_length")]
    pub max_value_length: usize,

    /// Override of the platform case rule used by path normalization.
    /// `None` follows the OS default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_insensitive_paths: Option<bool>,
}

impl Default for DebuggerConfig {
    fn default() -> Self {
        Self {
            max_value_length: default_max_value_length(),
            case_insensitive_paths: None,
        }
    }
}

impl DebuggerConfig {
    /// Parse a configuration from a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// The effective case rule for path normalization.
    pub fn fold_case(&self) -> bool {
        self.case_insensitive_paths.unwrap_or(OS_CASE_INSENSITIVE)
    }
}

/// Configuration loading failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid debugger configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

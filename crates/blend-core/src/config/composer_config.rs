use crate::error::BlendError;
use crate::result::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Settings of a [`Composer`](crate::Composer)
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ComposerConfig {
    /// Validate definitions and report diagnostics
    #[schemars(description = "Validate definitions and report misuse as diagnostics")]
    pub debug_checks: bool,

    /// Drop diagnostics that have no warn handler instead of logging them
    #[schemars(description = "Suppress logging of diagnostics")]
    pub silent: bool,

    /// Report asset lookups that find nothing
    #[schemars(description = "Report component, directive and filter lookups that fail")]
    pub warn_missing_assets: bool,

    /// Host-reserved names components may not use (compared ignoring case)
    #[schemars(description = "Names that may not be used as component names")]
    pub reserved_names: Vec<String>,

    /// Extra fields merged as lifecycle hooks
    #[schemars(description = "Additional fields merged as lifecycle hook sequences")]
    pub hook_names: Vec<String>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            debug_checks: cfg!(debug_assertions),
            silent: false,
            warn_missing_assets: true,
            reserved_names: Vec::new(),
            hook_names: Vec::new(),
        }
    }
}

impl ComposerConfig {
    /// Configuration with every debug check disabled
    pub fn production() -> Self {
        Self {
            debug_checks: false,
            silent: true,
            warn_missing_assets: false,
            ..Self::default()
        }
    }

    /// Load configuration from a JSON, YAML or TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| BlendError::io_error(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());

        let config = match ext {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| BlendError::config_error(format!("{}: {}", path.display(), e)))?,
            Some("json") => Self::from_json_str(&content)
                .map_err(|e| BlendError::config_error(format!("{}: {}", path.display(), e)))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| BlendError::config_error(format!("{}: {}", path.display(), e)))?,
            _ => {
                return Err(BlendError::config_error(format!(
                    "Unsupported file extension for {} (expected .json, .yaml, .yml or .toml)",
                    path.display()
                )));
            }
        };

        debug!("Loaded composer config from {}", path.display());
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    /// JSON Schema describing the configuration file
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(ComposerConfig);
        serde_json::to_value(schema).unwrap_or_default()
    }
}

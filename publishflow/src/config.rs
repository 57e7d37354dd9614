//! Pipeline configuration.
//!
//! Loaded from a TOML file; every field falls back to its default.
//!
//! ```toml
//! hooks_dir = "hooks"
//! definition_extension = "toml"
//!
//! [logging]
//! level = "debug"
//! logger = "pipeline"
//! format = "text"
//! ```

use crate::errors::PublishError;
use crate::observability::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration of hook discovery and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Name of the hook area under a package root.
    #[serde(default = "default_hooks_dir")]
    pub hooks_dir: String,
    /// Extension of definition files, without the dot.
    #[serde(default = "default_definition_extension")]
    pub definition_extension: String,
    /// Logging settings.
    #[serde(default)]
    pub logging: LogConfig,
}

fn default_hooks_dir() -> String {
    "hooks".to_string()
}

fn default_definition_extension() -> String {
    "toml".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            hooks_dir: default_hooks_dir(),
            definition_extension: default_definition_extension(),
            logging: LogConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hooks directory name.
    #[must_use]
    pub fn with_hooks_dir(mut self, hooks_dir: impl Into<String>) -> Self {
        self.hooks_dir = hooks_dir.into();
        self
    }

    /// Sets the definition file extension.
    #[must_use]
    pub fn with_definition_extension(mut self, ext: impl Into<String>) -> Self {
        self.definition_extension = ext.into();
        self
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self, PublishError> {
        let config: Self =
            toml::from_str(raw).map_err(|e| PublishError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PublishError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            PublishError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), PublishError> {
        if self.hooks_dir.trim().is_empty() {
            return Err(PublishError::Config("hooks_dir must not be empty".to_string()));
        }
        if self.definition_extension.is_empty() || self.definition_extension.starts_with('.') {
            return Err(PublishError::Config(format!(
                "definition_extension must be a bare extension, got '{}'",
                self.definition_extension
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::LogFormat;

    #[test]
    fn test_config_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.hooks_dir, "hooks");
        assert_eq!(config.definition_extension, "toml");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.logger, "pipeline");
    }

    #[test]
    fn test_config_partial_toml() {
        let config = PipelineConfig::from_toml_str(
            r#"
            hooks_dir = "publish_hooks"

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.hooks_dir, "publish_hooks");
        assert_eq!(config.definition_extension, "toml");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.logger, "pipeline");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_config_rejects_dotted_extension() {
        let err = PipelineConfig::from_toml_str("definition_extension = \".toml\"").unwrap_err();
        assert!(matches!(err, PublishError::Config(_)));
    }

    #[test]
    fn test_config_rejects_bad_toml() {
        assert!(PipelineConfig::from_toml_str("hooks_dir = [").is_err());
    }

    #[test]
    fn test_config_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("publishflow.toml");
        std::fs::write(&path, "definition_extension = \"hook\"\n").unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.definition_extension, "hook");

        assert!(PipelineConfig::load(dir.path().join("missing.toml")).is_err());
    }
}

//! Project configuration read from `bytesnap.toml`.

use crate::error::CodegenError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MAX_MESSAGE_SIZE: u64 = 65536;

/// Settings that travel into the generated header. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub project: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub max_message_size: u64,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            project: String::new(),
            version: "0.1.0".to_string(),
            description: String::new(),
            author: String::new(),
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl ProjectConfig {
    /// Defaults with the given project name.
    pub fn named(project: impl Into<String>) -> Self {
        ProjectConfig {
            project: project.into(),
            ..ProjectConfig::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, CodegenError> {
        let config: ProjectConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file. An empty `project` is filled from
    /// `fallback_project`.
    pub fn load(path: &Path, fallback_project: &str) -> Result<Self, CodegenError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CodegenError::Io(format!("cannot read {}: {}", path.display(), e)))?;
        let mut config: ProjectConfig = toml::from_str(&text)
            .map_err(|e| CodegenError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        if config.project.is_empty() {
            config.project = fallback_project.to_string();
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CodegenError> {
        if self.max_message_size == 0 {
            return Err(CodegenError::InvalidConfig(
                "max_message_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

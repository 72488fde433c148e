//! Session configuration loaded from YAML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tk_data::StepDetectConfig;
use tk_ident::IdentifyConfig;
use tk_sim::SimConfig;

use crate::error::{AppError, AppResult};

/// All pipeline tunables. Every field is optional in the YAML file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub step: StepDetectConfig,
    pub identify: IdentifyConfig,
    pub simulate: SimConfig,
}

impl SessionConfig {
    /// Load configuration from a YAML file.
    pub fn load_yaml(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {}", e)))
    }

    pub fn to_yaml_string(&self) -> AppResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))
    }
}

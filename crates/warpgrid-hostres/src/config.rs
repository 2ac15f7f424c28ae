//! Host resource configuration parser.
//!
//! ```toml
//! [[resource_set]]
//! name = "eni"
//! slots = 4
//! sub_resources = 8
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HostResError, HostResResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostResourceConfig {
    #[serde(default, rename = "resource_set")]
    pub resource_sets: Vec<ResourceSetConfig>,
}

/// One resource family on the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSetConfig {
    /// Family name tasks use to address this resource.
    pub name: String,
    /// Number of bindable slots.
    pub slots: usize,
    /// Sub-resource capacity of each slot once bound.
    #[serde(default)]
    pub sub_resources: u32,
}

impl HostResourceConfig {
    pub fn from_file(path: &Path) -> HostResResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate.
    pub fn from_toml_str(content: &str) -> HostResResult<Self> {
        let config: HostResourceConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> HostResResult<()> {
        let mut seen = HashSet::new();
        for set in &self.resource_sets {
            if set.name.trim().is_empty() {
                return Err(HostResError::InvalidConfig(
                    "resource set name must not be empty".to_string(),
                ));
            }
            if set.slots == 0 {
                return Err(HostResError::InvalidConfig(format!(
                    "resource set {} must have at least one slot",
                    set.name
                )));
            }
            if !seen.insert(set.name.as_str()) {
                return Err(HostResError::InvalidConfig(format!(
                    "duplicate resource set: {}",
                    set.name
                )));
            }
        }
        Ok(())
    }
}

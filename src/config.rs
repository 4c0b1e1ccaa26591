//! Tool configuration
//!
//! Optional YAML file; every field has a default so an empty or missing file
//! is valid.
//!
//! ```yaml
//! store_path: .t2l/store.json
//! brand: toyota
//! weight: "1000"
//! default_hs_code: "87032319"
//! chunk_size: 99
//! ```

use crate::error::T2lResult;
use crate::excel::DEFAULT_CHUNK_SIZE;
use crate::types::{Brand, DEFAULT_HS_CODE, DEFAULT_WEIGHT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// JSON file holding mappings, HS overrides and preferences
    pub store_path: PathBuf,
    pub brand: Brand,
    /// Placeholder weight printed on G3 lines
    pub weight: String,
    pub default_hs_code: String,
    /// Vehicles per HS sheet in the attached list
    pub chunk_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(".t2l/store.json"),
            brand: Brand::default(),
            weight: DEFAULT_WEIGHT.to_string(),
            default_hs_code: DEFAULT_HS_CODE.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl AppConfig {
    pub fn from_yaml(content: &str) -> T2lResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read `path` if given. A given path must exist.
    pub fn load(path: Option<&Path>) -> T2lResult<Self> {
        match path {
            Some(path) => {
                let content = fs::read_to_string(path)?;
                let config = Self::from_yaml(&content)?;
                debug!(path = %path.display(), ?config, "config loaded");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}

//! Image picker configuration

use crate::error::Result;
use crate::source::{ContentTypeId, ImageSourceConfig};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Serializable part of the dialog settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PickerConfig {
    /// Backends the user may pick from
    pub content_type_ids: Vec<ContentTypeId>,
    pub image_source_config: Option<ImageSourceConfig>,
    /// Size constraints forwarded verbatim to the search backend
    pub dimensions: Option<Value>,
    pub search_on_display: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            content_type_ids: vec![ContentTypeId::PICTO, ContentTypeId::GHT1T],
            image_source_config: None,
            dimensions: None,
            search_on_display: false,
        }
    }
}

impl PickerConfig {
    /// Load from the default location, or defaults when no file exists
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`, or defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config = Self::from_toml_str(&content)?;
            tracing::info!("Configuration loaded from {:?}", path);
            Ok(config)
        } else {
            tracing::info!("Using default configuration");
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("com", "ImagePicker", "ImagePicker")
            .map(|dirs| dirs.config_dir().join("picker.toml"))
            .unwrap_or_else(|| PathBuf::from("./picker.toml"))
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::Role;

/// Extraction settings for ebdx
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Role codes accepted after a role announcement
    pub roles: Vec<Role>,

    /// Rows skipped at the top of every EBD table (role line and legend)
    pub header_rows: usize,

    /// Bytes past the role announcement searched for the record identifier
    pub identifier_slack: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        ExtractorConfig {
            roles: Role::ALL.to_vec(),
            header_rows: 2,
            identifier_slack: 32,
        }
    }
}

impl ExtractorConfig {
    /// Load config from the config directory, falling back to defaults
    pub fn load() -> Result<Self> {
        if let Some(config_path) = Self::get_config_path() {
            if config_path.exists() {
                return Self::load_from(&config_path);
            }
        }

        Ok(ExtractorConfig::default())
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: ExtractorConfig = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Save config to the config directory
    pub fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::get_config_path() {
            self.save_to(&config_path)?;
        }

        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ebdx").join("config.toml"))
    }

    /// Initialize default config file
    pub fn init_default() -> Result<()> {
        let config = ExtractorConfig::default();
        config.save()?;
        Ok(())
    }
}

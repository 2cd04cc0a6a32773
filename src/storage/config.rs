//! Configuration handling for Larder
//!
//! Configuration is stored in `.larder/config.toml` (household) and
//! `~/.config/larder/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{HomeId, Unit};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Household-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HouseholdConfig {
    /// Home used when `--home` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_home: Option<HomeId>,

    /// Unit assumed when a command doesn't name one
    pub default_unit: Unit,
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + household)
#[derive(Debug, Clone)]
pub struct Config {
    pub household: HouseholdConfig,
    pub global: GlobalConfig,
    pub root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration for a specific household
    pub fn for_household(root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let household = Self::load_household_config(root)?;

        Ok(Self {
            household,
            global,
            root: Some(root.to_path_buf()),
        })
    }

    /// Loads only the global configuration
    pub fn global_only() -> Result<Self> {
        Ok(Self {
            household: HouseholdConfig::default(),
            global: Self::load_global()?,
            root: None,
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "larder", "larder").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads household configuration from a specific root
    fn load_household_config(root: &Path) -> Result<HouseholdConfig> {
        let config_path = Self::household_config_path(root);

        if !config_path.exists() {
            return Ok(HouseholdConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read household config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse household config")
    }

    fn household_config_path(root: &Path) -> PathBuf {
        root.join(".larder").join("config.toml")
    }

    /// Finds the household root by looking for a `.larder/` directory
    pub fn find_household_root() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            if current.join(".larder").is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Returns the household root, or an error if not in a household
    pub fn require_root(&self) -> Result<&Path> {
        self.root
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Not in a larder household. Run 'larder init' first."))
    }

    /// Saves the household configuration
    pub fn save_household(&self) -> Result<()> {
        let root = self.require_root()?;
        let config_path = Self::household_config_path(root);

        let content = toml::to_string_pretty(&self.household)
            .context("Failed to serialize household config")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write household config: {}", config_path.display()))
    }
}

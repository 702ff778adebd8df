use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::city::City;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_city = "Austin"
/// model_dir = "/srv/models"
/// cache_models = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// City preselected in the form, e.g. "Bengaluru" or "Austin".
    pub default_city: Option<String>,

    /// Directory holding `Classifier<City>.model` files. Working directory when unset.
    pub model_dir: Option<PathBuf>,

    /// Keep loaded models between submissions of one session.
    #[serde(default)]
    pub cache_models: bool,
}

impl Config {
    /// Return the default city as a strongly-typed City, Bengaluru when unset.
    pub fn default_city_id(&self) -> Result<City> {
        match self.default_city.as_deref() {
            None => Ok(City::default()),
            Some(s) => City::try_from(s).map_err(|e| {
                anyhow!(
                    "{e}\n\
                     Hint: run `forecast configure` to pick a supported default city."
                )
            }),
        }
    }

    pub fn set_default_city(&mut self, city: City) {
        self.default_city = Some(city.as_str().to_string());
    }

    pub fn model_dir(&self) -> PathBuf {
        self.model_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-forecast", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

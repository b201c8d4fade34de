use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    catalog::LocalityGroup,
    forecast::{DEFAULT_MAX_DAYS, DEFAULT_REFERENCE_HOUR, ForecastSettings, SelectionPolicy},
    model::Units,
    provider::openweather::DEFAULT_BASE_URL,
};

/// Environment variable that takes precedence over the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "metric"
/// city_files = ["worldcities.csv"]
/// selection = "exact_hour"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub units: Units,
    pub base_url: String,

    /// CSV files with `city` and `country` columns.
    pub city_files: Vec<PathBuf>,

    /// Label preselected in the location picker.
    pub default_location: String,

    pub reference_hour: u32,
    pub forecast_days: usize,
    pub selection: SelectionPolicy,
    pub localities: Vec<LocalityGroup>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            units: Units::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            city_files: vec![PathBuf::from("worldcities.csv")],
            default_location: "Delhi, India".to_string(),
            reference_hour: DEFAULT_REFERENCE_HOUR,
            forecast_days: DEFAULT_MAX_DAYS,
            selection: SelectionPolicy::default(),
            localities: vec![LocalityGroup::bangalore()],
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()?;
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
        let dirs = ProjectDirs::from("dev", "weather-wizard", "weather-wizard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.reference_hour > 23 {
            return Err(anyhow!(
                "reference_hour must be between 0 and 23, got {}",
                self.reference_hour
            ));
        }
        if self.forecast_days == 0 {
            return Err(anyhow!("forecast_days must be at least 1"));
        }
        Ok(())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        let trimmed = api_key.trim();
        self.api_key = if trimmed.is_empty() { None } else { Some(trimmed.to_string()) };
    }

    /// API key from the environment, falling back to the stored one.
    pub fn api_key(&self) -> Option<String> {
        self.resolve_api_key(std::env::var(API_KEY_ENV).ok())
    }

    fn resolve_api_key(&self, from_env: Option<String>) -> Option<String> {
        from_env
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }

    pub fn forecast_settings(&self) -> ForecastSettings {
        ForecastSettings {
            reference_hour: self.reference_hour,
            max_days: self.forecast_days,
            policy: self.selection,
        }
    }
}

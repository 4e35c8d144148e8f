use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Environment variable overriding `[weather].api_key`.
pub const WEATHER_API_KEY_ENV: &str = "CLIMA_WEATHER_API_KEY";
/// Environment variable overriding `[geocoding].api_key`.
pub const GEOCODING_API_KEY_ENV: &str = "CLIMA_GEOCODING_API_KEY";

/// Credentials and endpoint for one HTTP provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Sent as-is. An empty key is not rejected here; the provider answers
    /// with an invalid-key status instead.
    pub api_key: String,

    /// Overrides the provider's public endpoint, e.g. for a local mock.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Which location capability to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSourceKind {
    /// Approximate position from the public IP address.
    #[default]
    Ip,
    /// Position from `latitude`/`longitude` below.
    Fixed,
    /// No location capability at all.
    None,
}

impl LocationSourceKind {
    pub const fn all() -> &'static [LocationSourceKind] {
        &[LocationSourceKind::Ip, LocationSourceKind::Fixed, LocationSourceKind::None]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LocationSourceKind::Ip => "ip",
            LocationSourceKind::Fixed => "fixed",
            LocationSourceKind::None => "none",
        }
    }
}

impl std::fmt::Display for LocationSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub source: LocationSourceKind,

    /// When false the user has refused location access.
    pub allowed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self { source: LocationSourceKind::default(), allowed: true, latitude: None, longitude: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// IANA zone used for observation timestamps.
    pub timezone: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { timezone: "America/Sao_Paulo".to_string() }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [weather]
/// api_key = "..."
///
/// [geocoding]
/// api_key = "..."
///
/// [location]
/// source = "fixed"
/// latitude = -23.5
/// longitude = -47.4
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub weather: ProviderConfig,
    pub geocoding: ProviderConfig,
    pub location: LocationConfig,
    pub display: DisplayConfig,
}

impl Config {
    /// Load config from the platform config file plus environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_overrides(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    /// Load config from `path`, or return an empty default if it doesn't exist yet.
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

    /// Save config to the platform config file.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
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
        let dirs = ProjectDirs::from("dev", "clima", "clima")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Replace API keys with values from `lookup` where it has one.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(WEATHER_API_KEY_ENV) {
            self.weather.api_key = key;
        }
        if let Some(key) = lookup(GEOCODING_API_KEY_ENV) {
            self.geocoding.api_key = key;
        }
    }

    pub fn is_weather_configured(&self) -> bool {
        !self.weather.api_key.is_empty()
    }

    pub fn is_geocoding_configured(&self) -> bool {
        !self.geocoding.api_key.is_empty()
    }
}

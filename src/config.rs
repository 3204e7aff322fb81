use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_API_URL, DEFAULT_LOG_FILE, DEFAULT_PAGE_LIMIT,
    DEFAULT_TIMEOUT_SECS,
};

/// User configuration, read from `~/.coursedeck/config.yaml`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the course API
    pub api_url: String,
    /// Courses per page in paginated lists
    pub page_limit: u32,
    pub timeout_secs: u64,
    pub log_file: PathBuf,
    /// One of trace, debug, info, warn, error
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: String::from(DEFAULT_API_URL),
            page_limit: DEFAULT_PAGE_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: String::from("info"),
        }
    }
}

impl Config {
    /// Directory holding the config file
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
    }

    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_dir().join(CONFIG_FILE_NAME);
        let mut config = Self::load_from(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Write the config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Write the defaults to `path` unless a file is already there.
    ///
    /// Returns whether a file was written. Environment overrides are never
    /// persisted.
    pub fn write_default_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        Config::default().save_to(path)?;
        Ok(true)
    }

    /// Apply `COURSEDECK_*` overrides looked up through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("COURSEDECK_API_URL") {
            self.api_url = url;
        }
        if let Some(limit) = lookup("COURSEDECK_PAGE_LIMIT") {
            self.page_limit = limit
                .trim()
                .parse()
                .with_context(|| format!("COURSEDECK_PAGE_LIMIT is not a number: {limit}"))?;
        }
        if let Some(log) = lookup("COURSEDECK_LOG") {
            self.log_file = PathBuf::from(log);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.api_url)
            .with_context(|| format!("api_url is not a valid URL: {}", self.api_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("api_url must use http or https: {}", self.api_url);
        }
        if self.page_limit == 0 {
            bail!("page_limit must be at least 1");
        }
        Ok(())
    }

    /// Parsed log level, defaulting to INFO for unknown values
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

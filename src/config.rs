//! Runtime configuration: defaults, optional YAML file, environment overrides

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    CONFIG_DIR, CONFIG_FILE, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, ENV_BASE_URL, ENV_TIMEOUT,
};
use crate::error::ConfigError;

/// Resolved configuration
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Backend origin, without trailing slash
    pub base_url: reqwest::Url,
    pub timeout: Duration,
}

/// On-disk shape; every field optional
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: parse_base_url(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid http origin"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load from `~/.cheery-admin/config.yaml` and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = default_path();
        Self::from_sources(path.as_deref(), |key| std::env::var(key).ok())
    }

    /// Layer defaults, then the file at `path` (if it exists), then `env`
    pub fn from_sources<F>(path: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match path {
            Some(p) if p.exists() => read_file(p)?,
            _ => ConfigFile::default(),
        };

        let base_url = env(ENV_BASE_URL)
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match env(ENV_TIMEOUT) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::Timeout(raw))?,
            None => match file.timeout_secs {
                Some(0) => return Err(ConfigError::Timeout("0".to_string())),
                Some(secs) => secs,
                None => DEFAULT_TIMEOUT_SECS,
            },
        };

        Ok(Config {
            base_url: parse_base_url(&base_url)?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
}

fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: display.clone(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: display,
        source,
    })
}

/// Accept only absolute http(s) origins; any path on the URL is dropped
fn parse_base_url(raw: &str) -> Result<reqwest::Url, ConfigError> {
    let mut url = reqwest::Url::parse(raw.trim()).map_err(|_| ConfigError::BaseUrl(raw.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ConfigError::BaseUrl(raw.to_string()));
    }
    url.set_path("/");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

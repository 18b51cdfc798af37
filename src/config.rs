//! Console configuration.
//!
//! Configuration is stored in `.catalog/config.yaml` (or the per-user config
//! directory when no local file exists) and includes:
//! - The base URL of the catalog REST API
//! - The admin access token
//! - Request timeout, default page size and search debounce delay

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::list::pagination::PAGE_SIZE_OPTIONS;
use crate::paths::{catalog_root, user_config_dir};

const CONFIG_FILE: &str = "config.yaml";

/// Keys accepted by `catalog config get/set`.
pub const CONFIG_KEYS: [&str; 5] = [
    "api_url",
    "auth.token",
    "timeout",
    "page_size",
    "search_debounce_ms",
];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the catalog REST API, e.g. `https://api.catalog.test/api/v1`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default)]
    pub auth: AuthConfig,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Rows per page for list views (default: 10)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Delay before a search box edit reaches the backend (default: 500)
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> u32 {
    10
}

fn default_search_debounce_ms() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            auth: AuthConfig::default(),
            timeout: default_timeout(),
            page_size: default_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

/// Authentication configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Config {
    /// Path of the project-local config file.
    pub fn local_path() -> PathBuf {
        catalog_root().join(CONFIG_FILE)
    }

    /// Path the config is read from and written to.
    ///
    /// The local file wins when it exists or when `CATALOG_ROOT` points
    /// somewhere explicitly; otherwise the per-user config directory is used.
    pub fn config_path() -> PathBuf {
        let local = Self::local_path();
        if local.exists() || env::var_os("CATALOG_ROOT").is_some() {
            return local;
        }
        user_config_dir()
            .map(|dir| dir.join(CONFIG_FILE))
            .unwrap_or(local)
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            CatalogError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CatalogError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content).map_err(|e| {
            CatalogError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        // The file holds an access token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(path, permissions)?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !PAGE_SIZE_OPTIONS.contains(&self.page_size) {
            return Err(CatalogError::InvalidPageSize(self.page_size));
        }
        Ok(())
    }

    /// API base URL from `CATALOG_API_URL` or the config file
    pub fn api_url(&self) -> Option<String> {
        if let Ok(url) = env::var("CATALOG_API_URL")
            && !url.is_empty()
        {
            return Some(url);
        }
        self.api_url.clone()
    }

    /// Access token from `CATALOG_TOKEN` or the config file
    pub fn token(&self) -> Option<String> {
        if let Ok(token) = env::var("CATALOG_TOKEN")
            && !token.is_empty()
        {
            return Some(token);
        }
        self.auth.token.clone()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Read a single key as displayed by `config get`. The token is masked.
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "api_url" => self.api_url.clone().unwrap_or_default(),
            "auth.token" => self
                .auth
                .token
                .as_ref()
                .map(|_| "[REDACTED]".to_string())
                .unwrap_or_default(),
            "timeout" => self.timeout.to_string(),
            "page_size" => self.page_size.to_string(),
            "search_debounce_ms" => self.search_debounce_ms.to_string(),
            other => return Err(unknown_key(other)),
        };
        Ok(value)
    }

    /// Update a single key from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_url" => {
                let parsed = url::Url::parse(value).map_err(|e| CatalogError::InvalidArgument {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
                self.api_url = Some(parsed.as_str().trim_end_matches('/').to_string());
            }
            "auth.token" => {
                self.auth.token = (!value.is_empty()).then(|| value.to_string());
            }
            "timeout" => self.timeout = parse_number(key, value)?,
            "page_size" => {
                let size: u32 = parse_number(key, value)?;
                if !PAGE_SIZE_OPTIONS.contains(&size) {
                    return Err(CatalogError::InvalidPageSize(size));
                }
                self.page_size = size;
            }
            "search_debounce_ms" => self.search_debounce_ms = parse_number(key, value)?,
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| CatalogError::InvalidArgument {
            key: key.to_string(),
            message: e.to_string(),
        })
}

fn unknown_key(key: &str) -> CatalogError {
    CatalogError::Config(format!(
        "unknown key '{key}', expected one of: {}",
        CONFIG_KEYS.join(", ")
    ))
}

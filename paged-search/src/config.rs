//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: PAGED_SEARCH_, nested keys separated by `__`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/paged-search/{service_name}/config.toml
//! 4. System directory: /etc/paged-search/{service_name}/config.toml
//! 5. Default values
//!
//! ```toml
//! [service]
//! name = "member-search"
//! log_level = "debug"
//!
//! [search]
//! default_page_size = 20
//! max_page_size = 500
//! default_strategy = "split"
//! concurrent_count = false
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::page::CountStrategy;

const ENV_PREFIX: &str = "PAGED_SEARCH_";
const XDG_PREFIX: &str = "paged-search";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Search execution configuration
    #[serde(default)]
    pub search: SearchConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Log level (trace, debug, info, warn, error) or a full filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Paged search configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Page size used when the caller does not pick one
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,

    /// Largest page size a caller may request; unlimited when unset
    #[serde(default)]
    pub max_page_size: Option<u64>,

    /// Count strategy used when the caller does not pick one
    #[serde(default)]
    pub default_strategy: CountStrategy,

    /// Issue the data fetch and the count concurrently under the split
    /// strategy. Disables skipping the count.
    #[serde(default = "default_false")]
    pub concurrent_count: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: None,
            default_strategy: CountStrategy::default(),
            concurrent_count: default_false(),
        }
    }
}

impl SearchConfig {
    fn validate(&self) -> Result<()> {
        if self.default_page_size == 0 {
            return Err(
                figment::Error::from("search.default_page_size must be greater than zero").into(),
            );
        }
        if let Some(max) = self.max_page_size {
            if self.default_page_size > max {
                return Err(figment::Error::from(format!(
                    "search.default_page_size ({}) exceeds search.max_page_size ({})",
                    self.default_page_size, max
                ))
                .into());
            }
        }
        Ok(())
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_page_size() -> u64 {
    20
}

fn default_false() -> bool {
    false
}

impl Config {
    /// Load configuration from all sources
    ///
    /// Searches for config files in this order (first found wins):
    /// 1. Current working directory: ./config.toml
    /// 2. XDG config directory: ~/.config/paged-search/{service_name}/config.toml
    /// 3. System directory: /etc/paged-search/{service_name}/config.toml
    ///
    /// Environment variables (PAGED_SEARCH_ prefix) override all file-based configs.
    pub fn load() -> Result<Self> {
        let service_name = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| XDG_PREFIX.to_string());

        Self::load_for_service(&service_name)
    }

    /// Load configuration for a specific service name
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::named(service_name)));

        // Lowest priority first so higher priority files override
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.search.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Bypasses the XDG and system directories. Environment variables still
    /// override the file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        config.search.validate()?;
        Ok(config)
    }

    /// Find all possible config file paths for a service
    ///
    /// Returns paths in priority order (highest first).
    fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(XDG_PREFIX);
        let config_file_path = Path::new(service_name).join("config.toml");
        if let Some(path) = xdg_dirs.find_config_file(&config_file_path) {
            paths.push(path);
        }

        paths.push(
            PathBuf::from("/etc")
                .join(XDG_PREFIX)
                .join(service_name)
                .join("config.toml"),
        );

        paths
    }

    fn named(service_name: &str) -> Self {
        let mut config = Self::default();
        config.service.name = service_name.to_string();
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: XDG_PREFIX.to_string(),
                log_level: default_log_level(),
            },
            search: SearchConfig::default(),
        }
    }
}

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Overrides `api.base_url` when set, so a local service instance can be
/// pointed at without editing the config file.
const API_URL_ENV: &str = "HOSTELBITE_API_URL";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_request_timeout() -> u64 {
    10_000
}

#[derive(Debug, Deserialize, Clone)]
pub struct ListingConfig {
    /// Items per fetched page. The service caps listing pages at 6 for the
    /// public browse view, so that is the shipped default.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    6
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    /// How close to the bottom of the list the selection may get before the
    /// next page is requested.
    #[serde(default = "default_scroll_prefetch")]
    pub scroll_prefetch: usize,
}

fn default_scroll_prefetch() -> usize {
    3
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            scroll_prefetch: default_scroll_prefetch(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config TOML")?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.is_empty() {
                config.api.base_url = url;
            }
        }
        if config.listing.page_size == 0 {
            anyhow::bail!("listing.page_size must be at least 1");
        }
        Ok(config)
    }
}

//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ota::OtaDefaults;
use crate::profile::settings::default_update_resource;

/// Root configuration for the tool.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Where object templates come from.
    pub catalog: CatalogConfig,

    /// Default OTA resource URLs.
    pub ota: OtaConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,

    /// Document file watching.
    pub watch: WatchConfig,
}

/// Catalog backend selector.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    /// JSON array of templates on disk.
    #[default]
    File,
    /// Remote catalog service.
    Http,
}

/// Catalog configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub source: CatalogSource,

    /// Template file used by the file source.
    pub path: String,

    /// Base URL of the catalog service used by the http source.
    pub base_url: String,

    /// Bearer token sent as `X-Authorization`. Empty means none.
    pub api_token: String,

    /// Upper bound for a single template fetch.
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: CatalogSource::File,
            path: "catalog.json".to_string(),
            base_url: "http://localhost:8080".to_string(),
            api_token: String::new(),
            timeout_secs: 10,
        }
    }
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn token(&self) -> Option<&str> {
        let token = self.api_token.trim();
        (!token.is_empty()).then_some(token)
    }
}

/// URLs seeded into a pull-strategy channel that has none.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OtaConfig {
    pub firmware_resource_url: String,
    pub software_resource_url: String,
}

impl Default for OtaConfig {
    fn default() -> Self {
        Self {
            firmware_resource_url: default_update_resource(),
            software_resource_url: default_update_resource(),
        }
    }
}

impl OtaConfig {
    pub fn defaults(&self) -> OtaDefaults {
        OtaDefaults {
            firmware_resource_url: self.firmware_resource_url.clone(),
            software_resource_url: self.software_resource_url.clone(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Record counters and gauges.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}

/// Document watcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Scan the file on a timer instead of using OS change events.
    /// Needed on network mounts and some container volumes.
    pub poll: bool,
    /// Scan interval. Only used when `poll` is set.
    pub poll_interval_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll: false,
            poll_interval_secs: 2,
        }
    }
}

impl WatchConfig {
    /// The scan interval when polling, `None` for event-driven watching.
    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll.then(|| Duration::from_secs(self.poll_interval_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.catalog.source, CatalogSource::File);
        assert_eq!(config.catalog.timeout_secs, 10);
        assert_eq!(config.ota.firmware_resource_url, "coap://localhost:5685");
        assert_eq!(config.observability.log_level, "info");
        assert_eq!(config.watch.poll_interval_secs, 2);
        assert_eq!(config.watch.poll_interval(), None);
    }

    #[test]
    fn test_poll_interval_only_when_polling() {
        let config: AppConfig = toml::from_str(
            r#"
            [watch]
            poll = true
            poll_interval_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.watch.poll_interval(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_partial_section() {
        let config: AppConfig = toml::from_str(
            r#"
            [catalog]
            source = "http"
            api_token = "abc"
            "#,
        )
        .unwrap();
        assert_eq!(config.catalog.source, CatalogSource::Http);
        assert_eq!(config.catalog.token(), Some("abc"));
        assert_eq!(config.catalog.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_blank_token_is_none() {
        let config = CatalogConfig {
            api_token: "  ".into(),
            ..CatalogConfig::default()
        };
        assert_eq!(config.token(), None);
    }
}

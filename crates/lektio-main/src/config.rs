// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of Lektio.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SDUI account configuration
    pub sdui: SduiConfig,

    /// System configuration
    #[serde(default)]
    pub system: SystemConfig,
}

/// SDUI account configuration
///
/// Token and user id are taken as-is; their correctness is only discovered on
/// the first fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SduiConfig {
    /// SDUI API bearer token
    pub token: String,

    /// SDUI user id whose timetable is polled
    pub user_id: String,

    /// SDUI API base URL (override for tests/proxies)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Friendly name of the published sensor entity
    #[serde(default = "default_sensor_name")]
    pub sensor_name: String,
}

/// System configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Update interval (seconds)
    pub update_interval_secs: u64,

    /// Log level (debug, info, warn, error)
    pub log_level: String,

    /// Home Assistant base URL (optional, defaults to supervisor)
    pub ha_base_url: Option<String>,

    /// Home Assistant token (optional, uses SUPERVISOR_TOKEN if not set)
    pub ha_token: Option<String>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            update_interval_secs: default_update_interval(),
            log_level: "info".to_string(),
            ha_base_url: None,
            ha_token: None,
        }
    }
}

fn default_base_url() -> String {
    lektio_sdui::DEFAULT_BASE_URL.to_string()
}

fn default_sensor_name() -> String {
    "SDUI Timetable".to_string()
}

fn default_update_interval() -> u64 {
    300
}

impl AppConfig {
    /// Load configuration from HA addon options or config file
    pub fn load() -> Result<Self> {
        // Try HA addon options first (/data/options.json)
        if let Ok(options_str) = std::fs::read_to_string("/data/options.json") {
            let config: AppConfig =
                serde_json::from_str(&options_str).context("Failed to parse HA addon options")?;
            info!("✅ Loaded configuration from HA addon options");
            config.validate()?;
            return Ok(config);
        }

        // Try config.toml for development
        if let Ok(config_str) = std::fs::read_to_string("config.toml") {
            let config: AppConfig =
                toml::from_str(&config_str).context("Failed to parse config.toml")?;
            info!("✅ Loaded configuration from config.toml");
            config.validate()?;
            return Ok(config);
        }

        // Try config.json for development
        if let Ok(config_str) = std::fs::read_to_string("config.json") {
            let config: AppConfig =
                serde_json::from_str(&config_str).context("Failed to parse config.json")?;
            info!("✅ Loaded configuration from config.json");
            config.validate()?;
            return Ok(config);
        }

        // Fall back to environment variables (development/testing)
        warn!("No configuration file found, falling back to environment variables");
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables (development/testing)
    fn from_env() -> Result<Self> {
        let token = std::env::var("SDUI_TOKEN")
            .context("SDUI_TOKEN environment variable not set and no config file found")?;
        let user_id = std::env::var("SDUI_USER_ID")
            .context("SDUI_USER_ID environment variable not set and no config file found")?;

        let mut config = Self {
            sdui: SduiConfig {
                token,
                user_id,
                base_url: default_base_url(),
                sensor_name: default_sensor_name(),
            },
            system: SystemConfig::default(),
        };

        if let Ok(base_url) = std::env::var("SDUI_BASE_URL") {
            config.sdui.base_url = base_url;
        }
        if let Ok(interval) = std::env::var("UPDATE_INTERVAL_SECS")
            && let Ok(secs) = interval.parse::<u64>()
        {
            config.system.update_interval_secs = secs;
        }
        if let Ok(url) = std::env::var("HA_BASE_URL") {
            config.system.ha_base_url = Some(url);
        }
        if let Ok(token) = std::env::var("HA_TOKEN") {
            config.system.ha_token = Some(token);
        }

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.sdui.token.is_empty() {
            anyhow::bail!("sdui.token cannot be empty");
        }
        if self.sdui.user_id.is_empty() {
            anyhow::bail!("sdui.user_id cannot be empty");
        }
        if self.sdui.base_url.is_empty() {
            anyhow::bail!("sdui.base_url cannot be empty");
        }

        if self.system.update_interval_secs < 10 {
            anyhow::bail!("update_interval_secs must be at least 10 seconds");
        }
        if self.system.update_interval_secs > 86400 {
            warn!(
                "update_interval_secs is very high ({}s), the sensor will rarely refresh",
                self.system.update_interval_secs
            );
        }

        Ok(())
    }

    /// Save current configuration to file
    ///
    /// Currently used in tests to verify serialization/deserialization
    #[allow(dead_code)]
    pub fn save(&self, path: &str) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        info!("Configuration saved to {}", path);
        Ok(())
    }

    /// Get update interval as Duration
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.system.update_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> AppConfig {
        AppConfig {
            sdui: SduiConfig {
                token: "secret".to_string(),
                user_id: "12345".to_string(),
                base_url: default_base_url(),
                sensor_name: default_sensor_name(),
            },
            system: SystemConfig::default(),
        }
    }

    #[test]
    fn test_defaults() {
        let config = sample_config();

        assert_eq!(config.sdui.base_url, "https://api.sdui.app");
        assert_eq!(config.sdui.sensor_name, "SDUI Timetable");
        assert_eq!(config.system.update_interval_secs, 300);
        assert_eq!(config.system.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_token() {
        let mut config = sample_config();
        config.sdui.token = String::new();

        assert!(config.validate().is_err());
        assert!(
            config
                .validate()
                .unwrap_err()
                .to_string()
                .contains("token cannot be empty")
        );
    }

    #[test]
    fn test_validate_empty_user_id() {
        let mut config = sample_config();
        config.sdui.user_id = String::new();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_update_interval_too_low() {
        let mut config = sample_config();
        config.system.update_interval_secs = 5;

        assert!(config.validate().is_err());
        assert!(
            config
                .validate()
                .unwrap_err()
                .to_string()
                .contains("at least 10 seconds")
        );
    }

    #[test]
    fn test_update_interval_duration() {
        let config = sample_config();
        assert_eq!(config.update_interval(), Duration::from_secs(300));
    }

    #[test]
    fn test_minimal_toml_config() {
        // Only the two required fields, everything else defaulted
        let config: AppConfig = toml::from_str(
            r#"
            [sdui]
            token = "secret"
            user_id = "12345"
            "#,
        )
        .unwrap();

        assert_eq!(config.sdui.user_id, "12345");
        assert_eq!(config.sdui.base_url, "https://api.sdui.app");
        assert_eq!(config.system.update_interval_secs, 300);
        assert!(config.validate().is_ok());
    }

    /// The HA addon writes its options as JSON; field names must keep matching.
    #[test]
    fn test_ha_addon_options_format() {
        let ha_addon_json = r#"{
            "sdui": {
                "token": "secret",
                "user_id": "12345",
                "sensor_name": "Timetable Anna"
            },
            "system": {
                "update_interval_secs": 600,
                "log_level": "debug"
            }
        }"#;

        let config: AppConfig = serde_json::from_str(ha_addon_json)
            .expect("Failed to parse HA addon options format - check field name compatibility!");

        assert_eq!(config.sdui.sensor_name, "Timetable Anna");
        assert_eq!(config.system.update_interval_secs, 600);
        assert_eq!(config.system.log_level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let config = sample_config();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        config.save(path.to_str().unwrap()).unwrap();

        let reloaded: AppConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded.sdui.user_id, config.sdui.user_id);
        assert_eq!(
            reloaded.system.update_interval_secs,
            config.system.update_interval_secs
        );
    }
}

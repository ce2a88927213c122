//! Host configuration.
//!
//! Supports loading from YAML files with environment variable overrides.

use std::net::IpAddr;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Host configuration loaded from YAML with environment overrides.
///
/// The document uses radio-core's field names at the top level. Overrides:
/// - `RADIO_DEVICE_IP` sets `device_ip`
/// - `RADIO_DEVICE_TTL_SECS` sets `device_ttl_secs`
/// - `RADIO_DEFAULT_VOLUME` sets `default_volume`
/// - `RADIO_COMPACT_VOLUME` sets `compact_volume`
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(flatten)]
    pub core: radio_core::Config,
}

impl AppConfig {
    /// Loads configuration from a YAML file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Pins discovery to a fixed speaker address.
    pub fn set_device_ip(&mut self, ip: IpAddr) {
        self.core.device_ip = Some(ip.to_string());
    }

    /// Applies overrides from `lookup` (the process environment in production).
    ///
    /// Unparseable values are ignored with a warning.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        fn parsed<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &str,
        ) -> Option<T> {
            let raw = lookup(key)?;
            match raw.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    log::warn!("Ignoring {}={:?}: not a valid value", key, raw);
                    None
                }
            }
        }

        if let Some(ip) = parsed::<IpAddr>(&lookup, "RADIO_DEVICE_IP") {
            self.set_device_ip(ip);
        }
        if let Some(ttl) = parsed(&lookup, "RADIO_DEVICE_TTL_SECS") {
            self.core.device_ttl_secs = ttl;
        }
        if let Some(volume) = parsed(&lookup, "RADIO_DEFAULT_VOLUME") {
            self.core.default_volume = volume;
        }
        if let Some(volume) = parsed(&lookup, "RADIO_COMPACT_VOLUME") {
            self.core.compact_volume = volume;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn missing_file_path_uses_defaults() {
        let config = AppConfig::default().core;
        assert_eq!(config.device_ttl_secs, 120);
        assert_eq!(config.compact_model_name, "Sonos Roam");
        assert_eq!(config.device_ip, None);
    }

    #[test]
    fn yaml_fields_override_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "device_ip: 192.168.1.40\ncompact_model_name: Bathroom\ndefault_volume: 30\nssdp_mx: 2"
        )
        .unwrap();

        let core = AppConfig::load(Some(file.path())).unwrap().core;

        assert_eq!(core.device_ip.as_deref(), Some("192.168.1.40"));
        assert_eq!(core.compact_model_name, "Bathroom");
        assert_eq!(core.default_volume, 30);
        assert_eq!(core.ssdp_mx, 2);
        assert_eq!(core.compact_volume, 10);
    }

    #[test]
    fn malformed_yaml_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "device_ttl_secs: [not, a, number]").unwrap();

        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn overrides_apply_and_bad_values_are_ignored() {
        let env: HashMap<&str, &str> = [
            ("RADIO_DEVICE_IP", "10.1.1.1"),
            ("RADIO_DEVICE_TTL_SECS", "soon"),
            ("RADIO_DEFAULT_VOLUME", "35"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.core.device_ip.as_deref(), Some("10.1.1.1"));
        assert_eq!(config.core.device_ttl_secs, 120);
        assert_eq!(config.core.default_volume, 35);
        assert_eq!(config.core.compact_volume, 10);
    }

    #[test]
    fn invalid_device_ip_override_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| (key == "RADIO_DEVICE_IP").then(|| "kitchen".to_string()));

        assert_eq!(config.core.device_ip, None);
    }
}

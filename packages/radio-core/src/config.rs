//! Core configuration for the radio controller.

use std::net::IpAddr;
use std::time::Duration;

use serde::Deserialize;

use crate::sonos::discovery::SsdpConfig;

/// Which volume each speaker is set to when the radio is switched on.
///
/// The compact portable model is set to a lower level than the rest of the
/// household; it usually sits close to the listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumePolicy {
    /// Exact room name that identifies the compact speaker.
    pub compact_model_name: String,
    /// Level for the compact speaker (0-100).
    pub compact_volume: u8,
    /// Level for every other speaker (0-100).
    pub default_volume: u8,
}

impl VolumePolicy {
    /// Chooses the level for a speaker by its room name (exact match).
    pub fn volume_for(&self, zone_name: &str) -> u8 {
        if zone_name == self.compact_model_name {
            self.compact_volume
        } else {
            self.default_volume
        }
    }
}

impl Default for VolumePolicy {
    fn default() -> Self {
        Config::default().volume_policy()
    }
}

/// Configuration for the radio controller.
///
/// All fields have sensible defaults.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    // Device handle
    /// Maximum reuse age of the discovered device (seconds).
    pub device_ttl_secs: u64,

    /// Upper bound for any single controller operation (seconds).
    pub operation_timeout_secs: u64,

    // Discovery
    /// Number of M-SEARCH packets to send during discovery.
    pub ssdp_send_count: u64,

    /// Delay between M-SEARCH packet retries (milliseconds).
    pub ssdp_retry_delay_ms: u64,

    /// MX header value (max response delay, seconds).
    pub ssdp_mx: u64,

    /// Overall SSDP discovery timeout (milliseconds).
    pub discovery_timeout_ms: u64,

    /// Fixed speaker address; skips SSDP when set.
    pub device_ip: Option<String>,

    // Volume
    /// Room name of the compact speaker.
    pub compact_model_name: String,

    /// Volume for the compact speaker.
    pub compact_volume: u8,

    /// Volume for every other speaker.
    pub default_volume: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_ttl_secs: 120,
            operation_timeout_secs: 60,
            ssdp_send_count: 3,
            ssdp_retry_delay_ms: 800,
            ssdp_mx: 1,
            discovery_timeout_ms: 5000,
            device_ip: None,
            compact_model_name: "Sonos Roam".to_string(),
            compact_volume: 10,
            default_volume: 20,
        }
    }
}

impl Config {
    /// Validates the configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.device_ttl_secs == 0 {
            return Err("device_ttl_secs must be >= 1".to_string());
        }
        if self.operation_timeout_secs == 0 {
            return Err("operation_timeout_secs must be >= 1".to_string());
        }
        if self.discovery_timeout_ms == 0 {
            return Err("discovery_timeout_ms must be >= 1".to_string());
        }
        if self.ssdp_send_count == 0 {
            return Err("ssdp_send_count must be >= 1".to_string());
        }
        if self.compact_volume > 100 || self.default_volume > 100 {
            return Err("volumes must be within 0-100".to_string());
        }
        if let Some(ip) = &self.device_ip {
            if ip.parse::<IpAddr>().is_err() {
                return Err(format!("device_ip {:?} is not an IP address", ip));
            }
        }
        Ok(())
    }

    pub fn device_ttl(&self) -> Duration {
        Duration::from_secs(self.device_ttl_secs)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }

    pub fn volume_policy(&self) -> VolumePolicy {
        VolumePolicy {
            compact_model_name: self.compact_model_name.clone(),
            compact_volume: self.compact_volume,
            default_volume: self.default_volume,
        }
    }

    pub fn ssdp_config(&self) -> SsdpConfig {
        SsdpConfig {
            send_count: self.ssdp_send_count,
            retry_delay: Duration::from_millis(self.ssdp_retry_delay_ms),
            discovery_timeout: Duration::from_millis(self.discovery_timeout_ms),
            mx_value: self.ssdp_mx,
        }
    }
}

//! Shared types for Sonos entry-point discovery.

use thiserror::Error;

/// Errors that can occur during discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Failed to bind UDP socket for discovery.
    #[error("failed to bind UDP socket: {0}")]
    SocketBind(#[source] std::io::Error),

    /// No usable network interfaces found.
    #[error("no usable network interfaces found")]
    NoInterfaces,

    /// Every discovery socket failed while waiting for responses.
    #[error("failed to receive SSDP responses: {0}")]
    Receive(#[source] std::io::Error),

    /// No Sonos device answered within the discovery window.
    #[error("no Sonos device answered within {timeout_ms}ms")]
    NoDevicesFound {
        /// The configured timeout in milliseconds.
        timeout_ms: u64,
    },
}

/// Convenient Result alias for discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// A Sonos player that answered an M-SEARCH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredSpeaker {
    /// Source IP of the SSDP response.
    pub ip: String,
    /// Canonical UUID (normalized RINCON_xxx).
    pub uuid: String,
    /// SSDP LOCATION URL if advertised.
    pub location: Option<String>,
}

/// Normalizes a Sonos UUID to canonical form.
///
/// Handles the shapes seen in SSDP responses:
/// - `uuid:` prefix (from UPnP UDN)
/// - `::urn:schemas-upnp-org:device:ZonePlayer:1` suffix (from USN)
/// - `_MS`, `_MR`, `_LR` subdevice suffixes
pub fn normalize_uuid(raw: &str) -> String {
    let mut uuid = raw.strip_prefix("uuid:").unwrap_or(raw);

    if let Some(idx) = uuid.find("::") {
        uuid = &uuid[..idx];
    }

    // Suffixes can appear in combination
    const SUFFIXES: &[&str] = &["_MS", "_MR", "_LR"];
    while let Some(stripped) = SUFFIXES.iter().find_map(|s| uuid.strip_suffix(s)) {
        uuid = stripped;
    }

    uuid.to_string()
}

/// Virtual interface prefixes to filter out during discovery.
pub const VIRTUAL_INTERFACE_PREFIXES: &[&str] = &[
    "lo", "docker", "veth", "br-", "virbr", "vmnet", "vbox", "tun", "tap",
];

/// Checks if an interface name belongs to a virtual/container interface.
pub fn is_virtual_interface(name: &str) -> bool {
    let name_lower = name.to_lowercase();
    VIRTUAL_INTERFACE_PREFIXES
        .iter()
        .any(|prefix| name_lower.starts_with(prefix))
}

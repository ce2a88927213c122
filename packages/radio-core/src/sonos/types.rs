//! Domain types for zone groups, transport state and the discovery entry point.

use std::fmt;

/// One member of a zone group as advertised in `ZoneGroupState`.
///
/// The location is kept raw; [`crate::topology`] turns it into a speaker host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneGroupMember {
    /// Unique identifier (RINCON_xxx format).
    pub uuid: String,
    /// Advertised device description URL, e.g. `http://192.168.1.10:1400/xml/device_description.xml`.
    pub location: String,
    /// User-configured room name.
    pub zone_name: String,
}

/// A coordinator plus its synchronized members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneGroup {
    /// Group identifier as reported by the speaker.
    pub id: String,
    /// UUID of the member that accepts playback commands for the group.
    pub coordinator_uuid: String,
    /// Members in advertised order (the coordinator is one of them).
    pub members: Vec<ZoneGroupMember>,
}

impl ZoneGroup {
    /// Returns the coordinator's member descriptor, if present.
    #[must_use]
    pub fn coordinator(&self) -> Option<&ZoneGroupMember> {
        self.members.iter().find(|m| m.uuid == self.coordinator_uuid)
    }

    /// Returns true if any member carries this zone name.
    #[must_use]
    pub fn has_member_named(&self, zone_name: &str) -> bool {
        self.members.iter().any(|m| m.zone_name == zone_name)
    }
}

/// The discovery entry point into the household.
///
/// Any reachable player can answer topology queries for the whole household,
/// so this is not necessarily a coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceHandle {
    /// IP address of the responding player.
    pub ip: String,
    /// Canonical UUID when known (SSDP responders always have one).
    pub uuid: Option<String>,
    /// SSDP LOCATION header, if discovered via SSDP.
    pub location: Option<String>,
}

impl DeviceHandle {
    /// Creates a handle for a known address without SSDP metadata.
    #[must_use]
    pub fn from_ip(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            uuid: None,
            location: None,
        }
    }
}

/// UPnP AVTransport state of a coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportState {
    Playing,
    Stopped,
    PausedPlayback,
    Transitioning,
    NoMediaPresent,
    /// Anything the speaker reports that is not in the UPnP vocabulary.
    Unknown(String),
}

impl TransportState {
    /// Parses a raw `CurrentTransportState` value.
    #[must_use]
    pub fn from_upnp(raw: &str) -> Self {
        match raw.trim() {
            "PLAYING" => Self::Playing,
            "STOPPED" => Self::Stopped,
            "PAUSED_PLAYBACK" => Self::PausedPlayback,
            "TRANSITIONING" => Self::Transitioning,
            "NO_MEDIA_PRESENT" => Self::NoMediaPresent,
            other => Self::Unknown(other.to_string()),
        }
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Playing => write!(f, "playing"),
            Self::Stopped => write!(f, "stopped"),
            Self::PausedPlayback => write!(f, "paused"),
            Self::Transitioning => write!(f, "transitioning"),
            Self::NoMediaPresent => write!(f, "no_media"),
            Self::Unknown(raw) => write!(f, "unknown({})", raw),
        }
    }
}

//! Sonos UPnP service definitions.
//!
//! Single source of truth for the service URNs and control paths used by the
//! SOAP commands in this crate.

/// Sonos UPnP services used for control.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum SonosService {
    /// Audio/Video transport control (set URI, play, stop, transport info).
    AVTransport,
    /// Per-speaker zone attributes, including the room name.
    DeviceProperties,
    /// Individual speaker volume control.
    RenderingControl,
    /// Zone group topology and membership information.
    ZoneGroupTopology,
}

impl SonosService {
    /// Returns the UPnP service URN for SOAP requests.
    #[must_use]
    pub fn urn(&self) -> &'static str {
        match self {
            Self::AVTransport => "urn:schemas-upnp-org:service:AVTransport:1",
            Self::DeviceProperties => "urn:schemas-upnp-org:service:DeviceProperties:1",
            Self::RenderingControl => "urn:schemas-upnp-org:service:RenderingControl:1",
            Self::ZoneGroupTopology => "urn:schemas-upnp-org:service:ZoneGroupTopology:1",
        }
    }

    /// Returns the UPnP control endpoint path for SOAP requests.
    #[must_use]
    pub fn control_path(&self) -> &'static str {
        match self {
            Self::AVTransport => "/MediaRenderer/AVTransport/Control",
            Self::DeviceProperties => "/DeviceProperties/Control",
            Self::RenderingControl => "/MediaRenderer/RenderingControl/Control",
            Self::ZoneGroupTopology => "/ZoneGroupTopology/Control",
        }
    }

    /// Returns a human-readable name for this service.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AVTransport => "AVTransport",
            Self::DeviceProperties => "DeviceProperties",
            Self::RenderingControl => "RenderingControl",
            Self::ZoneGroupTopology => "ZoneGroupTopology",
        }
    }
}

//! Fixed protocol constants that should NOT be changed.
//!
//! Values dictated by UPnP and the Sonos TuneIn integration, plus the one
//! station this switch controls.

// ─────────────────────────────────────────────────────────────────────────────
// Station
// ─────────────────────────────────────────────────────────────────────────────

/// TuneIn station identifier started on the main coordinator.
pub const STATION_ID: &str = "s218325";

/// Display label for the station, also used as the switch name.
pub const STATION_TITLE: &str = "GDS.FM";

/// TuneIn music service ID on Sonos.
pub const TUNEIN_SERVICE_ID: u32 = 254;

/// Flags Sonos expects on TuneIn `x-sonosapi-stream` URIs.
pub const TUNEIN_STREAM_FLAGS: u32 = 8224;

/// DIDL-Lite item ID prefix for TuneIn stations.
pub const TUNEIN_ITEM_PREFIX: &str = "F00092020";

/// Service descriptor placed in the DIDL-Lite `desc` element for TuneIn.
pub const TUNEIN_SERVICE_DESC: &str = "SA_RINCON65031_";

// ─────────────────────────────────────────────────────────────────────────────
// HTTP/SOAP
// ─────────────────────────────────────────────────────────────────────────────

/// Timeout for SOAP HTTP requests (seconds).
///
/// 10 seconds is reasonable for LAN operations.
pub const SOAP_TIMEOUT_SECS: u64 = 10;

/// Port every Sonos player serves UPnP control on.
pub const SONOS_HTTP_PORT: u16 = 1400;

// ─────────────────────────────────────────────────────────────────────────────
// SSDP
// ─────────────────────────────────────────────────────────────────────────────

/// Standard SSDP multicast address and port.
pub const SSDP_MULTICAST_ADDR: &str = "239.255.255.250:1900";

/// SSDP search target for Sonos ZonePlayer devices.
pub const SONOS_SEARCH_TARGET: &str = "urn:schemas-upnp-org:device:ZonePlayer:1";

/// UPnP 1.0 recommends a TTL of 4 for SSDP multicast.
pub const SSDP_MULTICAST_TTL: u32 = 4;

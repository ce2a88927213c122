//! Trait abstractions for Sonos operations.
//!
//! The controller depends on these traits rather than on the concrete
//! client, so orchestration can be tested against recording mocks.

use async_trait::async_trait;

use crate::error::{DiscoveryResult, SoapResult};
use crate::sonos::types::{DeviceHandle, TransportState, ZoneGroup};

/// Trait for locating an entry point into the household.
#[async_trait]
pub trait SonosDiscovery: Send + Sync {
    /// Finds one reachable Sonos player.
    async fn discover_device(&self) -> DiscoveryResult<DeviceHandle>;
}

/// Trait for Sonos topology operations.
#[async_trait]
pub trait SonosTopology: Send + Sync {
    /// Fetches the current zone groups from a Sonos speaker.
    ///
    /// # Arguments
    /// * `ip` - IP address of any Sonos speaker on the network
    async fn get_zone_groups(&self, ip: &str) -> SoapResult<Vec<ZoneGroup>>;
}

/// Trait for per-speaker operations.
#[async_trait]
pub trait SonosSpeaker: Send + Sync {
    /// Reads the room name of a speaker. Never cached.
    async fn get_zone_name(&self, ip: &str) -> SoapResult<String>;

    /// Sets the speaker's own volume (0-100, values > 100 are clamped).
    async fn set_speaker_volume(&self, ip: &str, volume: u8) -> SoapResult<()>;

    /// Reads the transport state of a speaker (meaningful on coordinators).
    async fn get_transport_state(&self, ip: &str) -> SoapResult<TransportState>;

    /// Joins the speaker to the group containing the room `zone_name`.
    ///
    /// # Arguments
    /// * `ip` - IP address of the speaker that should join
    /// * `zone_name` - Room name of any member of the target group
    async fn join_group(&self, ip: &str, zone_name: &str) -> SoapResult<()>;
}

/// Trait for Sonos playback control operations.
#[async_trait]
pub trait SonosPlayback: Send + Sync {
    /// Starts a TuneIn station on a group coordinator.
    ///
    /// # Arguments
    /// * `ip` - IP address of the coordinator
    /// * `station_id` - TuneIn station identifier
    /// * `title` - Label shown in the Sonos apps
    async fn play_tunein_radio(&self, ip: &str, station_id: &str, title: &str) -> SoapResult<()>;

    /// Stops playback on a coordinator. Already-stopped is success.
    async fn stop(&self, ip: &str) -> SoapResult<()>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Combined Trait (for trait objects)
// ─────────────────────────────────────────────────────────────────────────────

/// Combined trait for every operation the controller needs.
pub trait SonosClient: SonosDiscovery + SonosTopology + SonosSpeaker + SonosPlayback {}

/// Blanket implementation for any type implementing all traits.
impl<T: SonosDiscovery + SonosTopology + SonosSpeaker + SonosPlayback> SonosClient for T {}

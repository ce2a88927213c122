//! Concrete Sonos client over UPnP/SOAP.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::{DiscoveryResult, SoapResult};
use crate::protocol_constants::SOAP_TIMEOUT_SECS;
use crate::sonos::device::get_zone_name;
use crate::sonos::discovery::{discover_first, SsdpConfig};
use crate::sonos::grouping::join_group;
use crate::sonos::playback::{get_transport_state, play_tunein_radio, stop};
use crate::sonos::traits::{SonosDiscovery, SonosPlayback, SonosSpeaker, SonosTopology};
use crate::sonos::types::{DeviceHandle, TransportState, ZoneGroup};
use crate::sonos::volume::set_speaker_volume;
use crate::sonos::zone_groups::get_zone_groups;

/// Creates the shared HTTP client for all Sonos communication.
///
/// Every request is bounded by the SOAP timeout.
pub fn create_http_client() -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(SOAP_TIMEOUT_SECS))
        .build()
}

/// Concrete implementation of Sonos client traits.
///
/// This struct wraps the free functions of the sibling modules to provide
/// an injectable interface for Sonos operations.
#[derive(Clone)]
pub struct SonosClientImpl {
    /// HTTP client for Sonos communication.
    client: Client,
    /// SSDP discovery settings.
    ssdp_config: SsdpConfig,
    /// Fixed entry point that bypasses SSDP when set.
    device_ip: Option<String>,
}

impl std::fmt::Debug for SonosClientImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SonosClientImpl")
            .field("client", &"Client")
            .field("ssdp_config", &self.ssdp_config)
            .field("device_ip", &self.device_ip)
            .finish()
    }
}

impl SonosClientImpl {
    /// Creates a client that discovers its entry point via SSDP.
    #[must_use]
    pub fn new(client: Client, ssdp_config: SsdpConfig) -> Self {
        Self {
            client,
            ssdp_config,
            device_ip: None,
        }
    }

    /// Pins discovery to a known player address.
    ///
    /// Useful on networks where multicast is filtered.
    #[must_use]
    pub fn with_device_ip(mut self, device_ip: Option<String>) -> Self {
        self.device_ip = device_ip;
        self
    }
}

#[async_trait]
impl SonosDiscovery for SonosClientImpl {
    async fn discover_device(&self) -> DiscoveryResult<DeviceHandle> {
        if let Some(ip) = &self.device_ip {
            log::debug!("[Sonos] Using configured device {}", ip);
            return Ok(DeviceHandle::from_ip(ip.clone()));
        }

        let speaker = discover_first(&self.ssdp_config).await?;
        log::info!("[Sonos] Discovered entry point {} ({})", speaker.ip, speaker.uuid);

        Ok(DeviceHandle {
            ip: speaker.ip,
            uuid: Some(speaker.uuid),
            location: speaker.location,
        })
    }
}

#[async_trait]
impl SonosTopology for SonosClientImpl {
    async fn get_zone_groups(&self, ip: &str) -> SoapResult<Vec<ZoneGroup>> {
        get_zone_groups(&self.client, ip).await
    }
}

#[async_trait]
impl SonosSpeaker for SonosClientImpl {
    async fn get_zone_name(&self, ip: &str) -> SoapResult<String> {
        get_zone_name(&self.client, ip).await
    }

    async fn set_speaker_volume(&self, ip: &str, volume: u8) -> SoapResult<()> {
        set_speaker_volume(&self.client, ip, volume).await
    }

    async fn get_transport_state(&self, ip: &str) -> SoapResult<TransportState> {
        get_transport_state(&self.client, ip).await
    }

    async fn join_group(&self, ip: &str, zone_name: &str) -> SoapResult<()> {
        join_group(&self.client, ip, zone_name).await
    }
}

#[async_trait]
impl SonosPlayback for SonosClientImpl {
    async fn play_tunein_radio(&self, ip: &str, station_id: &str, title: &str) -> SoapResult<()> {
        play_tunein_radio(&self.client, ip, station_id, title).await
    }

    async fn stop(&self, ip: &str) -> SoapResult<()> {
        stop(&self.client, ip).await
    }
}

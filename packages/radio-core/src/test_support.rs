//! Shared test fixtures: ZoneGroupState XML builders and a recording mock
//! implementing every Sonos trait.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{DiscoveryResult, SoapResult};
use crate::sonos::discovery::DiscoveryError;
use crate::sonos::soap::SoapError;
use crate::sonos::traits::{SonosDiscovery, SonosPlayback, SonosSpeaker, SonosTopology};
use crate::sonos::types::{DeviceHandle, TransportState, ZoneGroup, ZoneGroupMember};

// ─────────────────────────────────────────────────────────────────────────────
// XML fixtures
// ─────────────────────────────────────────────────────────────────────────────

/// A `ZoneGroupMember` element for a player at `ip`. `zone_name` is inserted verbatim.
pub fn member_xml(uuid: &str, ip: &str, zone_name: &str) -> String {
    format!(
        r#"<ZoneGroupMember UUID="{}" Location="http://{}:1400/xml/device_description.xml" ZoneName="{}" SoftwareVersion="79.1-56030" />"#,
        uuid, ip, zone_name
    )
}

pub fn group_xml(id: &str, coordinator_uuid: &str, members: &[String]) -> String {
    format!(
        r#"<ZoneGroup Coordinator="{}" ID="{}">{}</ZoneGroup>"#,
        coordinator_uuid,
        id,
        members.concat()
    )
}

pub fn zone_groups_xml(groups: &[String]) -> String {
    format!("<ZoneGroupState><ZoneGroups>{}</ZoneGroups><VanishedDevices/></ZoneGroupState>", groups.concat())
}

// ─────────────────────────────────────────────────────────────────────────────
// Topology fixtures
// ─────────────────────────────────────────────────────────────────────────────

/// UUID derived from a host: `10.0.0.1` becomes `RINCON_10_0_0_1`.
pub fn uuid_for(host: &str) -> String {
    format!("RINCON_{}", host.replace('.', "_"))
}

/// Default room name for a host: `Room <last octet>`.
pub fn room_for(host: &str) -> String {
    format!("Room {}", host.rsplit('.').next().unwrap_or(host))
}

/// A group coordinated by `coordinator_host` with `member_hosts` in order.
pub fn group(coordinator_host: &str, member_hosts: &[&str]) -> ZoneGroup {
    ZoneGroup {
        id: format!("{}:1", uuid_for(coordinator_host)),
        coordinator_uuid: uuid_for(coordinator_host),
        members: member_hosts
            .iter()
            .map(|host| ZoneGroupMember {
                uuid: uuid_for(host),
                location: format!("http://{}:1400/xml/device_description.xml", host),
                zone_name: room_for(host),
            })
            .collect(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Recording mock
// ─────────────────────────────────────────────────────────────────────────────

/// Entry point the mock reports from discovery.
pub const ENTRY_IP: &str = "10.0.0.100";

/// One network operation observed by [`MockSonos`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Discover,
    ZoneGroups(String),
    ZoneName(String),
    SetVolume(String, u8),
    TransportState(String),
    Join(String, String),
    PlayRadio(String, String),
    Stop(String),
}

/// Mock Sonos household that records every call.
///
/// Room names default to [`room_for`]; transport state defaults to stopped.
pub struct MockSonos {
    calls: Mutex<Vec<Call>>,
    discover_count: AtomicUsize,
    fail_discovery: AtomicBool,
    discovery_delay: Mutex<Duration>,
    groups: Mutex<Vec<ZoneGroup>>,
    names: Mutex<HashMap<String, String>>,
    states: Mutex<HashMap<String, TransportState>>,
    failing_host: Mutex<Option<String>>,
    fail_joins: AtomicBool,
}

impl MockSonos {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            discover_count: AtomicUsize::new(0),
            fail_discovery: AtomicBool::new(false),
            discovery_delay: Mutex::new(Duration::ZERO),
            groups: Mutex::new(Vec::new()),
            names: Mutex::new(HashMap::new()),
            states: Mutex::new(HashMap::new()),
            failing_host: Mutex::new(None),
            fail_joins: AtomicBool::new(false),
        }
    }

    pub fn with_groups(groups: Vec<ZoneGroup>) -> Self {
        let mock = Self::new();
        mock.set_groups(groups);
        mock
    }

    pub fn set_groups(&self, groups: Vec<ZoneGroup>) {
        *self.groups.lock() = groups;
    }

    pub fn set_name(&self, host: &str, name: &str) {
        self.names.lock().insert(host.to_string(), name.to_string());
    }

    pub fn set_state(&self, host: &str, state: TransportState) {
        self.states.lock().insert(host.to_string(), state);
    }

    pub fn fail_discovery(&self, fail: bool) {
        self.fail_discovery.store(fail, Ordering::SeqCst);
    }

    pub fn set_discovery_delay(&self, delay: Duration) {
        *self.discovery_delay.lock() = delay;
    }

    /// Makes every request addressed to `host` fail, except topology.
    pub fn fail_host(&self, host: Option<&str>) {
        *self.failing_host.lock() = host.map(str::to_string);
    }

    /// Makes every join request fail while leaving other requests alone.
    pub fn fail_joins(&self, fail: bool) {
        self.fail_joins.store(fail, Ordering::SeqCst);
    }

    pub fn discover_count(&self) -> usize {
        self.discover_count.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Calls that change speaker state.
    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::SetVolume(..) | Call::Join(..) | Call::PlayRadio(..) | Call::Stop(_)
                )
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn check_host(&self, host: &str) -> SoapResult<()> {
        if self.failing_host.lock().as_deref() == Some(host) {
            return Err(SoapError::Fault(format!("UPnPError 800 from {}", host)));
        }
        Ok(())
    }
}

#[async_trait]
impl SonosDiscovery for MockSonos {
    async fn discover_device(&self) -> DiscoveryResult<DeviceHandle> {
        self.record(Call::Discover);
        self.discover_count.fetch_add(1, Ordering::SeqCst);

        let delay = *self.discovery_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.fail_discovery.load(Ordering::SeqCst) {
            return Err(DiscoveryError::NoDevicesFound { timeout_ms: 5000 });
        }
        Ok(DeviceHandle::from_ip(ENTRY_IP))
    }
}

#[async_trait]
impl SonosTopology for MockSonos {
    async fn get_zone_groups(&self, ip: &str) -> SoapResult<Vec<ZoneGroup>> {
        self.record(Call::ZoneGroups(ip.to_string()));
        Ok(self.groups.lock().clone())
    }
}

#[async_trait]
impl SonosSpeaker for MockSonos {
    async fn get_zone_name(&self, ip: &str) -> SoapResult<String> {
        self.record(Call::ZoneName(ip.to_string()));
        self.check_host(ip)?;
        Ok(self
            .names
            .lock()
            .get(ip)
            .cloned()
            .unwrap_or_else(|| room_for(ip)))
    }

    async fn set_speaker_volume(&self, ip: &str, volume: u8) -> SoapResult<()> {
        self.record(Call::SetVolume(ip.to_string(), volume));
        self.check_host(ip)
    }

    async fn get_transport_state(&self, ip: &str) -> SoapResult<TransportState> {
        self.record(Call::TransportState(ip.to_string()));
        self.check_host(ip)?;
        Ok(self
            .states
            .lock()
            .get(ip)
            .cloned()
            .unwrap_or(TransportState::Stopped))
    }

    async fn join_group(&self, ip: &str, zone_name: &str) -> SoapResult<()> {
        self.record(Call::Join(ip.to_string(), zone_name.to_string()));
        self.check_host(ip)?;
        if self.fail_joins.load(Ordering::SeqCst) {
            return Err(SoapError::Fault(format!("UPnPError 800 joining {:?}", zone_name)));
        }
        Ok(())
    }
}

#[async_trait]
impl SonosPlayback for MockSonos {
    async fn play_tunein_radio(&self, ip: &str, station_id: &str, _title: &str) -> SoapResult<()> {
        self.record(Call::PlayRadio(ip.to_string(), station_id.to_string()));
        Ok(())
    }

    async fn stop(&self, ip: &str) -> SoapResult<()> {
        self.record(Call::Stop(ip.to_string()));
        self.check_host(ip)
    }
}

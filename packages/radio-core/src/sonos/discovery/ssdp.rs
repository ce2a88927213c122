//! SSDP-based discovery of a Sonos entry point.
//!
//! Sends M-SEARCH queries to 239.255.255.250:1900 on every usable interface
//! and returns as soon as the first Sonos player answers. Each socket is used
//! for send AND receive since devices reply unicast back to the sending port.

use futures::future::{join_all, select_ok};
use local_ip_address::list_afinet_netifas;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;

use super::types::{
    is_virtual_interface, normalize_uuid, DiscoveredSpeaker, DiscoveryError, DiscoveryResult,
};
use crate::protocol_constants::{SONOS_SEARCH_TARGET, SSDP_MULTICAST_ADDR, SSDP_MULTICAST_TTL};

// ─────────────────────────────────────────────────────────────────────────────
// ASCII Case-Insensitive Helpers
// ─────────────────────────────────────────────────────────────────────────────
//
// HTTP headers are ASCII, so byte-level comparison is safe and allocation-free.

/// Checks if `haystack` contains `needle` (ASCII case-insensitive).
#[inline]
fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    find_ignore_ascii_case(haystack, needle).is_some()
}

/// Checks if `s` starts with `prefix` (ASCII case-insensitive).
#[inline]
fn starts_with_ignore_ascii_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Finds the byte index of `needle` in `haystack` (ASCII case-insensitive).
#[inline]
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

// ─────────────────────────────────────────────────────────────────────────────

/// Build the M-SEARCH message.
fn build_msearch_message(mx: u64) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST: {}\r\n\
         MAN: \"ssdp:discover\"\r\n\
         MX: {}\r\n\
         ST: {}\r\n\r\n",
        SSDP_MULTICAST_ADDR, mx, SONOS_SEARCH_TARGET
    )
}

/// Configuration for SSDP discovery.
#[derive(Debug, Clone)]
pub struct SsdpConfig {
    /// Number of M-SEARCH packets to send per interface.
    pub send_count: u64,
    /// Delay between M-SEARCH retries.
    pub retry_delay: Duration,
    /// Total discovery timeout.
    pub discovery_timeout: Duration,
    /// MX value (max response delay in seconds).
    pub mx_value: u64,
}

impl Default for SsdpConfig {
    fn default() -> Self {
        Self {
            send_count: 3,
            retry_delay: Duration::from_millis(800),
            discovery_timeout: Duration::from_secs(5),
            mx_value: 1,
        }
    }
}

/// Network interface used for discovery.
#[derive(Debug, Clone)]
struct InterfaceInfo {
    name: String,
    ip: Ipv4Addr,
}

/// Lists non-loopback IPv4 interfaces, skipping virtual/container ones.
fn get_interfaces() -> Vec<InterfaceInfo> {
    list_afinet_netifas()
        .unwrap_or_else(|e| {
            log::warn!("[SSDP] Failed to list network interfaces: {}", e);
            Vec::new()
        })
        .into_iter()
        .filter_map(|(name, addr)| {
            if is_virtual_interface(&name) {
                log::debug!("[SSDP] Skipping virtual interface: {}", name);
                return None;
            }
            match addr {
                IpAddr::V4(ip) if !ip.is_loopback() => Some(InterfaceInfo { name, ip }),
                _ => None,
            }
        })
        .collect()
}

/// Creates a non-blocking UDP socket bound to one interface.
fn create_socket(iface_ip: Ipv4Addr) -> Result<UdpSocket, DiscoveryError> {
    let bind_addr = SocketAddr::new(IpAddr::V4(iface_ip), 0);

    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
        .map_err(DiscoveryError::SocketBind)?;

    if let Err(e) = socket.set_reuse_address(true) {
        log::warn!("[SSDP] Failed to set SO_REUSEADDR on {}: {}", iface_ip, e);
    }

    if let Err(e) = socket.set_multicast_ttl_v4(SSDP_MULTICAST_TTL) {
        log::warn!("[SSDP] Failed to set multicast TTL on {}: {}", iface_ip, e);
    }

    socket
        .set_nonblocking(true)
        .map_err(DiscoveryError::SocketBind)?;
    socket
        .bind(&bind_addr.into())
        .map_err(DiscoveryError::SocketBind)?;

    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket).map_err(DiscoveryError::SocketBind)
}

/// Parses an SSDP response and extracts speaker info.
///
/// Returns None unless the response carries a RINCON USN.
fn parse_ssdp_response(response: &str, src_ip: &str) -> Option<DiscoveredSpeaker> {
    if !contains_ignore_ascii_case(response, "sonos")
        && !contains_ignore_ascii_case(response, "rincon")
    {
        return None;
    }

    // Split at the first colon only: the URL itself contains colons
    let location = response
        .lines()
        .find(|l| starts_with_ignore_ascii_case(l, "location:"))
        .and_then(|l| l.find(':').map(|idx| l[idx + 1..].trim().to_string()));

    let usn = response
        .lines()
        .find(|l| starts_with_ignore_ascii_case(l, "usn:"))
        .and_then(|l| find_ignore_ascii_case(l, "uuid:").map(|idx| &l[idx + 5..]))?;

    let uuid = normalize_uuid(usn.trim());

    // Sonos UUIDs are always uppercase RINCON_
    if !uuid.starts_with("RINCON_") {
        return None;
    }

    Some(DiscoveredSpeaker {
        ip: src_ip.to_string(),
        uuid,
        location,
    })
}

/// Sends `send_count` M-SEARCH packets spaced by `retry_delay`.
async fn send_searches(iface: &InterfaceInfo, socket: &UdpSocket, msg: &[u8], config: &SsdpConfig) {
    for attempt in 0..config.send_count {
        if attempt > 0 {
            tokio::time::sleep(config.retry_delay).await;
        }
        match socket.send_to(msg, SSDP_MULTICAST_ADDR).await {
            Ok(_) => log::trace!("[SSDP] Sent M-SEARCH from {}", iface.ip),
            Err(e) => log::warn!(
                "[SSDP] Failed to send M-SEARCH on {} (attempt {}): {}",
                iface.name,
                attempt + 1,
                e
            ),
        }
    }
}

/// Waits for the first Sonos response on one socket, ignoring other devices.
async fn recv_first(iface: &InterfaceInfo, socket: &UdpSocket) -> std::io::Result<DiscoveredSpeaker> {
    let mut buf = [0u8; 2048];
    loop {
        let (amt, src) = socket.recv_from(&mut buf).await.map_err(|e| {
            log::warn!("[SSDP] Socket recv error on {} ({}): {}", iface.name, iface.ip, e);
            e
        })?;
        let response = String::from_utf8_lossy(&buf[..amt]);
        if let Some(speaker) = parse_ssdp_response(&response, &src.ip().to_string()) {
            log::debug!(
                "[SSDP] Discovered speaker: ip={}, uuid={}, via {}",
                speaker.ip,
                speaker.uuid,
                iface.name
            );
            return Ok(speaker);
        }
    }
}

/// Discovers the first Sonos player that answers an M-SEARCH.
///
/// Sends continue in the background until the first answer arrives; the
/// whole search is bounded by `config.discovery_timeout`.
///
/// # Errors
/// - [`DiscoveryError::NoInterfaces`] if no interface could be bound
/// - [`DiscoveryError::NoDevicesFound`] if nothing answered in time
/// - [`DiscoveryError::Receive`] if every socket failed
pub async fn discover_first(config: &SsdpConfig) -> DiscoveryResult<DiscoveredSpeaker> {
    let mut sockets: Vec<(InterfaceInfo, UdpSocket)> = Vec::new();
    for iface in get_interfaces() {
        match create_socket(iface.ip) {
            Ok(socket) => sockets.push((iface, socket)),
            Err(e) => log::warn!(
                "[SSDP] Failed to create socket for {} ({}): {}",
                iface.name,
                iface.ip,
                e
            ),
        }
    }

    if sockets.is_empty() {
        return Err(DiscoveryError::NoInterfaces);
    }

    log::debug!(
        "[SSDP] Searching on {} interface(s) ({} sends with {}ms spacing)",
        sockets.len(),
        config.send_count,
        config.retry_delay.as_millis()
    );

    let msg = build_msearch_message(config.mx_value);

    let search = async {
        let sends = join_all(
            sockets
                .iter()
                .map(|(iface, socket)| send_searches(iface, socket, msg.as_bytes(), config)),
        );
        let first = select_ok(
            sockets
                .iter()
                .map(|(iface, socket)| Box::pin(recv_first(iface, socket))),
        );
        tokio::pin!(sends);
        tokio::pin!(first);

        tokio::select! {
            result = &mut first => result,
            _ = &mut sends => first.await,
        }
    };

    let outcome = timeout(config.discovery_timeout, search).await;
    match outcome {
        Ok(Ok((speaker, _))) => Ok(speaker),
        Ok(Err(e)) => Err(DiscoveryError::Receive(e)),
        Err(_) => Err(DiscoveryError::NoDevicesFound {
            timeout_ms: config.discovery_timeout.as_millis() as u64,
        }),
    }
}

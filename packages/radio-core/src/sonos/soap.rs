//! Low-level SOAP protocol implementation for UPnP/Sonos communication.
//!
//! This module handles the raw SOAP envelope building, HTTP transport,
//! and fault detection. The typed commands live in `playback.rs`,
//! `volume.rs`, `grouping.rs`, `device.rs` and `zone_groups.rs`.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

use super::services::SonosService;
use super::utils::{build_sonos_url, escape_xml, extract_xml_text};
use crate::protocol_constants::SOAP_TIMEOUT_SECS;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during SOAP operations with Sonos speakers.
#[derive(Debug, Error)]
pub enum SoapError {
    /// HTTP request to the speaker failed (includes timeouts).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Speaker returned a non-success HTTP status without a SOAP fault.
    #[error("HTTP error {0}: {1}")]
    HttpStatus(u16, String),

    /// Speaker returned a SOAP fault response.
    #[error("SOAP fault: {0}")]
    Fault(String),

    /// The response did not contain the expected field.
    #[error("Failed to parse SOAP response: missing {0}")]
    Parse(&'static str),

    /// No group on the network has a member with the requested zone name.
    #[error("No group contains a speaker named {0:?}")]
    UnknownGroup(String),
}

/// Convenient Result alias for SOAP operations.
pub type SoapResult<T> = Result<T, SoapError>;

impl SoapError {
    /// Returns true for the UPnP 701 fault ("transition not available").
    ///
    /// Sonos raises it for `Stop` on a speaker that is already stopped.
    #[must_use]
    pub fn is_transition_unavailable(&self) -> bool {
        matches!(self, SoapError::Fault(msg) if msg.contains("701"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SOAP Request/Response
// ─────────────────────────────────────────────────────────────────────────────

/// Builds the SOAP envelope for an action.
///
/// Must be a single line with no leading whitespace: Sonos rejects XML with
/// whitespace before the root element.
fn build_envelope(service: SonosService, action: &str, args: &[(&str, String)]) -> String {
    let mut body = format!(
        r#"<?xml version="1.0" encoding="utf-8"?><s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/"><s:Body><u:{} xmlns:u="{}">"#,
        action,
        service.urn()
    );

    for (k, v) in args {
        body.push_str(&format!("<{k}>{}</{k}>", escape_xml(v)));
    }

    body.push_str(&format!(r#"</u:{}></s:Body></s:Envelope>"#, action));
    body
}

/// Sends a SOAP request to a Sonos speaker and returns the response body.
///
/// SOAP faults are reported as [`SoapError::Fault`] even when the speaker
/// answers with HTTP 500, which it does for every fault.
async fn send_soap_request(
    client: &Client,
    ip: &str,
    service: SonosService,
    action: &str,
    args: &[(&str, String)],
) -> SoapResult<String> {
    let url = build_sonos_url(ip, service.control_path());
    let body = build_envelope(service, action, args);

    log::debug!("[SOAP] {}#{} -> {}", service.name(), action, url);
    log::trace!("[SOAP] Request body: {}", body);

    let start = std::time::Instant::now();
    let res = client
        .post(&url)
        .header("Content-Type", "text/xml; charset=\"utf-8\"")
        .header("SOAPAction", format!("\"{}#{}\"", service.urn(), action))
        .body(body)
        .timeout(Duration::from_secs(SOAP_TIMEOUT_SECS))
        .send()
        .await;

    log::debug!(
        "[SOAP] {} on {} completed in {:?}: {:?}",
        action,
        ip,
        start.elapsed(),
        res.as_ref().map(|r| r.status())
    );

    let res = res?;
    let status = res.status();
    let response_text = res.text().await?;

    if response_text.contains("<s:Fault>") || response_text.contains("<soap:Fault>") {
        // Sonos puts the UPnP error code in <errorCode>, faultstring is just "UPnPError"
        let fault = match (
            extract_xml_text(&response_text, "faultstring"),
            extract_xml_text(&response_text, "errorCode"),
        ) {
            (Some(msg), Some(code)) => format!("{} {}", msg, code),
            (Some(msg), None) => msg,
            (None, Some(code)) => format!("UPnPError {}", code),
            (None, None) => "Unknown SOAP fault".to_string(),
        };
        return Err(SoapError::Fault(fault));
    }

    if !status.is_success() {
        return Err(SoapError::HttpStatus(status.as_u16(), response_text));
    }

    Ok(response_text)
}

// ─────────────────────────────────────────────────────────────────────────────
// SOAP Request Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for constructing and sending SOAP requests to Sonos speakers.
///
/// # Example
/// ```ignore
/// let response = SoapRequestBuilder::new(&client, "192.168.1.100", SonosService::AVTransport, "Play")
///     .instance_id()
///     .arg("Speed", "1")
///     .send()
///     .await?;
/// ```
pub struct SoapRequestBuilder<'a> {
    client: &'a Client,
    ip: &'a str,
    service: SonosService,
    action: &'a str,
    args: Vec<(&'a str, String)>,
}

impl<'a> SoapRequestBuilder<'a> {
    /// Creates a request for `service#action` on the speaker at `ip`.
    #[must_use]
    pub fn new(client: &'a Client, ip: &'a str, service: SonosService, action: &'a str) -> Self {
        Self {
            client,
            ip,
            service,
            action,
            args: Vec::new(),
        }
    }

    /// Adds an argument. Arguments are sent in the order they are added.
    #[must_use]
    pub fn arg(mut self, key: &'a str, value: impl Into<String>) -> Self {
        self.args.push((key, value.into()));
        self
    }

    /// Adds the standard InstanceID="0" argument used by most Sonos actions.
    #[must_use]
    pub fn instance_id(self) -> Self {
        self.arg("InstanceID", "0")
    }

    /// Sends the SOAP request and returns the response body.
    pub async fn send(self) -> SoapResult<String> {
        send_soap_request(self.client, self.ip, self.service, self.action, &self.args).await
    }

    /// Renders the envelope without sending (for testing).
    #[cfg(test)]
    pub fn envelope(&self) -> String {
        build_envelope(self.service, self.action, &self.args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_wraps_action_in_service_namespace() {
        let client = Client::new();
        let envelope = SoapRequestBuilder::new(
            &client,
            "192.168.1.100",
            SonosService::ZoneGroupTopology,
            "GetZoneGroupState",
        )
        .envelope();

        assert!(envelope.starts_with("<?xml"));
        assert!(envelope.contains(
            r#"<u:GetZoneGroupState xmlns:u="urn:schemas-upnp-org:service:ZoneGroupTopology:1">"#
        ));
        assert!(envelope.ends_with("</u:GetZoneGroupState></s:Body></s:Envelope>"));
    }

    #[test]
    fn envelope_keeps_arg_order_and_escapes_values() {
        let client = Client::new();
        let envelope =
            SoapRequestBuilder::new(&client, "192.168.1.100", SonosService::AVTransport, "X")
                .instance_id()
                .arg("CurrentURI", "a&b")
                .arg("CurrentURIMetaData", "<DIDL-Lite/>")
                .envelope();

        let instance = envelope.find("<InstanceID>0</InstanceID>").unwrap();
        let uri = envelope.find("<CurrentURI>a&amp;b</CurrentURI>").unwrap();
        let meta = envelope
            .find("<CurrentURIMetaData>&lt;DIDL-Lite/&gt;</CurrentURIMetaData>")
            .unwrap();
        assert!(instance < uri && uri < meta);
    }

    #[test]
    fn fault_701_is_transition_unavailable() {
        assert!(SoapError::Fault("UPnPError 701".into()).is_transition_unavailable());
        assert!(!SoapError::Fault("UPnPError 402".into()).is_transition_unavailable());
        assert!(!SoapError::Parse("CurrentVolume").is_transition_unavailable());
    }
}

//! Playback control commands for Sonos speakers.
//!
//! Starts the TuneIn station, stops playback and reads the transport state
//! via AVTransport SOAP actions.

use reqwest::Client;

use crate::error::SoapResult;
use crate::protocol_constants::{
    TUNEIN_ITEM_PREFIX, TUNEIN_SERVICE_DESC, TUNEIN_SERVICE_ID, TUNEIN_STREAM_FLAGS,
};
use crate::sonos::services::SonosService;
use crate::sonos::soap::{SoapError, SoapRequestBuilder};
use crate::sonos::types::TransportState;
use crate::sonos::utils::{escape_xml, extract_xml_text};

/// Builds the `x-sonosapi-stream` URI for a TuneIn station.
pub(crate) fn tunein_stream_uri(station_id: &str) -> String {
    format!(
        "x-sonosapi-stream:{}?sid={}&flags={}&sn=0",
        station_id, TUNEIN_SERVICE_ID, TUNEIN_STREAM_FLAGS
    )
}

/// Formats DIDL-Lite metadata identifying a TuneIn station.
///
/// Sonos refuses `x-sonosapi-stream` URIs without matching metadata: the item
/// ID must carry the TuneIn prefix and the `desc` element the service account.
pub(crate) fn tunein_didl_lite(station_id: &str, title: &str) -> String {
    let mut didl = String::from(
        r#"<DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/" xmlns:r="urn:schemas-rinconnetworks-com:metadata-1-0/" xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/">"#,
    );
    didl.push_str(&format!(
        r#"<item id="{}{}" parentID="L" restricted="true">"#,
        TUNEIN_ITEM_PREFIX,
        escape_xml(station_id)
    ));
    didl.push_str(&format!("<dc:title>{}</dc:title>", escape_xml(title)));
    didl.push_str("<upnp:class>object.item.audioItem.audioBroadcast</upnp:class>");
    didl.push_str(&format!(
        r#"<desc id="cdudn" nameSpace="urn:schemas-rinconnetworks-com:metadata-1-0/">{}</desc>"#,
        TUNEIN_SERVICE_DESC
    ));
    didl.push_str("</item></DIDL-Lite>");
    didl
}

/// Commands a coordinator to stream a TuneIn station.
///
/// Sets the transport URI with station metadata, then sends Play.
///
/// # Arguments
/// * `client` - The HTTP client to use for the request
/// * `ip` - IP address of the group coordinator
/// * `station_id` - TuneIn station identifier (e.g. `s218325`)
/// * `title` - Label shown in the Sonos apps
pub async fn play_tunein_radio(
    client: &Client,
    ip: &str,
    station_id: &str,
    title: &str,
) -> SoapResult<()> {
    let uri = tunein_stream_uri(station_id);
    let metadata = tunein_didl_lite(station_id, title);

    log::info!("[Sonos] SetAVTransportURI: ip={}, uri={}", ip, uri);

    SoapRequestBuilder::new(client, ip, SonosService::AVTransport, "SetAVTransportURI")
        .instance_id()
        .arg("CurrentURI", uri)
        .arg("CurrentURIMetaData", metadata)
        .send()
        .await?;

    log::debug!("[Sonos] SetAVTransportURI succeeded, sending Play command");

    SoapRequestBuilder::new(client, ip, SonosService::AVTransport, "Play")
        .instance_id()
        .arg("Speed", "1")
        .send()
        .await?;

    log::info!("[Sonos] Play command succeeded for {}", ip);

    Ok(())
}

/// Stops playback on a Sonos speaker.
///
/// Error 701 ("transition not available") means the speaker is already
/// stopped and is treated as success.
pub async fn stop(client: &Client, ip: &str) -> SoapResult<()> {
    let result = SoapRequestBuilder::new(client, ip, SonosService::AVTransport, "Stop")
        .instance_id()
        .send()
        .await;

    match result {
        Ok(_) => Ok(()),
        Err(e) if e.is_transition_unavailable() => {
            log::debug!(
                "[Sonos] Stop: Speaker {} may already be stopped (ignoring 701)",
                ip
            );
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Reads the current transport state of a speaker.
pub async fn get_transport_state(client: &Client, ip: &str) -> SoapResult<TransportState> {
    let response = SoapRequestBuilder::new(client, ip, SonosService::AVTransport, "GetTransportInfo")
        .instance_id()
        .send()
        .await?;

    extract_xml_text(&response, "CurrentTransportState")
        .map(|raw| TransportState::from_upnp(&raw))
        .ok_or(SoapError::Parse("CurrentTransportState"))
}

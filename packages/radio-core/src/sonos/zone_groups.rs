//! Zone group topology parsing and retrieval.
//!
//! Handles parsing ZoneGroupState XML into structured `ZoneGroup` data
//! and fetching topology from Sonos speakers via SOAP.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use reqwest::Client;

use crate::error::SoapResult;
use crate::sonos::services::SonosService;
use crate::sonos::soap::SoapRequestBuilder;
use crate::sonos::types::{ZoneGroup, ZoneGroupMember};
use crate::sonos::utils::{extract_xml_text, get_xml_attr};

/// Parses ZoneGroupState XML into zone groups, in document order.
///
/// Expects the raw ZoneGroupState XML (already unescaped).
///
/// # Filtering
/// - Zone Bridges (BOOST devices with `IsZoneBridge="1"`) are skipped as they
///   cannot play audio.
/// - Home theater satellites are skipped: they follow their soundbar and
///   cannot be joined or addressed on their own.
/// - Members without UUID or Location are skipped.
/// - Groups left with no members are excluded entirely.
pub fn parse_zone_group_xml(xml: &str) -> Vec<ZoneGroup> {
    let mut groups = Vec::new();
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut current: Option<ZoneGroup> = None;
    // Satellites are nested inside their ZoneGroupMember element
    let mut satellite_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"Satellite" => {
                satellite_depth += 1;
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"Satellite" => {
                satellite_depth = satellite_depth.saturating_sub(1);
            }
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"ZoneGroup" => {
                    current = Some(ZoneGroup {
                        id: get_xml_attr(e, b"ID").unwrap_or_default(),
                        coordinator_uuid: get_xml_attr(e, b"Coordinator").unwrap_or_default(),
                        members: Vec::new(),
                    });
                }
                b"ZoneGroupMember" if satellite_depth == 0 => {
                    if let (Some(group), Some(member)) = (current.as_mut(), parse_member(e)) {
                        group.members.push(member);
                    }
                }
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"ZoneGroup" => {
                if let Some(group) = current.take() {
                    if !group.members.is_empty() {
                        groups.push(group);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("[Sonos] XML parse error in zone groups: {}", e);
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    groups
}

/// Reads one playable member, or `None` for bridges and incomplete entries.
fn parse_member(e: &BytesStart<'_>) -> Option<ZoneGroupMember> {
    if get_xml_attr(e, b"IsZoneBridge").as_deref() == Some("1") {
        return None;
    }

    Some(ZoneGroupMember {
        uuid: get_xml_attr(e, b"UUID")?,
        location: get_xml_attr(e, b"Location")?,
        zone_name: get_xml_attr(e, b"ZoneName").unwrap_or_default(),
    })
}

/// Fetches the current zone groups from a Sonos speaker and parses the topology.
///
/// # Arguments
/// * `client` - The HTTP client to use for the request
/// * `ip` - IP address of any Sonos speaker on the network
pub async fn get_zone_groups(client: &Client, ip: &str) -> SoapResult<Vec<ZoneGroup>> {
    let response = SoapRequestBuilder::new(
        client,
        ip,
        SonosService::ZoneGroupTopology,
        "GetZoneGroupState",
    )
    .send()
    .await?;

    let Some(decoded_xml) = extract_xml_text(&response, "ZoneGroupState") else {
        return Ok(vec![]);
    };

    Ok(parse_zone_group_xml(&decoded_xml))
}

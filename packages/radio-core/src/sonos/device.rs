//! Per-device properties.

use reqwest::Client;

use crate::error::SoapResult;
use crate::sonos::services::SonosService;
use crate::sonos::soap::{SoapError, SoapRequestBuilder};
use crate::sonos::utils::extract_xml_text;

/// Reads the user-configured room name of a speaker (e.g. "Kitchen").
///
/// Never cached: renaming a room in the Sonos app takes effect on the next call.
pub async fn get_zone_name(client: &Client, ip: &str) -> SoapResult<String> {
    let response = SoapRequestBuilder::new(
        client,
        ip,
        SonosService::DeviceProperties,
        "GetZoneAttributes",
    )
    .send()
    .await?;

    extract_xml_text(&response, "CurrentZoneName").ok_or(SoapError::Parse("CurrentZoneName"))
}

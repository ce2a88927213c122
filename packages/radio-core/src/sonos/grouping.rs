//! Group coordination commands for Sonos speakers.
//!
//! Joins a speaker to another group, addressed by a room name the way the
//! Sonos apps present it.

use reqwest::Client;

use crate::error::SoapResult;
use crate::sonos::services::SonosService;
use crate::sonos::soap::{SoapError, SoapRequestBuilder};
use crate::sonos::types::ZoneGroup;
use crate::sonos::zone_groups::get_zone_groups;

/// Finds the coordinator UUID of the group containing a room named `zone_name`.
pub(crate) fn coordinator_uuid_for_zone<'a>(
    groups: &'a [ZoneGroup],
    zone_name: &str,
) -> Option<&'a str> {
    groups
        .iter()
        .find(|g| g.has_member_named(zone_name))
        .map(|g| g.coordinator_uuid.as_str())
}

/// Joins the speaker at `ip` to the group containing the room `zone_name`.
///
/// The target group is resolved from the joining speaker's own topology view,
/// then the speaker's transport is pointed at the coordinator with the
/// x-rincon protocol. The speaker becomes a member that follows the
/// coordinator's playback.
///
/// # Errors
/// [`SoapError::UnknownGroup`] if no group has a room with that name.
pub async fn join_group(client: &Client, ip: &str, zone_name: &str) -> SoapResult<()> {
    let groups = get_zone_groups(client, ip).await?;
    let coordinator_uuid = coordinator_uuid_for_zone(&groups, zone_name)
        .ok_or_else(|| SoapError::UnknownGroup(zone_name.to_string()))?;

    let group_uri = format!("x-rincon:{}", coordinator_uuid);

    log::info!(
        "[Sonos] Joining {} to {:?} (uri: {})",
        ip,
        zone_name,
        group_uri
    );

    SoapRequestBuilder::new(client, ip, SonosService::AVTransport, "SetAVTransportURI")
        .instance_id()
        .arg("CurrentURI", group_uri)
        .arg("CurrentURIMetaData", "")
        .send()
        .await?;

    log::debug!("[Sonos] Join group succeeded for {}", ip);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::group;

    #[test]
    fn join_target_resolves_by_any_member_name() {
        let groups = vec![
            group("10.0.0.1", &["10.0.0.1", "10.0.0.2"]),
            group("10.0.0.3", &["10.0.0.3"]),
        ];

        // test_support names rooms "Room <last octet>"
        assert_eq!(
            coordinator_uuid_for_zone(&groups, "Room 2"),
            Some("RINCON_10_0_0_1")
        );
        assert_eq!(
            coordinator_uuid_for_zone(&groups, "Room 3"),
            Some("RINCON_10_0_0_3")
        );
        assert_eq!(coordinator_uuid_for_zone(&groups, "Garage"), None);
    }
}

//! Per-speaker volume control.
//!
//! Uses RenderingControl rather than GroupRenderingControl: every room gets
//! its own level, independent of the group it ends up in.

use reqwest::Client;

use crate::error::SoapResult;
use crate::sonos::services::SonosService;
use crate::sonos::soap::SoapRequestBuilder;

/// Sets volume on an individual speaker (0-100).
///
/// # Arguments
/// * `client` - The HTTP client to use for the request
/// * `speaker_ip` - IP address of the speaker
/// * `volume` - Desired volume level (0-100, values > 100 are clamped)
pub async fn set_speaker_volume(client: &Client, speaker_ip: &str, volume: u8) -> SoapResult<()> {
    SoapRequestBuilder::new(client, speaker_ip, SonosService::RenderingControl, "SetVolume")
        .instance_id()
        .arg("Channel", "Master")
        .arg("DesiredVolume", clamp_volume(volume).to_string())
        .send()
        .await?;

    Ok(())
}

fn clamp_volume(volume: u8) -> u8 {
    volume.min(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_is_clamped_to_100() {
        assert_eq!(clamp_volume(150), 100);
        assert_eq!(clamp_volume(100), 100);
        assert_eq!(clamp_volume(20), 20);
    }

    #[test]
    fn set_volume_request_shape() {
        let client = Client::new();

        // Same builder chain as set_speaker_volume()
        let envelope = SoapRequestBuilder::new(
            &client,
            "192.168.1.100",
            SonosService::RenderingControl,
            "SetVolume",
        )
        .instance_id()
        .arg("Channel", "Master")
        .arg("DesiredVolume", clamp_volume(75).to_string())
        .envelope();

        assert!(envelope.contains(
            "<InstanceID>0</InstanceID><Channel>Master</Channel><DesiredVolume>75</DesiredVolume>"
        ));
        assert!(envelope.contains("urn:schemas-upnp-org:service:RenderingControl:1"));
    }
}

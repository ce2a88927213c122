//! Device controller: the `status` / `play` / `pause` orchestration.
//!
//! Every operation starts from the cached entry-point device (acquired through
//! the [`Sequencer`] so overlapping requests never discover twice), reads a
//! fresh topology, and fans out SOAP calls across the speakers. Failures drop
//! the cached device so the next operation starts from scratch.
//!
//! # Switching on
//!
//! The first zone group is the "main" group. Every speaker in it gets its
//! volume adjusted; every speaker of every other group joins the main group
//! and gets its volume adjusted. Only when all of that succeeded does the
//! main coordinator start the station. Effects already applied when a
//! sibling fails are kept.

use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use tokio::time::Instant;

use crate::config::{Config, VolumePolicy};
use crate::discovery_cache::DeviceCache;
use crate::error::{RadioError, RadioResult};
use crate::protocol_constants::{STATION_ID, STATION_TITLE};
use crate::runtime::TaskSpawner;
use crate::sequencer::Sequencer;
use crate::sonos::traits::SonosClient;
use crate::sonos::types::{DeviceHandle, TransportState, ZoneGroup};
use crate::topology::{coordinator_of, flatten, members_of, Speaker};

/// Owns the cached device handle and drives every speaker operation.
pub struct DeviceController {
    sonos: Arc<dyn SonosClient>,
    sequencer: Sequencer,
    cache: Arc<DeviceCache>,
    volume_policy: VolumePolicy,
    operation_timeout: Duration,
}

impl DeviceController {
    /// Creates a controller; the sequencer consumer is spawned on `spawner`.
    pub fn new<S: TaskSpawner>(sonos: Arc<dyn SonosClient>, config: &Config, spawner: &S) -> Self {
        Self {
            sonos,
            sequencer: Sequencer::new(spawner),
            cache: Arc::new(DeviceCache::new(config.device_ttl())),
            volume_policy: config.volume_policy(),
            operation_timeout: config.operation_timeout(),
        }
    }

    /// Returns true if any group coordinator is playing.
    ///
    /// # Errors
    /// Any discovery, SOAP or topology failure, or the operation timeout.
    /// The cached device is dropped before the error is returned.
    pub async fn status(&self) -> RadioResult<bool> {
        let result = self.bounded(self.query_playing()).await;
        if let Err(e) = &result {
            log::error!("[Radio] Failed to get status: {} ({})", e, e.code());
            self.cache.invalidate();
        }
        result
    }

    /// Merges every group into the main one and starts the station.
    ///
    /// Never fails: errors are logged and drop the cached device.
    pub async fn play(&self) {
        log::info!("[Radio] Starting {}", STATION_TITLE);
        if let Err(e) = self.bounded(self.start_station()).await {
            log::error!("[Radio] Failed to start {}: {} ({})", STATION_TITLE, e, e.code());
            self.cache.invalidate();
        }
    }

    /// Stops every group.
    ///
    /// Never fails: errors are logged and drop the cached device.
    pub async fn pause(&self) {
        log::info!("[Radio] Stopping {}", STATION_TITLE);
        if let Err(e) = self.bounded(self.stop_all()).await {
            log::error!("[Radio] Failed to stop {}: {} ({})", STATION_TITLE, e, e.code());
            self.cache.invalidate();
        }
    }

    async fn bounded<T>(
        &self,
        operation: impl std::future::Future<Output = RadioResult<T>>,
    ) -> RadioResult<T> {
        tokio::time::timeout(self.operation_timeout, operation)
            .await
            .unwrap_or_else(|_| Err(RadioError::Timeout(self.operation_timeout.as_secs())))
    }

    /// Acquires the entry-point device on the sequencer's timeline.
    async fn device(&self) -> RadioResult<DeviceHandle> {
        let sonos = Arc::clone(&self.sonos);
        let cache = Arc::clone(&self.cache);
        let limit = self.operation_timeout;

        self.sequencer
            .queue(move || async move {
                tokio::time::timeout(limit, cache.acquire(sonos.as_ref()))
                    .await
                    .unwrap_or_else(|_| Err(RadioError::Timeout(limit.as_secs())))
            })
            .await?
    }

    async fn zone_groups(&self) -> RadioResult<Vec<ZoneGroup>> {
        let device = self.device().await?;
        Ok(self.sonos.get_zone_groups(&device.ip).await?)
    }

    async fn query_playing(&self) -> RadioResult<bool> {
        let groups = self.zone_groups().await?;
        let coordinators = groups
            .iter()
            .map(coordinator_of)
            .collect::<RadioResult<Vec<_>>>()?;

        let states = try_join_all(
            coordinators
                .iter()
                .map(|c| self.sonos.get_transport_state(c.host())),
        )
        .await?;

        let summary: Vec<String> = coordinators
            .iter()
            .zip(&states)
            .map(|(c, s)| format!("{}={}", c, s))
            .collect();
        log::info!("[Radio] Current states: [{}]", summary.join(", "));

        Ok(states.iter().any(TransportState::is_playing))
    }

    async fn start_station(&self) -> RadioResult<()> {
        let groups = self.zone_groups().await?;
        let Some((main, others)) = groups.split_first() else {
            log::warn!("[Radio] No hardware found");
            return Ok(());
        };

        let main_coordinator = coordinator_of(main)?;
        let main_members = members_of(main)?;
        let other_members = flatten(
            others
                .iter()
                .map(members_of)
                .collect::<RadioResult<Vec<_>>>()?,
        );

        let adjust_main = try_join_all(main_members.iter().map(|s| self.adjust_volume(s)));
        let merge_others = async {
            if other_members.is_empty() {
                return Ok(());
            }
            let group_name = self.sonos.get_zone_name(main_coordinator.host()).await?;
            try_join_all(
                other_members
                    .iter()
                    .map(|s| self.join_and_adjust(s, &group_name)),
            )
            .await?;
            Ok::<(), RadioError>(())
        };
        tokio::try_join!(adjust_main, merge_others)?;

        self.sonos
            .play_tunein_radio(main_coordinator.host(), STATION_ID, STATION_TITLE)
            .await?;
        log::info!(
            "[Radio] {} playing on {} ({} speaker(s))",
            STATION_TITLE,
            main_coordinator,
            main_members.len() + other_members.len()
        );
        Ok(())
    }

    async fn stop_all(&self) -> RadioResult<()> {
        let groups = self.zone_groups().await?;
        let coordinators = groups
            .iter()
            .map(coordinator_of)
            .collect::<RadioResult<Vec<_>>>()?;

        try_join_all(coordinators.iter().map(|c| self.sonos.stop(c.host()))).await?;
        log::info!("[Radio] Stopped {} group(s)", coordinators.len());
        Ok(())
    }

    /// Sets the speaker to the level its room name calls for.
    async fn adjust_volume(&self, speaker: &Speaker) -> RadioResult<()> {
        let started = Instant::now();
        let name = self.sonos.get_zone_name(speaker.host()).await?;
        let volume = self.volume_policy.volume_for(&name);
        self.sonos.set_speaker_volume(speaker.host(), volume).await?;
        log::info!(
            "[Radio] [{}] Took {}ms to adjust volume of {:?} to {}",
            speaker,
            started.elapsed().as_millis(),
            name,
            volume
        );
        Ok(())
    }

    async fn join_and_adjust(&self, speaker: &Speaker, group_name: &str) -> RadioResult<()> {
        let join = async {
            let started = Instant::now();
            self.sonos.join_group(speaker.host(), group_name).await?;
            log::info!(
                "[Radio] [{}] Took {}ms to join group {:?}",
                speaker,
                started.elapsed().as_millis(),
                group_name
            );
            Ok::<(), RadioError>(())
        };
        tokio::try_join!(join, self.adjust_volume(speaker))?;
        Ok(())
    }
}

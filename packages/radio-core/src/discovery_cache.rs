//! Lazily discovered entry-point device with a bounded reuse age.
//!
//! Discovery is slow (an SSDP round trip of up to several seconds) and the
//! household topology rarely changes, so the handle is reused for up to a TTL.
//! Any operational failure drops it: the next operation starts from a fresh
//! discovery.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::error::RadioResult;
use crate::sonos::traits::SonosDiscovery;
use crate::sonos::types::DeviceHandle;

#[derive(Debug, Clone)]
struct CachedDevice {
    handle: DeviceHandle,
    discovered_at: Instant,
}

/// Holds at most one discovered device handle.
#[derive(Debug)]
pub struct DeviceCache {
    ttl: Duration,
    slot: Mutex<Option<CachedDevice>>,
}

impl DeviceCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Returns the cached handle if it is at most `ttl` old at `now`.
    ///
    /// A stale entry is cleared as a side effect.
    pub fn fresh(&self, now: Instant) -> Option<DeviceHandle> {
        let mut slot = self.slot.lock();
        match slot.as_ref() {
            Some(cached) if now.saturating_duration_since(cached.discovered_at) <= self.ttl => {
                Some(cached.handle.clone())
            }
            Some(_) => {
                log::debug!("[Radio] Cached device expired");
                *slot = None;
                None
            }
            None => None,
        }
    }

    pub fn store(&self, handle: DeviceHandle, now: Instant) {
        *self.slot.lock() = Some(CachedDevice {
            handle,
            discovered_at: now,
        });
    }

    /// Drops the cached handle, if any.
    pub fn invalidate(&self) {
        if self.slot.lock().take().is_some() {
            log::debug!("[Radio] Cached device invalidated");
        }
    }

    pub fn is_cached(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Returns a fresh cached handle or discovers a new one.
    ///
    /// Must only run inside a sequenced task: two concurrent callers would
    /// both discover. A failed discovery leaves the cache empty.
    pub async fn acquire<D>(&self, discovery: &D) -> RadioResult<DeviceHandle>
    where
        D: SonosDiscovery + ?Sized,
    {
        if let Some(handle) = self.fresh(Instant::now()) {
            log::debug!("[Radio] Reusing cached device {}", handle.ip);
            return Ok(handle);
        }

        log::info!("[Radio] Discovering devices...");
        let started = Instant::now();
        let handle = discovery.discover_device().await?;
        log::info!(
            "[Radio] Found device {} in {}ms",
            handle.ip,
            started.elapsed().as_millis()
        );

        self.store(handle.clone(), Instant::now());
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockSonos;

    const TTL: Duration = Duration::from_secs(120);

    #[tokio::test(start_paused = true)]
    async fn handle_is_reused_until_ttl_elapses() {
        let mock = MockSonos::new();
        let cache = DeviceCache::new(TTL);

        cache.acquire(&mock).await.unwrap();
        assert_eq!(mock.discover_count(), 1);

        tokio::time::advance(TTL - Duration::from_millis(1)).await;
        cache.acquire(&mock).await.unwrap();
        assert_eq!(mock.discover_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_handle_is_rediscovered() {
        let mock = MockSonos::new();
        let cache = DeviceCache::new(TTL);

        cache.acquire(&mock).await.unwrap();
        tokio::time::advance(TTL + Duration::from_millis(1)).await;
        cache.acquire(&mock).await.unwrap();

        assert_eq!(mock.discover_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_clears_expired_entry() {
        let cache = DeviceCache::new(TTL);
        let t0 = Instant::now();
        cache.store(DeviceHandle::from_ip("10.0.0.1"), t0);

        assert!(cache.fresh(t0 + TTL).is_some());
        assert!(cache.fresh(t0 + TTL + Duration::from_millis(1)).is_none());
        assert!(!cache.is_cached());
    }

    #[tokio::test]
    async fn failed_discovery_leaves_cache_empty() {
        let mock = MockSonos::new();
        mock.fail_discovery(true);
        let cache = DeviceCache::new(TTL);

        let err = cache.acquire(&mock).await.unwrap_err();
        assert_eq!(err.code(), "no_devices_found");
        assert!(!cache.is_cached());
    }

    #[tokio::test]
    async fn invalidate_forces_rediscovery() {
        let mock = MockSonos::new();
        let cache = DeviceCache::new(TTL);

        cache.acquire(&mock).await.unwrap();
        cache.invalidate();
        assert!(!cache.is_cached());

        cache.acquire(&mock).await.unwrap();
        assert_eq!(mock.discover_count(), 2);
    }
}

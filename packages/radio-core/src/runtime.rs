//! Background work without a hard dependency on one runtime.
//!
//! The [`Sequencer`](crate::sequencer::Sequencer) needs one long-lived consumer
//! task and the [`RadioSwitch`](crate::accessory::RadioSwitch) fires on/off
//! requests without awaiting them. Both go through [`TaskSpawner`] so a host
//! can route that work onto whatever runtime it already owns.
//!
//! [`TrackedSpawner`] additionally remembers what it spawned, so a host that is
//! about to exit can wait for pending on/off requests instead of cutting them
//! off.

use std::future::Future;
use std::time::Duration;

use tokio_util::task::TaskTracker;

/// Runs detached futures on behalf of the controller.
///
/// A spawned future must keep running after the spawner value is dropped:
/// the sequencer's consumer lives as long as its channel, not its spawner.
pub trait TaskSpawner: Send + Sync {
    /// Detaches `future`; there is no handle to join or cancel it.
    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// [`TaskSpawner`] over a Tokio runtime handle.
#[derive(Clone)]
pub struct TokioSpawner {
    handle: tokio::runtime::Handle,
}

impl TokioSpawner {
    /// Spawns onto the runtime behind `handle`.
    #[must_use]
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Spawns onto the runtime this is called from.
    ///
    /// # Panics
    /// Outside of a Tokio runtime context.
    #[must_use]
    pub fn current() -> Self {
        Self {
            handle: tokio::runtime::Handle::current(),
        }
    }
}

impl TaskSpawner for TokioSpawner {
    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(future);
    }
}

/// [`TaskSpawner`] that tracks its tasks so they can be drained at shutdown.
///
/// Do not hand it to the sequencer: its consumer never finishes, so
/// [`drain`](Self::drain) would always run into the limit.
#[derive(Clone)]
pub struct TrackedSpawner {
    handle: tokio::runtime::Handle,
    tracker: TaskTracker,
}

impl TrackedSpawner {
    /// Spawns onto the runtime this is called from.
    ///
    /// # Panics
    /// Outside of a Tokio runtime context.
    #[must_use]
    pub fn current() -> Self {
        Self {
            handle: tokio::runtime::Handle::current(),
            tracker: TaskTracker::new(),
        }
    }

    /// Number of spawned tasks that have not finished yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Waits up to `limit` for every spawned task to finish.
    ///
    /// Returns `false` if tasks were still running when `limit` elapsed.
    /// Tasks spawned while draining are waited for too.
    pub async fn drain(&self, limit: Duration) -> bool {
        self.tracker.close();
        tokio::time::timeout(limit, self.tracker.wait()).await.is_ok()
    }
}

impl TaskSpawner for TrackedSpawner {
    fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tracker.spawn_on(future, &self.handle);
    }
}

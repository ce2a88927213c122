//! FIFO serialization of asynchronous tasks.
//!
//! A bridge may ask for the current state while a previous "turn on" is still
//! discovering devices. The [`Sequencer`] puts such requests on one timeline:
//! each queued task starts only after the one before it has settled, whether
//! that task succeeded, failed, or panicked.
//!
//! Internally this is a single-consumer channel. Tasks are enqueued at the
//! moment [`Sequencer::queue`] is called, so submission order is call order
//! even if the returned futures are polled in a different order.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;

use futures::FutureExt;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::runtime::TaskSpawner;

/// Errors returned to the submitter of a queued task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequencerError {
    /// The consumer task is gone; nothing can be queued anymore.
    #[error("sequencer is closed")]
    Closed,

    /// The task panicked before producing a result.
    #[error("queued task aborted before completing")]
    TaskAborted,
}

type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Runs queued async tasks one at a time, in submission order.
///
/// No priority, no cancellation. A task that never settles stalls every task
/// queued after it, so callers should bound their own work (the controller
/// wraps queued discovery in a timeout).
pub struct Sequencer {
    jobs: mpsc::UnboundedSender<Job>,
}

impl Sequencer {
    /// Creates a sequencer and spawns its consumer on `spawner`.
    pub fn new<S: TaskSpawner>(spawner: &S) -> Self {
        let (jobs, mut rx) = mpsc::unbounded_channel::<Job>();

        spawner.spawn(async move {
            while let Some(job) = rx.recv().await {
                job.await;
            }
            log::debug!("[Sequencer] Queue closed");
        });

        Self { jobs }
    }

    /// Queues `task` behind everything submitted before it.
    ///
    /// The task is enqueued immediately; the returned future only waits for
    /// its result. Dropping the returned future does not remove the task from
    /// the queue.
    pub fn queue<F, Fut, T>(&self, task: F) -> impl Future<Output = Result<T, SequencerError>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();

        let job: Job = Box::pin(async move {
            match AssertUnwindSafe(async move { task().await })
                .catch_unwind()
                .await
            {
                Ok(value) => {
                    // Submitter may have stopped waiting; the result is simply dropped
                    let _ = done_tx.send(value);
                }
                Err(_) => log::error!("[Sequencer] Queued task panicked"),
            }
        });

        let enqueued = self.jobs.send(job).is_ok();

        async move {
            if !enqueued {
                return Err(SequencerError::Closed);
            }
            done_rx.await.map_err(|_| SequencerError::TaskAborted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::TokioSpawner;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    fn sequencer() -> Sequencer {
        Sequencer::new(&TokioSpawner::current())
    }

    #[tokio::test(start_paused = true)]
    async fn completion_order_matches_submission_order() {
        let seq = sequencer();
        let finished = Arc::new(Mutex::new(Vec::new()));

        // Divergent latencies: early tasks are the slowest
        let latencies_ms = [90u64, 5, 40, 0, 70, 10, 25, 60];
        let mut pending = Vec::new();
        for (i, ms) in latencies_ms.into_iter().enumerate() {
            let finished = Arc::clone(&finished);
            pending.push(seq.queue(move || async move {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                finished.lock().push(i);
                if i % 3 == 0 {
                    Err(format!("task {i} failed"))
                } else {
                    Ok(i)
                }
            }));
        }

        let results = futures::future::join_all(pending).await;

        assert_eq!(*finished.lock(), (0..latencies_ms.len()).collect::<Vec<_>>());
        for (i, result) in results.into_iter().enumerate() {
            let outcome = result.expect("task should not be aborted");
            assert_eq!(outcome.is_err(), i % 3 == 0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn task_starts_only_after_previous_settles() {
        let seq = sequencer();
        let running = Arc::new(Mutex::new(0usize));
        let max_running = Arc::new(Mutex::new(0usize));

        let mut pending = Vec::new();
        for _ in 0..5 {
            let running = Arc::clone(&running);
            let max_running = Arc::clone(&max_running);
            pending.push(seq.queue(move || async move {
                {
                    let mut r = running.lock();
                    *r += 1;
                    let mut m = max_running.lock();
                    *m = (*m).max(*r);
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
                *running.lock() -= 1;
            }));
        }

        futures::future::join_all(pending).await;
        assert_eq!(*max_running.lock(), 1);
    }

    #[tokio::test]
    async fn panicking_task_does_not_poison_queue() {
        let seq = sequencer();

        let explode = true;
        let first = seq.queue(move || async move {
            if explode {
                panic!("boom");
            }
        });
        let second = seq.queue(|| async { 42 });

        assert_eq!(first.await, Err(SequencerError::TaskAborted));
        assert_eq!(second.await, Ok(42));
    }

    #[tokio::test]
    async fn dropped_waiter_does_not_cancel_task() {
        let seq = sequencer();
        let ran = Arc::new(Mutex::new(false));

        let ran_clone = Arc::clone(&ran);
        drop(seq.queue(move || async move {
            *ran_clone.lock() = true;
        }));

        // Queued after the dropped one, so it observes its side effect
        let observed = seq.queue({
            let ran = Arc::clone(&ran);
            move || async move { *ran.lock() }
        });

        assert_eq!(observed.await, Ok(true));
    }
}

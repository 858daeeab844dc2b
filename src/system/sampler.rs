use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::collector::Collector;
use super::provider::{MetricsProvider, SysinfoProvider};
use crate::shutdown::Shutdown;
use crate::stream::{Publish, SnapshotSender};

/// Floor applied to a zero sampling interval.
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

type SharedCollector<P> = Arc<Mutex<Collector<P>>>;

struct Running {
    shutdown: Shutdown,
    task: JoinHandle<()>,
}

/// Periodic producer of snapshots.
///
/// `start` spawns one sampling task on the current tokio runtime. Provider
/// reads block, so each tick's collection runs on the blocking pool and never
/// on the thread that handles input and rendering. `stop` signals the task and
/// waits for it without waiting on a read still in flight; the collector and
/// its network baselines survive for the next `start`.
pub struct Sampler<P: MetricsProvider = SysinfoProvider> {
    collector: SharedCollector<P>,
    running: Option<Running>,
}

impl<P: MetricsProvider> Sampler<P> {
    pub fn new(collector: Collector<P>) -> Self {
        Sampler {
            collector: Arc::new(Mutex::new(collector)),
            running: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| !running.task.is_finished())
    }

    /// Starts sampling every `interval` into `sender`. A no-op while running.
    pub fn start(&mut self, interval: Duration, sender: SnapshotSender) {
        if self.is_running() {
            debug!("sampler already running; ignoring start");
            return;
        }

        let interval = if interval.is_zero() {
            warn!(
                min_ms = MIN_INTERVAL.as_millis() as u64,
                "zero sampling interval clamped"
            );
            MIN_INTERVAL
        } else {
            interval
        };

        let shutdown = Shutdown::new();
        let task = tokio::spawn(sample_loop(
            Arc::clone(&self.collector),
            interval,
            sender,
            shutdown.clone(),
        ));
        info!(interval_ms = interval.as_millis() as u64, "sampler started");
        self.running = Some(Running { shutdown, task });
    }

    /// Stops sampling and closes the stream. Safe to call any number of times.
    pub async fn stop(&mut self) {
        let Some(Running { shutdown, task }) = self.running.take() else {
            return;
        };
        shutdown.trigger();
        match task.await {
            Ok(()) => info!("sampler stopped"),
            Err(err) => warn!(error = %err, "sampling task ended abnormally"),
        }
    }
}

impl<P: MetricsProvider> Drop for Sampler<P> {
    fn drop(&mut self) {
        if let Some(running) = &self.running {
            running.shutdown.trigger();
            running.task.abort();
        }
    }
}

fn lock<P>(collector: &Mutex<Collector<P>>) -> MutexGuard<'_, Collector<P>> {
    // A panicking provider leaves the baselines usable.
    collector.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn sample_loop<P: MetricsProvider>(
    collector: SharedCollector<P>,
    interval: Duration,
    sender: SnapshotSender,
    shutdown: Shutdown,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut published: u64 = 0;
    let mut discarded: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = shutdown.triggered() => break,
            _ = ticker.tick() => {}
        }

        let job = {
            let collector = Arc::clone(&collector);
            tokio::task::spawn_blocking(move || lock(&collector).collect())
        };
        // An in-flight read is left to finish on its own; its result is dropped.
        let collected = tokio::select! {
            biased;
            _ = shutdown.triggered() => break,
            joined = job => joined,
        };

        let snapshot = match collected {
            Ok(Ok(snapshot)) => snapshot,
            Ok(Err(err)) => {
                discarded += 1;
                warn!(error = %err, "discarding sampling tick");
                continue;
            }
            Err(err) => {
                discarded += 1;
                warn!(error = %err, "metrics collection aborted");
                continue;
            }
        };

        match sender.publish(snapshot, &shutdown).await {
            Publish::Published => published += 1,
            Publish::Abandoned => break,
            Publish::Closed => {
                debug!("snapshot consumer went away");
                break;
            }
        }
    }

    debug!(published, discarded, "sampling task finished");
}

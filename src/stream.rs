use tokio::sync::mpsc::{self, error::TryRecvError};

use crate::shutdown::Shutdown;
use crate::system::snapshot::Snapshot;

pub const DEFAULT_CAPACITY: usize = 10;

/// Creates the bounded hand-off between the sampler and the scheduler.
///
/// A full buffer makes the producer wait, so a slow consumer slows sampling
/// down instead of growing memory. A zero capacity is raised to 1.
pub fn stream_buffer(capacity: usize) -> (SnapshotSender, SnapshotReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (SnapshotSender { tx }, SnapshotReceiver { rx })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Publish {
    Published,
    /// The consumer closed or dropped its end.
    Closed,
    /// Shutdown fired before the snapshot could be enqueued.
    Abandoned,
}

#[derive(Debug)]
pub struct SnapshotSender {
    tx: mpsc::Sender<Snapshot>,
}

impl SnapshotSender {
    /// Waits for free capacity unless `shutdown` fires first.
    pub async fn publish(&self, snapshot: Snapshot, shutdown: &Shutdown) -> Publish {
        tokio::select! {
            biased;
            _ = shutdown.triggered() => Publish::Abandoned,
            sent = self.tx.send(snapshot) => match sent {
                Ok(()) => Publish::Published,
                Err(_) => Publish::Closed,
            },
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }
}

/// Outcome of a non-blocking receive.
#[derive(Debug)]
pub enum Recv {
    Item(Snapshot),
    /// Nothing queued yet, but the producer is still alive.
    Empty,
    /// Producer gone and every queued snapshot has been drained.
    Closed,
}

#[derive(Debug)]
pub struct SnapshotReceiver {
    rx: mpsc::Receiver<Snapshot>,
}

impl SnapshotReceiver {
    /// Next snapshot in publish order, or `None` once closed and drained.
    pub async fn recv(&mut self) -> Option<Snapshot> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Recv {
        match self.rx.try_recv() {
            Ok(snapshot) => Recv::Item(snapshot),
            Err(TryRecvError::Empty) => Recv::Empty,
            Err(TryRecvError::Disconnected) => Recv::Closed,
        }
    }

    /// Stops accepting new snapshots. Already queued ones can still be drained.
    pub fn close(&mut self) {
        self.rx.close();
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Drains whatever is queued right now without waiting.
    pub fn drain(&mut self) -> Vec<Snapshot> {
        let mut out = Vec::with_capacity(self.len());
        while let Recv::Item(snapshot) = self.try_recv() {
            out.push(snapshot);
        }
        out
    }
}

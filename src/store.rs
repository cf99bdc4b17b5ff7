//! Access to the transaction store.
//!
//! The store itself (the cloud document database) is outside this crate. What the core sees is a
//! `SnapshotSource`: something that can hand over the complete current working set and tell
//! whether a newer one is available. `watch` turns a source into a stream of snapshot deliveries.

use crate::model::Snapshot;
use crate::{utils, Result};
use anyhow::Context;
use async_trait::async_trait;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

/// Changes whenever the source has a new snapshot to deliver.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Revision {
    /// The file's metadata plus a hash of its contents, so a rewrite that keeps the length and
    /// lands within one mtime tick is still seen.
    File {
        modified: SystemTime,
        len: u64,
        digest: u64,
    },
    Counter(u64),
}

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Returns the complete current working set.
    async fn snapshot(&self) -> Result<Snapshot>;

    /// Returns a token that differs from the previous one whenever `snapshot` would return
    /// different data.
    async fn revision(&self) -> Result<Revision>;
}

/// Reads snapshots from a JSON export of the store, keyed by transaction id.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    owner: Option<String>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, owner: Option<String>) -> Self {
        Self {
            path: path.into(),
            owner,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn snapshot(&self) -> Result<Snapshot> {
        let json = utils::read(&self.path).await?;
        let snapshot = Snapshot::parse_json(&json, self.owner.as_deref())
            .with_context(|| format!("Unable to load the snapshot {}", self.path.display()))?;
        debug!(
            "Loaded {} transactions from {} ({} skipped, {} other owners)",
            snapshot.len(),
            self.path.display(),
            snapshot.skipped(),
            snapshot.foreign()
        );
        Ok(snapshot)
    }

    async fn revision(&self) -> Result<Revision> {
        let (modified, len) = utils::stamp(&self.path).await?;
        let digest = utils::digest(&self.path).await?;
        Ok(Revision::File {
            modified,
            len,
            digest,
        })
    }
}

/// An in-memory source whose snapshot can be replaced at any time.
#[derive(Debug, Default)]
pub struct MemorySource {
    snapshot: Mutex<Snapshot>,
    counter: AtomicU64,
}

impl MemorySource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            counter: AtomicU64::new(0),
        }
    }

    /// Replaces the held snapshot wholesale.
    pub fn replace(&self, snapshot: Snapshot) {
        match self.snapshot.lock() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => *poisoned.into_inner() = snapshot,
        }
        self.counter.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SnapshotSource for MemorySource {
    async fn snapshot(&self) -> Result<Snapshot> {
        let guard = self
            .snapshot
            .lock()
            .map_err(|_| anyhow::anyhow!("The in-memory snapshot lock is poisoned"))?;
        Ok(guard.clone())
    }

    async fn revision(&self) -> Result<Revision> {
        Ok(Revision::Counter(self.counter.load(Ordering::SeqCst)))
    }
}

/// Polls `source` every `interval` and calls `on_snapshot` with each new snapshot, starting with
/// the current one. Returns the number of deliveries once `stop` completes.
///
/// A failed poll is logged and retried on the next tick; the last good snapshot stays in effect.
pub async fn watch<S, F, Fut>(
    source: &S,
    interval: Duration,
    stop: Fut,
    mut on_snapshot: F,
) -> Result<usize>
where
    S: SnapshotSource + ?Sized,
    F: FnMut(&Snapshot),
    Fut: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    tokio::pin!(stop);

    let mut last: Option<Revision> = None;
    let mut deliveries = 0;
    loop {
        tokio::select! {
            _ = &mut stop => break,
            _ = ticker.tick() => {
                let revision = match source.revision().await {
                    Ok(r) => r,
                    Err(e) => {
                        warn!("Unable to check the snapshot for changes: {e:#}");
                        continue;
                    }
                };
                if last == Some(revision) {
                    continue;
                }
                match source.snapshot().await {
                    Ok(snapshot) => {
                        last = Some(revision);
                        deliveries += 1;
                        info!("Received snapshot with {} transactions", snapshot.len());
                        on_snapshot(&snapshot);
                    }
                    Err(e) => warn!("Unable to load the new snapshot: {e:#}"),
                }
            }
        }
    }
    Ok(deliveries)
}

//! Watcher - offers ファイルの変更検知
//!
//! mtime と長さを `poll_interval` ごとに見て、変化が `debounce` の間
//! 落ち着いたら `Trigger::FileChanged` を出す。
//! 中身が空（`[]`、つまり自分で clear した直後）のときは出さない。

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};

use crate::store::is_cleared;

use super::triggers::{Trigger, TriggerSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSignature {
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl FileSignature {
    /// `None` when the file does not exist (or cannot be stat'ed).
    pub async fn of(path: &Path) -> Option<Self> {
        let meta = tokio::fs::metadata(path).await.ok()?;
        Some(Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

/// Debounce state: a change counts once the signature has held still for
/// `debounce`.
#[derive(Debug)]
pub struct StabilityTracker {
    last: Option<FileSignature>,
    changed_at: Option<Instant>,
    debounce: Duration,
}

impl StabilityTracker {
    pub fn new(initial: Option<FileSignature>, debounce: Duration) -> Self {
        Self {
            last: initial,
            changed_at: None,
            debounce,
        }
    }

    /// Feed one sample. True exactly once per settled change to an existing file.
    pub fn observe(&mut self, signature: Option<FileSignature>, now: Instant) -> bool {
        if signature != self.last {
            self.last = signature;
            self.changed_at = Some(now);
            return false;
        }

        match self.changed_at {
            Some(at) if now.duration_since(at) >= self.debounce => {
                self.changed_at = None;
                self.last.is_some()
            }
            _ => false,
        }
    }
}

/// Poll `path` until shutdown, firing `Trigger::FileChanged` on settled writes.
pub async fn run_watcher(
    path: PathBuf,
    debounce: Duration,
    poll_interval: Duration,
    sender: TriggerSender,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut tracker = StabilityTracker::new(FileSignature::of(&path).await, debounce);
    let mut ticks = tokio::time::interval(poll_interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(path = %path.display(), "watching offers file");

    loop {
        if *shutdown.borrow() {
            break;
        }
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = ticks.tick() => {
                let signature = FileSignature::of(&path).await;
                if tracker.observe(signature, Instant::now()) && has_pending_offers(&path).await {
                    tracing::info!(path = %path.display(), "offers file changed");
                    sender.fire(Trigger::FileChanged);
                }
            }
        }
    }
}

async fn has_pending_offers(path: &Path) -> bool {
    match tokio::fs::read(path).await {
        Ok(bytes) => !is_cleared(&bytes),
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "changed file unreadable, ignoring");
            false
        }
    }
}

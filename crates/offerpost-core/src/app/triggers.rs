//! Triggers - 処理パスを起動するきっかけ
//!
//! startup / ファイル変更 / 定期実行 の 3 種類を 1 本のチャネルに集約し、
//! 単一の worker が順番に `Orchestrator::process_new_offers` を呼ぶ。
//!
//! # 重なり
//! チャネル容量は 1。実行中に来た trigger は 1 つだけ保留され、
//! それ以上は捨てる（保留中のパスが最新のファイルを読むので十分）。

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};

use super::orchestrator::Orchestrator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    FileChanged,
    Scheduled,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Trigger::Startup => "startup",
            Trigger::FileChanged => "file-changed",
            Trigger::Scheduled => "scheduled",
        })
    }
}

#[derive(Debug, Clone)]
pub struct TriggerSender(mpsc::Sender<Trigger>);

impl TriggerSender {
    /// Queue a pass. Returns false when one is already pending (coalesced)
    /// or the worker is gone.
    pub fn fire(&self, trigger: Trigger) -> bool {
        match self.0.try_send(trigger) {
            Ok(()) => {
                tracing::debug!(%trigger, "pass queued");
                true
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::debug!(%trigger, "pass already pending, coalesced");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(%trigger, "worker stopped, trigger dropped");
                false
            }
        }
    }
}

pub fn trigger_channel() -> (TriggerSender, mpsc::Receiver<Trigger>) {
    let (tx, rx) = mpsc::channel(1);
    (TriggerSender(tx), rx)
}

/// Run passes one at a time until shutdown or until every sender is gone.
///
/// A pass already in progress is allowed to finish.
pub async fn run_worker(
    orchestrator: Arc<Orchestrator>,
    mut triggers: mpsc::Receiver<Trigger>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        if *shutdown.borrow() {
            break;
        }

        let trigger = tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
            trigger = triggers.recv() => trigger,
        };

        let Some(trigger) = trigger else {
            break;
        };

        tracing::info!(%trigger, "starting pass");
        orchestrator.process_new_offers().await;
    }
    tracing::debug!("trigger worker stopped");
}

/// Fire `Trigger::Scheduled` every `every`, first tick one period from now.
pub async fn run_schedule(
    every: Duration,
    sender: TriggerSender,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticks = tokio::time::interval_at(Instant::now() + every, every);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

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
                sender.fire(Trigger::Scheduled);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_holds_one_pending_trigger() {
        let (sender, mut rx) = trigger_channel();

        assert!(sender.fire(Trigger::Startup));
        assert!(!sender.fire(Trigger::FileChanged));
        assert!(!sender.fire(Trigger::Scheduled));

        assert_eq!(rx.recv().await, Some(Trigger::Startup));
        assert!(rx.try_recv().is_err());
        assert!(sender.fire(Trigger::FileChanged));
    }

    #[tokio::test]
    async fn fire_after_worker_gone_is_dropped() {
        let (sender, rx) = trigger_channel();
        drop(rx);
        assert!(!sender.fire(Trigger::Startup));
    }

    #[tokio::test(start_paused = true)]
    async fn schedule_fires_after_each_period() {
        let (sender, mut rx) = trigger_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let every = Duration::from_secs(12 * 60 * 60);
        let started = Instant::now();

        let schedule = tokio::spawn(run_schedule(every, sender, shutdown_rx));

        assert_eq!(rx.recv().await, Some(Trigger::Scheduled));
        assert!(started.elapsed() >= every);
        assert_eq!(rx.recv().await, Some(Trigger::Scheduled));
        assert!(started.elapsed() >= every * 2);

        shutdown_tx.send(true).unwrap();
        schedule.await.unwrap();
    }

    #[test]
    fn trigger_names() {
        assert_eq!(Trigger::FileChanged.to_string(), "file-changed");
        assert_eq!(Trigger::Scheduled.to_string(), "scheduled");
    }
}

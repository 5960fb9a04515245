//! Orchestrator - 1 回の処理パス
//!
//! offers を読み込み、ledger に無いものを順番に Publisher へ渡し、
//! 最後に offers ファイルを必ず `[]` に戻す。
//!
//! # 直列化
//! `run_lock` でパス全体を排他する。ledger への書き込みもこのロックの内側だけで起きる。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::domain::{Offer, OfferId, PublishOutcome};
use crate::observability::RunSummary;
use crate::store::{Ledger, OfferStore};

use super::publisher::Publisher;

pub struct Orchestrator {
    store: OfferStore,
    ledger: Arc<Ledger>,
    publisher: Publisher,
    between_offers: Duration,
    run_lock: Mutex<()>,
}

impl Orchestrator {
    pub fn new(
        store: OfferStore,
        ledger: Arc<Ledger>,
        publisher: Publisher,
        between_offers: Duration,
    ) -> Self {
        Self {
            store,
            ledger,
            publisher,
            between_offers,
            run_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &OfferStore {
        &self.store
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Drain the offers file once.
    ///
    /// Offers are handled strictly one at a time, with a fixed pause between
    /// consecutive offers whatever their outcome. Failed offers are not
    /// requeued: the file is cleared whatever happened to them.
    pub async fn process_new_offers(&self) -> RunSummary {
        let _running = self.run_lock.lock().await;

        let offers = self.store.load_offers().await;
        let mut summary = RunSummary {
            total: offers.len(),
            ..RunSummary::default()
        };

        for (index, offer) in offers.iter().enumerate() {
            let outcome = self.process_one(offer).await;
            summary.record(&outcome);

            if index + 1 < offers.len() {
                tokio::time::sleep(self.between_offers).await;
            }
        }

        if let Err(err) = self.store.clear().await {
            tracing::error!(error = %err, "failed to clear offers file");
        }

        tracing::info!(
            total = summary.total,
            published = summary.published,
            skipped = summary.skipped,
            failed = summary.failed,
            "pass finished"
        );
        summary
    }

    async fn process_one(&self, offer: &Offer) -> PublishOutcome {
        let offer_id = OfferId::for_offer(offer);

        if self.ledger.contains(offer).await {
            tracing::info!(%offer_id, title = %offer.title, "already published, skipping");
            return PublishOutcome::Skipped { offer_id };
        }

        match self.publisher.publish(offer).await {
            Some(post_id) => PublishOutcome::Published { offer_id, post_id },
            None => PublishOutcome::Failed { offer_id },
        }
    }
}

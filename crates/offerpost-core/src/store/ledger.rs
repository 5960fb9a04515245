//! Published-history ledger: `OfferId -> entry`, stored as one JSON object.
//!
//! 更新はファイル全体を読み直し、1 エントリだけ差し替えて丸ごと書き戻す。
//! ロックは持たない。書き込みの直列化は呼び出し側（Orchestrator の run lock）。
//!
//! # 形の違うエントリ
//! 値は `serde_json::Value` のまま保持する。scraper など他の書き手のエントリも
//! キーがあれば「公開済み」として扱い、書き戻しでも消さない。

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Offer, OfferId, PostId, StoreError};
use crate::ports::Clock;

use super::atomic::write_atomic;

/// What the bot records about an offer it published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub title: String,
    pub price: u64,
    pub link: String,
    pub published_at: DateTime<Utc>,
    pub facebook_post_id: PostId,
}

/// Raw ledger contents; values are only decoded on demand.
pub type LedgerMap = BTreeMap<OfferId, serde_json::Value>;

pub struct Ledger {
    path: PathBuf,
    clock: Arc<dyn Clock>,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            clock,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current ledger contents.
    ///
    /// A missing file is created as `{}`. Unreadable files and files that are
    /// not a JSON object are logged and treated as empty, which means their
    /// offers may be published again.
    pub async fn load(&self) -> LedgerMap {
        match self.try_load().await {
            Ok(map) => map,
            Err(err) if err.is_not_found() => {
                if let Err(err) = write_atomic(&self.path, b"{}").await {
                    tracing::error!(error = %err, "failed to create ledger");
                } else {
                    tracing::info!(path = %self.path.display(), "created empty ledger");
                }
                LedgerMap::new()
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load ledger, treating as empty");
                LedgerMap::new()
            }
        }
    }

    async fn try_load(&self) -> Result<LedgerMap, StoreError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Whether the offer's identity is recorded, whatever the entry looks like.
    pub async fn contains(&self, offer: &Offer) -> bool {
        self.load().await.contains_key(&OfferId::for_offer(offer))
    }

    /// Record `offer` as published under `post_id`.
    ///
    /// Overwrites the entry with the same identity; every other entry is
    /// written back unchanged.
    pub async fn append(&self, offer: &Offer, post_id: &PostId) -> Result<LedgerEntry, StoreError> {
        let serialize_err = |source| StoreError::Serialize {
            path: self.path.clone(),
            source,
        };

        let mut map = self.load().await;
        let entry = LedgerEntry {
            title: offer.title.clone(),
            price: offer.price,
            link: offer.link.clone(),
            published_at: self.clock.now(),
            facebook_post_id: post_id.clone(),
        };
        map.insert(
            OfferId::for_offer(offer),
            serde_json::to_value(&entry).map_err(serialize_err)?,
        );

        let bytes = serde_json::to_vec_pretty(&map).map_err(serialize_err)?;
        write_atomic(&self.path, &bytes).await?;
        Ok(entry)
    }

    /// Entries written by this bot, ordered by identity. Entries of any
    /// other shape are left out.
    pub async fn entries(&self) -> Vec<(OfferId, LedgerEntry)> {
        self.load()
            .await
            .into_iter()
            .filter_map(|(id, value)| match serde_json::from_value(value) {
                Ok(entry) => Some((id, entry)),
                Err(err) => {
                    tracing::debug!(offer_id = %id, error = %err, "skipping foreign ledger entry");
                    None
                }
            })
            .collect()
    }
}

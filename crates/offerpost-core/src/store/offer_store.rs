//! Offer store: the JSON array of pending offers written by the scraper.
//!
//! 読み込みは all-or-nothing（1 件でも不正ならバッチ全体を捨てる）。
//! パスの最後に `[]` へ戻す。

use std::path::{Path, PathBuf};

use crate::domain::{Offer, StoreError};

use super::atomic::write_atomic;

pub const EMPTY_STORE: &[u8] = b"[]";

/// Reader (and clearer) of the pending-offers file.
#[derive(Debug, Clone)]
pub struct OfferStore {
    path: PathBuf,
}

impl OfferStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every pending offer.
    ///
    /// Any problem (missing file, bad JSON, non-array, one invalid record)
    /// is logged once and yields an empty list: a pass never works on a
    /// partial batch.
    pub async fn load_offers(&self) -> Vec<Offer> {
        match self.try_load().await {
            Ok(offers) => {
                tracing::info!(path = %self.path.display(), count = offers.len(), "loaded offers");
                offers
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load offers");
                Vec::new()
            }
        }
    }

    pub async fn try_load(&self) -> Result<Vec<Offer>, StoreError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        parse_offers(&self.path, &bytes)
    }

    /// Replace the file with an empty array.
    pub async fn clear(&self) -> Result<(), StoreError> {
        write_atomic(&self.path, EMPTY_STORE).await
    }
}

fn parse_offers(path: &Path, bytes: &[u8]) -> Result<Vec<Offer>, StoreError> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let serde_json::Value::Array(records) = value else {
        return Err(StoreError::NotAnArray {
            path: path.to_path_buf(),
        });
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value(record).map_err(|source| StoreError::InvalidRecord {
                path: path.to_path_buf(),
                index,
                source,
            })
        })
        .collect()
}

/// True when the bytes are what `clear` leaves behind (or nothing at all).
pub fn is_cleared(bytes: &[u8]) -> bool {
    let trimmed = bytes.trim_ascii();
    trimmed.is_empty()
        || matches!(
            serde_json::from_slice::<serde_json::Value>(trimmed),
            Ok(serde_json::Value::Array(ref items)) if items.is_empty()
        )
}

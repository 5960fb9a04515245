//! Outcome model: terminal state of one offer within a pass.
//!
//! # 状態遷移（オファー単位）
//! `Pending -> Skipped | Publishing -> Published | Publishing -> retry x2 -> Failed`
//!
//! パスが終われば途中状態も失敗も残らない。

use serde::{Deserialize, Serialize};

use super::ids::{OfferId, PostId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublishOutcome {
    /// Already present in the ledger; no remote call was made.
    Skipped { offer_id: OfferId },

    Published { offer_id: OfferId, post_id: PostId },

    /// Every attempt failed; the offer is dropped for this run.
    Failed { offer_id: OfferId },
}

impl PublishOutcome {
    pub fn offer_id(&self) -> &OfferId {
        match self {
            Self::Skipped { offer_id }
            | Self::Published { offer_id, .. }
            | Self::Failed { offer_id } => offer_id,
        }
    }
}

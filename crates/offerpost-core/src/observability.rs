//! Observability: per-pass summary.
//!
//! `RunSummary` はパスごとに info ログへ出し、`once` の結果として返す。

use serde::{Deserialize, Serialize};

use crate::domain::PublishOutcome;

/// Counts for one processing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub published: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &PublishOutcome) {
        match outcome {
            PublishOutcome::Skipped { .. } => self.skipped += 1,
            PublishOutcome::Published { .. } => self.published += 1,
            PublishOutcome::Failed { .. } => self.failed += 1,
        }
    }
}

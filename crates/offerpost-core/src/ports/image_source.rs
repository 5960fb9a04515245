//! ImageSource port - 画像の取得と検証
//!
//! 本番実装は `impls::HttpImageFetcher`（reqwest）。
//! テストでは URL ごとに結果を差し替えたフェイクを使う。

use async_trait::async_trait;

use crate::domain::{ImageError, ImagePayload};

/// ImageSource は URL から検証済みの画像を取得
///
/// # 契約
/// - 成功時: content-type が `image/` で始まり、サイズ上限以内
/// - 失敗時: 問題の URL と理由を持つ `ImageError`
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<ImagePayload, ImageError>;
}

//! PhotoApi port - リモートの「写真投稿を作成」API
//!
//! 本番実装は `impls::GraphPhotoApi`。リトライは呼び出し側（Publisher）の責務で、
//! この trait は 1 回の POST だけを表す。

use async_trait::async_trait;

use crate::domain::{ImagePayload, PostId, PublishError};

/// 1 件の写真投稿リクエスト
#[derive(Debug, Clone, Copy)]
pub struct PhotoPost<'a> {
    pub image: &'a ImagePayload,
    pub filename: &'a str,
    pub caption: &'a str,
}

/// PhotoApi は画像とキャプションを投稿して post id を返す
#[async_trait]
pub trait PhotoApi: Send + Sync {
    async fn create_photo_post(&self, post: PhotoPost<'_>) -> Result<PostId, PublishError>;
}

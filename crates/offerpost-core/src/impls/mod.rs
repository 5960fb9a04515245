//! Impls - ports の実装（HTTP）
//!
//! # 含まれる実装
//! - **HttpImageFetcher**: 画像の存在確認・取得・検証
//! - **GraphPhotoApi**: 写真投稿 API クライアント

pub mod graph_api;
pub mod http_image;

// 主要な型を再エクスポート
pub use self::graph_api::GraphPhotoApi;
pub use self::http_image::HttpImageFetcher;

/// Error text including the source chain; reqwest's own Display stops at
/// "error sending request".
pub(crate) fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

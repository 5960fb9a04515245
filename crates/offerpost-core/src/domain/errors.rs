//! Errors - エラー型と分類
//!
//! - `ConfigError`: 起動時の設定エラー（致命的）
//! - `StoreError`: offers / ledger ファイルの読み書きエラー（ログして空扱い）
//! - `ImageError`: 画像の取得・検証エラー（代替画像へフォールバック）
//! - `PublishError`: 投稿 API のエラー（リトライ対象）

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: invalid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: top-level value is not an array")]
    NotAnArray { path: PathBuf },

    #[error("{path}: record #{index} is invalid: {source}")]
    InvalidRecord {
        path: PathBuf,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: serialize failed: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Why an image URL was rejected.
#[derive(Debug, Error)]
pub enum ImageFailure {
    #[error("request failed: {0}")]
    Request(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("missing content-type header")]
    MissingContentType,

    #[error("content-type {0:?} is not an image")]
    NotAnImage(String),

    #[error("declared size {declared} bytes exceeds limit of {limit} bytes")]
    DeclaredTooLarge { declared: u64, limit: u64 },

    #[error("body exceeds limit of {limit} bytes")]
    BodyTooLarge { limit: u64 },
}

#[derive(Debug, Error)]
#[error("image {url}: {reason}")]
pub struct ImageError {
    pub url: String,
    #[source]
    pub reason: ImageFailure,
}

impl ImageError {
    pub fn new(url: impl Into<String>, reason: ImageFailure) -> Self {
        Self {
            url: url.into(),
            reason,
        }
    }
}

/// One failed publish attempt.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("no usable image: {0}")]
    Image(#[from] ImageError),

    #[error("payload of {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: u64, limit: u64 },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("remote returned {status}: {body}")]
    Status {
        status: u16,
        body: String,
        headers: Vec<(String, String)>,
    },

    #[error("response carried no post id: {body}")]
    MissingPostId { body: String },
}

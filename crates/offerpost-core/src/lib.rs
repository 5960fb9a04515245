//! offerpost-core
//!
//! Publishes scraped product offers to a social-media page.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（offer, ids, image, outcome, errors）
//! - **ports**: 抽象化レイヤー（ImageSource, PhotoApi, Clock）
//! - **impls**: HTTP 実装（HttpImageFetcher, GraphPhotoApi）
//! - **store**: offers ファイルと ledger（公開済み履歴）
//! - **app**: アプリケーションロジック（builder, orchestrator, publisher, triggers, watcher）
//! - **config / retry / observability**: 設定、リトライ方針、実行サマリ

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod observability;
pub mod ports;
pub mod retry;
pub mod store;

#[cfg(test)]
mod test_support;

pub use app::{App, AppBuilder, BuildError};
pub use config::Config;
pub use observability::RunSummary;

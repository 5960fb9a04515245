//! App - アプリケーション層
//!
//! ports と store を組み合わせて、オファー投稿のフローを実装します。
//!
//! # 主要コンポーネント
//! - **AppBuilder / App**: 構築とワイヤリング、`run` / `run_once` / `history`
//! - **Orchestrator**: 1 回の処理パス（読み込み→重複除外→投稿→clear）
//! - **Publisher**: 1 件の投稿（画像取得→投稿→ledger 記録、線形リトライ）
//! - **CaptionTemplate**: 投稿本文
//! - **triggers / watcher**: startup・ファイル変更・定期実行のきっかけ

pub mod builder;
pub mod caption;
pub mod orchestrator;
pub mod publisher;
pub mod triggers;
pub mod watcher;

// 主要な型を再エクスポート
pub use self::builder::{App, AppBuilder, BuildError};
pub use self::caption::CaptionTemplate;
pub use self::orchestrator::Orchestrator;
pub use self::publisher::Publisher;
pub use self::triggers::{Trigger, TriggerSender};

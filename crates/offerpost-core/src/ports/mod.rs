//! Ports - 抽象化レイヤー
//!
//! 外部システム（HTTP の画像サーバ、投稿 API、時計）へのインターフェースを定義します。
//! ファイル（offers / ledger）は単一プロセス前提の具象型として `store` に置きます。

pub mod clock;
pub mod image_source;
pub mod photo_api;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::image_source::ImageSource;
pub use self::photo_api::{PhotoApi, PhotoPost};

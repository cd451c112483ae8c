//! IMDb一覧ページに外部評価スコアを追加するライブラリ
//!
//! - `matcher`: 評価サイトの検索・詳細ページからスコアを取得
//! - `page`: ホストページの読み取りと結果の書き込み
//! - `sync`: 作品行ごとの取得・書き込みを直列に実行

pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod matcher;
pub mod page;
pub mod sync;
pub mod update;

//! 更新チェック
//!
//! スクリプトソースを1回取得してバージョンを比較する。失敗しても再試行はしない。

use crate::config::Config;
use crate::fetcher::Fetch;
use imdb_score_common::{compare_versions, extract_version};
use std::cmp::Ordering;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    /// 最新版を使用中
    UpToDate { current: String },
    /// 新しいバージョンがある
    Available { current: String, latest: String },
    /// 取得またはバージョン抽出に失敗
    Failed(String),
}

impl UpdateStatus {
    /// 通知用の1行メッセージ
    pub fn message(&self) -> String {
        match self {
            UpdateStatus::UpToDate { current } => {
                format!("最新版を使用しています (v{})", current)
            }
            UpdateStatus::Available { current, latest } => {
                format!("新しいバージョン v{} があります（現在 v{}）", latest, current)
            }
            UpdateStatus::Failed(reason) => format!("更新チェックに失敗しました: {}", reason),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, UpdateStatus::Available { .. })
    }
}

/// 公開中のバージョンを取得して実行中のバージョンと比較
pub async fn check_for_updates<F: Fetch + ?Sized>(fetcher: &F, config: &Config) -> UpdateStatus {
    let source = match fetcher.get_text(&config.update_url).await {
        Ok(source) => source,
        Err(e) => {
            warn!(url = %config.update_url, error = %e, "更新情報の取得に失敗");
            return UpdateStatus::Failed(e.to_string());
        }
    };

    let latest = match extract_version(&source) {
        Some(version) => version,
        None => {
            warn!(url = %config.update_url, "バージョン情報が見つかりません");
            return UpdateStatus::Failed("バージョン情報が見つかりません".into());
        }
    };

    let current = config.current_version.clone();
    debug!(%current, %latest, "バージョン比較");

    match compare_versions(&latest, &current) {
        Ordering::Greater => UpdateStatus::Available { current, latest },
        _ => UpdateStatus::UpToDate { current },
    }
}

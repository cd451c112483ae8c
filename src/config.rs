use crate::error::{Result, ScoreError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 検索リンクの外部IDプレースホルダ
pub const IMDB_ID_PLACEHOLDER: &str = "__IMDB_ID__";
/// 検索リンクのタイトルプレースホルダ
pub const TITLE_PLACEHOLDER: &str = "__TITLE__";

const SEARCH_URL_ENV: &str = "IMDB_SCORE_SEARCH_URL";

/// 実行時設定
///
/// 起動時に1回組み立て、Synchronizer・更新チェックへ明示的に渡す。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 評価サイトのオリジン（検索と詳細ページURLの解決に使用）
    pub search_base_url: String,
    pub metacritic_enabled: bool,
    pub metacritic_base_url: String,
    /// 作品ごとの外部検索リンク（__IMDB_ID__ / __TITLE__ を置換）
    pub external_search_url: String,
    /// 更新チェックで取得するスクリプトソース
    pub update_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
    /// 作品行が見つからなかった場合の再走査間隔
    pub empty_retry_delay_ms: u64,
    /// 作品行が見つからなかった場合の再走査回数上限
    pub empty_retry_limit: u32,
    /// 実行中のバージョン（保存しない）
    #[serde(skip, default = "current_version")]
    pub current_version: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

fn current_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;

        // 環境変数を優先
        if let Ok(url) = std::env::var(SEARCH_URL_ENV) {
            if !url.trim().is_empty() {
                config.search_base_url = url.trim().to_string();
            }
        }

        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ScoreError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("imdb-score").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            search_base_url: "https://www.rottentomatoes.com".into(),
            metacritic_enabled: true,
            metacritic_base_url: "https://www.metacritic.com".into(),
            external_search_url: format!("https://www.google.com/search?q={}", IMDB_ID_PLACEHOLDER),
            update_url: "https://raw.githubusercontent.com/imdb-score/imdb-score-rust/main/Cargo.toml".into(),
            timeout_seconds: 30,
            user_agent: format!("imdb-score/{}", env!("CARGO_PKG_VERSION")),
            empty_retry_delay_ms: 1000,
            empty_retry_limit: 5,
            current_version: current_version(),
        }
    }

    /// 外部検索リンクを設定（プレースホルダ必須）
    pub fn set_external_search_url(&mut self, url: String) -> Result<()> {
        if !url.contains(IMDB_ID_PLACEHOLDER) && !url.contains(TITLE_PLACEHOLDER) {
            return Err(ScoreError::Config(format!(
                "検索リンクには {} または {} が必要です",
                IMDB_ID_PLACEHOLDER, TITLE_PLACEHOLDER
            )));
        }
        self.external_search_url = url;
        Ok(())
    }

    /// 作品の外部検索リンクを組み立てる
    pub fn external_search_link(&self, imdb_id: &str, title: &str) -> String {
        let encoded_title: String = url::form_urlencoded::byte_serialize(title.as_bytes()).collect();
        self.external_search_url
            .replace(IMDB_ID_PLACEHOLDER, imdb_id)
            .replace(TITLE_PLACEHOLDER, &encoded_title)
    }
}

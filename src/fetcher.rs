//! HTTP取得モジュール
//!
//! 外部サイトへのGETはすべて `Fetch` を経由する。
//! 本番は reqwest、テストではスタブ実装に差し替える。

use crate::config::Config;
use crate::error::{Result, ScoreError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// 読み取り専用のテキスト取得
#[async_trait]
pub trait Fetch: Send + Sync {
    /// URLの本文を取得（2xx以外はエラー）
    async fn get_text(&self, url: &str) -> Result<String>;
}

/// reqwestによる実装
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get_text(&self, url: &str) -> Result<String> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoreError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

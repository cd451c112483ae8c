//! Metacriticスコアの取得

use super::ScoreMatcher;
use crate::fetcher::Fetch;
use imdb_score_common::{parse_metascore, NOT_AVAILABLE};
use tracing::{debug, warn};
use url::Url;

impl<F: Fetch> ScoreMatcher<F> {
    /// 検索URL（`/search/movie/<タイトル>/results`）
    pub fn metacritic_url(&self, title: &str) -> Option<Url> {
        let mut url = self.metacritic_base.clone()?;
        url.path_segments_mut()
            .ok()?
            .clear()
            .extend(["search", "movie", title.trim(), "results"]);
        Some(url)
    }

    /// Metacriticのメタスコアを取得
    ///
    /// 無効化されていれば None、取得・解析に失敗すれば "N/A"。
    pub async fn fetch_metacritic(&self, title: &str) -> Option<String> {
        let url = self.metacritic_url(title)?;

        let score = match self.fetcher.get_text(url.as_str()).await {
            Ok(html) => parse_metascore(&html),
            Err(e) => {
                warn!(title, error = %e, "Metacriticの取得に失敗");
                None
            }
        };
        debug!(title, score = ?score, "Metacritic");

        Some(score.unwrap_or_else(|| NOT_AVAILABLE.to_string()))
    }
}

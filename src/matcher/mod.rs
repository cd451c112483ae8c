//! 外部評価の照合・抽出
//!
//! 1. 検索ページを取得し、行抽出戦略で候補を集める
//! 2. 候補から1件を選び、行内のスコアを読む
//! 3. 詳細ページURLが解決できれば詳細ページで未設定フィールドを補完する
//!
//! どの段階で失敗しても呼び出し側にはエラーを返さず、
//! それまでに得られた部分結果（なければ全項目 "N/A"）を返す。

mod metacritic;

use crate::config::Config;
use crate::error::Result;
use crate::fetcher::Fetch;
use imdb_score_common::{
    fill_from_detail, parse_search_results, select_candidate, ListingEntry, RatingsSummary,
    ScoreResult,
};
use tracing::{debug, warn};
use url::Url;

pub struct ScoreMatcher<F> {
    fetcher: F,
    search_base: Url,
    metacritic_base: Option<Url>,
}

impl<F: Fetch> ScoreMatcher<F> {
    pub fn new(fetcher: F, config: &Config) -> Result<Self> {
        let search_base = Url::parse(&config.search_base_url)?;
        let metacritic_base = if config.metacritic_enabled {
            Some(Url::parse(&config.metacritic_base_url)?)
        } else {
            None
        };

        Ok(Self {
            fetcher,
            search_base,
            metacritic_base,
        })
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// 検索URL（`/search?search=<タイトル 年>`）
    pub fn search_url(&self, title: &str, year: Option<&str>) -> Result<Url> {
        let query = match year.map(str::trim).filter(|y| !y.is_empty()) {
            Some(year) => format!("{} {}", title.trim(), year),
            None => title.trim().to_string(),
        };

        let mut url = self.search_base.join("search")?;
        url.query_pairs_mut().append_pair("search", &query);
        Ok(url)
    }

    /// 詳細ページURLを検索サイト基準で解決
    ///
    /// 検索サイトと異なるオリジンを指すリンクは採用しない。
    pub fn detail_url(&self, href: &str) -> Option<Url> {
        let url = self.search_base.join(href).ok()?;
        if url.origin() != self.search_base.origin() {
            debug!(href, base = %self.search_base, "検索サイト外のリンクを無視");
            return None;
        }
        Some(url)
    }

    /// タイトル（と年）から評価スコアを取得
    ///
    /// エラーは返さない。取得・解析に失敗した項目は "N/A" になる。
    pub async fn fetch_scores(&self, title: &str, year: Option<&str>) -> ScoreResult {
        let search_url = match self.search_url(title, year) {
            Ok(url) => url,
            Err(e) => {
                warn!(title, error = %e, "検索URLを組み立てられません");
                return ScoreResult::unavailable();
            }
        };

        let body = match self.fetcher.get_text(search_url.as_str()).await {
            Ok(body) => body,
            Err(e) => {
                warn!(title, error = %e, "検索ページの取得に失敗");
                return ScoreResult::unavailable();
            }
        };

        let results = parse_search_results(&body);
        debug!(
            title,
            strategy = results.strategy.unwrap_or("none"),
            candidates = results.candidates.len(),
            filtered_out = results.filtered_out,
            "検索結果を解析"
        );

        let index = match select_candidate(&results.candidates, title, year) {
            Some(i) => i,
            None => return ScoreResult::unavailable(),
        };
        let chosen = &results.candidates[index];
        debug!(title, matched = %chosen.title, year = ?chosen.year, "候補を選択");

        let mut fields = chosen.scores.clone();
        let detail_url = chosen.url.as_deref().and_then(|href| self.detail_url(href));

        let detail_url = match detail_url {
            Some(url) => url,
            None => return ScoreResult::from_fields(&fields, None),
        };

        if !fields.is_complete() {
            match self.fetcher.get_text(detail_url.as_str()).await {
                Ok(html) => {
                    let used = fill_from_detail(&mut fields, &html);
                    debug!(title, url = %detail_url, sources = ?used, "詳細ページで補完");
                }
                Err(e) => {
                    warn!(title, url = %detail_url, error = %e, "詳細ページの取得に失敗");
                }
            }
        }

        ScoreResult::from_fields(&fields, Some(detail_url.to_string()))
    }

    /// 1作品分の評価をまとめて取得（2サイトを並行取得）
    pub async fn fetch_ratings(&self, entry: &ListingEntry) -> RatingsSummary {
        let year = entry.year.as_deref();
        let (rotten_tomatoes, metacritic) = futures::join!(
            self.fetch_scores(&entry.title, year),
            self.fetch_metacritic(&entry.title),
        );

        RatingsSummary {
            rotten_tomatoes,
            metacritic,
        }
    }
}

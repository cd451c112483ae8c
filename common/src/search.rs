//! 検索結果ページの解析
//!
//! 外部サイトのマークアップは予告なく変わるため、
//! 行の抽出は名前付き戦略のリストを順に試す。
//! 各戦略は `(&Html) -> Option<Vec<CandidateMatch>>` の純粋関数で、
//! 1行以上取れた最初の戦略を採用する。

use crate::types::{parse_percent, CandidateMatch, ScoreFields, ScoreIcon};
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

lazy_static! {
    static ref MEDIA_ROW: Selector = Selector::parse("search-page-media-row").unwrap();
    static ref MEDIA_TITLE: Selector =
        Selector::parse(r#"a[data-qa="info-name"], [slot="title"]"#).unwrap();
    static ref MEDIA_RESULT: Selector = Selector::parse("search-page-result[type]").unwrap();
    static ref LEGACY_ROW: Selector =
        Selector::parse("#movieSection li, ul.results li, .search__results .result").unwrap();
    static ref LEGACY_TITLE: Selector =
        Selector::parse(r#".movieTitle, .articleLink, a[href*="/m/"]"#).unwrap();
    static ref LEGACY_YEAR: Selector = Selector::parse(".year, .release-year, .movie_year").unwrap();
    static ref LEGACY_SCORE: Selector = Selector::parse(".tMeterScore, .tomatometer, .score").unwrap();
    static ref LEGACY_ICON: Selector = Selector::parse(".tMeterIcon, .icon").unwrap();
    static ref SEARCH_PAGE_LINK: Selector = Selector::parse("a.search-page-link").unwrap();
    static ref ANCHOR: Selector = Selector::parse("a[href]").unwrap();
    // いずれかの戦略が行とみなす要素
    static ref ANY_ROW: Selector = Selector::parse(
        "search-page-media-row, #movieSection li, ul.results li, .search__results .result, a.search-page-link"
    )
    .unwrap();
    static ref DETAIL_PATH: Regex = Regex::new(r"/m/[A-Za-z0-9_\-]+").unwrap();
    static ref PERCENT: Regex = Regex::new(r"(\d{1,3})\s*%").unwrap();
    static ref TRAILING_PERCENT: Regex = Regex::new(r"^(.*?)\s*(\d{1,3})\s*%\s*$").unwrap();
    static ref YEAR: Regex = Regex::new(r"\b((?:18|19|20)\d{2})\b").unwrap();
}

/// 祖先をたどってリンクを探す段数
const ANCESTOR_DEPTH: usize = 2;

/// 行抽出戦略
#[derive(Debug, Clone, Copy)]
pub struct SearchStrategy {
    pub name: &'static str,
    pub extract: fn(&Html) -> Option<Vec<CandidateMatch>>,
}

/// 試行順の戦略リスト
pub const SEARCH_STRATEGIES: &[SearchStrategy] = &[
    SearchStrategy {
        name: "media-row",
        extract: media_rows,
    },
    SearchStrategy {
        name: "legacy-row",
        extract: legacy_rows,
    },
    SearchStrategy {
        name: "search-page-link",
        extract: search_page_links,
    },
];

/// 検索結果の解析結果
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    /// 採用された戦略名（どれも行を返さなければ None）
    pub strategy: Option<&'static str>,
    /// 種別フィルタ後の候補（結果順）
    pub candidates: Vec<CandidateMatch>,
    /// 種別フィルタで除外された行数
    pub filtered_out: usize,
}

/// 検索結果HTMLから候補を抽出
///
/// 戦略を順に試し、最初に行を返した戦略の結果に種別フィルタをかける。
pub fn parse_search_results(html: &str) -> SearchResults {
    let document = Html::parse_document(html);

    for strategy in SEARCH_STRATEGIES {
        if let Some(rows) = (strategy.extract)(&document) {
            let total = rows.len();
            let candidates: Vec<CandidateMatch> =
                rows.into_iter().filter(is_movie_row).collect();
            return SearchResults {
                strategy: Some(strategy.name),
                filtered_out: total - candidates.len(),
                candidates,
            };
        }
    }

    SearchResults::default()
}

/// 種別が判別できて映画以外なら除外
fn is_movie_row(row: &CandidateMatch) -> bool {
    match row.category.as_deref() {
        Some(category) => matches!(
            category.trim().to_lowercase().as_str(),
            "movie" | "movies" | "film"
        ),
        None => true,
    }
}

/// 構造化要素 `<search-page-media-row>`
pub fn media_rows(document: &Html) -> Option<Vec<CandidateMatch>> {
    let rows: Vec<CandidateMatch> = document
        .select(&MEDIA_ROW)
        .map(|row| {
            let title = row
                .select(&MEDIA_TITLE)
                .map(element_text)
                .find(|t| !t.is_empty())
                .or_else(|| attr(row, "name"))
                .unwrap_or_default();

            let critic_state = attr(row, "tomatometerstate").or_else(|| {
                (attr(row, "tomatometeriscertified").as_deref() == Some("true"))
                    .then(|| "certified-fresh".to_string())
            });

            let scores = ScoreFields {
                critic: attr(row, "tomatometerscore").and_then(|s| parse_percent(&s)),
                critic_state,
                audience: attr(row, "audiencescore").and_then(|s| parse_percent(&s)),
                audience_state: attr(row, "audiencestate"),
            };

            CandidateMatch {
                title,
                year: attr(row, "releaseyear").or_else(|| attr(row, "release-year")),
                url: resolve_detail_url(row),
                category: row_category(row),
                scores,
            }
        })
        .collect();

    non_empty(rows)
}

/// 旧レイアウトの `<li>` 行
pub fn legacy_rows(document: &Html) -> Option<Vec<CandidateMatch>> {
    let rows: Vec<CandidateMatch> = document
        .select(&LEGACY_ROW)
        .map(|row| {
            let title = row
                .select(&LEGACY_TITLE)
                .map(element_text)
                .find(|t| !t.is_empty())
                .unwrap_or_default();

            let year = row
                .select(&LEGACY_YEAR)
                .next()
                .and_then(|el| first_year(&element_text(el)));

            // 専用要素がなければ行全体のテキストからパーセント表記を拾う
            let critic = row
                .select(&LEGACY_SCORE)
                .next()
                .and_then(|el| parse_percent(&element_text(el)))
                .or_else(|| first_percent(&element_text(row)));

            let critic_state = row.select(&LEGACY_ICON).find_map(|icon| {
                icon.value()
                    .classes()
                    .find(|class| ScoreIcon::from_state(class).is_some())
                    .map(str::to_string)
            });

            CandidateMatch {
                title,
                year,
                url: resolve_detail_url(row),
                category: row_category(row),
                scores: ScoreFields {
                    critic,
                    critic_state,
                    ..Default::default()
                },
            }
        })
        .collect();

    non_empty(rows)
}

/// 旧検索ページの `a.search-page-link`（"Title 87%" 形式）
pub fn search_page_links(document: &Html) -> Option<Vec<CandidateMatch>> {
    let rows: Vec<CandidateMatch> = document
        .select(&SEARCH_PAGE_LINK)
        .map(|link| {
            let text = element_text(link);
            let (title, critic) = match TRAILING_PERCENT.captures(&text) {
                Some(caps) => (caps[1].trim().to_string(), parse_percent(&caps[2])),
                None => (text.clone(), None),
            };

            CandidateMatch {
                title,
                year: None,
                url: resolve_detail_url(link),
                category: row_category(link),
                scores: ScoreFields {
                    critic,
                    ..Default::default()
                },
            }
        })
        .collect();

    non_empty(rows)
}

/// 行から詳細ページURLを解決
///
/// 優先順位:
/// 1. 構造化されたリンク属性
/// 2. 行内の `/m/<slug>` パターンに一致するリンク
/// 3. 祖先要素の範囲で一致するリンク（その行だけを包む祖先に限る）
pub fn resolve_detail_url(row: ElementRef<'_>) -> Option<String> {
    ["url", "data-url", "href", "data-href"]
        .iter()
        .find_map(|name| attr(row, name))
        .or_else(|| detail_anchor(row))
        .or_else(|| ancestor_anchor(row))
}

/// 行の包み要素からリンクを探す
///
/// 他の行も含む祖先（結果リスト全体など）に達したら打ち切る。
fn ancestor_anchor(row: ElementRef<'_>) -> Option<String> {
    for ancestor in row.ancestors().filter_map(ElementRef::wrap).take(ANCESTOR_DEPTH) {
        if ANY_ROW.matches(&ancestor) || ancestor.select(&ANY_ROW).nth(1).is_some() {
            return None;
        }
        if let Some(href) = detail_anchor(ancestor) {
            return Some(href);
        }
    }
    None
}

fn detail_anchor(scope: ElementRef<'_>) -> Option<String> {
    scope
        .select(&ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| DETAIL_PATH.is_match(href))
        .map(str::to_string)
}

/// 行または祖先の `search-page-result[type]` から種別を取得
fn row_category(row: ElementRef<'_>) -> Option<String> {
    ["type", "data-type", "data-category"]
        .iter()
        .find_map(|name| attr(row, name))
        .or_else(|| {
            row.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|el| MEDIA_RESULT.matches(el))
                .and_then(|el| attr(el, "type"))
        })
}

/// 空白を正規化した要素テキスト
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// 空白のみの属性は未設定として扱う
pub fn attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn first_percent(text: &str) -> Option<u8> {
    PERCENT.captures(text).and_then(|caps| parse_percent(&caps[1]))
}

fn first_year(text: &str) -> Option<String> {
    YEAR.captures(text).map(|caps| caps[1].to_string())
}

fn non_empty(rows: Vec<CandidateMatch>) -> Option<Vec<CandidateMatch>> {
    if rows.is_empty() {
        None
    } else {
        Some(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEDIA_PAGE: &str = r#"
        <html><body>
        <search-page-result type="movie">
          <ul slot="list">
            <search-page-media-row releaseyear="2010" tomatometerscore="87"
                tomatometerstate="certified-fresh" tomatometeriscertified="true">
              <a href="/m/inception" data-qa="thumbnail-link"><img src="x.jpg"></a>
              <a href="/m/inception" data-qa="info-name" slot="title"> Inception </a>
            </search-page-media-row>
            <search-page-media-row releaseyear="2011" tomatometerscore="">
              <a href="/m/inception_the_cobol_job" data-qa="info-name">Inception: The Cobol Job</a>
            </search-page-media-row>
          </ul>
        </search-page-result>
        <search-page-result type="tvSeries">
          <ul slot="list">
            <search-page-media-row releaseyear="2010">
              <a href="/tv/inception" data-qa="info-name">Inception</a>
            </search-page-media-row>
          </ul>
        </search-page-result>
        </body></html>
    "#;

    #[test]
    fn test_media_rows() {
        let results = parse_search_results(MEDIA_PAGE);
        assert_eq!(results.strategy, Some("media-row"));
        assert_eq!(results.filtered_out, 1);
        assert_eq!(results.candidates.len(), 2);

        let first = &results.candidates[0];
        assert_eq!(first.title, "Inception");
        assert_eq!(first.year.as_deref(), Some("2010"));
        assert_eq!(first.url.as_deref(), Some("/m/inception"));
        assert_eq!(first.category.as_deref(), Some("movie"));
        assert_eq!(first.scores.critic, Some(87));
        assert_eq!(first.scores.critic_state.as_deref(), Some("certified-fresh"));

        // 空のスコア属性は未設定
        assert_eq!(results.candidates[1].scores.critic, None);
    }

    #[test]
    fn test_certified_flag_without_state() {
        let html = r#"<search-page-media-row tomatometerscore="95" tomatometeriscertified="true">
            <a data-qa="info-name" href="/m/x">X</a></search-page-media-row>"#;
        let results = parse_search_results(html);
        assert_eq!(
            results.candidates[0].scores.critic_state.as_deref(),
            Some("certified-fresh")
        );
    }

    #[test]
    fn test_legacy_rows() {
        let html = r#"
            <section id="movieSection"><ul>
              <li>
                <span class="tMeterIcon tiny fresh"></span>
                <span class="tMeterScore">72%</span>
                <a class="articleLink" href="/m/the_matrix">The Matrix</a>
                <span class="movie_year">(1999)</span>
              </li>
              <li data-type="tv">
                <a class="articleLink" href="/m/the_matrix_show">The Matrix Show</a>
              </li>
            </ul></section>
        "#;
        let results = parse_search_results(html);
        assert_eq!(results.strategy, Some("legacy-row"));
        assert_eq!(results.filtered_out, 1);
        let row = &results.candidates[0];
        assert_eq!(row.title, "The Matrix");
        assert_eq!(row.year.as_deref(), Some("1999"));
        assert_eq!(row.scores.critic, Some(72));
        assert_eq!(row.scores.critic_state.as_deref(), Some("fresh"));
        assert_eq!(row.url.as_deref(), Some("/m/the_matrix"));
    }

    #[test]
    fn test_legacy_row_score_from_text() {
        let html = r#"<ul class="results"><li>
            <a href="/m/inception">Inception (2010)</a> <span>87%</span>
        </li></ul>"#;
        let results = parse_search_results(html);
        assert_eq!(results.candidates[0].title, "Inception (2010)");
        assert_eq!(results.candidates[0].scores.critic, Some(87));
        assert_eq!(results.candidates[0].year, None);
    }

    #[test]
    fn test_search_page_link() {
        let html = r#"<div><a class="search-page-link" href="/m/up">Up 98%</a></div>"#;
        let results = parse_search_results(html);
        assert_eq!(results.strategy, Some("search-page-link"));
        assert_eq!(results.candidates[0].title, "Up");
        assert_eq!(results.candidates[0].scores.critic, Some(98));
        assert_eq!(results.candidates[0].url.as_deref(), Some("/m/up"));
    }

    #[test]
    fn test_no_rows() {
        let results = parse_search_results("<html><body><p>No results</p></body></html>");
        assert!(results.strategy.is_none());
        assert!(results.candidates.is_empty());
    }

    #[test]
    fn test_url_from_ancestor_anchor() {
        let html = r#"<div class="card">
            <a href="/m/heat_1995">poster</a>
            <search-page-media-row releaseyear="1995"><span slot="title">Heat</span></search-page-media-row>
        </div>"#;
        let results = parse_search_results(html);
        assert_eq!(results.candidates[0].title, "Heat");
        assert_eq!(results.candidates[0].url.as_deref(), Some("/m/heat_1995"));
    }

    #[test]
    fn test_linkless_legacy_row_does_not_borrow_sibling_link() {
        let html = r#"<ul class="results">
            <li><a href="/m/up_in_the_air">Up in the Air</a></li>
            <li><span class="movieTitle">Up</span> 98%</li>
        </ul>"#;
        let results = parse_search_results(html);
        assert_eq!(results.candidates.len(), 2);
        assert_eq!(results.candidates[0].url.as_deref(), Some("/m/up_in_the_air"));
        assert_eq!(results.candidates[1].title, "Up");
        assert_eq!(results.candidates[1].url, None);
    }

    #[test]
    fn test_linkless_media_row_does_not_borrow_sibling_link() {
        let html = r#"<ul slot="list">
            <search-page-media-row releaseyear="1995">
              <a data-qa="info-name" href="/m/heat_1995">Heat</a></search-page-media-row>
            <search-page-media-row releaseyear="2022"><span slot="title">Heat Wave</span></search-page-media-row>
        </ul>"#;
        let results = parse_search_results(html);
        assert_eq!(results.candidates[0].url.as_deref(), Some("/m/heat_1995"));
        assert_eq!(results.candidates[1].title, "Heat Wave");
        assert_eq!(results.candidates[1].url, None);
    }

    #[test]
    fn test_url_structured_attribute_first() {
        let html = r#"<search-page-media-row url="https://www.rottentomatoes.com/m/alien">
            <a data-qa="info-name" href="/m/aliens">Alien</a></search-page-media-row>"#;
        let results = parse_search_results(html);
        assert_eq!(
            results.candidates[0].url.as_deref(),
            Some("https://www.rottentomatoes.com/m/alien")
        );
    }

    #[test]
    fn test_in_row_anchor_must_match_detail_path() {
        let html = r#"<search-page-media-row>
            <a href="/celebrity/someone">Someone</a>
            <a data-qa="info-name" href="/m/heat">Heat</a></search-page-media-row>"#;
        let results = parse_search_results(html);
        assert_eq!(results.candidates[0].url.as_deref(), Some("/m/heat"));
    }

    #[test]
    fn test_all_rows_filtered() {
        let html = r#"<search-page-result type="tvSeries">
            <search-page-media-row><a data-qa="info-name" href="/tv/x">X</a></search-page-media-row>
        </search-page-result>"#;
        let results = parse_search_results(html);
        assert_eq!(results.strategy, Some("media-row"));
        assert!(results.candidates.is_empty());
        assert_eq!(results.filtered_out, 1);
    }
}

//! Metacritic検索結果の解析

use crate::search::element_text;
use lazy_static::lazy_static;
use scraper::{Html, Selector};

lazy_static! {
    // 旧レイアウトの大きいメタスコア表示 → 新レイアウトのレビュースコア
    static ref METASCORE_SELECTORS: Vec<Selector> = [
        ".metascore_w.large.movie",
        ".c-siteReviewScore span",
        r#"[data-testid="product-metascore"] span"#,
    ]
    .iter()
    .map(|css| Selector::parse(css).unwrap())
    .collect();
}

/// 検索結果HTMLから最初のメタスコアを取得
pub fn parse_metascore(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    METASCORE_SELECTORS.iter().find_map(|selector| {
        document
            .select(selector)
            .map(element_text)
            .find(|text| is_metascore(text))
    })
}

fn is_metascore(text: &str) -> bool {
    text.eq_ignore_ascii_case("tbd")
        || text.parse::<u8>().map(|v| v <= 100).unwrap_or(false)
}

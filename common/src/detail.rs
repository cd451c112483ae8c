//! 詳細ページの解析
//!
//! 検索結果行で埋まらなかったフィールドを詳細ページから補完する。
//!
//! ## ソースの優先順位
//! 1. スコアボード要素の属性
//! 2. 埋め込みの構造化データ（JSON-LD）の評価名
//! 3. 文書全体のテキスト走査（キーワードとパーセント表記の同居）
//!
//! フィールドごとに最初に値を返したソースが勝ち、後のソースは上書きしない。

use crate::search::{attr, element_text};
use crate::types::{parse_percent, ScoreFields};
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

lazy_static! {
    static ref SCORE_BOARD: Selector =
        Selector::parse(r#"score-board, score-board-deprecated, [data-qa="score-panel"]"#).unwrap();
    static ref CRITICS_SLOT: Selector = Selector::parse(r#"[slot="criticsScore"]"#).unwrap();
    static ref AUDIENCE_SLOT: Selector = Selector::parse(r#"[slot="audienceScore"]"#).unwrap();
    static ref CRITICS_ICON: Selector = Selector::parse("score-icon-critics").unwrap();
    static ref AUDIENCE_ICON: Selector = Selector::parse("score-icon-audience").unwrap();
    static ref JSON_LD: Selector = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();
    static ref TEXT_NODES: Selector = Selector::parse("body *:not(script):not(style)").unwrap();
    static ref CRITIC_TEXT: Regex = Regex::new(
        r"(?i)(?:tomatometer|critics?)\D{0,40}?(\d{1,3})\s*%|(\d{1,3})\s*%\s*(?:tomatometer|critics?)"
    )
    .unwrap();
    static ref AUDIENCE_TEXT: Regex = Regex::new(
        r"(?i)(?:audience|popcornmeter)\D{0,40}?(\d{1,3})\s*%|(\d{1,3})\s*%\s*(?:audience|popcornmeter)"
    )
    .unwrap();
}

/// 批評家スコアとして扱う評価名
const CRITIC_SCHEMES: &[&str] = &["tomatometer"];
/// 観客スコアとして扱う評価名
const AUDIENCE_SCHEMES: &[&str] = &["audience score", "popcornmeter"];

/// 詳細ページの補完ソース
#[derive(Debug, Clone, Copy)]
pub struct DetailSource {
    pub name: &'static str,
    pub extract: fn(&Html) -> ScoreFields,
}

/// 優先順のソースリスト
pub const DETAIL_SOURCES: &[DetailSource] = &[
    DetailSource {
        name: "score-board",
        extract: scoreboard_fields,
    },
    DetailSource {
        name: "json-ld",
        extract: json_ld_fields,
    },
    DetailSource {
        name: "text-scan",
        extract: text_scan_fields,
    },
];

/// 詳細ページHTMLで未設定フィールドを補完
///
/// # Returns
/// 少なくとも1フィールドを埋めたソース名
pub fn fill_from_detail(fields: &mut ScoreFields, html: &str) -> Vec<&'static str> {
    let document = Html::parse_document(html);
    let mut used = Vec::new();

    for source in DETAIL_SOURCES {
        if fields.is_complete() {
            break;
        }
        let before = fields.clone();
        fields.fill_missing((source.extract)(&document));
        if *fields != before {
            used.push(source.name);
        }
    }

    used
}

/// スコアボード要素の属性（新レイアウトのスロット表記も含む）
pub fn scoreboard_fields(document: &Html) -> ScoreFields {
    let mut fields = ScoreFields::default();

    for board in document.select(&SCORE_BOARD) {
        fields.fill_missing(ScoreFields {
            critic: attr(board, "tomatometerscore").and_then(|s| parse_percent(&s)),
            critic_state: attr(board, "tomatometerstate"),
            audience: attr(board, "audiencescore").and_then(|s| parse_percent(&s)),
            audience_state: attr(board, "audiencestate"),
        });
    }

    let slot_score = |selector: &Selector| {
        document
            .select(selector)
            .find_map(|el| parse_percent(&element_text(el)))
    };
    let critic_icon_state = document.select(&CRITICS_ICON).next().and_then(|icon| {
        if attr(icon, "certified").as_deref() == Some("true") {
            Some("certified-fresh".to_string())
        } else {
            attr(icon, "sentiment").and_then(|s| sentiment_state(&s, "fresh", "rotten"))
        }
    });
    let audience_icon_state = document
        .select(&AUDIENCE_ICON)
        .next()
        .and_then(|icon| attr(icon, "sentiment"))
        .and_then(|s| sentiment_state(&s, "upright", "spilled"));

    fields.fill_missing(ScoreFields {
        critic: slot_score(&CRITICS_SLOT),
        critic_state: critic_icon_state,
        audience: slot_score(&AUDIENCE_SLOT),
        audience_state: audience_icon_state,
    });

    fields
}

fn sentiment_state(sentiment: &str, positive: &str, negative: &str) -> Option<String> {
    match sentiment.to_lowercase().as_str() {
        "positive" => Some(positive.to_string()),
        "negative" => Some(negative.to_string()),
        _ => None,
    }
}

/// JSON-LDブロックの評価（name + ratingValue）
pub fn json_ld_fields(document: &Html) -> ScoreFields {
    let mut fields = ScoreFields::default();

    for script in document.select(&JSON_LD) {
        let text: String = script.text().collect();
        let json: Value = match serde_json::from_str(text.trim()) {
            Ok(v) => v,
            Err(_) => continue,
        };
        collect_ratings(&json, &mut fields);
    }

    fields
}

fn collect_ratings(value: &Value, fields: &mut ScoreFields) {
    match value {
        Value::Object(map) => {
            if let (Some(name), Some(rating)) = (
                map.get("name").and_then(Value::as_str),
                map.get("ratingValue").and_then(rating_value),
            ) {
                let name = name.to_lowercase();
                if fields.critic.is_none() && CRITIC_SCHEMES.iter().any(|s| name.contains(s)) {
                    fields.critic = Some(rating);
                } else if fields.audience.is_none()
                    && AUDIENCE_SCHEMES.iter().any(|s| name.contains(s))
                {
                    fields.audience = Some(rating);
                }
            }
            for child in map.values() {
                collect_ratings(child, fields);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_ratings(item, fields);
            }
        }
        _ => {}
    }
}

fn rating_value(value: &Value) -> Option<u8> {
    match value {
        Value::Number(n) => n.as_f64().and_then(|f| parse_percent(&f.to_string())),
        Value::String(s) => parse_percent(s),
        _ => None,
    }
}

/// 最終手段: 同じ要素のテキストにキーワードとパーセント表記が並ぶ箇所を探す
///
/// 一致した要素のうちテキストが最も短いもの（最も内側）を採用する。
pub fn text_scan_fields(document: &Html) -> ScoreFields {
    let mut critic: Option<(usize, u8)> = None;
    let mut audience: Option<(usize, u8)> = None;

    for element in document.select(&TEXT_NODES) {
        let text = element_text(element);
        if text.is_empty() {
            continue;
        }
        if let Some(score) = scan(&CRITIC_TEXT, &text) {
            if critic.map(|(len, _)| text.len() < len).unwrap_or(true) {
                critic = Some((text.len(), score));
            }
        }
        if let Some(score) = scan(&AUDIENCE_TEXT, &text) {
            if audience.map(|(len, _)| text.len() < len).unwrap_or(true) {
                audience = Some((text.len(), score));
            }
        }
    }

    ScoreFields {
        critic: critic.map(|(_, s)| s),
        audience: audience.map(|(_, s)| s),
        ..Default::default()
    }
}

fn scan(pattern: &Regex, text: &str) -> Option<u8> {
    let caps = pattern.captures(text)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .and_then(|m| parse_percent(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // テスト専用: 全フィールド未設定か
    impl ScoreFields {
        fn is_empty(&self) -> bool {
            *self == ScoreFields::default()
        }
    }

    #[test]
    fn test_scoreboard_attributes() {
        let html = r#"<score-board tomatometerscore="91" tomatometerstate="certified-fresh"
            audiencescore="94" audiencestate="upright"></score-board>"#;
        let fields = scoreboard_fields(&Html::parse_document(html));
        assert_eq!(fields.critic, Some(91));
        assert_eq!(fields.critic_state.as_deref(), Some("certified-fresh"));
        assert_eq!(fields.audience, Some(94));
        assert_eq!(fields.audience_state.as_deref(), Some("upright"));
    }

    #[test]
    fn test_scorecard_slots() {
        let html = r#"<media-scorecard>
            <score-icon-critics certified="false" sentiment="NEGATIVE"></score-icon-critics>
            <rt-text slot="criticsScore">45%</rt-text>
            <score-icon-audience sentiment="POSITIVE"></score-icon-audience>
            <rt-text slot="audienceScore">77%</rt-text>
        </media-scorecard>"#;
        let fields = scoreboard_fields(&Html::parse_document(html));
        assert_eq!(fields.critic, Some(45));
        assert_eq!(fields.critic_state.as_deref(), Some("rotten"));
        assert_eq!(fields.audience, Some(77));
        assert_eq!(fields.audience_state.as_deref(), Some("upright"));
    }

    #[test]
    fn test_json_ld() {
        let html = r#"<html><head><script type="application/ld+json">
            {"@type": "Movie", "name": "Inception",
             "aggregateRating": {"@type": "AggregateRating", "name": "Tomatometer", "ratingValue": "87"}}
            </script>
            <script type="application/ld+json">
            [{"@type": "AggregateRating", "name": "Popcornmeter", "ratingValue": 91}]
            </script>
            <script type="application/ld+json">{ not json</script></head><body></body></html>"#;
        let fields = json_ld_fields(&Html::parse_document(html));
        assert_eq!(fields.critic, Some(87));
        assert_eq!(fields.audience, Some(91));
    }

    #[test]
    fn test_json_ld_unknown_scheme_ignored() {
        let html = r#"<script type="application/ld+json">
            {"aggregateRating": {"name": "IMDb Rating", "ratingValue": 8.8}}</script>"#;
        let fields = json_ld_fields(&Html::parse_document(html));
        assert!(fields.is_empty());
    }

    #[test]
    fn test_text_scan() {
        let html = r#"<html><body><div class="scores">
            <p><span>Tomatometer</span> <span>83%</span></p>
            <p><span>92%</span> Audience Score</p>
        </div></body></html>"#;
        let fields = text_scan_fields(&Html::parse_document(html));
        assert_eq!(fields.critic, Some(83));
        assert_eq!(fields.audience, Some(92));
    }

    #[test]
    fn test_text_scan_no_match() {
        let html = "<html><body><p>Critics loved it.</p><p>50% off today</p></body></html>";
        let fields = text_scan_fields(&Html::parse_document(html));
        assert_eq!(fields.critic, None);
    }

    #[test]
    fn test_scoreboard_wins_over_text_scan() {
        let html = r#"<html><body>
            <score-board tomatometerscore="91"></score-board>
            <p>Critics Consensus 12%</p>
        </body></html>"#;
        let mut fields = ScoreFields::default();
        let used = fill_from_detail(&mut fields, html);
        assert_eq!(fields.critic, Some(91));
        assert_eq!(used, vec!["score-board"]);
    }

    #[test]
    fn test_existing_field_never_overwritten() {
        let html = r#"<html><body>
            <score-board tomatometerscore="91" audiencescore="70"></score-board>
        </body></html>"#;
        let mut fields = ScoreFields {
            critic: Some(72),
            ..Default::default()
        };
        fill_from_detail(&mut fields, html);
        assert_eq!(fields.critic, Some(72));
        assert_eq!(fields.audience, Some(70));
    }

    #[test]
    fn test_fields_filled_independently_across_sources() {
        let html = r#"<html><head><script type="application/ld+json">
            {"aggregateRating": {"name": "Audience Score", "ratingValue": "64"}}
            </script></head><body>
            <score-board tomatometerscore="55"></score-board>
            <p>Audience 10%</p>
        </body></html>"#;
        let mut fields = ScoreFields::default();
        let used = fill_from_detail(&mut fields, html);
        assert_eq!(fields.critic, Some(55));
        assert_eq!(fields.audience, Some(64));
        assert_eq!(used, vec!["score-board", "json-ld"]);
    }
}

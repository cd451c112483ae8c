//! 作品行に注入する結果断片とスタイル

use super::RESULT_MARKER;
use crate::config::Config;
use imdb_score_common::{ListingEntry, RatingsSummary, ScoreIcon};

/// 一覧見出しの文言
pub const HEADER_LABEL: &str = "External Ratings";

/// 起動時に1回だけ注入するスタイル
pub const STYLE_CSS: &str = r#"
.imdb-score-ratings {
    min-width: 100px;
    margin-top: 6px;
}
.imdb-score-ratings .score {
    display: block;
    font-weight: bold;
    font-size: 1.1em;
}
.imdb-score-ratings .score-icon {
    width: 16px;
    height: 16px;
    margin-right: 4px;
    vertical-align: middle;
}
.imdb-score-ratings .metacritic-score {
    color: #ff9900;
}
.imdb-score-ratings .rotten-tomatoes-score {
    color: #993333;
}
.imdb-score-ratings .external-link {
    font-size: 0.8em;
    margin-top: 5px;
    display: block;
}
"#;

/// 結果コンテナのHTMLを組み立てる
pub fn render_fragment(entry: &ListingEntry, summary: &RatingsSummary, config: &Config) -> String {
    let scores = &summary.rotten_tomatoes;
    let mut html = format!(
        r#"<div class="{}" data-imdb-id="{}">"#,
        RESULT_MARKER,
        escape(&entry.imdb_id)
    );

    html.push_str(&score_span(
        "rotten-tomatoes-score",
        scores.tomatometer_icon,
        &format!("RT: {}", scores.tomatometer),
    ));
    html.push_str(&score_span(
        "audience-score",
        scores.audience_icon,
        &format!("Audience: {}", scores.audience_score),
    ));
    if let Some(metascore) = &summary.metacritic {
        html.push_str(&score_span(
            "metacritic-score",
            None,
            &format!("Metacritic: {}", metascore),
        ));
    }

    if let Some(url) = &scores.url {
        html.push_str(&link("external-link rt-link", url, "Rotten Tomatoes"));
    }
    let search = config.external_search_link(&entry.imdb_id, &entry.title);
    html.push_str(&link("external-link", &search, "Search on External Site"));

    html.push_str("</div>");
    html
}

fn score_span(class: &str, icon: Option<ScoreIcon>, text: &str) -> String {
    let icon = icon
        .map(|icon| {
            format!(
                r#"<img class="score-icon" src="{}" alt="{}">"#,
                escape(icon.url()),
                icon.label()
            )
        })
        .unwrap_or_default();
    format!(r#"<span class="score {}">{}{}</span>"#, class, icon, escape(text))
}

fn link(class: &str, href: &str, text: &str) -> String {
    format!(
        r#"<a class="{}" href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
        class,
        escape(href),
        escape(text)
    )
}

/// テキスト・属性値用のHTMLエスケープ
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use imdb_score_common::ScoreResult;

    fn entry() -> ListingEntry {
        ListingEntry {
            imdb_id: "tt1375666".into(),
            title: "Inception".into(),
            year: Some("2010".into()),
        }
    }

    #[test]
    fn test_render_full() {
        let summary = RatingsSummary {
            rotten_tomatoes: ScoreResult {
                tomatometer: "87%".into(),
                audience_score: "91%".into(),
                tomatometer_icon: Some(ScoreIcon::CertifiedFresh),
                audience_icon: Some(ScoreIcon::Upright),
                url: Some("https://www.rottentomatoes.com/m/inception".into()),
            },
            metacritic: Some("74".into()),
        };
        let html = render_fragment(&entry(), &summary, &Config::default());

        assert!(html.starts_with(r#"<div class="imdb-score-ratings" data-imdb-id="tt1375666">"#));
        assert!(html.contains("RT: 87%"));
        assert!(html.contains("Audience: 91%"));
        assert!(html.contains("Metacritic: 74"));
        assert!(html.contains(ScoreIcon::CertifiedFresh.url()));
        assert!(html.contains(r#"href="https://www.rottentomatoes.com/m/inception""#));
        assert!(html.contains("q=tt1375666"));
        assert_eq!(html.matches("<a ").count(), 2);
    }

    #[test]
    fn test_render_unavailable() {
        let summary = RatingsSummary::default();
        let html = render_fragment(&entry(), &summary, &Config::default());

        assert!(html.contains("RT: N/A"));
        assert!(html.contains("Audience: N/A"));
        assert!(!html.contains("Metacritic"));
        assert!(!html.contains("<img"));
        assert_eq!(html.matches("<a ").count(), 1);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}

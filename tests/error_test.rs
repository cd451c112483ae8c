//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use imdb_score_rust::config::Config;
use imdb_score_rust::error::ScoreError;
use imdb_score_rust::page::DocumentPage;
use tempfile::tempdir;

/// 壊れた設定ファイルは JSON 解析エラー
#[test]
fn test_invalid_config_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = Config::load_from(&path);
    assert!(matches!(result.unwrap_err(), ScoreError::JsonParse(_)));
}

/// 不正な検索サイトURLでは照合器を作れない
#[test]
fn test_invalid_search_base_url() {
    let mut config = Config::default();
    config.search_base_url = "not a url".into();
    let fetcher = imdb_score_rust::fetcher::HttpFetcher::new(&config).unwrap();

    let result = imdb_score_rust::matcher::ScoreMatcher::new(fetcher, &config);
    assert!(matches!(result.err(), Some(ScoreError::InvalidUrl(_))));
}

/// 不正なセレクタは共通ライブラリのエラーとして伝播
#[test]
fn test_invalid_selector_propagates() {
    let mut page = DocumentPage::parse("<html><body></body></html>");
    let err = page.insert_html("[[", "<p>x</p>").unwrap_err();
    assert!(matches!(err, ScoreError::Common(_)));
}

/// ScoreErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        ScoreError::Config("テスト設定エラー".to_string()),
        ScoreError::FileNotFound("list.html".to_string()),
        ScoreError::HttpStatus {
            status: 404,
            url: "https://example.com/m/x".to_string(),
        },
        ScoreError::Page("作品行なし".to_string()),
        ScoreError::NoEntriesFound("list.html".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// ステータスエラーのメッセージにURLを含む
#[test]
fn test_http_status_message() {
    let err = ScoreError::HttpStatus {
        status: 503,
        url: "https://example.com/search".to_string(),
    };
    let display = format!("{}", err);

    assert!(display.contains("503"));
    assert!(display.contains("https://example.com/search"));
}

/// エラーのDebug実装確認
#[test]
fn test_error_debug() {
    let err = ScoreError::Config("テスト".to_string());
    let debug = format!("{:?}", err);
    assert!(debug.contains("Config"));
}

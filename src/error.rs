use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("HTTP通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTPステータスエラー: {status} ({url})")]
    HttpStatus { status: u16, url: String },

    #[error("URLが不正です: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] imdb_score_common::Error),

    #[error("ページ操作エラー: {0}")]
    Page(String),

    #[error("一覧の作品行が見つかりません: {0}")]
    NoEntriesFound(String),
}

pub type Result<T> = std::result::Result<T, ScoreError>;

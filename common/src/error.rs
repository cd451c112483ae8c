//! エラー型定義
//!
//! 解析そのものは失敗を「データなし」として扱うため、
//! エラーになるのは呼び出し側が渡したセレクタの不正のみ。

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Selector error: {0}")]
    Selector(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

/// CSSセレクタをパース（失敗時はSelectorエラー）
pub fn parse_selector(css: &str) -> Result<scraper::Selector> {
    scraper::Selector::parse(css).map_err(|e| Error::Selector(format!("{}: {:?}", css, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selector_valid() {
        assert!(parse_selector("search-page-media-row").is_ok());
        assert!(parse_selector(r#"a[href*="/title/tt"]"#).is_ok());
    }

    #[test]
    fn test_parse_selector_invalid() {
        let err = parse_selector("a[[").unwrap_err();
        assert!(matches!(err, Error::Selector(_)));
        assert!(format!("{}", err).starts_with("Selector error: a[["));
    }
}

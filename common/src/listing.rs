//! ホストページ行の文字列処理
//!
//! DOMに依存しない部分（ID抽出・連番除去・年抽出）のみ。

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IMDB_ID: Regex = Regex::new(r"tt\d+").unwrap();
    static ref LIST_NUMBER: Regex = Regex::new(r"^\s*\d+\.\s*").unwrap();
    static ref YEAR: Regex = Regex::new(r"\b(\d{4})\b").unwrap();
}

/// リンクのhrefから外部IDを抽出（例: "/title/tt1375666/?ref_=sr_1" → "tt1375666"）
pub fn extract_imdb_id(href: &str) -> Option<String> {
    IMDB_ID.find(href).map(|m| m.as_str().to_string())
}

/// 一覧の連番プレフィックスを除去（"12. Inception" → "Inception"）
pub fn strip_list_number(title: &str) -> String {
    LIST_NUMBER.replace(title, "").trim().to_string()
}

/// メタデータ文字列から4桁の年を抽出（"(2010)" / "2010–2014" → "2010"）
pub fn extract_year(text: &str) -> Option<String> {
    YEAR.captures(text).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_imdb_id() {
        assert_eq!(
            extract_imdb_id("/title/tt1375666/?ref_=sr_t_1").as_deref(),
            Some("tt1375666")
        );
        assert_eq!(
            extract_imdb_id("https://www.imdb.com/title/tt0111161/").as_deref(),
            Some("tt0111161")
        );
        assert_eq!(extract_imdb_id("/name/nm0634240/"), None);
    }

    #[test]
    fn test_strip_list_number() {
        assert_eq!(strip_list_number("1. Inception"), "Inception");
        assert_eq!(strip_list_number("  250.  The Matrix "), "The Matrix");
        assert_eq!(strip_list_number("2001: A Space Odyssey"), "2001: A Space Odyssey");
        assert_eq!(strip_list_number("9. 2001: A Space Odyssey"), "2001: A Space Odyssey");
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("2010").as_deref(), Some("2010"));
        assert_eq!(extract_year("(I) (2019)").as_deref(), Some("2019"));
        assert_eq!(extract_year("2008–2013").as_deref(), Some("2008"));
        assert_eq!(extract_year("2h 28m"), None);
    }
}

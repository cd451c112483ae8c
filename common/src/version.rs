//! バージョン文字列の抽出と比較

use lazy_static::lazy_static;
use regex::Regex;
use std::cmp::Ordering;

lazy_static! {
    // ユーザースクリプトのヘッダ（// @version 1.2.0）
    static ref HEADER_VERSION: Regex = Regex::new(r"@version\s+([0-9][0-9A-Za-z.\-]*)").unwrap();
    // Cargo.toml の version = "1.2.0"
    static ref CARGO_VERSION: Regex = Regex::new(r#"(?m)^\s*version\s*=\s*"([^"]+)""#).unwrap();
}

/// スクリプトソースからバージョン文字列を抽出
pub fn extract_version(source: &str) -> Option<String> {
    HEADER_VERSION
        .captures(source)
        .or_else(|| CARGO_VERSION.captures(source))
        .map(|caps| caps[1].trim().to_string())
}

/// バージョンを比較
///
/// ドット区切りで各要素を比較する。数値同士は数値として、
/// それ以外は文字列として比較し、足りない要素は 0 とみなす。
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left: Vec<&str> = a.trim().trim_start_matches('v').split('.').collect();
    let right: Vec<&str> = b.trim().trim_start_matches('v').split('.').collect();
    let len = left.len().max(right.len());

    for i in 0..len {
        let l = left.get(i).copied().unwrap_or("0");
        let r = right.get(i).copied().unwrap_or("0");
        let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => l.cmp(r),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    Ordering::Equal
}

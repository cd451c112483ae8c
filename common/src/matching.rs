//! 照合候補の選択
//!
//! 優先順位:
//! 1. タイトルが検索タイトルを含み（大小無視）、年フィールドが検索年を含む最初の行
//! 2. タイトルが検索タイトルと一致する（大小無視）最初の行
//! 3. 結果順で最初の行
//!
//! "Up" と "Up in the Air" のような部分一致の曖昧さはあえて解消しない。
//! 外部から見た挙動はこの優先順位に依存している。

use crate::types::CandidateMatch;

/// 候補から1件を選ぶ（空なら None）
///
/// # Arguments
/// * `candidates` - 結果順の候補
/// * `title` - 検索タイトル
/// * `year` - 検索年（任意）
///
/// # Returns
/// 選ばれた候補のインデックス
pub fn select_candidate(candidates: &[CandidateMatch], title: &str, year: Option<&str>) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }

    let query = title.trim().to_lowercase();

    // 年 + 部分一致（見つかった時点で確定）
    if let Some(year) = year.map(str::trim).filter(|y| !y.is_empty()) {
        let found = candidates.iter().position(|c| {
            let title_hit = c.title.to_lowercase().contains(&query);
            let year_hit = c.year.as_deref().map(|y| y.contains(year)).unwrap_or(false);
            title_hit && year_hit
        });
        if found.is_some() {
            return found;
        }
    }

    // 完全一致
    if let Some(exact) = candidates
        .iter()
        .position(|c| c.title.trim().to_lowercase() == query)
    {
        return Some(exact);
    }

    Some(0)
}

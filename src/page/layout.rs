//! ホストページのレイアウト定義
//!
//! 一覧のマークアップは世代ごとに異なるため、
//! 作品行が見つかった最初のレイアウトを採用する。

use lazy_static::lazy_static;
use scraper::Selector;

/// 一覧レイアウト
#[derive(Debug)]
pub struct HostLayout {
    pub name: &'static str,
    /// 作品行
    pub entry: Selector,
    /// 外部IDを含むリンク
    pub title_link: Selector,
    /// 表示タイトル
    pub title_text: Selector,
    /// 最初のメタデータ項目（公開年）
    pub metadata: Selector,
    /// 結果を書き込む子要素（なければ作品行に直接追加）
    pub region: Selector,
}

impl HostLayout {
    fn new(
        name: &'static str,
        entry: &str,
        title_link: &str,
        title_text: &str,
        metadata: &str,
        region: &str,
    ) -> Self {
        let parse = |css: &str| Selector::parse(css).unwrap();
        Self {
            name,
            entry: parse(entry),
            title_link: parse(title_link),
            title_text: parse(title_text),
            metadata: parse(metadata),
            region: parse(region),
        }
    }
}

lazy_static! {
    pub static ref LAYOUTS: Vec<HostLayout> = vec![
        HostLayout::new(
            "summary-list",
            "li.ipc-metadata-list-summary-item",
            r#"a.ipc-title-link-wrapper, a[href*="/title/tt"]"#,
            ".ipc-title__text",
            ".dli-title-metadata-item, .dli-title-metadata > span",
            ".ipc-metadata-list-summary-item__c",
        ),
        HostLayout::new(
            "lister-list",
            ".lister-item.mode-advanced",
            ".lister-item-header a",
            ".lister-item-header a",
            ".lister-item-year",
            ".lister-item-content",
        ),
    ];
}

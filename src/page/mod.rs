//! ホストページ（IMDb一覧）の文書モデル
//!
//! 読み取りは scraper、書き込みは ego_tree のノード操作で行う。
//! 追加するHTMLは断片としてパースし、ノードを複製して接ぎ木する。

pub mod fragment;
pub mod layout;

use crate::error::{Result, ScoreError};
use ego_tree::{NodeId, NodeRef, Tree};
use imdb_score_common::search::element_text;
use imdb_score_common::{extract_imdb_id, extract_year, strip_list_number, ListingEntry};
use layout::{HostLayout, LAYOUTS};
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Node, Selector};

/// 注入した結果コンテナのクラス（冪等性の目印）
pub const RESULT_MARKER: &str = "imdb-score-ratings";
/// 注入したスタイル要素のID
pub const STYLE_ID: &str = "imdb-score-style";
/// 一覧見出しのクラス
pub const HEADER_CLASS: &str = "imdb-score-header";

lazy_static! {
    static ref MARKER: Selector = Selector::parse(&format!(".{}", RESULT_MARKER)).unwrap();
    static ref STYLE: Selector = Selector::parse(&format!("style#{}", STYLE_ID)).unwrap();
    static ref HEADER: Selector = Selector::parse(&format!(".{}", HEADER_CLASS)).unwrap();
    static ref HEAD: Selector = Selector::parse("head").unwrap();
}

/// 発見した作品行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryNode {
    pub id: NodeId,
    layout: usize,
}

impl EntryNode {
    pub fn layout(&self) -> &'static HostLayout {
        &LAYOUTS[self.layout]
    }
}

/// ページへのノード追加の記録
#[derive(Debug, Clone, Default)]
pub struct MutationRecord {
    /// 追加された最上位ノード
    pub added: Vec<NodeId>,
}

/// 接ぎ木の位置
#[derive(Debug, Clone, Copy)]
enum Position {
    AppendTo(NodeId),
    Before(NodeId),
}

/// 変更可能なホストページ
#[derive(Debug)]
pub struct DocumentPage {
    html: Html,
}

impl DocumentPage {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// 作品行を列挙（最初に行が見つかったレイアウトを採用）
    pub fn entries(&self) -> Vec<EntryNode> {
        for (index, layout) in LAYOUTS.iter().enumerate() {
            let entries: Vec<EntryNode> = self
                .html
                .select(&layout.entry)
                .map(|el| EntryNode {
                    id: el.id(),
                    layout: index,
                })
                .collect();
            if !entries.is_empty() {
                return entries;
            }
        }
        Vec::new()
    }

    /// 注入済みの結果コンテナを持っているか
    pub fn has_result(&self, entry: EntryNode) -> bool {
        self.element(entry.id)
            .map(|el| el.select(&MARKER).next().is_some())
            .unwrap_or(false)
    }

    /// 作品行から外部ID・タイトル・年を読む
    ///
    /// IDまたはタイトルが取れなければ None（その行はスキップ対象）。
    pub fn listing_entry(&self, entry: EntryNode) -> Option<ListingEntry> {
        let element = self.element(entry.id)?;
        let layout = entry.layout();

        let link = element.select(&layout.title_link).next()?;
        let imdb_id = link.value().attr("href").and_then(extract_imdb_id)?;

        let raw_title = element
            .select(&layout.title_text)
            .next()
            .map(element_text)
            .unwrap_or_else(|| element_text(link));
        let title = strip_list_number(&raw_title);
        if title.is_empty() {
            return None;
        }

        let year = element
            .select(&layout.metadata)
            .next()
            .and_then(|meta| extract_year(&element_text(meta)));

        Some(ListingEntry {
            imdb_id,
            title,
            year,
        })
    }

    /// 結果断片を作品行の所定の子要素へ追加（なければ作品行そのものへ）
    pub fn inject_result(&mut self, entry: EntryNode, fragment: &str) -> Result<()> {
        let element = self
            .element(entry.id)
            .ok_or_else(|| ScoreError::Page("作品行がページから消えています".into()))?;
        let target = element
            .select(&entry.layout().region)
            .next()
            .map(|region| region.id())
            .unwrap_or(entry.id);

        self.graft(fragment, Position::AppendTo(target))?;
        Ok(())
    }

    /// スタイルを1回だけ注入
    ///
    /// # Returns
    /// 今回注入した場合 true
    pub fn inject_style(&mut self, css: &str) -> Result<bool> {
        if self.html.select(&STYLE).next().is_some() {
            return Ok(false);
        }
        let parent = self
            .html
            .select(&HEAD)
            .next()
            .map(|head| head.id())
            .unwrap_or_else(|| self.html.root_element().id());

        let style = format!("<style id=\"{}\">{}</style>", STYLE_ID, css);
        self.graft(&style, Position::AppendTo(parent))?;
        Ok(true)
    }

    /// 一覧の先頭に見出しを1回だけ挿入
    pub fn insert_header(&mut self, first_entry: EntryNode, label: &str) -> Result<bool> {
        if self.html.select(&HEADER).next().is_some() {
            return Ok(false);
        }
        let header = format!(
            "<h3 class=\"{}\">{}</h3>",
            HEADER_CLASS,
            fragment::escape(label)
        );
        self.graft(&header, Position::Before(first_entry.id))?;
        Ok(true)
    }

    /// ホスト側の遅延描画を反映（親要素の末尾にHTMLを追加）
    pub fn insert_html(&mut self, parent_css: &str, html: &str) -> Result<MutationRecord> {
        let selector = imdb_score_common::error::parse_selector(parent_css)?;
        let parent = self
            .html
            .select(&selector)
            .next()
            .map(|el| el.id())
            .ok_or_else(|| ScoreError::Page(format!("親要素が見つかりません: {}", parent_css)))?;

        let added = self.graft(html, Position::AppendTo(parent))?;
        Ok(MutationRecord { added })
    }

    /// ノードが作品行、または作品行を含むか
    pub fn is_or_contains_entry(&self, id: NodeId) -> bool {
        let element = match self.element(id) {
            Some(el) => el,
            None => return false,
        };
        LAYOUTS
            .iter()
            .any(|layout| layout.entry.matches(&element) || element.select(&layout.entry).next().is_some())
    }

    /// 注入済みの結果コンテナ数
    pub fn result_count(&self) -> usize {
        self.html.select(&MARKER).count()
    }

    pub fn header_count(&self) -> usize {
        self.html.select(&HEADER).count()
    }

    pub fn style_count(&self) -> usize {
        self.html.select(&STYLE).count()
    }

    pub fn document(&self) -> &Html {
        &self.html
    }

    pub fn to_html(&self) -> String {
        self.html.html()
    }

    fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }

    /// HTML断片をパースしてノードを複製する
    fn graft(&mut self, source: &str, position: Position) -> Result<Vec<NodeId>> {
        let fragment = Html::parse_fragment(source);
        let mut added = Vec::new();

        let target = match position {
            Position::AppendTo(id) | Position::Before(id) => id,
        };

        for child in fragment.root_element().children() {
            let id = {
                let mut anchor = self
                    .html
                    .tree
                    .get_mut(target)
                    .ok_or_else(|| ScoreError::Page("挿入位置のノードがありません".into()))?;
                match position {
                    Position::AppendTo(_) => anchor.append(child.value().clone()).id(),
                    Position::Before(_) => anchor.insert_before(child.value().clone()).id(),
                }
            };
            for grandchild in child.children() {
                copy_subtree(&mut self.html.tree, id, grandchild);
            }
            added.push(id);
        }

        Ok(added)
    }
}

fn copy_subtree(tree: &mut Tree<Node>, parent: NodeId, source: NodeRef<'_, Node>) {
    let id = match tree.get_mut(parent) {
        Some(mut node) => node.append(source.value().clone()).id(),
        None => return,
    };
    for child in source.children() {
        copy_subtree(tree, id, child);
    }
}

//! ホストページ同期
//!
//! 1回の走査（`sync`）は冪等で、何度呼んでも作品行ごとの結果は1つだけになる。
//! 作品行ごとに評価取得を待ってから次の行へ進む（行をまたいだ並行取得はしない）。
//! 走査の起動は `queue` の単一消費者ループが直列化する。

pub mod queue;

use crate::config::Config;
use crate::error::Result;
use crate::fetcher::Fetch;
use crate::matcher::ScoreMatcher;
use crate::page::fragment::{render_fragment, HEADER_LABEL, STYLE_CSS};
use crate::page::DocumentPage;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub use queue::{LoopStats, PageObserver, SyncHandle, SyncLoop};

/// 1回の走査結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// 見つかった作品行
    pub discovered: usize,
    /// 今回結果を書き込んだ行
    pub injected: usize,
    /// 既に結果があった行
    pub already_done: usize,
    /// IDまたはタイトルが取れずスキップした行
    pub incomplete: usize,
    /// 作品行なしで再走査した回数
    pub retries: u32,
}

impl SyncReport {
    pub fn found_entries(&self) -> bool {
        self.discovered > 0
    }
}

pub struct Synchronizer<F> {
    page: Rc<RefCell<DocumentPage>>,
    matcher: ScoreMatcher<F>,
    config: Config,
}

impl<F: Fetch> Synchronizer<F> {
    /// 起動処理（スタイル注入）を行って同期器を作る
    pub fn new(page: Rc<RefCell<DocumentPage>>, matcher: ScoreMatcher<F>, config: Config) -> Result<Self> {
        page.borrow_mut().inject_style(STYLE_CSS)?;
        Ok(Self {
            page,
            matcher,
            config,
        })
    }

    pub fn page(&self) -> Rc<RefCell<DocumentPage>> {
        Rc::clone(&self.page)
    }

    pub fn matcher(&self) -> &ScoreMatcher<F> {
        &self.matcher
    }

    /// ページを1回走査して未処理の作品行に結果を書き込む
    pub async fn sync(&self) -> SyncReport {
        let entries = self.page.borrow().entries();
        let mut report = SyncReport {
            discovered: entries.len(),
            ..Default::default()
        };

        if entries.is_empty() {
            debug!("作品行が見つかりません");
            return report;
        }

        for &entry in &entries {
            let listing = {
                let page = self.page.borrow();
                if page.has_result(entry) {
                    report.already_done += 1;
                    continue;
                }
                match page.listing_entry(entry) {
                    Some(listing) => listing,
                    None => {
                        debug!(node = ?entry.id, "IDまたはタイトルがないためスキップ");
                        report.incomplete += 1;
                        continue;
                    }
                }
            };

            let summary = self.matcher.fetch_ratings(&listing).await;
            let fragment = render_fragment(&listing, &summary, &self.config);

            // 取得待ちの間に書き込まれていないか再確認
            let mut page = self.page.borrow_mut();
            if page.has_result(entry) {
                report.already_done += 1;
                continue;
            }
            match page.inject_result(entry, &fragment) {
                Ok(()) => {
                    debug!(
                        imdb_id = %listing.imdb_id,
                        title = %listing.title,
                        tomatometer = %summary.rotten_tomatoes.tomatometer,
                        "結果を書き込み"
                    );
                    report.injected += 1;
                }
                Err(e) => warn!(imdb_id = %listing.imdb_id, error = %e, "結果を書き込めません"),
            }
        }

        if report.injected > 0 {
            if let Err(e) = self.page.borrow_mut().insert_header(entries[0], HEADER_LABEL) {
                warn!(error = %e, "見出しを挿入できません");
            }
        }

        info!(
            discovered = report.discovered,
            injected = report.injected,
            already_done = report.already_done,
            incomplete = report.incomplete,
            "走査完了"
        );
        report
    }

    /// 作品行が見つからなければ一定間隔で再走査する（回数上限あり）
    pub async fn sync_with_retry(&self) -> SyncReport {
        let mut report = self.sync().await;
        let mut retries = 0;

        while !report.found_entries() && retries < self.config.empty_retry_limit {
            retries += 1;
            debug!(retries, "作品行なし、再走査を予約");
            tokio::time::sleep(Duration::from_millis(self.config.empty_retry_delay_ms)).await;
            report = self.sync().await;
        }

        report.retries = retries;
        report
    }
}

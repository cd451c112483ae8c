//! 再走査キュー
//!
//! ページ変更の監視側は再走査トークンを積むだけで、
//! 走査は単一の消費者ループが1つずつ実行する。走査同士は重ならない。

use super::Synchronizer;
use crate::fetcher::Fetch;
use crate::page::{DocumentPage, MutationRecord};
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::mpsc;
use tracing::debug;

/// 再走査要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RescanToken;

/// 再走査要求の送信側
#[derive(Debug, Clone)]
pub struct SyncHandle {
    tx: mpsc::UnboundedSender<RescanToken>,
}

impl SyncHandle {
    /// 再走査を要求（ループ終了後は false）
    pub fn request_rescan(&self) -> bool {
        self.tx.send(RescanToken).is_ok()
    }
}

/// ページ変更の監視
///
/// 追加されたノードのいずれかが作品行、または作品行を含む場合のみ再走査を積む。
#[derive(Debug, Clone)]
pub struct PageObserver {
    page: Rc<RefCell<DocumentPage>>,
    handle: SyncHandle,
}

impl PageObserver {
    pub fn new(page: Rc<RefCell<DocumentPage>>, handle: SyncHandle) -> Self {
        Self { page, handle }
    }

    /// 変更を通知（再走査を積んだら true）
    pub fn observe(&self, record: &MutationRecord) -> bool {
        let relevant = {
            let page = self.page.borrow();
            record.added.iter().any(|&id| page.is_or_contains_entry(id))
        };

        if !relevant {
            return false;
        }
        debug!(added = record.added.len(), "作品行の追加を検知");
        self.handle.request_rescan()
    }
}

/// ループの統計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// 実行した走査数
    pub passes: usize,
    /// 実行中に溜まって1回にまとめたトークン数
    pub coalesced: usize,
    /// 書き込んだ結果の合計
    pub injected: usize,
}

/// 単一消費者の走査ループ
pub struct SyncLoop<F> {
    synchronizer: Synchronizer<F>,
    rx: mpsc::UnboundedReceiver<RescanToken>,
}

impl<F: Fetch> SyncLoop<F> {
    pub fn new(synchronizer: Synchronizer<F>) -> (Self, SyncHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { synchronizer, rx }, SyncHandle { tx })
    }

    /// 全ての送信側が閉じるまでトークンを処理する
    pub async fn run(mut self) -> LoopStats {
        let mut stats = LoopStats::default();

        while self.rx.recv().await.is_some() {
            // 既に溜まっている要求は次の1回でまとめて処理できる
            while self.rx.try_recv().is_ok() {
                stats.coalesced += 1;
            }

            let report = self.synchronizer.sync_with_retry().await;
            stats.passes += 1;
            stats.injected += report.injected;
        }

        debug!(passes = stats.passes, coalesced = stats.coalesced, "走査ループ終了");
        stats
    }
}

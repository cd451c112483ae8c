use anyhow::Context;
use clap::Parser;
use imdb_score_common::ListingEntry;
use imdb_score_rust::{cli, config, error, fetcher, logging, matcher, page, sync, update};
use cli::{Cli, Commands};
use config::Config;
use fetcher::{Fetch, HttpFetcher};
use matcher::ScoreMatcher;
use page::DocumentPage;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use sync::{SyncLoop, Synchronizer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);
    let config = Config::load().context("設定の読み込みに失敗")?;

    match cli.command {
        Commands::Enrich { input, output, no_metacritic } => {
            eprintln!("🎬 imdb-score - 評価スコア追加\n");

            let mut config = config;
            if no_metacritic {
                config.metacritic_enabled = false;
            }
            let fetcher = HttpFetcher::new(&config)?;

            // 1. 一覧ページ読み込み
            eprintln!("[1/3] 一覧ページを読み込み中...");
            let source = load_listing(&fetcher, &input).await?;
            let page = Rc::new(RefCell::new(DocumentPage::parse(&source)));
            let found = page.borrow().entries().len();
            eprintln!("✔ {}件の作品行を検出\n", found);

            // 2. 同期（再走査要求がなくなるまで）
            // 読み込んだHTMLは後から描画されないため PageObserver は登録しない。
            // 初回の走査要求だけ積んで送信側を閉じる。
            eprintln!("[2/3] 評価スコアを取得中...");
            let matcher = ScoreMatcher::new(fetcher, &config)?;
            let synchronizer = Synchronizer::new(Rc::clone(&page), matcher, config.clone())?;
            let (sync_loop, handle) = SyncLoop::new(synchronizer);
            handle.request_rescan();
            drop(handle);
            let stats = sync_loop.run().await;

            if page.borrow().entries().is_empty() {
                return Err(error::ScoreError::NoEntriesFound(input).into());
            }
            eprintln!("✔ {}件に評価を追加 (走査 {}回)\n", stats.injected, stats.passes);

            // 3. 出力
            eprintln!("[3/3] HTMLを出力中...");
            let html = page.borrow().to_html();
            match output {
                Some(path) => {
                    std::fs::write(&path, html)
                        .with_context(|| format!("出力に失敗: {}", path.display()))?;
                    eprintln!("✔ 出力: {}", path.display());
                }
                None => println!("{}", html),
            }

            eprintln!("\n✅ 完了");
        }

        Commands::Scores { title, year, json } => {
            let fetcher = HttpFetcher::new(&config)?;
            let matcher = ScoreMatcher::new(fetcher, &config)?;
            let entry = ListingEntry {
                imdb_id: String::new(),
                title,
                year,
            };
            let summary = matcher.fetch_ratings(&entry).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                let scores = &summary.rotten_tomatoes;
                println!("🍅 {}", entry.title);
                println!("  Tomatometer: {}", scores.tomatometer);
                println!("  Audience: {}", scores.audience_score);
                if let Some(metascore) = &summary.metacritic {
                    println!("  Metacritic: {}", metascore);
                }
                if let Some(url) = &scores.url {
                    println!("  URL: {}", url);
                }
            }
        }

        Commands::CheckUpdate => {
            let fetcher = HttpFetcher::new(&config)?;
            let status = update::check_for_updates(&fetcher, &config).await;
            match status {
                update::UpdateStatus::Failed(_) => println!("⚠ {}", status.message()),
                _ => println!("✔ {}", status.message()),
            }
        }

        Commands::Config { show, set_search_link, metacritic } => {
            let mut config = config;
            let mut changed = false;

            if let Some(url) = set_search_link {
                config.set_external_search_url(url)?;
                println!("✔ 外部検索リンクを設定しました");
                changed = true;
            }

            if let Some(toggle) = metacritic {
                config.metacritic_enabled = toggle.enabled();
                println!("✔ Metacritic: {}", toggle);
                changed = true;
            }

            if changed {
                config.save().context("設定の保存に失敗")?;
            }

            if show || !changed {
                println!("設定:");
                println!("  検索サイト: {}", config.search_base_url);
                println!("  Metacritic: {}", if config.metacritic_enabled { "有効" } else { "無効" });
                println!("  外部検索リンク: {}", config.external_search_url);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  バージョン: {}", config.current_version);
            }
        }
    }

    Ok(())
}

/// 一覧ページをファイルまたはURLから読み込む
async fn load_listing(fetcher: &impl Fetch, input: &str) -> anyhow::Result<String> {
    if input.starts_with("http://") || input.starts_with("https://") {
        let html = fetcher
            .get_text(input)
            .await
            .with_context(|| format!("一覧ページの取得に失敗: {}", input))?;
        return Ok(html);
    }

    let path = Path::new(input);
    if !path.exists() {
        return Err(error::ScoreError::FileNotFound(input.to_string()).into());
    }
    Ok(std::fs::read_to_string(path)?)
}

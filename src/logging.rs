//! ログ初期化

use tracing_subscriber::EnvFilter;

/// tracing を初期化する
///
/// `RUST_LOG` が設定されていればそれを優先し、なければ
/// `--verbose` 指定時は debug、通常は warn を出力する。
/// 出力先は stderr（stdout はHTML・JSON出力に使う）。
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("imdb_score_rust={0},imdb_score_common={0}", default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "imdb-score")]
#[command(about = "IMDb一覧ページに外部評価スコアを追加するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 一覧ページに評価スコアを追加してHTMLを出力
    Enrich {
        /// 一覧ページ（ファイルパスまたはURL）
        #[arg(required = true)]
        input: String,

        /// 出力HTMLファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Metacriticの取得を無効化
        #[arg(long)]
        no_metacritic: bool,
    },

    /// 1作品の評価スコアを取得
    Scores {
        /// 作品タイトル
        #[arg(required = true)]
        title: String,

        /// 公開年
        #[arg(short, long)]
        year: Option<String>,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 更新を確認
    CheckUpdate,

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 外部検索リンクを設定（__IMDB_ID__ / __TITLE__ を含むURL）
        #[arg(long)]
        set_search_link: Option<String>,

        /// Metacriticの取得 (on/off)
        #[arg(long)]
        metacritic: Option<Toggle>,
    },
}

/// on/off 指定
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(&self) -> bool {
        matches!(self, Toggle::On)
    }
}

impl std::str::FromStr for Toggle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "on" | "true" | "yes" | "1" => Ok(Toggle::On),
            "off" | "false" | "no" | "0" => Ok(Toggle::Off),
            _ => Err(format!("Unknown value: {}. Use on or off", s)),
        }
    }
}

impl std::fmt::Display for Toggle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Toggle::On => write!(f, "on"),
            Toggle::Off => write!(f, "off"),
        }
    }
}

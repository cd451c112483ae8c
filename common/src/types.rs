//! スコア取得の型定義
//!
//! CLIとホストページ同期で共有される型:
//! - ListingEntry: ホストページの1作品行
//! - CandidateMatch: 検索結果の1行（照合候補）
//! - ScoreFields: 取得途中の部分スコア
//! - ScoreResult: 最終出力（表示用の文字列とアイコン）

use serde::{Deserialize, Serialize};

/// スコアが取得できなかった場合の表示値
pub const NOT_AVAILABLE: &str = "N/A";

/// アイコン判定のしきい値（これ以上で fresh / upright）
pub const FRESH_THRESHOLD: u8 = 60;

/// ホストページの作品行（ページ走査ごとに再生成）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEntry {
    /// 外部ID（例: tt1375666）
    pub imdb_id: String,
    /// 表示タイトル（連番プレフィックス除去済み）
    pub title: String,
    /// 公開年（4桁）
    #[serde(default)]
    pub year: Option<String>,
}

/// 部分スコア
///
/// 各フィールドは独立して埋まる。先に埋まった値が優先され、
/// 後続ソースで上書きされない。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreFields {
    /// 批評家スコア（0-100）
    pub critic: Option<u8>,
    /// 批評家側の状態（certified / fresh / rotten）
    pub critic_state: Option<String>,
    /// 観客スコア（0-100）
    pub audience: Option<u8>,
    /// 観客側の状態（upright / spilled）
    pub audience_state: Option<String>,
}

impl ScoreFields {
    /// 未設定のフィールドだけを `other` から埋める
    pub fn fill_missing(&mut self, other: ScoreFields) {
        if self.critic.is_none() {
            self.critic = other.critic;
        }
        if self.critic_state.is_none() {
            self.critic_state = other.critic_state;
        }
        if self.audience.is_none() {
            self.audience = other.audience;
        }
        if self.audience_state.is_none() {
            self.audience_state = other.audience_state;
        }
    }

    /// 全フィールドが埋まっているか
    pub fn is_complete(&self) -> bool {
        self.critic.is_some()
            && self.critic_state.is_some()
            && self.audience.is_some()
            && self.audience_state.is_some()
    }
}

/// 検索結果の照合候補
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateMatch {
    pub title: String,
    #[serde(default)]
    pub year: Option<String>,
    /// 詳細ページURL（相対パスのこともある）
    #[serde(default)]
    pub url: Option<String>,
    /// メディア種別（movie / tvSeries など、判別できた場合のみ）
    #[serde(default)]
    pub category: Option<String>,
    /// 検索結果行に直接載っているスコア
    #[serde(default)]
    pub scores: ScoreFields,
}

/// スコアアイコン
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreIcon {
    CertifiedFresh,
    Fresh,
    Rotten,
    Upright,
    Spilled,
}

impl ScoreIcon {
    /// 状態文字列からアイコンを判定
    ///
    /// "certified-fresh" のような複合表記にも対応するため部分一致で見る。
    pub fn from_state(state: &str) -> Option<Self> {
        let state = state.trim().to_lowercase();
        if state.contains("certified") {
            Some(ScoreIcon::CertifiedFresh)
        } else if state.contains("fresh") {
            Some(ScoreIcon::Fresh)
        } else if state.contains("rotten") {
            Some(ScoreIcon::Rotten)
        } else if state.contains("upright") {
            Some(ScoreIcon::Upright)
        } else if state.contains("spilled") {
            Some(ScoreIcon::Spilled)
        } else {
            None
        }
    }

    /// 批評家スコアから fresh / rotten を判定
    pub fn for_critic_score(score: u8) -> Self {
        if score >= FRESH_THRESHOLD {
            ScoreIcon::Fresh
        } else {
            ScoreIcon::Rotten
        }
    }

    /// 観客スコアから upright / spilled を判定
    pub fn for_audience_score(score: u8) -> Self {
        if score >= FRESH_THRESHOLD {
            ScoreIcon::Upright
        } else {
            ScoreIcon::Spilled
        }
    }

    /// アイコン画像URL（固定テーブル）
    pub fn url(&self) -> &'static str {
        match self {
            ScoreIcon::CertifiedFresh => {
                "https://www.rottentomatoes.com/assets/pizza-pie/images/icons/tomatometer/certified_fresh-notext.56a89734a59.svg"
            }
            ScoreIcon::Fresh => {
                "https://www.rottentomatoes.com/assets/pizza-pie/images/icons/tomatometer/tomatometer-fresh.149b5e8adc3.svg"
            }
            ScoreIcon::Rotten => {
                "https://www.rottentomatoes.com/assets/pizza-pie/images/icons/tomatometer/tomatometer-rotten.f1ef4f02ce3.svg"
            }
            ScoreIcon::Upright => {
                "https://www.rottentomatoes.com/assets/pizza-pie/images/icons/audience/aud_score-fresh.6c24d79faaf.svg"
            }
            ScoreIcon::Spilled => {
                "https://www.rottentomatoes.com/assets/pizza-pie/images/icons/audience/aud_score-rotten.f419e4046b7.svg"
            }
        }
    }

    /// alt属性用のラベル
    pub fn label(&self) -> &'static str {
        match self {
            ScoreIcon::CertifiedFresh => "Certified Fresh",
            ScoreIcon::Fresh => "Fresh",
            ScoreIcon::Rotten => "Rotten",
            ScoreIcon::Upright => "Upright",
            ScoreIcon::Spilled => "Spilled",
        }
    }
}

/// Matcherの出力
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// 批評家スコア（"87%" または "N/A"）
    pub tomatometer: String,
    /// 観客スコア（"91%" または "N/A"）
    pub audience_score: String,
    #[serde(default)]
    pub tomatometer_icon: Option<ScoreIcon>,
    #[serde(default)]
    pub audience_icon: Option<ScoreIcon>,
    /// 一致した作品の詳細ページURL
    #[serde(default)]
    pub url: Option<String>,
}

impl ScoreResult {
    /// 全項目 "N/A" の結果
    pub fn unavailable() -> Self {
        Self {
            tomatometer: NOT_AVAILABLE.to_string(),
            audience_score: NOT_AVAILABLE.to_string(),
            tomatometer_icon: None,
            audience_icon: None,
            url: None,
        }
    }

    /// 部分スコアから最終結果を組み立てる
    ///
    /// 状態文字列があればそれを優先し、なければ数値から二値判定する。
    pub fn from_fields(fields: &ScoreFields, url: Option<String>) -> Self {
        let tomatometer_icon = fields
            .critic_state
            .as_deref()
            .and_then(ScoreIcon::from_state)
            .or_else(|| fields.critic.map(ScoreIcon::for_critic_score));
        let audience_icon = fields
            .audience_state
            .as_deref()
            .and_then(ScoreIcon::from_state)
            .or_else(|| fields.audience.map(ScoreIcon::for_audience_score));

        Self {
            tomatometer: format_percent(fields.critic),
            audience_score: format_percent(fields.audience),
            tomatometer_icon,
            audience_icon,
            url,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.tomatometer == NOT_AVAILABLE && self.audience_score == NOT_AVAILABLE && self.url.is_none()
    }
}

impl Default for ScoreResult {
    fn default() -> Self {
        Self::unavailable()
    }
}

/// 1作品分の表示データ（Rotten Tomatoes + Metacritic）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingsSummary {
    pub rotten_tomatoes: ScoreResult,
    /// Metacriticスコア（無効化時は None、取得失敗時は "N/A"）
    #[serde(default)]
    pub metacritic: Option<String>,
}

fn format_percent(score: Option<u8>) -> String {
    match score {
        Some(s) => format!("{}%", s),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// "87" / "87%" / " 87 % " を 0-100 の数値に変換
pub fn parse_percent(text: &str) -> Option<u8> {
    let digits = text.trim().trim_end_matches('%').trim();
    if digits.is_empty() {
        return None;
    }
    let value: f64 = digits.parse().ok()?;
    if (0.0..=100.0).contains(&value) {
        Some(value.round() as u8)
    } else {
        None
    }
}

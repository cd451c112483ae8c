//! IMDb Score Common Library
//!
//! 外部評価サイトのHTML解析と照合ロジック（ネットワーク非依存）

pub mod types;
pub mod error;
pub mod matching;
pub mod search;
pub mod detail;
pub mod listing;
pub mod metacritic;
pub mod version;

pub use types::{
    CandidateMatch, ListingEntry, RatingsSummary, ScoreFields, ScoreIcon, ScoreResult,
    NOT_AVAILABLE,
};
pub use error::{Error, Result};
pub use matching::select_candidate;
pub use search::{parse_search_results, SearchResults, SearchStrategy, SEARCH_STRATEGIES};
pub use detail::{fill_from_detail, DetailSource, DETAIL_SOURCES};
pub use listing::{extract_imdb_id, extract_year, strip_list_number};
pub use metacritic::parse_metascore;
pub use version::{compare_versions, extract_version};

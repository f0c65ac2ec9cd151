//! Tunables of the collaborative-filtering pipeline.

use serde::Deserialize;

/// Candidates kept after ranking by overlap count
pub const DEFAULT_CANDIDATE_POOL: usize = 100;
/// Neighbors kept after ranking by similarity
pub const DEFAULT_NEIGHBORHOOD_SIZE: usize = 50;
/// Recommendations returned per request
pub const DEFAULT_TOP_N: usize = 10;

/// How repeated (user, movie) rating events are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateRatings {
    /// Every event counts, including repeats
    #[default]
    KeepAll,
    /// Only the first event per (user, movie) in store order counts
    KeepFirst,
}

impl std::str::FromStr for DuplicateRatings {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep_all" | "keep-all" => Ok(DuplicateRatings::KeepAll),
            "keep_first" | "keep-first" => Ok(DuplicateRatings::KeepFirst),
            other => Err(format!("unknown duplicate rating policy: {other}")),
        }
    }
}

/// Configuration for [`crate::CollaborativeRecommender`].
///
/// Defaults keep 100 candidates by overlap and 50 neighbors by similarity,
/// return 10 results, and keep both already-rated movies and duplicate
/// rating events.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    pub candidate_pool: usize,
    pub neighborhood_size: usize,
    pub top_n: usize,
    pub exclude_rated: bool,
    pub duplicate_ratings: DuplicateRatings,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            candidate_pool: DEFAULT_CANDIDATE_POOL,
            neighborhood_size: DEFAULT_NEIGHBORHOOD_SIZE,
            top_n: DEFAULT_TOP_N,
            exclude_rated: false,
            duplicate_ratings: DuplicateRatings::KeepAll,
        }
    }
}

impl RecommenderConfig {
    /// Configure the overlap-count cut (default: 100)
    pub fn with_candidate_pool(mut self, size: usize) -> Self {
        self.candidate_pool = size;
        self
    }

    /// Configure the similarity cut (default: 50)
    pub fn with_neighborhood_size(mut self, size: usize) -> Self {
        self.neighborhood_size = size;
        self
    }

    /// Configure how many recommendations are returned (default: 10)
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    /// Drop movies the caller already rated from the output (default: false)
    pub fn with_exclude_rated(mut self, exclude: bool) -> Self {
        self.exclude_rated = exclude;
        self
    }

    /// Configure the duplicate event policy (default: KeepAll)
    pub fn with_duplicate_ratings(mut self, policy: DuplicateRatings) -> Self {
        self.duplicate_ratings = policy;
        self
    }
}

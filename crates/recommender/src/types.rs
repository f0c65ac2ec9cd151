//! Request-scoped types flowing through the recommendation pipeline.
//!
//! Everything here lives for one request only and is never mutated after
//! construction.

use data_loader::{MovieId, UserId};
use serde::{Deserialize, Serialize};

/// A caller-supplied rating, keyed by movie title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRating {
    pub title: String,
    pub rating: f32,
}

impl InputRating {
    pub fn new(title: impl Into<String>, rating: f32) -> Self {
        Self {
            title: title.into(),
            rating,
        }
    }
}

/// An input rating whose title matched a catalog entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedInputRating {
    pub movie_id: MovieId,
    pub rating: f32,
}

/// A user who rated at least one of the input movies.
///
/// `overlap` holds that user's ratings on input movies as
/// `(movie_id, rating)`, sorted by movie id.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateUser {
    pub user_id: UserId,
    pub overlap: Vec<(MovieId, f32)>,
}

impl CandidateUser {
    /// Number of overlapping rating events
    pub fn overlap_count(&self) -> usize {
        self.overlap.len()
    }
}

/// Pearson similarity between the caller and one candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityRecord {
    pub user_id: UserId,
    pub similarity: f64,
}

/// Similarity-weighted average score for one movie
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub movie_id: MovieId,
    pub score: f64,
}

/// One row of the final output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub year: Option<u16>,
    pub score: f64,
}

/// Intermediate results of one request, for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct RecommendationTrace {
    pub resolved: Vec<ResolvedInputRating>,
    /// Candidates kept after the overlap-count cut
    pub candidates: usize,
    /// Final neighborhood, best similarity first
    pub neighborhood: Vec<SimilarityRecord>,
    /// Movies with a defined prediction
    pub predictions: usize,
    pub recommendations: Vec<Recommendation>,
}

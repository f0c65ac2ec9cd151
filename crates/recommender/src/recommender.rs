//! User-based collaborative filtering over the shared DataIndex.
//!
//! ## Pipeline
//! 1. Resolve input titles to movie ids
//! 2. Select up to `candidate_pool` users by rating overlap
//! 3. Score them with Pearson similarity, keep the best `neighborhood_size`
//! 4. Predict every movie the neighbors rated by weighted average
//! 5. Rank and return the top `top_n` with titles
//!
//! Every degenerate case (no match, zero variance, zero weight, too few
//! movies) shrinks the output instead of failing.

use crate::aggregate::predict_scores;
use crate::config::RecommenderConfig;
use crate::neighborhood::select_candidates;
use crate::ranker::rank_predictions;
use crate::resolver::resolve_inputs;
use crate::similarity::{score_candidates, select_neighborhood};
use crate::types::{InputRating, Recommendation, RecommendationTrace};
use data_loader::{DataIndex, MovieId};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Recommends movies from a list of (title, rating) pairs.
///
/// Holds only a shared read-only reference to the data, so one instance
/// can serve any number of concurrent requests.
#[derive(Clone)]
pub struct CollaborativeRecommender {
    /// Shared reference to the data index (read-only, so no Mutex needed)
    data_index: Arc<DataIndex>,
    config: RecommenderConfig,
}

impl CollaborativeRecommender {
    /// Create a recommender with the default configuration
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self {
            data_index,
            config: RecommenderConfig::default(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: RecommenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn data_index(&self) -> &Arc<DataIndex> {
        &self.data_index
    }

    /// Recommend up to `top_n` movies for the given ratings.
    ///
    /// Returns an empty list when no input title resolves.
    pub fn recommend(&self, inputs: &[InputRating]) -> Vec<Recommendation> {
        self.recommend_with_trace(inputs).recommendations
    }

    /// Run the pipeline and keep every intermediate result.
    #[instrument(skip_all, fields(inputs = inputs.len()))]
    pub fn recommend_with_trace(&self, inputs: &[InputRating]) -> RecommendationTrace {
        let start_time = Instant::now();
        let config = &self.config;

        let resolved = resolve_inputs(&self.data_index, inputs);
        if resolved.is_empty() {
            info!("No input title matched the catalog, nothing to recommend");
            return RecommendationTrace::default();
        }

        let candidates = select_candidates(
            &self.data_index,
            &resolved,
            config.candidate_pool,
            config.duplicate_ratings,
        );

        let similarities = score_candidates(&resolved, &candidates);
        let neighborhood = select_neighborhood(similarities, config.neighborhood_size);

        let predictions = predict_scores(&self.data_index, &neighborhood, config.duplicate_ratings);
        let prediction_count = predictions.len();

        let exclude: HashSet<MovieId> = if config.exclude_rated {
            resolved.iter().map(|r| r.movie_id).collect()
        } else {
            HashSet::new()
        };
        let recommendations =
            rank_predictions(&self.data_index, predictions, config.top_n, &exclude);

        debug!(
            "Pipeline: {} resolved, {} candidates, {} neighbors, {} predictions",
            resolved.len(),
            candidates.len(),
            neighborhood.len(),
            prediction_count
        );
        info!(
            "Produced {} recommendations in {:.2?}",
            recommendations.len(),
            start_time.elapsed()
        );

        RecommendationTrace {
            resolved,
            candidates: candidates.len(),
            neighborhood,
            predictions: prediction_count,
            recommendations,
        }
    }
}

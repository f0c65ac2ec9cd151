//! Similarity-weighted prediction over the neighbors' full histories.
//!
//! ## Algorithm
//! For every rating event of every neighbor (all movies, not only the
//! overlapping ones):
//! - `weighted = similarity × rating`
//! - per movie, accumulate `Σ similarity` and `Σ weighted`
//!
//! The predicted score is `Σ weighted / Σ similarity`. A movie whose
//! similarity sum is zero has no defined score and is left out, as is any
//! movie whose quotient is not finite.

use crate::config::DuplicateRatings;
use crate::types::{Prediction, SimilarityRecord};
use data_loader::{DataIndex, MovieId};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, instrument};

#[derive(Debug, Default, Clone, Copy)]
struct MovieTotals {
    similarity: f64,
    weighted: f64,
}

/// Compute predictions for every movie rated by the neighborhood.
///
/// Output is ordered by movie id.
#[instrument(skip_all, fields(neighbors = neighborhood.len()))]
pub fn predict_scores(
    data_index: &DataIndex,
    neighborhood: &[SimilarityRecord],
    duplicates: DuplicateRatings,
) -> Vec<Prediction> {
    let mut totals: BTreeMap<MovieId, MovieTotals> = BTreeMap::new();

    for neighbor in neighborhood {
        let mut seen: HashSet<MovieId> = HashSet::new();
        for rating in data_index.get_user_ratings(neighbor.user_id) {
            if duplicates == DuplicateRatings::KeepFirst && !seen.insert(rating.movie_id) {
                continue;
            }
            let entry = totals.entry(rating.movie_id).or_default();
            entry.similarity += neighbor.similarity;
            entry.weighted += neighbor.similarity * rating.rating as f64;
        }
    }

    let movies = totals.len();
    let predictions: Vec<Prediction> = totals
        .into_iter()
        .filter_map(|(movie_id, t)| {
            if t.similarity == 0.0 {
                return None;
            }
            let score = t.weighted / t.similarity;
            score.is_finite().then_some(Prediction { movie_id, score })
        })
        .collect();

    debug!(
        "Predicted {} movies, {} without a defined score",
        predictions.len(),
        movies - predictions.len()
    );
    predictions
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Movie, Rating};

    fn rating(user_id: u32, movie_id: MovieId, rating: f32) -> Rating {
        Rating {
            user_id,
            movie_id,
            rating,
        }
    }

    fn neighbor(user_id: u32, similarity: f64) -> SimilarityRecord {
        SimilarityRecord {
            user_id,
            similarity,
        }
    }

    fn create_test_index(ratings: Vec<Rating>) -> DataIndex {
        let movies = (1..=4).map(|id| Movie::new(id, &format!("Movie {id}"))).collect();
        DataIndex::from_parts(movies, ratings).unwrap()
    }

    #[test]
    fn test_weighted_average_over_full_history() {
        let index = create_test_index(vec![
            rating(1, 1, 5.0),
            rating(1, 2, 4.0),
            rating(2, 1, 3.0),
            rating(2, 3, 2.0),
            // Not a neighbor
            rating(3, 4, 5.0),
        ]);

        let predictions = predict_scores(
            &index,
            &[neighbor(1, 0.8), neighbor(2, 0.2)],
            DuplicateRatings::KeepAll,
        );

        let ids: Vec<MovieId> = predictions.iter().map(|p| p.movie_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        // Movie 1: (0.8*5 + 0.2*3) / (0.8 + 0.2) = 4.6
        assert!((predictions[0].score - 4.6).abs() < 1e-9);
        // Single contributor: score equals that rating
        assert!((predictions[1].score - 4.0).abs() < 1e-9);
        assert!((predictions[2].score - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_similarity_sum_is_skipped() {
        let index = create_test_index(vec![
            rating(1, 1, 5.0),
            rating(2, 1, 1.0),
            rating(3, 2, 4.0),
        ]);

        // Movie 1 sums to 0 from opposite neighbors, movie 2 from a zero neighbor
        let predictions = predict_scores(
            &index,
            &[neighbor(1, 0.5), neighbor(2, -0.5), neighbor(3, 0.0)],
            DuplicateRatings::KeepAll,
        );

        assert!(predictions.is_empty());
    }

    #[test]
    fn test_negative_neighbors_still_contribute() {
        let index = create_test_index(vec![rating(1, 1, 4.0), rating(2, 1, 2.0)]);

        let predictions = predict_scores(
            &index,
            &[neighbor(1, 1.0), neighbor(2, -0.5)],
            DuplicateRatings::KeepAll,
        );

        // (4.0 - 1.0) / 0.5 = 6.0, outside the rating scale but defined
        assert_eq!(predictions.len(), 1);
        assert!((predictions[0].score - 6.0).abs() < 1e-9);
        assert!(predictions.iter().all(|p| p.score.is_finite()));
    }

    #[test]
    fn test_duplicate_events_policy() {
        let index = create_test_index(vec![
            rating(1, 1, 5.0),
            rating(1, 1, 1.0),
            rating(2, 1, 4.0),
        ]);
        let neighbors = [neighbor(1, 1.0), neighbor(2, 1.0)];

        let kept = predict_scores(&index, &neighbors, DuplicateRatings::KeepAll);
        // (5 + 1 + 4) / 3
        assert!((kept[0].score - 10.0 / 3.0).abs() < 1e-9);

        let collapsed = predict_scores(&index, &neighbors, DuplicateRatings::KeepFirst);
        // (5 + 4) / 2
        assert!((collapsed[0].score - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_neighborhood() {
        let index = create_test_index(vec![rating(1, 1, 5.0)]);
        assert!(predict_scores(&index, &[], DuplicateRatings::KeepAll).is_empty());
    }
}

//! Final ranking and catalog join.

use crate::types::{Prediction, Recommendation};
use data_loader::{DataIndex, MovieId};
use std::collections::HashSet;

/// Sort predictions best first and return up to `limit` titled rows.
///
/// Ties are broken by ascending movie id. Predictions for movies missing
/// from the catalog, or listed in `exclude`, are skipped before the cut, so
/// the output is `min(limit, eligible)` long.
pub fn rank_predictions(
    data_index: &DataIndex,
    mut predictions: Vec<Prediction>,
    limit: usize,
    exclude: &HashSet<MovieId>,
) -> Vec<Recommendation> {
    predictions.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.movie_id.cmp(&b.movie_id))
    });

    predictions
        .into_iter()
        .filter(|p| !exclude.contains(&p.movie_id))
        .filter_map(|p| {
            let movie = data_index.get_movie(p.movie_id)?;
            Some(Recommendation {
                movie_id: p.movie_id,
                title: movie.title.clone(),
                year: movie.year,
                score: p.score,
            })
        })
        .take(limit)
        .collect()
}

//! Candidate selection by rating overlap.
//!
//! ## Algorithm
//! 1. Collect every rating event on a movie from the resolved input
//! 2. Group those events by user
//! 3. Rank users by how many overlapping events they have, most first
//! 4. Keep the top `limit` users
//!
//! The cut happens on overlap count alone, before any correlation is
//! computed, so a low-overlap user with a strong correlation can be left
//! out. Ties are broken by ascending user id.

use crate::config::DuplicateRatings;
use crate::types::{CandidateUser, ResolvedInputRating};
use data_loader::{DataIndex, MovieId, UserId};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, instrument};

/// Select the candidate users for one request.
#[instrument(skip(data_index, resolved), fields(inputs = resolved.len()))]
pub fn select_candidates(
    data_index: &DataIndex,
    resolved: &[ResolvedInputRating],
    limit: usize,
    duplicates: DuplicateRatings,
) -> Vec<CandidateUser> {
    // Each input movie is scanned once even if the caller listed it twice
    let input_movies: Vec<MovieId> = resolved
        .iter()
        .map(|r| r.movie_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let groups = input_movies
        .par_iter()
        .fold(
            HashMap::new,
            |mut local: HashMap<UserId, Vec<(MovieId, f32)>>, &movie_id| {
                for rating in data_index.get_movie_ratings(movie_id) {
                    local
                        .entry(rating.user_id)
                        .or_default()
                        .push((movie_id, rating.rating));
                }
                local
            },
        )
        .reduce(HashMap::new, |mut acc, local| {
            for (user_id, mut overlap) in local {
                acc.entry(user_id).or_default().append(&mut overlap);
            }
            acc
        });

    let mut candidates: Vec<CandidateUser> = groups
        .into_iter()
        .map(|(user_id, mut overlap)| {
            // Stable: repeated events on one movie keep store order
            overlap.sort_by_key(|&(movie_id, _)| movie_id);
            if duplicates == DuplicateRatings::KeepFirst {
                overlap.dedup_by_key(|&mut (movie_id, _)| movie_id);
            }
            CandidateUser { user_id, overlap }
        })
        .collect();

    let total = candidates.len();
    candidates.sort_unstable_by(|a, b| {
        b.overlap_count()
            .cmp(&a.overlap_count())
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    candidates.truncate(limit);

    debug!("Kept {} of {} overlapping users", candidates.len(), total);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Movie, Rating};

    fn rating(user_id: UserId, movie_id: MovieId, rating: f32) -> Rating {
        Rating {
            user_id,
            movie_id,
            rating,
        }
    }

    fn create_test_index() -> DataIndex {
        let movies = (1..=5).map(|id| Movie::new(id, &format!("Movie {id}"))).collect();
        let ratings = vec![
            // User 4 overlaps on 3 input movies
            rating(4, 3, 4.0),
            rating(4, 1, 5.0),
            rating(4, 2, 3.0),
            // Users 2 and 3 overlap on 2 each
            rating(3, 1, 2.0),
            rating(3, 2, 2.5),
            rating(2, 2, 4.0),
            rating(2, 3, 1.0),
            // User 1 overlaps on 1, plus a non-input movie
            rating(1, 1, 5.0),
            rating(1, 5, 5.0),
            // User 9 only rated a non-input movie
            rating(9, 4, 3.0),
        ];
        DataIndex::from_parts(movies, ratings).unwrap()
    }

    fn inputs(ids: &[MovieId]) -> Vec<ResolvedInputRating> {
        ids.iter()
            .map(|&movie_id| ResolvedInputRating {
                movie_id,
                rating: 4.0,
            })
            .collect()
    }

    #[test]
    fn test_ranks_by_overlap_then_user_id() {
        let index = create_test_index();
        let candidates = select_candidates(&index, &inputs(&[1, 2, 3]), 100, DuplicateRatings::KeepAll);

        let order: Vec<UserId> = candidates.iter().map(|c| c.user_id).collect();
        assert_eq!(order, vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_overlap_sorted_by_movie_and_restricted_to_input() {
        let index = create_test_index();
        let candidates = select_candidates(&index, &inputs(&[1, 2, 3]), 100, DuplicateRatings::KeepAll);

        assert_eq!(candidates[0].overlap, vec![(1, 5.0), (2, 3.0), (3, 4.0)]);
        let user_1 = candidates.iter().find(|c| c.user_id == 1).unwrap();
        assert_eq!(user_1.overlap, vec![(1, 5.0)]);
    }

    #[test]
    fn test_truncates_before_correlation() {
        let index = create_test_index();
        let candidates = select_candidates(&index, &inputs(&[1, 2, 3]), 2, DuplicateRatings::KeepAll);

        let order: Vec<UserId> = candidates.iter().map(|c| c.user_id).collect();
        assert_eq!(order, vec![4, 2]);
    }

    #[test]
    fn test_repeated_input_movie_scanned_once() {
        let index = create_test_index();
        let candidates = select_candidates(&index, &inputs(&[1, 1]), 100, DuplicateRatings::KeepAll);

        assert!(candidates.iter().all(|c| c.overlap_count() == 1));
        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn test_no_resolved_input_means_no_candidates() {
        let index = create_test_index();
        assert!(select_candidates(&index, &[], 100, DuplicateRatings::KeepAll).is_empty());
    }

    #[test]
    fn test_duplicate_events_policy() {
        let index = DataIndex::from_parts(
            vec![Movie::new(1, "Movie 1")],
            vec![rating(7, 1, 2.0), rating(7, 1, 4.0)],
        )
        .unwrap();

        let kept = select_candidates(&index, &inputs(&[1]), 100, DuplicateRatings::KeepAll);
        assert_eq!(kept[0].overlap, vec![(1, 2.0), (1, 4.0)]);

        let collapsed = select_candidates(&index, &inputs(&[1]), 100, DuplicateRatings::KeepFirst);
        assert_eq!(collapsed[0].overlap, vec![(1, 2.0)]);
    }
}

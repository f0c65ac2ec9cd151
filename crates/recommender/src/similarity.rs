//! Pearson similarity between the caller and each candidate user.
//!
//! ## Algorithm
//! For two aligned vectors `x` (caller) and `y` (candidate) of length `n`:
//!
//! ```text
//! Sxx = Σx² - (Σx)² / n
//! Syy = Σy² - (Σy)² / n
//! Sxy = Σxy - (Σx · Σy) / n
//! r   = Sxy / sqrt(Sxx · Syy)
//! ```
//!
//! When either vector has zero variance (up to rounding residue) the
//! coefficient is undefined and the similarity is 0 instead. Values are not clamped to [-1, 1].

use crate::types::{CandidateUser, ResolvedInputRating, SimilarityRecord};
use data_loader::MovieId;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Pearson correlation in sum-of-squares form.
///
/// Vectors must be aligned and of equal length; an empty pair or a pair
/// where either side is constant yields 0.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len() as f64;
    if x.is_empty() {
        return 0.0;
    }

    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xx: f64 = x.iter().map(|v| v * v).sum();
    let sum_yy: f64 = y.iter().map(|v| v * v).sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();

    let sxx = sum_xx - sum_x * sum_x / n;
    let syy = sum_yy - sum_y * sum_y / n;
    let sxy = sum_xy - sum_x * sum_y / n;

    if is_zero_variance(sxx, sum_xx, n) || is_zero_variance(syy, sum_yy, n) {
        return 0.0;
    }
    let r = sxy / (sxx * syy).sqrt();
    if r.is_finite() { r } else { 0.0 }
}

/// Cancellation in `Σv² - (Σv)²/n` leaves a residue of a few ulps of `Σv²`
/// (possibly negative) for constant vectors, so anything that small counts
/// as no variance.
fn is_zero_variance(s: f64, sum_sq: f64, n: f64) -> bool {
    s <= 4.0 * f64::EPSILON * sum_sq.max(1.0) * n
}

/// Score every candidate against the caller's ratings.
///
/// Output order matches `candidates`. Each overlapping event of a candidate
/// is paired with the caller's rating for that movie; when the caller rated
/// a movie more than once, the first rating is used.
#[instrument(skip_all, fields(candidates = candidates.len()))]
pub fn score_candidates(
    resolved: &[ResolvedInputRating],
    candidates: &[CandidateUser],
) -> Vec<SimilarityRecord> {
    let mut input: HashMap<MovieId, f64> = HashMap::with_capacity(resolved.len());
    for r in resolved {
        input.entry(r.movie_id).or_insert(r.rating as f64);
    }

    candidates
        .par_iter()
        .map(|candidate| {
            let (x, y): (Vec<f64>, Vec<f64>) = candidate
                .overlap
                .iter()
                .filter_map(|&(movie_id, rating)| {
                    input.get(&movie_id).map(|&mine| (mine, rating as f64))
                })
                .unzip();
            SimilarityRecord {
                user_id: candidate.user_id,
                similarity: pearson(&x, &y),
            }
        })
        .collect()
}

/// Keep the `size` most similar candidates, best first.
///
/// Negative and zero similarities stay eligible. The sort is stable, so
/// equal similarities keep the candidate order.
pub fn select_neighborhood(mut records: Vec<SimilarityRecord>, size: usize) -> Vec<SimilarityRecord> {
    records.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    records.truncate(size);
    debug!("Neighborhood of {} users", records.len());
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn candidate(user_id: u32, overlap: &[(MovieId, f32)]) -> CandidateUser {
        CandidateUser {
            user_id,
            overlap: overlap.to_vec(),
        }
    }

    fn resolved(pairs: &[(MovieId, f32)]) -> Vec<ResolvedInputRating> {
        pairs
            .iter()
            .map(|&(movie_id, rating)| ResolvedInputRating { movie_id, rating })
            .collect()
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        assert!(approx(pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), 1.0));
        assert!(approx(pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]), -1.0));
    }

    #[test]
    fn test_pearson_known_value() {
        // Sxx = 2, Syy = 8/3, Sxy = 2 -> r = sqrt(3) / 2
        let r = pearson(&[4.0, 5.0, 3.0], &[3.0, 5.0, 3.0]);
        assert!((r - 3f64.sqrt() / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_pearson_zero_variance_is_zero() {
        assert_eq!(pearson(&[5.0, 5.0], &[1.0, 4.0]), 0.0);
        assert_eq!(pearson(&[1.0, 4.0], &[3.0, 3.0]), 0.0);
        assert_eq!(pearson(&[4.5], &[2.0]), 0.0);
        assert_eq!(pearson(&[], &[]), 0.0);
        assert!(!pearson(&[5.0, 5.0, 5.0], &[5.0, 5.0, 5.0]).is_nan());
    }

    #[test]
    fn test_pearson_constant_input_with_rounding_residue() {
        // Values not exact in binary leave a tiny, sometimes negative, Sxx
        let y: Vec<f64> = (0..23).map(|i| 1.0 + (i % 8) as f64 * 0.5).collect();
        assert_eq!(pearson(&[1.43; 23], &y), 0.0);
        assert_eq!(pearson(&y, &[1.43; 23]), 0.0);

        for step in 1..=500 {
            let v = step as f64 / 100.0;
            for n in 1..=30 {
                let x = vec![v; n];
                for shift in 0..8 {
                    let y: Vec<f64> = (0..n)
                        .map(|i| 0.5 + ((i + shift) % 10) as f64 * 0.5)
                        .collect();
                    assert_eq!(pearson(&x, &y), 0.0, "v={v} n={n} shift={shift}");
                }
            }
        }
    }

    #[test]
    fn test_score_candidates_constant_f32_input_is_zero() {
        let input = resolved(&[(1, 0.23), (2, 0.23), (3, 0.23), (4, 0.23)]);
        let candidates = vec![candidate(10, &[(1, 1.0), (2, 4.5), (3, 2.0), (4, 3.5)])];

        let records = score_candidates(&input, &candidates);
        assert_eq!(records[0].similarity, 0.0);
    }

    #[test]
    fn test_pearson_is_symmetric() {
        let x = [4.5, 3.0, 5.0, 1.0, 2.5];
        let y = [4.0, 2.0, 4.5, 2.0, 3.0];
        assert!(approx(pearson(&x, &y), pearson(&y, &x)));
    }

    #[test]
    fn test_score_candidates_aligns_by_movie() {
        let input = resolved(&[(3, 1.0), (1, 5.0)]);
        // Overlap is sorted by movie id, input order differs on purpose
        let candidates = vec![
            candidate(10, &[(1, 5.0), (3, 1.0)]),
            candidate(20, &[(1, 1.0), (3, 5.0)]),
        ];

        let records = score_candidates(&input, &candidates);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].user_id, 10);
        assert!(approx(records[0].similarity, 1.0));
        assert_eq!(records[1].user_id, 20);
        assert!(approx(records[1].similarity, -1.0));
    }

    #[test]
    fn test_score_candidates_first_input_rating_wins() {
        let input = resolved(&[(1, 5.0), (2, 1.0), (1, 1.0)]);
        let candidates = vec![candidate(10, &[(1, 4.0), (2, 2.0)])];

        let records = score_candidates(&input, &candidates);
        assert!(approx(records[0].similarity, 1.0));
    }

    #[test]
    fn test_select_neighborhood_keeps_negative_and_is_stable() {
        let records = vec![
            SimilarityRecord { user_id: 1, similarity: -0.5 },
            SimilarityRecord { user_id: 2, similarity: 0.0 },
            SimilarityRecord { user_id: 3, similarity: 0.9 },
            SimilarityRecord { user_id: 4, similarity: 0.0 },
        ];

        let all = select_neighborhood(records.clone(), 50);
        let order: Vec<u32> = all.iter().map(|r| r.user_id).collect();
        assert_eq!(order, vec![3, 2, 4, 1]);

        let top = select_neighborhood(records, 2);
        let order: Vec<u32> = top.iter().map(|r| r.user_id).collect();
        assert_eq!(order, vec![3, 2]);
    }
}

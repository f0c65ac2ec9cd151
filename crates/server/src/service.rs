//! # Recommendation Service
//!
//! Glue between the async HTTP layer and the synchronous recommender:
//! 1. Collect the caller's ratings (request body or stored reviews)
//! 2. Run the pipeline on the blocking pool
//! 3. Bound the wait with the configured timeout

use std::sync::Arc;
use std::time::{Duration, Instant};

use data_loader::{DataIndex, UserId};
use recommender::{CollaborativeRecommender, InputRating, Recommendation, RecommenderConfig};
use tracing::{info, instrument, warn};

use crate::error::{AppError, AppResult};
use crate::reviews::ReviewStore;

#[derive(Clone)]
pub struct RecommendationService {
    recommender: CollaborativeRecommender,
    reviews: ReviewStore,
    timeout: Duration,
}

impl RecommendationService {
    pub fn new(data_index: Arc<DataIndex>, config: RecommenderConfig, timeout: Duration) -> Self {
        Self {
            recommender: CollaborativeRecommender::new(data_index).with_config(config),
            reviews: ReviewStore::new(),
            timeout,
        }
    }

    pub fn reviews(&self) -> &ReviewStore {
        &self.reviews
    }

    pub fn data_index(&self) -> &Arc<DataIndex> {
        self.recommender.data_index()
    }

    /// Recommend from an explicit rating list
    #[instrument(skip_all, fields(inputs = inputs.len()))]
    pub async fn recommend(&self, inputs: Vec<InputRating>) -> AppResult<Vec<Recommendation>> {
        let start_time = Instant::now();
        let recommender = self.recommender.clone();

        let task = tokio::task::spawn_blocking(move || recommender.recommend(&inputs));
        let recommendations = match tokio::time::timeout(self.timeout, task).await {
            Ok(joined) => joined?,
            Err(_) => {
                warn!("Recommendation exceeded {:?}", self.timeout);
                return Err(AppError::Timeout(self.timeout));
            }
        };

        info!(
            "Served {} recommendations in {:.2?}",
            recommendations.len(),
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Recommend from the reviews a user has stored.
    ///
    /// A user without reviews gets an empty list.
    #[instrument(skip(self))]
    pub async fn recommend_for_user(&self, user_id: UserId) -> AppResult<Vec<Recommendation>> {
        let inputs: Vec<InputRating> = self
            .reviews
            .for_user(user_id)
            .await
            .iter()
            .map(InputRating::from)
            .collect();

        if inputs.is_empty() {
            info!("User {} has no reviews", user_id);
            return Ok(Vec::new());
        }
        self.recommend(inputs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Movie, Rating};

    fn create_test_index() -> Arc<DataIndex> {
        let movies = vec![
            Movie::new(1, "A (2001)"),
            Movie::new(2, "B (2002)"),
            Movie::new(3, "C (2003)"),
        ];
        let ratings = [(1, 1, 5.0), (1, 2, 1.0), (1, 3, 4.0), (2, 1, 4.0), (2, 2, 2.0)]
            .into_iter()
            .map(|(user_id, movie_id, rating)| Rating {
                user_id,
                movie_id,
                rating,
            })
            .collect();
        Arc::new(DataIndex::from_parts(movies, ratings).unwrap())
    }

    fn service() -> RecommendationService {
        RecommendationService::new(
            create_test_index(),
            RecommenderConfig::default(),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_recommend_from_inputs() {
        let recs = service()
            .recommend(vec![InputRating::new("A", 5.0), InputRating::new("B", 2.0)])
            .await
            .unwrap();

        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].movie_id, 1);
    }

    #[tokio::test]
    async fn test_recommend_for_user_uses_stored_reviews() {
        let service = service();
        assert!(service.recommend_for_user(9).await.unwrap().is_empty());

        service.reviews().add(9, "A", 5.0).await;
        service.reviews().add(9, "B", 2.0).await;
        // Another user's reviews do not leak in
        service.reviews().add(10, "C", 1.0).await;

        let recs = service.recommend_for_user(9).await.unwrap();
        assert_eq!(recs.len(), 3);
    }

    #[tokio::test]
    async fn test_zero_timeout_reports_timeout() {
        let service = RecommendationService::new(
            create_test_index(),
            RecommenderConfig::default(),
            Duration::ZERO,
        );

        let result = service.recommend(vec![InputRating::new("A", 5.0)]).await;
        // A zero budget may still win the race on a fast machine
        if let Err(err) = result {
            assert!(matches!(err, AppError::Timeout(_)));
        }
    }
}

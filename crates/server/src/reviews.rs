//! In-memory store of user-submitted movie reviews.
//!
//! Reviews are what `/topmovies/:user_id` feeds into the recommender: each
//! one becomes an input (title, rating) pair. Ids are assigned from a
//! counter that only grows, so a deleted id is never reused.

use std::collections::BTreeMap;
use std::sync::Arc;

use data_loader::UserId;
use recommender::InputRating;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

pub type ReviewId = u64;

/// A stored review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub userid: UserId,
    pub title: String,
    pub rating: f32,
}

impl From<&Review> for InputRating {
    fn from(review: &Review) -> Self {
        InputRating::new(review.title.clone(), review.rating)
    }
}

/// Shared review store
#[derive(Clone, Default)]
pub struct ReviewStore {
    inner: Arc<RwLock<ReviewStoreInner>>,
}

#[derive(Default)]
struct ReviewStoreInner {
    next_id: ReviewId,
    reviews: BTreeMap<ReviewId, Review>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a review and return it with its assigned id
    pub async fn add(&self, userid: UserId, title: impl Into<String>, rating: f32) -> Review {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let review = Review {
            id: inner.next_id,
            userid,
            title: title.into(),
            rating,
        };
        inner.reviews.insert(review.id, review.clone());
        debug!("Stored review {} for user {}", review.id, userid);
        review
    }

    /// Every review, oldest first
    pub async fn all(&self) -> Vec<Review> {
        self.inner.read().await.reviews.values().cloned().collect()
    }

    /// Reviews written by one user, oldest first
    pub async fn for_user(&self, userid: UserId) -> Vec<Review> {
        self.inner
            .read()
            .await
            .reviews
            .values()
            .filter(|r| r.userid == userid)
            .cloned()
            .collect()
    }

    /// Remove a review, returning it if it existed
    pub async fn delete(&self, id: ReviewId) -> Option<Review> {
        self.inner.write().await.reviews.remove(&id)
    }

    /// Number of stored reviews
    pub async fn len(&self) -> usize {
        self.inner.read().await.reviews.len()
    }
}

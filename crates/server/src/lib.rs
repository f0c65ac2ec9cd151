//! HTTP service for the Tastebuds recommender.
//!
//! Wraps [`recommender::CollaborativeRecommender`] behind an axum API and
//! keeps user reviews in memory so `/topmovies/:user_id` can recommend from
//! them.

pub mod api;
pub mod config;
pub mod error;
pub mod reviews;
pub mod service;

pub use api::{AppState, create_router};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use reviews::{Review, ReviewStore};
pub use service::RecommendationService;

//! # Recommender Crate
//!
//! User-based collaborative filtering: "users who rate like you also liked...".
//!
//! ## Components
//!
//! - **resolver**: caller titles -> catalog movie ids
//! - **neighborhood**: candidate users ranked by rating overlap
//! - **similarity**: Pearson correlation and the final neighborhood cut
//! - **aggregate**: similarity-weighted average prediction per movie
//! - **ranker**: top-N selection joined with catalog titles
//! - **recommender**: [`CollaborativeRecommender`], the pipeline facade
//!
//! ## Example Usage
//!
//! ```ignore
//! use recommender::{CollaborativeRecommender, InputRating};
//! use data_loader::DataIndex;
//! use std::sync::Arc;
//!
//! let data_index = Arc::new(DataIndex::load_from_files("data/ml-latest-small".as_ref())?);
//! let recommender = CollaborativeRecommender::new(data_index);
//!
//! let recs = recommender.recommend(&[
//!     InputRating::new("Toy Story", 4.5),
//!     InputRating::new("Jumanji", 4.5),
//! ]);
//! ```
//!
//! The pipeline never fails: titles that do not match are dropped,
//! undefined correlations count as 0, undefined predictions are skipped and
//! a short result list is returned as is.

// Public modules
pub mod config;
pub mod types;
pub mod resolver;
pub mod neighborhood;
pub mod similarity;
pub mod aggregate;
pub mod ranker;
pub mod recommender;

// Re-export commonly used types
pub use config::{DuplicateRatings, RecommenderConfig};
pub use recommender::CollaborativeRecommender;
pub use types::{
    CandidateUser, InputRating, Prediction, Recommendation, RecommendationTrace,
    ResolvedInputRating, SimilarityRecord,
};

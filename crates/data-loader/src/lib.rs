//! # Data Loader Crate
//!
//! This crate loads the movie catalog and the rating store that every
//! recommendation request reads from.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, Rating, DataIndex)
//! - **title**: Title normalization applied once at load
//! - **parser**: Parse MovieLens CSV and DAT files into Rust structs
//! - **index**: Build and validate the in-memory indices
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(Path::new("data/ml-latest-small"))?;
//!
//! let heat = index.movies_with_title("Heat");
//! let ratings = index.get_user_ratings(1);
//! println!("User 1 rated {} movies", ratings.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod title;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::RATING_RANGE;
pub use parser::DatasetFormat;
pub use title::normalize_title;
pub use types::{
    // Type aliases
    UserId,
    MovieId,
    // Core types
    Movie,
    Rating,
    DataIndex,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_index_creation() {
        // Test that we can create an empty DataIndex
        let index = DataIndex::new();
        let (users, movies, ratings) = index.counts();

        assert_eq!(users, 0);
        assert_eq!(movies, 0);
        assert_eq!(ratings, 0);
    }

    #[test]
    fn test_insert_movie() {
        let mut index = DataIndex::new();

        index.insert_movie(Movie::new(1, "Toy Story (1995)")).unwrap();

        let retrieved = index.get_movie(1).unwrap();
        assert_eq!(retrieved.id, 1);
        assert_eq!(retrieved.title, "Toy Story");
        assert_eq!(retrieved.year, Some(1995));
        assert_eq!(index.movies_with_title("Toy Story"), &[1]);
    }

    #[test]
    fn test_shared_title_keeps_load_order() {
        let mut index = DataIndex::new();
        index.insert_movie(Movie::new(7, "Hamlet (1996)")).unwrap();
        index.insert_movie(Movie::new(3, "Hamlet (1990)")).unwrap();

        assert_eq!(index.movies_with_title("Hamlet"), &[7, 3]);
        let order: Vec<MovieId> = index.movies().map(|m| m.id).collect();
        assert_eq!(order, vec![7, 3]);
    }

    #[test]
    fn test_insert_rating() {
        let mut index = DataIndex::new();

        let rating = Rating {
            user_id: 1,
            movie_id: 1193,
            rating: 5.0,
        };

        index.insert_rating(rating);
        index.insert_rating(rating);

        let user_ratings = index.get_user_ratings(1);
        assert_eq!(user_ratings.len(), 2);
        assert_eq!(user_ratings[0].rating, 5.0);

        let movie_ratings = index.get_movie_ratings(1193);
        assert_eq!(movie_ratings.len(), 2);
        assert_eq!(index.counts(), (1, 0, 2));
    }

    #[test]
    fn test_empty_queries() {
        let index = DataIndex::new();

        // Querying non-existent data should return None or empty slices
        assert!(index.get_movie(999).is_none());
        assert!(index.movies_with_title("Nothing").is_empty());
        assert!(index.get_user_ratings(999).is_empty());
        assert!(index.get_movie_ratings(999).is_empty());
        assert!(index.user_ids().is_empty());
    }
}

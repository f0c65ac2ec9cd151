//! DataIndex building and indexing logic.
//!
//! Builds the DataIndex from parsed data:
//! - Detect the dataset layout and parse catalog + ratings in parallel
//! - Insert movies (enforcing unique ids) and ratings
//! - Validate rating values and report dangling movie references
//! - Title search over the normalized catalog

use crate::error::{DataLoadError, Result};
use crate::parser::DatasetFormat;
use crate::types::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Lowest and highest rating value accepted by [`DataIndex::validate`]
pub const RATING_RANGE: (f32, f32) = (0.5, 5.0);

impl DataIndex {
    /// Load a MovieLens dataset from a directory
    ///
    /// This is the main entry point for loading data.
    ///
    /// Steps:
    /// 1. Detect the layout (CSV or DAT)
    /// 2. Parse catalog and ratings in parallel
    /// 3. Build the indices
    /// 4. Validate data integrity
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        let format = DatasetFormat::detect(data_dir)?;
        info!("Loading {:?} dataset from {:?}", format, data_dir);

        let movies_path = data_dir.join(format.movies_file());
        let ratings_path = data_dir.join(format.ratings_file());

        // The two files are independent, so parse them side by side
        let (movies, ratings) = rayon::join(
            || format.parse_movies(&movies_path),
            || format.parse_ratings(&ratings_path),
        );
        let movies = movies?;
        let ratings = ratings?;

        info!("Parsed {} movies, {} ratings", movies.len(), ratings.len());

        let index = Self::from_parts(movies, ratings)?;
        index.validate()?;

        let (users, movies, ratings) = index.counts();
        info!(
            "DataIndex built: {} users, {} movies, {} ratings",
            users, movies, ratings
        );
        Ok(index)
    }

    /// Build an index from already parsed catalog entries and rating events
    pub fn from_parts(movies: Vec<Movie>, ratings: Vec<Rating>) -> Result<Self> {
        let mut index = DataIndex::new();

        for movie in movies {
            index.insert_movie(movie)?;
        }

        // Insert all ratings (this also populates user_ratings and movie_ratings)
        for rating in ratings {
            index.insert_rating(rating);
        }

        Ok(index)
    }

    /// Validate data integrity
    ///
    /// Rating values must be finite and inside [`RATING_RANGE`]. Ratings that
    /// point at a movie missing from the catalog are tolerated: they still
    /// take part in neighbor selection and are dropped when titles are joined.
    pub fn validate(&self) -> Result<()> {
        let (min, max) = RATING_RANGE;
        let mut dangling = 0usize;

        for (movie_id, ratings) in &self.movie_ratings {
            if !self.movies.contains_key(movie_id) {
                dangling += ratings.len();
            }
            for rating in ratings {
                if !rating.rating.is_finite() || rating.rating < min || rating.rating > max {
                    return Err(DataLoadError::InvalidValue {
                        field: "rating".to_string(),
                        value: rating.rating.to_string(),
                    });
                }
            }
        }

        if dangling > 0 {
            warn!("{} ratings reference movies missing from the catalog", dangling);
        }
        Ok(())
    }

    /// Case-insensitive title search
    ///
    /// Exact matches come first, then substring matches; each group keeps
    /// catalog order.
    pub fn search_titles(&self, query: &str) -> Vec<&Movie> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut exact = Vec::new();
        let mut partial = Vec::new();
        for movie in self.movies() {
            let title = movie.title.to_lowercase();
            if title == needle {
                exact.push(movie);
            } else if title.contains(&needle) {
                partial.push(movie);
            }
        }
        debug!(
            "Title search {:?}: {} exact, {} partial",
            query,
            exact.len(),
            partial.len()
        );

        exact.extend(partial);
        exact
    }
}

//! Core domain types for the catalog and the rating store.
//!
//! This module defines the fundamental data structures used throughout the system:
//! - Type aliases for domain clarity (UserId, MovieId)
//! - `Movie`, the normalized catalog entry
//! - `Rating`, one (user, movie, rating) event
//! - `DataIndex`, the immutable in-memory store shared by every request

use crate::title::normalize_title;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with movie IDs

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

// =============================================================================
// Movie-related Types
// =============================================================================

/// A catalog entry.
///
/// `title` is already normalized (year suffix stripped, trimmed). Build
/// entries with [`Movie::new`] so normalization happens exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Year stripped from the raw title, kept for display only
    pub year: Option<u16>,
}

impl Movie {
    /// Create a catalog entry from a raw title such as `"Heat (1995)"`.
    pub fn new(id: MovieId, raw_title: &str) -> Self {
        let (title, year) = normalize_title(raw_title);
        Self { id, title, year }
    }
}

// =============================================================================
// Rating Type
// =============================================================================

/// A single rating event from a user for a movie.
///
/// Timestamps present in the source files are dropped at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    /// Rating value, 0.5 to 5.0 in MovieLens
    pub rating: f32,
}

// =============================================================================
// DataIndex - The Core In-Memory Database
// =============================================================================

/// Main data structure that holds the catalog, the rating store and their indices.
///
/// Built once at startup and shared read-only (`Arc<DataIndex>`) by every
/// recommendation request. Rating events are kept in store order inside each
/// index so that grouping downstream is deterministic.
#[derive(Debug)]
pub struct DataIndex {
    // Catalog
    pub(crate) movies: HashMap<MovieId, Movie>,
    /// Movie ids in load order
    pub(crate) movie_order: Vec<MovieId>,
    /// Normalized title -> movie ids carrying it, in load order
    pub(crate) title_index: HashMap<String, Vec<MovieId>>,

    // Rating indices for fast lookups
    /// All ratings made by each user
    pub(crate) user_ratings: HashMap<UserId, Vec<Rating>>,
    /// All ratings received by each movie
    pub(crate) movie_ratings: HashMap<MovieId, Vec<Rating>>,
    pub(crate) rating_count: usize,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self {
            movies: HashMap::new(),
            movie_order: Vec::new(),
            title_index: HashMap::new(),
            user_ratings: HashMap::new(),
            movie_ratings: HashMap::new(),
            rating_count: 0,
        }
    }

    /// Get a movie by ID
    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(&id)
    }

    /// All movies whose normalized title equals `title` exactly, in load order.
    ///
    /// Returns an empty slice when nothing matches.
    pub fn movies_with_title(&self, title: &str) -> &[MovieId] {
        self.title_index
            .get(title)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate the catalog in load order
    pub fn movies(&self) -> impl Iterator<Item = &Movie> + '_ {
        self.movie_order.iter().filter_map(|id| self.movies.get(id))
    }

    /// Get all ratings made by a user
    ///
    /// Returns an empty slice if user has no ratings
    pub fn get_user_ratings(&self, user_id: UserId) -> &[Rating] {
        self.user_ratings
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get all ratings for a movie
    pub fn get_movie_ratings(&self, movie_id: MovieId) -> &[Rating] {
        self.movie_ratings
            .get(&movie_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Ids of every user with at least one rating, ascending
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.user_ratings.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Insert a movie into the catalog
    ///
    /// Movie ids are unique; a second entry with a known id is rejected.
    pub fn insert_movie(&mut self, movie: Movie) -> crate::Result<()> {
        if let Some(existing) = self.movies.get(&movie.id) {
            return Err(crate::DataLoadError::DuplicateMovie {
                id: movie.id,
                first: existing.title.clone(),
                second: movie.title,
            });
        }
        self.title_index
            .entry(movie.title.clone())
            .or_default()
            .push(movie.id);
        self.movie_order.push(movie.id);
        self.movies.insert(movie.id, movie);
        Ok(())
    }

    /// Insert a rating and update indices
    pub fn insert_rating(&mut self, rating: Rating) {
        // Add to user ratings
        self.user_ratings
            .entry(rating.user_id)
            .or_default()
            .push(rating);

        // Add to movie ratings
        self.movie_ratings
            .entry(rating.movie_id)
            .or_default()
            .push(rating);

        self.rating_count += 1;
    }

    /// Get counts for debugging/validation: (users, movies, ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.user_ratings.len(), self.movies.len(), self.rating_count)
    }
}

// Implement Default trait for convenience
impl Default for DataIndex {
    fn default() -> Self {
        Self::new()
    }
}

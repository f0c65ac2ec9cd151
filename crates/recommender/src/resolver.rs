//! Input resolution: (title, rating) pairs -> (movie id, rating) pairs.
//!
//! Titles are matched exactly against the normalized catalog titles. A
//! title with no match is dropped without error; a title shared by several
//! catalog entries resolves to all of them.

use crate::types::{InputRating, ResolvedInputRating};
use data_loader::DataIndex;
use tracing::debug;

/// Resolve caller input against the catalog.
///
/// Output order is input order, then catalog load order for titles that
/// match more than one entry.
pub fn resolve_inputs(data_index: &DataIndex, inputs: &[InputRating]) -> Vec<ResolvedInputRating> {
    let mut resolved = Vec::with_capacity(inputs.len());

    for input in inputs {
        let matches = data_index.movies_with_title(input.title.trim());
        if matches.is_empty() {
            debug!("No catalog entry for title {:?}, dropping", input.title);
            continue;
        }
        resolved.extend(matches.iter().map(|&movie_id| ResolvedInputRating {
            movie_id,
            rating: input.rating,
        }));
    }

    debug!("Resolved {} of {} input titles", resolved.len(), inputs.len());
    resolved
}

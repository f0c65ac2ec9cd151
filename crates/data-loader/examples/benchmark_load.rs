//! Example: time dataset loading and inspect the resulting indices
//!
//! Run with: cargo run --release --package data-loader --example benchmark_load [DATA_DIR]

use data_loader::{DataIndex, DatasetFormat};
use std::path::PathBuf;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/ml-latest-small"));

    let format = DatasetFormat::detect(&data_dir)?;
    println!("Loading {:?} dataset from {}...", format, data_dir.display());

    let start = Instant::now();
    let index = DataIndex::load_from_files(&data_dir)?;
    let elapsed = start.elapsed();

    let (users, movies, ratings) = index.counts();
    let shared_titles = index
        .movies()
        .filter(|m| index.movies_with_title(&m.title).len() > 1)
        .count();
    let busiest = index
        .user_ids()
        .into_iter()
        .max_by_key(|&id| index.get_user_ratings(id).len());

    println!("Time taken: {:?}", elapsed);
    println!("Users: {users}, movies: {movies}, ratings: {ratings}");
    println!("Movies sharing a title with another entry: {shared_titles}");
    if let Some(user_id) = busiest {
        println!(
            "Most active user: {} ({} ratings)",
            user_id,
            index.get_user_ratings(user_id).len()
        );
    }
    println!("Throughput: {:.0} ratings/second", ratings as f64 / elapsed.as_secs_f64());

    Ok(())
}

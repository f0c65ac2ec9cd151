//! Example: Recommend movies for a hand-written rating list
//!
//! Run with: cargo run --package recommender --example recommend_sample
//!
//! Expects the MovieLens "latest-small" dataset under data/ml-latest-small.

use data_loader::DataIndex;
use recommender::{CollaborativeRecommender, InputRating};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

fn sample_ratings() -> Vec<InputRating> {
    [
        ("Toy Story", 4.5),
        ("Jumanji", 4.5),
        ("Back to the Future", 5.0),
        ("Back to the Future Part II", 4.0),
        ("Back to the Future Part III", 3.0),
        ("Mad Max Beyond Thunderdome", 4.0),
        ("Hook", 4.0),
        ("Ghostbusters (a.k.a. Ghost Busters)", 4.5),
        ("Ghostbusters II", 3.0),
        ("2001: A Space Odyssey", 5.0),
        ("Who Framed Roger Rabbit?", 5.0),
        ("Saving Private Ryan", 4.0),
        ("Stargate", 4.0),
        ("Goofy Movie", 5.0),
        ("Extremely Goofy Movie, An", 2.5),
        ("Guardians of the Galaxy", 5.0),
        ("Guardians of the Galaxy 2", 5.0),
        ("My Flesh and Blood", 4.5),
        ("La La Land", 1.0),
        ("Lion King, The", 4.5),
    ]
    .into_iter()
    .map(|(title, rating)| InputRating::new(title, rating))
    .collect()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("=== Tastebuds Sample Recommendation ===\n");

    let start = Instant::now();
    let data_index = Arc::new(DataIndex::load_from_files(Path::new("data/ml-latest-small"))?);
    println!("Loaded dataset in {:?}\n", start.elapsed());

    let recommender = CollaborativeRecommender::new(data_index);
    let inputs = sample_ratings();

    let start = Instant::now();
    let trace = recommender.recommend_with_trace(&inputs);
    println!("Pipeline finished in {:?}", start.elapsed());
    println!("  Matched titles: {}/{}", trace.resolved.len(), inputs.len());
    println!("  Candidate users: {}", trace.candidates);
    println!("  Neighbors: {}", trace.neighborhood.len());
    println!("  Scored movies: {}\n", trace.predictions);

    println!("Top {} recommendations:", trace.recommendations.len());
    for (i, rec) in trace.recommendations.iter().enumerate() {
        match rec.year {
            Some(year) => println!("  {:2}. {} ({}) - {:.3}", i + 1, rec.title, year, rec.score),
            None => println!("  {:2}. {} - {:.3}", i + 1, rec.title, rec.score),
        }
    }

    Ok(())
}

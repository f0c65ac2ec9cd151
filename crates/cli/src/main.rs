use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{DataIndex, UserId};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use recommender::{
    CollaborativeRecommender, DuplicateRatings, InputRating, Recommendation, RecommendationTrace,
    RecommenderConfig,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Tastebuds - movie recommendations from people who rate like you
#[derive(Parser)]
#[command(name = "tastebuds")]
#[command(about = "User-based collaborative filtering over MovieLens ratings", long_about = None)]
struct Cli {
    /// Path to MovieLens dataset directory
    #[arg(short, long, default_value = "data/ml-latest-small")]
    data_dir: PathBuf,

    /// Number of recommendations to return
    #[arg(long, global = true, default_value_t = recommender::config::DEFAULT_TOP_N)]
    top_n: usize,

    /// Drop movies the caller already rated
    #[arg(long, global = true)]
    exclude_rated: bool,

    /// Repeated (user, movie) ratings: keep_all or keep_first
    #[arg(long, global = true, default_value = "keep_all")]
    dedup: DuplicateRatings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies from your own ratings
    Recommend {
        /// A rating as "Title=4.5" (repeatable)
        #[arg(short, long = "rating")]
        ratings: Vec<String>,

        /// JSON file holding [{"title": ..., "rating": ...}, ...]
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Show the intermediate pipeline results
        #[arg(long)]
        explain: bool,
    },

    /// Show the rating history of a dataset user
    User {
        /// User ID to display
        #[arg(long)]
        user_id: UserId,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// Replay random users' histories as requests and measure latency
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Seed for picking users
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading MovieLens dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let data_index = Arc::new(
        DataIndex::load_from_files(&cli.data_dir).context("Failed to load MovieLens dataset")?,
    );
    println!("{} Loaded dataset in {:?}", "✓".green(), start.elapsed());

    let config = RecommenderConfig::default()
        .with_top_n(cli.top_n)
        .with_exclude_rated(cli.exclude_rated)
        .with_duplicate_ratings(cli.dedup);
    let recommender = CollaborativeRecommender::new(data_index.clone()).with_config(config);

    match cli.command {
        Commands::Recommend {
            ratings,
            input,
            explain,
        } => handle_recommend(&recommender, &ratings, input.as_deref(), explain)?,
        Commands::User { user_id } => handle_user(&data_index, user_id)?,
        Commands::Search { title } => handle_search(&data_index, &title),
        Commands::Benchmark { requests, seed } => {
            handle_benchmark(recommender, requests, seed).await?
        }
    }

    Ok(())
}

/// Parse "Title=4.5". The last '=' separates the rating.
fn parse_rating_arg(arg: &str) -> Result<InputRating> {
    let (title, rating) = arg
        .rsplit_once('=')
        .ok_or_else(|| anyhow!("Expected TITLE=RATING, got '{}'", arg))?;
    let title = title.trim();
    if title.is_empty() {
        bail!("Missing title in '{}'", arg);
    }
    let rating: f32 = rating
        .trim()
        .parse()
        .with_context(|| format!("Invalid rating in '{}'", arg))?;
    Ok(InputRating::new(title, rating))
}

fn load_input_file(path: &Path) -> Result<Vec<InputRating>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Handle the 'recommend' command
fn handle_recommend(
    recommender: &CollaborativeRecommender,
    args: &[String],
    input: Option<&Path>,
    explain: bool,
) -> Result<()> {
    let mut inputs = match input {
        Some(path) => load_input_file(path)?,
        None => Vec::new(),
    };
    for arg in args {
        inputs.push(parse_rating_arg(arg)?);
    }
    if inputs.is_empty() {
        bail!("Provide ratings with --rating \"Title=4.5\" or --input <file>");
    }

    let trace = recommender.recommend_with_trace(&inputs);
    if explain {
        print_trace(recommender.data_index(), &inputs, &trace);
    }
    print_recommendations(&trace.recommendations);
    Ok(())
}

/// Handle the 'user' command
fn handle_user(data_index: &DataIndex, user_id: UserId) -> Result<()> {
    let ratings = data_index.get_user_ratings(user_id);
    if ratings.is_empty() {
        bail!("User {} not found", user_id);
    }

    println!("{}", format!("User ID: {}", user_id).bold().blue());

    let total: f32 = ratings.iter().map(|r| r.rating).sum();
    println!("{}Number of ratings: {}", "• ".cyan(), ratings.len());
    println!("{}Average rating: {:.2}", "• ".cyan(), total / ratings.len() as f32);

    // Histogram in half-star buckets
    let mut buckets = [0usize; 10];
    for rating in ratings {
        let bucket = ((rating.rating * 2.0).round() as usize).clamp(1, 10) - 1;
        buckets[bucket] += 1;
    }
    println!("Rating distribution:");
    for (i, count) in buckets.iter().enumerate().rev().filter(|(_, c)| **c > 0) {
        println!("  {:>3.1} {}", (i + 1) as f32 / 2.0, count);
    }

    let mut top_rated: Vec<_> = ratings.iter().collect();
    top_rated.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    println!("Top rated movies:");
    for rating in top_rated.iter().take(5) {
        if let Some(movie) = data_index.get_movie(rating.movie_id) {
            println!("  - {} (Rating: {})", movie.title, rating.rating);
        }
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(data_index: &DataIndex, title: &str) {
    let matches = data_index.search_titles(title);

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no matches)");
        return;
    }
    for movie in matches.iter().take(20) {
        let ratings = data_index.get_movie_ratings(movie.id);
        let avg = if ratings.is_empty() {
            0.0
        } else {
            ratings.iter().map(|r| r.rating).sum::<f32>() / ratings.len() as f32
        };
        let year = movie.year.map(|y| y.to_string()).unwrap_or_else(|| "????".to_string());
        println!(
            "{}: {} ({}) avg {:.2} ({} ratings)",
            movie.id, movie.title, year, avg, ratings.len()
        );
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    recommender: CollaborativeRecommender,
    requests: usize,
    seed: u64,
) -> Result<()> {
    let data_index = recommender.data_index().clone();
    let user_ids = data_index.user_ids();
    if user_ids.is_empty() || requests == 0 {
        bail!("Nothing to benchmark");
    }

    // Each request replays one dataset user's history as caller input
    let mut rng = StdRng::seed_from_u64(seed);
    let workloads: Vec<Vec<InputRating>> = (0..requests)
        .filter_map(|_| user_ids.choose(&mut rng).copied())
        .map(|user_id| {
            data_index
                .get_user_ratings(user_id)
                .iter()
                .filter_map(|r| {
                    let movie = data_index.get_movie(r.movie_id)?;
                    Some(InputRating::new(movie.title.clone(), r.rating))
                })
                .collect()
        })
        .collect();

    let wall_start = Instant::now();
    let mut handles = Vec::with_capacity(workloads.len());
    for inputs in workloads {
        let recommender = recommender.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let start = Instant::now();
            let recs = recommender.recommend(&inputs);
            (start.elapsed(), recs.len())
        }));
    }

    let mut timings = Vec::with_capacity(handles.len());
    for handle in handles {
        let (elapsed, count) = handle.await.context("Benchmark task panicked")?;
        debug!("Request returned {} recommendations in {:?}", count, elapsed);
        timings.push(elapsed);
    }
    let wall_time = wall_start.elapsed();

    timings.sort();
    let total: Duration = timings.iter().sum();
    let avg_latency = total / timings.len() as u32;
    let throughput = timings.len() as f64 / wall_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {}", timings.len());
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(&timings, 0.50));
    println!("P95 latency: {:?}", percentile(&timings, 0.95));
    println!("P99 latency: {:?}", percentile(&timings, 0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Nearest-rank percentile of sorted samples
fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let rank = (p * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

fn print_trace(data_index: &DataIndex, inputs: &[InputRating], trace: &RecommendationTrace) {
    println!("{}", "Pipeline:".bold().blue());
    println!(
        "{}Matched titles: {}/{}",
        "• ".cyan(),
        trace.resolved.len(),
        inputs.len()
    );
    println!("{}Candidate users: {}", "• ".cyan(), trace.candidates);
    println!("{}Neighbors: {}", "• ".cyan(), trace.neighborhood.len());
    for neighbor in trace.neighborhood.iter().take(5) {
        println!(
            "    user {} similarity {:+.3} ({} ratings)",
            neighbor.user_id,
            neighbor.similarity,
            data_index.get_user_ratings(neighbor.user_id).len()
        );
    }
    println!("{}Scored movies: {}", "• ".cyan(), trace.predictions);
}

fn print_recommendations(recommendations: &[Recommendation]) {
    println!("{}", "Movie Recommendations:".bold().blue());
    if recommendations.is_empty() {
        println!("  (none: no input title matched, or no neighbor had a usable correlation)");
        return;
    }
    for (i, rec) in recommendations.iter().enumerate() {
        let year = rec.year.map(|y| format!(" ({y})")).unwrap_or_default();
        println!(
            "{}. {}{} - Score: {:.2}",
            (i + 1).to_string().green(),
            rec.title,
            year,
            rec.score
        );
    }
}

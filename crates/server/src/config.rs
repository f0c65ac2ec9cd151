//! Server configuration loaded from `TASTEBUDS_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use recommender::config::{DEFAULT_CANDIDATE_POOL, DEFAULT_NEIGHBORHOOD_SIZE, DEFAULT_TOP_N};
use recommender::{DuplicateRatings, RecommenderConfig};
use serde::Deserialize;

const ENV_PREFIX: &str = "TASTEBUDS_";

/// Application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding movies.csv/ratings.csv (or the .dat pair)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on one recommendation pipeline run
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_candidate_pool")]
    pub candidate_pool: usize,

    #[serde(default = "default_neighborhood_size")]
    pub neighborhood_size: usize,

    #[serde(default = "default_top_n")]
    pub top_n: usize,

    #[serde(default)]
    pub exclude_rated: bool,

    /// `keep_all` or `keep_first`
    #[serde(default = "default_duplicate_ratings")]
    pub duplicate_ratings: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/ml-latest-small")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_candidate_pool() -> usize {
    DEFAULT_CANDIDATE_POOL
}

fn default_neighborhood_size() -> usize {
    DEFAULT_NEIGHBORHOOD_SIZE
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_duplicate_ratings() -> String {
    "keep_all".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            host: default_host(),
            port: default_port(),
            request_timeout_ms: default_request_timeout_ms(),
            candidate_pool: default_candidate_pool(),
            neighborhood_size: default_neighborhood_size(),
            top_n: default_top_n(),
            exclude_rated: false,
            duplicate_ratings: default_duplicate_ratings(),
        }
    }
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if present
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit `(key, value)` pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address to bind
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Core pipeline settings
    pub fn recommender_config(&self) -> anyhow::Result<RecommenderConfig> {
        let duplicates: DuplicateRatings = self
            .duplicate_ratings
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;

        Ok(RecommenderConfig::default()
            .with_candidate_pool(self.candidate_pool)
            .with_neighborhood_size(self.neighborhood_size)
            .with_top_n(self.top_n)
            .with_exclude_rated(self.exclude_rated)
            .with_duplicate_ratings(duplicates))
    }
}

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use data_loader::UserId;
use recommender::{InputRating, Recommendation};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{AppError, AppResult};
use crate::reviews::{Review, ReviewId};

use super::AppState;

// Request/Response types

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReviewRequest {
    pub userid: UserId,
    pub title: String,
    pub rating: f32,
}

impl CreateReviewRequest {
    fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::InvalidInput("title must not be blank".to_string()));
        }
        if !self.rating.is_finite() {
            return Err(AppError::InvalidInput("rating must be a number".to_string()));
        }
        Ok(())
    }
}

fn validate_inputs(inputs: &[InputRating]) -> AppResult<()> {
    match inputs.iter().find(|i| !i.rating.is_finite()) {
        Some(bad) => Err(AppError::InvalidInput(format!(
            "rating for {:?} must be a finite number",
            bad.title
        ))),
        None => Ok(()),
    }
}

/// One recommended movie; the id is a string on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieEntry {
    #[serde(rename = "moviesId")]
    pub movies_id: String,
    pub title: String,
}

impl From<&Recommendation> for MovieEntry {
    fn from(rec: &Recommendation) -> Self {
        Self {
            movies_id: rec.movie_id.to_string(),
            title: rec.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopMoviesResponse {
    pub movies: Vec<MovieEntry>,
}

impl From<Vec<Recommendation>> for TopMoviesResponse {
    fn from(recs: Vec<Recommendation>) -> Self {
        Self {
            movies: recs.iter().map(MovieEntry::from).collect(),
        }
    }
}

// Handlers

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let (users, movies, ratings) = state.service.data_index().counts();
    let reviews = state.service.reviews().len().await;
    Json(json!({
        "status": "ok",
        "users": users,
        "movies": movies,
        "ratings": ratings,
        "reviews": reviews,
    }))
}

/// Recommendations from the reviews stored for `user_id`
pub async fn top_movies(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<TopMoviesResponse>> {
    let recs = state.service.recommend_for_user(user_id).await?;
    Ok(Json(recs.into()))
}

/// Recommendations from ratings sent in the body
pub async fn recommend(
    State(state): State<AppState>,
    Json(inputs): Json<Vec<InputRating>>,
) -> AppResult<Json<TopMoviesResponse>> {
    validate_inputs(&inputs)?;
    let recs = state.service.recommend(inputs).await?;
    Ok(Json(recs.into()))
}

pub async fn create_review(
    State(state): State<AppState>,
    Json(req): Json<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<Review>)> {
    req.validate()?;
    let review = state
        .service
        .reviews()
        .add(req.userid, req.title.trim(), req.rating)
        .await;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn get_reviews(State(state): State<AppState>) -> Json<Vec<Review>> {
    Json(state.service.reviews().all().await)
}

pub async fn get_user_reviews(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Json<Vec<Review>> {
    Json(state.service.reviews().for_user(user_id).await)
}

pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<ReviewId>,
) -> AppResult<Json<Value>> {
    match state.service.reviews().delete(id).await {
        Some(_) => Ok(Json(json!({ "Delete": id.to_string() }))),
        None => Err(AppError::NotFound(format!("review {id}"))),
    }
}

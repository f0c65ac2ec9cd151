mod handlers;
mod routes;
mod state;

pub use handlers::{CreateReviewRequest, MovieEntry, TopMoviesResponse};
pub use routes::create_router;
pub use state::AppState;

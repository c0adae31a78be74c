pub mod health;
pub mod home;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::home_handler))
        .route("/health", get(health::health_handler))
        .route("/rater", post(handlers::handle_rate_resume))
        .with_state(state)
}

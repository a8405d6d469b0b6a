pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::jd::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/extraction", post(handlers::handle_extraction))
        .route("/enhancement", post(handlers::handle_enhancement))
        .route("/process", post(handlers::handle_process))
        .with_state(state)
}

pub mod debug;
pub mod generate;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/routes/generate", post(generate::generate_route))
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}

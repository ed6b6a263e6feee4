pub mod config;
pub mod error;
pub mod generator;
pub mod groq;
pub mod models;
pub mod routes;
pub mod store;

use axum::{Router, routing::{get, post}};
use tower_http::{cors::{CorsLayer, Any}, trace::TraceLayer};

pub use routes::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(routes::root))
        .route("/api/", get(routes::root))
        .route("/api/status", post(routes::create_status_check).get(routes::list_status_checks))
        .route("/api/generate-code", post(routes::generate_code))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

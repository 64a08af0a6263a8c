//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the diagram endpoint plus the welcome and liveness probes under a
//! single Axum router, wrapped in the configured CORS policy and request
//! tracing.

pub mod diagram;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::CorsPolicy;
use crate::state::AppState;

pub fn app(state: AppState, cors: &CorsPolicy) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/generate-diagram", post(diagram::generate_diagram))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors))
        .with_state(state)
}

fn cors_layer(policy: &CorsPolicy) -> CorsLayer {
    let origin = match policy {
        CorsPolicy::AnyOrigin => AllowOrigin::any(),
        CorsPolicy::Origins(origins) => AllowOrigin::list(origins.iter().cloned()),
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to ripple.ai API" }))
}

/// Liveness only; does not touch the backend.
async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

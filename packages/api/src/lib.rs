// ABOUTME: HTTP API for Schoolgate built on axum
// ABOUTME: Assembles the router, state, access middleware, and error envelope

pub mod admissions_handlers;
pub mod error;
pub mod middleware;
pub mod response;
pub mod state;
pub mod students_handlers;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::json;

pub use error::AppError;
pub use response::ApiResponse;
pub use state::AppState;

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn admissions_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(admissions_handlers::create_admission).get(admissions_handlers::list_admissions),
        )
        .route("/{id}", get(admissions_handlers::get_admission))
        .route("/{id}/approve", post(admissions_handlers::approve_admission))
        .route("/{id}/reject", post(admissions_handlers::reject_admission))
        .route(
            "/{id}/status",
            put(admissions_handlers::update_admission_status),
        )
}

fn students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(students_handlers::list_students))
        .route("/{id}", get(students_handlers::get_student))
}

/// Builds the full API router with access control applied to every route.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .nest("/api/admissions", admissions_router())
        .nest("/api/students", students_router())
        .layer(from_fn_with_state(
            state.clone(),
            middleware::access_middleware,
        ))
        .with_state(state)
}

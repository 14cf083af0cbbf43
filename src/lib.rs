//! Teamboard
//!
//! Groups own members and tasks. The [`gateway`] is a typed client for the
//! REST contract, the [`views`] keep per-component caches of remote
//! entities in step with the service, and [`create_router`] serves the
//! same contract from SQLite, e-mailing assignees through [`notify`].

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod notify;
pub mod views;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{delete, get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use db::Repository;
use notify::Notifier;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub notifier: Notifier,
}

/// Create the service router with all routes.
///
/// `ui_origin` is the browser origin allowed by CORS; an unparsable value
/// falls back to allowing any origin.
pub fn create_router(state: AppState, ui_origin: &str) -> Router {
    let cors = match ui_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new().allow_origin(origin),
        Err(_) => {
            tracing::warn!("Invalid UI origin {:?}; allowing any origin", ui_origin);
            CorsLayer::new().allow_origin(Any)
        }
    }
    .allow_methods(Any)
    .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        // Groups
        .route("/groups/", get(api::list_groups).post(api::create_group))
        .route("/groups/{id}", get(api::get_group).delete(api::delete_group))
        // Members
        .route(
            "/groups/{id}/members/",
            get(api::list_members).post(api::add_member),
        )
        .route("/members/{id}", delete(api::remove_member))
        // Tasks
        .route(
            "/groups/{id}/tasks/",
            get(api::list_tasks).post(api::create_task),
        )
        .route("/tasks/{id}/status", put(api::update_task_status))
        .route("/tasks/{id}", delete(api::delete_task))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Task Management API" }))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

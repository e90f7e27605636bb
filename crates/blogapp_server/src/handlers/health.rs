//! Liveness endpoints.

use axum::extract::State;
use axum::Json;
use blogapp_core::BlogService;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HelloResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: &'static str,
    pub version: &'static str,
}

/// `GET /`
pub async fn hello_world() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello World",
    })
}

/// `GET /health`: reports the store backend without touching it.
pub async fn health(State(service): State<BlogService>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        backend: service.backend_name(),
        version: blogapp_core::core_version(),
    })
}

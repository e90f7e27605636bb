//! HTTP API over the blog record stores.
//!
//! # Responsibility
//! - Translate HTTP verbs, paths and JSON bodies into `BlogService` calls.
//! - Map store errors to status codes with a stable JSON error envelope.
//!
//! # Invariants
//! - Handlers hold no state across requests.
//! - Handlers never panic on bad input; every failure becomes a response.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult, ErrorResponse, FailureDetail};
pub use server::{build_router, shutdown_signal, HttpServer};

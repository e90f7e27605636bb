//! Router assembly and serving.

use crate::config::ServerConfig;
use crate::handlers::{blog_post, comment, health};
use crate::middleware::log_requests;
use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::{middleware, Router};
use blogapp_core::BlogService;
use log::{info, warn};
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;

const CORS_MAX_AGE: Duration = Duration::from_secs(300);

/// Builds the full application router over one service.
pub fn build_router(service: BlogService, config: &ServerConfig) -> Router {
    let routes = Router::new()
        .route("/", get(health::hello_world))
        .route("/health", get(health::health))
        .route(
            "/blog_posts",
            get(blog_post::list_blog_posts).post(blog_post::create_blog_post),
        )
        .route(
            "/blog_posts/{id}",
            get(blog_post::get_blog_post)
                .put(blog_post::update_blog_post)
                .delete(blog_post::delete_blog_post),
        )
        .route(
            "/comments",
            get(comment::list_comments).post(comment::create_comment),
        )
        .route(
            "/comments/{id}",
            get(comment::get_comment)
                .put(comment::update_comment)
                .delete(comment::delete_comment),
        )
        .with_state(service);

    with_request_timeout(routes, config.request_timeout())
        .layer(cors_layer(&config.cors_origins))
        .layer(middleware::from_fn(log_requests))
}

/// Requests still running after `timeout` are answered with 408.
#[allow(deprecated)]
fn with_request_timeout(router: Router, timeout: Duration) -> Router {
    router.layer(TimeoutLayer::new(timeout))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("event=cors_config module=server status=error origin={origin} error=invalid_origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE)
}

/// HTTP server for the blog API.
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: ServerConfig, service: BlogService) -> Self {
        let router = build_router(service, &config);
        Self { config, router }
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Binds the configured address and serves until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        self.serve(listener, shutdown).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!(
            "event=server_listen module=server status=ok address={}",
            listener.local_addr()?
        );
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("event=server_stop module=server status=ok");
        Ok(())
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("event=signal_install module=server status=error signal=ctrl_c error={err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("event=signal_install module=server status=error signal=sigterm error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("event=shutdown_signal module=server status=ok");
}

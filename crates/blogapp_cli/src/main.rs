//! `blogapp` server entry point.
//!
//! # Responsibility
//! - Read flags and environment, initialize logging, pick the store backend.
//! - Run the HTTP server until Ctrl-C or SIGTERM.

use blogapp_core::db::open_db;
use blogapp_core::{default_log_level, init_logging, BlogService, SystemClock};
use blogapp_server::{shutdown_signal, HttpServer, ServerConfig};
use clap::{Parser, ValueEnum};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    Memory,
    Sqlite,
}

#[derive(Debug, Parser)]
#[command(name = "blogapp", version, about = "Blog posts and comments over HTTP")]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Record store backend.
    #[arg(long, env = "BLOGAPP_BACKEND", value_enum, default_value_t = Backend::Memory)]
    backend: Backend,

    /// SQLite file, used with `--backend sqlite`.
    #[arg(long, env = "BLOGAPP_DB_PATH", default_value = "blogapp.sqlite3")]
    db_path: PathBuf,

    #[arg(long, env = "BLOGAPP_LOG_LEVEL", default_value = default_log_level())]
    log_level: String,

    /// Directory for rotating log files; stderr when unset.
    #[arg(long, env = "BLOGAPP_LOG_DIR")]
    log_dir: Option<String>,

    /// Allowed CORS origins; the request origin is mirrored when empty.
    #[arg(long = "cors-origin", env = "BLOGAPP_CORS_ORIGINS", value_delimiter = ',')]
    cors_origins: Vec<String>,

    /// Upper bound for one request, in seconds.
    #[arg(long, env = "BLOGAPP_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,
}

impl Cli {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
            request_timeout_secs: self.request_timeout_secs,
        }
    }

    fn build_service(&self) -> Result<BlogService, Box<dyn Error>> {
        let clock = Arc::new(SystemClock);
        match self.backend {
            Backend::Memory => Ok(BlogService::in_memory(clock)),
            Backend::Sqlite => {
                let conn = open_db(&self.db_path)?;
                Ok(BlogService::sqlite(Arc::new(Mutex::new(conn)), clock)?)
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.log_dir.as_deref())?;

    let service = cli.build_service()?;
    info!(
        "event=app_start module=cli status=ok backend={} version={}",
        service.backend_name(),
        blogapp_core::core_version()
    );

    HttpServer::new(cli.server_config(), service)
        .run(shutdown_signal())
        .await?;
    Ok(())
}

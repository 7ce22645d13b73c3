//! Kitchen calendar HTTP server binary.
//!
//! Initializes the task repository, sets up the HTTP router, and starts
//! serving the calendar API.
//!
//! # Usage
//!
//! ```bash
//! # Run with the local (in-memory) repository (default)
//! cargo run --bin kitchen-calendar-server
//!
//! # Run against the task backend
//! REPOSITORY_TYPE=rest KITCHEN_API_URL=https://kitchen.example.com/api \
//!   KITCHEN_API_TOKEN=secret \
//!   cargo run --bin kitchen-calendar-server --features rest-repo
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REPOSITORY_TYPE`: `local` or `rest`
//! - `KITCHEN_API_URL`, `KITCHEN_API_TOKEN`, `KITCHEN_API_TOKEN_SCHEME`,
//!   `KITCHEN_API_TIMEOUT_SECS`: task backend connection
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use kitchen_calendar::db;
use kitchen_calendar::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting kitchen calendar server");

    db::init_repository()?;
    let repository = Arc::clone(db::get_repository()?);
    match db::health_check(repository.as_ref()).await {
        Ok(true) => info!("Task repository is reachable"),
        Ok(false) => tracing::warn!("Task repository reported unhealthy; serving anyway"),
        Err(e) => tracing::warn!("Task repository health check failed: {}", e),
    }

    let app = create_router(AppState::new(repository));

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

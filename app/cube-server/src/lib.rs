//! FILENAME: app/cube-server/src/lib.rs
//! HTTP host for the OLAP cube engine.
//!
//! Generates the sales fact table once at startup and serves the cube
//! operations as JSON endpoints under `/api`.

#[macro_use]
pub mod logging;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use routes::build_router;
pub use state::AppState;

use tokio::net::TcpListener;

/// Builds the state, binds the listener and serves until the process exits.
pub async fn run(config: ServerConfig) -> Result<()> {
    let state = AppState::from_config(&config)?;
    log_info!(
        "SERVER",
        "fact table ready: {} rows, dimensions={:?}, metrics={:?}",
        state.table.row_count(),
        state.table.dimensions(),
        state.table.measures()
    );

    let listener = TcpListener::bind(config.listen).await?;
    log_info!("SERVER", "listening on http://{}", config.listen);

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

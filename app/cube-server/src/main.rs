//! FILENAME: app/cube-server/src/main.rs
//! Cube server CLI
//!
//! Run with: `cargo run -p cube-server -- --help`

use clap::Parser;
use cube_server::{logging, log_error, log_info, run, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::parse();
    logging::init(&config.log_level, config.log_file.as_deref())?;

    log_info!(
        "SERVER",
        "starting cube-server v{} seed={} years={}..{}",
        env!("CARGO_PKG_VERSION"),
        config.seed,
        config.start_year,
        config.start_year + i64::from(config.years) - 1
    );

    if let Err(e) = run(config).await {
        log_error!("SERVER", "server stopped: {}", e);
        return Err(e.into());
    }
    Ok(())
}

//! FILENAME: app/cube-server/src/config.rs
//! Server configuration

use std::net::SocketAddr;
use std::path::PathBuf;
use clap::Parser;
use fact_table::DatasetConfig;

/// Command line and environment configuration for the cube server.
#[derive(Debug, Clone, Parser)]
#[command(name = "cube-server", version, about = "OLAP cube queries over a generated sales dataset")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "CUBE_LISTEN", default_value = "127.0.0.1:5000")]
    pub listen: SocketAddr,

    /// Seed of the synthetic dataset
    #[arg(long, env = "CUBE_SEED", default_value = "42")]
    pub seed: u64,

    /// First year of the synthetic dataset
    #[arg(long, env = "CUBE_START_YEAR", default_value = "2022")]
    pub start_year: i64,

    /// Number of years to generate
    #[arg(long, env = "CUBE_YEARS", default_value = "3")]
    pub years: u32,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, env = "CUBE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Also write the log to this file (truncated at startup)
    #[arg(long, env = "CUBE_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl ServerConfig {
    pub fn dataset(&self) -> DatasetConfig {
        DatasetConfig {
            seed: self.seed,
            start_year: self.start_year,
            years: self.years,
        }
    }
}

//! FILENAME: app/cube-server/src/state.rs
//! Application state shared by all handlers.
//!
//! The fact table is generated once at startup and never mutated, so handlers
//! share it through an `Arc` without locking.

use std::sync::Arc;
use fact_table::{generate_dataset, FactTable};
use crate::config::ServerConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct AppState {
    pub table: Arc<FactTable>,
}

impl AppState {
    pub fn new(table: FactTable) -> Self {
        AppState {
            table: Arc::new(table),
        }
    }

    /// Generates the dataset described by the configuration.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        Ok(AppState::new(generate_dataset(&config.dataset())?))
    }
}

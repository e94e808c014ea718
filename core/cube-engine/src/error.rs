//! FILENAME: core/cube-engine/src/error.rs

use thiserror::Error;
use fact_table::FactTableError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CubeError {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Column '{0}' is not a dimension")]
    NotADimension(String),

    #[error("Column '{0}' is not a measure")]
    NotAMeasure(String),

    #[error("Fact table error: {0}")]
    FactTable(FactTableError),
}

impl From<FactTableError> for CubeError {
    fn from(err: FactTableError) -> Self {
        match err {
            FactTableError::UnknownColumn(name) => CubeError::UnknownColumn(name),
            other => CubeError::FactTable(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, CubeError>;

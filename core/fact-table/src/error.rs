//! FILENAME: core/fact-table/src/error.rs

use thiserror::Error;
use crate::value::ColumnKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactTableError {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Duplicate column in schema: {0}")]
    DuplicateColumn(String),

    #[error("Row has {found} values, schema expects {expected}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("Column '{column}' expects {expected} values, got {found}")]
    KindMismatch {
        column: String,
        expected: ColumnKind,
        found: ColumnKind,
    },

    #[error("Column '{column}' cannot be a {role} (kind {kind})")]
    InvalidRole {
        column: String,
        role: &'static str,
        kind: ColumnKind,
    },
}

pub type Result<T> = std::result::Result<T, FactTableError>;

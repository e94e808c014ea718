//! FILENAME: core/fact-table/src/schema.rs
//! PURPOSE: Column definitions for the fact table.
//! CONTEXT: A schema is an ordered list of uniquely named columns, each with a
//! storage kind and an analytical role (dimension or measure).

use serde::{Deserialize, Serialize};
use crate::error::{FactTableError, Result};
use crate::value::ColumnKind;

/// Index of a column in the schema (0-based).
pub type ColumnIndex = usize;

/// How a column participates in analytical queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnRole {
    /// Used for grouping and filtering (year, region, ...).
    Dimension,
    /// Numeric column that gets aggregated (sales, quantity).
    Measure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub kind: ColumnKind,
    pub role: ColumnRole,
}

impl ColumnDef {
    pub fn dimension(name: impl Into<String>, kind: ColumnKind) -> Self {
        ColumnDef {
            name: name.into(),
            kind,
            role: ColumnRole::Dimension,
        }
    }

    pub fn measure(name: impl Into<String>, kind: ColumnKind) -> Self {
        ColumnDef {
            name: name.into(),
            kind,
            role: ColumnRole::Measure,
        }
    }

    pub fn is_dimension(&self) -> bool {
        self.role == ColumnRole::Dimension
    }

    pub fn is_measure(&self) -> bool {
        self.role == ColumnRole::Measure
    }
}

/// Ordered, validated set of columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<ColumnDef>,
}

impl Schema {
    /// Validates names are unique and roles fit their kinds:
    /// measures must be numeric, dimensions cannot be decimal.
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(FactTableError::DuplicateColumn(column.name.clone()));
            }
            let valid = match column.role {
                ColumnRole::Measure => column.kind.is_numeric(),
                ColumnRole::Dimension => column.kind != ColumnKind::Decimal,
            };
            if !valid {
                return Err(FactTableError::InvalidRole {
                    column: column.name.clone(),
                    role: match column.role {
                        ColumnRole::Measure => "measure",
                        ColumnRole::Dimension => "dimension",
                    },
                    kind: column.kind,
                });
            }
        }
        Ok(Schema { columns })
    }

    /// Skips validation for schemas defined in this crate.
    pub(crate) fn from_trusted(columns: Vec<ColumnDef>) -> Self {
        Schema { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn get(&self, index: ColumnIndex) -> Option<&ColumnDef> {
        self.columns.get(index)
    }

    /// Resolves a column name to its index.
    pub fn index_of(&self, name: &str) -> Result<ColumnIndex> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| FactTableError::UnknownColumn(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
}

//! FILENAME: core/cube-engine/src/lib.rs
//! OLAP cube operations over the fact table.
//!
//! This crate answers multidimensional queries against an immutable
//! `FactTable`. It depends on `fact-table` only for shared types
//! (FactTable, FactValue, ValueId) and never performs I/O.
//!
//! Layers:
//! - `definition`: Query parameters (what the caller ASKS for)
//! - `aggregate`: Group keys and sum accumulators (HOW we compute)
//! - `view`: Tabular output (WHAT we return)
//! - `engine`: Aggregator behind `face`, `cube` and dice summaries
//! - `dice`: Multi-dimension selection masks and `dice`
//! - `drill`: Cell drill-down
//! - `labels`: Flattening of multi-level column keys

pub mod aggregate;
pub mod definition;
pub mod dice;
pub mod drill;
pub mod engine;
pub mod error;
pub mod labels;
pub mod view;

pub use definition::*;
pub use dice::{dice, Selection};
pub use drill::cell;
pub use engine::{cube, face, options, pivot, preset_views, PivotCalculator};
pub use error::{CubeError, Result};
pub use labels::CompositeKey;
pub use view::{CubeOptions, PivotRecord, PivotResult, ResultValue};

//! FILENAME: core/fact-table/src/lib.rs
//! PURPOSE: Fact table storage for the OLAP cube.
//! CONTEXT: Holds the immutable, column-typed sales facts that every cube
//! operation reads. The cube engine depends on this crate only for shared
//! types (FactTable, FactValue, ValueId).

pub mod error;
pub mod field;
pub mod generator;
pub mod schema;
pub mod table;
pub mod value;

// Re-export commonly used types at the crate root
pub use error::{FactTableError, Result};
pub use field::{FieldCache, ValueId};
pub use generator::{generate_dataset, quarter_of, DatasetConfig};
pub use schema::{ColumnDef, ColumnIndex, ColumnRole, Schema};
pub use table::{FactRecord, FactTable, FactTableBuilder};
pub use value::{ColumnKind, FactValue, OrderedFloat};

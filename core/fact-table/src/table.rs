//! FILENAME: core/fact-table/src/table.rs
//! Fact Table - The immutable, interned store queried by the cube engine.
//!
//! The table is designed for:
//! - Fast one-time build from generated or loaded rows (O(n))
//! - Memory-efficient storage via per-column value interning
//! - Cheap group keys: records are vectors of `ValueId`s
//!
//! A table is assembled with `FactTableBuilder` and sealed by `build()`.
//! A built table exposes no mutation API, so it can be shared across
//! threads (`Arc<FactTable>`) without locking.

use log::debug;
use crate::error::{FactTableError, Result};
use crate::field::{FieldCache, ValueId};
use crate::schema::{ColumnDef, ColumnIndex, Schema};
use crate::value::{ColumnKind, FactValue};

// ============================================================================
// ROW RECORD
// ============================================================================

/// A single fact row, stored as interned value IDs.
/// Records keep insertion order inside the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactRecord {
    /// ValueIds for each column, indexed by ColumnIndex.
    pub values: Vec<ValueId>,
}

impl FactRecord {
    pub fn value_id(&self, column: ColumnIndex) -> Option<ValueId> {
        self.values.get(column).copied()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Accumulates rows before sealing them into a `FactTable`.
#[derive(Debug)]
pub struct FactTableBuilder {
    schema: Schema,
    fields: Vec<FieldCache>,
    records: Vec<FactRecord>,
}

impl FactTableBuilder {
    pub fn new(schema: Schema) -> Self {
        let fields = (0..schema.len()).map(|_| FieldCache::new()).collect();
        FactTableBuilder {
            schema,
            fields,
            records: Vec::new(),
        }
    }

    /// Reserves capacity for expected record count.
    pub fn reserve(&mut self, record_count: usize) {
        self.records.reserve(record_count);
    }

    /// Adds a row. Values must be in schema order; integers are widened when
    /// stored in decimal columns.
    pub fn push_row(&mut self, values: &[FactValue]) -> Result<()> {
        if values.len() != self.schema.len() {
            return Err(FactTableError::ArityMismatch {
                expected: self.schema.len(),
                found: values.len(),
            });
        }

        let mut interned = Vec::with_capacity(values.len());
        for (column, value) in self.schema.columns().iter().zip(values) {
            let stored = value
                .clone()
                .coerce_to(column.kind)
                .ok_or_else(|| FactTableError::KindMismatch {
                    column: column.name.clone(),
                    expected: column.kind,
                    found: value.kind(),
                })?;
            interned.push(stored);
        }

        let values = interned
            .into_iter()
            .zip(self.fields.iter_mut())
            .map(|(value, field)| field.intern(value))
            .collect();

        self.records.push(FactRecord { values });
        Ok(())
    }

    /// Seals the table: builds the per-field sort orders.
    pub fn build(mut self) -> FactTable {
        for field in &mut self.fields {
            field.seal();
        }
        debug!(
            target: "FACTS",
            "built fact table: {} rows, {} columns",
            self.records.len(),
            self.schema.len()
        );
        FactTable {
            schema: self.schema,
            fields: self.fields,
            records: self.records,
        }
    }
}

// ============================================================================
// FACT TABLE
// ============================================================================

#[derive(Debug, Clone)]
pub struct FactTable {
    schema: Schema,
    fields: Vec<FieldCache>,
    records: Vec<FactRecord>,
}

impl FactTable {
    /// Builds a table from complete rows in one go.
    pub fn from_rows<I>(schema: Schema, rows: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<[FactValue]>,
    {
        let mut builder = FactTableBuilder::new(schema);
        for row in rows {
            builder.push_row(row.as_ref())?;
        }
        Ok(builder.build())
    }

    /// The sales fact schema: six dimensions and two measures.
    pub fn standard_schema() -> Schema {
        let columns = vec![
            ColumnDef::dimension("year", ColumnKind::Integer),
            ColumnDef::dimension("quarter", ColumnKind::Integer),
            ColumnDef::dimension("month", ColumnKind::Integer),
            ColumnDef::dimension("region", ColumnKind::Text),
            ColumnDef::dimension("channel", ColumnKind::Text),
            ColumnDef::dimension("product", ColumnKind::Text),
            ColumnDef::measure("quantity", ColumnKind::Integer),
            ColumnDef::measure("sales", ColumnKind::Decimal),
        ];
        Schema::from_trusted(columns)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FactRecord] {
        &self.records
    }

    /// Resolves a column name, failing with `UnknownColumn`.
    pub fn column(&self, name: &str) -> Result<(ColumnIndex, &ColumnDef)> {
        let index = self.schema.index_of(name)?;
        let def = self
            .schema
            .get(index)
            .ok_or_else(|| FactTableError::UnknownColumn(name.to_string()))?;
        Ok((index, def))
    }

    pub fn field(&self, column: ColumnIndex) -> Option<&FieldCache> {
        self.fields.get(column)
    }

    /// The value a record holds in a column.
    pub fn value(&self, record: &FactRecord, column: ColumnIndex) -> Option<&FactValue> {
        let id = record.value_id(column)?;
        self.fields.get(column)?.get_value(id)
    }

    /// Names of the dimension columns, in schema order.
    pub fn dimensions(&self) -> Vec<&str> {
        self.schema
            .columns()
            .iter()
            .filter(|c| c.is_dimension())
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Names of the measure columns, in schema order.
    pub fn measures(&self) -> Vec<&str> {
        self.schema
            .columns()
            .iter()
            .filter(|c| c.is_measure())
            .map(|c| c.name.as_str())
            .collect()
    }
}

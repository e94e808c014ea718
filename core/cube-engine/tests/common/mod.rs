//! FILENAME: tests/common/mod.rs
//! Fixtures and assertion helpers for cube engine integration tests.

#![allow(dead_code)]

use cube_engine::{PivotResult, ResultValue};
use fact_table::{
    generate_dataset, ColumnDef, ColumnKind, DatasetConfig, FactTable, FactValue, Schema,
};

// ============================================================================
// FIXTURES
// ============================================================================

/// The four-row (year, region, sales) table used by the worked scenarios.
pub struct ScenarioFixture;

impl ScenarioFixture {
    pub fn data() -> Vec<(i64, &'static str, f64)> {
        vec![
            (2023, "Norte", 100.0),
            (2023, "Sur", 50.0),
            (2024, "Norte", 75.0),
            (2024, "Sur", 25.0),
        ]
    }

    pub fn table() -> FactTable {
        let schema = Schema::new(vec![
            ColumnDef::dimension("year", ColumnKind::Integer),
            ColumnDef::dimension("region", ColumnKind::Text),
            ColumnDef::measure("sales", ColumnKind::Decimal),
        ])
        .unwrap();
        let rows = Self::data().into_iter().map(|(year, region, sales)| {
            vec![FactValue::Integer(year), FactValue::text(region), FactValue::decimal(sales)]
        });
        FactTable::from_rows(schema, rows).unwrap()
    }
}

/// The standard schema with no rows.
pub fn empty_table() -> FactTable {
    FactTable::from_rows(FactTable::standard_schema(), Vec::<Vec<FactValue>>::new()).unwrap()
}

/// A small generated sales table with the full standard schema.
pub fn generated_table() -> FactTable {
    generate_dataset(&DatasetConfig {
        seed: 7,
        start_year: 2023,
        years: 2,
    })
    .unwrap()
}

/// Sum of a measure over every row of the table.
pub fn column_sum(table: &FactTable, column: &str) -> f64 {
    let (index, _) = table.column(column).unwrap();
    table
        .records()
        .iter()
        .filter_map(|record| table.value(record, index).and_then(FactValue::as_f64))
        .sum()
}

// ============================================================================
// ASSERTION HELPERS
// ============================================================================

pub fn number(value: Option<&ResultValue>) -> f64 {
    value
        .and_then(ResultValue::as_f64)
        .unwrap_or_else(|| panic!("expected a number, got {:?}", value))
}

pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = 1e-6 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} but got {}",
        expected,
        actual
    );
}

/// Sum of every non-label cell of a pivot (all columns after the first
/// `label_columns`), excluding the Total row and column.
pub fn cell_sum(result: &PivotResult, label_columns: usize) -> f64 {
    result
        .data
        .iter()
        .filter(|record| {
            record
                .iter()
                .next()
                .map(|(_, label)| label != &ResultValue::text("Total"))
                .unwrap_or(true)
        })
        .flat_map(|record| {
            record
                .iter()
                .skip(label_columns)
                .filter(|(name, _)| *name != "Total")
                .filter_map(|(_, value)| value.as_f64())
                .collect::<Vec<_>>()
        })
        .sum()
}

//! FILENAME: core/cube-engine/src/engine.rs
//! Cube Engine - The aggregator that turns fact rows into pivot tables.
//!
//! This module takes a fact table and an axis selection (row dimensions,
//! column dimensions, measure) and produces a `PivotResult`.
//!
//! Algorithm:
//! 1. Resolve every name against the schema and check its role
//! 2. Single pass over the (optionally masked) records, summing the measure
//!    per (row key, column key) plus row, column and grand totals
//! 3. Sort row and column keys by each field's natural value order
//! 4. Emit one record per row key, zero-filling missing cells, then the
//!    Total row when margins are on

use std::cmp::Ordering;
use log::debug;
use rustc_hash::FxHashMap;
use fact_table::{ColumnIndex, ColumnKind, FactRecord, FactTable, FactValue, FieldCache};
use crate::aggregate::{GroupKey, MeasureAccumulator};
use crate::definition::{PivotOptions, SYNTHETIC_ROW_LABEL, TOTAL_LABEL};
use crate::dice::Selection;
use crate::error::{CubeError, Result};
use crate::labels::CompositeKey;
use crate::view::{CubeOptions, PivotRecord, PivotResult, ResultValue};

// ============================================================================
// RESOLVED FIELDS
// ============================================================================

/// A grouping dimension resolved against the schema.
#[derive(Debug, Clone, Copy)]
struct AxisField<'a> {
    index: ColumnIndex,
    name: &'a str,
    cache: &'a FieldCache,
}

/// The measure being summed.
#[derive(Debug, Clone, Copy)]
struct MeasureField<'a> {
    index: ColumnIndex,
    name: &'a str,
    kind: ColumnKind,
}

pub(crate) fn resolve_dimension<'a>(table: &'a FactTable, name: &str) -> Result<(ColumnIndex, &'a str)> {
    let (index, def) = table.column(name)?;
    if !def.is_dimension() {
        return Err(CubeError::NotADimension(name.to_string()));
    }
    Ok((index, def.name.as_str()))
}

pub(crate) fn resolve_measure<'a>(table: &'a FactTable, name: &str) -> Result<(ColumnIndex, &'a str, ColumnKind)> {
    let (index, def) = table.column(name)?;
    if !def.is_measure() {
        return Err(CubeError::NotAMeasure(name.to_string()));
    }
    Ok((index, def.name.as_str(), def.kind))
}

fn resolve_axis<'a, S: AsRef<str>>(table: &'a FactTable, names: &[S]) -> Result<Vec<AxisField<'a>>> {
    names
        .iter()
        .map(|name| -> Result<AxisField<'a>> {
            let (index, name) = resolve_dimension(table, name.as_ref())?;
            let cache = table
                .field(index)
                .ok_or_else(|| CubeError::UnknownColumn(name.to_string()))?;
            Ok(AxisField { index, name, cache })
        })
        .collect()
}

// ============================================================================
// PIVOT CALCULATOR
// ============================================================================

/// Sums of one pass over the records.
#[derive(Debug, Default)]
struct Aggregates {
    cells: FxHashMap<GroupKey, FxHashMap<GroupKey, MeasureAccumulator>>,
    row_totals: FxHashMap<GroupKey, MeasureAccumulator>,
    col_totals: FxHashMap<GroupKey, MeasureAccumulator>,
    grand_total: MeasureAccumulator,
}

/// The main calculation engine for cube queries.
pub struct PivotCalculator<'a> {
    table: &'a FactTable,
    row_fields: Vec<AxisField<'a>>,
    col_fields: Vec<AxisField<'a>>,
    measure: MeasureField<'a>,
    options: PivotOptions,
    selection: Option<&'a Selection>,
}

impl<'a> PivotCalculator<'a> {
    /// Resolves the axes and measure. Fails on unknown names or wrong roles.
    pub fn new<S: AsRef<str>>(
        table: &'a FactTable,
        row_dims: &[S],
        col_dims: &[S],
        measure: &str,
        options: PivotOptions,
    ) -> Result<Self> {
        let row_fields = resolve_axis(table, row_dims)?;
        let col_fields = resolve_axis(table, col_dims)?;
        let (index, name, kind) = resolve_measure(table, measure)?;

        Ok(PivotCalculator {
            table,
            row_fields,
            col_fields,
            measure: MeasureField { index, name, kind },
            options,
            selection: None,
        })
    }

    /// Restricts the aggregation to the rows of a selection.
    pub fn with_selection(mut self, selection: &'a Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Executes the calculation and returns the result table.
    pub fn calculate(&self) -> PivotResult {
        let aggregates = self.aggregate();

        let mut row_keys: Vec<GroupKey> = aggregates.row_totals.keys().cloned().collect();
        row_keys.sort_by(|a, b| compare_keys(&self.row_fields, a, b));

        let mut col_keys: Vec<GroupKey> = aggregates.col_totals.keys().cloned().collect();
        col_keys.sort_by(|a, b| compare_keys(&self.col_fields, a, b));

        let col_labels = self.column_labels(&col_keys);
        let mut result = PivotResult::new(self.header(&col_labels));

        let empty = FxHashMap::default();
        for row_key in &row_keys {
            let mut record = PivotRecord::with_capacity(result.columns.len());
            self.push_row_labels(&mut record, row_key);

            let row_cells = aggregates.cells.get(row_key).unwrap_or(&empty);
            for (col_key, label) in col_keys.iter().zip(&col_labels) {
                let acc = row_cells.get(col_key).copied().unwrap_or_default();
                record.push(label.as_str(), self.finish(&acc));
            }
            if self.options.margins {
                let acc = aggregates.row_totals.get(row_key).copied().unwrap_or_default();
                record.push(TOTAL_LABEL, self.finish(&acc));
            }
            result.push(record);
        }

        // The Total row is emitted even for an empty table.
        if self.options.margins {
            result.push(self.total_row(&aggregates, &col_keys, &col_labels));
        }

        debug!(
            target: "CUBE",
            "pivot rows={:?} cols={:?} measure={} -> {} rows x {} columns",
            self.row_fields.iter().map(|f| f.name).collect::<Vec<_>>(),
            self.col_fields.iter().map(|f| f.name).collect::<Vec<_>>(),
            self.measure.name,
            result.row_count(),
            result.columns.len()
        );
        result
    }

    /// Single pass over the records.
    fn aggregate(&self) -> Aggregates {
        let mut aggregates = Aggregates::default();

        for (position, record) in self.table.records().iter().enumerate() {
            if let Some(selection) = self.selection {
                if !selection.contains(position) {
                    continue;
                }
            }
            let Some(value) = self.table.value(record, self.measure.index) else {
                continue;
            };
            let (Some(row_key), Some(col_key)) = (
                axis_key(&self.row_fields, record),
                axis_key(&self.col_fields, record),
            ) else {
                continue;
            };

            aggregates
                .cells
                .entry(row_key.clone())
                .or_default()
                .entry(col_key.clone())
                .or_default()
                .add(value);
            aggregates.row_totals.entry(row_key).or_default().add(value);
            aggregates.col_totals.entry(col_key).or_default().add(value);
            aggregates.grand_total.add(value);
        }

        aggregates
    }

    fn finish(&self, acc: &MeasureAccumulator) -> ResultValue {
        acc.finish(self.measure.kind, self.options.round_decimals)
    }

    /// Flattened labels of the sorted column keys. Without column dimensions
    /// the single column carries the measure name.
    fn column_labels(&self, col_keys: &[GroupKey]) -> Vec<String> {
        if self.col_fields.is_empty() {
            return col_keys.iter().map(|_| self.measure.name.to_string()).collect();
        }
        col_keys
            .iter()
            .map(|key| {
                let parts = key
                    .iter()
                    .zip(&self.col_fields)
                    .map(|(&id, field)| field.cache.get_value(id).cloned().unwrap_or_else(|| FactValue::text("")))
                    .collect();
                CompositeKey::new(parts).label()
            })
            .collect()
    }

    fn header(&self, col_labels: &[String]) -> Vec<String> {
        let mut columns: Vec<String> = if self.row_fields.is_empty() {
            vec![SYNTHETIC_ROW_LABEL.to_string()]
        } else {
            self.row_fields.iter().map(|f| f.name.to_string()).collect()
        };

        if col_labels.is_empty() && self.col_fields.is_empty() {
            columns.push(self.measure.name.to_string());
        } else {
            columns.extend(col_labels.iter().cloned());
        }

        if self.options.margins {
            columns.push(TOTAL_LABEL.to_string());
        }
        columns
    }

    fn push_row_labels(&self, record: &mut PivotRecord, row_key: &GroupKey) {
        if self.row_fields.is_empty() {
            record.push(SYNTHETIC_ROW_LABEL, self.measure.name);
            return;
        }
        for (&id, field) in row_key.iter().zip(&self.row_fields) {
            let label = field
                .cache
                .get_value(id)
                .map(ResultValue::from)
                .unwrap_or_else(|| ResultValue::text(""));
            record.push(field.name, label);
        }
    }

    fn total_row(&self, aggregates: &Aggregates, col_keys: &[GroupKey], col_labels: &[String]) -> PivotRecord {
        let mut record = PivotRecord::with_capacity(col_labels.len() + self.row_fields.len().max(1) + 1);

        if self.row_fields.is_empty() {
            record.push(SYNTHETIC_ROW_LABEL, TOTAL_LABEL);
        } else {
            for (level, field) in self.row_fields.iter().enumerate() {
                let label = if level == 0 { TOTAL_LABEL } else { "" };
                record.push(field.name, label);
            }
        }

        for (col_key, label) in col_keys.iter().zip(col_labels) {
            let acc = aggregates.col_totals.get(col_key).copied().unwrap_or_default();
            record.push(label.as_str(), self.finish(&acc));
        }
        if col_keys.is_empty() && self.col_fields.is_empty() {
            record.push(self.measure.name, self.finish(&MeasureAccumulator::default()));
        }
        record.push(TOTAL_LABEL, self.finish(&aggregates.grand_total));
        record
    }
}

fn axis_key(fields: &[AxisField<'_>], record: &FactRecord) -> Option<GroupKey> {
    fields.iter().map(|f| record.value_id(f.index)).collect()
}

/// Orders keys level by level using each field's natural value order.
fn compare_keys(fields: &[AxisField<'_>], a: &GroupKey, b: &GroupKey) -> Ordering {
    for ((&x, &y), field) in a.iter().zip(b.iter()).zip(fields) {
        let ord = field.cache.rank_of(x).cmp(&field.cache.rank_of(y));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Sums `measure` grouped by `row_dims` x `col_dims`.
/// This is the shared entry point behind `face`, `cube` and dice summaries.
pub fn pivot<S: AsRef<str>>(
    table: &FactTable,
    row_dims: &[S],
    col_dims: &[S],
    measure: &str,
    options: PivotOptions,
) -> Result<PivotResult> {
    let calculator = PivotCalculator::new(table, row_dims, col_dims, measure, options)?;
    Ok(calculator.calculate())
}

/// Two-dimensional pivot: one row per `row_dim` value, one column per
/// `col_dim` value. No margins, values unrounded.
pub fn face(table: &FactTable, row_dim: &str, col_dim: &str, measure: &str) -> Result<PivotResult> {
    pivot(table, &[row_dim], &[col_dim], measure, PivotOptions::face())
}

/// Full cube over any number of row and column dimensions, always with
/// Total margins and values rounded to 2 decimals.
pub fn cube<S: AsRef<str>>(
    table: &FactTable,
    row_dims: &[S],
    col_dims: &[S],
    measure: &str,
) -> Result<PivotResult> {
    pivot(table, row_dims, col_dims, measure, PivotOptions::cube())
}

/// The dimension and measure names a caller may use.
pub fn options(table: &FactTable) -> CubeOptions {
    CubeOptions {
        dimensions: table.dimensions().into_iter().map(String::from).collect(),
        metrics: table.measures().into_iter().map(String::from).collect(),
    }
}

/// Fixed overview faces of the sales cube.
/// Views whose columns are missing from the table are skipped.
pub fn preset_views(table: &FactTable) -> Result<Vec<(&'static str, PivotResult)>> {
    const VIEWS: [(&str, &[&str], &[&str], &str); 3] = [
        ("product_region_year_sales", &["product", "region"], &["year"], "sales"),
        ("year_region_sales", &["year"], &["region"], "sales"),
        ("product_year_quantity", &["product"], &["year"], "quantity"),
    ];

    let mut views = Vec::with_capacity(VIEWS.len());
    for (name, rows, cols, measure) in VIEWS {
        let available = rows
            .iter()
            .chain(cols.iter())
            .chain(std::iter::once(&measure))
            .all(|column| table.schema().contains(column));
        if !available {
            debug!(target: "CUBE", "skipping view {}: columns missing", name);
            continue;
        }
        views.push((name, pivot(table, rows, cols, measure, PivotOptions::face())?));
    }
    Ok(views)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fact_table::{ColumnDef, Schema};

    fn create_test_table() -> FactTable {
        let schema = Schema::new(vec![
            ColumnDef::dimension("year", ColumnKind::Integer),
            ColumnDef::dimension("quarter", ColumnKind::Integer),
            ColumnDef::dimension("region", ColumnKind::Text),
            ColumnDef::measure("units", ColumnKind::Integer),
            ColumnDef::measure("sales", ColumnKind::Decimal),
        ])
        .unwrap();
        let row = |year: i64, quarter: i64, region: &str, units: i64, sales: f64| {
            vec![
                FactValue::Integer(year),
                FactValue::Integer(quarter),
                FactValue::text(region),
                FactValue::Integer(units),
                FactValue::decimal(sales),
            ]
        };
        FactTable::from_rows(
            schema,
            vec![
                row(2024, 2, "Sur", 1, 10.0),
                row(2023, 1, "Norte", 2, 20.0),
                row(2023, 2, "Norte", 3, 30.0),
                row(2024, 1, "Norte", 4, 40.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rows_sorted_naturally() {
        let table = create_test_table();
        let result = face(&table, "year", "region", "sales").unwrap();
        assert_eq!(result.get(0, "year"), Some(&ResultValue::Integer(2023)));
        assert_eq!(result.get(1, "year"), Some(&ResultValue::Integer(2024)));
    }

    #[test]
    fn test_missing_cells_are_zero() {
        let table = create_test_table();
        let result = face(&table, "year", "region", "sales").unwrap();
        assert_eq!(result.get(0, "Sur"), Some(&ResultValue::Number(0.0)));
    }

    #[test]
    fn test_integer_measure_sums_to_integer() {
        let table = create_test_table();
        let result = face(&table, "year", "region", "units").unwrap();
        assert_eq!(result.get(0, "Norte"), Some(&ResultValue::Integer(5)));
        assert_eq!(result.get(1, "Sur"), Some(&ResultValue::Integer(1)));
    }

    #[test]
    fn test_composite_column_labels() {
        let table = create_test_table();
        let result = cube(&table, &["region"], &["year", "quarter"], "sales").unwrap();
        assert_eq!(
            result.columns,
            vec!["region", "2023-T1", "2023-T2", "2024-T1", "2024-T2", "Total"]
        );
    }

    #[test]
    fn test_multi_level_row_total_labels() {
        let table = create_test_table();
        let result = cube(&table, &["year", "region"], &["quarter"], "sales").unwrap();
        let total = result.data.last().unwrap();
        assert_eq!(total.get("year"), Some(&ResultValue::text(TOTAL_LABEL)));
        assert_eq!(total.get("region"), Some(&ResultValue::text("")));
        assert_eq!(total.get(TOTAL_LABEL), Some(&ResultValue::Number(100.0)));
    }

    #[test]
    fn test_wrong_roles_are_rejected() {
        let table = create_test_table();
        assert_eq!(
            face(&table, "year", "region", "region").unwrap_err(),
            CubeError::NotAMeasure("region".to_string())
        );
        assert_eq!(
            face(&table, "sales", "region", "units").unwrap_err(),
            CubeError::NotADimension("sales".to_string())
        );
        assert_eq!(
            face(&table, "Año", "region", "sales").unwrap_err(),
            CubeError::UnknownColumn("Año".to_string())
        );
    }

    #[test]
    fn test_options_lists_roles() {
        let table = create_test_table();
        let opts = options(&table);
        assert_eq!(opts.dimensions, vec!["year", "quarter", "region"]);
        assert_eq!(opts.metrics, vec!["units", "sales"]);
    }

    #[test]
    fn test_preset_views_skip_missing_columns() {
        let table = create_test_table();
        let views = preset_views(&table).unwrap();
        let names: Vec<_> = views.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["year_region_sales"]);
    }
}

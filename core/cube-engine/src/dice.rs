//! FILENAME: core/cube-engine/src/dice.rs
//! Dice Filter - Multi-dimension set-membership selection.
//!
//! Every restriction is first resolved against the column's interned values,
//! so testing a record costs one table lookup per restricted column no matter
//! how many accepted values were supplied. The resulting row mask is shared by
//! the detail and summary outputs and by cell drill-down.

use log::debug;
use fact_table::{ColumnIndex, ColumnKind, FactRecord, FactTable};
use crate::definition::{DiceMode, FilterSpec, NumericOrText, PivotOptions, DETAIL_COLUMNS};
use crate::engine::{resolve_measure, PivotCalculator};
use crate::error::{CubeError, Result};
use crate::view::{round_to, PivotRecord, PivotResult, ResultValue};

// ============================================================================
// SELECTION MASK
// ============================================================================

/// Rows of a fact table that pass every restriction, by record position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    mask: Vec<bool>,
    selected: usize,
}

impl Selection {
    /// Every row of the table.
    pub fn all(table: &FactTable) -> Self {
        Selection {
            mask: vec![true; table.row_count()],
            selected: table.row_count(),
        }
    }

    /// AND of per-column restrictions; values within one restriction are OR-ed.
    /// A column named twice must satisfy both restrictions.
    pub fn from_constraints<'v, I>(table: &FactTable, constraints: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'v str, &'v [NumericOrText])>,
    {
        let mut mask = vec![true; table.row_count()];

        for (column, accepted) in constraints {
            let (index, def) = table.column(column)?;
            let accepted_ids = resolve_accepted_ids(table, index, def.kind, column, accepted)?;

            for (keep, record) in mask.iter_mut().zip(table.records()) {
                if *keep {
                    *keep = record
                        .value_id(index)
                        .and_then(|id| accepted_ids.get(id as usize).copied())
                        .unwrap_or(false);
                }
            }
        }

        let selected = mask.iter().filter(|&&keep| keep).count();
        Ok(Selection { mask, selected })
    }

    pub fn from_filters(table: &FactTable, filters: &FilterSpec) -> Result<Self> {
        Selection::from_constraints(table, filters.iter())
    }

    pub fn contains(&self, position: usize) -> bool {
        self.mask.get(position).copied().unwrap_or(false)
    }

    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected == 0
    }

    /// Selected records in source order.
    pub fn records<'t>(&'t self, table: &'t FactTable) -> impl Iterator<Item = &'t FactRecord> + 't {
        table
            .records()
            .iter()
            .zip(&self.mask)
            .filter(|(_, &keep)| keep)
            .map(|(record, _)| record)
    }
}

/// Resolves accepted input values to a lookup table indexed by ValueId.
fn resolve_accepted_ids(
    table: &FactTable,
    index: ColumnIndex,
    kind: ColumnKind,
    column: &str,
    accepted: &[NumericOrText],
) -> Result<Vec<bool>> {
    let field = table
        .field(index)
        .ok_or_else(|| CubeError::UnknownColumn(column.to_string()))?;

    if kind.is_numeric() {
        for value in accepted.iter().filter(|v| v.is_text()) {
            debug!(
                target: "DICE",
                "value '{}' for numeric column '{}' is not an integer; it matches nothing",
                value,
                column
            );
        }
    }

    let mut accepted_ids = vec![false; field.unique_count()];
    for (id, value) in field.values() {
        accepted_ids[id as usize] = accepted.iter().any(|a| a.matches(value));
    }
    Ok(accepted_ids)
}

// ============================================================================
// DETAIL ROWS
// ============================================================================

/// Decimal places of detail rows.
const DETAIL_DECIMALS: u32 = 2;

/// Renders selected rows in source order, narrowed to the detail display
/// columns present in the table. Decimal values are rounded to 2 places.
pub(crate) fn detail_rows(table: &FactTable, selection: &Selection) -> PivotResult {
    let columns: Vec<(ColumnIndex, &str)> = DETAIL_COLUMNS
        .iter()
        .filter_map(|name| table.column(name).ok().map(|(index, def)| (index, def.name.as_str())))
        .collect();

    let mut result = PivotResult::new(columns.iter().map(|(_, name)| name.to_string()).collect());
    for record in selection.records(table) {
        let mut row = PivotRecord::with_capacity(columns.len());
        for &(index, name) in &columns {
            let value = match table.value(record, index).map(ResultValue::from) {
                Some(ResultValue::Number(n)) => ResultValue::Number(round_to(n, DETAIL_DECIMALS)),
                Some(other) => other,
                None => continue,
            };
            row.push(name, value);
        }
        result.push(row);
    }
    result
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Selects rows by per-dimension value sets.
///
/// `Detail` returns the selected rows in source order with decimals rounded
/// to 2 places. `Summary` sums `measure` over the selection grouped by the
/// mode's pair of dimensions.
pub fn dice(table: &FactTable, filters: &FilterSpec, measure: &str, mode: &DiceMode) -> Result<PivotResult> {
    resolve_measure(table, measure)?;
    let selection = Selection::from_filters(table, filters)?;

    debug!(
        target: "DICE",
        "dice filters={:?} selected {}/{} rows",
        filters,
        selection.len(),
        table.row_count()
    );

    match mode {
        DiceMode::Detail => Ok(detail_rows(table, &selection)),
        DiceMode::Summary(grouping) => {
            let rows = [grouping.first.as_str(), grouping.second.as_str()];
            let calculator = PivotCalculator::new(table, &rows, &[], measure, PivotOptions::face())?;
            Ok(calculator.with_selection(&selection).calculate())
        }
    }
}

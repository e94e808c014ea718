//! FILENAME: core/cube-engine/src/drill.rs
//! Cell drill-down: the raw rows behind one cell of a 2D pivot.

use log::debug;
use fact_table::FactTable;
use crate::definition::CellKey;
use crate::dice::{detail_rows, Selection};
use crate::error::Result;
use crate::view::PivotResult;

/// Returns every row whose `x` and `y` dimensions both equal the key's
/// values. Rows are rendered exactly like `dice` detail rows for the same
/// two constraints.
///
/// Fails with `UnknownColumn` when either dimension is not in the table.
pub fn cell(table: &FactTable, key: &CellKey) -> Result<PivotResult> {
    let x = [key.x.value.clone()];
    let y = [key.y.value.clone()];
    let selection = Selection::from_constraints(
        table,
        [
            (key.x.dimension.as_str(), &x[..]),
            (key.y.dimension.as_str(), &y[..]),
        ],
    )?;

    debug!(
        target: "DRILL",
        "cell {}={} {}={} -> {} rows",
        key.x.dimension,
        key.x.value,
        key.y.dimension,
        key.y.value,
        selection.len()
    );

    Ok(detail_rows(table, &selection))
}

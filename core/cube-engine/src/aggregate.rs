//! FILENAME: core/cube-engine/src/aggregate.rs
//! Group keys and sum accumulators used by the aggregator.

use smallvec::SmallVec;
use fact_table::{ColumnKind, FactValue, ValueId};
use crate::view::{round_to, ResultValue};

// ============================================================================
// GROUP KEY
// ============================================================================

/// ValueIds of one axis combination, one per grouping field in axis order.
/// Most cubes group by at most four fields, so keys stay on the stack.
pub type GroupKey = SmallVec<[ValueId; 4]>;

// ============================================================================
// MEASURE ACCUMULATOR
// ============================================================================

/// Running sum of a measure over the rows of one group.
///
/// Integer measures are summed exactly in `i64`; decimal measures in `f64`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeasureAccumulator {
    pub int_sum: i64,
    pub float_sum: f64,
}

impl MeasureAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: &FactValue) {
        match value {
            FactValue::Integer(i) => {
                self.int_sum = self.int_sum.saturating_add(*i);
                self.float_sum += *i as f64;
            }
            FactValue::Decimal(d) => self.float_sum += d.as_f64(),
            // Measures are numeric by schema validation.
            FactValue::Text(_) => {}
        }
    }

    /// Final value in the measure's kind. An empty accumulator yields 0.
    pub fn finish(&self, kind: ColumnKind, round_decimals: Option<u32>) -> ResultValue {
        match kind {
            ColumnKind::Integer => ResultValue::Integer(self.int_sum),
            _ => {
                let sum = match round_decimals {
                    Some(places) => round_to(self.float_sum, places),
                    None => self.float_sum,
                };
                ResultValue::Number(sum)
            }
        }
    }
}

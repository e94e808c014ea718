//! FILENAME: core/fact-table/src/value.rs
//! PURPOSE: Typed values stored in the fact table.
//! CONTEXT: Every column of the fact table holds one of three value kinds.
//! Values are interned per column, so they must be hashable and totally
//! ordered (numbers ascending, text lexical).

use std::cmp::Ordering;
use std::fmt;
use serde::{Deserialize, Serialize};

// ============================================================================
// ORDERED FLOAT
// ============================================================================

/// Wrapper around f64 that implements Eq, Ord and Hash for use as map keys.
/// NaN values are treated as equal to each other and sort last.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl PartialOrd for OrderedFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0.is_nan(), other.0.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal),
        }
    }
}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            // All NaN values hash to the same thing
            u64::MAX.hash(state);
        } else if self.0 == 0.0 {
            // -0.0 == 0.0, so they must hash alike
            0u64.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

impl OrderedFloat {
    pub fn as_f64(&self) -> f64 {
        self.0
    }
}

// ============================================================================
// COLUMN KINDS
// ============================================================================

/// The storage type of a fact table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Integer,
    Decimal,
    Text,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Decimal)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Decimal => "decimal",
            ColumnKind::Text => "text",
        };
        f.write_str(name)
    }
}

// ============================================================================
// FACT VALUE
// ============================================================================

/// A single value held by a fact record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactValue {
    Integer(i64),
    Decimal(OrderedFloat),
    Text(String),
}

impl FactValue {
    pub fn decimal(value: f64) -> Self {
        FactValue::Decimal(OrderedFloat(value))
    }

    pub fn text(value: impl Into<String>) -> Self {
        FactValue::Text(value.into())
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            FactValue::Integer(_) => ColumnKind::Integer,
            FactValue::Decimal(_) => ColumnKind::Decimal,
            FactValue::Text(_) => ColumnKind::Text,
        }
    }

    /// Numeric view of the value, `None` for text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FactValue::Integer(i) => Some(*i as f64),
            FactValue::Decimal(d) => Some(d.0),
            FactValue::Text(_) => None,
        }
    }

    /// Widens an integer into a decimal when stored in a decimal column.
    pub(crate) fn coerce_to(self, kind: ColumnKind) -> Option<FactValue> {
        match (self, kind) {
            (v @ FactValue::Integer(_), ColumnKind::Integer) => Some(v),
            (v @ FactValue::Decimal(_), ColumnKind::Decimal) => Some(v),
            (v @ FactValue::Text(_), ColumnKind::Text) => Some(v),
            (FactValue::Integer(i), ColumnKind::Decimal) => Some(FactValue::decimal(i as f64)),
            _ => None,
        }
    }
}

impl PartialOrd for FactValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Natural ordering: numbers ascending (integers and decimals compare
/// numerically), then text lexically.
impl Ord for FactValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FactValue::Integer(a), FactValue::Integer(b)) => a.cmp(b),
            (FactValue::Text(a), FactValue::Text(b)) => a.cmp(b),
            (FactValue::Text(_), _) => Ordering::Greater,
            (_, FactValue::Text(_)) => Ordering::Less,
            (a, b) => {
                let fa = OrderedFloat(a.as_f64().unwrap_or(f64::NAN));
                let fb = OrderedFloat(b.as_f64().unwrap_or(f64::NAN));
                fa.cmp(&fb).then_with(|| kind_rank(a).cmp(&kind_rank(b)))
            }
        }
    }
}

fn kind_rank(value: &FactValue) -> u8 {
    match value {
        FactValue::Integer(_) => 0,
        FactValue::Decimal(_) => 1,
        FactValue::Text(_) => 2,
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Integer(i) => write!(f, "{}", i),
            FactValue::Decimal(d) => write!(f, "{}", d.0),
            FactValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FactValue {
    fn from(value: i64) -> Self {
        FactValue::Integer(value)
    }
}

impl From<f64> for FactValue {
    fn from(value: f64) -> Self {
        FactValue::decimal(value)
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        FactValue::Text(value.to_string())
    }
}

impl From<String> for FactValue {
    fn from(value: String) -> Self {
        FactValue::Text(value)
    }
}

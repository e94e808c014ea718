//! FILENAME: core/cube-engine/src/view.rs
//! Cube View - Tabular output handed back to the caller.
//!
//! Every operation returns a `PivotResult`: an ordered list of column labels
//! and an ordered list of records. It serializes as
//! `{ "columns": [...], "data": [ {column: value, ...}, ... ] }` with each
//! record keeping the column order.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use fact_table::FactValue;

// ============================================================================
// RESULT VALUES
// ============================================================================

/// A single output value: a number or a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl ResultValue {
    pub fn text(s: impl Into<String>) -> Self {
        ResultValue::Text(s.into())
    }

    /// Numeric view, `None` for text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ResultValue::Integer(i) => Some(*i as f64),
            ResultValue::Number(n) => Some(*n),
            ResultValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ResultValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&FactValue> for ResultValue {
    fn from(value: &FactValue) -> Self {
        match value {
            FactValue::Integer(i) => ResultValue::Integer(*i),
            FactValue::Decimal(d) => ResultValue::Number(d.as_f64()),
            FactValue::Text(s) => ResultValue::Text(s.clone()),
        }
    }
}

impl From<i64> for ResultValue {
    fn from(value: i64) -> Self {
        ResultValue::Integer(value)
    }
}

impl From<f64> for ResultValue {
    fn from(value: f64) -> Self {
        ResultValue::Number(value)
    }
}

impl From<&str> for ResultValue {
    fn from(value: &str) -> Self {
        ResultValue::Text(value.to_string())
    }
}

/// Rounds to `decimals` places. Exact halves of the scaled value go to the
/// even neighbour, so `0.125` becomes `0.12` and `0.375` becomes `0.38`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round_ties_even() / factor
}

// ============================================================================
// RECORD
// ============================================================================

/// One output row: (column label, value) pairs in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PivotRecord {
    fields: Vec<(String, ResultValue)>,
}

impl PivotRecord {
    pub fn with_capacity(capacity: usize) -> Self {
        PivotRecord {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<ResultValue>) {
        self.fields.push((column.into(), value.into()));
    }

    pub fn get(&self, column: &str) -> Option<&ResultValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResultValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for PivotRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ============================================================================
// RESULT TABLE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PivotResult {
    pub columns: Vec<String>,
    pub data: Vec<PivotRecord>,
}

impl PivotResult {
    pub fn new(columns: Vec<String>) -> Self {
        PivotResult {
            columns,
            data: Vec::new(),
        }
    }

    pub fn push(&mut self, record: PivotRecord) {
        self.data.push(record);
    }

    /// True when no rows matched. Columns stay populated.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&ResultValue> {
        self.data.get(row)?.get(column)
    }

    /// Values of one column down all rows, skipping rows without it.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a ResultValue> + 'a {
        self.data.iter().filter_map(move |record| record.get(column))
    }
}

/// Dimensions and measures a caller may query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeOptions {
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_in_column_order() {
        let mut record = PivotRecord::default();
        record.push("year", 2023i64);
        record.push("Sur", 50.0);
        record.push("Norte", 100.0);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"year":2023,"Sur":50.0,"Norte":100.0}"#);
    }

    #[test]
    fn test_result_shape() {
        let mut result = PivotResult::new(vec!["region".to_string(), "sales".to_string()]);
        let mut record = PivotRecord::with_capacity(2);
        record.push("region", "Norte");
        record.push("sales", 10.5);
        result.push(record);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["columns"][0], "region");
        assert_eq!(json["data"][0]["sales"], 10.5);
        assert_eq!(result.get(0, "region"), Some(&ResultValue::text("Norte")));
    }

    #[test]
    fn test_empty_result_keeps_columns() {
        let result = PivotResult::new(vec!["year".to_string()]);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"columns":["year"],"data":[]}"#);
        assert!(result.is_empty());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(10.005_1, 2), 10.01);
        assert_eq!(round_to(2.344, 2), 2.34);
        assert_eq!(round_to(-1.255_1, 2), -1.26);
    }

    #[test]
    fn test_round_to_ties_go_to_even() {
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(-0.125, 2), -0.12);
        assert_eq!(round_to(2.5, 0), 2.0);
    }
}

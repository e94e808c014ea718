//! FILENAME: core/cube-engine/src/definition.rs
//! Cube Query Definition - The parameters of one request.
//!
//! This module contains all the types needed to DESCRIBE a cube query.
//! These structures are designed to be:
//! - Built fresh per request by the caller (already-parsed parameters)
//! - Independent of the fact table until the engine resolves them
//! - Explicit about loosely typed input (`NumericOrText`)

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use fact_table::FactValue;

/// Label used for the grand-total row and column.
pub const TOTAL_LABEL: &str = "Total";

/// Label column used when a pivot has no row dimensions.
pub const SYNTHETIC_ROW_LABEL: &str = "measure";

/// Columns shown for unaggregated detail rows, in display order.
/// Columns absent from the fact table are skipped.
pub const DETAIL_COLUMNS: [&str; 8] = [
    "year", "quarter", "month", "region", "channel", "product", "quantity", "sales",
];

// ============================================================================
// LOOSELY TYPED INPUT VALUES
// ============================================================================

/// A filter or cell value supplied by the caller.
///
/// Text input is parsed as an integer when possible and otherwise kept as
/// text. Comparison against the fact table never fails: a mismatch in kind
/// simply does not match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericOrText {
    Integer(i64),
    Text(String),
}

impl NumericOrText {
    /// Integer if the trimmed input parses as one, the original text otherwise.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(value) => NumericOrText::Integer(value),
            Err(_) => NumericOrText::Text(raw.to_string()),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        NumericOrText::Text(value.into())
    }

    pub fn is_text(&self) -> bool {
        matches!(self, NumericOrText::Text(_))
    }

    /// Whether a stored value equals this input.
    ///
    /// An integer compared with a text column is matched against its decimal
    /// rendering. Text never matches a numeric column.
    pub fn matches(&self, value: &FactValue) -> bool {
        match (self, value) {
            (NumericOrText::Integer(n), FactValue::Integer(v)) => n == v,
            (NumericOrText::Integer(n), FactValue::Decimal(v)) => (*n as f64) == v.as_f64(),
            (NumericOrText::Integer(n), FactValue::Text(s)) => s == &n.to_string(),
            (NumericOrText::Text(t), FactValue::Text(s)) => t == s,
            (NumericOrText::Text(_), _) => false,
        }
    }
}

impl fmt::Display for NumericOrText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericOrText::Integer(i) => write!(f, "{}", i),
            NumericOrText::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for NumericOrText {
    fn from(value: i64) -> Self {
        NumericOrText::Integer(value)
    }
}

impl From<&str> for NumericOrText {
    fn from(value: &str) -> Self {
        NumericOrText::Text(value.to_string())
    }
}

impl From<String> for NumericOrText {
    fn from(value: String) -> Self {
        NumericOrText::Text(value)
    }
}

// ============================================================================
// FILTER DEFINITIONS
// ============================================================================

/// Accepted values for one dimension. A scalar becomes a one-element list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterValues(pub Vec<NumericOrText>);

impl From<NumericOrText> for FilterValues {
    fn from(value: NumericOrText) -> Self {
        FilterValues(vec![value])
    }
}

impl From<i64> for FilterValues {
    fn from(value: i64) -> Self {
        FilterValues(vec![value.into()])
    }
}

impl From<&str> for FilterValues {
    fn from(value: &str) -> Self {
        FilterValues(vec![value.into()])
    }
}

impl From<String> for FilterValues {
    fn from(value: String) -> Self {
        FilterValues(vec![value.into()])
    }
}

impl From<Vec<NumericOrText>> for FilterValues {
    fn from(values: Vec<NumericOrText>) -> Self {
        FilterValues(values)
    }
}

impl<T: Into<NumericOrText>> FromIterator<T> for FilterValues {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        FilterValues(iter.into_iter().map(Into::into).collect())
    }
}

/// Set-membership restrictions for a dice query.
///
/// A dimension without an entry is unrestricted. Within one dimension the
/// accepted values are OR-ed; across dimensions the restrictions are AND-ed.
/// Entries are keyed by dimension name, so insertion order never matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    restrictions: BTreeMap<String, Vec<NumericOrText>>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts `dimension` to `values`, replacing any earlier restriction.
    pub fn with(mut self, dimension: impl Into<String>, values: impl Into<FilterValues>) -> Self {
        self.restrict(dimension, values);
        self
    }

    pub fn restrict(&mut self, dimension: impl Into<String>, values: impl Into<FilterValues>) {
        self.restrictions.insert(dimension.into(), values.into().0);
    }

    pub fn is_empty(&self) -> bool {
        self.restrictions.is_empty()
    }

    pub fn get(&self, dimension: &str) -> Option<&[NumericOrText]> {
        self.restrictions.get(dimension).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[NumericOrText])> {
        self.restrictions
            .iter()
            .map(|(dim, values)| (dim.as_str(), values.as_slice()))
    }
}

// ============================================================================
// CELL KEY
// ============================================================================

/// One (dimension, value) constraint of a cell coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellConstraint {
    pub dimension: String,
    pub value: NumericOrText,
}

/// Coordinate of a single 2D pivot cell, used for drill-down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellKey {
    pub x: CellConstraint,
    pub y: CellConstraint,
}

impl CellKey {
    pub fn new(
        dim_x: impl Into<String>,
        value_x: impl Into<NumericOrText>,
        dim_y: impl Into<String>,
        value_y: impl Into<NumericOrText>,
    ) -> Self {
        CellKey {
            x: CellConstraint {
                dimension: dim_x.into(),
                value: value_x.into(),
            },
            y: CellConstraint {
                dimension: dim_y.into(),
                value: value_y.into(),
            },
        }
    }

    /// Builds a key from raw text values, parsing each opportunistically.
    pub fn parse(dim_x: &str, value_x: &str, dim_y: &str, value_y: &str) -> Self {
        CellKey::new(
            dim_x,
            NumericOrText::parse(value_x),
            dim_y,
            NumericOrText::parse(value_y),
        )
    }
}

// ============================================================================
// DICE MODE
// ============================================================================

/// The pair of dimensions a dice summary groups by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryGrouping {
    pub first: String,
    pub second: String,
}

impl Default for SummaryGrouping {
    fn default() -> Self {
        SummaryGrouping {
            first: "year".to_string(),
            second: "region".to_string(),
        }
    }
}

/// Output shape of a dice query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiceMode {
    /// Selected rows, unaggregated.
    Detail,
    /// Selected rows summed by a pair of dimensions.
    Summary(SummaryGrouping),
}

impl DiceMode {
    pub fn summary() -> Self {
        DiceMode::Summary(SummaryGrouping::default())
    }

    pub fn summary_by(first: impl Into<String>, second: impl Into<String>) -> Self {
        DiceMode::Summary(SummaryGrouping {
            first: first.into(),
            second: second.into(),
        })
    }
}

impl Default for DiceMode {
    fn default() -> Self {
        DiceMode::Detail
    }
}

impl FromStr for DiceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detail" => Ok(DiceMode::Detail),
            "summary" => Ok(DiceMode::summary()),
            other => Err(format!("unknown dice mode '{}', expected detail or summary", other)),
        }
    }
}

// ============================================================================
// PIVOT OPTIONS
// ============================================================================

/// Aggregation options that distinguish `face` from `cube`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotOptions {
    /// Append a grand-total row and column.
    pub margins: bool,
    /// Round decimal cell values to this many places.
    pub round_decimals: Option<u32>,
}

impl PivotOptions {
    pub fn face() -> Self {
        PivotOptions {
            margins: false,
            round_decimals: None,
        }
    }

    pub fn cube() -> Self {
        PivotOptions {
            margins: true,
            round_decimals: Some(2),
        }
    }
}

impl Default for PivotOptions {
    fn default() -> Self {
        PivotOptions::face()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefers_integer() {
        assert_eq!(NumericOrText::parse("2024"), NumericOrText::Integer(2024));
        assert_eq!(NumericOrText::parse(" 7 "), NumericOrText::Integer(7));
        assert_eq!(NumericOrText::parse("Norte"), NumericOrText::text("Norte"));
        assert_eq!(NumericOrText::parse("2024.0"), NumericOrText::text("2024.0"));
    }

    #[test]
    fn test_matches_across_kinds() {
        let year = NumericOrText::Integer(2023);
        assert!(year.matches(&FactValue::Integer(2023)));
        assert!(!year.matches(&FactValue::Integer(2024)));
        assert!(year.matches(&FactValue::decimal(2023.0)));
        assert!(year.matches(&FactValue::text("2023")));

        let region = NumericOrText::text("Sur");
        assert!(region.matches(&FactValue::text("Sur")));
        assert!(!region.matches(&FactValue::text("sur")));

        // Unparseable text against a numeric column: graceful false-empty.
        assert!(!NumericOrText::text("2023x").matches(&FactValue::Integer(2023)));
    }

    #[test]
    fn test_scalar_filter_normalizes_to_list() {
        let spec = FilterSpec::new().with("region", "Norte");
        assert_eq!(spec.get("region"), Some(&[NumericOrText::text("Norte")][..]));

        let spec = FilterSpec::new().with("year", [2023i64, 2024].into_iter().collect::<FilterValues>());
        assert_eq!(spec.get("year").map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_filter_spec_is_order_independent() {
        let a = FilterSpec::new().with("region", "Norte").with("year", 2024i64);
        let b = FilterSpec::new().with("year", 2024i64).with("region", "Norte");
        assert_eq!(a, b);
    }

    #[test]
    fn test_dice_mode_from_str() {
        assert_eq!("detail".parse::<DiceMode>(), Ok(DiceMode::Detail));
        assert_eq!("Summary".parse::<DiceMode>(), Ok(DiceMode::summary()));
        assert!("rollup".parse::<DiceMode>().is_err());
    }
}

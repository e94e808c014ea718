//! FILENAME: core/cube-engine/src/labels.rs
//! Column labels for multi-level column keys.
//!
//! A cube with several column dimensions produces one output column per
//! distinct combination of their values. `CompositeKey` holds such a
//! combination and flattens it into a single display string:
//!
//! - the first part is rendered as-is (`2023`, `Norte`)
//! - a later part that is a non-negative whole number is joined as a period:
//!   `2023` + `1` -> `2023-T1`
//! - a later empty part adds nothing: `2023` + `""` -> `2023`
//! - any other later part is joined with a dash: `2023` + `Norte` -> `2023-Norte`

use std::fmt;
use fact_table::FactValue;

/// Ordered values of one column (or row) combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeKey {
    parts: Vec<FactValue>,
}

impl CompositeKey {
    pub fn new(parts: Vec<FactValue>) -> Self {
        CompositeKey { parts }
    }

    /// Flattened display label. Total: every key has exactly one label,
    /// and the empty key flattens to the empty string.
    pub fn label(&self) -> String {
        let mut parts = self.parts.iter();
        let mut label = match parts.next() {
            Some(first) => first.to_string(),
            None => return String::new(),
        };
        for part in parts {
            append_part(&mut label, part);
        }
        label
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl From<Vec<FactValue>> for CompositeKey {
    fn from(parts: Vec<FactValue>) -> Self {
        CompositeKey::new(parts)
    }
}

fn append_part(label: &mut String, part: &FactValue) {
    match part {
        FactValue::Integer(n) if *n >= 0 => {
            label.push_str("-T");
            label.push_str(&n.to_string());
        }
        FactValue::Text(s) if s.is_empty() => {}
        FactValue::Text(s) if s.chars().all(|c| c.is_ascii_digit()) => {
            label.push_str("-T");
            label.push_str(s);
        }
        other => {
            label.push('-');
            label.push_str(&other.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(parts: Vec<FactValue>) -> CompositeKey {
        CompositeKey::new(parts)
    }

    #[test]
    fn test_year_quarter_label() {
        let k = key(vec![FactValue::Integer(2023), FactValue::Integer(1)]);
        assert_eq!(k.label(), "2023-T1");
    }

    #[test]
    fn test_single_part_label() {
        assert_eq!(key(vec![FactValue::Integer(2024)]).label(), "2024");
        assert_eq!(key(vec![FactValue::text("Norte")]).label(), "Norte");
    }

    #[test]
    fn test_empty_second_part_is_dropped() {
        let k = key(vec![FactValue::Integer(2023), FactValue::text("")]);
        assert_eq!(k.label(), "2023");
    }

    #[test]
    fn test_digit_text_counts_as_period() {
        let k = key(vec![FactValue::Integer(2023), FactValue::text("4")]);
        assert_eq!(k.label(), "2023-T4");
    }

    #[test]
    fn test_text_parts_join_with_dash() {
        let k = key(vec![
            FactValue::Integer(2023),
            FactValue::text("Norte"),
            FactValue::Integer(2),
        ]);
        assert_eq!(k.label(), "2023-Norte-T2");
    }

    #[test]
    fn test_empty_key() {
        assert_eq!(key(Vec::new()).label(), "");
    }
}

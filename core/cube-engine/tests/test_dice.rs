//! FILENAME: tests/test_dice.rs
//! Integration tests for multi-dimension filtering.

mod common;

use common::{assert_close, cell_sum, column_sum, generated_table, number, ScenarioFixture};
use cube_engine::{cube, dice, CubeError, DiceMode, FilterSpec, FilterValues, NumericOrText, ResultValue};

#[test]
fn test_dice_detail_scenario() {
    let table = ScenarioFixture::table();
    let filters = FilterSpec::new().with("region", vec!["Norte"].into_iter().collect::<FilterValues>());
    let result = dice(&table, &filters, "sales", &DiceMode::Detail).unwrap();

    assert_eq!(result.columns, vec!["year", "region", "sales"]);
    assert_eq!(result.row_count(), 2);
    let sales: Vec<f64> = result.column_values("sales").filter_map(ResultValue::as_f64).collect();
    assert_eq!(sales, vec![100.0, 75.0]);
}

#[test]
fn test_scalar_filter_equals_single_element_list() {
    let table = ScenarioFixture::table();
    let scalar = FilterSpec::new().with("region", "Norte");
    let list = FilterSpec::new().with("region", ["Norte"].into_iter().collect::<FilterValues>());
    assert_eq!(
        dice(&table, &scalar, "sales", &DiceMode::Detail).unwrap(),
        dice(&table, &list, "sales", &DiceMode::Detail).unwrap()
    );
}

#[test]
fn test_no_filters_detail_returns_every_row() {
    let table = generated_table();
    let result = dice(&table, &FilterSpec::new(), "sales", &DiceMode::Detail).unwrap();
    assert_eq!(result.row_count(), table.row_count());
    assert_eq!(
        result.columns,
        vec!["year", "quarter", "month", "region", "channel", "product", "quantity", "sales"]
    );
}

#[test]
fn test_no_filters_summary_matches_unfiltered_total() {
    let table = generated_table();
    let summary = dice(&table, &FilterSpec::new(), "sales", &DiceMode::summary()).unwrap();
    assert_eq!(summary.columns, vec!["year", "region", "sales"]);
    assert_eq!(summary.row_count(), 2 * 5);

    let full = cube(&table, &["year"], &["region"], "sales").unwrap();
    let grand_total = number(full.data.last().and_then(|r| r.get("Total")));
    assert!((cell_sum(&summary, 2) - grand_total).abs() <= 0.005 + 1e-6);
    assert_close(cell_sum(&summary, 2), column_sum(&table, "sales"));
}

#[test]
fn test_filter_order_does_not_matter() {
    let table = generated_table();
    let a = FilterSpec::new().with("region", "Norte").with("year", 2024i64);
    let b = FilterSpec::new().with("year", 2024i64).with("region", "Norte");

    let left = dice(&table, &a, "sales", &DiceMode::Detail).unwrap();
    let right = dice(&table, &b, "sales", &DiceMode::Detail).unwrap();
    assert_eq!(serde_json::to_string(&left).unwrap(), serde_json::to_string(&right).unwrap());
    assert_eq!(left.row_count(), 12 * 3 * 5);
}

#[test]
fn test_or_within_and_across_dimensions() {
    let table = generated_table();
    let filters = FilterSpec::new()
        .with("region", ["Norte", "Sur"].into_iter().collect::<FilterValues>())
        .with("product", "Laptop")
        .with("channel", ["Online", "Tienda"].into_iter().collect::<FilterValues>());
    let result = dice(&table, &filters, "sales", &DiceMode::Detail).unwrap();

    // 2 years x 12 months x 2 regions x 2 channels x 1 product.
    assert_eq!(result.row_count(), 2 * 12 * 2 * 2);
    for record in &result.data {
        let region = record.get("region").and_then(ResultValue::as_str).unwrap();
        assert!(region == "Norte" || region == "Sur");
        assert_eq!(record.get("product"), Some(&ResultValue::text("Laptop")));
    }
}

#[test]
fn test_detail_types() {
    let table = generated_table();
    let filters = FilterSpec::new().with("month", 3i64);
    let result = dice(&table, &filters, "quantity", &DiceMode::Detail).unwrap();
    for record in &result.data {
        assert!(matches!(record.get("quantity"), Some(ResultValue::Integer(_))));
        assert!(matches!(record.get("quarter"), Some(ResultValue::Integer(1))));
        let sales = number(record.get("sales"));
        assert_close((sales * 100.0).round() / 100.0, sales);
    }
}

#[test]
fn test_parsed_year_filter() {
    let table = generated_table();
    let years: FilterValues = ["2023", "abc"].iter().map(|s| NumericOrText::parse(s)).collect();
    let filters = FilterSpec::new().with("year", years);
    let result = dice(&table, &filters, "sales", &DiceMode::Detail).unwrap();
    assert_eq!(result.row_count(), table.row_count() / 2);
}

#[test]
fn test_summary_custom_grouping() {
    let table = generated_table();
    let filters = FilterSpec::new().with("year", 2023i64);
    let mode = DiceMode::summary_by("product", "channel");
    let result = dice(&table, &filters, "quantity", &mode).unwrap();
    assert_eq!(result.columns, vec!["product", "channel", "quantity"]);
    assert_eq!(result.row_count(), 5 * 3);
    assert_eq!(result.get(0, "product"), Some(&ResultValue::text("Auriculares")));
    assert_eq!(result.get(0, "channel"), Some(&ResultValue::text("Distribuidor")));
}

#[test]
fn test_no_match_is_well_formed_empty() {
    let table = ScenarioFixture::table();
    let filters = FilterSpec::new().with("region", "Oeste");

    let detail = dice(&table, &filters, "sales", &DiceMode::Detail).unwrap();
    assert!(detail.is_empty());
    assert_eq!(detail.columns, vec!["year", "region", "sales"]);

    let summary = dice(&table, &filters, "sales", &DiceMode::summary()).unwrap();
    assert!(summary.is_empty());
    assert_eq!(summary.columns, vec!["year", "region", "sales"]);
}

#[test]
fn test_dice_measure_must_be_a_measure() {
    let table = ScenarioFixture::table();
    assert_eq!(
        dice(&table, &FilterSpec::new(), "region", &DiceMode::Detail).unwrap_err(),
        CubeError::NotAMeasure("region".to_string())
    );
}

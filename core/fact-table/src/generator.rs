//! FILENAME: core/fact-table/src/generator.rs
//! PURPOSE: Seeded synthetic sales dataset.
//! CONTEXT: The server builds its fact table once at startup from this
//! generator. One row is produced per (year, month, region, channel, product)
//! combination, so every dimension value is populated and no field is null.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use crate::error::Result;
use crate::table::{FactTable, FactTableBuilder};
use crate::value::FactValue;

pub const REGIONS: [&str; 5] = ["Centro", "Este", "Norte", "Oeste", "Sur"];
pub const CHANNELS: [&str; 3] = ["Distribuidor", "Online", "Tienda"];

/// Products with their base unit price.
pub const PRODUCTS: [(&str, f64); 5] = [
    ("Auriculares", 49.90),
    ("Laptop", 899.00),
    ("Monitor", 219.50),
    ("Tablet", 329.00),
    ("Teclado", 35.75),
];

/// Parameters of the synthetic dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub seed: u64,
    pub start_year: i64,
    pub years: u32,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig {
            seed: 42,
            start_year: 2022,
            years: 3,
        }
    }
}

/// Quarter (1-4) a month (1-12) falls in.
pub fn quarter_of(month: i64) -> i64 {
    (month - 1) / 3 + 1
}

/// Generates the sales fact table. Same config, same table.
pub fn generate_dataset(config: &DatasetConfig) -> Result<FactTable> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut builder = FactTableBuilder::new(FactTable::standard_schema());
    builder.reserve(
        config.years as usize * 12 * REGIONS.len() * CHANNELS.len() * PRODUCTS.len(),
    );

    for year in config.start_year..config.start_year + i64::from(config.years) {
        for month in 1..=12i64 {
            for region in REGIONS {
                for channel in CHANNELS {
                    for (product, unit_price) in PRODUCTS {
                        let quantity: i64 = rng.gen_range(1..=50);
                        let noise: f64 = rng.gen_range(0.85..1.15);
                        let sales = round2(quantity as f64 * unit_price * noise);

                        let row = [
                            FactValue::Integer(year),
                            FactValue::Integer(quarter_of(month)),
                            FactValue::Integer(month),
                            FactValue::text(region),
                            FactValue::text(channel),
                            FactValue::text(product),
                            FactValue::Integer(quantity),
                            FactValue::decimal(sales),
                        ];
                        builder.push_row(&row)?;
                    }
                }
            }
        }
    }

    let table = builder.build();
    log::info!(
        target: "FACTS",
        "generated dataset seed={} years={}..{} rows={}",
        config.seed,
        config.start_year,
        config.start_year + i64::from(config.years) - 1,
        table.row_count()
    );
    Ok(table)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

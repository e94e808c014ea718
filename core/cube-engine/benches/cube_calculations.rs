use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cube_engine::{cell, cube, dice, face, CellKey, DiceMode, FilterSpec, FilterValues};
use fact_table::{generate_dataset, DatasetConfig, FactTable};

fn bench_table(years: u32) -> FactTable {
    generate_dataset(&DatasetConfig {
        years,
        ..DatasetConfig::default()
    })
    .unwrap()
}

fn bench_face(c: &mut Criterion) {
    let mut group = c.benchmark_group("face");
    for years in [3u32, 30] {
        let table = bench_table(years);
        group.bench_with_input(BenchmarkId::new("year_region_sales", table.row_count()), &table, |b, table| {
            b.iter(|| black_box(face(table, "year", "region", "sales").ok()));
        });
    }
    group.finish();
}

fn bench_cube(c: &mut Criterion) {
    let mut group = c.benchmark_group("cube");
    for years in [3u32, 30] {
        let table = bench_table(years);
        group.bench_with_input(
            BenchmarkId::new("product_region_by_year_quarter", table.row_count()),
            &table,
            |b, table| {
                b.iter(|| {
                    black_box(cube(table, &["product", "region"], &["year", "quarter"], "sales").ok())
                });
            },
        );
    }
    group.finish();
}

fn bench_dice(c: &mut Criterion) {
    let table = bench_table(30);
    let filters = FilterSpec::new()
        .with("region", ["Norte", "Sur"].into_iter().collect::<FilterValues>())
        .with("year", [2023i64, 2024, 2030].into_iter().collect::<FilterValues>())
        .with("channel", "Online");

    let mut group = c.benchmark_group("dice");
    group.bench_function("detail", |b| {
        b.iter(|| black_box(dice(&table, &filters, "sales", &DiceMode::Detail).ok()));
    });
    group.bench_function("summary", |b| {
        b.iter(|| black_box(dice(&table, &filters, "sales", &DiceMode::summary()).ok()));
    });
    group.bench_function("cell", |b| {
        let key = CellKey::parse("year", "2024", "region", "Norte");
        b.iter(|| black_box(cell(&table, &key).ok()));
    });
    group.finish();
}

criterion_group!(benches, bench_face, bench_cube, bench_dice);
criterion_main!(benches);

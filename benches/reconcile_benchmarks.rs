//! Performance benchmarks for the attendance reconciliation engine.
//!
//! This benchmark suite tracks:
//! - Single employee-day reconciliation
//! - Sequential and parallel batch reconciliation of a monthly import
//! - A batch submitted through the HTTP API
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use attendance_engine::api::{create_router, AppState};
use attendance_engine::calculation::reconcile_day;
use attendance_engine::config::{ConfigLoader, EngineConfig};
use attendance_engine::import::{reconcile_batch, reconcile_batch_parallel, CancellationFlag};
use attendance_engine::models::AttendanceRow;

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn load_config() -> EngineConfig {
    ConfigLoader::load("./config/attendance")
        .expect("Failed to load config")
        .into_config()
}

/// Punch patterns seen in a typical import: regular days, overtime,
/// overnight shifts with and without an exit scan, and absences.
const PATTERNS: [(&str, &str); 6] = [
    ("08:01 15:32 15:32", "B"),
    ("08:00 08:01 12:00 13:00 19:22", "B"),
    ("07:55 17:02", "A"),
    ("20:05", "D"),
    ("15:58 00:03", "C"),
    ("", "B"),
];

/// Creates `count` rows cycling through [`PATTERNS`].
fn create_rows(count: usize) -> Vec<AttendanceRow> {
    (0..count)
        .map(|i| {
            let (time, shift) = PATTERNS[i % PATTERNS.len()];
            AttendanceRow {
                employee_id: format!("{}", 1000000 + i),
                employee_name: format!("Employee {}", i),
                department: "Production".to_string(),
                date: format!("{:02}/01/2567", i % 28 + 1),
                time: time.to_string(),
                shift: Some(shift.to_string()),
            }
        })
        .collect()
}

/// Benchmark: One employee-day.
fn bench_single_day(c: &mut Criterion) {
    let config = load_config();
    let rows = create_rows(PATTERNS.len());

    let mut group = c.benchmark_group("single_day");
    for (row, (time, shift)) in rows.iter().zip(PATTERNS) {
        let label = format!("{}_{}", shift, time.split_whitespace().count());
        group.bench_with_input(BenchmarkId::from_parameter(label), row, |b, row| {
            b.iter(|| reconcile_day(black_box(row), config.catalog(), config.policy()))
        });
    }
    group.finish();
}

/// Benchmark: Sequential batch sizes.
fn bench_batch_sequential(c: &mut Criterion) {
    let config = load_config();

    let mut group = c.benchmark_group("batch_sequential");
    for size in [100usize, 1_000, 10_000] {
        let rows = create_rows(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &rows, |b, rows| {
            b.iter(|| reconcile_batch(black_box(rows), &config, &CancellationFlag::new()))
        });
    }
    group.finish();
}

/// Benchmark: Parallel batch across worker counts.
fn bench_batch_parallel(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let config = Arc::new(load_config());
    let rows = create_rows(10_000);

    let mut group = c.benchmark_group("batch_parallel_10000");
    group.throughput(Throughput::Elements(rows.len() as u64));
    for workers in [1usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.to_async(&rt).iter(|| {
                let rows = rows.clone();
                let config = Arc::clone(&config);
                async move {
                    black_box(
                        reconcile_batch_parallel(rows, config, CancellationFlag::new(), workers)
                            .await,
                    )
                }
            })
        });
    }
    group.finish();
}

/// Benchmark: A 1000-row batch through `POST /reconcile`.
fn bench_api_batch(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let loader = ConfigLoader::load("./config/attendance").expect("Failed to load config");
    let router = create_router(AppState::new(loader));

    let rows: Vec<serde_json::Value> = create_rows(1_000)
        .into_iter()
        .map(|row| serde_json::to_value(row).unwrap())
        .collect();
    let body = serde_json::json!({ "rows": rows }).to_string();

    let mut group = c.benchmark_group("api");
    group.throughput(Throughput::Elements(1_000));
    group.bench_function("reconcile_1000", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/reconcile")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_single_day,
    bench_batch_sequential,
    bench_batch_parallel,
    bench_api_batch
);
criterion_main!(benches);

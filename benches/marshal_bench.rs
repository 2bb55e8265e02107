use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use spooky_marshal::{FieldMap, Record, SpookyType, SpookyValue, TypeConfig, fields};
use std::hint::black_box;

// ─── Test Data ──────────────────────────────────────────────────────────────

const ROWS: i64 = 10_000;
const AUTHORS: i64 = 100;

/// Posts spread evenly over `AUTHORS` authors. `author_id` is a numeric
/// string, `score` an int, so both numeric paths get exercised.
fn make_rows() -> Vec<FieldMap> {
    (1..=ROWS)
        .map(|id| {
            fields! {
                "id" => id,
                "author_id" => (id % AUTHORS).to_string(),
                "score" => id % 7,
                "body" => format!("post body {id}"),
                "deleted" => false,
            }
        })
        .collect()
}

fn make_loaded() -> SpookyType {
    let mut posts = TypeConfig::new("id")
        .with_index_fields(["author_id"])
        .build()
        .unwrap();
    posts.load(make_rows());
    posts
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 1: Loading
// ═══════════════════════════════════════════════════════════════════════════

fn bench_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("loading");
    let rows = make_rows();

    group.bench_function("load (fresh)", |b| {
        b.iter_batched(
            || rows.clone(),
            |rows| {
                let mut posts = TypeConfig::new("id")
                    .with_index_fields(["author_id"])
                    .build()
                    .unwrap();
                posts.load(rows);
                posts
            },
            BatchSize::LargeInput,
        )
    });

    group.bench_function("load (all duplicates)", |b| {
        let mut posts = make_loaded();
        b.iter_batched(|| rows.clone(), |rows| posts.load(rows), BatchSize::LargeInput)
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 2: Lookups
// ═══════════════════════════════════════════════════════════════════════════

fn bench_lookups(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookups");
    let posts = make_loaded();

    group.bench_function("get_record", |b| {
        b.iter(|| black_box(posts.get_record(black_box(5_000))))
    });

    group.bench_function("get_record_by_field (index)", |b| {
        b.iter(|| black_box(posts.get_record_by_field("author_id", black_box(42))))
    });

    group.bench_function("get_record_by_field (scan)", |b| {
        b.iter(|| black_box(posts.get_record_by_field("body", black_box("post body 9999"))))
    });

    group.bench_function("get_collection_by_field (index, 3 values)", |b| {
        b.iter(|| black_box(posts.get_collection_by_field("author_id", black_box([3, 1, 2])).len()))
    });

    group.bench_function("get_collection_by_field (scan)", |b| {
        b.iter(|| black_box(posts.get_collection_by_field("score", black_box([0])).len()))
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 3: Change tracking
// ═══════════════════════════════════════════════════════════════════════════

fn bench_change_tracking(c: &mut Criterion) {
    let mut group = c.benchmark_group("change_tracking");
    let mut posts = make_loaded();
    for id in (1..=ROWS).step_by(100) {
        if let Some(record) = posts.get_record_mut(id) {
            record.set("score".into(), SpookyValue::from("changed"));
        }
    }

    group.bench_function("changed_records (1% dirty)", |b| {
        b.iter(|| black_box(posts.changed_records().len()))
    });

    group.bench_function("changed_fields", |b| {
        b.iter(|| black_box(posts.changed_fields(black_box(101))))
    });

    group.finish();
}

// ─── Criterion Main ─────────────────────────────────────────────────────────

criterion_group!(benches, bench_loading, bench_lookups, bench_change_tracking);
criterion_main!(benches);

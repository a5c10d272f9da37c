use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use easy_query::{Connection, Record, Statement};

/// Compile a SELECT with `n` bound WHERE predicates:
/// SELECT * FROM `t` WHERE col0 = ? AND col1 = ? ...
fn build_select(conn: &Connection<()>, n: usize) -> Statement {
    let mut q = conn.table("t").order("col0 desc").limit_offset(20, 40);
    for i in 0..n {
        q = q.where_(&format!("col{i}"), "=", i as i64);
    }
    q.compile_only().select().unwrap()
}

fn bench_compile_select(c: &mut Criterion) {
    let conn = Connection::new(());
    let mut group = c.benchmark_group("statement/compile_select");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_select(&conn, n)));
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let conn = Connection::new(());
    let mut group = c.benchmark_group("statement/render");

    for n in [1, 10, 100] {
        let stmt = build_select(&conn, n);
        group.bench_with_input(BenchmarkId::new("canonical", n), &stmt, |b, stmt| {
            b.iter(|| black_box(stmt.sql()));
        });
        group.bench_with_input(BenchmarkId::new("postgres", n), &stmt, |b, stmt| {
            b.iter(|| black_box(stmt.to_postgres()));
        });
        group.bench_with_input(BenchmarkId::new("inline", n), &stmt, |b, stmt| {
            b.iter(|| black_box(stmt.to_string()));
        });
    }

    group.finish();
}

fn bench_compile_insert(c: &mut Criterion) {
    let conn = Connection::new(());
    let mut group = c.benchmark_group("statement/compile_insert");

    for n in [5, 20, 100] {
        let record: Record = (0..n).map(|i| (format!("col{i}"), i as i64)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &record, |b, record| {
            b.iter(|| black_box(conn.table("t").compile_only().insert(record).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile_select, bench_render, bench_compile_insert);
criterion_main!(benches);

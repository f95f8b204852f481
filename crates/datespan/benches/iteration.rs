use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use datespan::{parse_span, Context, Span, Year, Zone};
use std::hint::black_box;

fn ctx(name: &str) -> Context {
    Context::new(Zone::resolve(name).expect("known zone"))
}

fn bench_year_days(c: &mut Criterion) {
    let mut group = c.benchmark_group("year_days");
    for name in ["UTC", "Europe/Berlin", "America/New_York"] {
        let year = Year::new(2016, &ctx(name)).expect("valid year");
        group.bench_with_input(BenchmarkId::from_parameter(name), &year, |b, year| {
            b.iter(|| black_box(year).days().count())
        });
    }
    group.finish();
}

fn bench_year_months(c: &mut Criterion) {
    let year = Year::new(2016, &ctx("Europe/Berlin")).expect("valid year");
    c.bench_function("year_months_to_map", |b| {
        b.iter(|| black_box(&year).months().to_map().len())
    });
}

fn bench_parse_span(c: &mut Criterion) {
    let ctx = ctx("Europe/Berlin");
    let mut group = c.benchmark_group("parse_span");
    for value in ["2015", "2015-03", "2007-W14", "2015-03-10", "2015-01-01,2015-12-31"] {
        group.bench_with_input(BenchmarkId::from_parameter(value), value, |b, value| {
            b.iter(|| parse_span(black_box(value), &ctx).expect("canonical span"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_year_days, bench_year_months, bench_parse_span);
criterion_main!(benches);

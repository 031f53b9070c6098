use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use distribution::{RateSweep, compute_table};
use rust_pvtf::funcs::PoissonSweep;
use rust_pvtf_api::TableFunction;
use rust_pvtf_api::arg::Arg;
use std::hint::black_box;
use std::time::Duration;

fn bench_compute_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_table");
    group.bench_function("rate_12_window_30", |b| {
        b.iter(|| black_box(compute_table(black_box(12.0), 0, 30)))
    });
    // large windows cross into the quadrature branch of the incomplete gamma
    group.bench_function("rate_500_window_1000", |b| {
        b.iter(|| black_box(compute_table(black_box(500.0), 0, 1000)))
    });
    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(40);
    group.bench_function("animation_peak_pmf", |b| {
        b.iter_batched(
            || RateSweep::animation(0, 100).expect("valid sweep"),
            |sweep| black_box(sweep.peak_pmf()),
            BatchSize::SmallInput,
        )
    });
    group.bench_function("poisson_sweep_finalize", |b| {
        b.iter_batched(
            || {
                PoissonSweep::new(Some(vec![Arg::Int(0), Arg::Int(100)]))
                    .expect("valid sweep arguments")
            },
            |mut sweep| black_box(sweep.finalize()),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_compute_table, bench_sweep);
criterion_main!(benches);

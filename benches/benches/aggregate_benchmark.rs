//! Aggregation and end-to-end conversion benchmarks.
//!
//! Run with: `cargo bench --package pivotbar-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pivotbar_bench::{synthetic_ticks, write_tick_file};
use pivotbar_lib::{
    ConvertOptions, DayRange, OutputFormat, PivotAccumulator, Timeframe, TimestampUnit, Window,
    WindowAggregator, convert_file,
};
use std::convert::Infallible;
use std::hint::black_box;
use tempfile::TempDir;

const SIZES: [usize; 3] = [10_000, 100_000, 1_000_000];

fn aggregate_benchmark(c: &mut Criterion) {
    let day = DayRange::parse("2024-01-10").unwrap();
    let mut group = c.benchmark_group("aggregate");

    for size in SIZES {
        let ticks = synthetic_ticks(size);
        group.throughput(Throughput::Elements(size as u64));

        for (name, window) in [
            ("ticks-5", Window::default()),
            ("clock-m5", Window::clock(Timeframe::Minute5)),
        ] {
            group.bench_with_input(BenchmarkId::new(name, size), &ticks, |b, ticks| {
                b.iter(|| {
                    let stream = ticks.iter().copied().map(Ok::<_, Infallible>);
                    let mut pivots = PivotAccumulator::new();
                    for candle in WindowAggregator::new(stream, day, window, TimestampUnit::Seconds)
                    {
                        pivots.observe(&candle.unwrap());
                    }
                    black_box(pivots.finish().unwrap())
                });
            });
        }
    }

    group.finish();
}

fn convert_benchmark(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let options = ConvertOptions::new(DayRange::parse("2024-01-10").unwrap());
    let mut group = c.benchmark_group("convert");
    group.sample_size(20);

    for size in [100_000, 1_000_000] {
        let input = dir.path().join(format!("ticks-{size}.parquet"));
        write_tick_file(&input, &synthetic_ticks(size)).unwrap();
        group.throughput(Throughput::Elements(size as u64));

        for format in [OutputFormat::Csv, OutputFormat::Parquet] {
            let output = dir.path().join(format!("candles-{size}.{}", format.extension()));
            let options = options.with_format(format);
            group.bench_with_input(
                BenchmarkId::new(format.extension(), size),
                &input,
                |b, input| {
                    b.iter(|| black_box(convert_file(input, &output, &options).unwrap()));
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, aggregate_benchmark, convert_benchmark);
criterion_main!(benches);

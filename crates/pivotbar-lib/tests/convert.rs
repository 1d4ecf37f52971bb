//! End-to-end conversion tests over Parquet fixtures.

use approx::assert_relative_eq;
use arrow::array::{ArrayRef, Float32Array, Int32Array, Int64Array};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use pivotbar_lib::{
    ConvertError, ConvertOptions, DayRange, OutputFormat, SourceError, TickReader, Timeframe,
    TimestampUnit, Window, convert_file, plan_jobs,
};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// 2024-01-10T09:15:00Z
const T0: i64 = 1_704_878_100;
const NANOS: i64 = 1_000_000_000;

/// (seconds, open, high, low, close, volume)
type Row = (i64, f32, f32, f32, f32, i32);

fn write_ticks(dir: &Path, name: &str, rows: &[Row]) -> PathBuf {
    let path = dir.join(name);
    let column = |f: fn(&Row) -> f32| -> ArrayRef {
        Arc::new(Float32Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let batch = RecordBatch::try_from_iter(vec![
        (
            "date",
            Arc::new(Int64Array::from(
                rows.iter().map(|r| r.0 * NANOS).collect::<Vec<_>>(),
            )) as ArrayRef,
        ),
        ("open", column(|r| r.1)),
        ("high", column(|r| r.2)),
        ("low", column(|r| r.3)),
        ("close", column(|r| r.4)),
        (
            "volume",
            Arc::new(Int32Array::from(rows.iter().map(|r| r.5).collect::<Vec<_>>())),
        ),
    ])
    .unwrap();

    let file = File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    path
}

/// One tick per minute starting at `start`, with rising prices.
fn minute_ticks(start: i64, count: i64) -> Vec<Row> {
    (0..count)
        .map(|i| {
            let price = 100.0 + i as f32;
            (start + i * 60, price, price + 0.5, price - 0.5, price, 10)
        })
        .collect()
}

fn options() -> ConvertOptions {
    ConvertOptions::new(DayRange::parse("2024-01-10").unwrap())
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn five_ticks_make_one_candle() {
    let dir = TempDir::new().unwrap();
    let highs = [1.0, 5.0, 3.0, 2.0, 4.0];
    let closes = [1.0, 2.0, 3.0, 4.0, 9.0];
    let rows: Vec<Row> = (0..5)
        .map(|i| (T0 + i as i64 * 60, 1.0, highs[i], 1.0, closes[i], 10))
        .collect();
    let input = write_ticks(dir.path(), "BANKNIFTY.parquet", &rows);
    let output = dir.path().join("out/BANKNIFTY.parquet");

    let report = convert_file(&input, &output, &options()).unwrap();

    assert_eq!(read(&output), "1704878100,1,5,1,9,50\n");
    assert_eq!(report.stats.candles, 1);
    assert_eq!(report.stats.ticks_in_range, 5);

    let pivots = report.pivots.unwrap();
    assert_relative_eq!(pivots.pivot, 5.0);
    assert_relative_eq!(pivots.r1, 5.0 + 0.382 * 4.0, epsilon = 1e-9);
    assert_relative_eq!(pivots.s3, 1.0, epsilon = 1e-9);
}

#[test]
fn ticks_outside_the_day_are_skipped() {
    let dir = TempDir::new().unwrap();
    let day_start = 1_704_844_800;
    let mut rows = minute_ticks(day_start - 120, 2);
    rows.extend(minute_ticks(T0, 10));
    rows.extend(minute_ticks(day_start + 86_400, 3));
    let input = write_ticks(dir.path(), "mixed.parquet", &rows);
    let output = dir.path().join("mixed.csv");

    let report = convert_file(&input, &output, &options()).unwrap();

    assert_eq!(report.stats.candles, 2);
    assert_eq!(report.stats.ticks_in_range, 10);
    assert_eq!(report.stats.ticks_discarded, 5);

    let csv = read(&output);
    let first: Vec<&str> = csv.lines().next().unwrap().split(',').collect();
    assert_eq!(first[0], T0.to_string());
    assert_eq!(first[1], "100");
    assert_eq!(first[5], "50");
}

#[test]
fn trailing_ticks_form_a_short_candle() {
    let dir = TempDir::new().unwrap();
    let input = write_ticks(dir.path(), "short.parquet", &minute_ticks(T0, 7));
    let output = dir.path().join("short.csv");

    let report = convert_file(&input, &output, &options()).unwrap();

    assert_eq!(report.stats.candles, 2);
    let csv = read(&output);
    let last = csv.lines().last().unwrap();
    assert_eq!(last, format!("{},105,106.5,104.5,106,20", T0 + 300));
}

#[test]
fn empty_day_writes_empty_output_without_pivots() {
    let dir = TempDir::new().unwrap();
    let input = write_ticks(dir.path(), "other_day.parquet", &minute_ticks(T0 - 86_400, 6));
    let output = dir.path().join("other_day.csv");

    let report = convert_file(&input, &output, &options()).unwrap();

    assert!(report.is_empty());
    assert!(report.pivots.is_none());
    assert_eq!(report.stats.ticks_discarded, 6);
    assert_eq!(read(&output), "");
}

#[test]
fn conversion_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let input = write_ticks(dir.path(), "ticks.parquet", &minute_ticks(T0, 23));
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");

    convert_file(&input, &first, &options()).unwrap();
    convert_file(&input, &second, &options()).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn rerun_truncates_previous_output() {
    let dir = TempDir::new().unwrap();
    let input = write_ticks(dir.path(), "ticks.parquet", &minute_ticks(T0, 5));
    let output = dir.path().join("ticks.csv");
    fs::write(&output, "stale\nstale\nstale\n").unwrap();

    convert_file(&input, &output, &options()).unwrap();

    assert_eq!(read(&output).lines().count(), 1);
}

#[test]
fn header_is_opt_in() {
    let dir = TempDir::new().unwrap();
    let input = write_ticks(dir.path(), "ticks.parquet", &minute_ticks(T0, 5));
    let output = dir.path().join("ticks.csv");

    convert_file(&input, &output, &options().with_header(true)).unwrap();

    let csv = read(&output);
    assert_eq!(csv.lines().next(), Some("date,open,high,low,close,volume"));
    assert_eq!(csv.lines().count(), 2);
}

#[test]
fn clock_windows_split_on_bucket_boundaries() {
    let dir = TempDir::new().unwrap();
    let rows = vec![
        (T0, 1.0, 2.0, 1.0, 1.5, 10),
        (T0 + 120, 1.5, 3.0, 1.0, 2.5, 10),
        (T0 + 330, 2.5, 2.5, 2.0, 2.0, 10),
    ];
    let input = write_ticks(dir.path(), "clock.parquet", &rows);
    let output = dir.path().join("clock.csv");
    let options = options().with_window(Window::clock(Timeframe::Minute5));

    let report = convert_file(&input, &output, &options).unwrap();

    assert_eq!(report.stats.candles, 2);
    assert_eq!(
        read(&output),
        format!("{T0},1,3,1,2.5,20\n{},2.5,2.5,2,2,10\n", T0 + 300)
    );
}

#[test]
fn ndjson_rows_carry_the_date_field() {
    let dir = TempDir::new().unwrap();
    let input = write_ticks(dir.path(), "ticks.parquet", &minute_ticks(T0, 10));
    let output = dir.path().join("ticks.ndjson");

    convert_file(&input, &output, &options().with_format(OutputFormat::Ndjson)).unwrap();

    let text = read(&output);
    let rows: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["date"], T0 + 300);
    assert_eq!(rows[1]["volume"], 50);
}

#[test]
fn parquet_output_reads_back_as_ticks() {
    let dir = TempDir::new().unwrap();
    let input = write_ticks(dir.path(), "ticks.parquet", &minute_ticks(T0, 10));
    let output = dir.path().join("candles/ticks.parquet");

    convert_file(&input, &output, &options().with_format(OutputFormat::Parquet)).unwrap();

    let candles: Vec<_> = TickReader::open(&output)
        .unwrap()
        .with_unit(TimestampUnit::Seconds)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(candles.len(), 2);
    assert_eq!(candles[0].timestamp, T0);
    assert_eq!(candles[0].open, 100.0);
    assert_eq!(candles[0].high, 104.5);
    assert_eq!(candles[0].volume, 50);
}

#[test]
fn missing_input_reports_its_path() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("absent.parquet");
    let output = dir.path().join("absent.csv");

    let err = convert_file(&input, &output, &options()).unwrap_err();

    assert!(matches!(err, ConvertError::Source(SourceError::Open { .. })));
    assert_eq!(err.path(), input);
    assert!(err.to_string().contains("absent.parquet"));
    assert!(!output.exists());
}

#[test]
fn non_parquet_input_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "not parquet").unwrap();

    let err = convert_file(&input, &dir.path().join("notes.csv"), &options()).unwrap_err();

    assert!(matches!(err, ConvertError::Source(SourceError::Parquet { .. })));
    assert_eq!(err.path(), input);
}

#[test]
fn jobs_are_planned_in_name_order() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("2024-01-10");
    fs::create_dir(&source).unwrap();
    fs::create_dir(source.join("nested")).unwrap();
    write_ticks(&source, "NIFTY.parquet", &minute_ticks(T0, 1));
    write_ticks(&source, "BANKNIFTY.parquet", &minute_ticks(T0, 1));
    let out = dir.path().join("out");

    let jobs = plan_jobs(&source, &out, OutputFormat::Csv, true).unwrap();

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].input, source.join("BANKNIFTY.parquet"));
    assert_eq!(jobs[0].output, out.join("BANKNIFTY.csv"));
    assert_eq!(jobs[1].output, out.join("NIFTY.csv"));
}

#[test]
fn missing_source_dir_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let err = plan_jobs(&missing, dir.path(), OutputFormat::Csv, false).unwrap_err();

    assert!(matches!(err, ConvertError::ReadDir { .. }));
    assert_eq!(err.path(), missing);
}

#[test]
fn output_dir_equal_to_source_dir_is_refused() {
    let dir = TempDir::new().unwrap();
    let input = write_ticks(dir.path(), "BANKNIFTY.parquet", &minute_ticks(T0, 7));
    let size = fs::metadata(&input).unwrap().len();

    let jobs = plan_jobs(dir.path(), dir.path(), OutputFormat::Csv, false).unwrap();
    assert_eq!(jobs[0].output, jobs[0].input);
    let err = convert_file(&jobs[0].input, &jobs[0].output, &options()).unwrap_err();

    assert!(matches!(err, ConvertError::SameFile { .. }));
    assert_eq!(err.path(), input);
    assert_eq!(fs::metadata(&input).unwrap().len(), size);
    assert_eq!(TickReader::open(&input).unwrap().count(), 7);
}

#[test]
fn aliased_output_path_is_refused() {
    let dir = TempDir::new().unwrap();
    let input = write_ticks(dir.path(), "BANKNIFTY.parquet", &minute_ticks(T0, 3));
    fs::create_dir(dir.path().join("sub")).unwrap();
    let alias = dir.path().join("sub/../BANKNIFTY.parquet");
    assert_ne!(alias, input);

    let err = convert_file(&input, &alias, &options()).unwrap_err();

    assert!(matches!(err, ConvertError::SameFile { .. }));
    assert_eq!(TickReader::open(&input).unwrap().count(), 3);
}

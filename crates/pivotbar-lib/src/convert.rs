//! Per-file conversion: Parquet ticks in, candles and pivot levels out.

use pivotbar_aggregate::{AggregateStats, PivotAccumulator, Pivots, WindowAggregator};
use pivotbar_format::{FormatError, OutputFormat};
use pivotbar_source::{DEFAULT_BATCH_SIZE, SourceError, TickReader};
use pivotbar_types::{DayRange, TimestampUnit, Window};
use serde::Serialize;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while converting one file.
///
/// Every variant carries the input or output path it concerns.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The input file could not be opened or read.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// The output file or its directory could not be created.
    #[error("Failed to create output {}: {source}", path.display())]
    CreateOutput {
        /// The output path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A candle could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Sink {
        /// The output path.
        path: PathBuf,
        /// The underlying sink error.
        #[source]
        source: FormatError,
    },

    /// The output path names the input file itself.
    #[error("Output {} is the input file", path.display())]
    SameFile {
        /// The input path.
        path: PathBuf,
    },

    /// The source directory could not be listed.
    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDir {
        /// The source directory.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    /// Returns the path this error concerns.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Source(
                SourceError::Open { path, .. }
                | SourceError::Parquet { path, .. }
                | SourceError::Read { path, .. }
                | SourceError::MissingColumn { path, .. }
                | SourceError::UnsupportedType { path, .. }
                | SourceError::NullValue { path, .. },
            )
            | Self::CreateOutput { path, .. }
            | Self::Sink { path, .. }
            | Self::SameFile { path }
            | Self::ReadDir { path, .. } => path,
        }
    }
}

/// Settings shared by every file of a conversion.
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    /// Day whose ticks are kept.
    pub day: DayRange,
    /// How ticks are grouped into candles.
    pub window: Window,
    /// Output format.
    pub format: OutputFormat,
    /// Whether CSV output starts with a header row.
    pub header: bool,
    /// Rows decoded per Parquet record batch.
    pub batch_size: usize,
    /// Overrides the timestamp unit inferred from the input schema.
    pub unit: Option<TimestampUnit>,
}

impl ConvertOptions {
    /// Creates options for `day` with 5-tick windows and header-less CSV.
    #[must_use]
    pub fn new(day: DayRange) -> Self {
        Self {
            day,
            window: Window::default(),
            format: OutputFormat::default(),
            header: false,
            batch_size: DEFAULT_BATCH_SIZE,
            unit: None,
        }
    }

    /// Sets the window kind.
    #[must_use]
    pub const fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub const fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets whether CSV output includes a header row.
    #[must_use]
    pub const fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Sets the record batch size.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Forces the timestamp unit of the input.
    #[must_use]
    pub const fn with_unit(mut self, unit: TimestampUnit) -> Self {
        self.unit = Some(unit);
        self
    }
}

/// Outcome of converting one file.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertReport {
    /// The input file.
    pub input: PathBuf,
    /// The written output file.
    pub output: PathBuf,
    /// Tick and candle counters.
    pub stats: AggregateStats,
    /// Pivot levels, absent when the day produced no candles.
    pub pivots: Option<Pivots>,
}

impl ConvertReport {
    /// Returns true if no candle was produced for the day.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stats.candles == 0
    }
}

/// One input file paired with its output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertJob {
    /// The input file.
    pub input: PathBuf,
    /// The output file.
    pub output: PathBuf,
}

/// Converts one tick file into candles, writing them to `output`.
///
/// The output file is created (or truncated) even when no candle falls in
/// the day, in which case the report carries no pivots.
///
/// # Errors
///
/// Returns an error if the input cannot be read or the output cannot be
/// written. Candles written before a mid-file failure stay in the output.
pub fn convert_file(
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> Result<ConvertReport, ConvertError> {
    let mut reader = TickReader::open_with_batch_size(input, options.batch_size)?;
    if let Some(unit) = options.unit {
        reader = reader.with_unit(unit);
    }
    let unit = reader.unit();
    debug!(
        input = %input.display(),
        rows = reader.total_rows(),
        %unit,
        window = %options.window,
        "converting"
    );

    if same_file(input, output) {
        return Err(ConvertError::SameFile {
            path: input.to_path_buf(),
        });
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ConvertError::CreateOutput {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(output).map_err(|source| ConvertError::CreateOutput {
        path: output.to_path_buf(),
        source,
    })?;

    let sink_error = |source| ConvertError::Sink {
        path: output.to_path_buf(),
        source,
    };
    let mut sink = options
        .format
        .open(BufWriter::new(file), options.header)
        .map_err(sink_error)?;

    let mut pivots = PivotAccumulator::new();
    let mut candles = WindowAggregator::new(reader, options.day, options.window, unit);
    for candle in candles.by_ref() {
        let candle = candle?;
        sink.write_candle(&candle).map_err(sink_error)?;
        pivots.observe(&candle);
    }
    sink.finish().map_err(sink_error)?;

    let stats = candles.stats();
    let pivots = pivots.finish().ok();
    if pivots.is_none() {
        warn!(
            input = %input.display(),
            ticks = stats.ticks_read(),
            day = %options.day,
            "no ticks within the day"
        );
    } else if stats.ticks_discarded > stats.ticks_in_range {
        warn!(
            input = %input.display(),
            discarded = stats.ticks_discarded,
            kept = stats.ticks_in_range,
            "most ticks fell outside the day"
        );
    }
    info!(
        input = %input.display(),
        output = %output.display(),
        candles = stats.candles,
        ticks = stats.ticks_in_range,
        "converted"
    );

    Ok(ConvertReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        stats,
        pivots,
    })
}

/// Returns true if `output` resolves to the same file as `input`.
///
/// An output that does not exist yet is resolved through its parent
/// directory.
fn same_file(input: &Path, output: &Path) -> bool {
    let Ok(input) = fs::canonicalize(input) else {
        return false;
    };
    let resolved = fs::canonicalize(output).or_else(|_| {
        let parent = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = output.file_name().ok_or(std::io::ErrorKind::InvalidInput)?;
        fs::canonicalize(parent).map(|dir| dir.join(name))
    });

    resolved.is_ok_and(|output| output == input)
}

/// Derives the output path for `input` inside `output_dir`.
///
/// The input file name is kept; with `replace_extension` its extension is
/// replaced by the format's own.
#[must_use]
pub fn output_path(
    input: &Path,
    output_dir: &Path,
    format: OutputFormat,
    replace_extension: bool,
) -> PathBuf {
    let name = input.file_name().unwrap_or_else(|| OsStr::new("candles"));
    let mut path = output_dir.join(name);
    if replace_extension {
        path.set_extension(format.extension());
    }
    path
}

/// Lists the regular files of `dir`, sorted by name.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list_inputs(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let read_dir_error = |source| ConvertError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut inputs = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        let path = entry.path();
        if path.is_file() {
            inputs.push(path);
        } else {
            debug!(path = %path.display(), "skipping non-file entry");
        }
    }
    inputs.sort();

    Ok(inputs)
}

/// Pairs every file of `source_dir` with its output path in `output_dir`.
///
/// # Errors
///
/// Returns an error if the source directory cannot be read.
pub fn plan_jobs(
    source_dir: &Path,
    output_dir: &Path,
    format: OutputFormat,
    replace_extension: bool,
) -> Result<Vec<ConvertJob>, ConvertError> {
    Ok(list_inputs(source_dir)?
        .into_iter()
        .map(|input| ConvertJob {
            output: output_path(&input, output_dir, format, replace_extension),
            input,
        })
        .collect())
}

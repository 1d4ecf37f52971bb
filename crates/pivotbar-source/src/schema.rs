//! Schema inspection for tick files.

use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::schema::printer::print_schema;
use std::fs::File;
use std::path::Path;

use crate::SourceError;

/// Footer-level description of a Parquet file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSummary {
    /// Parquet message type, as printed by the parquet schema printer.
    pub schema: String,
    /// Total number of rows.
    pub num_rows: i64,
    /// Number of row groups.
    pub row_groups: usize,
}

impl std::fmt::Display for SchemaSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.schema.trim_end())?;
        write!(f, "\nrows: {}, row groups: {}", self.num_rows, self.row_groups)
    }
}

/// Reads the footer of a Parquet file and describes its schema.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not Parquet.
pub fn describe_schema(path: impl AsRef<Path>) -> Result<SchemaSummary, SourceError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = SerializedFileReader::new(file).map_err(|source| SourceError::Parquet {
        path: path.to_path_buf(),
        source,
    })?;

    let metadata = reader.metadata();
    let mut out = Vec::new();
    print_schema(&mut out, metadata.file_metadata().schema());

    Ok(SchemaSummary {
        schema: String::from_utf8_lossy(&out).into_owned(),
        num_rows: metadata.file_metadata().num_rows(),
        row_groups: metadata.num_row_groups(),
    })
}

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Iv3 input file for {year} {document} not found: {path}")]
    MissingInputFile {
        year: i32,
        document: String,
        path: PathBuf,
    },

    #[error("Required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    #[error("Could not parse value '{value}' in {path} (record {record})")]
    InvalidValue {
        value: String,
        path: PathBuf,
        record: u64,
    },

    #[error("Invalid year range: {start}..={end}")]
    InvalidYearRange { start: i32, end: i32 },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DatasetError>;

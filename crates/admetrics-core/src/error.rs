// crates/admetrics-core/src/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("table has no columns")]
    EmptyTable,

    #[error("no channel tables were supplied")]
    NoChannels,

    #[error("columns '{first}' and '{second}' both normalize to '{canonical}'")]
    DuplicateColumn {
        first: String,
        second: String,
        canonical: String,
    },

    #[error("channel tables must not carry a '{column}' column; it is assigned during normalization")]
    ReservedColumn { column: String },

    #[error("required column '{column}' is missing")]
    MissingColumn { column: String },

    #[error("column '{column}' appears on both sides of the date join")]
    JoinCollision { column: String },

    #[error("date column has unsupported type {dtype}")]
    UnsupportedDateType { dtype: String },
}

#[derive(Debug, Error)]
#[error("unparseable date '{value}' at row {row}")]
pub struct DateParseError {
    pub value: String,
    pub row: usize,
}

#[derive(Debug, Error)]
#[error("negative value {value} in column '{column}' at row {row}")]
pub struct ValidationError {
    pub column: String,
    pub row: usize,
    pub value: f64,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Date parsing failed: {0}")]
    DateParse(#[from] DateParseError),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

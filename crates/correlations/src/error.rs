use quantum::{ModelError, SolverError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("table needs at least two samples, got {count}")]
    TooFewSamples { count: usize },

    #[error("{ratios} coupling ratios but {rows} rows")]
    RowCount { ratios: usize, rows: usize },

    #[error("coupling ratio #{index} = {value} is not finite")]
    NonFiniteRatio { index: usize, value: f64 },

    #[error("coupling ratios must increase strictly (#{index} = {value})")]
    NotIncreasing { index: usize, value: f64 },

    #[error("row #{index} has {len} values, expected {expected}")]
    RowLength {
        index: usize,
        len: usize,
        expected: usize,
    },

    #[error("row #{row} column #{column} is not finite")]
    NonFiniteValue { row: usize, column: usize },

    #[error("{offsets} offsets for {columns} columns")]
    OffsetCount { offsets: usize, columns: usize },

    #[error("first offset must be (0,0) for the self-correlation column")]
    MissingOrigin,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpolationError {
    #[error("J2/J1 = {ratio} is outside the tabulated range [{min}, {max}]")]
    OutOfDomain { ratio: f64, min: f64, max: f64 },

    #[error("J2/J1 = {0} is not a finite number")]
    NotFinite(f64),
}

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Interpolation(#[from] InterpolationError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("cannot parse request {line:?}: {reason}")]
    Request { line: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

use std::path::PathBuf;

use thiserror::Error;

use crate::ddm::{Axis, Coordinate, Ddm};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error("{axis} must be a finite number, got {value}")]
    NonFinite { axis: Axis, value: f64 },

    #[error("{axis} {value} is outside [-{limit}, {limit}]")]
    OutOfRange { axis: Axis, value: f64, limit: f64 },

    #[error("malformed {axis} DDM string {text:?}: {reason}")]
    Malformed {
        axis: Axis,
        text: String,
        reason: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("oracle request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("oracle response has no `{field}` value")]
    MissingField { field: &'static str },

    #[error("no reference answer for {0}")]
    Unknown(Coordinate),
}

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("cannot access fixture {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid fixture JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("fixture has {examples} examples but {answers} answers")]
    LengthMismatch { examples: usize, answers: usize },
}

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error("cannot convert {coordinate}: {source}")]
    Convert {
        coordinate: Coordinate,
        source: ConvertError,
    },

    #[error("cannot start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("Mismatch for {coordinate}: {actual} but it should be {expected}")]
    Mismatch {
        coordinate: Coordinate,
        actual: Ddm,
        expected: Ddm,
    },
}

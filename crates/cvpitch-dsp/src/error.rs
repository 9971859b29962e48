//! Error types for cvpitch-dsp

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Estimator construction failed: {0}")]
    EstimatorConstruction(String),

    #[error("Unknown parameter index: {0}")]
    UnknownParameter(u32),

    #[error("Parameter {0} is read-only")]
    ReadOnlyParameter(&'static str),

    #[error(transparent)]
    Analysis(#[from] cvpitch_analysis::Error),

    #[error(transparent)]
    Core(#[from] cvpitch_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

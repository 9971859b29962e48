//! Error types for cvpitch-analysis

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid analysis window: {0}")]
    InvalidWindow(String),

    #[error(transparent)]
    Core(#[from] cvpitch_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

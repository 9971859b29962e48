//! Error types for cvpitch-export

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("WAV error: {0}")]
    Wav(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Invalid audio data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Dsp(#[from] cvpitch_dsp::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

impl From<hound::Error> for ExportError {
    fn from(e: hound::Error) -> Self {
        match e {
            hound::Error::IoError(io) => ExportError::Io(io),
            other => ExportError::Wav(other.to_string()),
        }
    }
}

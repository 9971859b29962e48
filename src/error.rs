//! Centralized error type for the cvpitch umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] cvpitch_core::Error),

    #[error("Analysis: {0}")]
    Analysis(#[from] cvpitch_analysis::Error),

    #[error("DSP: {0}")]
    Dsp(#[from] cvpitch_dsp::Error),

    #[cfg(feature = "export")]
    #[error("Export: {0}")]
    Export(#[from] cvpitch_export::ExportError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

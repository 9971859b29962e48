//! Offline rendering for cvpitch.
//!
//! Runs audio files through [`cvpitch_dsp::AudioToCvPitch`] in host-sized
//! blocks and writes the pitch and signal CV as a 2-channel float WAV.
//!
//! ```rust,no_run
//! use cvpitch_export::{render_file, RenderOptions};
//! use std::path::Path;
//!
//! let summary = render_file(
//!     Path::new("voice.wav"),
//!     Path::new("voice_cv.wav"),
//!     &RenderOptions::default().compensate_latency(true),
//! )?;
//! println!("{} of {} windows voiced", summary.voiced_windows, summary.windows);
//! # Ok::<(), cvpitch_export::ExportError>(())
//! ```

mod error;
pub use error::{ExportError, Result};

pub mod render;
pub use render::{render_file, render_samples, CvRender, RenderOptions, RenderSummary, DEFAULT_BLOCK_SIZE};

pub mod wav;
pub use wav::{read_mono, write_cv, MonoAudio};

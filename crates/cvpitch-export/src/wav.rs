//! WAV input and CV output using hound.

use crate::error::{ExportError, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::{Read, Seek, Write};
use std::path::Path;

/// Decoded mono audio.
#[derive(Debug, Clone, PartialEq)]
pub struct MonoAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl MonoAudio {
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Read a WAV file, averaging all channels to mono.
///
/// Integer formats (8-32 bit) are scaled to -1.0..1.0; float data passes through.
pub fn read_mono(path: &Path) -> Result<MonoAudio> {
    let reader = WavReader::open(path)?;
    decode_mono(reader)
}

pub fn decode_mono<R: Read>(reader: WavReader<R>) -> Result<MonoAudio> {
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(ExportError::InvalidData("WAV has no channels".into()));
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.into_samples::<f32>().collect::<std::result::Result<_, _>>()?,
        SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(ExportError::InvalidData(format!(
                    "unsupported bit depth {}",
                    spec.bits_per_sample
                )));
            }
            let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    let samples = if channels == 1 {
        interleaved
    } else {
        let gain = 1.0 / channels as f32;
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() * gain)
            .collect()
    };

    Ok(MonoAudio {
        samples,
        sample_rate: spec.sample_rate,
    })
}

/// Output layout: channel 0 pitch CV, channel 1 signal CV, 32-bit float.
pub fn cv_spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    }
}

/// Write pitch and gate CV to a 2-channel float WAV file.
pub fn write_cv(path: &Path, pitch: &[f32], gate: &[f32], sample_rate: u32) -> Result<()> {
    let writer = WavWriter::create(path, cv_spec(sample_rate))?;
    write_cv_to(writer, pitch, gate)
}

pub fn write_cv_to<W: Write + Seek>(
    mut writer: WavWriter<W>,
    pitch: &[f32],
    gate: &[f32],
) -> Result<()> {
    if pitch.len() != gate.len() {
        return Err(ExportError::InvalidData(
            "Pitch and gate channels have different lengths".into(),
        ));
    }

    for (&p, &g) in pitch.iter().zip(gate) {
        writer.write_sample(p)?;
        writer.write_sample(g)?;
    }
    writer.finalize()?;
    Ok(())
}

//! Static description of the processing unit for hosts.

use crate::params::{
    DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_HOLD_OUTPUT_PITCH, DEFAULT_OCTAVE, DEFAULT_SENSITIVITY,
    DEFAULT_TOLERANCE, MAX_OCTAVE, MIN_OCTAVE,
};
use cvpitch_core::ParameterRange;
use serde::{Deserialize, Serialize};

/// Host parameter indices, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parameter {
    Sensitivity = 0,
    ConfidenceThreshold,
    Tolerance,
    Octave,
    HoldOutputPitch,
    DetectedPitch,
    PitchConfidence,
}

impl Parameter {
    pub const ALL: [Parameter; 7] = [
        Parameter::Sensitivity,
        Parameter::ConfidenceThreshold,
        Parameter::Tolerance,
        Parameter::Octave,
        Parameter::HoldOutputPitch,
        Parameter::DetectedPitch,
        Parameter::PitchConfidence,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    /// Read-only parameters report tracker state back to the host.
    pub fn is_output(self) -> bool {
        matches!(self, Parameter::DetectedPitch | Parameter::PitchConfidence)
    }

    pub fn name(self) -> &'static str {
        match self {
            Parameter::Sensitivity => "Sensitivity",
            Parameter::ConfidenceThreshold => "Confidence Threshold",
            Parameter::Tolerance => "Tolerance",
            Parameter::Octave => "Octave",
            Parameter::HoldOutputPitch => "Hold output pitch",
            Parameter::DetectedPitch => "Detected Pitch",
            Parameter::PitchConfidence => "Pitch Confidence",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Parameter::Sensitivity => "Sensitivity",
            Parameter::ConfidenceThreshold => "ConfidenceThreshold",
            Parameter::Tolerance => "Tolerance",
            Parameter::Octave => "Octave",
            Parameter::HoldOutputPitch => "HoldOutputPitch",
            Parameter::DetectedPitch => "DetectedPitch",
            Parameter::PitchConfidence => "PitchConfidence",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Parameter::Sensitivity
            | Parameter::ConfidenceThreshold
            | Parameter::Tolerance
            | Parameter::PitchConfidence => "%",
            Parameter::DetectedPitch => "Hz",
            Parameter::Octave | Parameter::HoldOutputPitch => "",
        }
    }

    pub fn range(self) -> ParameterRange {
        match self {
            Parameter::Sensitivity => ParameterRange::linear(0.1, 100.0, DEFAULT_SENSITIVITY),
            Parameter::ConfidenceThreshold => {
                ParameterRange::linear(0.0, 100.0, DEFAULT_CONFIDENCE_THRESHOLD)
            }
            Parameter::Tolerance => ParameterRange::linear(0.0, 100.0, DEFAULT_TOLERANCE),
            Parameter::Octave => ParameterRange::integer(MIN_OCTAVE, MAX_OCTAVE, DEFAULT_OCTAVE),
            Parameter::HoldOutputPitch => ParameterRange::toggle(DEFAULT_HOLD_OUTPUT_PITCH),
            Parameter::DetectedPitch => ParameterRange::linear(0.0, 22050.0, 0.0),
            Parameter::PitchConfidence => ParameterRange::linear(0.0, 100.0, 0.0),
        }
    }

    pub fn flags(self) -> ParameterFlags {
        ParameterFlags {
            automatable: true,
            integer: matches!(self, Parameter::Octave | Parameter::HoldOutputPitch),
            boolean: self == Parameter::HoldOutputPitch,
            output: self.is_output(),
        }
    }

    pub fn info(self) -> ParameterInfo {
        ParameterInfo {
            index: self.index(),
            name: self.name().to_string(),
            symbol: self.symbol().to_string(),
            unit: self.unit().to_string(),
            range: self.range(),
            flags: self.flags(),
        }
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterFlags {
    pub automatable: bool,
    pub integer: bool,
    pub boolean: bool,
    /// Written by the unit, read by the host.
    pub output: bool,
}

/// Parameter metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub index: u32,
    pub name: String,
    pub symbol: String,
    pub unit: String,
    pub range: ParameterRange,
    pub flags: ParameterFlags,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortHints {
    /// Carries control voltage rather than audio.
    pub cv: bool,
    pub positive_unipolar: bool,
    /// Values are scaled to the host's CV range.
    pub scaled_range: bool,
}

impl PortHints {
    pub const AUDIO: PortHints = PortHints {
        cv: false,
        positive_unipolar: false,
        scaled_range: false,
    };

    pub const UNIPOLAR_CV: PortHints = PortHints {
        cv: true,
        positive_unipolar: true,
        scaled_range: true,
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortInfo {
    pub name: String,
    pub symbol: String,
    pub hints: PortHints,
}

impl PortInfo {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, hints: PortHints) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            hints,
        }
    }
}

/// Audio I/O configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioIo {
    pub inputs: Vec<PortInfo>,
    pub outputs: Vec<PortInfo>,
}

impl AudioIo {
    /// One audio input, pitch and signal CV outputs.
    pub fn audio_to_cv() -> Self {
        Self {
            inputs: vec![PortInfo::new("Audio Input", "AudioInput", PortHints::AUDIO)],
            outputs: vec![
                PortInfo::new("Pitch Out", "PitchOut", PortHints::UNIPOLAR_CV),
                PortInfo::new("Signal Out", "SignalOut", PortHints::UNIPOLAR_CV),
            ],
        }
    }
}

/// Identification and I/O layout reported to hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginMetadata {
    pub label: String,
    pub name: String,
    pub description: String,
    pub maker: String,
    pub home_page: String,
    pub license: String,
    /// (major, minor, patch)
    pub version: (u32, u32, u32),
    /// Four-character code.
    pub unique_id: [u8; 4],
    pub audio_io: AudioIo,
    pub receives_midi: bool,
    /// Processing latency in samples.
    pub latency_samples: usize,
}

impl PluginMetadata {
    pub fn audio_to_cv_pitch(latency_samples: usize) -> Self {
        Self {
            label: "AudioToCVPitch".to_string(),
            name: "Audio to CV Pitch".to_string(),
            description: "Converts a monophonic audio signal to CV pitch".to_string(),
            maker: "Bram Giesen and falkTX".to_string(),
            home_page: "http://bramgiesen.com".to_string(),
            license: "GPL-3.0-or-later".to_string(),
            version: (1, 0, 0),
            unique_id: *b"PTcv",
            audio_io: AudioIo::audio_to_cv(),
            receives_midi: false,
            latency_samples,
        }
    }

    /// `unique_id` packed big-endian, as hosts expect four-char codes.
    pub fn unique_id_u32(&self) -> u32 {
        u32::from_be_bytes(self.unique_id)
    }

    pub fn version_string(&self) -> String {
        let (major, minor, patch) = self.version;
        format!("{}.{}.{}", major, minor, patch)
    }
}

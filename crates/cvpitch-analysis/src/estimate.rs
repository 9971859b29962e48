//! Raw estimator output and equal-temperament helpers.

/// Result of one estimator invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct PitchEstimate {
    /// Detected frequency in Hz (0.0 if no determinate pitch)
    pub frequency: f32,
    /// Estimator certainty (0.0 - 1.0)
    pub confidence: f32,
}

impl PitchEstimate {
    pub const UNVOICED: PitchEstimate = PitchEstimate {
        frequency: 0.0,
        confidence: 0.0,
    };

    pub fn new(frequency: f32, confidence: f32) -> Self {
        Self {
            frequency,
            confidence,
        }
    }

    /// A frequency was found, regardless of how confident the estimator is.
    pub fn is_voiced(&self) -> bool {
        self.frequency > 0.0
    }

    /// Nearest MIDI note, if voiced.
    pub fn midi_note(&self) -> Option<u8> {
        self.is_voiced().then(|| freq_to_midi(self.frequency).0)
    }

    /// Cents deviation from the nearest note (-50 to +50), 0.0 if unvoiced.
    pub fn cents_offset(&self) -> f32 {
        if self.is_voiced() {
            freq_to_midi(self.frequency).1
        } else {
            0.0
        }
    }

    /// Note name with sharp notation (e.g., "A4", "C#5")
    pub fn note_name(&self) -> Option<String> {
        const NAMES: [&str; 12] = [
            "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
        ];
        self.midi_note().map(|note| {
            let octave = (note / 12) as i32 - 1;
            format!("{}{}", NAMES[(note % 12) as usize], octave)
        })
    }
}

/// Convert frequency to MIDI note and cents offset
pub fn freq_to_midi(freq: f32) -> (u8, f32) {
    if freq <= 0.0 {
        return (0, 0.0);
    }

    // MIDI note = 69 + 12 * log2(freq / 440)
    let note_float = 69.0 + 12.0 * (freq / 440.0).log2();
    let note = note_float.round().clamp(0.0, 127.0) as u8;

    let cents = 1200.0 * (freq / midi_to_freq(note)).log2();

    (note, cents)
}

/// Convert MIDI note to frequency
pub fn midi_to_freq(note: u8) -> f32 {
    440.0 * 2.0f32.powf((note as f32 - 69.0) / 12.0)
}

use serde::{Deserialize, Serialize};

/// A single perceptual measurement of the microphone input.
///
/// Produced fresh on every sample request; carries no identity beyond its
/// value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    /// Fundamental frequency in Hz. 0.0 means no confident pitch was found
    /// (silence, or unvoiced/noisy input).
    pub pitch: f64,

    /// Peak linear amplitude over the analysis window.
    pub volume: f64,
}

impl Tone {
    pub const fn new(pitch: f64, volume: f64) -> Self {
        Self { pitch, volume }
    }
}

//! Speech-to-text providers

mod simulated;
mod whisper;

pub use simulated::SimulatedTranscriber;
pub use whisper::{WhisperConfig, WhisperProvider};

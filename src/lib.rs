//! Wavescope - audio waveform visualization and playback.
//!
//! Decodes an audio file supplied as raw bytes, computes a downsampled
//! min/max peak envelope per channel, renders the envelope as a vector path,
//! and plays the audio back through an adjustable gain stage.
//!
//! [`AudioAnalyzer`] is the control surface UI glue talks to; everything
//! else is reachable through it.

pub mod analyzer;
pub mod decoder;
pub mod player;
pub mod utils;
pub mod waveform;

pub use analyzer::AudioAnalyzer;
pub use decoder::AudioBuffer;
pub use player::{PlaybackSink, PlaybackState};
pub use utils::error::{AppError, AppResult, ErrorResponse};
pub use waveform::{AudioSummary, PathCommand, PeakEnvelope, PeakPair, ViewBox};

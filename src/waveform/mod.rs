//! Waveform analysis and rendering
//!
//! Extracts min/max peak envelopes from decoded audio and renders them as
//! vector paths for visualization.

pub mod extractor;
pub mod renderer;

pub use extractor::{extract_peaks, PeakEnvelope, PeakPair};
pub use renderer::{
    path_commands, path_data, svg_document, AudioSummary, PathCommand, ViewBox,
};

//! Audio playback
//!
//! Playback state machine and output sinks.

pub mod sink;
pub mod state;

pub use sink::{CpalSink, NullSink, PlaybackSink, SharedGain};
pub use state::PlaybackState;

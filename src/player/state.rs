//! Playback state management
//!
//! Defines the playback state machine shared by the controller and the UI.

use serde::{Deserialize, Serialize};

/// Current state of the playback system
///
/// `Idle → Playing` on play (only with a loaded buffer), `Playing → Idle` on
/// stop. Play while playing and stop while idle are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// No playback in progress
    Idle,
    /// Currently playing
    Playing,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Idle
    }
}

impl PlaybackState {
    /// Whether audio is currently playing.
    pub fn is_playing(self) -> bool {
        self == Self::Playing
    }
}

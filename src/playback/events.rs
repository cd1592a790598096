use std::fmt;

use serde::{Deserialize, Serialize};

/// Notifications raised by a media element while it plays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// Progress tick. `duration` is NaN until metadata has loaded.
    TimeUpdate { current_time: f64, duration: f64 },
    Ended,
    MetadataLoaded { duration: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
}

impl PlaybackState {
    pub fn from_paused(paused: bool) -> Self {
        if paused {
            PlaybackState::Paused
        } else {
            PlaybackState::Playing
        }
    }

    pub fn is_playing(self) -> bool {
        self == PlaybackState::Playing
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Paused => write!(f, "Paused"),
            PlaybackState::Playing => write!(f, "Playing"),
        }
    }
}

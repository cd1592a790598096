//! Error types for the audio panel.
//!
//! Only starting playback can fail; everything else the controller does is
//! total over its guarded inputs.

use thiserror::Error;

/// Why a media element refused a play request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    /// The environment blocks audio that was not started by a user gesture.
    #[error("playback blocked until the user interacts with the page")]
    NotAllowed,

    /// A later load superseded the request before it started.
    #[error("play request was aborted")]
    Aborted,
}

impl PlayError {
    /// True when a manual click on the play button would likely succeed.
    pub fn needs_user_gesture(&self) -> bool {
        matches!(self, PlayError::NotAllowed)
    }
}

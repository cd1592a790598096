//! The media element the panel controls.
//!
//! `MediaHandle` is the seam between the controller and whatever actually
//! produces audio. Its notifications travel separately as `MediaEvent`s.

mod simulated;

pub use simulated::{AutoplayPolicy, SimulatedMedia};

use futures::future::BoxFuture;

use crate::error::PlayError;
use crate::playback::PlaybackState;

/// Outcome of a play request, resolved once the element is producing audio
/// or has refused to.
pub type PlayRequest = BoxFuture<'static, Result<(), PlayError>>;

pub trait MediaHandle: Send + Sync {
    fn is_paused(&self) -> bool;

    fn current_time(&self) -> f64;

    /// Track length in seconds, NaN while metadata is still loading.
    fn duration(&self) -> f64;

    fn set_current_time(&self, secs: f64);

    /// Marks the element as playing before returning, so a pause issued
    /// while the request is pending supersedes it. A rejected request puts
    /// the element back to paused.
    fn play(&self) -> PlayRequest;

    fn pause(&self);

    fn playback_state(&self) -> PlaybackState {
        PlaybackState::from_paused(self.is_paused())
    }
}

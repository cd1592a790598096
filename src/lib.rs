//! The audio panel behind the CodeHarana site.
//!
//! A controller for a collapsible music panel: play/pause with autoplay
//! fallback, a seekable progress track, time readouts and a one-shot
//! onboarding tooltip. The media element, the visual indicators and the
//! hover probe are passed in, so the same controller drives a browser
//! binding, the terminal front end or a test.

pub mod error;
pub mod media;
pub mod panel;
pub mod playback;
pub mod state;

pub mod events;
pub mod time;

pub use events::{MediaEvent, PlaybackState};
pub use time::{format_time, known_duration, progress_percent, seek_time};

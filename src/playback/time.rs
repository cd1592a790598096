//! Time readouts and progress-track math.
//!
//! A duration that is NaN, infinite or zero is "unknown": nothing can be
//! rendered or seeked against it yet.

/// Formats seconds as `m:ss`. Unknown or negative input renders as `0:00`.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }
    let mins = (secs / 60.0) as u64;
    let secs = (secs % 60.0) as u64;
    format!("{}:{:02}", mins, secs)
}

/// Returns the duration if it can be used as a denominator.
pub fn known_duration(duration: f64) -> Option<f64> {
    (duration.is_finite() && duration > 0.0).then_some(duration)
}

/// Progress-fill width in percent, clamped to `[0, 100]`.
pub fn progress_percent(current_time: f64, duration: f64) -> Option<f64> {
    let duration = known_duration(duration)?;
    let current_time = if current_time.is_nan() { 0.0 } else { current_time };
    Some((current_time / duration * 100.0).clamp(0.0, 100.0))
}

/// Maps a click at `offset_x` on a track `track_width` wide to a seek time.
pub fn seek_time(offset_x: f64, track_width: f64, duration: f64) -> Option<f64> {
    let duration = known_duration(duration)?;
    if !(track_width > 0.0) || !offset_x.is_finite() {
        return None;
    }
    Some((offset_x / track_width).clamp(0.0, 1.0) * duration)
}

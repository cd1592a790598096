use anyhow::{Context, Result};

use harana::playback::{format_time, progress_percent};

pub fn time(seconds: f64, duration: Option<f64>) -> Result<()> {
    println!("{}", readout(seconds, duration)?);
    Ok(())
}

fn readout(seconds: f64, duration: Option<f64>) -> Result<String> {
    let Some(duration) = duration else {
        return Ok(format_time(seconds));
    };
    let percent = progress_percent(seconds, duration)
        .with_context(|| format!("Duration must be a positive number of seconds, got {duration}"))?;
    Ok(format!(
        "{} / {} ({:.1}%)",
        format_time(seconds),
        format_time(duration),
        percent
    ))
}

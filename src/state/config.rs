use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

use crate::media::AutoplayPolicy;
use crate::panel::controller::{DEFAULT_BLOCKED_PROMPT, DEFAULT_TOOLTIP_TEXT};
use crate::panel::{PanelSettings, TooltipSchedule};

pub const CONFIG_ENV: &str = "HARANA_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "harana.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    pub reveal_delay_secs: f64,
    pub linger_secs: f64,
    pub text: String,
    pub blocked_prompt: String,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            reveal_delay_secs: 3.0,
            linger_secs: 4.0,
            text: DEFAULT_TOOLTIP_TEXT.to_string(),
            blocked_prompt: DEFAULT_BLOCKED_PROMPT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Interval between progress ticks of the simulated media element.
    pub tick_ms: u64,
    pub track_duration_secs: f64,
    pub autoplay: AutoplayPolicy,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            tick_ms: 250,
            track_duration_secs: 180.0,
            autoplay: AutoplayPolicy::Allowed,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tooltip: TooltipConfig,
    pub player: PlayerConfig,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config TOML from {:?}", path))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {:?}", path))?;
        Ok(config)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content =
            toml::to_string_pretty(&self).with_context(|| "Failed to serialize config to TOML")?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
        }

        fs::write(path, content).with_context(|| format!("Failed to write config to {:?}", path))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, secs) in [
            ("tooltip.reveal_delay_secs", self.tooltip.reveal_delay_secs),
            ("tooltip.linger_secs", self.tooltip.linger_secs),
        ] {
            ensure!(
                secs.is_finite() && secs >= 0.0,
                "{name} must be a non-negative number of seconds, got {secs}"
            );
        }
        ensure!(self.player.tick_ms > 0, "player.tick_ms must be positive");
        ensure!(
            self.player.track_duration_secs.is_finite() && self.player.track_duration_secs > 0.0,
            "player.track_duration_secs must be positive, got {}",
            self.player.track_duration_secs
        );
        Ok(())
    }

    pub fn panel_settings(&self) -> PanelSettings {
        PanelSettings {
            schedule: TooltipSchedule {
                reveal_after: secs(self.tooltip.reveal_delay_secs),
                linger: secs(self.tooltip.linger_secs),
            },
            tooltip_text: self.tooltip.text.clone(),
            blocked_prompt: self.tooltip.blocked_prompt.clone(),
        }
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.player.tick_ms.max(1))
    }
}

fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or_default()
}

/// `--config` if given, then `$HARANA_CONFIG`, then `harana.toml`.
pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayIcon {
    #[default]
    Play,
    Pause,
}

/// The visual indicators the controller writes to.
pub trait PanelView {
    fn set_panel_open(&mut self, open: bool);

    fn set_play_icon(&mut self, icon: PlayIcon);

    fn set_visualizer_active(&mut self, active: bool);

    /// Width of the progress fill, in percent of the track.
    fn set_progress(&mut self, percent: f64);

    fn set_current_time(&mut self, text: &str);

    fn set_duration(&mut self, text: &str);

    fn set_tooltip_text(&mut self, text: &str);

    fn set_tooltip_shown(&mut self, shown: bool);
}

/// Everything currently rendered by a panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelSnapshot {
    pub panel_open: bool,
    pub play_icon: PlayIcon,
    pub visualizer_active: bool,
    pub progress_percent: f64,
    pub current_time: String,
    pub duration: String,
    pub tooltip_text: String,
    pub tooltip_shown: bool,
}

impl Default for PanelSnapshot {
    fn default() -> Self {
        Self {
            panel_open: false,
            play_icon: PlayIcon::Play,
            visualizer_active: false,
            progress_percent: 0.0,
            current_time: "0:00".to_string(),
            duration: "0:00".to_string(),
            tooltip_text: String::new(),
            tooltip_shown: false,
        }
    }
}

/// Headless view that keeps the last value written to every indicator.
#[derive(Debug, Default)]
pub struct MemoryView {
    snapshot: PanelSnapshot,
    writes: usize,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &PanelSnapshot {
        &self.snapshot
    }

    /// Number of indicator writes so far, including ones that changed nothing.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl PanelView for MemoryView {
    fn set_panel_open(&mut self, open: bool) {
        self.writes += 1;
        self.snapshot.panel_open = open;
    }

    fn set_play_icon(&mut self, icon: PlayIcon) {
        self.writes += 1;
        self.snapshot.play_icon = icon;
    }

    fn set_visualizer_active(&mut self, active: bool) {
        self.writes += 1;
        self.snapshot.visualizer_active = active;
    }

    fn set_progress(&mut self, percent: f64) {
        self.writes += 1;
        self.snapshot.progress_percent = percent;
    }

    fn set_current_time(&mut self, text: &str) {
        self.writes += 1;
        self.snapshot.current_time = text.to_string();
    }

    fn set_duration(&mut self, text: &str) {
        self.writes += 1;
        self.snapshot.duration = text.to_string();
    }

    fn set_tooltip_text(&mut self, text: &str) {
        self.writes += 1;
        self.snapshot.tooltip_text = text.to_string();
    }

    fn set_tooltip_shown(&mut self, shown: bool) {
        self.writes += 1;
        self.snapshot.tooltip_shown = shown;
    }
}

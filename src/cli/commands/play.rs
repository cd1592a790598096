use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use tokio::sync::mpsc;
use tracing::{debug, info};

use harana::media::{AutoplayPolicy, SimulatedMedia};
use harana::panel::{HoverFlag, MemoryView, PanelController, PanelHandle, PanelView, PlayIcon};
use harana::state::Config;

/// Digit keys click on a track this many columns wide.
const TRACK_COLUMNS: f64 = 100.0;
const BAR_WIDTH: usize = 24;

#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    pub duration: Option<f64>,
    pub autoplay: bool,
    pub blocked: bool,
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum KeyAction {
    Quit,
    TogglePlayback,
    TogglePanel,
    ToggleHover,
    Seek(f64),
}

fn key_action(code: KeyCode) -> Option<KeyAction> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Char(' ') => Some(KeyAction::TogglePlayback),
        KeyCode::Char('o') => Some(KeyAction::TogglePanel),
        KeyCode::Char('h') => Some(KeyAction::ToggleHover),
        KeyCode::Char(c) => c
            .to_digit(10)
            .map(|d| KeyAction::Seek(d as f64 * TRACK_COLUMNS / 10.0)),
        _ => None,
    }
}

struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw terminal mode")?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Renders the panel as a single status line, redrawn on every change.
struct TerminalView {
    inner: MemoryView,
}

impl TerminalView {
    fn new() -> Self {
        Self {
            inner: MemoryView::new(),
        }
    }

    fn status_line(&self) -> String {
        let snap = self.inner.snapshot();
        let icon = match snap.play_icon {
            PlayIcon::Play => "▶",
            PlayIcon::Pause => "⏸",
        };
        let filled = ((snap.progress_percent / 100.0) * BAR_WIDTH as f64).round() as usize;
        let filled = filled.min(BAR_WIDTH);
        let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled));
        let eq = if snap.visualizer_active { " ♪" } else { "" };

        let mut line = if snap.panel_open {
            format!("{icon} {} / {} [{bar}]{eq}", snap.current_time, snap.duration)
        } else {
            format!("♫ (panel closed){eq}")
        };
        if snap.tooltip_shown {
            line.push_str(&format!("  « {} »", snap.tooltip_text));
        }
        line
    }

    fn redraw(&self) {
        let mut out = io::stdout();
        let _ = queue!(
            out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(self.status_line())
        );
        let _ = out.flush();
    }
}

impl PanelView for TerminalView {
    fn set_panel_open(&mut self, open: bool) {
        self.inner.set_panel_open(open);
        self.redraw();
    }

    fn set_play_icon(&mut self, icon: PlayIcon) {
        self.inner.set_play_icon(icon);
        self.redraw();
    }

    fn set_visualizer_active(&mut self, active: bool) {
        self.inner.set_visualizer_active(active);
        self.redraw();
    }

    fn set_progress(&mut self, percent: f64) {
        self.inner.set_progress(percent);
        self.redraw();
    }

    fn set_current_time(&mut self, text: &str) {
        self.inner.set_current_time(text);
        self.redraw();
    }

    fn set_duration(&mut self, text: &str) {
        self.inner.set_duration(text);
        self.redraw();
    }

    fn set_tooltip_text(&mut self, text: &str) {
        self.inner.set_tooltip_text(text);
        self.redraw();
    }

    fn set_tooltip_shown(&mut self, shown: bool) {
        self.inner.set_tooltip_shown(shown);
        self.redraw();
    }
}

/// Forwards key presses to the panel until quit. Runs on a blocking thread.
fn read_keys(handle: &PanelHandle, media: &SimulatedMedia, hover: &HoverFlag) -> Result<()> {
    loop {
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(KeyEvent { code, kind, .. }) = event::read()? else {
            continue;
        };
        if kind != KeyEventKind::Press {
            continue;
        }

        // a key press counts as a user gesture
        media.unlock();

        let alive = match key_action(code) {
            Some(KeyAction::Quit) => return Ok(()),
            Some(KeyAction::TogglePlayback) => handle.toggle_playback(),
            Some(KeyAction::TogglePanel) => handle.toggle_panel(),
            Some(KeyAction::ToggleHover) => {
                let hovering = hover.toggle();
                debug!(hovering, "pointer over toggle");
                true
            }
            Some(KeyAction::Seek(offset_x)) => handle.seek(offset_x, TRACK_COLUMNS),
            None => true,
        };
        if !alive {
            return Ok(());
        }
    }
}

pub async fn run(opts: PlayOptions, config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;

    let duration = opts.duration.unwrap_or(config.player.track_duration_secs);
    if !(duration.is_finite() && duration > 0.0) {
        bail!("Track duration must be positive, got {}", duration);
    }
    let policy = if opts.blocked {
        AutoplayPolicy::Blocked
    } else {
        config.player.autoplay
    };

    let (media_tx, media_rx) = mpsc::unbounded_channel();
    let media = Arc::new(SimulatedMedia::new(policy, media_tx));
    let hover = HoverFlag::new();
    let mut panel = PanelController::new(
        Arc::clone(&media),
        media_rx,
        TerminalView::new(),
        hover.clone(),
        config.panel_settings(),
    );
    let handle = panel.handle();

    media.load(duration);
    let clock = media.spawn_clock(config.tick());

    info!(duration, ?policy, "starting audio panel session");
    println!("Controls: [space] play/pause  [o] panel  [0-9] seek  [h] hover toggle  [q] quit");

    let raw = RawMode::enable()?;

    if opts.autoplay {
        handle.toggle_playback();
    }

    let keys = tokio::task::spawn_blocking({
        let handle = handle.clone();
        let media = Arc::clone(&media);
        move || {
            let result = read_keys(&handle, &media, &hover);
            handle.shutdown();
            result
        }
    });

    panel.run().await;
    clock.abort();
    drop(raw);
    println!();

    keys.await.context("Key reader thread panicked")??;

    if opts.json {
        let snapshot = serde_json::to_string_pretty(panel.view().inner.snapshot())
            .context("Failed to serialize panel state")?;
        println!("{}", snapshot);
    }

    Ok(())
}

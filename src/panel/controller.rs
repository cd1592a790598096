//! Audio panel controller
//!
//! Owns the panel and tooltip visibility, mirrors the media element's
//! playback state onto the view, and processes user actions, media
//! notifications and its own timers through a single event loop.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use super::tooltip::{fire_after, HoverProbe, Onboarding, TooltipSchedule};
use super::view::{PanelView, PlayIcon};
use crate::error::PlayError;
use crate::media::MediaHandle;
use crate::playback::{
    format_time, known_duration, progress_percent, seek_time, MediaEvent, PlaybackState,
};

pub const DEFAULT_TOOLTIP_TEXT: &str = "Click to play some music!";
pub const DEFAULT_BLOCKED_PROMPT: &str = "Your browser blocked autoplay. Tap play to start the music.";

/// Events processed by the controller loop
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    // User actions
    TogglePanel,
    TogglePlayback,
    Seek { offset_x: f64, track_width: f64 },
    Shutdown,

    // Internal: outcome of a play request issued by `toggle_playback`
    PlayResolved(Result<(), PlayError>),
    // Internal: onboarding timers
    TooltipReveal,
    TooltipExpire,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelSettings {
    pub schedule: TooltipSchedule,
    pub tooltip_text: String,
    /// Shown when the environment refuses to start audio on its own.
    pub blocked_prompt: String,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            schedule: TooltipSchedule::default(),
            tooltip_text: DEFAULT_TOOLTIP_TEXT.to_string(),
            blocked_prompt: DEFAULT_BLOCKED_PROMPT.to_string(),
        }
    }
}

/// Cloneable sender for driving a controller from outside its loop.
#[derive(Debug, Clone)]
pub struct PanelHandle {
    tx: UnboundedSender<PanelEvent>,
}

impl PanelHandle {
    /// Returns false once the controller is gone.
    pub fn send(&self, event: PanelEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn toggle_panel(&self) -> bool {
        self.send(PanelEvent::TogglePanel)
    }

    pub fn toggle_playback(&self) -> bool {
        self.send(PanelEvent::TogglePlayback)
    }

    pub fn seek(&self, offset_x: f64, track_width: f64) -> bool {
        self.send(PanelEvent::Seek {
            offset_x,
            track_width,
        })
    }

    pub fn shutdown(&self) -> bool {
        self.send(PanelEvent::Shutdown)
    }
}

pub struct PanelController<M, V, H> {
    media: Arc<M>,
    view: V,
    hover: H,
    settings: PanelSettings,
    panel_open: bool,
    tooltip_shown: bool,
    tooltip_text: String,
    onboarding: Onboarding,
    attached: bool,
    tx: UnboundedSender<PanelEvent>,
    rx: UnboundedReceiver<PanelEvent>,
    media_rx: UnboundedReceiver<MediaEvent>,
}

impl<M, V, H> PanelController<M, V, H>
where
    M: MediaHandle + 'static,
    V: PanelView,
    H: HoverProbe,
{
    pub fn new(
        media: Arc<M>,
        media_rx: UnboundedReceiver<MediaEvent>,
        view: V,
        hover: H,
        settings: PanelSettings,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let tooltip_text = settings.tooltip_text.clone();
        Self {
            media,
            view,
            hover,
            settings,
            panel_open: false,
            tooltip_shown: false,
            tooltip_text,
            onboarding: Onboarding::Idle,
            attached: false,
            tx,
            rx,
            media_rx,
        }
    }

    pub fn handle(&self) -> PanelHandle {
        PanelHandle {
            tx: self.tx.clone(),
        }
    }

    pub fn media(&self) -> &Arc<M> {
        &self.media
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Always read from the media element, never cached.
    pub fn playback_state(&self) -> PlaybackState {
        self.media.playback_state()
    }

    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn tooltip_shown(&self) -> bool {
        self.tooltip_shown
    }

    pub fn tooltip_text(&self) -> &str {
        &self.tooltip_text
    }

    pub fn onboarding(&self) -> Onboarding {
        self.onboarding
    }

    /// Renders the initial view and starts the onboarding sequence.
    ///
    /// Must be called from within a tokio runtime. Calling it again is a no-op.
    pub fn attach(&mut self) {
        if self.attached {
            return;
        }
        self.attached = true;

        self.view.set_panel_open(self.panel_open);
        self.view.set_tooltip_text(&self.tooltip_text);
        self.view.set_tooltip_shown(false);
        self.render_playback(self.playback_state());

        let duration = self.media.duration();
        if known_duration(duration).is_some() {
            self.on_metadata_loaded(duration);
        }

        self.show_onboarding_tooltip();
        info!(state = %self.playback_state(), "audio panel attached");
    }

    pub fn toggle_panel(&mut self) {
        self.set_panel_open(!self.panel_open);
    }

    /// Starts playback if paused, pauses it otherwise.
    ///
    /// Starting never blocks: the media element is marked playing at once and
    /// the outcome comes back through the loop as `PanelEvent::PlayResolved`.
    /// A request cannot be withdrawn; a toggle while it is pending pauses.
    pub fn toggle_playback(&mut self) {
        if self.media.is_paused() {
            debug!("requesting playback start");
            let request = self.media.play();
            let tx = self.tx.clone();
            tokio::spawn(async move {
                let result = request.await;
                let _ = tx.send(PanelEvent::PlayResolved(result));
            });
        } else {
            self.media.pause();
            debug!("playback paused");
            self.render_playback(PlaybackState::Paused);
        }
    }

    pub fn on_play_resolved(&mut self, result: Result<(), PlayError>) {
        match result {
            Ok(()) => {
                // may already have been paused again while the request was in flight
                let state = self.playback_state();
                debug!(%state, "play request resolved");
                self.render_playback(state);
            }
            Err(err) if !err.needs_user_gesture() => {
                debug!(error = %err, "play request dropped");
                self.render_playback(self.playback_state());
            }
            Err(err) => {
                warn!(error = %err, "playback start refused, asking for manual play");
                self.set_panel_open(true);
                let prompt = self.settings.blocked_prompt.clone();
                self.set_tooltip_text(&prompt);
                self.set_tooltip_shown(true);
                self.render_playback(self.playback_state());
            }
        }
    }

    /// Progress tick. Skipped entirely while the duration is unknown.
    pub fn on_time_update(&mut self, current_time: f64, duration: f64) {
        let Some(percent) = progress_percent(current_time, duration) else {
            return;
        };
        self.view.set_progress(percent);
        self.view.set_current_time(&format_time(current_time));
        self.view.set_duration(&format_time(duration));
    }

    /// Seeks to the point clicked on the track. Returns the seek time, or
    /// `None` if the click was ignored.
    pub fn on_seek_request(&mut self, offset_x: f64, track_width: f64) -> Option<f64> {
        let target = seek_time(offset_x, track_width, self.media.duration())?;
        debug!(offset_x, track_width, target, "seek");
        self.media.set_current_time(target);
        Some(target)
    }

    pub fn on_playback_ended(&mut self) {
        debug!("playback ended");
        self.render_playback(PlaybackState::Paused);
    }

    pub fn on_metadata_loaded(&mut self, duration: f64) {
        if known_duration(duration).is_none() {
            return;
        }
        self.view.set_duration(&format_time(duration));
    }

    pub fn on_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::TimeUpdate {
                current_time,
                duration,
            } => self.on_time_update(current_time, duration),
            MediaEvent::Ended => self.on_playback_ended(),
            MediaEvent::MetadataLoaded { duration } => self.on_metadata_loaded(duration),
        }
    }

    /// Schedules the one-shot reveal. Later calls do nothing.
    pub fn show_onboarding_tooltip(&mut self) {
        if self.onboarding != Onboarding::Idle {
            return;
        }
        self.onboarding = Onboarding::Scheduled;
        fire_after(
            self.settings.schedule.reveal_after,
            self.tx.clone(),
            PanelEvent::TooltipReveal,
        );
    }

    fn reveal_tooltip(&mut self) {
        if self.onboarding != Onboarding::Scheduled {
            return;
        }
        self.onboarding = Onboarding::Shown;
        self.set_tooltip_shown(true);
        fire_after(
            self.settings.schedule.linger,
            self.tx.clone(),
            PanelEvent::TooltipExpire,
        );
    }

    fn expire_tooltip(&mut self) {
        if self.onboarding != Onboarding::Shown {
            return;
        }
        self.onboarding = Onboarding::Done;
        if self.hover.is_hovering() {
            debug!("pointer over toggle, keeping tooltip");
            return;
        }
        self.set_tooltip_shown(false);
    }

    /// Handles one loop event. Returns false on shutdown.
    pub fn dispatch(&mut self, event: PanelEvent) -> bool {
        match event {
            PanelEvent::TogglePanel => self.toggle_panel(),
            PanelEvent::TogglePlayback => self.toggle_playback(),
            PanelEvent::Seek {
                offset_x,
                track_width,
            } => {
                self.on_seek_request(offset_x, track_width);
            }
            PanelEvent::Shutdown => return false,
            PanelEvent::PlayResolved(result) => self.on_play_resolved(result),
            PanelEvent::TooltipReveal => self.reveal_tooltip(),
            PanelEvent::TooltipExpire => self.expire_tooltip(),
        }
        true
    }

    /// Waits for the next event from either channel and handles it.
    pub async fn step(&mut self) -> bool {
        tokio::select! {
            Some(event) = self.rx.recv() => self.dispatch(event),
            Some(event) = self.media_rx.recv() => {
                self.on_media_event(event);
                true
            }
        }
    }

    /// Attaches and processes events until `PanelEvent::Shutdown`.
    pub async fn run(&mut self) {
        self.attach();
        while self.step().await {}
        info!("audio panel shut down");
    }

    fn set_panel_open(&mut self, open: bool) {
        self.panel_open = open;
        self.view.set_panel_open(open);
    }

    fn set_tooltip_shown(&mut self, shown: bool) {
        self.tooltip_shown = shown;
        self.view.set_tooltip_shown(shown);
    }

    fn set_tooltip_text(&mut self, text: &str) {
        self.tooltip_text = text.to_string();
        self.view.set_tooltip_text(text);
    }

    fn render_playback(&mut self, state: PlaybackState) {
        let icon = if state.is_playing() {
            PlayIcon::Pause
        } else {
            PlayIcon::Play
        };
        self.view.set_play_icon(icon);
        self.view.set_visualizer_active(state.is_playing());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::media::{AutoplayPolicy, SimulatedMedia};
    use crate::panel::tooltip::HoverFlag;
    use crate::panel::view::MemoryView;
    use tokio::time::Instant;

    type TestController = PanelController<SimulatedMedia, MemoryView, HoverFlag>;

    fn controller(policy: AutoplayPolicy) -> (TestController, HoverFlag) {
        let (media_tx, media_rx) = mpsc::unbounded_channel();
        let media = Arc::new(SimulatedMedia::new(policy, media_tx));
        let hover = HoverFlag::new();
        let ctrl = PanelController::new(
            media,
            media_rx,
            MemoryView::new(),
            hover.clone(),
            PanelSettings::default(),
        );
        (ctrl, hover)
    }

    #[test]
    fn toggle_panel_flips_visibility() {
        let (mut ctrl, _) = controller(AutoplayPolicy::Allowed);
        ctrl.toggle_panel();
        assert!(ctrl.panel_open());
        assert!(ctrl.view().snapshot().panel_open);
        ctrl.toggle_panel();
        assert!(!ctrl.panel_open());
        assert!(!ctrl.view().snapshot().panel_open);
    }

    #[tokio::test]
    async fn play_then_pause_returns_to_paused() {
        let (mut ctrl, _) = controller(AutoplayPolicy::Allowed);

        ctrl.toggle_playback();
        assert!(ctrl.step().await);
        assert_eq!(ctrl.playback_state(), PlaybackState::Playing);
        assert_eq!(ctrl.view().snapshot().play_icon, PlayIcon::Pause);
        assert!(ctrl.view().snapshot().visualizer_active);

        ctrl.toggle_playback();
        assert_eq!(ctrl.playback_state(), PlaybackState::Paused);
        assert_eq!(ctrl.view().snapshot().play_icon, PlayIcon::Play);
        assert!(!ctrl.view().snapshot().visualizer_active);
    }

    #[tokio::test]
    async fn blocked_play_opens_panel_with_prompt() {
        let (mut ctrl, _) = controller(AutoplayPolicy::Blocked);

        ctrl.toggle_playback();
        assert!(ctrl.step().await);

        assert_eq!(ctrl.playback_state(), PlaybackState::Paused);
        assert!(ctrl.panel_open());
        assert_eq!(ctrl.tooltip_text(), DEFAULT_BLOCKED_PROMPT);
        let snap = ctrl.view().snapshot();
        assert!(snap.panel_open);
        assert!(snap.tooltip_shown);
        assert_eq!(snap.tooltip_text, DEFAULT_BLOCKED_PROMPT);
        assert_eq!(snap.play_icon, PlayIcon::Play);
    }

    #[tokio::test]
    async fn two_queued_toggles_end_paused() {
        let (mut ctrl, _) = controller(AutoplayPolicy::Allowed);
        let handle = ctrl.handle();
        handle.toggle_playback();
        handle.toggle_playback();

        assert!(ctrl.step().await); // play requested
        assert!(ctrl.step().await); // paused while pending
        assert!(ctrl.step().await); // request resolves
        assert_eq!(ctrl.playback_state(), PlaybackState::Paused);
        assert_eq!(ctrl.view().snapshot().play_icon, PlayIcon::Play);
        assert!(!ctrl.view().snapshot().visualizer_active);
    }

    #[tokio::test]
    async fn late_play_result_renders_paused_handle() {
        let (mut ctrl, _) = controller(AutoplayPolicy::Allowed);
        ctrl.toggle_playback();
        assert_eq!(ctrl.playback_state(), PlaybackState::Playing);
        ctrl.toggle_playback();
        assert_eq!(ctrl.playback_state(), PlaybackState::Paused);

        assert!(ctrl.step().await);
        let snap = ctrl.view().snapshot();
        assert_eq!(snap.play_icon, PlayIcon::Play);
        assert!(!snap.visualizer_active);
        assert!(!ctrl.panel_open());
    }

    #[tokio::test]
    async fn aborted_play_does_not_prompt() {
        let (mut ctrl, _) = controller(AutoplayPolicy::Allowed);
        ctrl.toggle_playback();
        ctrl.media().load(60.0);

        assert!(ctrl.step().await); // metadata or the aborted request
        assert!(ctrl.step().await);
        assert_eq!(ctrl.playback_state(), PlaybackState::Paused);
        assert!(!ctrl.panel_open());
        assert_eq!(ctrl.tooltip_text(), DEFAULT_TOOLTIP_TEXT);
        assert_eq!(ctrl.view().snapshot().play_icon, PlayIcon::Play);
    }

    #[tokio::test]
    async fn manual_play_after_gesture_succeeds() {
        let (mut ctrl, _) = controller(AutoplayPolicy::Blocked);
        ctrl.toggle_playback();
        ctrl.step().await;

        ctrl.media().unlock();
        ctrl.toggle_playback();
        ctrl.step().await;
        assert_eq!(ctrl.playback_state(), PlaybackState::Playing);
        assert!(ctrl.panel_open());
    }

    #[test]
    fn time_update_renders_progress_and_readouts() {
        let (mut ctrl, _) = controller(AutoplayPolicy::Allowed);
        ctrl.on_time_update(65.0, 130.0);
        let snap = ctrl.view().snapshot();
        assert_eq!(snap.progress_percent, 50.0);
        assert_eq!(snap.current_time, "1:05");
        assert_eq!(snap.duration, "2:10");
    }

    #[test]
    fn time_update_without_duration_is_noop() {
        let (mut ctrl, _) = controller(AutoplayPolicy::Allowed);
        ctrl.on_time_update(10.0, 100.0);
        let before = ctrl.view().snapshot().clone();
        let writes = ctrl.view().writes();

        ctrl.on_time_update(20.0, f64::NAN);
        assert_eq!(ctrl.view().writes(), writes);
        assert_eq!(ctrl.view().snapshot(), &before);
    }

    #[test]
    fn seek_is_ignored_until_duration_known() {
        let (mut ctrl, _) = controller(AutoplayPolicy::Allowed);
        assert_eq!(ctrl.on_seek_request(50.0, 200.0), None);
        assert_eq!(ctrl.media().current_time(), 0.0);

        ctrl.media().load(120.0);
        assert_eq!(ctrl.on_seek_request(50.0, 200.0), Some(30.0));
        assert_eq!(ctrl.media().current_time(), 30.0);
    }

    #[tokio::test]
    async fn seek_round_trip_matches_click_ratio() {
        let (mut ctrl, _) = controller(AutoplayPolicy::Allowed);
        ctrl.media().load(240.0);
        assert!(ctrl.step().await); // metadata

        ctrl.on_seek_request(75.0, 300.0);
        assert!(ctrl.step().await); // time update from the seek
        let snap = ctrl.view().snapshot();
        assert!((snap.progress_percent - 25.0).abs() < 1e-9);
        assert_eq!(snap.current_time, "1:00");
        assert_eq!(snap.duration, "4:00");
    }

    #[tokio::test]
    async fn ended_resets_indicators_but_not_panel() {
        let (mut ctrl, _) = controller(AutoplayPolicy::Allowed);
        ctrl.media().load(1.0);
        ctrl.step().await;
        ctrl.toggle_panel();
        ctrl.toggle_playback();
        ctrl.step().await;
        assert_eq!(ctrl.view().snapshot().play_icon, PlayIcon::Pause);

        ctrl.media().advance(2.0);
        ctrl.step().await; // time update
        ctrl.step().await; // ended
        let snap = ctrl.view().snapshot();
        assert_eq!(snap.play_icon, PlayIcon::Play);
        assert!(!snap.visualizer_active);
        assert!(snap.panel_open);
        assert_eq!(snap.progress_percent, 100.0);
    }

    #[tokio::test]
    async fn attach_renders_known_duration_immediately() {
        let (mut ctrl, _) = controller(AutoplayPolicy::Allowed);
        ctrl.media().load(185.0);
        ctrl.attach();
        assert_eq!(ctrl.view().snapshot().duration, "3:05");
        assert_eq!(ctrl.view().snapshot().tooltip_text, DEFAULT_TOOLTIP_TEXT);
    }

    #[tokio::test(start_paused = true)]
    async fn onboarding_tooltip_shows_then_hides() {
        let (mut ctrl, _) = controller(AutoplayPolicy::Allowed);
        let start = Instant::now();
        ctrl.attach();
        assert_eq!(ctrl.onboarding(), Onboarding::Scheduled);

        assert!(ctrl.step().await);
        assert!(ctrl.tooltip_shown());
        assert!(ctrl.view().snapshot().tooltip_shown);
        assert!(start.elapsed() >= Duration::from_secs(3));
        assert!(start.elapsed() < Duration::from_secs(4));

        assert!(ctrl.step().await);
        assert!(!ctrl.tooltip_shown());
        assert!(!ctrl.view().snapshot().tooltip_shown);
        assert!(start.elapsed() >= Duration::from_secs(7));
        assert!(start.elapsed() < Duration::from_secs(8));
        assert_eq!(ctrl.onboarding(), Onboarding::Done);
    }

    #[tokio::test(start_paused = true)]
    async fn onboarding_tooltip_stays_while_hovered() {
        let (mut ctrl, hover) = controller(AutoplayPolicy::Allowed);
        ctrl.attach();
        ctrl.step().await;

        hover.set(true);
        ctrl.step().await;
        assert!(ctrl.tooltip_shown());
        assert_eq!(ctrl.onboarding(), Onboarding::Done);
    }

    #[tokio::test(start_paused = true)]
    async fn onboarding_is_one_shot() {
        let (mut ctrl, _) = controller(AutoplayPolicy::Allowed);
        ctrl.attach();
        ctrl.attach();
        ctrl.show_onboarding_tooltip();
        ctrl.step().await;
        ctrl.step().await;
        assert_eq!(ctrl.onboarding(), Onboarding::Done);

        // nothing else is pending: a second reveal would arrive before this
        let handle = ctrl.handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            handle.shutdown();
        });
        assert!(!ctrl.step().await);
        assert!(!ctrl.tooltip_shown());
    }

    #[tokio::test]
    async fn handle_drives_the_loop() {
        let (mut ctrl, _) = controller(AutoplayPolicy::Allowed);
        let handle = ctrl.handle();
        assert!(handle.toggle_panel());
        assert!(handle.seek(10.0, 100.0));
        assert!(handle.shutdown());

        ctrl.run().await;
        assert!(ctrl.panel_open());
        assert_eq!(ctrl.media().current_time(), 0.0);
    }
}

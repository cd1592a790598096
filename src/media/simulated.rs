use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::{MediaHandle, PlayRequest};
use crate::error::PlayError;
use crate::playback::{known_duration, MediaEvent};

/// Whether the environment lets audio start without a user gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoplayPolicy {
    #[default]
    Allowed,
    Blocked,
}

#[derive(Debug)]
struct Inner {
    paused: bool,
    current_time: f64,
    duration: f64,
    policy: AutoplayPolicy,
    /// Bumped by `load`; pending play requests from an older load abort.
    generation: u64,
}

/// An in-process stand-in for a browser audio element.
///
/// Time only moves when `advance` is called, usually from `spawn_clock`.
pub struct SimulatedMedia {
    inner: Arc<Mutex<Inner>>,
    events: UnboundedSender<MediaEvent>,
}

impl SimulatedMedia {
    pub fn new(policy: AutoplayPolicy, events: UnboundedSender<MediaEvent>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                paused: true,
                current_time: 0.0,
                duration: f64::NAN,
                policy,
                generation: 0,
            })),
            events,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }

    fn emit(&self, event: MediaEvent) {
        // receiver gone means nobody is rendering anymore
        let _ = self.events.send(event);
    }

    /// Makes the track length known and rewinds to the start. Aborts any
    /// play request still pending.
    pub fn load(&self, duration: f64) {
        {
            let mut inner = self.lock();
            inner.duration = duration;
            inner.current_time = 0.0;
            inner.paused = true;
            inner.generation += 1;
        }
        debug!(duration, "media metadata loaded");
        self.emit(MediaEvent::MetadataLoaded { duration });
    }

    pub fn policy(&self) -> AutoplayPolicy {
        self.lock().policy
    }

    /// Records a user gesture, after which play requests are allowed.
    pub fn unlock(&self) {
        let mut inner = self.lock();
        if inner.policy == AutoplayPolicy::Blocked {
            debug!("user gesture unlocked playback");
            inner.policy = AutoplayPolicy::Allowed;
        }
    }

    /// Moves playback forward by `elapsed` seconds if playing.
    pub fn advance(&self, elapsed: f64) {
        let (current_time, duration, ended) = {
            let mut inner = self.lock();
            if inner.paused {
                return;
            }
            inner.current_time += elapsed;
            let ended = match known_duration(inner.duration) {
                Some(d) if inner.current_time >= d => {
                    inner.current_time = d;
                    inner.paused = true;
                    true
                }
                _ => false,
            };
            (inner.current_time, inner.duration, ended)
        };

        self.emit(MediaEvent::TimeUpdate {
            current_time,
            duration,
        });
        if ended {
            debug!("track ended");
            self.emit(MediaEvent::Ended);
        }
    }

    /// Drives `advance` from a tokio interval until the event receiver goes away.
    pub fn spawn_clock(self: &Arc<Self>, tick: Duration) -> JoinHandle<()> {
        let media = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                if media.events.is_closed() {
                    break;
                }
                media.advance(tick.as_secs_f64());
            }
        })
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(|e| e.into_inner())
}

impl MediaHandle for SimulatedMedia {
    fn is_paused(&self) -> bool {
        self.lock().paused
    }

    fn current_time(&self) -> f64 {
        self.lock().current_time
    }

    fn duration(&self) -> f64 {
        self.lock().duration
    }

    fn set_current_time(&self, secs: f64) {
        let (current_time, duration) = {
            let mut inner = self.lock();
            let upper = known_duration(inner.duration).unwrap_or(f64::MAX);
            if !secs.is_nan() {
                inner.current_time = secs.clamp(0.0, upper);
            }
            (inner.current_time, inner.duration)
        };
        self.emit(MediaEvent::TimeUpdate {
            current_time,
            duration,
        });
    }

    fn play(&self) -> PlayRequest {
        let (allowed, generation) = {
            let mut inner = self.lock();
            // playing a finished track starts it over
            if let Some(d) = known_duration(inner.duration) {
                if inner.current_time >= d {
                    inner.current_time = 0.0;
                }
            }
            inner.paused = false;
            (inner.policy == AutoplayPolicy::Allowed, inner.generation)
        };

        let shared = Arc::clone(&self.inner);
        async move {
            let mut inner = lock(&shared);
            if inner.generation != generation {
                return Err(PlayError::Aborted);
            }
            if !allowed {
                inner.paused = true;
                return Err(PlayError::NotAllowed);
            }
            Ok(())
        }
        .boxed()
    }

    fn pause(&self) {
        self.lock().paused = true;
    }
}

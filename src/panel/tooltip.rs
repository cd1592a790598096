//! Onboarding tooltip timing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Reports whether the pointer is over the panel toggle right now.
pub trait HoverProbe: Send + Sync {
    fn is_hovering(&self) -> bool;
}

impl<F> HoverProbe for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_hovering(&self) -> bool {
        self()
    }
}

/// A hover state shared with whatever tracks the pointer.
#[derive(Debug, Clone, Default)]
pub struct HoverFlag(Arc<AtomicBool>);

impl HoverFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, hovering: bool) {
        self.0.store(hovering, Ordering::Relaxed);
    }

    /// Flips the flag and returns the new value.
    pub fn toggle(&self) -> bool {
        !self.0.fetch_xor(true, Ordering::Relaxed)
    }
}

impl HoverProbe for HoverFlag {
    fn is_hovering(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipSchedule {
    /// Delay between attach and the tooltip appearing.
    pub reveal_after: Duration,
    /// How long it stays before the hover check.
    pub linger: Duration,
}

impl Default for TooltipSchedule {
    fn default() -> Self {
        Self {
            reveal_after: Duration::from_secs(3),
            linger: Duration::from_secs(4),
        }
    }
}

/// Where the one-shot onboarding sequence is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Onboarding {
    #[default]
    Idle,
    Scheduled,
    Shown,
    Done,
}

/// Sends `event` on `tx` once `delay` has elapsed.
pub(crate) fn fire_after<E>(delay: Duration, tx: UnboundedSender<E>, event: E) -> JoinHandle<()>
where
    E: Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(event);
    })
}

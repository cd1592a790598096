pub mod controller;
pub mod tooltip;
pub mod view;

pub use controller::{PanelController, PanelEvent, PanelHandle, PanelSettings};
pub use tooltip::{HoverFlag, HoverProbe, Onboarding, TooltipSchedule};
pub use view::{MemoryView, PanelSnapshot, PanelView, PlayIcon};

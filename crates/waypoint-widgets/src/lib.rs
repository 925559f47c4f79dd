#![forbid(unsafe_code)]

//! Render-layer descriptions for Waypoint tours.
//!
//! Nothing in this crate touches a DOM. Each type describes one piece of the
//! portal (overlay, spotlight cutout, tooltip, controls, progress, beacon) as
//! plain serializable data; hosts paint it.

pub mod beacon;
pub mod controls;
pub mod frame;
pub mod overlay;
pub mod progress;
pub mod tooltip;

pub use beacon::Beacon;
pub use controls::{CONTROL_MARKER, ControlAction, ControlButton, Controls};
pub use frame::{Anchor, FrameInput, PORTAL_Z_INDEX, StepPhase, TourFrame};
pub use overlay::{Overlay, Spotlight};
pub use progress::Progress;
pub use tooltip::Tooltip;

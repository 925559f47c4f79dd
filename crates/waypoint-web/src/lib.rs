#![forbid(unsafe_code)]

//! `waypoint-web` hosts Waypoint tours on a page.
//!
//! Design goals:
//! - **Host-driven time**: timers fire when the host ticks; nothing sleeps.
//! - **Deterministic testing**: [`HeadlessDom`] runs the whole controller
//!   natively with a hand-advanced clock.
//! - **No threads**: suitable for `wasm32-unknown-unknown`.
//!
//! On `wasm32` the crate additionally exports `WaypointTour` through
//! `wasm-bindgen`, backed by a `web-sys` host and the HTML [`portal`]
//! painter.

pub mod headless;
pub mod portal;

#[cfg(target_arch = "wasm32")]
pub mod browser;
#[cfg(target_arch = "wasm32")]
mod wasm;

pub use headless::{
    DeterministicClock, HeadlessDom, HeadlessError, ListenerGuard, ListenerStats, NodeId,
    ScrollRecord, advance, pump,
};
pub use portal::{PORTAL_ROOT_ID, render_html};

#[cfg(target_arch = "wasm32")]
pub use wasm::WaypointTour;

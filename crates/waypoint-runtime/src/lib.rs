#![forbid(unsafe_code)]

//! Runtime: the stateful half of a Waypoint tour.
//!
//! # Role in Waypoint
//! `waypoint-runtime` drives a tour against any [`waypoint_backend::Host`]. It
//! owns the run-state reducer, the controller that sequences steps, the
//! position tracker and its debounced listeners, the scroll coordinator, and
//! host-driven timers for auto-completion and missing-target retries.
//!
//! # How it fits in the system
//! Pure computations (validation, placement, ARIA, keys) come from
//! `waypoint-core`; frame descriptions come from `waypoint-widgets`. Hosts in
//! `waypoint-web` feed signals and ticks in and paint frames out.

pub mod callbacks;
pub mod controller;
pub mod reducer;
pub mod scroll;
pub mod timer;
pub mod tracker;

pub use callbacks::TourCallbacks;
pub use controller::{DEFAULT_TOOLTIP_HEIGHT, EndReason, MISSING_TARGET_RETRY, TourController};
pub use reducer::{TourAction, TourRunState};
pub use scroll::{ScrollOutcome, bring_into_view};
pub use timer::{DEFAULT_DEBOUNCE, Debouncer, Timer};
pub use tracker::PositionTracker;

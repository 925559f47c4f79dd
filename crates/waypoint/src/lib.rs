#![forbid(unsafe_code)]

//! Waypoint public facade crate.
//!
//! Re-exports the types a host needs to define, validate, and drive a guided
//! tour, plus a prelude for day-to-day usage.
//!
//! ```
//! use waypoint::prelude::*;
//!
//! let page = HeadlessDom::new(1024.0, 768.0)
//!     .with_element("#header", Rect::new(0.0, 0.0, 1024.0, 64.0));
//! let mut tour = TourController::new(page);
//! tour.start(
//!     vec![Step::new("intro", "#header", "Welcome", "This is the header.")],
//!     &ConfigOverride::default(),
//! )
//! .unwrap();
//! assert!(tour.is_active());
//! ```

// --- Core re-exports -------------------------------------------------------

pub use waypoint_core::{
    AriaAttributes, Breakpoint, ButtonLabels, ConfigOverride, ElementGeometry, FocusTarget,
    KeyCommand, NavKey, Placement, PlacementOptions, ProgressType, Rect, ResolvedPlacement, Result,
    ScrollBehavior, ScrollOffset, Side, Size, Step, StepContent, StepUpdate, Theme, TourConfig,
    TourError, Transform, ValidationReport, Viewport, command_for_key, parse_steps_json,
    resolve_placement, validate_config_json, validate_steps, validate_steps_json,
};

// --- Host re-exports -------------------------------------------------------

pub use waypoint_backend::{DomSignal, Host, HostClock};

// --- Widget re-exports -----------------------------------------------------

pub use waypoint_widgets::{
    Anchor, Beacon, ControlAction, ControlButton, Controls, Overlay, Progress, Spotlight,
    StepPhase, Tooltip, TourFrame,
};

// --- Runtime re-exports ----------------------------------------------------

pub use waypoint_runtime::{EndReason, TourAction, TourCallbacks, TourController, TourRunState};

#[cfg(feature = "web")]
pub use waypoint_web::{HeadlessDom, render_html};

/// Prelude for quick imports in hosts and tests.
pub mod prelude {
    pub use crate::{
        ConfigOverride, ControlAction, FocusTarget, Host, Placement, Rect, Result, Step,
        StepUpdate, TourCallbacks, TourConfig, TourController, TourError, TourFrame,
    };

    #[cfg(feature = "web")]
    pub use crate::HeadlessDom;

    pub use crate::{backend, core, runtime, widgets};

    #[cfg(feature = "web")]
    pub use crate::web;
}

pub use waypoint_backend as backend;
pub use waypoint_core as core;
pub use waypoint_runtime as runtime;
#[cfg(feature = "web")]
pub use waypoint_web as web;
pub use waypoint_widgets as widgets;

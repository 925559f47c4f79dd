#![forbid(unsafe_code)]

//! Core: the host-agnostic model behind Waypoint guided tours.
//!
//! # Role in Waypoint
//! `waypoint-core` owns every pure computation a tour needs. Nothing here
//! touches a DOM, a clock, or a listener; the runtime (`waypoint-runtime`)
//! feeds it measurements and acts on the results.
//!
//! # Primary responsibilities
//! - **Step**: the step descriptor and partial step updates.
//! - **TourConfig**: defaults, per-tour overrides, responsive tiers.
//! - **Validation**: aggregate step-list errors and advisory config errors.
//! - **Geometry**: client/document rectangles and visibility checks.
//! - **Placement**: side selection and viewport clamping for tooltips.
//! - **Accessibility and keys**: ARIA synthesis and keyboard mapping.

pub mod a11y;
pub mod config;
pub mod error;
pub mod geometry;
pub mod keys;
pub mod placement;
pub mod step;
pub mod validate;

pub use a11y::AriaAttributes;
pub use config::{
    Breakpoint, ButtonLabels, ConfigOverride, LayoutMetrics, ProgressType, ResponsiveOverride,
    ScrollBehavior, Theme, TourConfig, validate_config_json,
};
pub use error::{Result, TourError};
pub use geometry::{ElementGeometry, Rect, ScrollOffset, Size, Viewport};
pub use keys::{FocusTarget, KeyCommand, NavKey, command_for_key};
pub use placement::{PlacementOptions, ResolvedPlacement, Transform, resolve_placement};
pub use step::{Placement, Side, Step, StepContent, StepUpdate};
pub use validate::{ValidationReport, parse_steps_json, validate_steps, validate_steps_json};

#![forbid(unsafe_code)]

//! Tooltip dialog description.

use serde::Serialize;
use waypoint_core::a11y::{self, AriaAttributes};
use waypoint_core::config::{Theme, TourConfig};
use waypoint_core::placement::{ResolvedPlacement, Transform};
use waypoint_core::step::{Side, Step, StepContent};

use crate::controls::Controls;
use crate::progress::Progress;

/// Base class on every tooltip.
pub const TOOLTIP_CLASS: &str = "waypoint-tooltip";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub top: f64,
    pub left: f64,
    pub transform: Transform,
    /// Side of the target the tooltip sits on.
    pub placement: Side,
    /// Edge of the tooltip carrying the arrow (faces the target).
    pub arrow: Side,
    pub max_width: f64,
    pub class_list: Vec<String>,
    pub aria: AriaAttributes,
    pub title: String,
    pub title_id: String,
    pub content: StepContent,
    pub content_id: String,
    pub progress: Option<Progress>,
    pub controls: Controls,
}

impl Tooltip {
    pub fn new(
        step: &Step,
        index: usize,
        total: usize,
        placement: &ResolvedPlacement,
        config: &TourConfig,
        max_width: f64,
    ) -> Self {
        Self {
            top: placement.top,
            left: placement.left,
            transform: placement.transform,
            placement: placement.placement,
            arrow: placement.placement.opposite(),
            max_width,
            class_list: class_list(placement.placement, config.theme, step.custom_class.as_deref()),
            aria: AriaAttributes::for_step(step, index, total),
            title: step.title.clone(),
            title_id: a11y::title_element_id(step),
            content: step.content.clone(),
            content_id: a11y::content_element_id(step),
            progress: config
                .show_progress
                .then(|| Progress::new(config.progress_type, index, total)),
            controls: Controls::for_step(index, total, config),
        }
    }

    /// Space-separated `class` attribute value.
    pub fn class_attr(&self) -> String {
        self.class_list.join(" ")
    }
}

/// Classes for a tooltip: base, side modifier, theme, then the step's own.
pub fn class_list(side: Side, theme: Theme, custom: Option<&str>) -> Vec<String> {
    let mut classes = vec![
        TOOLTIP_CLASS.to_owned(),
        format!("{TOOLTIP_CLASS}--{}", side.as_str()),
        format!("waypoint-theme-{}", theme.as_str()),
    ];
    if let Some(custom) = custom.map(str::trim).filter(|c| !c.is_empty()) {
        classes.extend(custom.split_whitespace().map(str::to_owned));
    }
    classes
}

#![forbid(unsafe_code)]

//! Tooltip control buttons.
//!
//! Every rendered button carries [`CONTROL_MARKER`] so a host can tell that
//! keyboard focus sits on a tour control and skip the Enter/Space shortcut.

use serde::{Deserialize, Serialize};
use waypoint_core::config::TourConfig;

/// Attribute name placed on every rendered control element.
pub const CONTROL_MARKER: &str = "data-waypoint-control";

/// What a control does when activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    Back,
    /// Advance; completes the tour on the last step.
    Next,
    Skip,
    Close,
}

impl ControlAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Back => "back",
            Self::Next => "next",
            Self::Skip => "skip",
            Self::Close => "close",
        }
    }

    /// Parse a marker value.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "back" => Some(Self::Back),
            "next" => Some(Self::Next),
            "skip" => Some(Self::Skip),
            "close" => Some(Self::Close),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlButton {
    pub action: ControlAction,
    pub label: String,
    /// Value of [`CONTROL_MARKER`] on the rendered element.
    pub marker: &'static str,
}

impl ControlButton {
    pub fn new(action: ControlAction, label: impl Into<String>) -> Self {
        Self {
            action,
            label: label.into(),
            marker: action.as_str(),
        }
    }
}

/// The button row of a tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Controls {
    pub back: Option<ControlButton>,
    /// Next, or Done on the last step.
    pub primary: ControlButton,
    pub skip: Option<ControlButton>,
    pub close: Option<ControlButton>,
    pub is_last_step: bool,
}

impl Controls {
    /// Controls for the step at `index` of `total`.
    pub fn for_step(index: usize, total: usize, config: &TourConfig) -> Self {
        let labels = &config.labels;
        let is_last_step = index + 1 >= total;
        let primary_label = if is_last_step {
            &labels.done
        } else {
            &labels.next
        };
        Self {
            back: (index > 0 && config.show_back_button)
                .then(|| ControlButton::new(ControlAction::Back, &labels.back)),
            primary: ControlButton::new(ControlAction::Next, primary_label),
            skip: config
                .show_skip_button
                .then(|| ControlButton::new(ControlAction::Skip, &labels.skip)),
            close: config
                .show_close_button
                .then(|| ControlButton::new(ControlAction::Close, &labels.close)),
            is_last_step,
        }
    }

    /// Rendered buttons in visual order.
    pub fn buttons(&self) -> impl Iterator<Item = &ControlButton> {
        self.back
            .iter()
            .chain(std::iter::once(&self.primary))
            .chain(self.skip.iter())
            .chain(self.close.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_has_no_back() {
        let controls = Controls::for_step(0, 3, &TourConfig::default());
        assert!(controls.back.is_none());
        assert_eq!(controls.primary.label, "Next");
        assert!(!controls.is_last_step);
    }

    #[test]
    fn last_step_primary_reads_done() {
        let controls = Controls::for_step(2, 3, &TourConfig::default());
        assert_eq!(controls.primary.label, "Done");
        assert_eq!(controls.primary.action, ControlAction::Next);
        assert_eq!(controls.back.as_ref().map(|b| b.label.as_str()), Some("Back"));
        assert!(controls.is_last_step);
    }

    #[test]
    fn disabled_buttons_are_absent() {
        let config = TourConfig {
            show_skip_button: false,
            show_close_button: false,
            show_back_button: false,
            ..TourConfig::default()
        };
        let controls = Controls::for_step(1, 3, &config);
        let actions: Vec<_> = controls.buttons().map(|b| b.action).collect();
        assert_eq!(actions, [ControlAction::Next]);
    }

    #[test]
    fn buttons_in_visual_order_with_markers() {
        let controls = Controls::for_step(1, 3, &TourConfig::default());
        let markers: Vec<_> = controls.buttons().map(|b| b.marker).collect();
        assert_eq!(markers, ["back", "next", "skip", "close"]);
        for marker in markers {
            assert!(ControlAction::parse(marker).is_some());
        }
    }
}

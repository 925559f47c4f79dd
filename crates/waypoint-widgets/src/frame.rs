#![forbid(unsafe_code)]

//! Whole-frame description handed to a portal painter.
//!
//! A [`TourFrame`] is everything a host needs to paint one pass of the tour:
//! the overlay, and, when the step target resolved, either the beacon or the
//! tooltip. It is rebuilt from scratch on every pass.

use serde::Serialize;
use waypoint_core::a11y;
use waypoint_core::config::TourConfig;
use waypoint_core::geometry::ElementGeometry;
use waypoint_core::placement::ResolvedPlacement;
use waypoint_core::step::Step;

use crate::beacon::Beacon;
use crate::overlay::{Overlay, Spotlight};
use crate::tooltip::Tooltip;

/// Stacking order of the portal root.
pub const PORTAL_Z_INDEX: u32 = 10_000;

/// Whether a step currently shows its beacon or its tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepPhase {
    /// Waiting for the user to click the beacon.
    Beacon,
    #[default]
    Tooltip,
}

impl StepPhase {
    /// Phase a step starts in.
    pub fn initial(step: &Step) -> Self {
        if step.show_beacon {
            Self::Beacon
        } else {
            Self::Tooltip
        }
    }
}

/// Where the current step's target is and where its tooltip goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub geometry: ElementGeometry,
    pub placement: ResolvedPlacement,
}

/// Inputs to [`TourFrame::build`].
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub step: &'a Step,
    pub index: usize,
    pub total: usize,
    pub config: &'a TourConfig,
    /// `None` while the target is missing.
    pub anchor: Option<Anchor>,
    pub phase: StepPhase,
    /// Responsive tooltip width.
    pub max_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourFrame {
    pub z_index: u32,
    pub step_id: String,
    pub step_index: usize,
    pub phase: StepPhase,
    pub overlay: Overlay,
    pub beacon: Option<Beacon>,
    pub tooltip: Option<Tooltip>,
}

impl TourFrame {
    pub fn build(input: &FrameInput<'_>) -> Self {
        let FrameInput {
            step,
            index,
            total,
            config,
            anchor,
            phase,
            max_width,
        } = *input;

        let mut overlay =
            Overlay::new(config.overlay_color.clone()).closes_on_click(config.close_on_overlay_click);
        let mut beacon = None;
        let mut tooltip = None;

        if let Some(anchor) = anchor {
            overlay = overlay.spotlight(
                Spotlight::around(&anchor.geometry, config.spotlight_padding)
                    .target_interactive(!step.block_interaction),
            );
            match phase {
                StepPhase::Beacon => {
                    beacon = Some(Beacon::at(
                        &anchor.geometry,
                        anchor.placement.placement,
                        a11y::beacon_label(step),
                    ));
                }
                StepPhase::Tooltip => {
                    tooltip = Some(Tooltip::new(
                        step,
                        index,
                        total,
                        &anchor.placement,
                        config,
                        max_width,
                    ));
                }
            }
        }

        Self {
            z_index: PORTAL_Z_INDEX,
            step_id: step.id.clone(),
            step_index: index,
            phase,
            overlay,
            beacon,
            tooltip,
        }
    }

    /// Whether anything besides the bare overlay is shown.
    pub fn has_target(&self) -> bool {
        self.overlay.spotlight.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use waypoint_core::geometry::Rect;
    use waypoint_core::placement::Transform;
    use waypoint_core::step::Side;

    fn anchor() -> Anchor {
        Anchor {
            geometry: ElementGeometry::from_document_rect(Rect::new(100.0, 100.0, 50.0, 20.0)),
            placement: ResolvedPlacement {
                top: 132.0,
                left: 125.0,
                transform: Transform::CenterX,
                placement: Side::Bottom,
            },
        }
    }

    fn input<'a>(step: &'a Step, config: &'a TourConfig) -> FrameInput<'a> {
        FrameInput {
            step,
            index: 0,
            total: 2,
            config,
            anchor: Some(anchor()),
            phase: StepPhase::Tooltip,
            max_width: config.max_width,
        }
    }

    #[test]
    fn missing_target_renders_bare_overlay() {
        let step = Step::new("a", "#missing", "A", "body");
        let config = TourConfig::default();
        let frame = TourFrame::build(&FrameInput {
            anchor: None,
            ..input(&step, &config)
        });
        assert!(!frame.has_target());
        assert!(frame.beacon.is_none());
        assert!(frame.tooltip.is_none());
        assert_eq!(frame.overlay.color, "rgba(0, 0, 0, 0.5)");
    }

    #[test]
    fn beacon_phase_hides_tooltip() {
        let step = Step::new("a", "#a", "A", "body");
        let config = TourConfig::default();
        let frame = TourFrame::build(&FrameInput {
            phase: StepPhase::Beacon,
            ..input(&step, &config)
        });
        assert!(frame.tooltip.is_none());
        let beacon = frame.beacon.unwrap();
        assert_eq!(beacon.side, Side::Bottom);
        assert_eq!(beacon.label, "Open tour step: A");
    }

    #[test]
    fn blocking_step_makes_cutout_inert() {
        let step = Step::new("a", "#a", "A", "body").block_interaction(true);
        let config = TourConfig::default();
        let frame = TourFrame::build(&input(&step, &config));
        let spotlight = frame.overlay.spotlight.unwrap();
        assert!(!spotlight.target_interactive);
        assert_eq!(spotlight.rect, Rect::new(92.0, 92.0, 66.0, 36.0));
        assert!(frame.tooltip.is_some());
    }

    #[test]
    fn initial_phase_follows_show_beacon() {
        let step = Step::new("a", "#a", "A", "body");
        assert_eq!(StepPhase::initial(&step), StepPhase::Beacon);
        assert_eq!(
            StepPhase::initial(&step.show_beacon(false)),
            StepPhase::Tooltip
        );
    }
}

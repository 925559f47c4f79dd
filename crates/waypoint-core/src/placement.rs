#![forbid(unsafe_code)]

//! Tooltip placement against live viewport geometry.
//!
//! [`resolve_placement`] picks the side of the target the tooltip is anchored
//! to and returns a clamped `top`/`left`/`transform` triple in document
//! coordinates.
//!
//! # Algorithm
//!
//! 1. An explicit side is used as-is. `auto` walks [`Side::AUTO_ORDER`]
//!    (bottom, top, right, left) and takes the first side where the tooltip
//!    plus `spacing` fits between the target edge and the viewport edge. If
//!    nothing fits the result is `bottom`.
//! 2. Top/bottom center horizontally on the target (`translateX(-50%)`),
//!    left/right center vertically (`translateY(-50%)`).
//! 3. The box is clamped into the visible window inset by `spacing`. Clamping
//!    a centered axis drops that axis' centering transform. The side chosen in
//!    step 1 never changes, so arrow styling stays consistent.
//!
//! # Invariants
//!
//! 1. Pure: identical inputs give bit-identical outputs.
//! 2. Always defined: there is no "no placement" outcome.
//! 3. When the tooltip plus `2 * spacing` fits the viewport on an axis, the
//!    final box lies inside the inset window on that axis.

use serde::{Deserialize, Serialize};

use crate::geometry::{ElementGeometry, Rect, Size, Viewport};
use crate::step::{Placement, Side};

/// Solver knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementOptions {
    /// Gap between target edge and tooltip edge, and minimum inset from the
    /// viewport edges.
    pub spacing: f64,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            spacing: crate::config::DEFAULT_SPACING,
        }
    }
}

/// CSS transform applied to the tooltip box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transform {
    /// Absolute positioning; `left`/`top` is the box corner.
    #[serde(rename = "none")]
    None,
    /// `left` is the horizontal center of the box.
    #[serde(rename = "translateX(-50%)")]
    CenterX,
    /// `top` is the vertical center of the box.
    #[serde(rename = "translateY(-50%)")]
    CenterY,
}

impl Transform {
    pub const fn css(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::CenterX => "translateX(-50%)",
            Self::CenterY => "translateY(-50%)",
        }
    }
}

/// Where the tooltip for the current step renders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlacement {
    pub top: f64,
    pub left: f64,
    pub transform: Transform,
    pub placement: Side,
}

impl ResolvedPlacement {
    /// The rendered tooltip box in document coordinates.
    pub fn box_rect(&self, tooltip: Size) -> Rect {
        let (x, y) = match self.transform {
            Transform::None => (self.left, self.top),
            Transform::CenterX => (self.left - tooltip.width / 2.0, self.top),
            Transform::CenterY => (self.left, self.top - tooltip.height / 2.0),
        };
        Rect::new(x, y, tooltip.width, tooltip.height)
    }
}

/// Whether the tooltip fits on `side` of the target inside the visible window.
pub fn fits(
    side: Side,
    target: &ElementGeometry,
    tooltip: Size,
    viewport: &Viewport,
    spacing: f64,
) -> bool {
    let window = viewport.document_rect();
    match side {
        Side::Bottom => target.bottom + spacing + tooltip.height <= window.bottom(),
        Side::Top => target.top - spacing - tooltip.height >= window.top(),
        Side::Right => target.right + spacing + tooltip.width <= window.right(),
        Side::Left => target.left - spacing - tooltip.width >= window.left(),
    }
}

/// Pick the side for `requested`.
pub fn choose_side(
    requested: Placement,
    target: &ElementGeometry,
    tooltip: Size,
    viewport: &Viewport,
    spacing: f64,
) -> Side {
    if let Some(side) = requested.side() {
        return side;
    }
    Side::AUTO_ORDER
        .into_iter()
        .find(|&side| fits(side, target, tooltip, viewport, spacing))
        .unwrap_or(Side::Bottom)
}

/// Resolve the tooltip position for one render pass.
pub fn resolve_placement(
    target: &ElementGeometry,
    tooltip: Size,
    viewport: &Viewport,
    requested: Placement,
    options: &PlacementOptions,
) -> ResolvedPlacement {
    let tooltip = tooltip.sanitized();
    let spacing = if options.spacing.is_finite() {
        options.spacing.max(0.0)
    } else {
        0.0
    };
    let side = choose_side(requested, target, tooltip, viewport, spacing);

    let (mut left, mut top, mut center_x, mut center_y) = match side {
        Side::Bottom => (target.center_x, target.bottom + spacing, true, false),
        Side::Top => (
            target.center_x,
            target.top - spacing - tooltip.height,
            true,
            false,
        ),
        Side::Right => (target.right + spacing, target.center_y, false, true),
        Side::Left => (
            target.left - spacing - tooltip.width,
            target.center_y,
            false,
            true,
        ),
    };

    let window = viewport.document_rect();

    let box_left = if center_x {
        left - tooltip.width / 2.0
    } else {
        left
    };
    let clamped_left = clamp_edge(
        box_left,
        window.left() + spacing,
        window.right() - spacing - tooltip.width,
    );
    if clamped_left != box_left {
        left = clamped_left;
        center_x = false;
    }

    let box_top = if center_y {
        top - tooltip.height / 2.0
    } else {
        top
    };
    let clamped_top = clamp_edge(
        box_top,
        window.top() + spacing,
        window.bottom() - spacing - tooltip.height,
    );
    if clamped_top != box_top {
        top = clamped_top;
        center_y = false;
    }

    let transform = if center_x {
        Transform::CenterX
    } else if center_y {
        Transform::CenterY
    } else {
        Transform::None
    };

    ResolvedPlacement {
        top,
        left,
        transform,
        placement: side,
    }
}

/// Clamp a box edge into `[min, max]`, preferring `min` when the box is
/// larger than the window.
fn clamp_edge(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

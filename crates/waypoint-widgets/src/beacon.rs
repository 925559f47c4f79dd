#![forbid(unsafe_code)]

//! Pulsing beacon marking a step target before its tooltip opens.

use serde::Serialize;
use waypoint_core::geometry::ElementGeometry;
use waypoint_core::step::Side;

/// Beacon anchored at the midpoint of the target edge facing `side`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Beacon {
    /// Anchor point in document coordinates; the host centers the dot on it.
    pub top: f64,
    pub left: f64,
    pub side: Side,
    /// Accessible name of the beacon button.
    pub label: String,
}

impl Beacon {
    pub fn at(target: &ElementGeometry, side: Side, label: impl Into<String>) -> Self {
        let (top, left) = match side {
            Side::Top => (target.top, target.center_x),
            Side::Bottom => (target.bottom, target.center_x),
            Side::Left => (target.center_y, target.left),
            Side::Right => (target.center_y, target.right),
        };
        Self {
            top,
            left,
            side,
            label: label.into(),
        }
    }
}

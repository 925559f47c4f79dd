#![forbid(unsafe_code)]

//! Page overlay with an optional spotlight cutout around the target.
//!
//! # Invariants
//!
//! 1. The overlay always covers the whole page while a tour is displayed.
//! 2. The cutout, when present, is the target rect padded on every side.
//! 3. Clicks inside the cutout reach the page only when the step does not
//!    block interaction.

use serde::Serialize;
use waypoint_core::geometry::{ElementGeometry, Rect};

/// Transparent window punched through the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Spotlight {
    /// Cutout in document coordinates.
    pub rect: Rect,
    /// Padding applied around the target.
    pub padding: f64,
    /// Whether pointer events inside the cutout reach the target.
    pub target_interactive: bool,
}

impl Spotlight {
    /// Spotlight around `target`.
    pub fn around(target: &ElementGeometry, padding: f64) -> Self {
        let padding = if padding.is_finite() { padding.max(0.0) } else { 0.0 };
        Self {
            rect: target.rect().inflate(padding),
            padding,
            target_interactive: true,
        }
    }

    /// Set whether the cutout lets clicks through.
    #[must_use]
    pub fn target_interactive(mut self, interactive: bool) -> Self {
        self.target_interactive = interactive;
        self
    }
}

/// Dimmed backdrop covering the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    /// CSS color of the backdrop.
    pub color: String,
    /// Whether clicking the backdrop closes the tour.
    pub closes_on_click: bool,
    pub spotlight: Option<Spotlight>,
}

impl Overlay {
    pub fn new(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            closes_on_click: false,
            spotlight: None,
        }
    }

    #[must_use]
    pub fn closes_on_click(mut self, closes: bool) -> Self {
        self.closes_on_click = closes;
        self
    }

    #[must_use]
    pub fn spotlight(mut self, spotlight: Spotlight) -> Self {
        self.spotlight = Some(spotlight);
        self
    }

    /// Whether a document-space point falls inside the cutout.
    pub fn hits_cutout(&self, x: f64, y: f64) -> bool {
        self.spotlight.is_some_and(|s| {
            x >= s.rect.left() && x <= s.rect.right() && y >= s.rect.top() && y <= s.rect.bottom()
        })
    }
}

#![forbid(unsafe_code)]

//! Geometric primitives in CSS pixels.
//!
//! Two coordinate spaces are in play:
//!
//! - **client** coordinates are relative to the visible viewport, as reported by
//!   `getBoundingClientRect()`;
//! - **document** coordinates are relative to the top-left corner of the full
//!   scrollable page.
//!
//! [`ElementGeometry`] is always expressed in document space so it stays valid
//! if the viewport scrolls again before the next repaint.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge (alias for x).
    #[inline]
    pub const fn left(&self) -> f64 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether `other` lies entirely inside this rectangle (edges inclusive).
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Shift the rectangle by `(dx, dy)`.
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Grow the rectangle by `pad` on every side.
    #[must_use]
    pub fn inflate(&self, pad: f64) -> Rect {
        Rect::new(
            self.x - pad,
            self.y - pad,
            self.width + pad * 2.0,
            self.height + pad * 2.0,
        )
    }

    /// Replace non-finite components with zero and negative extents with zero.
    ///
    /// Host measurements occasionally report `NaN` for detached nodes.
    #[must_use]
    pub fn sanitized(&self) -> Rect {
        Rect::new(
            finite_or_zero(self.x),
            finite_or_zero(self.y),
            finite_or_zero(self.width).max(0.0),
            finite_or_zero(self.height).max(0.0),
        )
    }
}

/// Width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn sanitized(&self) -> Size {
        Size::new(
            finite_or_zero(self.width).max(0.0),
            finite_or_zero(self.height).max(0.0),
        )
    }
}

/// Page scroll position (`window.scrollX`, `window.scrollY`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

impl ScrollOffset {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The visible window, sized in pixels and positioned in document space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl Viewport {
    /// A viewport scrolled to the document origin.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }

    /// Set the scroll position.
    #[must_use]
    pub const fn with_scroll(mut self, scroll: ScrollOffset) -> Self {
        self.scroll_x = scroll.x;
        self.scroll_y = scroll.y;
        self
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The visible window expressed in document coordinates.
    pub fn document_rect(&self) -> Rect {
        Rect::new(self.scroll_x, self.scroll_y, self.width, self.height)
    }
}

/// Bounding box of a page element in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementGeometry {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl ElementGeometry {
    /// Build document-space geometry from a client rect and the current page
    /// scroll offset.
    pub fn from_client_rect(client: Rect, scroll: ScrollOffset) -> Self {
        let client = client.sanitized();
        Self::from_document_rect(
            client.translate(finite_or_zero(scroll.x), finite_or_zero(scroll.y)),
        )
    }

    /// Build geometry from a rect already in document space.
    pub fn from_document_rect(rect: Rect) -> Self {
        Self {
            top: rect.y,
            left: rect.x,
            right: rect.right(),
            bottom: rect.bottom(),
            width: rect.width,
            height: rect.height,
            center_x: rect.x + rect.width / 2.0,
            center_y: rect.y + rect.height / 2.0,
        }
    }

    /// The bounding box as a [`Rect`].
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }
}

/// How far a client rect extends past each viewport edge.
///
/// Positive values mean that many pixels are clipped on that side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Overflow {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Overflow {
    /// Measure `client` against a viewport of `viewport` size.
    pub fn measure(client: Rect, viewport: Size) -> Self {
        Self {
            top: (-client.y).max(0.0),
            right: (client.right() - viewport.width).max(0.0),
            bottom: (client.bottom() - viewport.height).max(0.0),
            left: (-client.x).max(0.0),
        }
    }

    /// True when nothing is clipped.
    pub fn is_clear(&self) -> bool {
        self.top <= 0.0 && self.right <= 0.0 && self.bottom <= 0.0 && self.left <= 0.0
    }
}

/// Whether a client rect lies entirely within `[0,0]..[width,height]`.
pub fn is_fully_visible(client: Rect, viewport: Size) -> bool {
    Overflow::measure(client, viewport).is_clear()
}

#[inline]
fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_adds_scroll_offset() {
        let geo = ElementGeometry::from_client_rect(
            Rect::new(10.0, 20.0, 100.0, 40.0),
            ScrollOffset::new(5.0, 300.0),
        );
        assert_eq!(geo.left, 15.0);
        assert_eq!(geo.top, 320.0);
        assert_eq!(geo.right, 115.0);
        assert_eq!(geo.bottom, 360.0);
        assert_eq!(geo.center_x, 65.0);
        assert_eq!(geo.center_y, 340.0);
    }

    #[test]
    fn geometry_rect_roundtrips_document_rect() {
        let rect = Rect::new(3.0, 4.0, 5.0, 6.0);
        assert_eq!(ElementGeometry::from_document_rect(rect).rect(), rect);
    }

    #[test]
    fn nan_measurements_collapse_to_zero() {
        let geo = ElementGeometry::from_client_rect(
            Rect::new(f64::NAN, 1.0, f64::INFINITY, -4.0),
            ScrollOffset::new(f64::NAN, 2.0),
        );
        assert_eq!(geo.left, 0.0);
        assert_eq!(geo.top, 3.0);
        assert_eq!(geo.width, 0.0);
        assert_eq!(geo.height, 0.0);
    }

    #[test]
    fn overflow_reports_clipped_edges() {
        let viewport = Size::new(100.0, 50.0);
        let o = Overflow::measure(Rect::new(-5.0, 40.0, 20.0, 20.0), viewport);
        assert_eq!(o.left, 5.0);
        assert_eq!(o.bottom, 10.0);
        assert_eq!(o.top, 0.0);
        assert_eq!(o.right, 0.0);
        assert!(!o.is_clear());
    }

    #[test]
    fn edge_touching_rect_is_visible() {
        let viewport = Size::new(100.0, 50.0);
        assert!(is_fully_visible(Rect::new(0.0, 0.0, 100.0, 50.0), viewport));
        assert!(!is_fully_visible(Rect::new(0.0, 0.5, 100.0, 50.0), viewport));
    }

    #[test]
    fn inflate_grows_every_side() {
        let r = Rect::new(10.0, 10.0, 4.0, 2.0).inflate(3.0);
        assert_eq!(r, Rect::new(7.0, 7.0, 10.0, 8.0));
    }

    #[test]
    fn viewport_document_rect_follows_scroll() {
        let vp = Viewport::new(800.0, 600.0).with_scroll(ScrollOffset::new(0.0, 250.0));
        assert_eq!(vp.document_rect(), Rect::new(0.0, 250.0, 800.0, 600.0));
        assert!(vp.document_rect().contains_rect(&Rect::new(10.0, 300.0, 50.0, 50.0)));
    }
}

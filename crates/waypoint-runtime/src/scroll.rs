#![forbid(unsafe_code)]

//! Bringing a step target into view.

use waypoint_backend::Host;
use waypoint_core::config::ScrollBehavior;
use waypoint_core::geometry::{Rect, ScrollOffset, Size, is_fully_visible};

/// What [`bring_into_view`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollOutcome {
    AlreadyVisible,
    Scrolled { top: f64, behavior: ScrollBehavior },
}

/// Document `top` that leaves `offset` pixels between the viewport top and
/// the element. Never negative.
pub fn scroll_destination(client: Rect, scroll: ScrollOffset, offset: f64) -> f64 {
    (scroll.y + client.y - offset).max(0.0)
}

/// Reduced motion always wins over a configured smooth scroll.
pub fn effective_behavior(configured: ScrollBehavior, reduced_motion: bool) -> ScrollBehavior {
    if reduced_motion {
        ScrollBehavior::Auto
    } else {
        configured
    }
}

/// Plan a scroll for a client rect, or `None` when it is fully visible.
pub fn plan_scroll(
    client: Rect,
    viewport: Size,
    scroll: ScrollOffset,
    offset: f64,
) -> Option<f64> {
    if is_fully_visible(client, viewport) {
        None
    } else {
        Some(scroll_destination(client, scroll, offset))
    }
}

/// Scroll `element` into view if any part of it is clipped.
pub fn bring_into_view<H: Host>(
    host: &mut H,
    element: &H::Element,
    configured: ScrollBehavior,
    offset: f64,
) -> Result<ScrollOutcome, H::Error> {
    let client = host.client_rect(element).sanitized();
    let Some(top) = plan_scroll(client, host.viewport_size(), host.scroll_offset(), offset) else {
        return Ok(ScrollOutcome::AlreadyVisible);
    };
    let behavior = effective_behavior(configured, host.prefers_reduced_motion());
    host.scroll_to(top, behavior)?;
    tracing::debug!(top, behavior = behavior.as_str(), "Scrolled target into view");
    Ok(ScrollOutcome::Scrolled { top, behavior })
}

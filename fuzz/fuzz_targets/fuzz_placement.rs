#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use waypoint_core::{
    ElementGeometry, Placement, PlacementOptions, Rect, Size, Viewport, resolve_placement,
};

#[derive(Debug, Arbitrary)]
struct Input {
    target: (f64, f64, f64, f64),
    tooltip: (f64, f64),
    viewport: (f64, f64),
    scroll: (f64, f64),
    spacing: f64,
    placement: u8,
}

fuzz_target!(|input: Input| {
    let window = [input.viewport.0, input.viewport.1, input.scroll.0, input.scroll.1];
    if !window.iter().all(|v| v.is_finite()) {
        return;
    }
    let (x, y, w, h) = input.target;
    let target = ElementGeometry::from_document_rect(Rect::new(x, y, w, h).sanitized());
    let tooltip = Size::new(input.tooltip.0, input.tooltip.1);
    let viewport = Viewport::new(input.viewport.0, input.viewport.1);
    let viewport = Viewport {
        scroll_x: input.scroll.0,
        scroll_y: input.scroll.1,
        ..viewport
    };
    let placement = match input.placement % 5 {
        0 => Placement::Top,
        1 => Placement::Bottom,
        2 => Placement::Left,
        3 => Placement::Right,
        _ => Placement::Auto,
    };
    let options = PlacementOptions {
        spacing: input.spacing,
    };

    // Resolution must never panic, and identical inputs resolve identically.
    let first = resolve_placement(&target, tooltip, &viewport, placement, &options);
    let second = resolve_placement(&target, tooltip, &viewport, placement, &options);
    assert_eq!(first, second);

    // An explicit side is always honoured.
    if let Some(side) = placement.side() {
        assert_eq!(first.placement, side);
    }
});

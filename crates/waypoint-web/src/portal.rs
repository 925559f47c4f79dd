#![forbid(unsafe_code)]

//! HTML painter for [`TourFrame`]s.
//!
//! The portal is a single root element appended to `document.body`; a
//! changed frame replaces its markup wholesale. Interactive elements carry data
//! attributes the host's delegated listeners match on:
//!
//! - `data-waypoint-overlay` on the backdrop
//! - `data-waypoint-beacon` on the beacon button
//! - `data-waypoint-control="{action}"` on tooltip buttons
//!
//! All text is HTML-escaped. Block content is not interpreted here; it is
//! emitted as escaped JSON in `data-waypoint-block` for the host page to
//! render.

use waypoint_core::step::StepContent;
use waypoint_widgets::{
    Beacon, CONTROL_MARKER, ControlButton, Overlay, Progress, Tooltip, TourFrame,
};

/// Id of the portal root element.
pub const PORTAL_ROOT_ID: &str = "waypoint-portal";

pub const OVERLAY_MARKER: &str = "data-waypoint-overlay";
pub const BEACON_MARKER: &str = "data-waypoint-beacon";
pub const BLOCK_MARKER: &str = "data-waypoint-block";

fn html_escape(value: &str) -> String {
    v_htmlescape::escape(value).to_string()
}

/// Inline style of the portal root.
pub fn root_style(frame: &TourFrame) -> String {
    format!(
        "position:absolute;top:0;left:0;width:0;height:0;z-index:{}",
        frame.z_index
    )
}

/// Inner markup of the portal root for `frame`.
pub fn render_html(frame: &TourFrame) -> String {
    let mut html = String::new();
    push_overlay(&mut html, &frame.overlay);
    if let Some(beacon) = &frame.beacon {
        push_beacon(&mut html, beacon);
    }
    if let Some(tooltip) = &frame.tooltip {
        push_tooltip(&mut html, tooltip);
    }
    html
}

/// `pointer-events` for the backdrop while the pointer sits at `pointer`
/// (document space). Inside an interactive cutout clicks fall through to
/// the page.
pub fn overlay_pointer_events(frame: &TourFrame, pointer: Option<(f64, f64)>) -> &'static str {
    let through = frame.overlay.spotlight.is_some_and(|s| s.target_interactive)
        && pointer.is_some_and(|(x, y)| frame.overlay.hits_cutout(x, y));
    if through { "none" } else { "auto" }
}

fn push_overlay(html: &mut String, overlay: &Overlay) {
    let color = html_escape(&overlay.color);
    // With a cutout the spotlight's shadow does the dimming.
    let background = if overlay.spotlight.is_some() {
        "transparent".to_owned()
    } else {
        color.clone()
    };
    html.push_str(&format!(
        "<div class=\"waypoint-overlay\" {OVERLAY_MARKER}=\"{}\" style=\"position:fixed;inset:0;background:{background}\"></div>\n",
        overlay.closes_on_click
    ));
    if let Some(spotlight) = overlay.spotlight {
        let rect = spotlight.rect;
        let events = if spotlight.target_interactive {
            "none"
        } else {
            "auto"
        };
        html.push_str(&format!(
            "<div class=\"waypoint-spotlight\" style=\"position:absolute;top:{}px;left:{}px;width:{}px;height:{}px;box-shadow:0 0 0 9999px {color};border-radius:4px;pointer-events:{events}\"></div>\n",
            rect.y, rect.x, rect.width, rect.height
        ));
    }
}

fn push_beacon(html: &mut String, beacon: &Beacon) {
    html.push_str(&format!(
        "<button type=\"button\" class=\"waypoint-beacon waypoint-beacon--{}\" {BEACON_MARKER} aria-label=\"{}\" style=\"position:absolute;top:{}px;left:{}px;transform:translate(-50%, -50%)\"></button>\n",
        beacon.side.as_str(),
        html_escape(&beacon.label),
        beacon.top,
        beacon.left
    ));
}

fn push_tooltip(html: &mut String, tooltip: &Tooltip) {
    let mut attrs = String::new();
    for (name, value) in tooltip.aria.pairs() {
        attrs.push_str(&format!(" {name}=\"{}\"", html_escape(value)));
    }
    html.push_str(&format!(
        "<div class=\"{}\"{attrs} tabindex=\"-1\" style=\"position:absolute;top:{}px;left:{}px;transform:{};max-width:{}px\">\n",
        html_escape(&tooltip.class_attr()),
        tooltip.top,
        tooltip.left,
        tooltip.transform.css(),
        tooltip.max_width
    ));
    html.push_str(&format!(
        "<div class=\"waypoint-arrow waypoint-arrow--{}\"></div>\n",
        tooltip.arrow.as_str()
    ));
    html.push_str(&format!(
        "<h2 id=\"{}\" class=\"waypoint-title\">{}</h2>\n",
        html_escape(&tooltip.title_id),
        html_escape(&tooltip.title)
    ));
    push_content(html, &tooltip.content_id, &tooltip.content);
    if let Some(progress) = &tooltip.progress {
        push_progress(html, progress);
    }

    html.push_str("<div class=\"waypoint-controls\">\n");
    for button in tooltip.controls.buttons() {
        push_button(html, button);
    }
    html.push_str("</div>\n</div>\n");
}

fn push_content(html: &mut String, id: &str, content: &StepContent) {
    let id = html_escape(id);
    match content {
        StepContent::Text(text) => html.push_str(&format!(
            "<div id=\"{id}\" class=\"waypoint-content\">{}</div>\n",
            html_escape(text)
        )),
        StepContent::Block(value) => html.push_str(&format!(
            "<div id=\"{id}\" class=\"waypoint-content\" {BLOCK_MARKER}=\"{}\"></div>\n",
            html_escape(&value.to_string())
        )),
    }
}

fn push_progress(html: &mut String, progress: &Progress) {
    match progress {
        Progress::Bar { percent } => html.push_str(&format!(
            "<div class=\"waypoint-progress waypoint-progress--bar\"><div class=\"waypoint-progress-fill\" style=\"width:{percent}%\"></div></div>\n"
        )),
        Progress::Dots { total, current } => {
            html.push_str("<div class=\"waypoint-progress waypoint-progress--dots\">");
            for i in 0..*total {
                let active = if i == *current { " waypoint-dot--active" } else { "" };
                html.push_str(&format!("<span class=\"waypoint-dot{active}\"></span>"));
            }
            html.push_str("</div>\n");
        }
        Progress::Numbers { text } => html.push_str(&format!(
            "<div class=\"waypoint-progress waypoint-progress--numbers\">{}</div>\n",
            html_escape(text)
        )),
    }
}

fn push_button(html: &mut String, button: &ControlButton) {
    html.push_str(&format!(
        "<button type=\"button\" class=\"waypoint-button waypoint-button--{}\" {CONTROL_MARKER}=\"{}\">{}</button>\n",
        button.action.as_str(),
        button.marker,
        html_escape(&button.label)
    ));
}

#![forbid(unsafe_code)]

//! ARIA attribute synthesis for tour tooltips and beacons.
//!
//! Attributes are generated per render from the step and its position; nothing
//! is cached between steps.

use serde::Serialize;

use crate::step::Step;

/// Attributes applied to the tooltip dialog element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AriaAttributes {
    pub role: &'static str,
    #[serde(rename = "aria-modal")]
    pub modal: &'static str,
    #[serde(rename = "aria-live")]
    pub live: &'static str,
    #[serde(rename = "aria-label")]
    pub label: String,
    #[serde(rename = "aria-labelledby")]
    pub labelled_by: String,
    #[serde(rename = "aria-describedby")]
    pub described_by: String,
}

impl AriaAttributes {
    /// Attributes for the step at `index` (0-based) of a `total`-step tour.
    pub fn for_step(step: &Step, index: usize, total: usize) -> Self {
        Self {
            role: "dialog",
            modal: "true",
            live: "polite",
            label: step_label(step, index, total),
            labelled_by: title_element_id(step),
            described_by: content_element_id(step),
        }
    }

    /// `(name, value)` pairs in a stable order, for hosts that set attributes
    /// one at a time.
    pub fn pairs(&self) -> [(&'static str, &str); 6] {
        [
            ("role", self.role),
            ("aria-modal", self.modal),
            ("aria-live", self.live),
            ("aria-label", &self.label),
            ("aria-labelledby", &self.labelled_by),
            ("aria-describedby", &self.described_by),
        ]
    }
}

/// Human-readable label: `Step 2 of 5: Title`.
pub fn step_label(step: &Step, index: usize, total: usize) -> String {
    format!("Step {} of {}: {}", index + 1, total, step.title)
}

/// Accessible name for a step's beacon button.
pub fn beacon_label(step: &Step) -> String {
    format!("Open tour step: {}", step.title)
}

pub fn title_element_id(step: &Step) -> String {
    format!("waypoint-title-{}", dom_id_fragment(&step.id))
}

pub fn content_element_id(step: &Step) -> String {
    format!("waypoint-content-{}", dom_id_fragment(&step.id))
}

/// Reduce an arbitrary step id to characters safe inside an element id.
fn dom_id_fragment(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

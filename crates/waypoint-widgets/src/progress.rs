#![forbid(unsafe_code)]

//! Step progress indicator.

use serde::Serialize;
use waypoint_core::config::ProgressType;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Progress {
    /// Filled fraction of a bar, `0.0..=100.0`.
    Bar { percent: f64 },
    /// One dot per step; `current` is 0-based.
    Dots { total: usize, current: usize },
    /// `"{i+1} of {n}"`.
    Numbers { text: String },
}

impl Progress {
    /// Progress for the step at `index` (0-based) of `total`.
    pub fn new(kind: ProgressType, index: usize, total: usize) -> Self {
        let total = total.max(1);
        let index = index.min(total - 1);
        match kind {
            ProgressType::Bar => Self::Bar {
                percent: (index + 1) as f64 / total as f64 * 100.0,
            },
            ProgressType::Dots => Self::Dots {
                total,
                current: index,
            },
            ProgressType::Numbers => Self::Numbers {
                text: format!("{} of {}", index + 1, total),
            },
        }
    }
}

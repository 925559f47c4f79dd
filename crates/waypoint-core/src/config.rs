#![forbid(unsafe_code)]

//! Tour configuration: defaults, per-tour overrides, and advisory validation.
//!
//! # Merge rule
//!
//! [`TourConfig::merged`] is a shallow per-key merge: every key present in the
//! [`ConfigOverride`] replaces the default, everything else is kept.
//!
//! # Malformed input
//!
//! Overrides arriving from a host as JSON are parsed leniently. A key whose
//! value has the wrong type is dropped (the default stays in effect) and
//! [`validate_config_json`] reports it. Configuration problems never block a
//! tour from starting; unknown keys are ignored.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::error::{Result, TourError};

/// Default gap between target edge and tooltip edge.
pub const DEFAULT_SPACING: f64 = 12.0;
/// Default distance kept between the viewport top and a scrolled-to target.
pub const DEFAULT_SCROLL_OFFSET: f64 = 20.0;
/// Default tooltip max width.
pub const DEFAULT_MAX_WIDTH: f64 = 320.0;
/// Default delay before a tour lingering on its last step completes.
pub const DEFAULT_COMPLETION_DELAY_MS: u64 = 1000;
/// Default padding around the spotlight cutout.
pub const DEFAULT_SPOTLIGHT_PADDING: f64 = 8.0;
/// Default overlay tint.
pub const DEFAULT_OVERLAY_COLOR: &str = "rgba(0, 0, 0, 0.5)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const NAMES: [&'static str; 2] = ["light", "dark"];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

/// How step progress is presented in the tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressType {
    Bar,
    #[default]
    Dots,
    Numbers,
}

impl ProgressType {
    pub const NAMES: [&'static str; 3] = ["bar", "dots", "numbers"];
}

/// Scroll animation requested when bringing a target into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    /// Instantaneous jump (CSS `behavior: "auto"`).
    Auto,
}

impl ScrollBehavior {
    pub const NAMES: [&'static str; 2] = ["smooth", "auto"];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Auto => "auto",
        }
    }
}

/// Control button captions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonLabels {
    pub back: String,
    pub next: String,
    pub done: String,
    pub skip: String,
    pub close: String,
}

impl Default for ButtonLabels {
    fn default() -> Self {
        Self {
            back: "Back".to_owned(),
            next: "Next".to_owned(),
            done: "Done".to_owned(),
            skip: "Skip tour".to_owned(),
            close: "Close".to_owned(),
        }
    }
}

/// Viewport width tiers used by the `responsive` configuration map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    /// Narrower than 768px.
    Mobile,
    /// 768px up to (not including) 1024px.
    Tablet,
    /// 1024px and wider.
    Desktop,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 3] = [Self::Mobile, Self::Tablet, Self::Desktop];

    /// Classify a viewport width.
    pub fn from_width(width: f64) -> Self {
        if width < 768.0 {
            Self::Mobile
        } else if width < 1024.0 {
            Self::Tablet
        } else {
            Self::Desktop
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bp| bp.as_str() == name)
    }
}

/// Per-breakpoint overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResponsiveOverride {
    #[serde(deserialize_with = "lenient_dimension", skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    #[serde(deserialize_with = "lenient_dimension", skip_serializing_if = "Option::is_none")]
    pub spacing: Option<f64>,
}

/// Layout values in effect for a given viewport width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub breakpoint: Breakpoint,
    pub max_width: f64,
    pub spacing: f64,
}

/// Fully resolved tour configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourConfig {
    pub theme: Theme,
    pub show_progress: bool,
    pub show_skip_button: bool,
    pub show_close_button: bool,
    pub show_back_button: bool,
    pub keyboard_navigation: bool,
    pub close_on_overlay_click: bool,
    pub scroll_behavior: ScrollBehavior,
    pub scroll_offset: f64,
    pub spacing: f64,
    pub max_width: f64,
    #[serde(rename = "completionDelay")]
    pub completion_delay_ms: u64,
    pub overlay_color: String,
    pub spotlight_padding: f64,
    pub progress_type: ProgressType,
    pub labels: ButtonLabels,
    /// Keyed by breakpoint name (`mobile`, `tablet`, `desktop`).
    pub responsive: BTreeMap<String, ResponsiveOverride>,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            show_progress: true,
            show_skip_button: true,
            show_close_button: true,
            show_back_button: true,
            keyboard_navigation: true,
            close_on_overlay_click: false,
            scroll_behavior: ScrollBehavior::Smooth,
            scroll_offset: DEFAULT_SCROLL_OFFSET,
            spacing: DEFAULT_SPACING,
            max_width: DEFAULT_MAX_WIDTH,
            completion_delay_ms: DEFAULT_COMPLETION_DELAY_MS,
            overlay_color: DEFAULT_OVERLAY_COLOR.to_owned(),
            spotlight_padding: DEFAULT_SPOTLIGHT_PADDING,
            progress_type: ProgressType::Dots,
            labels: ButtonLabels::default(),
            responsive: BTreeMap::new(),
        }
    }
}

impl TourConfig {
    /// Shallow per-key merge of `overrides` over `self`.
    #[must_use]
    pub fn merged(&self, overrides: &ConfigOverride) -> TourConfig {
        let base = self.clone();
        let o = overrides.clone();
        TourConfig {
            theme: o.theme.unwrap_or(base.theme),
            show_progress: o.show_progress.unwrap_or(base.show_progress),
            show_skip_button: o.show_skip_button.unwrap_or(base.show_skip_button),
            show_close_button: o.show_close_button.unwrap_or(base.show_close_button),
            show_back_button: o.show_back_button.unwrap_or(base.show_back_button),
            keyboard_navigation: o.keyboard_navigation.unwrap_or(base.keyboard_navigation),
            close_on_overlay_click: o
                .close_on_overlay_click
                .unwrap_or(base.close_on_overlay_click),
            scroll_behavior: o.scroll_behavior.unwrap_or(base.scroll_behavior),
            scroll_offset: o.scroll_offset.unwrap_or(base.scroll_offset),
            spacing: o.spacing.unwrap_or(base.spacing),
            max_width: o.max_width.unwrap_or(base.max_width),
            completion_delay_ms: o.completion_delay_ms.unwrap_or(base.completion_delay_ms),
            overlay_color: o.overlay_color.unwrap_or(base.overlay_color),
            spotlight_padding: o.spotlight_padding.unwrap_or(base.spotlight_padding),
            progress_type: o.progress_type.unwrap_or(base.progress_type),
            labels: o.labels.unwrap_or(base.labels),
            responsive: o.responsive.unwrap_or(base.responsive),
        }
    }

    /// Delay before passive completion on the last step.
    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }

    /// Advisory problems with resolved values (negative or non-finite
    /// dimensions, unknown breakpoints).
    pub fn problems(&self) -> Vec<String> {
        serde_json::to_value(self)
            .map(|value| validate_config_json(&value))
            .unwrap_or_default()
    }

    /// Resolve `maxWidth`/`spacing` for a viewport of the given width.
    pub fn metrics_for(&self, viewport_width: f64) -> LayoutMetrics {
        let breakpoint = Breakpoint::from_width(viewport_width);
        let tier = self.responsive.get(breakpoint.as_str());
        LayoutMetrics {
            breakpoint,
            max_width: tier.and_then(|t| t.max_width).unwrap_or(self.max_width),
            spacing: tier.and_then(|t| t.spacing).unwrap_or(self.spacing),
        }
    }
}

/// A per-tour configuration override. `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigOverride {
    #[serde(deserialize_with = "lenient")]
    pub theme: Option<Theme>,
    #[serde(deserialize_with = "lenient")]
    pub show_progress: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub show_skip_button: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub show_close_button: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub show_back_button: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub keyboard_navigation: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub close_on_overlay_click: Option<bool>,
    #[serde(deserialize_with = "lenient")]
    pub scroll_behavior: Option<ScrollBehavior>,
    #[serde(deserialize_with = "lenient_dimension")]
    pub scroll_offset: Option<f64>,
    #[serde(deserialize_with = "lenient_dimension")]
    pub spacing: Option<f64>,
    #[serde(deserialize_with = "lenient_dimension")]
    pub max_width: Option<f64>,
    #[serde(rename = "completionDelay", deserialize_with = "lenient")]
    pub completion_delay_ms: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    pub overlay_color: Option<String>,
    #[serde(deserialize_with = "lenient_dimension")]
    pub spotlight_padding: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub progress_type: Option<ProgressType>,
    #[serde(deserialize_with = "lenient")]
    pub labels: Option<ButtonLabels>,
    #[serde(deserialize_with = "lenient")]
    pub responsive: Option<BTreeMap<String, ResponsiveOverride>>,
}

impl ConfigOverride {
    /// Parse a host-supplied override leniently.
    ///
    /// Only a non-object payload is an error; malformed keys are dropped.
    pub fn from_json(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(TourError::payload("configuration must be a JSON object"));
        }
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Parse a host-supplied override without ever failing, paired with
    /// the advisory problems found in it. A non-object payload yields the
    /// empty override.
    pub fn from_json_advisory(value: &Value) -> (Self, Vec<String>) {
        let problems = validate_config_json(value);
        (Self::from_json(value).unwrap_or_default(), problems)
    }

    /// Parse a host-supplied override from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_dimension<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|v| v.is_finite() && *v >= 0.0))
}

const DIMENSION_KEYS: [&str; 5] = [
    "scrollOffset",
    "spacing",
    "maxWidth",
    "completionDelay",
    "spotlightPadding",
];

const BOOLEAN_KEYS: [&str; 6] = [
    "showProgress",
    "showSkipButton",
    "showCloseButton",
    "showBackButton",
    "keyboardNavigation",
    "closeOnOverlayClick",
];

const LABEL_KEYS: [&str; 5] = ["back", "next", "done", "skip", "close"];

/// Report malformed values in a host-supplied configuration override.
///
/// The result is advisory: callers log it, they do not refuse to start.
pub fn validate_config_json(value: &Value) -> Vec<String> {
    let Some(map) = value.as_object() else {
        return vec!["Configuration must be an object".to_owned()];
    };
    let mut errors = Vec::new();

    check_enum(map.get("theme"), "theme", &Theme::NAMES, &mut errors);
    for key in BOOLEAN_KEYS {
        if let Some(v) = map.get(key)
            && !v.is_boolean()
        {
            errors.push(format!("Configuration '{key}' must be a boolean"));
        }
    }
    check_enum(
        map.get("scrollBehavior"),
        "scrollBehavior",
        &ScrollBehavior::NAMES,
        &mut errors,
    );
    for key in DIMENSION_KEYS {
        if let Some(v) = map.get(key)
            && !is_dimension(v)
        {
            errors.push(format!("Configuration '{key}' must be a non-negative number"));
        }
    }
    if key_is_integer_violation(map.get("completionDelay")) {
        errors.push("Configuration 'completionDelay' must be a whole number of milliseconds".into());
    }
    if let Some(v) = map.get("overlayColor")
        && !v.is_string()
    {
        errors.push("Configuration 'overlayColor' must be a string".to_owned());
    }
    check_enum(
        map.get("progressType"),
        "progressType",
        &ProgressType::NAMES,
        &mut errors,
    );

    if let Some(labels) = map.get("labels") {
        match labels.as_object() {
            Some(labels) => {
                for key in LABEL_KEYS {
                    if let Some(v) = labels.get(key)
                        && !v.is_string()
                    {
                        errors.push(format!("Configuration 'labels.{key}' must be a string"));
                    }
                }
            }
            None => errors.push("Configuration 'labels' must be an object".to_owned()),
        }
    }

    if let Some(responsive) = map.get("responsive") {
        match responsive.as_object() {
            Some(tiers) => {
                for (name, tier) in tiers {
                    if Breakpoint::parse(name).is_none() {
                        errors.push(format!(
                            "Configuration 'responsive.{name}' is not a known breakpoint"
                        ));
                    }
                    let Some(tier) = tier.as_object() else {
                        errors.push(format!("Configuration 'responsive.{name}' must be an object"));
                        continue;
                    };
                    for key in ["maxWidth", "spacing"] {
                        if let Some(v) = tier.get(key)
                            && !is_dimension(v)
                        {
                            errors.push(format!(
                                "Configuration 'responsive.{name}.{key}' must be a non-negative number"
                            ));
                        }
                    }
                }
            }
            None => errors.push("Configuration 'responsive' must be an object".to_owned()),
        }
    }

    errors
}

fn is_dimension(value: &Value) -> bool {
    value.as_f64().is_some_and(|v| v.is_finite() && v >= 0.0)
}

fn key_is_integer_violation(value: Option<&Value>) -> bool {
    value.is_some_and(|v| is_dimension(v) && v.as_u64().is_none())
}

fn check_enum(value: Option<&Value>, key: &str, names: &[&str], errors: &mut Vec<String>) {
    let Some(value) = value else {
        return;
    };
    if !value.as_str().is_some_and(|s| names.contains(&s)) {
        errors.push(format!(
            "Configuration '{key}' must be one of {}",
            names.join(", ")
        ));
    }
}

#![forbid(unsafe_code)]

//! Tour step descriptors.

use serde::{Deserialize, Serialize};

/// Requested side of the target on which the tooltip is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Top,
    Bottom,
    Left,
    Right,
    /// Let the placement engine pick a side with enough room.
    #[default]
    Auto,
}

impl Placement {
    /// Every accepted wire value, in declaration order.
    pub const NAMES: [&'static str; 5] = ["top", "bottom", "left", "right", "auto"];

    /// Parse a wire value.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }

    /// Concrete side, or `None` for [`Placement::Auto`].
    pub const fn side(self) -> Option<Side> {
        match self {
            Self::Top => Some(Side::Top),
            Self::Bottom => Some(Side::Bottom),
            Self::Left => Some(Side::Left),
            Self::Right => Some(Side::Right),
            Self::Auto => None,
        }
    }
}

/// A resolved tooltip side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Preference order used by automatic placement.
    pub const AUTO_ORDER: [Side; 4] = [Side::Bottom, Side::Top, Side::Right, Side::Left];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Whether the tooltip sits above or below the target.
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// The facing side; a tooltip below its target points its arrow up.
    pub const fn opposite(self) -> Side {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Step body: plain text, or an opaque host-defined block passed through to
/// the render layer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepContent {
    Text(String),
    Block(serde_json::Value),
}

impl StepContent {
    /// Empty text and JSON `null` count as missing content.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Block(value) => value.is_null(),
        }
    }

    /// The text body, if this is text content.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Block(_) => None,
        }
    }
}

impl Default for StepContent {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for StepContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for StepContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<serde_json::Value> for StepContent {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => Self::Text(text),
            other => Self::Block(other),
        }
    }
}

/// One stop in a guided tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    /// Selector locating the element to highlight.
    pub target: String,
    pub title: String,
    pub content: StepContent,
    #[serde(default, deserialize_with = "null_as_default")]
    pub placement: Placement,
    #[serde(default = "default_show_beacon", deserialize_with = "null_as_shown")]
    pub show_beacon: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub block_interaction: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_class: Option<String>,
}

fn default_show_beacon() -> bool {
    true
}

// Hosts send explicit `null` for unset fields.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_shown<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(default_show_beacon))
}

impl Step {
    /// Create a step with default flags (`auto` placement, beacon shown).
    pub fn new(
        id: impl Into<String>,
        target: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<StepContent>,
    ) -> Self {
        Self {
            id: id.into(),
            target: target.into(),
            title: title.into(),
            content: content.into(),
            placement: Placement::Auto,
            show_beacon: true,
            block_interaction: false,
            custom_class: None,
        }
    }

    #[must_use]
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    #[must_use]
    pub fn show_beacon(mut self, show: bool) -> Self {
        self.show_beacon = show;
        self
    }

    #[must_use]
    pub fn block_interaction(mut self, block: bool) -> Self {
        self.block_interaction = block;
        self
    }

    #[must_use]
    pub fn custom_class(mut self, class: impl Into<String>) -> Self {
        self.custom_class = Some(class.into());
        self
    }

    /// Apply a partial update; fields left `None` are kept.
    pub fn apply(&mut self, update: StepUpdate) {
        let StepUpdate {
            target,
            title,
            content,
            placement,
            show_beacon,
            block_interaction,
            custom_class,
        } = update;
        if let Some(target) = target {
            self.target = target;
        }
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        if let Some(placement) = placement {
            self.placement = placement;
        }
        if let Some(show) = show_beacon {
            self.show_beacon = show;
        }
        if let Some(block) = block_interaction {
            self.block_interaction = block;
        }
        if let Some(class) = custom_class {
            self.custom_class = class;
        }
    }
}

/// Partial step edit used by `update_step`. The id is immutable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StepUpdate {
    pub target: Option<String>,
    pub title: Option<String>,
    pub content: Option<StepContent>,
    pub placement: Option<Placement>,
    pub show_beacon: Option<bool>,
    pub block_interaction: Option<bool>,
    /// `Some(None)` clears the class; JSON `null` maps to it.
    #[serde(deserialize_with = "present")]
    pub custom_class: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

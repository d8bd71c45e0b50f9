use egui::Pos2;
use serde::{Deserialize, Serialize};

mod common;
mod property_path;

pub use common::{
    MIN_ELEMENT_HEIGHT, MIN_ELEMENT_WIDTH, clamp_extent, default_properties, default_size, finite_f32,
};
pub use property_path::{PathError, PathSnapshot, PropertyPath, PropertyRoot};

/// Free-form style and content payload of an element
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Unique identifier of a placed element
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// The closed set of element types the palette offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Heading,
    Image,
    Video,
    Button,
    Divider,
    Grid,
}

impl ElementKind {
    pub const ALL: [ElementKind; 7] = [
        ElementKind::Text,
        ElementKind::Heading,
        ElementKind::Image,
        ElementKind::Video,
        ElementKind::Button,
        ElementKind::Divider,
        ElementKind::Grid,
    ];

    /// Tag used in storage and in user-facing messages
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Heading => "heading",
            ElementKind::Image => "image",
            ElementKind::Video => "video",
            ElementKind::Button => "button",
            ElementKind::Divider => "divider",
            ElementKind::Grid => "grid",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ElementKind::Text => "Text",
            ElementKind::Heading => "Heading",
            ElementKind::Image => "Image",
            ElementKind::Video => "Video",
            ElementKind::Button => "Button",
            ElementKind::Divider => "Divider",
            ElementKind::Grid => "Grid",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canvas-relative offsets of an element's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub top: f32,
    pub left: f32,
}

impl Position {
    pub fn new(top: f32, left: f32) -> Self {
        Self { top, left }
    }

    /// Same position with both offsets clamped to the canvas origin.
    /// Non-finite offsets collapse to the origin.
    pub fn clamped(self) -> Self {
        let clamp = |offset: f32| if offset.is_finite() { offset.max(0.0) } else { 0.0 };
        Self {
            top: clamp(self.top),
            left: clamp(self.left),
        }
    }

    pub fn to_pos2(self) -> Pos2 {
        Pos2::new(self.left, self.top)
    }
}

impl From<Pos2> for Position {
    fn from(pos: Pos2) -> Self {
        Self {
            top: pos.y,
            left: pos.x,
        }
    }
}

/// One axis of an element's size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub enum Dimension {
    Px(f32),
    Auto,
    Percent(f32),
}

impl Dimension {
    /// Pixel value when the dimension is absolute
    pub fn px(&self) -> Option<f32> {
        match self {
            Dimension::Px(px) => Some(*px),
            _ => None,
        }
    }

    /// Resolve against the available extent, falling back for `Auto`
    pub fn resolve(&self, available: f32, auto: f32) -> f32 {
        match self {
            Dimension::Px(px) => *px,
            Dimension::Auto => auto,
            Dimension::Percent(pct) => available * pct / 100.0,
        }
    }
}

impl From<Dimension> for serde_json::Value {
    fn from(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Px(px) => serde_json::Value::from(px),
            Dimension::Auto => serde_json::Value::from("auto"),
            Dimension::Percent(pct) => serde_json::Value::from(format!("{pct}%")),
        }
    }
}

impl TryFrom<serde_json::Value> for Dimension {
    type Error = String;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match &value {
            serde_json::Value::Number(n) => n
                .as_f64()
                .and_then(finite_f32)
                .map(Dimension::Px)
                .ok_or_else(|| format!("invalid dimension: {value}")),
            serde_json::Value::String(s) if s == "auto" => Ok(Dimension::Auto),
            serde_json::Value::String(s) => s
                .strip_suffix('%')
                .and_then(|pct| pct.trim().parse::<f32>().ok())
                .filter(|pct| pct.is_finite())
                .map(Dimension::Percent)
                .ok_or_else(|| format!("invalid dimension: {s}")),
            _ => Err(format!("invalid dimension: {value}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: Dimension,
    pub height: Dimension,
}

impl Size {
    pub fn new(width: Dimension, height: Dimension) -> Self {
        Self { width, height }
    }
}

/// A placed visual unit on the builder canvas.
///
/// Elements are plain values: cloning one yields a fully independent
/// snapshot, which is what commands record for undo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub position: Position,
    pub size: Size,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub properties: Properties,
    /// Creation time in milliseconds since the UNIX epoch
    #[serde(default)]
    pub created: u64,
}

impl Element {
    /// Build an element of `kind` with the default size and properties
    pub fn new(id: ElementId, kind: ElementKind, position: Position) -> Self {
        Self {
            id,
            kind,
            position,
            size: default_size(kind),
            z_index: 0,
            properties: default_properties(kind),
            created: crate::util::time::timestamp_millis(),
        }
    }

    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }

    /// Text payload for kinds that carry one
    pub fn text_content(&self) -> Option<&str> {
        let key = match self.kind {
            ElementKind::Text | ElementKind::Heading => "content",
            ElementKind::Button => "text",
            _ => return None,
        };
        self.properties.get(key).and_then(|v| v.as_str())
    }
}

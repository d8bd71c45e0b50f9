use serde_json::json;

use super::{Dimension, ElementKind, Properties, Size};

// Lower bounds applied by store-level resizes
pub const MIN_ELEMENT_WIDTH: f32 = 50.0;
pub const MIN_ELEMENT_HEIGHT: f32 = 20.0;

/// Extent for a resize: at least `min`, and `min` itself when `value` is
/// not finite
pub fn clamp_extent(value: f32, min: f32) -> f32 {
    if value.is_finite() { value.max(min) } else { min }
}

/// `value` as a finite `f32`, `None` when it is non-finite or out of range
pub fn finite_f32(value: f64) -> Option<f32> {
    let narrowed = value as f32;
    narrowed.is_finite().then_some(narrowed)
}

/// Default size for a freshly placed element of `kind`
pub fn default_size(kind: ElementKind) -> Size {
    use Dimension::{Auto, Percent, Px};

    match kind {
        ElementKind::Text => Size::new(Px(300.0), Auto),
        ElementKind::Heading => Size::new(Px(400.0), Auto),
        ElementKind::Image => Size::new(Px(400.0), Px(300.0)),
        ElementKind::Video => Size::new(Px(400.0), Px(225.0)),
        ElementKind::Button => Size::new(Px(150.0), Px(40.0)),
        ElementKind::Divider => Size::new(Percent(100.0), Px(2.0)),
        ElementKind::Grid => Size::new(Px(600.0), Auto),
    }
}

/// Default style and content payload for a freshly placed element of `kind`
pub fn default_properties(kind: ElementKind) -> Properties {
    let value = match kind {
        ElementKind::Text => json!({
            "content": "Click to edit text",
            "fontSize": 16,
            "fontWeight": "normal",
            "fontColor": "#000000",
            "fontFamily": "sans-serif",
            "textAlign": "left",
            "lineHeight": 1.5,
        }),
        ElementKind::Heading => json!({
            "content": "Click to edit heading",
            "level": "h2",
            "fontSize": 32,
            "fontWeight": "bold",
            "fontColor": "#000000",
            "fontFamily": "serif",
            "textAlign": "left",
        }),
        ElementKind::Image => json!({
            "src": "",
            "alt": "Image",
            "objectFit": "cover",
            "backgroundColor": "#f0f0f0",
        }),
        ElementKind::Video => json!({
            "src": "",
            "type": "embed",
            "autoplay": false,
            "controls": true,
        }),
        ElementKind::Button => json!({
            "text": "Click me",
            "backgroundColor": "#6605c7",
            "textColor": "#ffffff",
            "fontSize": 14,
            "fontWeight": "bold",
            "padding": "10px 20px",
            "borderRadius": 6,
            "link": "",
        }),
        ElementKind::Divider => json!({
            "color": "#cccccc",
            "thickness": 2,
            "margin": 20,
            "width": "100%",
        }),
        ElementKind::Grid => json!({
            "columns": 2,
            "gap": 20,
            "items": [],
        }),
    };

    match value {
        serde_json::Value::Object(map) => map,
        _ => Properties::new(),
    }
}

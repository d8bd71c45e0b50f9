//! Turning builder content into publishable output.
//!
//! [`to_json`] keeps everything needed to re-open the content in the
//! builder; [`to_html`] produces the fragment that gets published.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::element::{Dimension, Element, ElementKind};
use crate::state::BuilderMetadata;

pub const EXPORT_VERSION: &str = "1.0";

/// Re-editable export of builder content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    pub metadata: BuilderMetadata,
    pub elements: Vec<Element>,
    /// Milliseconds since the UNIX epoch
    pub exported_at: u64,
}

pub fn to_json(elements: &[Element], metadata: &BuilderMetadata, exported_at: u64) -> ExportDocument {
    ExportDocument {
        version: EXPORT_VERSION.to_owned(),
        metadata: metadata.clone(),
        elements: elements.to_vec(),
        exported_at,
    }
}

/// Render elements as an HTML fragment, lowest z-index first
pub fn to_html(elements: &[Element]) -> String {
    let mut sorted: Vec<&Element> = elements.iter().collect();
    sorted.sort_by_key(|el| el.z_index);

    sorted
        .into_iter()
        .map(render_element)
        .filter(|html| !html.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

const UNTITLED: &str = "Untitled Blog";

const DOCUMENT_STYLE: &str = "        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', sans-serif;
            line-height: 1.6;
            color: #333;
            background: #f9f9f9;
        }
        .blog-container {
            max-width: 800px;
            margin: 2rem auto;
            padding: 2rem;
            background: white;
            border-radius: 0.5rem;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        .blog-header { margin-bottom: 2rem; border-bottom: 2px solid #e5e5e5; padding-bottom: 1.5rem; }
        .blog-title { font-size: 2.5rem; font-weight: bold; margin-bottom: 0.5rem; }
        .blog-excerpt { font-size: 1.1rem; color: #666; font-style: italic; }
        .blog-content { line-height: 1.8; }
        .blog-content h1, .blog-content h2, .blog-content h3,
        .blog-content h4, .blog-content h5, .blog-content h6 { margin-top: 1.5rem; margin-bottom: 0.5rem; }
        .blog-content img, .blog-content video { max-width: 100%; height: auto; }";

/// Standalone HTML page: title and optional excerpt header around the
/// [`to_html`] fragment. The excerpt is read from the metadata's free-form
/// `excerpt` key.
pub fn to_document_html(elements: &[Element], metadata: &BuilderMetadata) -> String {
    let title = metadata
        .title
        .as_deref()
        .filter(|title| !title.is_empty())
        .unwrap_or(UNTITLED);
    let title = escape_html(title);
    let excerpt_html = metadata
        .extra
        .get("excerpt")
        .and_then(Value::as_str)
        .filter(|excerpt| !excerpt.is_empty())
        .map(|excerpt| format!("\n            <p class=\"blog-excerpt\">{}</p>", escape_html(excerpt)))
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
    <meta charset=\"UTF-8\">
    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">
    <title>{title}</title>
    <style>
{style}
    </style>
</head>
<body>
    <article class=\"blog-container\">
        <header class=\"blog-header\">
            <h1 class=\"blog-title\">{title}</h1>{excerpt_html}
        </header>
        <div class=\"blog-content\">
{content}
        </div>
    </article>
</body>
</html>",
        style = DOCUMENT_STYLE,
        content = to_html(elements),
    )
}

fn render_element(element: &Element) -> String {
    match element.kind {
        ElementKind::Text => render_text(element),
        ElementKind::Heading => render_heading(element),
        ElementKind::Image => render_image(element),
        ElementKind::Video => render_video(element),
        ElementKind::Button => render_button(element),
        ElementKind::Divider => render_divider(element),
        ElementKind::Grid => render_grid(element),
    }
}

fn prop_str<'a>(element: &'a Element, key: &str) -> &'a str {
    element.properties.get(key).and_then(Value::as_str).unwrap_or("")
}

/// CSS text for a property value: numbers become pixels unless unitless
fn css_value(value: &Value, unit: &str) -> Option<String> {
    match value {
        Value::Number(n) => Some(format!("{}{}", n, unit)),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn build_style(rules: &[(&str, Option<String>)]) -> String {
    rules
        .iter()
        .filter_map(|(name, value)| value.as_ref().map(|v| format!("{}: {};", name, escape_html(v))))
        .collect::<Vec<_>>()
        .join(" ")
}

fn style_prop(element: &Element, key: &str, unit: &str) -> Option<String> {
    element.properties.get(key).and_then(|v| css_value(v, unit))
}

fn render_text(element: &Element) -> String {
    let style = build_style(&[
        ("font-size", style_prop(element, "fontSize", "px")),
        ("color", style_prop(element, "fontColor", "")),
        ("font-weight", style_prop(element, "fontWeight", "")),
        ("font-family", style_prop(element, "fontFamily", "")),
        ("text-align", style_prop(element, "textAlign", "")),
        ("line-height", style_prop(element, "lineHeight", "")),
        ("margin-bottom", Some("1rem".to_owned())),
    ]);
    format!(
        "<p style=\"{}\">{}</p>",
        style,
        escape_html(prop_str(element, "content"))
    )
}

fn render_heading(element: &Element) -> String {
    let tag = match prop_str(element, "level") {
        level @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6") => level,
        _ => "h2",
    };
    let style = build_style(&[
        ("font-size", style_prop(element, "fontSize", "px")),
        ("color", style_prop(element, "fontColor", "")),
        ("font-weight", style_prop(element, "fontWeight", "")),
        ("font-family", style_prop(element, "fontFamily", "")),
        ("text-align", style_prop(element, "textAlign", "")),
        ("margin-bottom", Some("1.5rem".to_owned())),
        ("margin-top", Some("1.5rem".to_owned())),
    ]);
    format!(
        "<{tag} style=\"{}\">{}</{tag}>",
        style,
        escape_html(prop_str(element, "content"))
    )
}

fn render_image(element: &Element) -> String {
    let src = prop_str(element, "src");
    if src.is_empty() {
        return "<!-- Empty image element -->".to_owned();
    }
    let max_width = match element.size.width {
        Dimension::Px(px) => format!("{}px", px),
        _ => "100%".to_owned(),
    };
    let style = build_style(&[
        ("width", Some("100%".to_owned())),
        ("height", Some("auto".to_owned())),
        ("object-fit", style_prop(element, "objectFit", "")),
        ("border-radius", Some("0.5rem".to_owned())),
        ("max-width", Some(max_width)),
    ]);
    format!(
        "<figure style=\"margin-bottom: 1.5rem; margin-top: 1.5rem;\">\n    <img src=\"{}\" alt=\"{}\" style=\"{}\" />\n</figure>",
        escape_html(src),
        escape_html(prop_str(element, "alt")),
        style
    )
}

fn render_video(element: &Element) -> String {
    let src = prop_str(element, "src");
    if src.is_empty() {
        return "<!-- Empty video element -->".to_owned();
    }
    if prop_str(element, "type") == "embed" {
        format!(
            "<div style=\"position: relative; padding-bottom: 56.25%; height: 0; margin: 1.5rem 0;\">\n    <iframe src=\"{}\" style=\"position: absolute; top: 0; left: 0; width: 100%; height: 100%;\" frameborder=\"0\" allowfullscreen></iframe>\n</div>",
            escape_html(src)
        )
    } else {
        let flag = |key: &str| element.properties.get(key).and_then(Value::as_bool).unwrap_or(false);
        let mut attrs = String::new();
        if flag("controls") {
            attrs.push_str(" controls");
        }
        if flag("autoplay") {
            attrs.push_str(" autoplay");
        }
        format!(
            "<video src=\"{}\"{} style=\"width: 100%; margin: 1.5rem 0;\"></video>",
            escape_html(src),
            attrs
        )
    }
}

fn render_button(element: &Element) -> String {
    let style = build_style(&[
        ("display", Some("inline-block".to_owned())),
        ("background-color", style_prop(element, "backgroundColor", "")),
        ("color", style_prop(element, "textColor", "")),
        ("font-size", style_prop(element, "fontSize", "px")),
        ("font-weight", style_prop(element, "fontWeight", "")),
        ("padding", style_prop(element, "padding", "px")),
        ("border-radius", style_prop(element, "borderRadius", "px")),
        ("text-decoration", Some("none".to_owned())),
    ]);
    let link = prop_str(element, "link");
    let href = if link.is_empty() { "#" } else { link };
    format!(
        "<a href=\"{}\" style=\"{}\">{}</a>",
        escape_html(href),
        style,
        escape_html(prop_str(element, "text"))
    )
}

fn render_divider(element: &Element) -> String {
    let thickness = style_prop(element, "thickness", "px").unwrap_or_else(|| "2px".to_owned());
    let color = style_prop(element, "color", "").unwrap_or_else(|| "#cccccc".to_owned());
    let style = build_style(&[
        ("border", Some("none".to_owned())),
        ("border-top", Some(format!("{} solid {}", thickness, color))),
        ("margin", style_prop(element, "margin", "px").map(|m| format!("{} 0", m))),
        ("width", style_prop(element, "width", "px")),
    ]);
    format!("<hr style=\"{}\" />", style)
}

fn render_grid(element: &Element) -> String {
    let columns = element
        .properties
        .get("columns")
        .and_then(Value::as_u64)
        .unwrap_or(2)
        .max(1);
    let style = build_style(&[
        ("display", Some("grid".to_owned())),
        ("grid-template-columns", Some(format!("repeat({}, 1fr)", columns))),
        ("gap", style_prop(element, "gap", "px")),
        ("margin-bottom", Some("1.5rem".to_owned())),
    ]);
    let items: Vec<String> = element
        .properties
        .get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    let text = item.as_str().map(str::to_owned).unwrap_or_else(|| item.to_string());
                    format!("    <div>{}</div>", escape_html(&text))
                })
                .collect()
        })
        .unwrap_or_default();

    if items.is_empty() {
        format!("<div style=\"{}\"></div>", style)
    } else {
        format!("<div style=\"{}\">\n{}\n</div>", style, items.join("\n"))
    }
}

/// Escape text for HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// URL slug from a title: lowercase words joined by single dashes
pub fn generate_slug(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect();

    let mut slug = String::with_capacity(cleaned.len());
    for c in cleaned.chars() {
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug.trim_matches('-').to_owned()
}

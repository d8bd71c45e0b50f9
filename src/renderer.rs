// src/renderer.rs
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2};

use crate::element::{Element, ElementKind};
use crate::tools::DropEffect;

// Heights used for `auto` sized elements on the canvas
const AUTO_TEXT_HEIGHT: f32 = 40.0;
const AUTO_GRID_HEIGHT: f32 = 120.0;

/// Paints the builder canvas and its elements
#[derive(Debug, Clone)]
pub struct Renderer {
    canvas_color: Color32,
    grid_color: Color32,
    selection_color: Color32,
    drop_highlight: Color32,
    grid_spacing: f32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            canvas_color: Color32::WHITE,
            grid_color: Color32::from_gray(235),
            selection_color: Color32::from_rgb(0x66, 0x05, 0xc7),
            drop_highlight: Color32::from_rgba_unmultiplied(0x66, 0x05, 0xc7, 24),
            grid_spacing: 20.0,
        }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Screen rectangle an element occupies on a canvas placed at `canvas`
    pub fn element_rect(&self, element: &Element, canvas: Rect) -> Rect {
        let auto_height = match element.kind {
            ElementKind::Grid => AUTO_GRID_HEIGHT,
            _ => AUTO_TEXT_HEIGHT,
        };
        let width = element.size.width.resolve(canvas.width(), canvas.width());
        let height = element.size.height.resolve(canvas.height(), auto_height);
        Rect::from_min_size(
            canvas.min + Vec2::new(element.position.left, element.position.top),
            Vec2::new(width.max(1.0), height.max(1.0)),
        )
    }

    /// Background, grid and the drop-zone highlight while dragging
    pub fn draw_canvas(&self, painter: &Painter, canvas: Rect, drop_effect: Option<DropEffect>) {
        painter.rect_filled(canvas, 4.0, self.canvas_color);

        let mut x = canvas.min.x + self.grid_spacing;
        while x < canvas.max.x {
            painter.line_segment(
                [Pos2::new(x, canvas.min.y), Pos2::new(x, canvas.max.y)],
                Stroke::new(1.0, self.grid_color),
            );
            x += self.grid_spacing;
        }
        let mut y = canvas.min.y + self.grid_spacing;
        while y < canvas.max.y {
            painter.line_segment(
                [Pos2::new(canvas.min.x, y), Pos2::new(canvas.max.x, y)],
                Stroke::new(1.0, self.grid_color),
            );
            y += self.grid_spacing;
        }

        if drop_effect == Some(DropEffect::Copy) {
            painter.rect_filled(canvas, 4.0, self.drop_highlight);
            painter.rect_stroke(canvas, 4.0, Stroke::new(2.0, self.selection_color));
        }
    }

    pub fn draw_element(&self, painter: &Painter, element: &Element, rect: Rect, selected: bool) {
        let fill = element
            .property("backgroundColor")
            .and_then(|v| v.as_str())
            .and_then(parse_hex_color)
            .unwrap_or(Color32::from_gray(248));
        let text_color = ["fontColor", "textColor"]
            .iter()
            .find_map(|key| element.property(key).and_then(|v| v.as_str()).and_then(parse_hex_color))
            .unwrap_or(Color32::BLACK);

        match element.kind {
            ElementKind::Divider => {
                let color = element
                    .property("color")
                    .and_then(|v| v.as_str())
                    .and_then(parse_hex_color)
                    .unwrap_or(Color32::GRAY);
                painter.line_segment(
                    [rect.left_center(), rect.right_center()],
                    Stroke::new(rect.height().max(1.0), color),
                );
            }
            _ => {
                painter.rect_filled(rect, 2.0, fill);
                let label = element
                    .text_content()
                    .map(str::to_owned)
                    .unwrap_or_else(|| format!("[{}]", element.kind.label()));
                let font_size = element
                    .property("fontSize")
                    .and_then(|v| v.as_f64())
                    .map(|size| size as f32)
                    .unwrap_or(14.0)
                    .clamp(8.0, 48.0);
                painter.text(
                    rect.left_top() + Vec2::new(6.0, 4.0),
                    Align2::LEFT_TOP,
                    label,
                    FontId::proportional(font_size),
                    text_color,
                );
            }
        }

        if selected {
            painter.rect_stroke(rect.expand(2.0), 2.0, Stroke::new(2.0, self.selection_color));
        }
    }

    /// Label following the pointer during a drag
    pub fn draw_drag_preview(&self, painter: &Painter, pointer: Pos2, label: &str) {
        let galley_pos = pointer + Vec2::new(12.0, 12.0);
        painter.text(
            galley_pos,
            Align2::LEFT_TOP,
            label,
            FontId::proportional(12.0),
            self.selection_color,
        );
    }
}

/// `#rrggbb` to a color
pub fn parse_hex_color(hex: &str) -> Option<Color32> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}

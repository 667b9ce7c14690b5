//! Drawing collaborator.
//!
//! A [`Canvas`] is the slice of a 2D drawing API the badge needs: fill,
//! stroke and clip a rounded rectangle, fill a linear gradient, and draw a
//! line of text. Coordinates are flipped (y grows downward).

use serde::Serialize;

use crate::geometry::{Point, Rect};
use crate::theme::{Color, Font};

/// A rectangle with uniformly rounded corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoundedRect {
    pub rect: Rect,
    pub radius: f64,
}

impl RoundedRect {
    /// The radius is clamped to half the shorter side.
    pub fn new(rect: Rect, radius: f64) -> Self {
        let limit = (rect.width() / 2.0).min(rect.height() / 2.0).max(0.0);
        Self {
            rect,
            radius: radius.clamp(0.0, limit),
        }
    }

    /// A fully rounded capsule: the radius is half the height.
    pub fn pill(rect: Rect) -> Self {
        Self::new(rect, rect.height() / 2.0)
    }

    /// Insets the rectangle and shrinks the radius by the same amount.
    pub fn inset(&self, amount: f64) -> Self {
        Self::new(self.rect.inset(amount), self.radius - amount)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientStop {
    /// Position along the gradient axis, 0.0-1.0.
    pub location: f64,
    pub color: Color,
}

impl GradientStop {
    pub const fn new(location: f64, color: Color) -> Self {
        Self { location, color }
    }
}

/// 2D drawing primitives supplied by the host toolkit.
pub trait Canvas {
    /// Pushes the graphics state (clip included).
    fn save(&mut self);

    /// Pops the graphics state pushed by the matching [`Canvas::save`].
    fn restore(&mut self);

    /// Intersects the clip with `shape`.
    fn clip(&mut self, shape: &RoundedRect);

    fn fill(&mut self, shape: &RoundedRect, color: Color);

    /// Strokes `shape`, centering the line on its outline.
    fn stroke(&mut self, shape: &RoundedRect, color: Color, width: f64);

    /// Fills the current clip with a linear gradient from `start` to `end`.
    fn fill_linear_gradient(&mut self, start: Point, end: Point, stops: &[GradientStop]);

    /// Draws `text` with its bounding box's top-left corner at `origin`.
    fn draw_text(&mut self, text: &str, font: &Font, origin: Point, color: Color);
}

/// A single recorded drawing call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Save,
    Restore,
    Clip {
        shape: RoundedRect,
    },
    Fill {
        shape: RoundedRect,
        color: String,
    },
    Stroke {
        shape: RoundedRect,
        color: String,
        width: f64,
    },
    LinearGradient {
        start: Point,
        end: Point,
        stops: Vec<GradientStop>,
    },
    Text {
        text: String,
        font: Font,
        origin: Point,
        color: String,
    },
}

/// A canvas that records what was drawn instead of rasterizing it.
///
/// Used by the preview binary to dump a badge's drawing and by tests to
/// assert on it. Colors are recorded as hex strings.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Texts drawn so far, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn clip(&mut self, shape: &RoundedRect) {
        self.ops.push(DrawOp::Clip { shape: *shape });
    }

    fn fill(&mut self, shape: &RoundedRect, color: Color) {
        self.ops.push(DrawOp::Fill {
            shape: *shape,
            color: crate::theme::color_to_hex(color),
        });
    }

    fn stroke(&mut self, shape: &RoundedRect, color: Color, width: f64) {
        self.ops.push(DrawOp::Stroke {
            shape: *shape,
            color: crate::theme::color_to_hex(color),
            width,
        });
    }

    fn fill_linear_gradient(&mut self, start: Point, end: Point, stops: &[GradientStop]) {
        self.ops.push(DrawOp::LinearGradient {
            start,
            end,
            stops: stops.to_vec(),
        });
    }

    fn draw_text(&mut self, text: &str, font: &Font, origin: Point, color: Color) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            font: font.clone(),
            origin,
            color: crate::theme::color_to_hex(color),
        });
    }
}

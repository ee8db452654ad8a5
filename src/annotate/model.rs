//! Annotation data model and per-shape bounds.

use bevy::math::IVec2;
use serde::{Deserialize, Serialize};

use super::geometry::{PixelRect, normalize_rect, rect_from_points};

/// Straight (non-premultiplied) 8-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        crate::constants::DEFAULT_STROKE_COLOR
    }
}

/// Stroke color and width shared by every shape type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrokeStyle {
    pub color: Rgba,
    pub thickness: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Rect,
    Line,
    Arrow,
    Pencil,
    Text,
}

impl ShapeKind {
    /// Pencil strokes are inert once drawn; everything else can be selected
    /// and manipulated.
    pub fn is_editable(&self) -> bool {
        !matches!(self, ShapeKind::Pencil)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Opposite corners in any order.
    Rect { p1: IVec2, p2: IVec2 },
    Line { p1: IVec2, p2: IVec2 },
    /// Filled head is drawn at `p2`.
    Arrow { p1: IVec2, p2: IVec2 },
    Pencil { points: Vec<IVec2> },
    /// `anchor` is the top-left corner, `size` the font height in pixels.
    Text {
        anchor: IVec2,
        size: i32,
        content: String,
    },
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rect { .. } => ShapeKind::Rect,
            Shape::Line { .. } => ShapeKind::Line,
            Shape::Arrow { .. } => ShapeKind::Arrow,
            Shape::Pencil { .. } => ShapeKind::Pencil,
            Shape::Text { .. } => ShapeKind::Text,
        }
    }

    /// Endpoints of two-point shapes.
    pub fn endpoints(&self) -> Option<(IVec2, IVec2)> {
        match *self {
            Shape::Rect { p1, p2 } | Shape::Line { p1, p2 } | Shape::Arrow { p1, p2 } => {
                Some((p1, p2))
            }
            _ => None,
        }
    }

    /// Mutable access to the endpoints of two-point shapes.
    pub fn endpoints_mut(&mut self) -> Option<(&mut IVec2, &mut IVec2)> {
        match self {
            Shape::Rect { p1, p2 } | Shape::Line { p1, p2 } | Shape::Arrow { p1, p2 } => {
                Some((p1, p2))
            }
            _ => None,
        }
    }
}

/// One committed (or in-progress) annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub shape: Shape,
    pub style: StrokeStyle,
}

impl Annotation {
    pub fn new(shape: Shape, style: StrokeStyle) -> Self {
        Self { shape, style }
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    pub fn is_editable(&self) -> bool {
        self.kind().is_editable()
    }
}

/// Measures the on-canvas extent of a text annotation.
///
/// Implementations must be cheap; bounds are recomputed for every hit-test
/// and every redraw.
pub trait TextMetrics: Send + Sync {
    fn text_bounds(&self, anchor: IVec2, size: i32, content: &str) -> PixelRect;
}

/// Character-count estimate: every character is `max(8, size / 2)` pixels
/// wide, at least two characters wide, and `size + 10` pixels tall.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTextMetrics;

impl TextMetrics for HeuristicTextMetrics {
    fn text_bounds(&self, anchor: IVec2, size: i32, content: &str) -> PixelRect {
        let char_w = (size / 2).max(8);
        let chars = i32::try_from(content.chars().count()).unwrap_or(i32::MAX);
        let w = (char_w * 2).max(chars.saturating_mul(char_w));
        PixelRect::new(anchor.x, anchor.y, w, size + 10)
    }
}

/// Canvas size plus text measurement, enough to compute bounds for any shape.
#[derive(Clone, Copy)]
pub struct ShapeBounds<'a> {
    pub canvas_w: i32,
    pub canvas_h: i32,
    pub metrics: &'a dyn TextMetrics,
}

impl ShapeBounds<'_> {
    /// Bounding box used for hit-testing, selection handles and caret
    /// placement.
    pub fn of(&self, annotation: &Annotation) -> PixelRect {
        match &annotation.shape {
            Shape::Rect { p1, p2 } => {
                normalize_rect(rect_from_points(*p1, *p2), self.canvas_w, self.canvas_h)
            }
            Shape::Line { p1, p2 } | Shape::Arrow { p1, p2 } => rect_from_points(*p1, *p2),
            Shape::Pencil { points } => {
                let Some(first) = points.first() else {
                    return PixelRect::default();
                };
                let (min, max) = points
                    .iter()
                    .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
                PixelRect::new(min.x, min.y, max.x - min.x, max.y - min.y)
            }
            Shape::Text {
                anchor,
                size,
                content,
            } => self.metrics.text_bounds(*anchor, *size, content),
        }
    }
}

//! CPU rasterizer for annotation geometry, backed by tiny-skia.

use bevy::log::warn;
use bevy::math::IVec2;
use rusttype::{Font, Scale, point};
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

use super::compositor::{OverlayRenderer, ShapeRenderer};
use super::geometry::PixelRect;
use super::model::{Rgba, StrokeStyle};

/// Pixel centers sit half a pixel in from integer canvas coordinates.
const PIXEL_CENTER: f32 = 0.5;

fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn stroke(thickness: i32, join: LineJoin, cap: LineCap) -> Stroke {
    Stroke {
        width: thickness.max(1) as f32,
        line_join: join,
        line_cap: cap,
        ..Default::default()
    }
}

fn to_px(p: IVec2) -> (f32, f32) {
    (p.x as f32 + PIXEL_CENTER, p.y as f32 + PIXEL_CENTER)
}

/// Draws onto a transparent canvas-sized layer.
pub struct RasterRenderer<'f> {
    pixmap: Pixmap,
    font: Option<&'f Font<'static>>,
    warned_missing_font: bool,
}

impl<'f> RasterRenderer<'f> {
    /// `None` when either dimension is zero.
    pub fn new(width: u32, height: u32, font: Option<&'f Font<'static>>) -> Option<Self> {
        Some(Self {
            pixmap: Pixmap::new(width, height)?,
            font,
            warned_missing_font: false,
        })
    }

    /// Straight-alpha RGBA8 pixels, for display surfaces that expect
    /// unpremultiplied data.
    pub fn finish_straight(self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    fn stroke_points(&mut self, points: &[IVec2], closed: bool, style: StrokeStyle, join: LineJoin) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let mut pb = PathBuilder::new();
        let (x, y) = to_px(*first);
        pb.move_to(x, y);
        for p in rest {
            let (x, y) = to_px(*p);
            pb.line_to(x, y);
        }
        if closed {
            pb.close();
        }
        let cap = if closed { LineCap::Butt } else { LineCap::Round };
        if let Some(path) = pb.finish() {
            self.pixmap.stroke_path(
                &path,
                &paint(style.color),
                &stroke(style.thickness, join, cap),
                Transform::identity(),
                None,
            );
        }
    }

    /// Blend glyph coverage straight into the premultiplied pixel data.
    fn blend_coverage(&mut self, x: i32, y: i32, coverage: f32, color: Rgba) {
        let (w, h) = (self.pixmap.width() as i32, self.pixmap.height() as i32);
        if x < 0 || y < 0 || x >= w || y >= h {
            return;
        }
        let alpha = (coverage.clamp(0.0, 1.0) * f32::from(color.a)).round() as u32;
        if alpha == 0 {
            return;
        }
        let idx = ((y * w + x) * 4) as usize;
        let pixel = &mut self.pixmap.data_mut()[idx..idx + 4];
        let inv = 255 - alpha;
        let src = [
            u32::from(color.r) * alpha / 255,
            u32::from(color.g) * alpha / 255,
            u32::from(color.b) * alpha / 255,
            alpha,
        ];
        for (dst, src) in pixel.iter_mut().zip(src) {
            *dst = (src + (u32::from(*dst) * inv + 127) / 255).min(255) as u8;
        }
    }
}

impl ShapeRenderer for RasterRenderer<'_> {
    fn draw_rect_outline(&mut self, rect: PixelRect, style: StrokeStyle) {
        let corners = [
            rect.top_left(),
            rect.top_right(),
            rect.bottom_right(),
            rect.bottom_left(),
        ];
        self.stroke_points(&corners, true, style, LineJoin::Miter);
    }

    fn draw_line(&mut self, from: IVec2, to: IVec2, style: StrokeStyle) {
        self.stroke_points(&[from, to], false, style, LineJoin::Round);
    }

    fn draw_filled_triangle(&mut self, points: [IVec2; 3], color: Rgba) {
        let mut pb = PathBuilder::new();
        let (x, y) = to_px(points[0]);
        pb.move_to(x, y);
        for p in &points[1..] {
            let (x, y) = to_px(*p);
            pb.line_to(x, y);
        }
        pb.close();
        if let Some(path) = pb.finish() {
            self.pixmap.fill_path(
                &path,
                &paint(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    fn draw_polyline(&mut self, points: &[IVec2], style: StrokeStyle) {
        self.stroke_points(points, false, style, LineJoin::Round);
    }

    fn draw_text(&mut self, anchor: IVec2, size: i32, text: &str, color: Rgba) {
        let Some(font) = self.font else {
            if !self.warned_missing_font {
                warn!("No font available, text annotations are not drawn");
                self.warned_missing_font = true;
            }
            return;
        };
        let scale = Scale::uniform(size as f32);
        let v_metrics = font.v_metrics(scale);
        let start = point(anchor.x as f32, anchor.y as f32 + v_metrics.ascent);

        for glyph in font.layout(text, scale, start) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    self.blend_coverage(bb.min.x + gx as i32, bb.min.y + gy as i32, v, color);
                });
            }
        }
    }

    fn draw_handle(&mut self, rect: PixelRect) {
        let Some(r) = Rect::from_xywh(rect.x as f32, rect.y as f32, rect.w as f32, rect.h as f32)
        else {
            return;
        };
        let path = PathBuilder::from_rect(r);
        let mut fill = paint(Rgba::WHITE);
        fill.anti_alias = false;
        self.pixmap
            .fill_path(&path, &fill, FillRule::Winding, Transform::identity(), None);
        self.draw_rect_outline(
            PixelRect::new(rect.x, rect.y, rect.w - 1, rect.h - 1),
            StrokeStyle {
                color: Rgba::BLACK,
                thickness: 1,
            },
        );
    }
}

impl OverlayRenderer for RasterRenderer<'_> {
    fn finish(self) -> Vec<u8> {
        self.pixmap.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::rgb(255, 0, 0);

    fn alpha_at(pixels: &[u8], width: u32, x: u32, y: u32) -> u8 {
        pixels[((y * width + x) * 4 + 3) as usize]
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(RasterRenderer::new(0, 10, None).is_none());
    }

    #[test]
    fn test_untouched_layer_is_transparent() {
        let renderer = RasterRenderer::new(4, 4, None).unwrap();
        assert!(renderer.finish().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_line_covers_its_pixels_only() {
        let mut renderer = RasterRenderer::new(20, 20, None).unwrap();
        renderer.draw_line(
            IVec2::new(2, 10),
            IVec2::new(17, 10),
            StrokeStyle {
                color: RED,
                thickness: 2,
            },
        );
        let pixels = renderer.finish();
        assert!(alpha_at(&pixels, 20, 10, 10) > 0);
        assert_eq!(alpha_at(&pixels, 20, 10, 2), 0);
    }

    #[test]
    fn test_triangle_is_filled() {
        let mut renderer = RasterRenderer::new(20, 20, None).unwrap();
        renderer.draw_filled_triangle(
            [IVec2::new(0, 0), IVec2::new(19, 0), IVec2::new(0, 19)],
            RED,
        );
        let pixels = renderer.finish();
        assert_eq!(alpha_at(&pixels, 20, 3, 3), 255);
        assert_eq!(alpha_at(&pixels, 20, 18, 18), 0);
    }

    #[test]
    fn test_handle_has_white_center() {
        let mut renderer = RasterRenderer::new(20, 20, None).unwrap();
        renderer.draw_handle(PixelRect::new(6, 6, 8, 8));
        let pixels = renderer.finish_straight();
        let idx = ((10 * 20 + 10) * 4) as usize;
        assert_eq!(&pixels[idx..idx + 4], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_text_without_font_is_skipped() {
        let mut renderer = RasterRenderer::new(20, 20, None).unwrap();
        renderer.draw_text(IVec2::new(0, 0), 12, "Hi", RED);
        assert!(renderer.finish().iter().all(|b| *b == 0));
    }
}

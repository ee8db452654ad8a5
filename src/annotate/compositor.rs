//! Flattening a session into a single image.

use bevy::log::warn;
use bevy::math::IVec2;

use super::geometry::PixelRect;
use super::model::{Rgba, StrokeStyle};
use super::scene::{final_scene, render};
use super::session::{PixelFormat, Session};

/// Drawing backend for annotation geometry. Coordinates are canvas pixels.
pub trait ShapeRenderer {
    fn draw_rect_outline(&mut self, rect: PixelRect, style: StrokeStyle);
    fn draw_line(&mut self, from: IVec2, to: IVec2, style: StrokeStyle);
    fn draw_filled_triangle(&mut self, points: [IVec2; 3], color: Rgba);
    fn draw_polyline(&mut self, points: &[IVec2], style: StrokeStyle);
    fn draw_text(&mut self, anchor: IVec2, size: i32, text: &str, color: Rgba);
    fn draw_handle(&mut self, rect: PixelRect);
}

/// A renderer that draws onto a transparent layer the size of the canvas.
pub trait OverlayRenderer: ShapeRenderer {
    /// Premultiplied RGBA8 pixels, `width * 4` bytes per row.
    fn finish(self) -> Vec<u8>;
}

/// Flattened background plus annotations, tightly packed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Always `width * 4`.
    pub stride: usize,
    pub format: PixelFormat,
}

impl ComposedImage {
    /// Copy into an RGBA image, swizzling if the source was BGRA.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        let [r, g, b, a] = self.format.channel_offsets();
        let data = self
            .pixels
            .chunks_exact(4)
            .flat_map(|px| [px[r], px[g], px[b], px[a]])
            .collect();
        image::RgbaImage::from_raw(self.width, self.height, data)
    }
}

/// Copy the background (honoring its row stride), draw every committed
/// shape with `renderer`, and blend the result over the copy.
///
/// Selection handles and drag previews are never included. The same
/// session and renderer always produce the same bytes.
pub fn compose<R: OverlayRenderer>(session: &Session, mut renderer: R) -> ComposedImage {
    let frame = session.frame();
    let stride = frame.width as usize * 4;
    let mut pixels = Vec::with_capacity(stride * frame.height as usize);
    for y in 0..frame.height {
        pixels.extend_from_slice(frame.row(y));
    }

    render(&final_scene(session), &mut renderer);
    let overlay = renderer.finish();
    if overlay.len() == pixels.len() {
        blend_over(&mut pixels, &overlay, frame.format);
    } else {
        warn!(
            "Overlay is {} bytes but the canvas needs {}; annotations skipped",
            overlay.len(),
            pixels.len()
        );
    }

    ComposedImage {
        pixels,
        width: frame.width,
        height: frame.height,
        stride,
        format: frame.format,
    }
}

/// Source-over blend of a premultiplied RGBA overlay into `dst`, whose
/// channel order is given by `format`.
pub fn blend_over(dst: &mut [u8], overlay: &[u8], format: PixelFormat) {
    let offsets = format.channel_offsets();
    for (px, src) in dst.chunks_exact_mut(4).zip(overlay.chunks_exact(4)) {
        let alpha = u32::from(src[3]);
        if alpha == 0 {
            continue;
        }
        let inv = 255 - alpha;
        for (channel, offset) in offsets.into_iter().enumerate() {
            let blended = u32::from(src[channel]) + (u32::from(px[offset]) * inv + 127) / 255;
            px[offset] = blended.min(255) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_transparent_overlay_is_noop() {
        let mut dst = vec![10, 20, 30, 255, 40, 50, 60, 255];
        let before = dst.clone();
        blend_over(&mut dst, &[0; 8], PixelFormat::Bgra8);
        assert_eq!(dst, before);
    }

    #[test]
    fn test_blend_opaque_overlay_respects_channel_order() {
        let red = [255, 0, 0, 255];

        let mut bgra = vec![1, 2, 3, 255];
        blend_over(&mut bgra, &red, PixelFormat::Bgra8);
        assert_eq!(bgra, vec![0, 0, 255, 255]);

        let mut rgba = vec![1, 2, 3, 255];
        blend_over(&mut rgba, &red, PixelFormat::Rgba8);
        assert_eq!(rgba, vec![255, 0, 0, 255]);
    }

    #[test]
    fn test_blend_half_alpha() {
        // 50% white over black, premultiplied
        let mut dst = vec![0, 0, 0, 255];
        blend_over(&mut dst, &[128, 128, 128, 128], PixelFormat::Rgba8);
        assert_eq!(dst, vec![128, 128, 128, 255]);
    }

    #[test]
    fn test_to_rgba_image_swizzles_bgra() {
        let image = ComposedImage {
            pixels: vec![1, 2, 3, 4],
            width: 1,
            height: 1,
            stride: 4,
            format: PixelFormat::Bgra8,
        };
        let rgba = image.to_rgba_image().unwrap();
        assert_eq!(rgba.get_pixel(0, 0).0, [3, 2, 1, 4]);
    }
}

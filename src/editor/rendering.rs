use bevy::prelude::*;

use crate::annotate::RasterRenderer;
use crate::annotate::scene::{preview_scene, render};

use super::canvas::CanvasImages;
use super::source::{ActiveSession, TextFont};

/// Redraw the overlay texture when the session changed since last frame
pub fn refresh_overlay(
    active: Res<ActiveSession>,
    font: Res<TextFont>,
    canvas: Res<CanvasImages>,
    mut images: ResMut<Assets<Image>>,
    mut drawn: Local<Option<(u64, u64)>>,
) {
    let Some(session) = active.session.as_ref() else {
        *drawn = None;
        return;
    };
    let Some(handle) = canvas.overlay.as_ref() else {
        return;
    };
    // Sprites for this session are not built yet
    if canvas.generation != active.generation {
        return;
    }

    let key = (active.generation, session.revision());
    if *drawn == Some(key) {
        return;
    }

    let size = session.canvas_size();
    let Some(mut renderer) = RasterRenderer::new(size.x as u32, size.y as u32, font.0.as_deref())
    else {
        return;
    };
    render(&preview_scene(session), &mut renderer);

    let Some(image) = images.get_mut(handle) else {
        return;
    };
    image.data = Some(renderer.finish_straight());
    *drawn = Some(key);
}

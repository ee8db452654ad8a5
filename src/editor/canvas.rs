//! The on-screen canvas: a camera, the frozen background and the annotation
//! overlay, both as sprites centered on the world origin.

use bevy::math::IVec2;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::window::PrimaryWindow;

use crate::annotate::FrozenFrame;
use crate::constants::{CANVAS_MARGIN, TOOLBAR_HEIGHT};

use super::source::ActiveSession;

#[derive(Component)]
pub struct CanvasCamera;

#[derive(Component)]
pub struct BackgroundSprite;

#[derive(Component)]
pub struct OverlaySprite;

/// Image handles for the sprites of the current session.
#[derive(Resource, Default)]
pub struct CanvasImages {
    pub background: Option<Handle<Image>>,
    pub overlay: Option<Handle<Image>>,
    /// Session generation the sprites were built for
    pub generation: u64,
}

/// Map a world position to a canvas pixel. The canvas is centered on the
/// origin with y pointing down.
pub fn world_to_canvas(world: Vec2, size: IVec2) -> IVec2 {
    IVec2::new(
        (world.x + size.x as f32 / 2.0).floor() as i32,
        (size.y as f32 / 2.0 - world.y).floor() as i32,
    )
}

/// Straight RGBA texture of `width` x `height` from tightly packed bytes.
pub fn rgba_image(width: u32, height: u32, data: Vec<u8>) -> Image {
    Image::new(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        default(),
    )
}

/// Frame pixels repacked as RGBA rows without stride padding.
fn frame_to_rgba(frame: &FrozenFrame) -> Vec<u8> {
    let [r, g, b, a] = frame.format.channel_offsets();
    let mut data = Vec::with_capacity(frame.width as usize * frame.height as usize * 4);
    for y in 0..frame.height {
        for px in frame.row(y).chunks_exact(4) {
            data.extend_from_slice(&[px[r], px[g], px[b], px[a]]);
        }
    }
    data
}

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        CanvasCamera,
        Transform::from_translation(Vec3::new(0.0, 0.0, 1000.0)),
    ));
}

/// Rebuild the sprites whenever a new session starts or the old one ends
pub fn sync_canvas_sprites(
    mut commands: Commands,
    active: Res<ActiveSession>,
    mut canvas: ResMut<CanvasImages>,
    mut images: ResMut<Assets<Image>>,
    sprites: Query<Entity, Or<(With<BackgroundSprite>, With<OverlaySprite>)>>,
) {
    if canvas.generation == active.generation {
        return;
    }
    canvas.generation = active.generation;

    for entity in sprites.iter() {
        commands.entity(entity).despawn();
    }
    for handle in [canvas.background.take(), canvas.overlay.take()]
        .into_iter()
        .flatten()
    {
        images.remove(&handle);
    }

    let Some(session) = active.session.as_ref() else {
        return;
    };
    let frame = session.frame();

    let background = images.add(rgba_image(frame.width, frame.height, frame_to_rgba(frame)));
    let overlay_len = frame.width as usize * frame.height as usize * 4;
    let overlay = images.add(rgba_image(frame.width, frame.height, vec![0; overlay_len]));

    commands.spawn((
        Sprite::from_image(background.clone()),
        Transform::from_translation(Vec3::ZERO),
        BackgroundSprite,
    ));
    commands.spawn((
        Sprite::from_image(overlay.clone()),
        Transform::from_translation(Vec3::new(0.0, 0.0, 1.0)),
        OverlaySprite,
    ));

    canvas.background = Some(background);
    canvas.overlay = Some(overlay);
    debug!("Canvas sprites rebuilt for {}x{}", frame.width, frame.height);
}

/// Zoom out so the whole canvas fits below the toolbar; never zoom in past 1:1
pub fn fit_camera_to_canvas(
    active: Res<ActiveSession>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut camera_query: Query<(&mut Projection, &mut Transform), With<CanvasCamera>>,
) {
    let Some(session) = active.session.as_ref() else {
        return;
    };
    let Ok(window) = window_query.single() else {
        return;
    };
    let Ok((mut projection, mut transform)) = camera_query.single_mut() else {
        return;
    };

    let size = session.canvas_size().as_vec2();
    let available = Vec2::new(
        window.width() - CANVAS_MARGIN * 2.0,
        window.height() - TOOLBAR_HEIGHT * 2.0 - CANVAS_MARGIN * 2.0,
    )
    .max(Vec2::ONE);
    let scale = (size.x / available.x).max(size.y / available.y).max(1.0);

    if let Projection::Orthographic(ref mut ortho) = *projection
        && (ortho.scale - scale).abs() > f32::EPSILON
    {
        ortho.scale = scale;
    }
    if transform.translation.truncate() != Vec2::ZERO {
        transform.translation.x = 0.0;
        transform.translation.y = 0.0;
    }
}

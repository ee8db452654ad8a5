//! System font lookup and font-backed text measurement.

use std::fs;
use std::sync::{Arc, OnceLock};

use bevy::log::{info, warn};
use bevy::math::IVec2;
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rusttype::{Font, Scale, point};

use super::geometry::PixelRect;
use super::model::TextMetrics;

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        db
    })
}

/// Load a regular-weight face for `family` from the system font database.
///
/// "Sans", "Serif" and "Monospace" (or an empty name) select the generic
/// families. Returns `None` when no matching face can be read.
pub fn load_system_font(family: &str) -> Option<Font<'static>> {
    let families: Vec<Family<'_>> = match family.trim() {
        "" | "Sans" => vec![Family::SansSerif],
        "Serif" => vec![Family::Serif],
        "Monospace" => vec![Family::Monospace],
        other => vec![Family::Name(other), Family::SansSerif],
    };

    let query = Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };

    let id = db().query(&query)?;
    let face = db().face(id)?;

    let font = match &face.source {
        fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec_and_index(bytes, face.index)
        }
        fontdb::Source::Binary(bytes) => {
            Font::try_from_vec_and_index(bytes.as_ref().as_ref().to_vec(), face.index)
        }
    };

    match &font {
        Some(_) => info!("Loaded text font {:?} for family {:?}", face.post_script_name, family),
        None => warn!("Font face {:?} could not be parsed", face.post_script_name),
    }
    font
}

/// Advance width of `text` at `size` pixels.
pub fn measure(font: &Font<'static>, size: i32, text: &str) -> f32 {
    let scale = Scale::uniform(size as f32);
    font.layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

/// Text bounds measured with a real font: the laid-out advance width (never
/// narrower than the font size) by `size + 10` pixels.
#[derive(Clone)]
pub struct FontTextMetrics {
    font: Arc<Font<'static>>,
}

impl FontTextMetrics {
    pub fn new(font: Arc<Font<'static>>) -> Self {
        Self { font }
    }
}

impl TextMetrics for FontTextMetrics {
    fn text_bounds(&self, anchor: IVec2, size: i32, content: &str) -> PixelRect {
        let width = measure(&self.font, size, content).ceil() as i32;
        PixelRect::new(anchor.x, anchor.y, width.max(size), size + 10)
    }
}

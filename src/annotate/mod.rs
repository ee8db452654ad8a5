//! Annotation editing engine.
//!
//! Owns everything about a screenshot annotation session that does not
//! depend on a window: the shape model, pointer and keyboard interaction,
//! hit-testing, undo/redo history, and composing the final image.
//!
//! ## Layout
//!
//! - [`geometry`]: pure point/rect math, 45-degree snapping, arrow heads
//! - [`model`]: shapes, styles and bounds
//! - [`history`]: snapshot undo/redo
//! - [`hit_testing`]: picking shapes under the pointer
//! - [`interaction`] and [`shortcuts`]: drags, text editing, key actions
//! - [`session`]: session lifecycle and outward commands
//! - [`scene`], [`compositor`], [`raster`], [`fonts`]: drawing and flattening
//!
//! The engine is driven by the host one event at a time and never blocks.

pub mod compositor;
pub mod fonts;
pub mod geometry;
pub mod history;
pub mod hit_testing;
pub mod interaction;
pub mod model;
pub mod raster;
pub mod scene;
pub mod session;
pub mod shortcuts;
pub mod tools;

#[cfg(test)]
mod tests;

#[allow(unused_imports)]
pub use compositor::{ComposedImage, OverlayRenderer, ShapeRenderer, compose};
#[allow(unused_imports)]
pub use fonts::FontTextMetrics;
#[allow(unused_imports)]
pub use geometry::PixelRect;
#[allow(unused_imports)]
pub use model::{Annotation, Rgba, Shape, ShapeKind, StrokeStyle, TextMetrics};
#[allow(unused_imports)]
pub use raster::RasterRenderer;
#[allow(unused_imports)]
pub use session::{Command, EngineSettings, FrozenFrame, PixelFormat, Session, SessionError};
#[allow(unused_imports)]
pub use shortcuts::{EditorAction, EditorKey, Modifiers, action_for_key};
#[allow(unused_imports)]
pub use tools::{DragMode, Tool};

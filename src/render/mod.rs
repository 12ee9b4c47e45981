//! Rendering seam
//!
//! The simulation draws through the [`Canvas`] trait and looks images up
//! through [`ImageSource`]. The browser implements both on top of the
//! Canvas 2D API; tests and the native demo use [`RecordingCanvas`].

pub mod colors;
pub mod record;
pub mod scene;
#[cfg(target_arch = "wasm32")]
pub mod web_canvas;

pub use colors::Color;
pub use record::{DrawOp, RecordingCanvas};
pub use scene::{Scene, render_scene};
#[cfg(target_arch = "wasm32")]
pub use web_canvas::WebCanvas;

use serde::{Deserialize, Serialize};

/// Every image the game knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ImageKey {
    Background,
    Ship,
    Choripan,
    Vino,
    Ticket,
    Antofagasta,
    Pokemon,
    Odin,
    Earth,
    Missile,
    Enemy,
}

impl ImageKey {
    pub const ALL: [ImageKey; 11] = [
        ImageKey::Background,
        ImageKey::Ship,
        ImageKey::Choripan,
        ImageKey::Vino,
        ImageKey::Ticket,
        ImageKey::Antofagasta,
        ImageKey::Pokemon,
        ImageKey::Odin,
        ImageKey::Earth,
        ImageKey::Missile,
        ImageKey::Enemy,
    ];
}

/// A loaded image, ready to be drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageHandle {
    pub key: ImageKey,
    pub width: f32,
    pub height: f32,
    /// Stand-in substituted after a failed load
    pub placeholder: bool,
}

/// Asset collaborator. Returns `None` until the image is usable.
pub trait ImageSource {
    fn image(&self, key: ImageKey) -> Option<ImageHandle>;
}

/// No images at all; everything renders with geometric fallbacks
pub struct NoImages;

impl ImageSource for NoImages {
    fn image(&self, _key: ImageKey) -> Option<ImageHandle> {
        None
    }
}

/// Immediate-mode 2D drawing surface (mirrors the Canvas 2D state machine)
pub trait Canvas {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, angle: f32);
    fn scale(&mut self, sx: f32, sy: f32);
    /// Multiplies into subsequent draws until the matching `restore`
    fn set_alpha(&mut self, alpha: f32);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn fill_circle(&mut self, x: f32, y: f32, r: f32, color: Color);
    fn fill_ellipse(&mut self, x: f32, y: f32, rx: f32, ry: f32, color: Color);
    fn stroke_circle(&mut self, x: f32, y: f32, r: f32, width: f32, color: Color);
    /// Circle filled with a radial gradient from `inner` at the center to `outer` at `r`
    fn fill_radial(&mut self, x: f32, y: f32, r: f32, inner: Color, outer: Color);
    fn draw_image(&mut self, image: ImageHandle, x: f32, y: f32, w: f32, h: f32);
}

//! Canvas that records operations instead of drawing

use super::{Canvas, Color, ImageHandle, ImageKey};

/// One recorded canvas operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Translate(f32, f32),
    Rotate(f32),
    Scale(f32, f32),
    Alpha(f32),
    Rect { x: f32, y: f32, w: f32, h: f32, color: Color },
    Circle { x: f32, y: f32, r: f32, color: Color },
    Ellipse { x: f32, y: f32, rx: f32, ry: f32, color: Color },
    Ring { x: f32, y: f32, r: f32, color: Color },
    Radial { x: f32, y: f32, r: f32 },
    Image { key: ImageKey, w: f32, h: f32 },
}

impl DrawOp {
    /// True for operations that put pixels on the surface
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            DrawOp::Rect { .. }
                | DrawOp::Circle { .. }
                | DrawOp::Ellipse { .. }
                | DrawOp::Ring { .. }
                | DrawOp::Radial { .. }
                | DrawOp::Image { .. }
        )
    }
}

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn draw_calls(&self) -> usize {
        self.ops.iter().filter(|op| op.is_draw()).count()
    }

    /// Index of the first draw of `key`, if any
    pub fn first_image(&self, key: ImageKey) -> Option<usize> {
        self.ops
            .iter()
            .position(|op| matches!(op, DrawOp::Image { key: k, .. } if *k == key))
    }
}

impl Canvas for RecordingCanvas {
    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.ops.push(DrawOp::Translate(x, y));
    }

    fn rotate(&mut self, angle: f32) {
        self.ops.push(DrawOp::Rotate(angle));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.ops.push(DrawOp::Scale(sx, sy));
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ops.push(DrawOp::Alpha(alpha));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.ops.push(DrawOp::Rect { x, y, w, h, color });
    }

    fn fill_circle(&mut self, x: f32, y: f32, r: f32, color: Color) {
        self.ops.push(DrawOp::Circle { x, y, r, color });
    }

    fn fill_ellipse(&mut self, x: f32, y: f32, rx: f32, ry: f32, color: Color) {
        self.ops.push(DrawOp::Ellipse { x, y, rx, ry, color });
    }

    fn stroke_circle(&mut self, x: f32, y: f32, r: f32, _width: f32, color: Color) {
        self.ops.push(DrawOp::Ring { x, y, r, color });
    }

    fn fill_radial(&mut self, x: f32, y: f32, r: f32, _inner: Color, _outer: Color) {
        self.ops.push(DrawOp::Radial { x, y, r });
    }

    fn draw_image(&mut self, image: ImageHandle, _x: f32, _y: f32, w: f32, h: f32) {
        self.ops.push(DrawOp::Image {
            key: image.key,
            w,
            h,
        });
    }
}

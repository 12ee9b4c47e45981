//! Canvas 2D backend

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::{Canvas, Color, ImageHandle, colors};
use crate::platform::assets::BrowserImages;

/// [`Canvas`] over a `CanvasRenderingContext2d`
pub struct WebCanvas<'a> {
    ctx: &'a CanvasRenderingContext2d,
    images: &'a BrowserImages,
}

impl<'a> WebCanvas<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d, images: &'a BrowserImages) -> Self {
        Self { ctx, images }
    }

    fn circle_path(&self, x: f32, y: f32, r: f32) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(x as f64, y as f64, r.max(0.0) as f64, 0.0, TAU);
    }
}

impl Canvas for WebCanvas<'_> {
    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f32, y: f32) {
        let _ = self.ctx.translate(x as f64, y as f64);
    }

    fn rotate(&mut self, angle: f32) {
        let _ = self.ctx.rotate(angle as f64);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        let _ = self.ctx.scale(sx as f64, sy as f64);
    }

    fn set_alpha(&mut self, alpha: f32) {
        let current = self.ctx.global_alpha();
        self.ctx.set_global_alpha(current * alpha.clamp(0.0, 1.0) as f64);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.ctx.set_fill_style_str(&colors::css(color));
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn fill_circle(&mut self, x: f32, y: f32, r: f32, color: Color) {
        self.ctx.set_fill_style_str(&colors::css(color));
        self.circle_path(x, y, r);
        self.ctx.fill();
    }

    fn fill_ellipse(&mut self, x: f32, y: f32, rx: f32, ry: f32, color: Color) {
        self.ctx.set_fill_style_str(&colors::css(color));
        self.ctx.begin_path();
        let _ = self
            .ctx
            .ellipse(x as f64, y as f64, rx as f64, ry as f64, 0.0, 0.0, TAU);
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, x: f32, y: f32, r: f32, width: f32, color: Color) {
        self.ctx.set_stroke_style_str(&colors::css(color));
        self.ctx.set_line_width(width as f64);
        self.circle_path(x, y, r);
        self.ctx.stroke();
    }

    fn fill_radial(&mut self, x: f32, y: f32, r: f32, inner: Color, outer: Color) {
        let (x, y, rr) = (x as f64, y as f64, r as f64);
        let gradient = match self.ctx.create_radial_gradient(x, y, 0.0, x, y, rr) {
            Ok(g) => g,
            Err(e) => {
                log::warn!("radial gradient failed: {e:?}");
                return;
            }
        };
        let _ = gradient.add_color_stop(0.0, &colors::css(inner));
        let _ = gradient.add_color_stop(1.0, &colors::css(outer));
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.circle_path(x as f32, y as f32, r);
        self.ctx.fill();
    }

    fn draw_image(&mut self, image: ImageHandle, x: f32, y: f32, w: f32, h: f32) {
        if image.placeholder {
            self.fill_rect(x, y, w, h, colors::PLACEHOLDER);
            return;
        }
        let Some(element) = self.images.element(image.key) else {
            return;
        };
        let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            element, x as f64, y as f64, w as f64, h as f64,
        );
    }
}

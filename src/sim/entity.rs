//! Shared entity plumbing: body, per-tick context and the capability trait

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::render::{Canvas, ImageSource};

/// Drawable area in canvas pixels (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a point into the viewport shrunk by `inset` on every side
    pub fn clamp_inset(&self, pos: Vec2, inset: f32) -> Vec2 {
        Vec2::new(
            pos.x.min(self.width - inset).max(inset),
            pos.y.min(self.height - inset).max(inset),
        )
    }

    /// Strictly inside the viewport grown by `margin` on every side
    pub fn contains_with_margin(&self, pos: Vec2, margin: f32) -> bool {
        pos.x > -margin
            && pos.x < self.width + margin
            && pos.y > -margin
            && pos.y < self.height + margin
    }
}

/// Position, collision radius and visibility shared by every entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub radius: f32,
    pub visible: bool,
    /// 0..1
    pub opacity: f32,
}

impl Body {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            radius,
            visible: true,
            opacity: 1.0,
        }
    }

    pub fn is_drawable(&self) -> bool {
        self.visible && self.opacity > 0.0
    }

    /// Circles overlap when centers are closer than the summed radii
    pub fn overlaps(&self, other: &Body) -> bool {
        self.pos.distance(other.pos) < self.radius + other.radius
    }
}

/// Linear opacity fade driven by the loop clock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fade {
    pub start_ms: f64,
    pub duration_ms: f64,
    pub from: f32,
}

impl Fade {
    pub fn new(start_ms: f64, duration_ms: f64, from: f32) -> Self {
        Self {
            start_ms,
            duration_ms,
            from,
        }
    }

    /// Progress in 0..=1 at `now_ms`
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    /// Apply to a body; returns true once the fade has finished
    pub fn apply(&self, body: &mut Body, now_ms: f64) -> bool {
        let t = self.progress(now_ms);
        body.opacity = self.from * (1.0 - t);
        if t >= 1.0 {
            body.visible = false;
            true
        } else {
            false
        }
    }
}

/// Everything an entity may read while advancing one tick
pub struct TickContext<'a> {
    pub viewport: Viewport,
    /// Live ship position, if a ship exists
    pub ship: Option<Vec2>,
    /// Loop clock in milliseconds
    pub now_ms: f64,
    pub paused: bool,
    pub rng: &'a mut Pcg32,
}

/// Capability shared by every simulated object
pub trait Entity {
    fn body(&self) -> &Body;

    fn update(&mut self, ctx: &mut TickContext<'_>);

    /// Draw in world space. Opacity has already been applied by [`draw`].
    fn render(&self, canvas: &mut dyn Canvas, images: &dyn ImageSource);

    fn radius(&self) -> f32 {
        self.body().radius
    }

    fn pos(&self) -> Vec2 {
        self.body().pos
    }
}

/// Draw an entity honoring its visibility and opacity
pub fn draw(entity: &dyn Entity, canvas: &mut dyn Canvas, images: &dyn ImageSource) {
    let body = entity.body();
    if !body.is_drawable() {
        return;
    }
    canvas.save();
    canvas.set_alpha(body.opacity);
    entity.render(canvas, images);
    canvas.restore();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_inset() {
        let vp = Viewport::new(800.0, 600.0);
        let p = vp.clamp_inset(Vec2::new(-10.0, 900.0), 25.0);
        assert_eq!(p, Vec2::new(25.0, 575.0));
    }

    #[test]
    fn test_margin_is_strict() {
        let vp = Viewport::new(800.0, 600.0);
        assert!(vp.contains_with_margin(Vec2::new(-49.9, 300.0), 50.0));
        assert!(!vp.contains_with_margin(Vec2::new(-50.0, 300.0), 50.0));
        assert!(!vp.contains_with_margin(Vec2::new(400.0, 650.0), 50.0));
    }

    #[test]
    fn test_fade_hides_body_when_done() {
        let mut body = Body::new(Vec2::ZERO, 10.0);
        let fade = Fade::new(1000.0, 500.0, 1.0);
        assert!(!fade.apply(&mut body, 1250.0));
        assert!((body.opacity - 0.5).abs() < 1e-4);
        assert!(body.visible);
        assert!(fade.apply(&mut body, 1600.0));
        assert_eq!(body.opacity, 0.0);
        assert!(!body.visible);
    }
}

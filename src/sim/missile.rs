//! Enemy missiles
//!
//! A missile flies toward the point it was aimed at when spawned, with a
//! small bias toward the ship's live position. Pure homing would make the
//! missiles unavoidable, so the bias is kept weak.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Entity, TickContext};
use crate::render::{Canvas, ImageKey, ImageSource, colors};

pub const MISSILE_RADIUS: f32 = 16.0;
/// Fraction of speed added toward the live ship each tick
pub const PURSUIT_STRENGTH: f32 = 0.05;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Missile {
    pub body: Body,
    pub vel: Vec2,
    /// Recorded aim point (ship position at spawn, or a random far point)
    pub aim: Vec2,
    pub speed: f32,
    pub rotation: f32,
}

impl Missile {
    pub fn new(origin: Vec2, aim: Vec2, speed: f32) -> Self {
        Self {
            body: Body::new(origin, MISSILE_RADIUS),
            vel: Vec2::ZERO,
            aim,
            speed,
            rotation: 0.0,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.body.radius = MISSILE_RADIUS * scale;
        self
    }
}

impl Entity for Missile {
    fn body(&self) -> &Body {
        &self.body
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) {
        let Some(ship) = ctx.ship else {
            return;
        };

        let to_ship = ship - self.body.pos;
        let ship_dist = to_ship.length();
        if ship_dist > 0.0 {
            let to_aim = self.aim - self.body.pos;
            let aim_dist = to_aim.length();
            if aim_dist > 0.0 {
                self.vel = to_aim / aim_dist * self.speed;
            }

            self.vel += to_ship / ship_dist * PURSUIT_STRENGTH * self.speed;

            let mag = self.vel.length();
            if mag > self.speed {
                self.vel = self.vel / mag * self.speed;
            }
        }

        self.body.pos += self.vel;

        if self.vel.x.abs() > 0.01 || self.vel.y.abs() > 0.01 {
            self.rotation = self.vel.y.atan2(self.vel.x);
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, images: &dyn ImageSource) {
        let p = self.body.pos;
        let r = self.body.radius;
        match images.image(ImageKey::Missile) {
            Some(img) => {
                canvas.save();
                canvas.translate(p.x, p.y);
                canvas.rotate(self.rotation);
                canvas.draw_image(img, -r, -r, r * 2.0, r * 2.0);
                canvas.restore();
            }
            None => canvas.fill_circle(p.x, p.y, r, colors::MISSILE_FALLBACK),
        }
    }
}

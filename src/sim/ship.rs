//! The player's ship
//!
//! Motion is frame-coupled: acceleration and friction are applied once per
//! tick with no time scaling. [`step_motion`] is the whole integration step,
//! so callers that want a fixed timestep only need to control how often it runs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Entity, TickContext, Viewport};
use crate::render::{Canvas, ImageKey, ImageSource, colors};

pub const SHIP_RADIUS: f32 = 25.0;
pub const SHIP_SIZE: f32 = 50.0;
/// Velocity → displacement multiplier
pub const SHIP_SPEED: f32 = 1.6;
pub const SHIP_FRICTION: f32 = 0.92;
pub const SHIP_ACCELERATION: f32 = 0.08;
/// Below this per-axis speed the facing angle is left alone
pub const FACING_DEADZONE: f32 = 0.01;

/// Four-way discrete direction input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionKeys {
    /// Acceleration vector for the held keys (opposite keys cancel)
    pub fn acceleration(&self, accel: f32) -> Vec2 {
        let mut a = Vec2::ZERO;
        if self.up {
            a.y -= accel;
        }
        if self.down {
            a.y += accel;
        }
        if self.left {
            a.x -= accel;
        }
        if self.right {
            a.x += accel;
        }
        a
    }
}

/// One integration step: accelerate, apply friction, move, clamp.
///
/// Returns the new `(pos, vel)`.
pub fn step_motion(pos: Vec2, vel: Vec2, accel: Vec2, radius: f32, viewport: Viewport) -> (Vec2, Vec2) {
    let vel = (vel + accel) * SHIP_FRICTION;
    let pos = viewport.clamp_inset(pos + vel * SHIP_SPEED, radius);
    (pos, vel)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub body: Body,
    pub vel: Vec2,
    pub keys: DirectionKeys,
    /// Velocity is being set by a pointer device; friction still applies
    pub external_velocity: bool,
    /// Facing angle (radians), follows the velocity heading
    pub rotation: f32,
    /// Sprite edge length
    pub size: f32,
}

impl Ship {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, SHIP_RADIUS),
            vel: Vec2::ZERO,
            keys: DirectionKeys::default(),
            external_velocity: false,
            rotation: 0.0,
            size: SHIP_SIZE,
        }
    }

    /// Ship with radius and sprite shrunk for small touch screens
    pub fn scaled(pos: Vec2, scale: f32) -> Self {
        let mut ship = Self::new(pos);
        ship.body.radius *= scale;
        ship.size *= scale;
        ship
    }

    pub fn set_keys(&mut self, keys: DirectionKeys) {
        self.keys = keys;
    }

    /// Pointer steering: replace the velocity outright
    pub fn steer(&mut self, vel: Vec2) {
        self.vel = vel;
        self.external_velocity = true;
    }

    /// Pointer lifted; the last velocity decays through friction
    pub fn release(&mut self) {
        self.external_velocity = true;
    }

    /// Keep the ship inside a (possibly resized) viewport
    pub fn clamp_to(&mut self, viewport: Viewport) {
        self.body.pos = viewport.clamp_inset(self.body.pos, self.body.radius);
    }
}

impl Entity for Ship {
    fn body(&self) -> &Body {
        &self.body
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) {
        if ctx.paused {
            return;
        }

        let accel = self.keys.acceleration(SHIP_ACCELERATION);
        let (pos, vel) = step_motion(self.body.pos, self.vel, accel, self.body.radius, ctx.viewport);
        self.body.pos = pos;
        self.vel = vel;

        if self.vel.x.abs() > FACING_DEADZONE || self.vel.y.abs() > FACING_DEADZONE {
            self.rotation = self.vel.y.atan2(self.vel.x);
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, images: &dyn ImageSource) {
        canvas.save();
        canvas.translate(self.body.pos.x, self.body.pos.y);
        canvas.rotate(self.rotation);
        match images.image(ImageKey::Ship) {
            Some(img) => {
                let s = self.size;
                canvas.draw_image(img, -s / 2.0, -s / 2.0, s, s);
            }
            None => {
                let r = self.body.radius;
                canvas.fill_ellipse(0.0, 0.0, r * 0.8, r * 0.6, colors::SHIP_FALLBACK);
            }
        }
        canvas.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const VP: Viewport = Viewport::new(800.0, 600.0);

    fn tick(ship: &mut Ship, paused: bool) {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut ctx = TickContext {
            viewport: VP,
            ship: None,
            now_ms: 0.0,
            paused,
            rng: &mut rng,
        };
        ship.update(&mut ctx);
    }

    #[test]
    fn test_acceleration_and_friction() {
        let mut ship = Ship::new(Vec2::new(400.0, 300.0));
        ship.set_keys(DirectionKeys {
            right: true,
            ..Default::default()
        });
        tick(&mut ship, false);
        let expected_vx = SHIP_ACCELERATION * SHIP_FRICTION;
        assert!((ship.vel.x - expected_vx).abs() < 1e-6);
        assert!((ship.body.pos.x - (400.0 + expected_vx * SHIP_SPEED)).abs() < 1e-4);
        assert_eq!(ship.rotation, 0.0);

        // Released: velocity decays geometrically
        ship.set_keys(DirectionKeys::default());
        tick(&mut ship, false);
        assert!((ship.vel.x - expected_vx * SHIP_FRICTION).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let keys = DirectionKeys {
            up: true,
            down: true,
            left: true,
            ..Default::default()
        };
        assert_eq!(keys.acceleration(1.0), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_paused_ship_does_not_move() {
        let mut ship = Ship::new(Vec2::new(400.0, 300.0));
        ship.steer(Vec2::new(3.0, 3.0));
        tick(&mut ship, true);
        assert_eq!(ship.body.pos, Vec2::new(400.0, 300.0));
        assert_eq!(ship.vel, Vec2::new(3.0, 3.0));
    }

    #[test]
    fn test_facing_keeps_heading_at_rest() {
        let mut ship = Ship::new(Vec2::new(400.0, 300.0));
        ship.steer(Vec2::new(0.0, 2.0));
        tick(&mut ship, false);
        let heading = ship.rotation;
        assert!((heading - std::f32::consts::FRAC_PI_2).abs() < 1e-5);

        ship.vel = Vec2::new(0.001, 0.0);
        tick(&mut ship, false);
        assert_eq!(ship.rotation, heading);
    }

    #[test]
    fn test_steer_then_release_decays() {
        let mut ship = Ship::new(Vec2::new(400.0, 300.0));
        ship.steer(Vec2::new(3.5, 0.0));
        ship.release();
        for _ in 0..200 {
            tick(&mut ship, false);
        }
        assert!(ship.external_velocity);
        assert!(ship.vel.length() < 1e-3);
    }

    #[test]
    fn test_fallback_render_without_image() {
        use crate::render::{DrawOp, NoImages, RecordingCanvas};
        let ship = Ship::new(Vec2::new(10.0, 10.0));
        let mut canvas = RecordingCanvas::new();
        ship.render(&mut canvas, &NoImages);
        assert!(canvas.ops.iter().any(|op| matches!(op, DrawOp::Ellipse { .. })));
    }

    proptest! {
        #[test]
        fn prop_ship_stays_in_viewport(
            x in -100.0f32..900.0,
            y in -100.0f32..700.0,
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
            up: bool, down: bool, left: bool, right: bool,
            ticks in 1usize..40,
        ) {
            let mut ship = Ship::new(Vec2::new(x, y));
            ship.steer(Vec2::new(vx, vy));
            ship.set_keys(DirectionKeys { up, down, left, right });
            for _ in 0..ticks {
                tick(&mut ship, false);
                let p = ship.body.pos;
                let r = ship.body.radius;
                prop_assert!(p.x >= r && p.x <= VP.width - r);
                prop_assert!(p.y >= r && p.y <= VP.height - r);
            }
        }
    }
}

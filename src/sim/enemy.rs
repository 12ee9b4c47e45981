//! Stationary missile launchers
//!
//! Both enemy kinds keep a shot cooldown clock, but missiles are spawned by
//! the level's spawn timer, which does not consult it. `can_shoot` is kept
//! for callers that want the per-enemy cadence.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Entity, TickContext};
use super::missile::Missile;
use crate::consts::CHAOTIC_AIM_DISTANCE;
use crate::render::{Canvas, ImageKey, ImageSource, colors};

pub const ENEMY_RADIUS: f32 = 30.0;
pub const FINAL_ENEMY_RADIUS: f32 = 50.0;
pub const ENEMY_MISSILE_SPEED: f32 = 2.0;
pub const FINAL_ENEMY_MISSILE_SPEED: f32 = 3.0;

/// Which launcher a level uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoeKind {
    Regular,
    Final,
}

/// Regular launcher: aims at the ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub rotation: f32,
    pub last_shot_ms: f64,
    pub shoot_interval_ms: f64,
}

impl Enemy {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, ENEMY_RADIUS),
            rotation: 0.0,
            last_shot_ms: 0.0,
            shoot_interval_ms: 2000.0,
        }
    }

    pub fn can_shoot(&self, now_ms: f64) -> bool {
        now_ms - self.last_shot_ms >= self.shoot_interval_ms
    }

    /// Missile aimed at the ship's current position
    pub fn shoot(&mut self, ship: Vec2, now_ms: f64) -> Missile {
        self.last_shot_ms = now_ms;
        Missile::new(self.body.pos, ship, ENEMY_MISSILE_SPEED)
    }
}

impl Entity for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) {
        self.rotation += 0.01;
        self.last_shot_ms = ctx.now_ms;
    }

    fn render(&self, canvas: &mut dyn Canvas, images: &dyn ImageSource) {
        let p = self.body.pos;
        let r = self.body.radius;
        match images.image(ImageKey::Enemy) {
            Some(img) => {
                canvas.save();
                canvas.translate(p.x, p.y);
                canvas.rotate(self.rotation);
                canvas.draw_image(img, -r, -r, r * 2.0, r * 2.0);
                canvas.restore();
            }
            None => canvas.fill_circle(p.x, p.y, r, colors::ENEMY_FALLBACK),
        }
    }
}

/// Level 6 boss: fires in random directions and can be blown up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalEnemy {
    pub body: Body,
    pub rotation: f32,
    pub pulse: f32,
    pub last_shot_ms: f64,
    pub shoot_interval_ms: f64,
    /// Terminal: once set, nothing updates, renders or shoots
    pub exploded: bool,
}

impl FinalEnemy {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, FINAL_ENEMY_RADIUS),
            rotation: 0.0,
            pulse: 0.0,
            last_shot_ms: 0.0,
            shoot_interval_ms: 800.0,
            exploded: false,
        }
    }

    pub fn can_shoot(&self, now_ms: f64) -> bool {
        !self.exploded && now_ms - self.last_shot_ms >= self.shoot_interval_ms
    }

    /// Missile aimed at a random point far away; `None` once exploded
    pub fn shoot(&mut self, now_ms: f64, rng: &mut Pcg32) -> Option<Missile> {
        if self.exploded {
            return None;
        }
        self.last_shot_ms = now_ms;
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let aim = self.body.pos + Vec2::new(angle.cos(), angle.sin()) * CHAOTIC_AIM_DISTANCE;
        Some(Missile::new(self.body.pos, aim, FINAL_ENEMY_MISSILE_SPEED))
    }

    pub fn explode(&mut self) {
        self.exploded = true;
        self.body.visible = false;
    }
}

impl Entity for FinalEnemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) {
        if self.exploded {
            return;
        }
        self.rotation += 0.02;
        self.pulse += 0.1;
        self.last_shot_ms = ctx.now_ms;
    }

    fn render(&self, canvas: &mut dyn Canvas, images: &dyn ImageSource) {
        if self.exploded {
            return;
        }
        let scale = 1.0 + self.pulse.sin() * 0.1;
        let p = self.body.pos;
        let r = self.body.radius;
        match images.image(ImageKey::Enemy) {
            Some(img) => {
                canvas.save();
                canvas.translate(p.x, p.y);
                canvas.scale(scale, scale);
                canvas.rotate(self.rotation);
                canvas.draw_image(img, -r, -r, r * 2.0, r * 2.0);
                canvas.restore();
            }
            None => canvas.fill_circle(p.x, p.y, r * scale, colors::ENEMY_FALLBACK),
        }
    }
}

/// The level's launcher, if any
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Foe {
    Regular(Enemy),
    Final(FinalEnemy),
}

impl Foe {
    pub fn new(kind: FoeKind, pos: Vec2, scale: f32) -> Self {
        let mut foe = match kind {
            FoeKind::Regular => Foe::Regular(Enemy::new(pos)),
            FoeKind::Final => Foe::Final(FinalEnemy::new(pos)),
        };
        foe.body_mut().radius *= scale;
        foe
    }

    pub fn kind(&self) -> FoeKind {
        match self {
            Foe::Regular(_) => FoeKind::Regular,
            Foe::Final(_) => FoeKind::Final,
        }
    }

    fn body_mut(&mut self) -> &mut Body {
        match self {
            Foe::Regular(e) => &mut e.body,
            Foe::Final(e) => &mut e.body,
        }
    }

    pub fn can_shoot(&self, now_ms: f64) -> bool {
        match self {
            Foe::Regular(e) => e.can_shoot(now_ms),
            Foe::Final(e) => e.can_shoot(now_ms),
        }
    }

    pub fn shoot(&mut self, ship: Vec2, now_ms: f64, rng: &mut Pcg32) -> Option<Missile> {
        match self {
            Foe::Regular(e) => Some(e.shoot(ship, now_ms)),
            Foe::Final(e) => e.shoot(now_ms, rng),
        }
    }

    /// Blow up a FinalEnemy. Returns false for regular enemies or if already exploded.
    pub fn explode(&mut self) -> bool {
        match self {
            Foe::Final(e) if !e.exploded => {
                e.explode();
                true
            }
            _ => false,
        }
    }

    pub fn is_exploded(&self) -> bool {
        matches!(self, Foe::Final(e) if e.exploded)
    }

    fn inner(&self) -> &dyn Entity {
        match self {
            Foe::Regular(e) => e,
            Foe::Final(e) => e,
        }
    }
}

impl Entity for Foe {
    fn body(&self) -> &Body {
        self.inner().body()
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) {
        match self {
            Foe::Regular(e) => e.update(ctx),
            Foe::Final(e) => e.update(ctx),
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, images: &dyn ImageSource) {
        self.inner().render(canvas, images);
    }
}

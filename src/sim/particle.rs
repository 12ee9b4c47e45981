//! Decorative particles: falling stars and the two burst kinds
//!
//! Particles never affect gameplay. Bursts keep animating while the game is
//! paused for a message; stars are frozen with the rest of the scene.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Entity, TickContext};
use crate::render::{Canvas, Color, ImageSource, colors};
use crate::spread;

/// Background star drifting down the screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarParticle {
    pub body: Body,
    pub speed: f32,
    pub color: Color,
}

impl StarParticle {
    pub fn new(pos: Vec2, rng: &mut Pcg32) -> Self {
        let size = rng.random::<f32>() * 2.0 + 1.0;
        let speed = rng.random::<f32>() * 0.5 + 0.2;
        let mut body = Body::new(pos, size);
        body.opacity = rng.random::<f32>() * 0.5 + 0.3;
        let color = colors::STARS[rng.random_range(0..colors::STARS.len())];
        Self { body, speed, color }
    }
}

impl Entity for StarParticle {
    fn body(&self) -> &Body {
        &self.body
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) {
        self.body.pos.y += self.speed;
        if self.body.pos.y > ctx.viewport.height {
            self.body.pos.y = -5.0;
            self.body.pos.x = ctx.rng.random::<f32>() * ctx.viewport.width;
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, _images: &dyn ImageSource) {
        canvas.fill_circle(self.body.pos.x, self.body.pos.y, self.body.radius, self.color);
    }
}

/// Shared lifetime-bounded burst particle motion
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Burst {
    body: Body,
    vel: Vec2,
    life: f32,
    decay: f32,
    drag: f32,
    color: Color,
}

impl Burst {
    fn step(&mut self) {
        self.body.pos += self.vel;
        self.vel *= self.drag;
        self.life -= self.decay;
        self.body.opacity = self.life.max(0.0);
    }

    fn is_dead(&self) -> bool {
        self.body.opacity <= 0.0
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        if self.is_dead() {
            return;
        }
        canvas.fill_circle(self.body.pos.x, self.body.pos.y, self.body.radius, self.color);
    }
}

/// Sparkle emitted when a target is collected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionParticle {
    burst: Burst,
}

impl CollectionParticle {
    pub fn new(pos: Vec2, rng: &mut Pcg32) -> Self {
        let vel = Vec2::new(spread(rng.random(), 2.0), spread(rng.random(), 2.0));
        let size = rng.random::<f32>() * 4.0 + 2.0;
        let color = colors::COLLECTION[rng.random_range(0..colors::COLLECTION.len())];
        Self {
            burst: Burst {
                body: Body::new(pos, size),
                vel,
                life: 1.0,
                decay: 0.02,
                drag: 1.0,
                color,
            },
        }
    }

    pub fn is_dead(&self) -> bool {
        self.burst.is_dead()
    }
}

impl Entity for CollectionParticle {
    fn body(&self) -> &Body {
        &self.burst.body
    }

    fn update(&mut self, _ctx: &mut TickContext<'_>) {
        self.burst.step();
    }

    fn render(&self, canvas: &mut dyn Canvas, _images: &dyn ImageSource) {
        self.burst.render(canvas);
    }
}

/// Debris emitted when the FinalEnemy explodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplosionParticle {
    burst: Burst,
}

impl ExplosionParticle {
    pub fn new(pos: Vec2, rng: &mut Pcg32) -> Self {
        let vel = Vec2::new(spread(rng.random(), 4.0), spread(rng.random(), 4.0));
        let size = rng.random::<f32>() * 6.0 + 3.0;
        let color = colors::EXPLOSION[rng.random_range(0..colors::EXPLOSION.len())];
        Self {
            burst: Burst {
                body: Body::new(pos, size),
                vel,
                life: 1.0,
                decay: 0.015,
                drag: 0.98,
                color,
            },
        }
    }

    pub fn is_dead(&self) -> bool {
        self.burst.is_dead()
    }
}

impl Entity for ExplosionParticle {
    fn body(&self) -> &Body {
        &self.burst.body
    }

    fn update(&mut self, _ctx: &mut TickContext<'_>) {
        self.burst.step();
    }

    fn render(&self, canvas: &mut dyn Canvas, _images: &dyn ImageSource) {
        self.burst.render(canvas);
    }
}

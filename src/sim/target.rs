//! Collectible targets
//!
//! A regular [`Target`] wanders around an anchor, bounces off the canvas
//! edges and runs from the ship when it gets close. The [`FinalTarget`]
//! (level 7) sits still and just glows.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Entity, Fade, TickContext};
use crate::consts::{EVASION_RANGE, HIGHLIGHT_RANGE, WIGGLE_RANGE};
use crate::render::{Canvas, ImageKey, ImageSource, colors};
use crate::spread;

pub const TARGET_RADIUS: f32 = 30.0;
pub const FINAL_TARGET_RADIUS: f32 = 50.0;
/// FinalTarget never shrinks below this on small screens
pub const FINAL_TARGET_MIN_RADIUS: f32 = 30.0;

const PULSE_SPEED: f32 = 0.05;
const SPIN_SPEED: f32 = 0.01;
const WANDER_SPEED: f32 = 0.02;
const WANDER_RADIUS: Vec2 = Vec2::new(50.0, 30.0);
const EVADE_ACCEL: f32 = 1.4;
const MAX_EVADE_SPEED: f32 = 2.2;
const EVADE_FRICTION: f32 = 0.95;

/// What the player is chasing on a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Choripan,
    Vino,
    Ticket,
    Antofagasta,
    Pokemon,
    Odin,
    Earth,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Choripan => "choripan",
            TargetKind::Vino => "vino",
            TargetKind::Ticket => "ticket",
            TargetKind::Antofagasta => "antofagasta",
            TargetKind::Pokemon => "pokemon",
            TargetKind::Odin => "odin",
            TargetKind::Earth => "earth",
        }
    }

    pub fn image_key(&self) -> ImageKey {
        match self {
            TargetKind::Choripan => ImageKey::Choripan,
            TargetKind::Vino => ImageKey::Vino,
            TargetKind::Ticket => ImageKey::Ticket,
            TargetKind::Antofagasta => ImageKey::Antofagasta,
            TargetKind::Pokemon => ImageKey::Pokemon,
            TargetKind::Odin => ImageKey::Odin,
            TargetKind::Earth => ImageKey::Earth,
        }
    }
}

/// Fleeing collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub body: Body,
    pub kind: TargetKind,
    pub message: String,
    /// Monotonic: never goes back to false
    pub collected: bool,

    /// Wander anchor
    pub anchor: Vec2,
    move_time: f32,
    /// Offset accumulated by edge bouncing
    pub bounce: Vec2,
    pub bounce_vel: Vec2,
    /// Flee velocity, added on top of wander + bounce
    pub evade_vel: Vec2,

    pulse: f32,
    rotation: f32,
    pub base_scale: f32,
    pub wiggle: Vec2,
    wiggle_time: f32,
    /// Ship distance seen on the last update (drives the glow)
    ship_distance: f32,
    fade: Option<Fade>,
}

impl Target {
    pub fn new(pos: Vec2, kind: TargetKind, message: impl Into<String>, rng: &mut Pcg32) -> Self {
        Self {
            body: Body::new(pos, TARGET_RADIUS),
            kind,
            message: message.into(),
            collected: false,
            anchor: pos,
            move_time: 0.0,
            bounce: Vec2::ZERO,
            bounce_vel: Vec2::new(spread(rng.random(), 1.0), spread(rng.random(), 1.0)),
            evade_vel: Vec2::ZERO,
            pulse: 0.0,
            rotation: 0.0,
            base_scale: 1.0,
            wiggle: Vec2::ZERO,
            wiggle_time: 0.0,
            ship_distance: f32::INFINITY,
            fade: None,
        }
    }

    /// Mark as collected and start fading out. The prize stays drawn,
    /// fading over `fade_ms`, instead of vanishing on the collect tick;
    /// position updates stop immediately either way.
    pub fn collect(&mut self, now_ms: f64, fade_ms: f64) {
        self.collected = true;
        self.fade = Some(Fade::new(now_ms, fade_ms, self.body.opacity));
    }

    /// Advance the collect fade (runs even while gameplay is paused)
    pub fn animate(&mut self, now_ms: f64) {
        if let Some(fade) = self.fade {
            if fade.apply(&mut self.body, now_ms) {
                self.fade = None;
            }
        }
    }
}

impl Entity for Target {
    fn body(&self) -> &Body {
        &self.body
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) {
        if self.collected {
            return;
        }

        let r = self.body.radius;
        let (w, h) = (ctx.viewport.width, ctx.viewport.height);
        let ship_distance = ctx
            .ship
            .map_or(f32::INFINITY, |ship| ship.distance(self.body.pos));
        self.ship_distance = ship_distance;

        self.pulse += PULSE_SPEED;
        self.rotation += SPIN_SPEED;
        self.move_time += WANDER_SPEED;

        // Wander around the anchor
        let mut base = self.anchor
            + Vec2::new(
                self.move_time.sin() * WANDER_RADIUS.x,
                (self.move_time * 0.7).cos() * WANDER_RADIUS.y,
            );

        // Bounce offset reflects at the canvas edges
        self.bounce += self.bounce_vel;
        let probe = base + self.bounce;
        if probe.x < r || probe.x > w - r {
            self.bounce_vel.x = -self.bounce_vel.x;
        }
        if probe.y < r || probe.y > h - r {
            self.bounce_vel.y = -self.bounce_vel.y;
        }
        base += self.bounce;

        // Flee from the ship
        if let Some(ship) = ctx.ship {
            if ship_distance < EVASION_RANGE {
                let away = self.body.pos - ship;
                let dist = away.length();
                if dist > 0.0 && dist < EVASION_RANGE {
                    self.evade_vel += away / dist * EVADE_ACCEL;
                }
            }
        }
        let speed = self.evade_vel.length();
        if speed > MAX_EVADE_SPEED {
            self.evade_vel = self.evade_vel / speed * MAX_EVADE_SPEED;
        }
        self.evade_vel *= EVADE_FRICTION;

        self.body.pos = ctx.viewport.clamp_inset(base + self.evade_vel, r);

        self.base_scale = if ship_distance < HIGHLIGHT_RANGE { 1.1 } else { 1.0 };

        if ship_distance < WIGGLE_RANGE {
            self.wiggle_time += 0.2;
            self.wiggle = Vec2::new(
                (self.wiggle_time * 3.0).sin() * 3.0,
                (self.wiggle_time * 2.0).cos() * 3.0,
            );
        } else {
            self.wiggle = Vec2::ZERO;
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, images: &dyn ImageSource) {
        let scale = self.base_scale + self.pulse.sin() * 0.1;
        let at = self.body.pos + self.wiggle;
        let r = self.body.radius;

        if !self.collected && self.ship_distance < HIGHLIGHT_RANGE {
            let glow = 50.0 + (self.pulse * 2.0).sin() * 10.0;
            canvas.fill_radial(
                at.x,
                at.y,
                glow,
                colors::TARGET_GLOW,
                colors::transparent(colors::TARGET_GLOW),
            );
        }

        canvas.save();
        canvas.translate(at.x, at.y);
        canvas.scale(scale, scale);
        canvas.rotate(self.rotation);
        match images.image(self.kind.image_key()) {
            Some(img) => canvas.draw_image(img, -r, -r, r * 2.0, r * 2.0),
            None => canvas.fill_radial(0.0, 0.0, r, colors::TARGET_INNER, colors::TARGET_OUTER),
        }
        canvas.stroke_circle(0.0, 0.0, r, 3.0, colors::TARGET_RIM);
        canvas.restore();
    }
}

/// Level 7 goal: the planet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalTarget {
    pub body: Body,
    pub message: String,
    pub collected: bool,
    pulse: f32,
    rotation: f32,
}

impl FinalTarget {
    pub fn new(pos: Vec2, message: impl Into<String>) -> Self {
        Self {
            body: Body::new(pos, FINAL_TARGET_RADIUS),
            message: message.into(),
            collected: false,
            pulse: 0.0,
            rotation: 0.0,
        }
    }

    pub fn collect(&mut self) {
        self.collected = true;
    }
}

impl Entity for FinalTarget {
    fn body(&self) -> &Body {
        &self.body
    }

    fn update(&mut self, _ctx: &mut TickContext<'_>) {
        self.pulse += 0.03;
        self.rotation += 0.002;
    }

    fn render(&self, canvas: &mut dyn Canvas, images: &dyn ImageSource) {
        let scale = 1.0 + self.pulse.sin() * 0.1;
        let p = self.body.pos;
        let r = self.body.radius;

        let glow = 80.0 + (self.pulse * 2.0).sin() * 15.0;
        canvas.fill_radial(
            p.x,
            p.y,
            glow,
            colors::EARTH_GLOW,
            colors::transparent(colors::EARTH_GLOW),
        );

        canvas.save();
        canvas.translate(p.x, p.y);
        canvas.scale(scale, scale);
        canvas.rotate(self.rotation);
        match images.image(ImageKey::Earth) {
            Some(img) => canvas.draw_image(img, -r, -r, r * 2.0, r * 2.0),
            None => canvas.fill_circle(0.0, 0.0, r, colors::EARTH_FALLBACK),
        }
        canvas.restore();
    }
}

/// The level's single collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Objective {
    Target(Target),
    Final(FinalTarget),
}

impl Objective {
    pub fn kind(&self) -> TargetKind {
        match self {
            Objective::Target(t) => t.kind,
            Objective::Final(_) => TargetKind::Earth,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Objective::Target(t) => &t.message,
            Objective::Final(f) => &f.message,
        }
    }

    pub fn is_collected(&self) -> bool {
        match self {
            Objective::Target(t) => t.collected,
            Objective::Final(f) => f.collected,
        }
    }

    pub fn collect(&mut self, now_ms: f64, fade_ms: f64) {
        match self {
            Objective::Target(t) => t.collect(now_ms, fade_ms),
            Objective::Final(f) => f.collect(),
        }
    }

    pub fn animate(&mut self, now_ms: f64) {
        if let Objective::Target(t) = self {
            t.animate(now_ms);
        }
    }

    fn inner(&self) -> &dyn Entity {
        match self {
            Objective::Target(t) => t,
            Objective::Final(f) => f,
        }
    }
}

impl Entity for Objective {
    fn body(&self) -> &Body {
        self.inner().body()
    }

    fn update(&mut self, ctx: &mut TickContext<'_>) {
        match self {
            Objective::Target(t) => t.update(ctx),
            Objective::Final(f) => f.update(ctx),
        }
    }

    fn render(&self, canvas: &mut dyn Canvas, images: &dyn ImageSource) {
        self.inner().render(canvas, images);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{NoImages, RecordingCanvas};
    use crate::sim::entity::{Viewport, draw};
    use rand::SeedableRng;

    const VP: Viewport = Viewport::new(800.0, 600.0);

    fn tick(target: &mut Target, ship: Option<Vec2>) {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut ctx = TickContext {
            viewport: VP,
            ship,
            now_ms: 0.0,
            paused: false,
            rng: &mut rng,
        };
        target.update(&mut ctx);
    }

    fn target_at(pos: Vec2) -> Target {
        let mut rng = Pcg32::seed_from_u64(42);
        Target::new(pos, TargetKind::Choripan, "found", &mut rng)
    }

    #[test]
    fn test_evades_ship_in_range() {
        let mut target = target_at(Vec2::new(100.0, 100.0));
        let ship = Vec2::new(100.0, 290.0);
        tick(&mut target, Some(ship));

        // Ship is straight below: flee straight up
        assert!(target.evade_vel.y < 0.0);
        assert!(target.evade_vel.x.abs() < 1e-6);
        assert!(target.evade_vel.length() > 0.0);
    }

    #[test]
    fn test_no_evasion_out_of_range() {
        let mut target = target_at(Vec2::new(100.0, 100.0));
        tick(&mut target, Some(Vec2::new(700.0, 500.0)));
        assert_eq!(target.evade_vel, Vec2::ZERO);
        assert_eq!(target.base_scale, 1.0);
    }

    #[test]
    fn test_evasion_speed_is_capped() {
        let mut target = target_at(Vec2::new(400.0, 300.0));
        for _ in 0..30 {
            let ship = target.body.pos + Vec2::new(-20.0, 0.0);
            tick(&mut target, Some(ship));
            assert!(target.evade_vel.length() <= MAX_EVADE_SPEED * EVADE_FRICTION + 1e-4);
        }
    }

    #[test]
    fn test_collected_target_is_frozen() {
        let mut target = target_at(Vec2::new(300.0, 300.0));
        tick(&mut target, Some(Vec2::new(320.0, 300.0)));
        target.collect(0.0, 500.0);
        let frozen = target.body.pos;
        for _ in 0..50 {
            tick(&mut target, Some(Vec2::new(310.0, 300.0)));
        }
        assert_eq!(target.body.pos, frozen);
        assert!(target.collected);
    }

    #[test]
    fn test_highlight_and_wiggle_when_close() {
        let mut target = target_at(Vec2::new(400.0, 300.0));
        tick(&mut target, Some(Vec2::new(400.0, 300.0 + 100.0)));
        assert_eq!(target.base_scale, 1.1);

        let near = target.body.pos + Vec2::new(0.0, 30.0);
        tick(&mut target, Some(near));
        assert!(target.wiggle != Vec2::ZERO);
    }

    #[test]
    fn test_stays_inside_viewport() {
        let mut target = target_at(Vec2::new(35.0, 35.0));
        for i in 0..500 {
            let ship = if i % 2 == 0 {
                Some(target.body.pos + Vec2::new(50.0, 50.0))
            } else {
                None
            };
            tick(&mut target, ship);
            let p = target.body.pos;
            assert!(p.x >= TARGET_RADIUS && p.x <= VP.width - TARGET_RADIUS);
            assert!(p.y >= TARGET_RADIUS && p.y <= VP.height - TARGET_RADIUS);
        }
    }

    #[test]
    fn test_faded_target_is_not_drawn() {
        let mut target = target_at(Vec2::new(300.0, 300.0));
        target.collect(1000.0, 500.0);
        target.animate(1200.0);
        let mut canvas = RecordingCanvas::new();
        draw(&target, &mut canvas, &NoImages);
        assert!(canvas.draw_calls() > 0);

        target.animate(1600.0);
        canvas.clear();
        draw(&target, &mut canvas, &NoImages);
        assert_eq!(canvas.draw_calls(), 0);
    }

    #[test]
    fn test_final_target_never_moves() {
        let mut objective = Objective::Final(FinalTarget::new(Vec2::new(400.0, 300.0), "home"));
        let mut rng = Pcg32::seed_from_u64(0);
        for _ in 0..20 {
            let mut ctx = TickContext {
                viewport: VP,
                ship: Some(Vec2::new(410.0, 300.0)),
                now_ms: 0.0,
                paused: false,
                rng: &mut rng,
            };
            objective.update(&mut ctx);
        }
        assert_eq!(objective.pos(), Vec2::new(400.0, 300.0));
        assert_eq!(objective.kind(), TargetKind::Earth);
        objective.collect(0.0, 500.0);
        assert!(objective.is_collected());
    }
}

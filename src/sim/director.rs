//! Level director
//!
//! Owns everything that lives and dies with a level: the foe, the
//! objective, missiles, bursts and the spawn timer. Levels run strictly
//! 1 → 7; the only way back is restarting the current level after a hit.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::Foe;
use super::entity::{Entity, TickContext, Viewport};
use super::level::{Layout, LevelPlan, level_plan};
use super::messages::{announcement, target_message};
use super::missile::Missile;
use super::particle::{CollectionParticle, ExplosionParticle};
use super::ship::Ship;
use super::target::{FINAL_TARGET_MIN_RADIUS, FinalTarget, Objective, Target, TargetKind};
use super::timer::SpawnTimer;
use crate::consts::{COLLECTION_BURST, EXPLOSION_BURST, MAX_LEVEL, MISSILE_MARGIN};
use crate::platform::UiSink;

/// What the collision pass found this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    None,
    /// The objective was reached and the game is now paused for its message
    TargetFound,
    /// A missile hit the ship; the level must restart
    ShipHit,
}

/// Where the game goes after the player confirms a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advance {
    Level(u32),
    /// Past the last level: show the final screen after a short delay
    Finale,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDirector {
    /// 1-based current level
    pub level: u32,
    /// Paused for a message; gameplay freezes, bursts keep animating
    pub paused: bool,
    spawner: SpawnTimer,
    pub missiles: Vec<Missile>,
    pub collection: Vec<CollectionParticle>,
    pub explosions: Vec<ExplosionParticle>,
    pub foe: Option<Foe>,
    pub objective: Option<Objective>,
    collect_fade_ms: f64,
}

impl LevelDirector {
    pub fn new(collect_fade_ms: f64) -> Self {
        Self {
            level: 1,
            paused: false,
            spawner: SpawnTimer::new(),
            missiles: Vec::new(),
            collection: Vec::new(),
            explosions: Vec::new(),
            foe: None,
            objective: None,
            collect_fade_ms,
        }
    }

    pub fn plan(&self) -> Option<&'static LevelPlan> {
        level_plan(self.level)
    }

    pub fn spawner(&self) -> &SpawnTimer {
        &self.spawner
    }

    /// Tear down the level's entities and cancel its spawn timer
    pub fn clear_level(&mut self) {
        self.spawner.cancel();
        self.paused = false;
        self.missiles.clear();
        self.explosions.clear();
        self.collection.clear();
        self.foe = None;
        self.objective = None;
    }

    /// Build level `level` from scratch. Any previous spawn timer is cancelled first.
    pub fn setup_level(
        &mut self,
        level: u32,
        layout: &Layout,
        now_ms: f64,
        rng: &mut Pcg32,
        ui: &mut dyn UiSink,
    ) {
        self.clear_level();
        self.level = level;

        let Some(plan) = level_plan(level) else {
            log::warn!("no plan for level {level}; leaving it empty");
            return;
        };

        let scale = layout.scale();
        self.foe = plan.foe.map(|kind| Foe::new(kind, layout.foe_pos(), scale));

        let pos = layout.objective_pos(plan);
        self.objective = Some(match plan.target {
            TargetKind::Earth => {
                let mut earth = FinalTarget::new(pos, target_message(TargetKind::Earth));
                earth.body.radius = (earth.body.radius * scale).max(FINAL_TARGET_MIN_RADIUS);
                Objective::Final(earth)
            }
            kind => {
                let mut target = Target::new(pos, kind, target_message(kind), rng);
                target.body.radius *= scale;
                Objective::Target(target)
            }
        });

        if plan.spawns_missiles() {
            self.spawner.start(plan.spawn_interval_ms, now_ms);
        }

        ui.update_level(level, MAX_LEVEL);
        log::info!("Level {level} ready ({})", plan.target.as_str());
    }

    /// Spawn a missile if the timer fired. Nothing spawns while paused or
    /// without a foe and a ship. Returns true when a missile was added.
    pub fn poll_spawner(
        &mut self,
        now_ms: f64,
        ship: Option<Vec2>,
        rng: &mut Pcg32,
        scale: f32,
    ) -> bool {
        if !self.spawner.poll(now_ms) || self.paused {
            return false;
        }
        let (Some(foe), Some(ship)) = (self.foe.as_mut(), ship) else {
            return false;
        };
        match foe.shoot(ship, now_ms, rng) {
            Some(missile) => {
                self.missiles.push(missile.with_scale(scale));
                log::debug!("missile spawned ({} in flight)", self.missiles.len());
                true
            }
            None => false,
        }
    }

    /// Bursts and the collect fade; these run even while paused
    pub fn update_effects(&mut self, ctx: &mut TickContext<'_>) {
        self.collection.retain_mut(|p| {
            p.update(ctx);
            !p.is_dead()
        });
        self.explosions.retain_mut(|p| {
            p.update(ctx);
            !p.is_dead()
        });
        if let Some(objective) = &mut self.objective {
            objective.animate(ctx.now_ms);
        }
    }

    /// Objective, foe and missiles
    pub fn update_entities(&mut self, ctx: &mut TickContext<'_>) {
        if let Some(objective) = &mut self.objective {
            objective.update(ctx);
        }
        if let Some(foe) = &mut self.foe {
            foe.update(ctx);
        }
        for missile in &mut self.missiles {
            missile.update(ctx);
        }
    }

    /// Drop missiles that left the viewport grown by the margin
    pub fn prune_missiles(&mut self, viewport: Viewport) {
        self.missiles
            .retain(|m| viewport.contains_with_margin(m.body.pos, MISSILE_MARGIN));
    }

    pub fn check_collisions(
        &mut self,
        ship: &Ship,
        now_ms: f64,
        rng: &mut Pcg32,
        ui: &mut dyn UiSink,
    ) -> CollisionOutcome {
        if self.paused {
            return CollisionOutcome::None;
        }

        let reached = self
            .objective
            .as_ref()
            .is_some_and(|o| !o.is_collected() && ship.body.overlaps(o.body()));
        if reached && self.on_target_found(now_ms, rng, ui) {
            return CollisionOutcome::TargetFound;
        }

        if self.missiles.iter().any(|m| ship.body.overlaps(&m.body)) {
            log::info!("Ship hit on level {}", self.level);
            return CollisionOutcome::ShipHit;
        }
        CollisionOutcome::None
    }

    /// Pause, burst, mark collected and announce. No-op (false) if already
    /// collected or already paused.
    pub fn on_target_found(&mut self, now_ms: f64, rng: &mut Pcg32, ui: &mut dyn UiSink) -> bool {
        if self.paused {
            return false;
        }
        let Some(objective) = self.objective.as_mut() else {
            log::warn!("target found with no objective on level {}", self.level);
            return false;
        };
        if objective.is_collected() {
            return false;
        }

        self.paused = true;
        let at = objective.pos();
        self.collection
            .extend((0..COLLECTION_BURST).map(|_| CollectionParticle::new(at, rng)));
        objective.collect(now_ms, self.collect_fade_ms);

        let kind = objective.kind();
        let text = announcement(kind, self.level, objective.message()).to_owned();
        if kind == TargetKind::Odin {
            self.explode_foe(rng);
        }
        ui.show_message(&text, true);
        log::info!("Found {} on level {}", kind.as_str(), self.level);
        true
    }

    /// Blow up a FinalEnemy: debris burst and every missile in flight removed
    fn explode_foe(&mut self, rng: &mut Pcg32) {
        let Some(foe) = self.foe.as_mut() else {
            return;
        };
        if !foe.explode() {
            return;
        }
        let at = foe.pos();
        self.explosions
            .extend((0..EXPLOSION_BURST).map(|_| ExplosionParticle::new(at, rng)));
        self.missiles.clear();
        log::info!("Final enemy destroyed");
    }

    /// Leave the message pause and decide what comes next. `None` when no
    /// message was pending.
    pub fn resume_after_message(&mut self, ui: &mut dyn UiSink) -> Option<Advance> {
        if !self.paused {
            log::debug!("advance ignored: nothing to confirm");
            return None;
        }
        self.paused = false;
        ui.hide_message();
        Some(if self.level < MAX_LEVEL {
            Advance::Level(self.level + 1)
        } else {
            Advance::Finale
        })
    }
}

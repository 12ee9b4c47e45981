//! Simulation loop
//!
//! [`Game::frame`] is called once per display refresh. It runs one or more
//! update passes (depending on the [`Integrator`]) and fires any due
//! timeline events. Rendering is a separate call so hosts can skip it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::director::{Advance, CollisionOutcome, LevelDirector};
use super::enemy::FoeKind;
use super::entity::{Entity, TickContext, Viewport};
use super::level::Layout;
use super::particle::StarParticle;
use super::ship::{DirectionKeys, Ship};
use super::target::TargetKind;
use super::timer::{Timeline, TimelineEvent};
use crate::consts::{FRAME_MS, MAX_LEVEL};
use crate::platform::{UiSink, touch_steer};
use crate::render::{Canvas, ImageSource, Scene, render_scene};
use crate::settings::{Integrator, Settings};

/// Seed used when settings do not provide one
pub const DEFAULT_SEED: u64 = 0x6761_6c61_7869_61;

/// Longest frame delta fed to the fixed-step accumulator
const MAX_FRAME_MS: f64 = 100.0;

/// Where the run stands, as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Not started (or stopped before finishing)
    Idle,
    Playing,
    /// Objective reached; waiting for the player to confirm the message
    AwaitingAdvance,
    /// Last message confirmed; final screen pending
    Finale,
    /// Final screen shown
    Finished,
}

/// Snapshot for hosts and logs
#[derive(Debug, Clone, Serialize)]
pub struct GameStatus {
    pub level: u32,
    pub max_level: u32,
    pub phase: GamePhase,
    pub running: bool,
    pub objective: Option<TargetKind>,
    pub objective_collected: bool,
    pub foe: Option<FoeKind>,
    pub foe_exploded: bool,
    pub missiles: usize,
    pub particles: usize,
    pub ship: Option<Vec2>,
    pub frames: u64,
    pub ticks: u64,
}

pub struct Game<U: UiSink> {
    pub settings: Settings,
    pub layout: Layout,
    pub ui: U,
    rng: Pcg32,
    pub ship: Option<Ship>,
    keys: DirectionKeys,
    pub stars: Vec<StarParticle>,
    pub director: LevelDirector,
    timeline: Timeline,
    running: bool,
    finished: bool,
    last_frame_ms: Option<f64>,
    accumulator_ms: f64,
    frames: u64,
    ticks: u64,
}

impl<U: UiSink> Game<U> {
    pub fn new(settings: Settings, layout: Layout, ui: U) -> Self {
        let seed = settings.seed.unwrap_or(DEFAULT_SEED);
        let collect_fade_ms = settings.collect_fade_ms;
        Self {
            settings,
            layout,
            ui,
            rng: Pcg32::seed_from_u64(seed),
            ship: None,
            keys: DirectionKeys::default(),
            stars: Vec::new(),
            director: LevelDirector::new(collect_fade_ms),
            timeline: Timeline::new(),
            running: false,
            finished: false,
            last_frame_ms: None,
            accumulator_ms: 0.0,
            frames: 0,
            ticks: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Loop clock: time of the last frame
    pub fn now_ms(&self) -> f64 {
        self.last_frame_ms.unwrap_or(0.0)
    }

    /// Start a run at level 1
    pub fn start(&mut self, now_ms: f64) {
        if self.running {
            return;
        }
        log::info!("Game starting");
        self.finished = false;
        self.timeline.clear();
        self.last_frame_ms = Some(now_ms);
        self.accumulator_ms = 0.0;
        self.init_level(1, now_ms);
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Fresh ship at the start point, stars if missing, then the level itself
    fn init_level(&mut self, level: u32, now_ms: f64) {
        self.director.clear_level();

        let mut ship = Ship::scaled(self.layout.ship_start(), self.layout.scale());
        ship.set_keys(self.keys);
        self.ship = Some(ship);

        if self.stars.is_empty() {
            self.seed_stars();
        }

        self.director
            .setup_level(level, &self.layout, now_ms, &mut self.rng, &mut self.ui);
    }

    fn seed_stars(&mut self) {
        let (min, max) = (self.settings.star_count_min, self.settings.star_count_max);
        let count = if min < max {
            self.rng.random_range(min..=max)
        } else {
            min
        };
        let vp = self.layout.viewport;
        for _ in 0..count {
            let pos = Vec2::new(
                self.rng.random::<f32>() * vp.width,
                self.rng.random::<f32>() * vp.height,
            );
            self.stars.push(StarParticle::new(pos, &mut self.rng));
        }
    }

    /// One display frame
    pub fn frame(&mut self, now_ms: f64) {
        if !self.running {
            return;
        }
        let dt = self
            .last_frame_ms
            .map_or(FRAME_MS, |last| now_ms - last)
            .max(0.0);
        self.last_frame_ms = Some(now_ms);
        self.frames += 1;

        match self.settings.integrator {
            Integrator::PerFrame => self.update(dt, now_ms),
            Integrator::FixedStep => {
                let step = self.settings.fixed_step_ms();
                self.accumulator_ms += dt.min(MAX_FRAME_MS);
                let mut substeps = 0;
                while self.accumulator_ms >= step && substeps < self.settings.max_substeps {
                    self.update(step, now_ms);
                    self.accumulator_ms -= step;
                    substeps += 1;
                    if !self.running {
                        break;
                    }
                }
                // Time the substep cap could not absorb is dropped
                let backlog = step * f64::from(self.settings.max_substeps);
                self.accumulator_ms = self.accumulator_ms.min(backlog);
            }
        }

        for event in self.timeline.drain_due(now_ms) {
            match event {
                TimelineEvent::ShowFinalScreen => {
                    log::info!("Final screen");
                    self.ui.show_final_screen();
                    self.stop();
                    self.finished = true;
                }
            }
        }
    }

    /// One simulation tick. Motion is per tick; `_dt_ms` is not used for scaling.
    pub fn update(&mut self, _dt_ms: f64, now_ms: f64) {
        self.ticks += 1;
        let viewport = self.layout.viewport;
        let scale = self.layout.scale();
        let ship_pos = self.ship.as_ref().map(|s| s.body.pos);

        self.director
            .poll_spawner(now_ms, ship_pos, &mut self.rng, scale);

        let mut ctx = TickContext {
            viewport,
            ship: ship_pos,
            now_ms,
            paused: self.director.paused,
            rng: &mut self.rng,
        };

        if self.director.paused {
            self.director.update_effects(&mut ctx);
            return;
        }

        for star in &mut self.stars {
            star.update(&mut ctx);
        }
        self.director.update_effects(&mut ctx);
        if let Some(ship) = &mut self.ship {
            ship.update(&mut ctx);
        }
        ctx.ship = self.ship.as_ref().map(|s| s.body.pos);
        self.director.update_entities(&mut ctx);
        self.director.prune_missiles(viewport);

        let Some(ship) = &self.ship else {
            return;
        };
        let outcome = self
            .director
            .check_collisions(ship, now_ms, &mut self.rng, &mut self.ui);
        if outcome == CollisionOutcome::ShipHit {
            self.restart_current_level(now_ms);
        }
    }

    pub fn render(&self, canvas: &mut dyn Canvas, images: &dyn ImageSource) {
        let scene = Scene {
            viewport: self.layout.viewport,
            stars: &self.stars,
            foe: self.director.foe.as_ref(),
            objective: self.director.objective.as_ref(),
            missiles: &self.director.missiles,
            ship: self.ship.as_ref(),
            collection: &self.director.collection,
            explosions: &self.director.explosions,
        };
        render_scene(canvas, images, &scene);
    }

    /// Soft failure: rebuild the current level, progress kept
    pub fn restart_current_level(&mut self, now_ms: f64) {
        log::info!("Restarting level {}", self.director.level);
        self.init_level(self.director.level, now_ms);
    }

    /// Full restart from the final screen
    pub fn restart_game(&mut self, now_ms: f64) {
        log::info!("Restarting game");
        self.stop();
        self.director.clear_level();
        self.director.level = 1;
        self.ship = None;
        self.stars.clear();
        self.timeline.clear();
        self.ui.show_game_screen();
        self.start(now_ms);
    }

    /// Player confirmed the message panel
    pub fn resume_after_message(&mut self) {
        let now_ms = self.now_ms();
        match self.director.resume_after_message(&mut self.ui) {
            Some(Advance::Level(level)) => self.init_level(level, now_ms),
            Some(Advance::Finale) => {
                if !self.timeline.is_scheduled(TimelineEvent::ShowFinalScreen) {
                    self.timeline.schedule(
                        now_ms + self.settings.finale_delay_ms,
                        TimelineEvent::ShowFinalScreen,
                    );
                }
            }
            None => {}
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        log::debug!("viewport {}x{}", viewport.width, viewport.height);
        self.layout.viewport = viewport;
        if let Some(ship) = &mut self.ship {
            ship.clamp_to(viewport);
        }
    }

    pub fn set_keys(&mut self, keys: DirectionKeys) {
        self.keys = keys;
        if let Some(ship) = &mut self.ship {
            ship.set_keys(keys);
        }
    }

    pub fn keys(&self) -> DirectionKeys {
        self.keys
    }

    /// Finger moved to `point` (canvas coordinates)
    pub fn touch_move(&mut self, point: Vec2) {
        if !self.running || self.director.paused {
            return;
        }
        let Some(ship) = &mut self.ship else {
            return;
        };
        if let Some(vel) = touch_steer(
            ship.body.pos,
            point,
            self.settings.touch_follow_speed,
            self.settings.touch_deadzone,
        ) {
            ship.steer(vel);
        }
    }

    pub fn touch_end(&mut self) {
        if let Some(ship) = &mut self.ship {
            ship.release();
        }
    }

    pub fn phase(&self) -> GamePhase {
        if self.finished {
            GamePhase::Finished
        } else if !self.running {
            GamePhase::Idle
        } else if self.timeline.is_scheduled(TimelineEvent::ShowFinalScreen) {
            GamePhase::Finale
        } else if self.director.paused {
            GamePhase::AwaitingAdvance
        } else {
            GamePhase::Playing
        }
    }

    pub fn status(&self) -> GameStatus {
        let objective = self.director.objective.as_ref();
        let foe = self.director.foe.as_ref();
        GameStatus {
            level: self.director.level,
            max_level: MAX_LEVEL,
            phase: self.phase(),
            running: self.running,
            objective: objective.map(|o| o.kind()),
            objective_collected: objective.is_some_and(|o| o.is_collected()),
            foe: foe.map(|f| f.kind()),
            foe_exploded: foe.is_some_and(|f| f.is_exploded()),
            missiles: self.director.missiles.len(),
            particles: self.director.collection.len() + self.director.explosions.len(),
            ship: self.ship.as_ref().map(|s| s.body.pos),
            frames: self.frames,
            ticks: self.ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{RecordingUi, UiEvent};
    use crate::render::{DrawOp, ImageHandle, ImageKey, RecordingCanvas};
    use crate::sim::missile::Missile;
    use crate::sim::particle::CollectionParticle;
    use proptest::prelude::*;

    const VP: Viewport = Viewport::new(1000.0, 800.0);
    const STEP: f64 = 16.0;

    fn game_with(settings: Settings) -> Game<RecordingUi> {
        Game::new(settings, Layout::new(VP, false), RecordingUi::new())
    }

    fn seeded(seed: u64) -> Game<RecordingUi> {
        game_with(Settings {
            seed: Some(seed),
            ..Settings::default()
        })
    }

    /// Park the ship on the objective until it is collected
    fn catch_objective(game: &mut Game<RecordingUi>, now: &mut f64) {
        for _ in 0..20 {
            let pos = game.director.objective.as_ref().map(|o| o.pos()).expect("objective");
            if let Some(ship) = &mut game.ship {
                ship.body.pos = pos;
                ship.vel = Vec2::ZERO;
            }
            game.director.missiles.clear();
            *now += STEP;
            game.frame(*now);
            if game.director.paused {
                return;
            }
        }
        panic!("objective on level {} never reached", game.director.level);
    }

    #[test]
    fn test_full_run_reaches_final_screen() {
        let mut game = seeded(1);
        let mut now = 0.0;
        game.start(now);

        for level in 1..=MAX_LEVEL {
            assert_eq!(game.director.level, level);
            catch_objective(&mut game, &mut now);
            assert_eq!(game.phase(), GamePhase::AwaitingAdvance);
            game.resume_after_message();
        }

        assert_eq!(game.phase(), GamePhase::Finale);
        let confirmed_at = now;
        now += 480.0;
        game.frame(now);
        assert!(game.is_running());
        assert_eq!(game.ui.count(|e| *e == UiEvent::ShowFinalScreen), 0);

        game.frame(confirmed_at + 500.0);
        assert!(!game.is_running());
        assert_eq!(game.phase(), GamePhase::Finished);
        assert_eq!(game.ui.count(|e| *e == UiEvent::ShowFinalScreen), 1);
        assert_eq!(game.ui.levels(), (1..=MAX_LEVEL).collect::<Vec<_>>());

        // Further confirmations change nothing
        game.resume_after_message();
        game.frame(now + 5000.0);
        assert_eq!(game.ui.count(|e| *e == UiEvent::ShowFinalScreen), 1);
    }

    #[test]
    fn test_pause_freezes_gameplay_but_not_bursts() {
        let mut game = seeded(2);
        let mut now = 0.0;
        game.start(now);
        catch_objective(&mut game, &mut now);
        game.director
            .missiles
            .push(Missile::new(Vec2::new(900.0, 100.0), Vec2::ZERO, 2.0));

        let ship = game.ship.as_ref().map(|s| s.body.pos);
        let objective = game.director.objective.as_ref().map(|o| o.pos());
        let foe = game.director.foe.clone().map(|f| format!("{f:?}"));
        let missile = game.director.missiles[0].body.pos;
        let star = game.stars[0].body.pos;
        let bursts = game.director.collection.len();

        game.set_keys(DirectionKeys {
            right: true,
            ..Default::default()
        });
        for _ in 0..120 {
            now += STEP;
            game.frame(now);
        }

        assert_eq!(game.ship.as_ref().map(|s| s.body.pos), ship);
        assert_eq!(game.director.objective.as_ref().map(|o| o.pos()), objective);
        assert_eq!(game.director.foe.clone().map(|f| format!("{f:?}")), foe);
        assert_eq!(game.director.missiles.len(), 1);
        assert_eq!(game.director.missiles[0].body.pos, missile);
        assert_eq!(game.stars[0].body.pos, star);
        assert!(game.director.collection.len() < bursts);
    }

    #[test]
    fn test_missile_hit_restarts_level() {
        let mut game = seeded(3);
        let mut now = 0.0;
        game.start(now);
        catch_objective(&mut game, &mut now);
        game.resume_after_message();
        assert_eq!(game.director.level, 2);

        let ship = game.ship.as_ref().map(|s| s.body.pos).expect("ship");
        game.director
            .missiles
            .push(Missile::new(ship, ship + Vec2::new(0.0, 1.0), 2.0));
        now += STEP;
        game.frame(now);

        assert_eq!(game.director.level, 2);
        assert!(game.director.missiles.is_empty());
        assert_eq!(game.ship.as_ref().map(|s| s.body.pos), Some(game.layout.ship_start()));
        assert_eq!(game.ui.levels(), vec![1, 2, 2]);
    }

    #[test]
    fn test_missiles_spawn_on_level_interval() {
        let mut game = seeded(4);
        game.start(0.0);
        // Keep the ship well away from the foe's line of fire
        let mut now = 0.0;
        while now < 1290.0 {
            now += 10.0;
            game.frame(now);
        }
        assert!(game.director.missiles.is_empty());
        game.frame(1300.0);
        assert_eq!(game.director.missiles.len(), 1);
    }

    struct AllImages;

    impl ImageSource for AllImages {
        fn image(&self, key: ImageKey) -> Option<ImageHandle> {
            Some(ImageHandle {
                key,
                width: 100.0,
                height: 100.0,
                placeholder: false,
            })
        }
    }

    #[test]
    fn test_render_z_order() {
        let mut game = seeded(5);
        game.start(0.0);
        game.director
            .missiles
            .push(Missile::new(Vec2::new(300.0, 300.0), Vec2::ZERO, 2.0));
        let mut rng = Pcg32::seed_from_u64(0);
        game.director
            .collection
            .push(CollectionParticle::new(Vec2::new(10.0, 10.0), &mut rng));

        let mut canvas = RecordingCanvas::new();
        game.render(&mut canvas, &AllImages);

        let order = [
            ImageKey::Background,
            ImageKey::Enemy,
            ImageKey::Choripan,
            ImageKey::Missile,
            ImageKey::Ship,
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|k| canvas.first_image(*k).expect("drawn"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");

        let first_star = canvas
            .ops
            .iter()
            .position(|op| matches!(op, DrawOp::Circle { .. }))
            .expect("stars");
        let last_circle = canvas
            .ops
            .iter()
            .rposition(|op| matches!(op, DrawOp::Circle { .. }))
            .expect("sparkle");
        assert!(positions[0] < first_star && first_star < positions[1]);
        assert!(last_circle > positions[4]);
    }

    #[test]
    fn test_same_seed_same_run() {
        let run = |seed| {
            let mut game = seeded(seed);
            game.start(0.0);
            for i in 1..=400u32 {
                game.set_keys(DirectionKeys {
                    up: i % 90 < 30,
                    right: i % 50 < 25,
                    ..Default::default()
                });
                game.frame(i as f64 * STEP);
            }
            let stars: Vec<Vec2> = game.stars.iter().map(|s| s.body.pos).collect();
            (serde_json::to_string(&game.status()).expect("status"), stars)
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn test_fixed_step_decouples_from_frame_rate() {
        let mut per_frame = seeded(6);
        let mut fixed = game_with(Settings {
            seed: Some(6),
            integrator: Integrator::FixedStep,
            fixed_step_hz: 120.0,
            max_substeps: 4,
            ..Settings::default()
        });
        per_frame.start(0.0);
        fixed.start(0.0);
        for i in 1..=60 {
            per_frame.frame(i as f64 * 1000.0 / 60.0);
            fixed.frame(i as f64 * 1000.0 / 60.0);
        }
        assert_eq!(per_frame.status().ticks, 60);
        assert!((119..=120).contains(&fixed.status().ticks));

        // A long stall is capped by max_substeps
        let before = fixed.status().ticks;
        fixed.frame(60_000.0);
        assert_eq!(fixed.status().ticks - before, 4);
    }

    #[test]
    fn test_fixed_step_backlog_is_bounded() {
        let mut game = game_with(Settings {
            seed: Some(12),
            integrator: Integrator::FixedStep,
            fixed_step_hz: 1000.0,
            max_substeps: 2,
            ..Settings::default()
        });
        game.start(0.0);
        for i in 1..=200 {
            game.frame(i as f64 * 100.0);
            assert!(game.accumulator_ms <= 2.0 + 1e-9, "{}", game.accumulator_ms);
        }
        assert_eq!(game.status().ticks, 400);
    }

    #[test]
    fn test_restart_game_from_final_screen() {
        let mut game = seeded(7);
        let mut now = 0.0;
        game.start(now);
        game.director.level = MAX_LEVEL;
        game.restart_current_level(now);
        catch_objective(&mut game, &mut now);
        game.resume_after_message();
        game.frame(now + 1000.0);
        assert_eq!(game.phase(), GamePhase::Finished);

        game.restart_game(now + 2000.0);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.director.level, 1);
        assert!(!game.stars.is_empty());
        assert!(game.ui.events.contains(&UiEvent::ShowGameScreen));
        assert_eq!(game.ui.levels().last(), Some(&1));
    }

    #[test]
    fn test_resize_reclamps_ship() {
        let mut game = seeded(8);
        game.start(0.0);
        if let Some(ship) = &mut game.ship {
            ship.body.pos = Vec2::new(950.0, 750.0);
        }
        game.resize(Viewport::new(500.0, 400.0));
        let pos = game.ship.as_ref().map(|s| s.body.pos).expect("ship");
        assert_eq!(pos, Vec2::new(475.0, 375.0));
    }

    #[test]
    fn test_touch_steering_ignored_while_paused() {
        let mut game = seeded(9);
        let mut now = 0.0;
        game.start(now);
        game.touch_move(Vec2::new(1000.0, 400.0));
        let vel = game.ship.as_ref().map(|s| s.vel).expect("ship");
        assert!((vel.length() - 3.5).abs() < 1e-4);

        catch_objective(&mut game, &mut now);
        game.touch_move(Vec2::new(0.0, 0.0));
        assert_eq!(game.ship.as_ref().map(|s| s.vel), Some(Vec2::ZERO));
    }

    #[test]
    fn test_star_count_in_range() {
        let mut game = seeded(10);
        game.start(0.0);
        assert!((80..=150).contains(&game.stars.len()));
    }

    proptest! {
        #[test]
        fn prop_paused_entities_never_move(seed in 0u64..1000, frames in 1usize..60) {
            let mut game = seeded(seed);
            let mut now = 0.0;
            game.start(now);
            catch_objective(&mut game, &mut now);
            let ship = game.ship.as_ref().map(|s| s.body.pos);
            let objective = game.director.objective.as_ref().map(|o| o.pos());
            for _ in 0..frames {
                now += STEP;
                game.frame(now);
            }
            prop_assert_eq!(game.ship.as_ref().map(|s| s.body.pos), ship);
            prop_assert_eq!(game.director.objective.as_ref().map(|o| o.pos()), objective);
        }
    }
}

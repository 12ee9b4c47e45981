//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only (`Pcg32`), threaded through `TickContext`
//! - Timers driven by the caller's clock, never a wall clock
//! - Draws only through the `render::Canvas` seam

pub mod director;
pub mod enemy;
pub mod entity;
pub mod game;
pub mod level;
pub mod messages;
pub mod missile;
pub mod particle;
pub mod ship;
pub mod target;
pub mod timer;

pub use director::{Advance, CollisionOutcome, LevelDirector};
pub use enemy::{Enemy, FinalEnemy, Foe, FoeKind};
pub use entity::{Body, Entity, Fade, TickContext, Viewport, draw};
pub use game::{Game, GamePhase, GameStatus};
pub use level::{LEVELS, Layout, LevelPlan, level_plan, scale_for_width};
pub use missile::Missile;
pub use particle::{CollectionParticle, ExplosionParticle, StarParticle};
pub use ship::{DirectionKeys, Ship};
pub use target::{FinalTarget, Objective, Target, TargetKind};
pub use timer::{SpawnTimer, Timeline, TimelineEvent};

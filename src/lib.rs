//! Galaxia - a seven-level canvas chase game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, level director, frame loop)
//! - `render`: Draw-call seam, scene compositor and Canvas 2D backend
//! - `platform`: Collaborators around the core (UI sink, input, assets)
//! - `settings`: Data-driven configuration

pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;

pub use settings::{Integrator, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Number of levels in a run
    pub const MAX_LEVEL: u32 = 7;

    /// Missiles outside the viewport grown by this margin are pruned
    pub const MISSILE_MARGIN: f32 = 50.0;

    /// Target starts fleeing when the ship is closer than this
    pub const EVASION_RANGE: f32 = 200.0;
    /// Target glows and grows when the ship is closer than this
    pub const HIGHLIGHT_RANGE: f32 = 140.0;
    /// Target wiggles when the ship is closer than this
    pub const WIGGLE_RANGE: f32 = 80.0;

    /// Burst sizes
    pub const COLLECTION_BURST: usize = 20;
    pub const EXPLOSION_BURST: usize = 50;

    /// Distance of the FinalEnemy's random aim point
    pub const CHAOTIC_AIM_DISTANCE: f32 = 500.0;

    /// Delay between the last confirmation and the final screen
    pub const FINALE_DELAY_MS: f64 = 500.0;
    /// Opacity fade of a collected target
    pub const COLLECT_FADE_MS: f64 = 500.0;

    /// Nominal display refresh period, used for the first frame delta
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}

/// Uniform sample in `[-half, half)` from a unit sample
#[inline]
pub fn spread(unit: f32, half: f32) -> f32 {
    (unit - 0.5) * 2.0 * half
}

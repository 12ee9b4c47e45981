//! Per-level table and screen layout
//!
//! Every level places its foe at the canvas center and its objective at a
//! fixed offset from it. Touch layouts express the offset as a fraction of
//! the viewport and shrink sprites on narrow screens.

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use super::enemy::FoeKind;
use super::entity::Viewport;
use super::target::TargetKind;
use crate::consts::MAX_LEVEL;

/// Static description of one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelPlan {
    pub level: u32,
    pub target: TargetKind,
    pub foe: Option<FoeKind>,
    /// Missile spawn period; 0 disables spawning
    pub spawn_interval_ms: f64,
    /// Objective offset from center in pixels (desktop)
    pub offset: Vec2,
    /// Objective offset from center as a fraction of the viewport (touch)
    pub touch_offset: Vec2,
}

impl LevelPlan {
    pub fn spawns_missiles(&self) -> bool {
        self.level < MAX_LEVEL && self.spawn_interval_ms > 0.0 && self.foe.is_some()
    }
}

const fn plan(
    level: u32,
    target: TargetKind,
    foe: Option<FoeKind>,
    spawn_interval_ms: f64,
    offset: (f32, f32),
    touch_offset: (f32, f32),
) -> LevelPlan {
    LevelPlan {
        level,
        target,
        foe,
        spawn_interval_ms,
        offset: Vec2::new(offset.0, offset.1),
        touch_offset: Vec2::new(touch_offset.0, touch_offset.1),
    }
}

pub const LEVELS: [LevelPlan; MAX_LEVEL as usize] = [
    plan(1, TargetKind::Choripan, Some(FoeKind::Regular), 1300.0, (300.0, -200.0), (0.30, -0.20)),
    plan(2, TargetKind::Vino, Some(FoeKind::Regular), 1100.0, (-300.0, 200.0), (-0.30, 0.20)),
    plan(3, TargetKind::Ticket, Some(FoeKind::Regular), 950.0, (250.0, 250.0), (0.25, 0.25)),
    plan(4, TargetKind::Antofagasta, Some(FoeKind::Regular), 950.0, (200.0, -150.0), (0.20, -0.15)),
    plan(5, TargetKind::Pokemon, Some(FoeKind::Regular), 900.0, (-300.0, 150.0), (-0.30, 0.15)),
    plan(6, TargetKind::Odin, Some(FoeKind::Final), 800.0, (-350.0, 0.0), (-0.35, 0.0)),
    plan(7, TargetKind::Earth, None, 0.0, (0.0, 0.0), (0.0, 0.0)),
];

/// Plan for a 1-based level number
pub fn level_plan(level: u32) -> Option<&'static LevelPlan> {
    let index = level.checked_sub(1)? as usize;
    LEVELS.get(index)
}

/// Sprite scale for touch screens of the given width
pub fn scale_for_width(width: f32) -> f32 {
    if width < 600.0 {
        0.7
    } else if width < 900.0 {
        0.85
    } else {
        1.0
    }
}

/// Viewport plus the touch/desktop switch that decides placement and scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub viewport: Viewport,
    pub touch: bool,
}

impl Layout {
    pub fn new(viewport: Viewport, touch: bool) -> Self {
        Self { viewport, touch }
    }

    pub fn scale(&self) -> f32 {
        if self.touch {
            scale_for_width(self.viewport.width)
        } else {
            1.0
        }
    }

    pub fn ship_start(&self) -> Vec2 {
        let x = if self.touch {
            100.0f32.min(self.viewport.width * 0.15)
        } else {
            100.0
        };
        Vec2::new(x, self.viewport.height / 2.0)
    }

    pub fn foe_pos(&self) -> Vec2 {
        self.viewport.center()
    }

    pub fn objective_pos(&self, plan: &LevelPlan) -> Vec2 {
        let offset = if self.touch {
            plan.touch_offset * Vec2::new(self.viewport.width, self.viewport.height)
        } else {
            plan.offset
        };
        self.viewport.center() + offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sequential() {
        for (i, plan) in LEVELS.iter().enumerate() {
            assert_eq!(plan.level, i as u32 + 1);
        }
        assert!(level_plan(0).is_none());
        assert!(level_plan(8).is_none());
        assert_eq!(level_plan(6).map(|p| p.foe), Some(Some(FoeKind::Final)));
    }

    #[test]
    fn test_spawn_interval_shrinks_then_stops() {
        let intervals: Vec<f64> = LEVELS[..6].iter().map(|p| p.spawn_interval_ms).collect();
        assert!(intervals.windows(2).all(|w| w[1] <= w[0]));
        assert!(LEVELS[..6].iter().all(LevelPlan::spawns_missiles));
        assert!(!LEVELS[6].spawns_missiles());
        assert!(LEVELS[6].foe.is_none());
    }

    #[test]
    fn test_touch_scale_breakpoints() {
        assert_eq!(scale_for_width(599.0), 0.7);
        assert_eq!(scale_for_width(600.0), 0.85);
        assert_eq!(scale_for_width(899.0), 0.85);
        assert_eq!(scale_for_width(900.0), 1.0);

        let desktop = Layout::new(Viewport::new(400.0, 800.0), false);
        assert_eq!(desktop.scale(), 1.0);
    }

    #[test]
    fn test_objective_placement() {
        let plan = level_plan(1).expect("level 1");
        let desktop = Layout::new(Viewport::new(1000.0, 800.0), false);
        assert_eq!(desktop.objective_pos(plan), Vec2::new(800.0, 200.0));

        let touch = Layout::new(Viewport::new(400.0, 800.0), true);
        let p = touch.objective_pos(plan);
        assert!((p.x - 320.0).abs() < 1e-3);
        assert!((p.y - 240.0).abs() < 1e-3);
    }

    #[test]
    fn test_ship_start() {
        let desktop = Layout::new(Viewport::new(1000.0, 800.0), false);
        assert_eq!(desktop.ship_start(), Vec2::new(100.0, 400.0));
        let touch = Layout::new(Viewport::new(400.0, 800.0), true);
        assert_eq!(touch.ship_start(), Vec2::new(60.0, 400.0));
    }
}

//! Input mapping
//!
//! Keyboard players toggle four direction flags; touch players drag and the
//! ship heads toward the finger at a fixed speed.

use glam::Vec2;

pub use crate::sim::ship::DirectionKeys;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// What a key means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Steer(Direction),
    /// Confirm the message panel and move on
    Advance,
}

/// Map a `KeyboardEvent.key` value
pub fn map_key(key: &str) -> Option<KeyAction> {
    match key {
        "ArrowUp" => Some(KeyAction::Steer(Direction::Up)),
        "ArrowDown" => Some(KeyAction::Steer(Direction::Down)),
        "ArrowLeft" => Some(KeyAction::Steer(Direction::Left)),
        "ArrowRight" => Some(KeyAction::Steer(Direction::Right)),
        "Enter" => Some(KeyAction::Advance),
        _ => None,
    }
}

impl DirectionKeys {
    pub fn set(&mut self, direction: Direction, pressed: bool) {
        match direction {
            Direction::Up => self.up = pressed,
            Direction::Down => self.down = pressed,
            Direction::Left => self.left = pressed,
            Direction::Right => self.right = pressed,
        }
    }
}

/// Velocity that moves the ship toward a touch point, or `None` inside the deadzone
pub fn touch_steer(ship: Vec2, touch: Vec2, speed: f32, deadzone: f32) -> Option<Vec2> {
    let delta = touch - ship;
    let distance = delta.length();
    if distance > deadzone {
        Some(delta / distance * speed)
    } else {
        None
    }
}

const MOBILE_AGENTS: [&str; 7] = [
    "Android",
    "iPhone",
    "iPad",
    "iPod",
    "BlackBerry",
    "IEMobile",
    "Opera Mini",
];

/// Touch layout heuristic: a mobile user agent, or a narrow screen with touch events
pub fn is_touch_layout(user_agent: &str, viewport_width: f32, has_touch: bool) -> bool {
    MOBILE_AGENTS.iter().any(|agent| user_agent.contains(agent))
        || (viewport_width <= 768.0 && has_touch)
}

#[cfg(target_arch = "wasm32")]
pub fn detect_touch(window: &web_sys::Window) -> bool {
    let user_agent = window.navigator().user_agent().unwrap_or_default();
    let width = window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(1024.0) as f32;
    let has_touch = js_sys::Reflect::has(window, &"ontouchstart".into()).unwrap_or(false);
    is_touch_layout(&user_agent, width, has_touch)
}

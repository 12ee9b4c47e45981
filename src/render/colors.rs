//! Palette for fallbacks and particles

/// Straight RGBA, all channels 0..1
pub type Color = [f32; 4];

pub const BACKGROUND: Color = [0.102, 0.039, 0.180, 1.0]; // #1a0a2e

pub const SHIP_FALLBACK: Color = [1.0, 0.714, 0.757, 1.0];
pub const TARGET_INNER: Color = [1.0, 0.714, 0.757, 1.0];
pub const TARGET_OUTER: Color = [1.0, 0.569, 0.643, 1.0];
pub const TARGET_RIM: Color = [1.0, 1.0, 1.0, 0.8];
pub const TARGET_GLOW: Color = [1.0, 0.714, 0.757, 0.4];
pub const EARTH_FALLBACK: Color = [0.290, 0.565, 0.886, 1.0];
pub const EARTH_GLOW: Color = [1.0, 0.843, 0.0, 0.6];
pub const MISSILE_FALLBACK: Color = [1.0, 0.420, 0.420, 1.0];
pub const ENEMY_FALLBACK: Color = [0.545, 0.0, 0.0, 1.0];
/// Fill of the stand-in for images that failed to load (#ffb6c1)
pub const PLACEHOLDER: Color = [1.0, 0.714, 0.757, 1.0];

pub const STARS: [Color; 4] = [
    [1.0, 1.0, 1.0, 1.0],
    [1.0, 0.714, 0.757, 1.0],
    [0.867, 0.627, 0.867, 1.0],
    [0.690, 0.878, 0.902, 1.0],
];

pub const COLLECTION: [Color; 3] = [
    [1.0, 0.980, 0.804, 1.0],
    [1.0, 0.714, 0.757, 1.0],
    [0.690, 0.878, 0.902, 1.0],
];

pub const EXPLOSION: [Color; 5] = [
    [1.0, 0.980, 0.804, 1.0],
    [1.0, 0.714, 0.757, 1.0],
    [0.690, 0.878, 0.902, 1.0],
    [0.867, 0.627, 0.867, 1.0],
    [0.941, 0.902, 0.549, 1.0],
];

/// Same color with alpha forced to zero (gradient fade-out stop)
pub const fn transparent(c: Color) -> Color {
    [c[0], c[1], c[2], 0.0]
}

/// CSS `rgba()` form for the Canvas 2D API
pub fn css(c: Color) -> String {
    format!(
        "rgba({}, {}, {}, {})",
        (c[0].clamp(0.0, 1.0) * 255.0).round() as u8,
        (c[1].clamp(0.0, 1.0) * 255.0).round() as u8,
        (c[2].clamp(0.0, 1.0) * 255.0).round() as u8,
        c[3].clamp(0.0, 1.0)
    )
}

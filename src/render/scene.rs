//! Scene compositor
//!
//! Draw order is fixed: background, stars, foe, objective, missiles, ship,
//! collection sparkles, explosion debris. Later layers overlap earlier ones.

use super::{Canvas, ImageKey, ImageSource, colors};
use crate::sim::enemy::Foe;
use crate::sim::entity::{Viewport, draw};
use crate::sim::missile::Missile;
use crate::sim::particle::{CollectionParticle, ExplosionParticle, StarParticle};
use crate::sim::ship::Ship;
use crate::sim::target::Objective;

/// Borrowed view of everything on screen
pub struct Scene<'a> {
    pub viewport: Viewport,
    pub stars: &'a [StarParticle],
    pub foe: Option<&'a Foe>,
    pub objective: Option<&'a Objective>,
    pub missiles: &'a [Missile],
    pub ship: Option<&'a Ship>,
    pub collection: &'a [CollectionParticle],
    pub explosions: &'a [ExplosionParticle],
}

pub fn render_scene(canvas: &mut dyn Canvas, images: &dyn ImageSource, scene: &Scene<'_>) {
    draw_background(canvas, images, scene.viewport);

    for star in scene.stars {
        draw(star, canvas, images);
    }
    if let Some(foe) = scene.foe {
        draw(foe, canvas, images);
    }
    if let Some(objective) = scene.objective {
        draw(objective, canvas, images);
    }
    for missile in scene.missiles {
        draw(missile, canvas, images);
    }
    if let Some(ship) = scene.ship {
        draw(ship, canvas, images);
    }
    for particle in scene.collection {
        draw(particle, canvas, images);
    }
    for particle in scene.explosions {
        draw(particle, canvas, images);
    }
}

/// Background image scaled to cover the viewport, or a flat fill
fn draw_background(canvas: &mut dyn Canvas, images: &dyn ImageSource, viewport: Viewport) {
    let (w, h) = (viewport.width, viewport.height);
    match images.image(ImageKey::Background) {
        Some(img) if img.width > 0.0 && img.height > 0.0 => {
            let scale = (w / img.width).max(h / img.height);
            let (dw, dh) = (img.width * scale, img.height * scale);
            canvas.draw_image(img, (w - dw) / 2.0, (h - dh) / 2.0, dw, dh);
        }
        _ => canvas.fill_rect(0.0, 0.0, w, h, colors::BACKGROUND),
    }
}
